//! Presentation seam.
//!
//! The content client decides what to show and when; a [`Presenter`]
//! turns that into pages on screen.

use crate::core::layout::{HeaderFields, PageLayout};
use crate::models::{DashboardSection, NavOptions, RenderHandle, Slot, VisitFailure};

/// Screen-side collaborator of the content client.
pub trait Presenter {
    /// Render `layout` into `slot`, returning a handle to what was built.
    fn render(&mut self, layout: &PageLayout, slot: &Slot) -> RenderHandle;

    /// Bring the page rendered for `url` into view.
    fn show_page(&mut self, url: &str, nav: &NavOptions);

    /// Navigate to `url`, as if a link to it were followed.
    fn navigate_to(&mut self, url: &str);

    fn alert(&mut self, message: &str);

    /// Discard a rendered element whose node has been freed.
    fn release(&mut self, handle: RenderHandle);

    // Dashboard hooks

    /// Hide the dashboard body while its sections are refreshed.
    fn conceal_dashboard(&mut self);

    fn layout_dashboard_header(&mut self, header: &HeaderFields);

    /// Place a sub-visit's rendered listing into a dashboard section.
    fn splice_section(&mut self, section: DashboardSection, handle: &RenderHandle);

    fn show_empty_section(&mut self, section: DashboardSection);

    /// Present the login form, with the failure that led to it if any.
    fn show_login_form(&mut self, failure: Option<&VisitFailure>);

    fn show_dashboard(&mut self, nav: &NavOptions);
}
