//! Visit options, notification tokens and visit outcomes.

use std::fmt;

use crate::core::error::FetchError;
use crate::utils::query_params;

// ============================================================================
// Navigation and Mode Options
// ============================================================================

/// Page-transition options handed through to the presenter untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavOptions {
    /// Transition name understood by the presenter (e.g. "slide")
    pub transition: Option<String>,
    /// Play the transition backwards
    pub reverse: bool,
}

/// Modal settings for one visit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModeOptions {
    /// Render without switching the visible page.
    pub passive: bool,
    /// Bypass any caching on the way to the server.
    pub refresh: bool,
    /// Render only the content list, into this section of the page.
    pub content_only_in: Option<String>,
    /// Render into this page instead of the node's own page.
    pub use_page: Option<String>,
    /// Editing mode requested through the URL (`mode=edit`, `mode=add`).
    pub mode: Option<String>,
    /// Report the outcome to the coordinating dashboard instead of acting on it.
    pub notify: Option<NotifyToken>,
}

impl ModeOptions {
    /// Parse mode settings from a URL's query string.
    pub fn from_query(url: &str) -> Self {
        let params = query_params(url);
        let flag = |name: &str| params.get(name).is_some_and(|v| v == "true");
        Self {
            passive: flag("passive"),
            refresh: flag("refresh"),
            content_only_in: params.get("content_only_in").cloned(),
            use_page: params.get("use_page").cloned(),
            mode: params.get("mode").cloned(),
            notify: None,
        }
    }

    /// Settings for a dashboard sub-visit reporting back with `token`.
    ///
    /// The sub-visit renders passively into the token's dashboard section;
    /// `refresh` and `mode` carry over from the dashboard visit.
    pub fn for_subvisit(&self, token: NotifyToken, dashboard_page: &str) -> Self {
        Self {
            passive: true,
            refresh: self.refresh,
            content_only_in: Some(token.section().selector().to_string()),
            use_page: Some(dashboard_page.to_string()),
            mode: self.mode.clone(),
            notify: Some(token),
        }
    }

    /// Where the rendered layout should go.
    pub fn slot(&self) -> Slot {
        match &self.content_only_in {
            Some(selector) => Slot::Section {
                page: self.use_page.clone(),
                selector: selector.clone(),
            },
            None => match &self.use_page {
                Some(page) => Slot::Page(page.clone()),
                None => Slot::OwnPage,
            },
        }
    }
}

/// Render destination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Slot {
    /// The node's own page
    OwnPage,
    /// Another page, whole
    Page(String),
    /// A section of a page (the node's own when `page` is `None`)
    Section {
        page: Option<String>,
        selector: String,
    },
}

impl Slot {
    /// True when the node itself owns what gets rendered here.
    pub fn is_owned(&self) -> bool {
        matches!(self, Self::OwnPage)
    }
}

// ============================================================================
// Dashboard Coordination
// ============================================================================

/// Label distinguishing the dependent sub-visits of a dashboard visit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NotifyToken {
    Storage,
    OriginalShare,
}

impl NotifyToken {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Storage => "storage",
            Self::OriginalShare => "original-share",
        }
    }

    /// Dashboard section the sub-visit renders into.
    pub fn section(self) -> DashboardSection {
        match self {
            Self::Storage => DashboardSection::Storage,
            Self::OriginalShare => DashboardSection::OriginalShares,
        }
    }
}

impl fmt::Display for NotifyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sections of the dashboard page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DashboardSection {
    Storage,
    OriginalShares,
}

impl DashboardSection {
    pub fn selector(self) -> &'static str {
        match self {
            Self::Storage => ".storage-contents",
            Self::OriginalShares => ".original-shareroom-contents",
        }
    }
}

// ============================================================================
// Outcomes
// ============================================================================

/// Opaque reference to something the presenter rendered.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RenderHandle {
    pub id: u64,
    pub url: String,
}

/// Status report of a failed fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisitFailure {
    /// HTTP status, 0 when no response arrived
    pub status: u16,
    pub status_text: String,
}

impl VisitFailure {
    pub fn new(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

impl From<&FetchError> for VisitFailure {
    fn from(err: &FetchError) -> Self {
        match err {
            FetchError::HttpError {
                status,
                status_text,
            } => Self::new(*status, status_text.clone()),
            other => Self::new(0, other.to_string()),
        }
    }
}

/// What a sub-visit hands back to the dashboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubvisitContent {
    Rendered(RenderHandle),
    Failed(VisitFailure),
}

/// One notification from a dependent sub-visit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubvisitReport {
    pub token: NotifyToken,
    pub content: SubvisitContent,
}

impl SubvisitReport {
    pub fn succeeded(&self) -> bool {
        matches!(self.content, SubvisitContent::Rendered(_))
    }
}

/// Result of a visit, after the node has handled what it could.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VisitOutcome {
    /// Content was presented.
    Shown,
    /// Outcome routed to the coordinating dashboard.
    Reported(SubvisitReport),
    /// Fetch failed; the user was alerted and sent up the tree.
    Failed(VisitFailure),
    /// Fetch was refused; the session was cleared.
    Unauthorized,
    /// The visited kind has no implementation yet.
    NotImplemented(String),
}
