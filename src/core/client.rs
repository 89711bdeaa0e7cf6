//! The content client: the content tree plus its external collaborators.

use std::fmt;

use super::present::Presenter;
use super::tree::ContentTree;
use crate::config::Deployment;
use crate::core::error::ContentError;
use crate::models::{ModeOptions, NavOptions, RenderHandle, Session, VisitOutcome};
use crate::utils::{SettingsStore, Transport};

/// Entry point of the crate: owns the session's content tree and talks to
/// the server, the settings store and the presenter on its behalf.
pub struct ContentClient<T, S, P> {
    pub(crate) tree: ContentTree,
    pub(crate) transport: T,
    pub(crate) store: S,
    pub(crate) presenter: P,
}

impl<T, S, P> ContentClient<T, S, P>
where
    T: Transport,
    S: SettingsStore,
    P: Presenter,
{
    pub fn new(deployment: Deployment, transport: T, store: S, presenter: P) -> Self {
        Self {
            tree: ContentTree::new(deployment),
            transport,
            store,
            presenter,
        }
    }

    pub fn tree(&self) -> &ContentTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ContentTree {
        &mut self.tree
    }

    pub fn session(&self) -> &Session {
        self.tree.session()
    }

    pub fn deployment(&self) -> &Deployment {
        self.tree.deployment()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Navigation hook: visit `url` if it is a content URL.
    ///
    /// Returns `None` for URLs outside the content tree, leaving them to
    /// the navigation framework. Mode options come from the URL's query.
    pub async fn handle_content_visit(
        &mut self,
        url: &str,
        nav: &NavOptions,
    ) -> Option<Result<VisitOutcome, ContentError>> {
        if !self.tree.is_content_url(url) {
            return None;
        }
        let mode = ModeOptions::from_query(url);
        Some(self.visit(url, nav, &mode).await)
    }

    /// Hand freed presentations back to the presenter.
    pub(crate) fn release_all(&mut self, handles: Vec<RenderHandle>) {
        for handle in handles {
            self.presenter.release(handle);
        }
    }
}

impl<T, S, P> fmt::Display for ContentClient<T, S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.tree, f)
    }
}
