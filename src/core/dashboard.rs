//! Dashboard orchestration.
//!
//! The dashboard is assembled from two dependent sub-visits: the storage
//! root, then the account's original share rooms. They run strictly in
//! sequence, and the second is issued only after the first reported
//! success during the same dashboard visit.

use super::client::ContentClient;
use super::layout::dashboard_header;
use super::present::Presenter;
use crate::core::error::ContentError;
use crate::models::{
    ContentNode, DashboardSection, DashboardState, ModeOptions, NavOptions, NotifyToken,
    SubvisitContent, SubvisitReport, VisitOutcome,
};
use crate::utils::{SettingsStore, Transport};

/// A sub-visit still to be issued.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DependentVisit {
    pub url: String,
    pub token: NotifyToken,
}

impl<T, S, P> ContentClient<T, S, P>
where
    T: Transport,
    S: SettingsStore,
    P: Presenter,
{
    pub(crate) async fn visit_dashboard(
        &mut self,
        nav: &NavOptions,
        mode: &ModeOptions,
    ) -> Result<VisitOutcome, ContentError> {
        let dashboard_url = self.tree.dashboard_url().to_string();
        let authenticated = {
            let state = self.dashboard_state(&dashboard_url)?;
            state.storage_confirmed = false;
            state.authenticated == Some(true)
        };

        self.presenter.conceal_dashboard();
        self.presenter
            .layout_dashboard_header(&dashboard_header(authenticated));

        let storage_root = self
            .tree
            .session()
            .has_login_identity()
            .then(|| self.tree.session().storage_root_url().map(str::to_string))
            .flatten();
        let Some(storage_root) = storage_root else {
            log::debug!("no login identity, showing login form");
            let state = self.dashboard_state(&dashboard_url)?;
            state.authenticated = Some(false);
            state.auth_failure = None;
            self.presenter.layout_dashboard_header(&dashboard_header(false));
            self.presenter.show_login_form(None);
            return Ok(self.reveal_dashboard(nav, mode));
        };

        let mut pending = Some(DependentVisit {
            url: storage_root,
            token: NotifyToken::Storage,
        });
        while let Some(next) = pending.take() {
            let sub_mode = mode.for_subvisit(next.token, &dashboard_url);
            match self.visit_node(&next.url, nav, &sub_mode).await? {
                VisitOutcome::Reported(report) => {
                    pending = self.notify_subvisit_status(report)?;
                }
                other => log::warn!("sub-visit of {} ended without report: {other:?}", next.url),
            }
        }

        Ok(self.reveal_dashboard(nav, mode))
    }

    /// Coordinate one sub-visit outcome, returning the visit it unlocks.
    pub fn notify_subvisit_status(
        &mut self,
        report: SubvisitReport,
    ) -> Result<Option<DependentVisit>, ContentError> {
        let dashboard_url = self.tree.dashboard_url().to_string();
        log::debug!(
            "sub-visit {} {}",
            report.token,
            if report.succeeded() { "succeeded" } else { "failed" }
        );

        match (report.token, report.content) {
            (NotifyToken::Storage, SubvisitContent::Failed(failure)) => {
                if failure.is_unauthorized() {
                    self.clear_storage_account();
                }
                let state = self.dashboard_state(&dashboard_url)?;
                state.authenticated = Some(false);
                state.auth_failure = Some(failure.clone());
                state.storage_confirmed = false;
                self.presenter.layout_dashboard_header(&dashboard_header(false));
                self.presenter.show_login_form(Some(&failure));
                Ok(None)
            }
            (NotifyToken::Storage, SubvisitContent::Rendered(handle)) => {
                self.presenter.splice_section(DashboardSection::Storage, &handle);
                let devices = self.root_subdirs(self.tree.session().storage_root_url());
                let state = self.dashboard_state(&dashboard_url)?;
                state.authenticated = Some(true);
                state.auth_failure = None;
                state.storage_confirmed = true;
                state.storage_devices = devices;
                if self.remember_me() {
                    self.persist_credentials()?;
                }
                self.presenter.layout_dashboard_header(&dashboard_header(true));
                Ok(self
                    .tree
                    .session()
                    .original_shares_root_url()
                    .map(|url| DependentVisit {
                        url: url.to_string(),
                        token: NotifyToken::OriginalShare,
                    }))
            }
            (NotifyToken::OriginalShare, content) => {
                if !self.dashboard_state(&dashboard_url)?.storage_confirmed {
                    log::warn!("original share report before storage success, ignored");
                    return Ok(None);
                }
                match content {
                    SubvisitContent::Rendered(handle) => {
                        self.presenter
                            .splice_section(DashboardSection::OriginalShares, &handle);
                        let rooms =
                            self.root_subdirs(self.tree.session().original_shares_root_url());
                        self.dashboard_state(&dashboard_url)?.original_shares = rooms;
                    }
                    SubvisitContent::Failed(_) => {
                        self.presenter
                            .show_empty_section(DashboardSection::OriginalShares);
                    }
                }
                Ok(None)
            }
        }
    }

    fn reveal_dashboard(&mut self, nav: &NavOptions, mode: &ModeOptions) -> VisitOutcome {
        if !mode.passive {
            self.presenter.show_dashboard(nav);
        }
        VisitOutcome::Shown
    }

    fn root_subdirs(&self, root_url: Option<&str>) -> Vec<String> {
        root_url
            .and_then(|url| self.tree.node(url))
            .and_then(ContentNode::subdirs)
            .map(<[String]>::to_vec)
            .unwrap_or_default()
    }

    fn dashboard_state(
        &mut self,
        dashboard_url: &str,
    ) -> Result<&mut DashboardState, ContentError> {
        self.tree
            .get(dashboard_url, None)?
            .dashboard_mut()
            .ok_or_else(|| ContentError::Configuration(format!("{dashboard_url} is not the dashboard")))
    }
}
