//! Visit protocol: fetch, provision, lay out and show a node.
//!
//! A visit with a notify token reports its outcome instead of acting on
//! it, which is how the dashboard coordinates its dependent sub-visits.

use serde_json::Value;

use super::client::ContentClient;
use super::layout::layout_node;
use super::present::Presenter;
use crate::core::error::ContentError;
use crate::models::{
    ModeOptions, NavOptions, NodeKind, SubvisitContent, SubvisitReport, VisitFailure,
    VisitOutcome, VisitState,
};
use crate::utils::{SettingsStore, Transport, error_alert_message, now_ms, strip_query};

impl<T, S, P> ContentClient<T, S, P>
where
    T: Transport,
    S: SettingsStore,
    P: Presenter,
{
    /// Visit the node at `url`, creating it if necessary.
    ///
    /// URLs outside the registered roots are refused with `UnknownNode`.
    pub async fn visit(
        &mut self,
        url: &str,
        nav: &NavOptions,
        mode: &ModeOptions,
    ) -> Result<VisitOutcome, ContentError> {
        let url = strip_query(url).to_string();
        if !self.tree.is_content_url(&url) {
            return Err(ContentError::UnknownNode(url));
        }
        let kind = self.tree.get(&url, None)?.kind();
        if kind == NodeKind::Dashboard {
            self.visit_dashboard(nav, mode).await
        } else {
            self.visit_node(&url, nav, mode).await
        }
    }

    /// Generic visit of any node but the dashboard.
    pub(crate) async fn visit_node(
        &mut self,
        url: &str,
        nav: &NavOptions,
        mode: &ModeOptions,
    ) -> Result<VisitOutcome, ContentError> {
        let node = self.tree.get(url, None)?;
        if !node.is_container() {
            let err = ContentError::NotImplemented("File preview".to_string());
            self.presenter.alert(&err.to_string());
            return Ok(VisitOutcome::NotImplemented("File preview".to_string()));
        }
        if node.up_to_date(None) {
            return Ok(self.show(url, nav, mode));
        }
        self.fetch_and_dispatch(url, nav, mode).await
    }

    /// Bring a node's existing page into view, unless the visit is passive.
    fn show(&mut self, url: &str, nav: &NavOptions, mode: &ModeOptions) -> VisitOutcome {
        if !mode.passive {
            self.presenter.show_page(url, nav);
        }
        VisitOutcome::Shown
    }

    async fn fetch_and_dispatch(
        &mut self,
        url: &str,
        nav: &NavOptions,
        mode: &ModeOptions,
    ) -> Result<VisitOutcome, ContentError> {
        let kind = match self.tree.node_mut(url) {
            Some(node) => {
                node.state = VisitState::Fetching;
                node.kind()
            }
            None => return Err(ContentError::UnknownNode(url.to_string())),
        };
        let when = now_ms();

        let qualifier = match kind {
            NodeKind::StorageRoot => self.tree.deployment().devices_query.as_str(),
            _ => "",
        };
        let fetch_url = format!("{url}{qualifier}");
        log::debug!("fetching {fetch_url} (refresh: {})", mode.refresh);

        match self.transport.get_json(&fetch_url).await {
            Ok(data) => self.handle_visit_success(url, &data, when, nav, mode),
            Err(err) => {
                log::warn!("fetch of {fetch_url} failed: {err}");
                self.handle_visit_failure(url, VisitFailure::from(&err), nav, mode)
            }
        }
    }

    fn handle_visit_success(
        &mut self,
        url: &str,
        data: &Value,
        when: u64,
        nav: &NavOptions,
        mode: &ModeOptions,
    ) -> Result<VisitOutcome, ContentError> {
        match self.tree.provision(url, data, Some(when)) {
            Ok(()) => {}
            Err(err @ ContentError::MalformedPayload { .. }) => {
                log::warn!("{err}");
                let failure = VisitFailure::new(0, err.to_string());
                return self.handle_visit_failure(url, failure, nav, mode);
            }
            Err(err) => return Err(err),
        }

        let tree = &self.tree;
        let node = tree
            .node(url)
            .ok_or_else(|| ContentError::UnknownNode(url.to_string()))?;
        let layout = layout_node(node, tree.registry(), tree.deployment(), mode);
        let slot = mode.slot();
        let handle = self.presenter.render(&layout, &slot);

        if slot.is_owned()
            && let Some(node) = self.tree.node_mut(url)
            && let Some(previous) = node.attach_presentation(handle.clone())
            && previous != handle
        {
            self.presenter.release(previous);
        }

        let outcome = self.show(url, nav, mode);
        Ok(match mode.notify {
            Some(token) => VisitOutcome::Reported(SubvisitReport {
                token,
                content: SubvisitContent::Rendered(handle),
            }),
            None => outcome,
        })
    }

    fn handle_visit_failure(
        &mut self,
        url: &str,
        failure: VisitFailure,
        _nav: &NavOptions,
        mode: &ModeOptions,
    ) -> Result<VisitOutcome, ContentError> {
        let parent_url = match self.tree.node_mut(url) {
            Some(node) => {
                node.state = VisitState::Failed;
                node.parent_url().map(str::to_string)
            }
            None => None,
        };

        if let Some(token) = mode.notify {
            return Ok(VisitOutcome::Reported(SubvisitReport {
                token,
                content: SubvisitContent::Failed(failure),
            }));
        }

        let dashboard_url = self.tree.dashboard_url().to_string();
        if failure.is_unauthorized() {
            log::warn!("unauthorized fetch of {url}, clearing storage account");
            self.clear_storage_account();
            self.presenter.navigate_to(&dashboard_url);
            return Ok(VisitOutcome::Unauthorized);
        }

        self.presenter.alert(&error_alert_message(
            &format!("Failure reaching {url}"),
            failure.status,
        ));
        self.presenter
            .navigate_to(parent_url.as_deref().unwrap_or(&dashboard_url));
        Ok(VisitOutcome::Failed(failure))
    }
}
