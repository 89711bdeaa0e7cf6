//! The content tree of one session: registered roots plus the node arena.

use std::fmt;

use super::classifier::Classifier;
use super::registry::Registry;
use crate::config::Deployment;
use crate::core::error::ContentError;
use crate::models::{ContentNode, RenderHandle, Session};
use crate::utils::{b32encode_trim, origin, strip_query};

/// Session state and registry, kept together so classification always
/// sees the roots the registry was built against.
#[derive(Debug)]
pub struct ContentTree {
    pub(crate) session: Session,
    pub(crate) registry: Registry,
    pub(crate) deployment: Deployment,
}

impl ContentTree {
    /// Empty tree with the deployment's host-wide share root registered.
    pub fn new(deployment: Deployment) -> Self {
        let session = Session {
            actual_shares_root_url: Some(deployment.public_shares_root_url()),
            ..Session::default()
        };
        Self {
            session,
            registry: Registry::new(),
            deployment,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    pub fn classifier(&self) -> Classifier<'_> {
        Classifier::new(&self.session, &self.deployment.dashboard_url)
    }

    pub fn dashboard_url(&self) -> &str {
        &self.deployment.dashboard_url
    }

    pub fn is_content_url(&self, url: &str) -> bool {
        self.classifier().is_content_url(strip_query(url))
    }

    /// Resolve `url` through the registry, creating its node if needed.
    pub fn get(&mut self, url: &str, parent: Option<&str>) -> Result<&mut ContentNode, ContentError> {
        let classifier = Classifier::new(&self.session, &self.deployment.dashboard_url);
        self.registry.get(url, parent, &classifier)
    }

    pub fn node(&self, url: &str) -> Option<&ContentNode> {
        self.registry.lookup(url)
    }

    pub fn node_mut(&mut self, url: &str) -> Option<&mut ContentNode> {
        self.registry.lookup_mut(url)
    }

    /// Free `url` and its descendants, returning their presentations.
    pub fn clear_hierarchy(&mut self, url: &str) -> Vec<RenderHandle> {
        self.registry.clear_hierarchy(url)
    }

    // =========================================================================
    // Account Roots
    // =========================================================================

    /// Register the storage account's roots. Returns the dashboard URL.
    ///
    /// The storage root comes from `storage_web_url` when that names a
    /// storage path, else from the base32 username.
    pub fn register_storage_account(
        &mut self,
        username: &str,
        host: &str,
        storage_web_url: &str,
    ) -> Result<String, ContentError> {
        let host = host.trim_end_matches('/');
        let storage_root = self.derive_storage_root(username, host, storage_web_url);
        if self.replaces_account(&storage_root) {
            log::info!("storage account switching to {storage_root}");
            self.clear_account();
        }
        let original_root = format!(
            "{storage_root}{}",
            self.deployment.original_shares_path_suffix
        );

        self.session.username = Some(username.to_string());
        self.session.storage_host = Some(host.to_string());
        self.session.storage_web_url = Some(storage_web_url.to_string());
        self.session.storage_root_url = Some(storage_root.clone());
        self.session.original_shares_root_url = Some(original_root);

        let dashboard_url = self.deployment.dashboard_url.clone();
        self.get(&dashboard_url, None)?;
        self.get(&storage_root, None)?;
        log::info!("storage account {username} registered at {storage_root}");
        Ok(dashboard_url)
    }

    /// True if registering these account fields would replace a different,
    /// still registered storage account.
    pub fn would_replace_account(&self, username: &str, host: &str, storage_web_url: &str) -> bool {
        let host = host.trim_end_matches('/');
        self.replaces_account(&self.derive_storage_root(username, host, storage_web_url))
    }

    fn replaces_account(&self, storage_root: &str) -> bool {
        self.session
            .storage_root_url()
            .is_some_and(|current| current != storage_root)
    }

    fn derive_storage_root(&self, username: &str, host: &str, storage_web_url: &str) -> String {
        let path = match origin(storage_web_url) {
            Some(prefix) => &storage_web_url[prefix.len()..],
            None => storage_web_url,
        };
        let path = strip_query(path.trim());
        if path.starts_with(&self.deployment.storage_path_prefix)
            && path.ends_with('/')
            && path.len() > self.deployment.storage_path_prefix.len()
        {
            format!("{host}{path}")
        } else {
            format!(
                "{host}{}{}/",
                self.deployment.storage_path_prefix,
                b32encode_trim(username)
            )
        }
    }

    /// Free the account's subtrees and blank the account fields.
    ///
    /// The host-wide share root and public rooms stay registered as
    /// nodes, but room membership is forgotten with the account.
    pub fn clear_account(&mut self) -> Vec<RenderHandle> {
        let mut released = Vec::new();
        if let Some(url) = self.session.original_shares_root_url().map(str::to_string) {
            released.extend(self.registry.clear_hierarchy(&url));
        }
        if let Some(url) = self.session.storage_root_url().map(str::to_string) {
            released.extend(self.registry.clear_hierarchy(&url));
        }
        let dashboard_url = self.deployment.dashboard_url.clone();
        if let Some(state) = self
            .registry
            .lookup_mut(&dashboard_url)
            .and_then(ContentNode::dashboard_mut)
        {
            state.storage_devices.clear();
            state.original_shares.clear();
            state.public_shares.clear();
            state.authenticated = None;
            state.storage_confirmed = false;
        }
        self.session.clear_account();
        log::info!("storage account cleared");
        released
    }

    // =========================================================================
    // Public Share Rooms
    // =========================================================================

    /// Register the room for `share_id` and `password`, returning its URL.
    pub fn add_public_share_room(
        &mut self,
        share_id: &str,
        password: &str,
    ) -> Result<String, ContentError> {
        let root_url = match self.session.actual_shares_root_url() {
            Some(root) => root.to_string(),
            None => {
                let root = self.deployment.public_shares_root_url();
                self.session.actual_shares_root_url = Some(root.clone());
                root
            }
        };
        self.get(&root_url, None)?;

        let url = format!("{root_url}{}/{password}/", b32encode_trim(share_id));
        self.session.public_share_room_urls.insert(url.clone());
        self.get(&url, Some(&root_url))?;

        let dashboard_url = self.deployment.dashboard_url.clone();
        if let Some(state) = self
            .registry
            .lookup_mut(&dashboard_url)
            .and_then(ContentNode::dashboard_mut)
            && !state.public_shares.contains(&url)
        {
            state.public_shares.push(url.clone());
        }
        log::debug!("public share room {url} added");
        Ok(url)
    }
}

impl fmt::Display for ContentTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sharetree client for {}, {} items registered",
            self.session.username().unwrap_or("-"),
            self.registry.len()
        )
    }
}
