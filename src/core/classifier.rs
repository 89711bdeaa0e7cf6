//! URL classification against the registered content roots.

use crate::models::{NodeKind, Session};

/// Read-only view answering which part of the content tree a URL names.
///
/// All checks are plain string comparisons against the session's
/// registered roots. An unset or cleared root never matches.
#[derive(Clone, Copy, Debug)]
pub struct Classifier<'a> {
    session: &'a Session,
    dashboard_url: &'a str,
}

impl<'a> Classifier<'a> {
    pub fn new(session: &'a Session, dashboard_url: &'a str) -> Self {
        Self {
            session,
            dashboard_url,
        }
    }

    pub fn is_combo_root_url(&self, url: &str) -> bool {
        url == self.dashboard_url
    }

    pub fn is_storage_root_url(&self, url: &str) -> bool {
        self.session.storage_root_url() == Some(url)
    }

    pub fn is_original_shares_root_url(&self, url: &str) -> bool {
        self.session.original_shares_root_url() == Some(url)
    }

    pub fn is_actual_shares_root_url(&self, url: &str) -> bool {
        self.session.actual_shares_root_url() == Some(url)
    }

    pub fn is_content_root_url(&self, url: &str) -> bool {
        self.root_kind(url).is_some()
    }

    /// Kind of the root registered at `url`, if any.
    pub fn root_kind(&self, url: &str) -> Option<NodeKind> {
        if self.is_combo_root_url(url) {
            Some(NodeKind::Dashboard)
        } else if self.is_storage_root_url(url) {
            Some(NodeKind::StorageRoot)
        } else if self.is_original_shares_root_url(url) {
            Some(NodeKind::OriginalSharesRoot)
        } else if self.is_actual_shares_root_url(url) {
            Some(NodeKind::PublicSharesRoot)
        } else {
            None
        }
    }

    pub fn is_storage_url(&self, url: &str) -> bool {
        self.session
            .storage_root_url()
            .is_some_and(|root| url.starts_with(root))
    }

    pub fn is_share_url(&self, url: &str) -> bool {
        self.session
            .actual_shares_root_url()
            .is_some_and(|root| url.starts_with(root))
    }

    pub fn is_public_share_room_url(&self, url: &str) -> bool {
        self.session.public_share_room_urls.contains(url)
    }

    pub fn is_original_share_room_url(&self, url: &str) -> bool {
        self.session.original_share_room_urls.contains(url)
    }

    pub fn is_share_room_url(&self, url: &str) -> bool {
        self.is_public_share_room_url(url) || self.is_original_share_room_url(url)
    }

    pub fn is_content_url(&self, url: &str) -> bool {
        self.is_storage_url(url) || self.is_share_url(url) || self.is_combo_root_url(url)
    }

    /// Root of the collection `url` belongs to, for nodes created without
    /// a registered parent.
    pub fn collection_root_for(&self, url: &str) -> Option<&'a str> {
        if self.is_original_share_room_url(url) {
            self.session.original_shares_root_url()
        } else if self.is_storage_url(url) {
            self.session.storage_root_url()
        } else if self.is_share_url(url) {
            self.session.actual_shares_root_url()
        } else {
            None
        }
    }
}
