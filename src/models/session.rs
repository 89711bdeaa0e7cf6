//! Account and root-URL state for one client session.

use std::collections::BTreeSet;

/// Login identity and the registered content roots.
///
/// String fields are `None` until first set and `Some("")` once cleared,
/// so a cleared session stays distinguishable from a fresh one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub username: Option<String>,
    pub storage_host: Option<String>,
    pub storage_web_url: Option<String>,
    pub storage_root_url: Option<String>,
    pub original_shares_root_url: Option<String>,
    /// Host-wide share root; survives account clears.
    pub actual_shares_root_url: Option<String>,
    pub public_share_room_urls: BTreeSet<String>,
    pub original_share_room_urls: BTreeSet<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if enough identity is registered to attempt storage fetches.
    pub fn has_login_identity(&self) -> bool {
        non_empty(&self.username).is_some() && non_empty(&self.storage_root_url).is_some()
    }

    pub fn username(&self) -> Option<&str> {
        non_empty(&self.username)
    }

    pub fn storage_root_url(&self) -> Option<&str> {
        non_empty(&self.storage_root_url)
    }

    pub fn original_shares_root_url(&self) -> Option<&str> {
        non_empty(&self.original_shares_root_url)
    }

    pub fn actual_shares_root_url(&self) -> Option<&str> {
        non_empty(&self.actual_shares_root_url)
    }

    /// Blank the account fields and forget the account's share rooms.
    pub fn clear_account(&mut self) {
        for field in [
            &mut self.username,
            &mut self.storage_host,
            &mut self.storage_web_url,
            &mut self.storage_root_url,
            &mut self.original_shares_root_url,
        ] {
            *field = Some(String::new());
        }
        self.public_share_room_urls.clear();
        self.original_share_room_urls.clear();
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}
