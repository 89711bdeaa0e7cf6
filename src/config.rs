//! Client configuration.
//!
//! Centralizes the constants used throughout the crate and the
//! [`Deployment`] description of the service the client talks to.

// =============================================================================
// Service Endpoints
// =============================================================================

/// URL of the consolidated dashboard root. Not a network address: the
/// dashboard is assembled from the storage and share subtrees.
pub const DASHBOARD_URL: &str = "dashboard";

/// Host that receives the first login attempt.
pub const STARTING_HOST_URL: &str = "https://spideroak.com";

/// Host under which every share room is addressable.
pub const SHARE_HOST_URL: &str = "https://spideroak.com";

/// Path of the storage login endpoint, relative to the host.
pub const STORAGE_LOGIN_PATH: &str = "/browse/login";

/// Leading path of every storage root.
pub const STORAGE_PATH_PREFIX: &str = "/storage/";

/// Appended to the storage root to address the account's own share rooms.
pub const ORIGINAL_SHARES_PATH_SUFFIX: &str = "shares";

/// Appended to the share host to address the public share rooms root.
pub const PUBLIC_SHARES_PATH_SUFFIX: &str = "/share/";

/// Appended to the storage root to end the server session.
pub const LOGOUT_SUFFIX: &str = "logout";

/// Query qualifier requesting device metadata from the storage root.
pub const DEVICES_QUERY: &str = "?device_info=yes";

// =============================================================================
// Content Presentation
// =============================================================================

/// Preview image sizes the server may offer for a file (`preview_<N>`).
pub const PREVIEW_SIZES: &[u32] = &[25, 48, 228, 800];

/// Listings longer than this get alphabetical dividers.
pub const DIVIDERS_THRESHOLD: usize = 10;

/// Listings longer than this are marked filterable.
pub const FILTER_THRESHOLD: usize = 20;

/// Display truncation limits.
pub mod display {
    /// Maximum header title length before eliding.
    pub const TITLE_LIMIT: usize = 25;
    /// Maximum header button label length before eliding.
    pub const LABEL_LIMIT: usize = 15;
}

/// Fixed labels used by the header layouts.
pub mod labels {
    pub const HOME: &str = "Home";
    pub const STORAGE_DEVICES: &str = "Storage Devices";
    pub const SHARE_ROOMS: &str = "Share Rooms";
    pub const REFRESH: &str = "Refresh";
    pub const EDIT: &str = "Edit";
    pub const ADD: &str = "+";
    pub const LOGOUT: &str = "Logout";
}

// =============================================================================
// Login
// =============================================================================

/// Maximum number of `login:` redirects followed before giving up.
pub const MAX_LOGIN_REDIRECTS: usize = 5;

// =============================================================================
// Persistent Settings
// =============================================================================

/// Persistent-store keys.
pub mod keys {
    /// Whether account details survive a restart.
    pub const REMEMBER_ME: &str = "remember_me";
    pub const USERNAME: &str = "username";
    pub const STORAGE_HOST: &str = "storage_host";
    pub const STORAGE_WEB_URL: &str = "storage_web_url";
}

// =============================================================================
// Deployment
// =============================================================================

/// Addresses and policies of one service deployment.
///
/// The default value describes the production service. Tests and
/// alternate brands retarget it with [`Deployment::for_host`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deployment {
    pub dashboard_url: String,
    pub starting_host_url: String,
    pub share_host_url: String,
    pub storage_login_path: String,
    pub storage_path_prefix: String,
    pub original_shares_path_suffix: String,
    pub public_shares_path_suffix: String,
    pub logout_suffix: String,
    pub devices_query: String,
    pub preview_sizes: Vec<u32>,
    pub dividers_threshold: usize,
    pub filter_threshold: usize,
    pub max_login_redirects: usize,
}

impl Default for Deployment {
    fn default() -> Self {
        Self {
            dashboard_url: DASHBOARD_URL.to_string(),
            starting_host_url: STARTING_HOST_URL.to_string(),
            share_host_url: SHARE_HOST_URL.to_string(),
            storage_login_path: STORAGE_LOGIN_PATH.to_string(),
            storage_path_prefix: STORAGE_PATH_PREFIX.to_string(),
            original_shares_path_suffix: ORIGINAL_SHARES_PATH_SUFFIX.to_string(),
            public_shares_path_suffix: PUBLIC_SHARES_PATH_SUFFIX.to_string(),
            logout_suffix: LOGOUT_SUFFIX.to_string(),
            devices_query: DEVICES_QUERY.to_string(),
            preview_sizes: PREVIEW_SIZES.to_vec(),
            dividers_threshold: DIVIDERS_THRESHOLD,
            filter_threshold: FILTER_THRESHOLD,
            max_login_redirects: MAX_LOGIN_REDIRECTS,
        }
    }
}

impl Deployment {
    /// Production settings, with both the login and share hosts at `host`.
    pub fn for_host(host: impl Into<String>) -> Self {
        let host = host.into().trim_end_matches('/').to_string();
        Self {
            starting_host_url: host.clone(),
            share_host_url: host,
            ..Self::default()
        }
    }

    /// URL of the first login attempt.
    pub fn login_url(&self) -> String {
        format!("{}{}", self.starting_host_url, self.storage_login_path)
    }

    /// Root under which all share rooms live, independent of login.
    pub fn public_shares_root_url(&self) -> String {
        format!("{}{}", self.share_host_url, self.public_shares_path_suffix)
    }
}
