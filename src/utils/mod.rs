//! Utility modules for URLs, formatting, time, storage and transport.
//!
//! Provides:
//! - [`strip_query`], [`query_params`], [`add_query_param`] - URL string helpers
//! - [`b32encode_trim`] - Base32 path components
//! - [`bytes_to_size`], [`elide`], [`error_alert_message`] - Display text
//! - [`SettingsStore`] - Persistent settings seam
//! - [`Transport`] - HTTP seam

mod b32;
mod clock;
#[cfg(target_arch = "wasm32")]
pub mod dom;
mod format;
pub mod storage;
pub mod transport;
mod url;

pub use b32::b32encode_trim;
pub use clock::now_ms;
pub use format::{bytes_to_size, elide, error_alert_message, error_detail_message};
pub use storage::{MemoryStore, SettingsStore};
pub use transport::Transport;
pub use url::{add_query_param, is_absolute, origin, query_params, strip_query, url_tail};
