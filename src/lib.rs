//! Client-side content model for a hierarchical storage and share-room
//! service.
//!
//! Server URLs map onto a typed tree of [`ContentNode`]s (storage devices,
//! folders, files and share rooms) held in a URL-keyed [`Registry`]. A
//! [`ContentClient`] fetches and provisions nodes on visit and assembles
//! the dashboard from its dependent storage and share-room sub-visits.
//! Rendering, transport and persistent settings stay behind the
//! [`Presenter`], [`Transport`] and [`SettingsStore`] traits.

pub mod config;
pub mod core;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod models;
pub mod utils;

pub use config::Deployment;
pub use core::error::{ContentError, FetchError, StoreError};
pub use core::{Classifier, ContentClient, ContentTree, PageLayout, Presenter, Registry};
pub use models::{ContentNode, ModeOptions, NavOptions, NodeKind, Session, VisitOutcome};
pub use utils::{MemoryStore, SettingsStore, Transport};

#[cfg(target_arch = "wasm32")]
pub use utils::storage::LocalStore;
#[cfg(target_arch = "wasm32")]
pub use utils::transport::BrowserTransport;

/// Route `log` output to the browser console and panics to `console.error`.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() -> Result<(), log::SetLoggerError> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info)
}
