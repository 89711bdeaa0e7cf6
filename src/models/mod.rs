//! Data models and types for the content client.
//!
//! Contains domain types for:
//! - [`ContentNode`], [`NodeKind`], [`NodeBody`] - The typed content tree
//! - [`Session`] - Login identity and registered roots
//! - [`ModeOptions`], [`NotifyToken`], [`VisitOutcome`] - Visit protocol
//! - [`FileClass`] - File classification by name
//! - [`payload`] - JSON listing shapes

mod filetype;
mod node;
mod options;
pub mod payload;
mod session;

pub use filetype::{FileClass, describe_file_by_name, icon_name_by_file_name};
pub use node::{
    ContentNode, DashboardState, DeviceDetails, FileDetails, Listing, NodeBody, NodeKind,
    RoomStats, VisitState,
};
pub use options::{
    DashboardSection, ModeOptions, NavOptions, NotifyToken, RenderHandle, Slot, SubvisitContent,
    SubvisitReport, VisitFailure, VisitOutcome,
};
pub use session::Session;
