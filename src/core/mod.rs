//! Core business logic of the content client.
//!
//! This module provides:
//! - [`Classifier`] URL classification against the registered roots
//! - [`Registry`] the URL-keyed node arena, and [`ContentTree`] pairing it
//!   with the session
//! - [`ContentClient`] the visit protocol, dashboard orchestration and
//!   account registrar over the [`Presenter`] and transport seams
//! - [`layout_node`] pure page layouts

mod account;
mod classifier;
mod client;
mod dashboard;
pub mod error;
pub mod layout;
mod present;
mod provision;
mod registry;
mod tree;
mod visit;

pub use account::LoginReply;
pub use classifier::Classifier;
pub use client::ContentClient;
pub use dashboard::DependentVisit;
pub use layout::{ButtonAction, HeaderButton, HeaderFields, ListItem, PageLayout, layout_node};
pub use present::Presenter;
pub use registry::Registry;
pub use tree::ContentTree;
