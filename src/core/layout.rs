//! Page layouts handed to the presenter.
//!
//! Layout is pure: it reads a node and its registered relatives and returns
//! a description of the header and listing. Turning that into screen
//! elements is the presenter's job.

use crate::config::{Deployment, display, labels};
use crate::core::registry::Registry;
use crate::models::{ContentNode, FileClass, ModeOptions, NodeKind};
use crate::utils::{add_query_param, bytes_to_size, elide, url_tail};

// =============================================================================
// Layout Types
// =============================================================================

/// What a header button does.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ButtonAction {
    /// Navigate to a URL
    Visit(String),
    /// End the storage session
    Logout,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderButton {
    pub label: String,
    pub action: ButtonAction,
}

impl HeaderButton {
    fn visit(label: &str, url: String) -> Self {
        Self {
            label: elide(label, display::LABEL_LIMIT),
            action: ButtonAction::Visit(url),
        }
    }
}

/// Page header. A `None` button is hidden.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderFields {
    pub title: String,
    pub left: Option<HeaderButton>,
    pub right: Option<HeaderButton>,
}

/// One entry of a content listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListItem {
    /// Alphabetical section marker
    Divider(String),
    Folder {
        url: String,
        name: String,
    },
    File {
        url: String,
        name: String,
        class: Option<FileClass>,
        /// Human-readable size
        size: String,
        mtime: Option<i64>,
    },
}

/// Everything the presenter needs to render one node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageLayout {
    pub url: String,
    /// Omitted when rendering into a dashboard section
    pub header: Option<HeaderFields>,
    pub items: Vec<ListItem>,
    pub filterable: bool,
    /// The container has no entries at all
    pub empty: bool,
}

// =============================================================================
// Layout
// =============================================================================

/// Lay out `node` for rendering with `mode`.
pub fn layout_node(
    node: &ContentNode,
    registry: &Registry,
    deployment: &Deployment,
    mode: &ModeOptions,
) -> PageLayout {
    let header = mode
        .content_only_in
        .is_none()
        .then(|| node_header(node, registry, deployment));
    let items = listing_items(node, registry, deployment.dividers_threshold);
    let entries = node.listing().map_or(0, |l| l.len());
    PageLayout {
        url: node.url().to_string(),
        header,
        items,
        filterable: entries > deployment.filter_threshold,
        empty: node.is_container() && entries == 0,
    }
}

/// Dashboard header: logout only once authenticated.
pub fn dashboard_header(authenticated: bool) -> HeaderFields {
    HeaderFields {
        title: labels::HOME.to_string(),
        left: None,
        right: authenticated.then(|| HeaderButton {
            label: labels::LOGOUT.to_string(),
            action: ButtonAction::Logout,
        }),
    }
}

fn node_header(node: &ContentNode, registry: &Registry, deployment: &Deployment) -> HeaderFields {
    let refresh = || HeaderButton::visit(labels::REFRESH, add_query_param(node.url(), "refresh", "true"));
    let home = || HeaderButton::visit(labels::HOME, deployment.dashboard_url.clone());

    match node.kind() {
        NodeKind::Dashboard => dashboard_header(false),
        NodeKind::StorageRoot => HeaderFields {
            title: labels::STORAGE_DEVICES.to_string(),
            left: Some(home()),
            right: Some(refresh()),
        },
        NodeKind::OriginalSharesRoot | NodeKind::PublicSharesRoot => HeaderFields {
            title: labels::SHARE_ROOMS.to_string(),
            left: Some(HeaderButton::visit(
                labels::ADD,
                add_query_param(node.url(), "mode", "add"),
            )),
            right: Some(HeaderButton::visit(
                labels::EDIT,
                add_query_param(node.url(), "mode", "edit"),
            )),
        },
        _ => HeaderFields {
            title: elide(&display_name(node), display::TITLE_LIMIT),
            left: Some(match node.parent_url() {
                Some(parent) => HeaderButton::visit(&parent_label(parent, registry), parent.to_string()),
                None => home(),
            }),
            right: Some(refresh()),
        },
    }
}

fn parent_label(parent_url: &str, registry: &Registry) -> String {
    match registry.lookup(parent_url) {
        Some(parent) if parent.kind() == NodeKind::StorageRoot => labels::STORAGE_DEVICES.to_string(),
        Some(parent) if parent.kind().is_share_root() => labels::SHARE_ROOMS.to_string(),
        Some(parent) if parent.kind() == NodeKind::Dashboard => labels::HOME.to_string(),
        Some(parent) => display_name(parent),
        None => url_tail(parent_url).to_string(),
    }
}

fn display_name(node: &ContentNode) -> String {
    if node.name.is_empty() {
        url_tail(node.url()).to_string()
    } else {
        node.name.clone()
    }
}

fn listing_items(node: &ContentNode, registry: &Registry, dividers_threshold: usize) -> Vec<ListItem> {
    let Some(listing) = node.listing() else {
        return Vec::new();
    };
    let with_dividers = listing.len() > dividers_threshold;
    let mut items = Vec::with_capacity(listing.len());

    let mut initial = None;
    for url in &listing.subdirs {
        let name = registry
            .lookup(url)
            .map(display_name)
            .unwrap_or_else(|| url_tail(url).to_string());
        if with_dividers {
            push_divider(&mut items, &mut initial, &name, "/");
        }
        items.push(ListItem::Folder {
            url: url.clone(),
            name,
        });
    }

    let mut initial = None;
    for url in &listing.files {
        let child = registry.lookup(url);
        let name = child
            .map(display_name)
            .unwrap_or_else(|| url_tail(url).to_string());
        let details = child.and_then(ContentNode::file_details);
        if with_dividers {
            push_divider(&mut items, &mut initial, &name, "");
        }
        items.push(ListItem::File {
            url: url.clone(),
            class: FileClass::from_name(&name),
            size: bytes_to_size(details.and_then(|d| d.size).unwrap_or(0)),
            mtime: details.and_then(|d| d.mtime),
            name,
        });
    }
    items
}

fn push_divider(items: &mut Vec<ListItem>, current: &mut Option<String>, name: &str, prefix: &str) {
    let initial: String = name.chars().take(1).flat_map(char::to_uppercase).collect();
    if current.as_deref() != Some(initial.as_str()) {
        items.push(ListItem::Divider(format!("{prefix}{initial}")));
        *current = Some(initial);
    }
}
