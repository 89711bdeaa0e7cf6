//! Content nodes: the typed tree of storage devices, folders, files and
//! share rooms.
//!
//! Nodes refer to their parent and children only by URL. The registry
//! resolves those URLs, so no node ever owns another.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use super::{RenderHandle, VisitFailure};

// =============================================================================
// Node Kinds
// =============================================================================

/// Discriminator of the closed set of node kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Consolidated dashboard over the storage and share subtrees
    Dashboard,
    /// The account's storage area, listing backed-up devices
    StorageRoot,
    Device,
    StorageFolder,
    StorageFile,
    /// Share rooms the account itself created
    OriginalSharesRoot,
    /// Share rooms visited by share id and room key
    PublicSharesRoot,
    ShareRoom,
    ShareFolder,
    ShareFile,
}

impl NodeKind {
    /// Files are the only leaves.
    pub fn is_container(self) -> bool {
        !self.is_file()
    }

    pub fn is_file(self) -> bool {
        matches!(self, Self::StorageFile | Self::ShareFile)
    }

    pub fn is_device(self) -> bool {
        matches!(self, Self::Device)
    }

    /// Top of a collection (or of everything, for the dashboard).
    pub fn is_root(self) -> bool {
        matches!(
            self,
            Self::Dashboard | Self::StorageRoot | Self::OriginalSharesRoot | Self::PublicSharesRoot
        )
    }

    pub fn is_share_root(self) -> bool {
        matches!(self, Self::OriginalSharesRoot | Self::PublicSharesRoot)
    }

    /// Part of the storage subtree, as opposed to the share subtrees.
    pub fn is_storage(self) -> bool {
        matches!(
            self,
            Self::StorageRoot | Self::Device | Self::StorageFolder | Self::StorageFile
        )
    }

    /// Human label for the kind.
    pub fn emblem(self) -> &'static str {
        match self {
            Self::Dashboard => "Home",
            Self::StorageRoot => "Root Storage",
            Self::Device => "Storage Device",
            Self::StorageFolder => "Storage Folder",
            Self::StorageFile => "Storage File",
            Self::OriginalSharesRoot => "Root Share Room",
            Self::PublicSharesRoot => "Root Public Share Room",
            Self::ShareRoom => "Share Room",
            Self::ShareFolder => "Share Room Folder",
            Self::ShareFile => "Share Room File",
        }
    }
}

/// Per-node visit state.
///
/// `Provisioned` nodes are still refetched on the next visit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VisitState {
    #[default]
    Stale,
    Fetching,
    Provisioned,
    Failed,
}

// =============================================================================
// Kind-specific Data
// =============================================================================

/// Child URLs of a container, in server listing order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Listing {
    /// Devices, folders and share rooms
    pub subdirs: Vec<String>,
    pub files: Vec<String>,
}

impl Listing {
    /// Append `url` to the subdirs unless present. Returns true if added.
    pub fn add_subdir(&mut self, url: &str) -> bool {
        push_unique(&mut self.subdirs, url)
    }

    /// Append `url` to the files unless present. Returns true if added.
    pub fn add_file(&mut self, url: &str) -> bool {
        push_unique(&mut self.files, url)
    }

    pub fn len(&self) -> usize {
        self.subdirs.len() + self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Subdirs followed by files.
    pub fn urls(&self) -> impl Iterator<Item = &String> {
        self.subdirs.iter().chain(self.files.iter())
    }
}

fn push_unique(list: &mut Vec<String>, url: &str) -> bool {
    if list.iter().any(|existing| existing == url) {
        false
    } else {
        list.push(url.to_string());
        true
    }
}

/// Metadata copied from a folder listing's file entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FileDetails {
    /// Size in bytes
    pub size: Option<u64>,
    /// Creation time (Unix seconds)
    pub ctime: Option<i64>,
    /// Modification time (Unix seconds)
    pub mtime: Option<i64>,
    /// Number of stored versions
    pub versions: Option<u64>,
    /// Preview references keyed by pixel size
    pub previews: BTreeMap<u32, Value>,
}

/// Device activity, from the storage root listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeviceDetails {
    pub lastlogin: Option<i64>,
    pub lastcommit: Option<i64>,
}

/// Share room statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoomStats {
    pub description: Option<String>,
    pub number_of_files: Option<u64>,
    pub number_of_folders: Option<u64>,
    /// Owner's first name
    pub firstname: Option<String>,
    /// Owner's last name
    pub lastname: Option<String>,
}

/// Dashboard bookkeeping across its dependent sub-visits.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DashboardState {
    /// Devices spliced in from the storage root
    pub storage_devices: Vec<String>,
    /// Rooms spliced in from the original shares root
    pub original_shares: Vec<String>,
    /// Public rooms known to the session
    pub public_shares: Vec<String>,
    /// `None` until the storage sub-visit has reported
    pub authenticated: Option<bool>,
    pub auth_failure: Option<VisitFailure>,
    /// Storage sub-visit succeeded during the current dashboard visit
    pub storage_confirmed: bool,
}

/// Kind tag together with the kind's own fields.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeBody {
    Dashboard(DashboardState),
    StorageRoot {
        listing: Listing,
        /// Account statistics, kept verbatim
        stats: Option<Value>,
    },
    Device {
        listing: Listing,
        details: DeviceDetails,
    },
    StorageFolder(Listing),
    StorageFile(FileDetails),
    OriginalSharesRoot {
        listing: Listing,
        /// Base32 share id of the originating account
        share_id: Option<String>,
    },
    PublicSharesRoot(Listing),
    ShareRoom {
        listing: Listing,
        /// Room key the room is addressed by
        share_id: Option<String>,
        stats: RoomStats,
    },
    ShareFolder(Listing),
    ShareFile(FileDetails),
}

impl NodeBody {
    /// Fresh, unprovisioned body for `kind`.
    pub fn empty(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Dashboard => Self::Dashboard(DashboardState::default()),
            NodeKind::StorageRoot => Self::StorageRoot {
                listing: Listing::default(),
                stats: None,
            },
            NodeKind::Device => Self::Device {
                listing: Listing::default(),
                details: DeviceDetails::default(),
            },
            NodeKind::StorageFolder => Self::StorageFolder(Listing::default()),
            NodeKind::StorageFile => Self::StorageFile(FileDetails::default()),
            NodeKind::OriginalSharesRoot => Self::OriginalSharesRoot {
                listing: Listing::default(),
                share_id: None,
            },
            NodeKind::PublicSharesRoot => Self::PublicSharesRoot(Listing::default()),
            NodeKind::ShareRoom => Self::ShareRoom {
                listing: Listing::default(),
                share_id: None,
                stats: RoomStats::default(),
            },
            NodeKind::ShareFolder => Self::ShareFolder(Listing::default()),
            NodeKind::ShareFile => Self::ShareFile(FileDetails::default()),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Dashboard(_) => NodeKind::Dashboard,
            Self::StorageRoot { .. } => NodeKind::StorageRoot,
            Self::Device { .. } => NodeKind::Device,
            Self::StorageFolder(_) => NodeKind::StorageFolder,
            Self::StorageFile(_) => NodeKind::StorageFile,
            Self::OriginalSharesRoot { .. } => NodeKind::OriginalSharesRoot,
            Self::PublicSharesRoot(_) => NodeKind::PublicSharesRoot,
            Self::ShareRoom { .. } => NodeKind::ShareRoom,
            Self::ShareFolder(_) => NodeKind::ShareFolder,
            Self::ShareFile(_) => NodeKind::ShareFile,
        }
    }

    fn listing(&self) -> Option<&Listing> {
        match self {
            Self::StorageRoot { listing, .. }
            | Self::Device { listing, .. }
            | Self::OriginalSharesRoot { listing, .. }
            | Self::ShareRoom { listing, .. }
            | Self::StorageFolder(listing)
            | Self::PublicSharesRoot(listing)
            | Self::ShareFolder(listing) => Some(listing),
            Self::Dashboard(_) | Self::StorageFile(_) | Self::ShareFile(_) => None,
        }
    }

    fn listing_mut(&mut self) -> Option<&mut Listing> {
        match self {
            Self::StorageRoot { listing, .. }
            | Self::Device { listing, .. }
            | Self::OriginalSharesRoot { listing, .. }
            | Self::ShareRoom { listing, .. }
            | Self::StorageFolder(listing)
            | Self::PublicSharesRoot(listing)
            | Self::ShareFolder(listing) => Some(listing),
            Self::Dashboard(_) | Self::StorageFile(_) | Self::ShareFile(_) => None,
        }
    }
}

// =============================================================================
// ContentNode
// =============================================================================

/// One item of remote content, cached for the session.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentNode {
    url: String,
    root_url: String,
    parent_url: Option<String>,
    lastfetched: Option<u64>,
    presentation: Option<RenderHandle>,
    /// Display name, as last provisioned
    pub name: String,
    pub state: VisitState,
    pub body: NodeBody,
}

impl ContentNode {
    /// Create an unprovisioned node.
    ///
    /// Roots pass `parent_url: None` and get `root_url == url`.
    pub fn new(
        kind: NodeKind,
        url: impl Into<String>,
        parent_url: Option<String>,
        root_url: Option<String>,
    ) -> Self {
        let url = url.into();
        let root_url = root_url.unwrap_or_else(|| url.clone());
        Self {
            url,
            root_url,
            parent_url,
            lastfetched: None,
            presentation: None,
            name: String::new(),
            state: VisitState::default(),
            body: NodeBody::empty(kind),
        }
    }

    /// Canonical URL (no query string).
    pub fn url(&self) -> &str {
        &self.url
    }

    /// URL of the top of this node's collection.
    pub fn root_url(&self) -> &str {
        &self.root_url
    }

    pub fn parent_url(&self) -> Option<&str> {
        self.parent_url.as_deref()
    }

    /// Time of the last successful fetch (Unix milliseconds).
    pub fn lastfetched(&self) -> Option<u64> {
        self.lastfetched
    }

    pub fn kind(&self) -> NodeKind {
        self.body.kind()
    }

    pub fn is_container(&self) -> bool {
        self.kind().is_container()
    }

    pub fn is_device(&self) -> bool {
        self.kind().is_device()
    }

    /// True if the node is its collection's top-level item.
    pub fn is_root(&self) -> bool {
        self.url == self.root_url
    }

    /// Child container URLs; `None` for files and the dashboard.
    pub fn subdirs(&self) -> Option<&[String]> {
        self.body.listing().map(|l| l.subdirs.as_slice())
    }

    /// Child file URLs; `None` for files and the dashboard.
    pub fn files(&self) -> Option<&[String]> {
        self.body.listing().map(|l| l.files.as_slice())
    }

    pub fn listing(&self) -> Option<&Listing> {
        self.body.listing()
    }

    pub fn listing_mut(&mut self) -> Option<&mut Listing> {
        self.body.listing_mut()
    }

    /// URLs this node directly contains, for recursive release.
    pub fn contained_urls(&self) -> Vec<String> {
        match &self.body {
            NodeBody::Dashboard(state) => state
                .storage_devices
                .iter()
                .chain(&state.original_shares)
                .chain(&state.public_shares)
                .cloned()
                .collect(),
            body => body
                .listing()
                .map(|l| l.urls().cloned().collect())
                .unwrap_or_default(),
        }
    }

    /// True if provisioned data is considered current.
    ///
    /// A given `when` records a (new) fetch time first. There is no
    /// freshness heuristic: cached data always counts as stale.
    pub fn up_to_date(&mut self, when: Option<u64>) -> bool {
        if let Some(when) = when {
            self.stamp(when);
        }
        false
    }

    /// Record a fetch time. Never moves `lastfetched` backwards.
    pub fn stamp(&mut self, when: u64) {
        self.lastfetched = Some(self.lastfetched.map_or(when, |last| last.max(when)));
    }

    /// Take ownership of a rendered page, returning any page it replaces.
    pub fn attach_presentation(&mut self, handle: RenderHandle) -> Option<RenderHandle> {
        self.presentation.replace(handle)
    }

    pub fn presentation(&self) -> Option<&RenderHandle> {
        self.presentation.as_ref()
    }

    /// Release hook: detach the held presentation resource, if any.
    ///
    /// The dashboard's page belongs to the presenter, so nothing is detached.
    pub fn release(&mut self) -> Option<RenderHandle> {
        if self.kind() == NodeKind::Dashboard {
            return None;
        }
        self.presentation.take()
    }

    pub fn dashboard(&self) -> Option<&DashboardState> {
        match &self.body {
            NodeBody::Dashboard(state) => Some(state),
            _ => None,
        }
    }

    pub fn dashboard_mut(&mut self) -> Option<&mut DashboardState> {
        match &mut self.body {
            NodeBody::Dashboard(state) => Some(state),
            _ => None,
        }
    }

    pub fn file_details(&self) -> Option<&FileDetails> {
        match &self.body {
            NodeBody::StorageFile(details) | NodeBody::ShareFile(details) => Some(details),
            _ => None,
        }
    }

    pub fn file_details_mut(&mut self) -> Option<&mut FileDetails> {
        match &mut self.body {
            NodeBody::StorageFile(details) | NodeBody::ShareFile(details) => Some(details),
            _ => None,
        }
    }

    pub fn room_stats(&self) -> Option<&RoomStats> {
        match &self.body {
            NodeBody::ShareRoom { stats, .. } => Some(stats),
            _ => None,
        }
    }

    pub fn device_details(&self) -> Option<&DeviceDetails> {
        match &self.body {
            NodeBody::Device { details, .. } => Some(details),
            _ => None,
        }
    }
}

impl fmt::Display for ContentNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}: {}>", self.kind().emblem(), self.url)
    }
}
