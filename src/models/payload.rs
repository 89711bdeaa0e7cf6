//! Wire shapes of the JSON content listings.
//!
//! Missing collections deserialize as empty so partial listings still
//! provision what they carry.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Storage root listing (`<storage root>?device_info=yes`).
#[derive(Clone, Debug, Default, Deserialize)]
pub struct StorageRootPayload {
    #[serde(default)]
    pub stats: Option<Value>,
    #[serde(default)]
    pub devices: Vec<DeviceEntry>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DeviceEntry {
    /// Device path segment, already URL-safe
    pub encoded: String,
    pub name: String,
    #[serde(default)]
    pub lastlogin: Option<i64>,
    #[serde(default)]
    pub lastcommit: Option<i64>,
}

/// Folder listing, shared by storage folders, devices and share folders.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FolderPayload {
    /// `[display name, relative path segment]` pairs
    #[serde(default)]
    pub dirs: Vec<(String, String)>,
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FileEntry {
    /// Path relative to the containing folder
    pub url: String,
    pub name: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub ctime: Option<i64>,
    #[serde(default)]
    pub mtime: Option<i64>,
    #[serde(default)]
    pub versions: Option<u64>,
    /// Anything else, including `preview_<N>` references
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FileEntry {
    /// Preview reference for `size`, if the server offered one.
    pub fn preview(&self, size: u32) -> Option<&Value> {
        self.extra.get(&format!("preview_{size}"))
    }
}

/// The account's own share rooms.
#[derive(Clone, Debug, Deserialize)]
pub struct OriginalSharesPayload {
    pub share_id_b32: String,
    #[serde(default)]
    pub share_rooms: Vec<RoomEntry>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RoomEntry {
    pub room_key: String,
    #[serde(default)]
    pub room_name: String,
    #[serde(default)]
    pub room_description: Option<String>,
}

/// Share room listing: a folder listing plus room statistics.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RoomPayload {
    #[serde(flatten)]
    pub folder: FolderPayload,
    #[serde(default)]
    pub stats: Option<RoomStatsPayload>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RoomStatsPayload {
    #[serde(default)]
    pub room_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub number_of_files: Option<u64>,
    #[serde(default)]
    pub number_of_folders: Option<u64>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
}
