//! Provisioning: assimilating fetched JSON into nodes and their children.
//!
//! Re-provisioning overwrites scalar fields and appends only child URLs
//! not already listed, so repeated visits never duplicate entries.

use serde::Deserialize;
use serde_json::Value;

use super::tree::ContentTree;
use crate::core::error::ContentError;
use crate::models::payload::{
    FolderPayload, OriginalSharesPayload, RoomPayload, RoomStatsPayload, StorageRootPayload,
};
use crate::models::{ContentNode, NodeBody, NodeKind, VisitState};

impl ContentTree {
    /// Provision the node at `url` with `data` fetched at `when`.
    ///
    /// The fetch time is recorded only once the payload has been taken in,
    /// so a malformed payload leaves `lastfetched` where it was.
    pub fn provision(
        &mut self,
        url: &str,
        data: &Value,
        when: Option<u64>,
    ) -> Result<(), ContentError> {
        let (kind, when) = self.provision_preliminaries(url, when)?;
        match kind {
            NodeKind::Dashboard => {}
            NodeKind::StorageRoot => self.populate_storage_root(url, data)?,
            NodeKind::Device | NodeKind::StorageFolder | NodeKind::ShareFolder => {
                let payload = parse::<FolderPayload>(url, data)?;
                self.populate_folder(url, &payload)?;
            }
            NodeKind::ShareRoom => self.populate_room(url, data)?,
            NodeKind::OriginalSharesRoot => self.populate_original_shares(url, data)?,
            NodeKind::PublicSharesRoot => self.populate_public_shares(url, data)?,
            NodeKind::StorageFile | NodeKind::ShareFile => {
                return Err(ContentError::NotImplemented("File preview".to_string()));
            }
        }
        let node = self.expect_node(url)?;
        node.stamp(when);
        node.state = VisitState::Provisioned;
        Ok(())
    }

    /// Check the fetch time and that the node exists.
    fn provision_preliminaries(
        &self,
        url: &str,
        when: Option<u64>,
    ) -> Result<(NodeKind, u64), ContentError> {
        let when = when.ok_or_else(|| ContentError::MissingTimestamp(url.to_string()))?;
        let node = self
            .node(url)
            .ok_or_else(|| ContentError::UnknownNode(url.to_string()))?;
        Ok((node.kind(), when))
    }

    fn populate_storage_root(&mut self, url: &str, data: &Value) -> Result<(), ContentError> {
        let payload = parse::<StorageRootPayload>(url, data)?;
        let mut device_urls = Vec::with_capacity(payload.devices.len());
        for device in &payload.devices {
            let device_url = format!("{url}{}/", device.encoded);
            let node = self.get(&device_url, Some(url))?;
            node.name = device.name.clone();
            if let NodeBody::Device { details, .. } = &mut node.body {
                details.lastlogin = device.lastlogin;
                details.lastcommit = device.lastcommit;
            }
            device_urls.push(device_url);
        }

        let node = self.expect_node(url)?;
        if let NodeBody::StorageRoot { listing, stats } = &mut node.body {
            *stats = payload.stats;
            for device_url in &device_urls {
                listing.add_subdir(device_url);
            }
        }
        Ok(())
    }

    fn populate_folder(&mut self, url: &str, payload: &FolderPayload) -> Result<(), ContentError> {
        let mut subdirs = Vec::with_capacity(payload.dirs.len());
        for (name, segment) in &payload.dirs {
            let child_url = format!("{url}{segment}");
            self.get(&child_url, Some(url))?.name = name.clone();
            subdirs.push(child_url);
        }

        let preview_sizes = self.deployment.preview_sizes.clone();
        let mut files = Vec::with_capacity(payload.files.len());
        for entry in &payload.files {
            let child_url = format!("{url}{}", entry.url);
            let node = self.get(&child_url, Some(url))?;
            node.name = entry.name.clone();
            if let Some(details) = node.file_details_mut() {
                details.size = entry.size;
                details.ctime = entry.ctime;
                details.mtime = entry.mtime;
                details.versions = entry.versions;
                for &size in &preview_sizes {
                    if let Some(preview) = entry.preview(size) {
                        details.previews.insert(size, preview.clone());
                    }
                }
            }
            files.push(child_url);
        }

        let node = self.expect_node(url)?;
        if let Some(listing) = node.listing_mut() {
            for child_url in &subdirs {
                listing.add_subdir(child_url);
            }
            for child_url in &files {
                listing.add_file(child_url);
            }
        }
        Ok(())
    }

    fn populate_room(&mut self, url: &str, data: &Value) -> Result<(), ContentError> {
        let payload = parse::<RoomPayload>(url, data)?;
        self.populate_folder(url, &payload.folder)?;

        let Some(stats_payload) = payload.stats else {
            return Ok(());
        };
        let RoomStatsPayload {
            room_name,
            description,
            number_of_files,
            number_of_folders,
            firstname,
            lastname,
        } = stats_payload;

        let node = self.expect_node(url)?;
        if let Some(name) = room_name {
            node.name = name;
        }
        if let NodeBody::ShareRoom { stats, .. } = &mut node.body {
            stats.description = description;
            stats.number_of_files = number_of_files;
            stats.number_of_folders = number_of_folders;
            stats.firstname = firstname;
            stats.lastname = lastname;
        }
        Ok(())
    }

    fn populate_original_shares(&mut self, url: &str, data: &Value) -> Result<(), ContentError> {
        let payload = parse::<OriginalSharesPayload>(url, data)?;
        let shares_root = self
            .session
            .actual_shares_root_url()
            .map(str::to_string)
            .ok_or_else(|| ContentError::Configuration("no share root registered".to_string()))?;
        let base = format!("{shares_root}{}/", payload.share_id_b32);

        let mut rooms = Vec::with_capacity(payload.share_rooms.len());
        for room in &payload.share_rooms {
            let room_url = format!("{base}{}/", room.room_key);
            // Membership first, so the room classifies as a room.
            self.session.original_share_room_urls.insert(room_url.clone());
            let node = self.get(&room_url, Some(url))?;
            node.name = room.room_name.clone();
            if let NodeBody::ShareRoom {
                share_id, stats, ..
            } = &mut node.body
            {
                *share_id = Some(room.room_key.clone());
                stats.description = room.room_description.clone();
            }
            rooms.push(room_url);
        }

        let node = self.expect_node(url)?;
        if let NodeBody::OriginalSharesRoot { listing, share_id } = &mut node.body {
            *share_id = Some(payload.share_id_b32);
            for room_url in &rooms {
                listing.add_subdir(room_url);
            }
        }
        Ok(())
    }

    /// Public rooms are known from membership; a listing may add more.
    fn populate_public_shares(&mut self, url: &str, data: &Value) -> Result<(), ContentError> {
        let payload = if data.is_null() {
            FolderPayload::default()
        } else {
            parse::<FolderPayload>(url, data)?
        };
        for (_, segment) in &payload.dirs {
            self.session
                .public_share_room_urls
                .insert(format!("{url}{segment}"));
        }

        let rooms: Vec<String> = self
            .session
            .public_share_room_urls
            .iter()
            .filter(|room| room.starts_with(url))
            .cloned()
            .collect();
        for room_url in &rooms {
            let node = self.get(room_url, Some(url))?;
            if node.name.is_empty() {
                node.name = payload
                    .dirs
                    .iter()
                    .find(|(_, segment)| format!("{url}{segment}") == *room_url)
                    .map(|(name, _)| name.clone())
                    .unwrap_or_default();
            }
        }

        let node = self.expect_node(url)?;
        if let Some(listing) = node.listing_mut() {
            for room_url in &rooms {
                listing.add_subdir(room_url);
            }
        }
        Ok(())
    }

    fn expect_node(&mut self, url: &str) -> Result<&mut ContentNode, ContentError> {
        self.node_mut(url)
            .ok_or_else(|| ContentError::UnknownNode(url.to_string()))
    }
}

/// Deserialize `data` as the payload shape expected at `url`.
fn parse<'de, T: Deserialize<'de>>(url: &str, data: &'de Value) -> Result<T, ContentError> {
    T::deserialize(data).map_err(|e| ContentError::MalformedPayload {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::config::Deployment;

    const STORAGE: &str = "https://h/storage/MFWGSY3F/";

    fn tree() -> ContentTree {
        let mut tree = ContentTree::new(Deployment::for_host("https://h"));
        tree.register_storage_account("alice", "https://h", "/storage/MFWGSY3F/")
            .unwrap();
        tree
    }

    #[test]
    fn test_missing_timestamp() {
        let mut tree = tree();
        let err = tree.provision(STORAGE, &json!({}), None).unwrap_err();
        assert_eq!(err, ContentError::MissingTimestamp(STORAGE.to_string()));
    }

    #[test]
    fn test_storage_root_devices() {
        let mut tree = tree();
        let data = json!({
            "stats": {"size": 10},
            "devices": [
                {"encoded": "laptop", "name": "Laptop", "lastlogin": 5, "lastcommit": 6},
                {"encoded": "phone", "name": "Phone"}
            ]
        });
        tree.provision(STORAGE, &data, Some(100)).unwrap();
        tree.provision(STORAGE, &data, Some(200)).unwrap();

        let root = tree.node(STORAGE).unwrap();
        assert_eq!(
            root.subdirs().unwrap(),
            [format!("{STORAGE}laptop/"), format!("{STORAGE}phone/")]
        );
        assert_eq!(root.lastfetched(), Some(200));
        assert_eq!(root.state, VisitState::Provisioned);
        let NodeBody::StorageRoot { stats, .. } = &root.body else {
            panic!("expected storage root");
        };
        assert_eq!(stats, &Some(json!({"size": 10})));

        let laptop = tree.node(&format!("{STORAGE}laptop/")).unwrap();
        assert_eq!(laptop.kind(), NodeKind::Device);
        assert_eq!(laptop.name, "Laptop");
        assert_eq!(laptop.device_details().unwrap().lastcommit, Some(6));
        assert_eq!(laptop.root_url(), STORAGE);
    }

    #[test]
    fn test_folder_listing() {
        let mut tree = tree();
        let folder = format!("{STORAGE}laptop/room/");
        tree.get(&folder, None).unwrap();
        let data = json!({
            "dirs": [["Photos", "photos/"]],
            "files": [{"url": "a.txt", "name": "a.txt", "size": 120,
                       "ctime": 0, "mtime": 0, "versions": 1, "preview_25": "p25"}]
        });
        tree.provision(&folder, &data, Some(1)).unwrap();

        let node = tree.node(&folder).unwrap();
        assert_eq!(node.subdirs().unwrap(), [format!("{folder}photos/")]);
        assert_eq!(node.files().unwrap(), [format!("{folder}a.txt")]);

        let file = tree.node(&format!("{folder}a.txt")).unwrap();
        assert_eq!(file.kind(), NodeKind::StorageFile);
        let details = file.file_details().unwrap();
        assert_eq!(details.size, Some(120));
        assert_eq!(details.versions, Some(1));
        assert_eq!(details.previews.get(&25), Some(&json!("p25")));
        assert_eq!(
            tree.node(&format!("{folder}photos/")).map(|n| n.name.as_str()),
            Some("Photos")
        );
    }

    #[test]
    fn test_superset_listing_does_not_duplicate() {
        let mut tree = tree();
        let folder = format!("{STORAGE}laptop/docs/");
        tree.get(&folder, None).unwrap();
        tree.provision(&folder, &json!({"dirs": [["A", "a/"]], "files": []}), Some(1))
            .unwrap();
        tree.provision(
            &folder,
            &json!({"dirs": [["B", "b/"], ["A", "a/"]], "files": []}),
            Some(2),
        )
        .unwrap();
        assert_eq!(
            tree.node(&folder).unwrap().subdirs().unwrap(),
            [format!("{folder}a/"), format!("{folder}b/")]
        );
    }

    #[test]
    fn test_original_shares_register_membership() {
        let mut tree = tree();
        let root = format!("{STORAGE}shares");
        tree.get(&root, None).unwrap();
        let data = json!({
            "share_id_b32": "MFWGSY3F",
            "share_rooms": [{"room_key": "kitchen", "room_name": "Kitchen",
                             "room_description": "Recipes"}]
        });
        tree.provision(&root, &data, Some(1)).unwrap();

        let room_url = "https://h/share/MFWGSY3F/kitchen/";
        assert!(tree.classifier().is_original_share_room_url(room_url));
        let room = tree.node(room_url).unwrap();
        assert_eq!(room.kind(), NodeKind::ShareRoom);
        assert_eq!(room.name, "Kitchen");
        assert_eq!(room.room_stats().unwrap().description.as_deref(), Some("Recipes"));
        assert_eq!(room.root_url(), root);
        assert_eq!(tree.node(&root).unwrap().subdirs().unwrap(), [room_url]);
    }

    #[test]
    fn test_room_stats() {
        let mut tree = tree();
        let room_url = tree.add_public_share_room("bob", "pw").unwrap();
        let data = json!({
            "dirs": [],
            "files": [{"url": "x.png", "name": "x.png"}],
            "stats": {"room_name": "Bob's", "description": "Pics",
                      "number_of_files": 1, "number_of_folders": 0,
                      "firstname": "Bob", "lastname": "B"}
        });
        tree.provision(&room_url, &data, Some(1)).unwrap();
        let room = tree.node(&room_url).unwrap();
        assert_eq!(room.name, "Bob's");
        let stats = room.room_stats().unwrap();
        assert_eq!(stats.number_of_files, Some(1));
        assert_eq!(stats.firstname.as_deref(), Some("Bob"));
        assert_eq!(
            tree.node(&format!("{room_url}x.png")).map(ContentNode::kind),
            Some(NodeKind::ShareFile)
        );
    }

    #[test]
    fn test_public_shares_from_membership() {
        let mut tree = tree();
        let room_url = tree.add_public_share_room("bob", "pw").unwrap();
        tree.provision("https://h/share/", &Value::Null, Some(1)).unwrap();
        assert_eq!(
            tree.node("https://h/share/").unwrap().subdirs().unwrap(),
            [room_url]
        );
    }

    #[test]
    fn test_file_provisioning_not_implemented() {
        let mut tree = tree();
        let file = format!("{STORAGE}laptop/a.txt");
        tree.get(&file, None).unwrap();
        assert_eq!(
            tree.provision(&file, &json!({}), Some(1)),
            Err(ContentError::NotImplemented("File preview".into()))
        );
    }

    #[test]
    fn test_malformed_payload_keeps_lastfetched() {
        let mut tree = tree();
        tree.provision(STORAGE, &json!({"devices": []}), Some(100))
            .unwrap();
        let err = tree
            .provision(STORAGE, &json!({"devices": "nope"}), Some(500))
            .unwrap_err();
        assert!(matches!(err, ContentError::MalformedPayload { .. }));
        assert_eq!(tree.node(STORAGE).unwrap().lastfetched(), Some(100));
    }
}
