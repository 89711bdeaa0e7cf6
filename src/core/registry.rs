//! Identity cache of content nodes, keyed by canonical URL.
//!
//! The registry owns every node. Nodes name their parent and children by
//! URL only, and those URLs are resolved here.

use std::collections::HashMap;

use super::classifier::Classifier;
use crate::core::error::ContentError;
use crate::models::{ContentNode, NodeKind, RenderHandle};
use crate::utils::strip_query;

/// URL-keyed arena of content nodes.
#[derive(Debug, Default)]
pub struct Registry {
    nodes: HashMap<String, ContentNode>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `url` to its node, creating it on first reference.
    ///
    /// The query string is ignored. `parent` decides the kind of top-level
    /// children (devices and share rooms) and supplies the new node's
    /// `root_url`; it is not consulted for existing nodes.
    pub fn get(
        &mut self,
        url: &str,
        parent: Option<&str>,
        classifier: &Classifier<'_>,
    ) -> Result<&mut ContentNode, ContentError> {
        let url = strip_query(url);
        if !self.nodes.contains_key(url) {
            let node = self.produce(url, parent.map(strip_query), classifier)?;
            log::debug!("registered {node}");
            self.nodes.insert(url.to_string(), node);
        }
        self.nodes
            .get_mut(url)
            .ok_or_else(|| ContentError::UnknownNode(url.to_string()))
    }

    fn produce(
        &self,
        url: &str,
        parent: Option<&str>,
        classifier: &Classifier<'_>,
    ) -> Result<ContentNode, ContentError> {
        if classifier.is_content_root_url(url) {
            let kind = classifier.root_kind(url).ok_or_else(|| {
                ContentError::Configuration(format!("content root {url} matches no root kind"))
            })?;
            return Ok(ContentNode::new(kind, url, None, None));
        }

        let parent_node = parent.and_then(|p| self.nodes.get(p));
        let parent_is_top = parent_node.is_some_and(|p| p.kind().is_root())
            || parent.is_some_and(|p| classifier.is_content_root_url(p));
        let is_storage = classifier.is_storage_url(url);

        let kind = if parent_is_top || classifier.is_share_room_url(url) {
            if is_storage && !classifier.is_share_room_url(url) {
                NodeKind::Device
            } else {
                NodeKind::ShareRoom
            }
        } else if !url.ends_with('/') {
            if is_storage {
                NodeKind::StorageFile
            } else {
                NodeKind::ShareFile
            }
        } else if is_storage {
            NodeKind::StorageFolder
        } else {
            NodeKind::ShareFolder
        };

        let parent_url = parent
            .map(str::to_string)
            .or_else(|| containing_url(url, classifier));
        let root_url = match parent_node {
            Some(p) if p.kind() == NodeKind::Dashboard => classifier.collection_root_for(url),
            Some(p) => Some(p.root_url()),
            None => classifier.collection_root_for(url),
        }
        .map(str::to_string);

        Ok(ContentNode::new(kind, url, parent_url, root_url))
    }

    pub fn lookup(&self, url: &str) -> Option<&ContentNode> {
        self.nodes.get(strip_query(url))
    }

    pub fn lookup_mut(&mut self, url: &str) -> Option<&mut ContentNode> {
        self.nodes.get_mut(strip_query(url))
    }

    pub fn contains(&self, url: &str) -> bool {
        self.nodes.contains_key(strip_query(url))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Registered URLs, in no particular order.
    pub fn urls(&self) -> impl Iterator<Item = &String> {
        self.nodes.keys()
    }

    /// Remove the node at `url`, returning the presentation it held.
    pub fn free(&mut self, url: &str) -> Option<RenderHandle> {
        let mut node = self.nodes.remove(strip_query(url))?;
        log::debug!("freed {node}");
        node.release()
    }

    /// Free `url` and everything it contains, children first.
    ///
    /// Nodes visited directly by URL are not listed by their parent, so
    /// non-root nodes registered under `url`'s path go as well, each with
    /// its own hierarchy. Other collection roots sharing the path prefix
    /// are left alone. Unknown URLs are ignored, so clearing twice is
    /// harmless.
    pub fn clear_hierarchy(&mut self, url: &str) -> Vec<RenderHandle> {
        let Some(node) = self.lookup(url) else {
            return Vec::new();
        };
        let mut released = Vec::new();
        for child in node.contained_urls() {
            released.extend(self.clear_hierarchy(&child));
        }
        let unlisted: Vec<String> = self
            .nodes
            .iter()
            .filter(|(key, node)| {
                key.len() > url.len() && key.starts_with(url) && !node.kind().is_root()
            })
            .map(|(key, _)| key.clone())
            .collect();
        for key in unlisted {
            released.extend(self.clear_hierarchy(&key));
        }
        released.extend(self.free(url));
        released
    }
}

/// URL of the folder containing `url`, bounded by its collection root.
fn containing_url(url: &str, classifier: &Classifier<'_>) -> Option<String> {
    let root = classifier.collection_root_for(url)?;
    let trimmed = url.strip_suffix('/').unwrap_or(url);
    let cut = trimmed.rfind('/')?;
    let candidate = &url[..=cut];
    if candidate.len() > root.len() && candidate.starts_with(root) {
        Some(candidate.to_string())
    } else {
        Some(root.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Session;

    const STORAGE: &str = "https://h/storage/MFWGSY3F/";
    const ORIGINAL: &str = "https://h/storage/MFWGSY3F/shares";
    const SHARES: &str = "https://h/share/";

    fn session() -> Session {
        let mut session = Session {
            username: Some("alice".into()),
            storage_root_url: Some(STORAGE.into()),
            original_shares_root_url: Some(ORIGINAL.into()),
            actual_shares_root_url: Some(SHARES.into()),
            ..Default::default()
        };
        session
            .original_share_room_urls
            .insert("https://h/share/SID/kitchen/".into());
        session
    }

    fn kind_of(registry: &mut Registry, session: &Session, url: &str, parent: Option<&str>) -> NodeKind {
        let classifier = Classifier::new(session, "dashboard");
        registry.get(url, parent, &classifier).unwrap().kind()
    }

    #[test]
    fn test_roots() {
        let session = session();
        let mut registry = Registry::new();
        assert_eq!(kind_of(&mut registry, &session, "dashboard", None), NodeKind::Dashboard);
        assert_eq!(kind_of(&mut registry, &session, STORAGE, None), NodeKind::StorageRoot);
        assert_eq!(
            kind_of(&mut registry, &session, ORIGINAL, None),
            NodeKind::OriginalSharesRoot
        );
        assert_eq!(kind_of(&mut registry, &session, SHARES, None), NodeKind::PublicSharesRoot);
        let root = registry.lookup(STORAGE).unwrap();
        assert!(root.is_root());
        assert_eq!(root.parent_url(), None);
    }

    #[test]
    fn test_contents_by_parent_and_shape() {
        let session = session();
        let mut registry = Registry::new();
        let device = format!("{STORAGE}d1/");
        let folder = format!("{STORAGE}d1/docs/");
        let file = format!("{STORAGE}d1/docs/a.txt");
        kind_of(&mut registry, &session, STORAGE, None);
        assert_eq!(kind_of(&mut registry, &session, &device, Some(STORAGE)), NodeKind::Device);
        assert_eq!(
            kind_of(&mut registry, &session, &folder, Some(&device)),
            NodeKind::StorageFolder
        );
        assert_eq!(kind_of(&mut registry, &session, &file, Some(&folder)), NodeKind::StorageFile);

        let room = "https://h/share/SID/kitchen/";
        assert_eq!(kind_of(&mut registry, &session, room, Some(ORIGINAL)), NodeKind::ShareRoom);
        assert_eq!(
            kind_of(&mut registry, &session, &format!("{room}pics/"), Some(room)),
            NodeKind::ShareFolder
        );
        assert_eq!(
            kind_of(&mut registry, &session, &format!("{room}x.png"), Some(room)),
            NodeKind::ShareFile
        );
    }

    #[test]
    fn test_root_url_follows_parent() {
        let session = session();
        let classifier = Classifier::new(&session, "dashboard");
        let mut registry = Registry::new();
        registry.get(STORAGE, None, &classifier).unwrap();
        let device = format!("{STORAGE}d1/");
        let folder = format!("{device}docs/");
        registry.get(&device, Some(STORAGE), &classifier).unwrap();
        let node = registry.get(&folder, Some(&device), &classifier).unwrap();
        assert_eq!(node.root_url(), STORAGE);
        assert_eq!(node.parent_url(), Some(device.as_str()));
    }

    #[test]
    fn test_identity_ignores_query() {
        let session = session();
        let classifier = Classifier::new(&session, "dashboard");
        let mut registry = Registry::new();
        let folder = format!("{STORAGE}d1/docs/");
        registry.get(&folder, None, &classifier).unwrap().name = "docs".into();
        let again = registry
            .get(&format!("{folder}?refresh=true"), None, &classifier)
            .unwrap();
        assert_eq!(again.name, "docs");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_parentless_content_derives_parent() {
        let session = session();
        let classifier = Classifier::new(&session, "dashboard");
        let mut registry = Registry::new();
        let node = registry
            .get(&format!("{STORAGE}d1/docs/"), None, &classifier)
            .unwrap();
        assert_eq!(node.parent_url(), Some(format!("{STORAGE}d1/").as_str()));
        assert_eq!(node.root_url(), STORAGE);
    }

    #[test]
    fn test_clear_hierarchy_is_post_order_and_idempotent() {
        let session = session();
        let classifier = Classifier::new(&session, "dashboard");
        let mut registry = Registry::new();
        let device = format!("{STORAGE}d1/");
        let file = format!("{device}a.txt");
        registry.get(STORAGE, None, &classifier).unwrap().listing_mut().unwrap().add_subdir(&device);
        let node = registry.get(&device, Some(STORAGE), &classifier).unwrap();
        node.listing_mut().unwrap().add_file(&file);
        node.attach_presentation(RenderHandle {
            id: 1,
            url: device.clone(),
        });
        registry.get(&file, Some(&device), &classifier).unwrap();
        registry.get(SHARES, None, &classifier).unwrap();

        let released = registry.clear_hierarchy(STORAGE);
        assert_eq!(released.len(), 1);
        assert!(!registry.contains(STORAGE));
        assert!(!registry.contains(&device));
        assert!(!registry.contains(&file));
        assert!(registry.contains(SHARES));

        assert!(registry.clear_hierarchy(STORAGE).is_empty());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_clear_hierarchy_frees_unlisted_descendants() {
        let session = session();
        let classifier = Classifier::new(&session, "dashboard");
        let mut registry = Registry::new();
        let folder = format!("{STORAGE}d1/docs/");
        registry.get(STORAGE, None, &classifier).unwrap();
        registry.get(&folder, None, &classifier).unwrap();

        registry.clear_hierarchy(STORAGE);
        assert!(!registry.contains(&folder));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_clear_hierarchy_keeps_sibling_root_under_same_prefix() {
        let session = session();
        let classifier = Classifier::new(&session, "dashboard");
        let mut registry = Registry::new();
        let room = "https://h/share/SID/kitchen/";
        registry.get(STORAGE, None, &classifier).unwrap();
        registry
            .get(ORIGINAL, None, &classifier)
            .unwrap()
            .listing_mut()
            .unwrap()
            .add_subdir(room);
        registry.get(room, Some(ORIGINAL), &classifier).unwrap();

        registry.clear_hierarchy(STORAGE);
        assert!(!registry.contains(STORAGE));
        assert!(registry.contains(ORIGINAL));
        assert!(registry.contains(room));

        registry.clear_hierarchy(ORIGINAL);
        assert!(registry.is_empty());
    }
}
