use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::Item;

/// Everything the reader remembers between runs.
///
/// Items of each feed are kept in the order they first arrived. Sorting by
/// publication date happens only when a view is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "itemsByFeed", default)]
    pub items_by_feed: BTreeMap<String, Vec<Item>>,
    /// Tombstones. Never shrinks.
    #[serde(rename = "removedGUIDs", default)]
    pub removed_guids: BTreeSet<String>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self, location: &str) -> &[Item] {
        self.items_by_feed
            .get(location)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_removed(&self, guid: &str) -> bool {
        self.removed_guids.contains(guid)
    }

    pub fn total_items(&self) -> usize {
        self.items_by_feed.values().map(Vec::len).sum()
    }

    pub fn find(&self, guid: &str) -> Option<&Item> {
        self.items_by_feed
            .values()
            .flat_map(|items| items.iter())
            .find(|item| item.guid == guid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot_json_shape() {
        let json = serde_json::to_string(&Snapshot::new()).unwrap();
        assert_eq!(json, r#"{"itemsByFeed":{},"removedGUIDs":[]}"#);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let snapshot: Snapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(snapshot, Snapshot::new());
    }

    #[test]
    fn test_items_of_unknown_feed_is_empty() {
        let snapshot = Snapshot::new();
        assert!(snapshot.items("https://example.com/feed").is_empty());
        assert_eq!(snapshot.total_items(), 0);
    }
}
