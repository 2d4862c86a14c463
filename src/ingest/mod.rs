//! Folding fetched entries into the snapshot.
//!
//! Every function here takes the snapshot by value and hands back the new
//! one. Nothing in this module does I/O; the
//! [`Controller`](crate::controller::Controller) persists the result.

use std::collections::HashSet;

use crate::domain::{FeedConfig, Item, RawItem, Snapshot};

/// Append the entries of `fresh` that the feed has not seen and the user has
/// not dismissed.
///
/// Stored items are never reordered or dropped here. Returns the new
/// snapshot together with the number of appended items.
pub fn merge(
    mut snapshot: Snapshot,
    location: &str,
    feed_title: &str,
    fresh: Vec<RawItem>,
) -> (Snapshot, usize) {
    let removed = &snapshot.removed_guids;
    let mut existing = snapshot.items_by_feed.remove(location).unwrap_or_default();
    let mut seen: HashSet<String> = existing.iter().map(|item| item.guid.clone()).collect();

    let before = existing.len();
    for raw in fresh {
        if removed.contains(raw.guid()) || !seen.insert(raw.guid().to_string()) {
            continue;
        }
        existing.push(Item::from_raw(raw, feed_title));
    }
    let added = existing.len() - before;

    snapshot.items_by_feed.insert(location.to_string(), existing);
    (snapshot, added)
}

/// Tombstone `guid` and drop it from every feed.
pub fn remove_item(mut snapshot: Snapshot, guid: &str) -> Snapshot {
    snapshot.removed_guids.insert(guid.to_string());
    for items in snapshot.items_by_feed.values_mut() {
        items.retain(|item| item.guid != guid);
    }
    snapshot
}

/// Tombstone every stored item and empty every feed.
///
/// Feed keys stay in place with empty collections.
pub fn remove_all(mut snapshot: Snapshot) -> Snapshot {
    for items in snapshot.items_by_feed.values_mut() {
        snapshot
            .removed_guids
            .extend(items.drain(..).map(|item| item.guid));
    }
    snapshot
}

/// The list the user sees: the newest `max_items` stored entries of each
/// feed, all feeds together, oldest publication date first.
///
/// Items with equal dates keep feed order: configured feeds as listed in
/// `feeds`, then feeds found only in the snapshot, which are shown uncapped.
pub fn view(snapshot: &Snapshot, feeds: &[FeedConfig]) -> Vec<Item> {
    let configured = feeds.iter().map(|feed| {
        let cap = feed.max_items.map(|n| n.get());
        (snapshot.items(&feed.location), cap)
    });
    let unconfigured = snapshot
        .items_by_feed
        .iter()
        .filter(|(location, _)| !feeds.iter().any(|feed| &feed.location == *location))
        .map(|(_, items)| (items.as_slice(), None));

    let mut all: Vec<Item> = configured
        .chain(unconfigured)
        .flat_map(|(items, cap)| {
            let cap = cap.unwrap_or(items.len());
            items[items.len().saturating_sub(cap)..].iter().cloned()
        })
        .collect();

    all.sort_by_key(|item| item.pub_date);
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Identity;
    use chrono::{DateTime, TimeZone, Utc};

    const FEED_X: &str = "https://x.example.com/feed";
    const FEED_Y: &str = "https://y.example.com/feed";

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn raw(guid: &str, secs: i64) -> RawItem {
        RawItem {
            identity: Identity::Guid(guid.to_string()),
            title: format!("Title {}", guid),
            link: format!("https://example.com/{}", guid),
            pub_date: at(secs),
        }
    }

    fn guids(items: &[Item]) -> Vec<&str> {
        items.iter().map(|item| item.guid.as_str()).collect()
    }

    #[test]
    fn test_merge_first_fetch_appends_all() {
        let (snapshot, added) = merge(Snapshot::new(), FEED_X, "X", vec![raw("a", 1), raw("b", 2)]);
        assert_eq!(added, 2);
        assert_eq!(guids(snapshot.items(FEED_X)), vec!["a", "b"]);
        assert_eq!(snapshot.items(FEED_X)[0].feed_title, "X");
    }

    #[test]
    fn test_merge_is_idempotent() {
        let (once, _) = merge(Snapshot::new(), FEED_X, "X", vec![raw("a", 1)]);
        let (twice, added) = merge(once.clone(), FEED_X, "X", vec![raw("a", 1)]);
        assert_eq!(added, 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_is_append_only() {
        let (snapshot, _) = merge(Snapshot::new(), FEED_X, "X", vec![raw("b", 20), raw("a", 10)]);
        let (snapshot, added) = merge(snapshot, FEED_X, "X", vec![raw("c", 5), raw("a", 10), raw("b", 20)]);
        assert_eq!(added, 1);
        assert_eq!(guids(snapshot.items(FEED_X)), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_merge_keeps_existing_copy_of_seen_guid() {
        let (snapshot, _) = merge(Snapshot::new(), FEED_X, "Old Title", vec![raw("a", 1)]);
        let mut updated = raw("a", 99);
        updated.title = "Edited".into();
        let (snapshot, _) = merge(snapshot, FEED_X, "New Title", vec![updated]);

        let stored = &snapshot.items(FEED_X)[0];
        assert_eq!(stored.title, "Title a");
        assert_eq!(stored.feed_title, "Old Title");
        assert_eq!(stored.pub_date, at(1));
    }

    #[test]
    fn test_merge_dedups_within_one_batch() {
        let (snapshot, added) = merge(Snapshot::new(), FEED_X, "X", vec![raw("a", 1), raw("a", 2)]);
        assert_eq!(added, 1);
        assert_eq!(snapshot.items(FEED_X)[0].pub_date, at(1));
    }

    #[test]
    fn test_unidentified_entries_collide() {
        let unidentified = |secs| RawItem {
            identity: Identity::Unidentified,
            title: "No Title".into(),
            link: "#".into(),
            pub_date: at(secs),
        };
        let (snapshot, added) =
            merge(Snapshot::new(), FEED_X, "X", vec![unidentified(1), unidentified(2)]);
        assert_eq!(added, 1);
        assert_eq!(guids(snapshot.items(FEED_X)), vec!["No GUID"]);
    }

    #[test]
    fn test_same_guid_in_two_feeds_is_kept_per_feed() {
        let (snapshot, _) = merge(Snapshot::new(), FEED_X, "X", vec![raw("shared", 1)]);
        let (snapshot, added) = merge(snapshot, FEED_Y, "Y", vec![raw("shared", 1)]);
        assert_eq!(added, 1);
        assert_eq!(snapshot.total_items(), 2);
    }

    #[test]
    fn test_removed_item_never_returns() {
        let (snapshot, _) = merge(Snapshot::new(), FEED_X, "X", vec![raw("a", 1), raw("b", 2)]);
        let snapshot = remove_item(snapshot, "a");
        assert_eq!(guids(snapshot.items(FEED_X)), vec!["b"]);

        let (snapshot, added) = merge(snapshot, FEED_X, "X", vec![raw("a", 1), raw("b", 2)]);
        assert_eq!(added, 0);
        assert_eq!(guids(snapshot.items(FEED_X)), vec!["b"]);
        assert!(snapshot.is_removed("a"));
    }

    #[test]
    fn test_remove_item_clears_every_feed() {
        let (snapshot, _) = merge(Snapshot::new(), FEED_X, "X", vec![raw("shared", 1)]);
        let (snapshot, _) = merge(snapshot, FEED_Y, "Y", vec![raw("shared", 1), raw("y", 2)]);
        let snapshot = remove_item(snapshot, "shared");
        assert!(snapshot.items(FEED_X).is_empty());
        assert_eq!(guids(snapshot.items(FEED_Y)), vec!["y"]);
    }

    #[test]
    fn test_remove_unknown_guid_still_tombstones() {
        let snapshot = remove_item(Snapshot::new(), "future");
        assert!(snapshot.is_removed("future"));

        let (snapshot, added) = merge(snapshot, FEED_X, "X", vec![raw("future", 1)]);
        assert_eq!(added, 0);
        assert!(snapshot.items(FEED_X).is_empty());
    }

    #[test]
    fn test_removed_set_only_grows() {
        let (snapshot, _) = merge(Snapshot::new(), FEED_X, "X", vec![raw("a", 1), raw("b", 2)]);
        let snapshot = remove_item(snapshot, "a");
        let before = snapshot.removed_guids.clone();

        let (snapshot, _) = merge(snapshot, FEED_X, "X", vec![raw("c", 3)]);
        let snapshot = remove_item(snapshot, "a");
        let snapshot = remove_all(snapshot);

        assert!(snapshot.removed_guids.is_superset(&before));
        assert_eq!(snapshot.removed_guids.len(), 3);
    }

    #[test]
    fn test_remove_all_two_feeds() {
        let (snapshot, _) = merge(Snapshot::new(), FEED_X, "X", vec![raw("x1", 1), raw("x2", 2)]);
        let (snapshot, _) = merge(snapshot, FEED_Y, "Y", vec![raw("y1", 3), raw("y2", 4)]);

        let snapshot = remove_all(snapshot);

        assert_eq!(snapshot.items_by_feed.len(), 2);
        assert!(snapshot.items(FEED_X).is_empty());
        assert!(snapshot.items(FEED_Y).is_empty());
        for guid in ["x1", "x2", "y1", "y2"] {
            assert!(snapshot.is_removed(guid), "{} should be tombstoned", guid);
        }
    }

    #[test]
    fn test_view_applies_cap_to_newest_stored() {
        let (snapshot, _) = merge(
            Snapshot::new(),
            FEED_X,
            "X",
            vec![raw("A", 1), raw("B", 2), raw("C", 3)],
        );
        let feeds = vec![FeedConfig::new(FEED_X).with_max_items(2)];
        assert_eq!(guids(&view(&snapshot, &feeds)), vec!["B", "C"]);
    }

    #[test]
    fn test_view_cap_follows_arrival_order_not_dates() {
        let (snapshot, _) = merge(
            Snapshot::new(),
            FEED_X,
            "X",
            vec![raw("A", 30), raw("B", 20), raw("C", 10)],
        );
        let feeds = vec![FeedConfig::new(FEED_X).with_max_items(2)];
        assert_eq!(guids(&view(&snapshot, &feeds)), vec!["C", "B"]);
    }

    #[test]
    fn test_view_sorts_across_feeds() {
        let (snapshot, _) = merge(Snapshot::new(), FEED_X, "X", vec![raw("x", 10)]);
        let (snapshot, _) = merge(snapshot, FEED_Y, "Y", vec![raw("y", 5)]);
        let feeds = vec![FeedConfig::new(FEED_X), FeedConfig::new(FEED_Y)];
        assert_eq!(guids(&view(&snapshot, &feeds)), vec!["y", "x"]);
    }

    #[test]
    fn test_view_equal_dates_follow_config_order() {
        let (snapshot, _) = merge(Snapshot::new(), FEED_X, "X", vec![raw("x", 7)]);
        let (snapshot, _) = merge(snapshot, FEED_Y, "Y", vec![raw("y", 7)]);
        let dropped = "https://a.example.com/feed";
        let (snapshot, _) = merge(snapshot, dropped, "Old", vec![raw("o", 7)]);

        let feeds = vec![FeedConfig::new(FEED_Y), FeedConfig::new(FEED_X)];
        assert_eq!(guids(&view(&snapshot, &feeds)), vec!["y", "x", "o"]);

        let feeds = vec![FeedConfig::new(FEED_X), FeedConfig::new(FEED_Y)];
        assert_eq!(guids(&view(&snapshot, &feeds)), vec!["x", "y", "o"]);
    }

    #[test]
    fn test_view_includes_unconfigured_feeds_uncapped() {
        let (snapshot, _) = merge(
            Snapshot::new(),
            FEED_Y,
            "Y",
            vec![raw("a", 1), raw("b", 2), raw("c", 3)],
        );
        let feeds = vec![FeedConfig::new(FEED_X).with_max_items(1)];
        assert_eq!(view(&snapshot, &feeds).len(), 3);
    }

    #[test]
    fn test_view_does_not_mutate() {
        let (snapshot, _) = merge(Snapshot::new(), FEED_X, "X", vec![raw("a", 2), raw("b", 1)]);
        let before = snapshot.clone();
        let _ = view(&snapshot, &[FeedConfig::new(FEED_X).with_max_items(1)]);
        assert_eq!(snapshot, before);
    }
}
