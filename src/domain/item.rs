use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Key used for entries that carry neither a `<guid>` nor a `<link>`.
///
/// Every such entry of a feed resolves to this same key, so only the first
/// one ever survives a merge.
pub const UNIDENTIFIED_GUID: &str = "No GUID";

/// A stored feed entry, as written to the snapshot file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub title: String,
    pub link: String,
    pub guid: String,
    pub feed_title: String,
    pub pub_date: DateTime<Utc>,
}

impl Item {
    /// Attach a parsed entry to the feed it was fetched from.
    pub fn from_raw(raw: RawItem, feed_title: &str) -> Self {
        Self {
            guid: raw.identity.key().to_string(),
            title: raw.title,
            link: raw.link,
            feed_title: feed_title.to_string(),
            pub_date: raw.pub_date,
        }
    }

    /// Whether the link points anywhere. Entries without a `<link>` get `"#"`.
    pub fn has_link(&self) -> bool {
        !self.link.is_empty() && self.link != "#"
    }
}

/// How an entry's identity was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// The entry had a non-empty `<guid>`.
    Guid(String),
    /// No guid; the entry's link stands in for it.
    FallbackLink(String),
    /// Neither guid nor link. Collides with every other unidentified entry.
    Unidentified,
}

impl Identity {
    /// Resolve the guid → link → sentinel chain. Empty strings count as absent.
    pub fn resolve(guid: Option<&str>, link: Option<&str>) -> Self {
        if let Some(guid) = non_empty(guid) {
            Identity::Guid(guid)
        } else if let Some(link) = non_empty(link) {
            Identity::FallbackLink(link)
        } else {
            Identity::Unidentified
        }
    }

    /// The string used for deduplication and tombstoning.
    pub fn key(&self) -> &str {
        match self {
            Identity::Guid(s) | Identity::FallbackLink(s) => s,
            Identity::Unidentified => UNIDENTIFIED_GUID,
        }
    }

    pub fn is_unidentified(&self) -> bool {
        matches!(self, Identity::Unidentified)
    }
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// An entry as produced by the normalizer, before it is merged into a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawItem {
    pub identity: Identity,
    pub title: String,
    pub link: String,
    pub pub_date: DateTime<Utc>,
}

impl RawItem {
    pub fn guid(&self) -> &str {
        self.identity.key()
    }
}
