use chrono::{DateTime, Utc};
use html_escape::decode_html_entities;

use crate::app::{Result, SkimmerError};
use crate::domain::{Identity, RawItem};

pub const UNKNOWN_FEED_TITLE: &str = "Unknown Feed";
pub const DEFAULT_ITEM_TITLE: &str = "No Title";
pub const DEFAULT_ITEM_LINK: &str = "#";

#[derive(Debug, Clone)]
pub struct ParsedFeed {
    pub title: String,
    pub items: Vec<RawItem>,
}

#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, body: &[u8]) -> Result<ParsedFeed> {
        self.normalize_at(body, Utc::now())
    }

    /// Parse an RSS document. Entries missing a usable `<pubDate>` are dated `now`.
    ///
    /// Missing fields never drop an entry; they get defaults instead.
    pub fn normalize_at(&self, body: &[u8], now: DateTime<Utc>) -> Result<ParsedFeed> {
        let channel =
            rss::Channel::read_from(body).map_err(|e| SkimmerError::FeedParse(e.to_string()))?;

        let title = text(Some(channel.title())).unwrap_or_else(|| UNKNOWN_FEED_TITLE.to_string());

        let items = channel
            .items()
            .iter()
            .map(|entry| {
                let link = entry.link();
                RawItem {
                    identity: Identity::resolve(entry.guid().map(|g| g.value()), link),
                    title: text(entry.title()).unwrap_or_else(|| DEFAULT_ITEM_TITLE.to_string()),
                    link: text(link).unwrap_or_else(|| DEFAULT_ITEM_LINK.to_string()),
                    pub_date: entry.pub_date().and_then(parse_date).unwrap_or(now),
                }
            })
            .collect();

        Ok(ParsedFeed { title, items })
    }
}

fn text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| decode_html_entities(s).to_string())
}

/// RSS dates are RFC 2822, but plenty of feeds emit RFC 3339.
fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    DateTime::parse_from_rfc2822(s)
        .or_else(|_| DateTime::parse_from_rfc3339(s))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}
