use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::app::Result;

/// One configured feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Feed URL. Also the key of the feed's collection in the snapshot.
    pub location: String,
    /// Only the newest `max_items` stored entries are shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<NonZeroUsize>,
}

impl FeedConfig {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            max_items: None,
        }
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = NonZeroUsize::new(max_items);
        self
    }

    /// Check that the location is an absolute http(s) URL.
    pub fn validate(&self) -> Result<Url> {
        let url = Url::parse(&self.location)?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(crate::app::SkimmerError::Other(format!(
                "Unsupported scheme '{}' in feed location {}",
                other, self.location
            ))),
        }
    }
}
