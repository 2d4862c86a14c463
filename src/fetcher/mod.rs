pub mod http_fetcher;
pub mod parallel;

use async_trait::async_trait;

use crate::app::Result;
use crate::normalizer::{Normalizer, ParsedFeed};

#[async_trait]
pub trait Fetcher {
    /// Retrieve the raw feed document at `url`.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Fetch one feed and parse it into its title and entries.
pub async fn fetch_feed(
    fetcher: &(dyn Fetcher + Send + Sync),
    normalizer: &Normalizer,
    location: &str,
) -> Result<ParsedFeed> {
    let body = fetcher.fetch(location).await?;
    normalizer.normalize(&body)
}
