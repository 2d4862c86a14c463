use std::sync::Arc;

use futures::stream::FuturesUnordered;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::app::Result;
use crate::domain::FeedConfig;
use crate::fetcher::{fetch_feed, Fetcher};
use crate::normalizer::{Normalizer, ParsedFeed};

pub const DEFAULT_WORKERS: usize = 10;

/// Result of fetching one configured feed.
#[derive(Debug)]
pub struct FeedOutcome {
    pub location: String,
    pub result: Result<ParsedFeed>,
}

/// Fetches in completion order, so one slow feed does not hold back the rest.
pub type PendingFeeds = FuturesUnordered<JoinHandle<FeedOutcome>>;

pub struct ParallelFetcher {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    normalizer: Normalizer,
    semaphore: Arc<Semaphore>,
}

impl ParallelFetcher {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self::with_workers(fetcher, DEFAULT_WORKERS)
    }

    pub fn with_workers(fetcher: Arc<dyn Fetcher + Send + Sync>, workers: usize) -> Self {
        Self {
            fetcher,
            normalizer: Normalizer::new(),
            semaphore: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    /// Start fetching every feed. At most `workers` requests run at once.
    pub fn spawn_all(&self, feeds: &[FeedConfig]) -> PendingFeeds {
        feeds
            .iter()
            .map(|feed| {
                let fetcher = self.fetcher.clone();
                let normalizer = self.normalizer.clone();
                let semaphore = self.semaphore.clone();
                let location = feed.location.clone();

                tokio::spawn(async move {
                    let _permit = semaphore.acquire().await;
                    let result = fetch_feed(fetcher.as_ref(), &normalizer, &location).await;
                    FeedOutcome { location, result }
                })
            })
            .collect()
    }
}
