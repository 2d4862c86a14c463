//! Single owner of the [`Snapshot`].
//!
//! Every change (a merged feed, a dismissal) is applied under one lock and
//! written to the store before the lock is released, then announced to
//! subscribers as a fresh view.

use std::mem;
use std::sync::Arc;
use std::time::Instant;

use futures::StreamExt;
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info, warn};

use crate::domain::{FeedConfig, Item, Snapshot};
use crate::fetcher::parallel::{FeedOutcome, ParallelFetcher};
use crate::ingest;
use crate::normalizer::ParsedFeed;
use crate::store::{self, Store};

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Open the link externally, then dismiss the item.
    OpenLink { link: String, guid: String },
    Dismiss { guid: String },
    DismissAll,
}

/// Hands links to whatever the desktop uses to open them.
pub trait LinkOpener {
    fn open(&self, link: &str) -> std::io::Result<()>;
}

pub struct SystemOpener;

impl LinkOpener for SystemOpener {
    fn open(&self, link: &str) -> std::io::Result<()> {
        open::that(link)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleReport {
    Completed { added: usize, failed: usize },
    /// Another cycle was still running.
    Skipped,
}

pub type View = Arc<Vec<Item>>;

pub struct Controller {
    feeds: Vec<FeedConfig>,
    store: Box<dyn Store + Send + Sync>,
    fetcher: ParallelFetcher,
    opener: Box<dyn LinkOpener + Send + Sync>,
    snapshot: Mutex<Snapshot>,
    cycle: Mutex<()>,
    view_tx: watch::Sender<View>,
}

impl Controller {
    /// Build a controller around the state found in `store`.
    pub fn new(
        feeds: Vec<FeedConfig>,
        store: Box<dyn Store + Send + Sync>,
        fetcher: ParallelFetcher,
        opener: Box<dyn LinkOpener + Send + Sync>,
    ) -> Self {
        let snapshot = crate::store::load_or_empty(store.as_ref());
        let (view_tx, _) = watch::channel(Arc::new(ingest::view(&snapshot, &feeds)));

        Self {
            feeds,
            store,
            fetcher,
            opener,
            snapshot: Mutex::new(snapshot),
            cycle: Mutex::new(()),
            view_tx,
        }
    }

    pub fn feeds(&self) -> &[FeedConfig] {
        &self.feeds
    }

    /// Receives a new view after every change.
    pub fn subscribe(&self) -> watch::Receiver<View> {
        self.view_tx.subscribe()
    }

    pub async fn view(&self) -> Vec<Item> {
        let snapshot = self.snapshot.lock().await;
        ingest::view(&snapshot, &self.feeds)
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.snapshot.lock().await.clone()
    }

    pub async fn find(&self, guid: &str) -> Option<Item> {
        self.snapshot.lock().await.find(guid).cloned()
    }

    pub fn is_refreshing(&self) -> bool {
        self.cycle.try_lock().is_err()
    }

    /// Carry out a user action. Returns once the new state is saved.
    pub async fn apply(&self, action: Action) {
        match action {
            Action::OpenLink { link, guid } => {
                if link.is_empty() || link == "#" {
                    warn!("Item {} has no link to open", guid);
                } else if let Err(e) = self.opener.open(&link) {
                    warn!("Failed to open {}: {}", link, e);
                }
                self.dismiss(&guid).await;
            }
            Action::Dismiss { guid } => self.dismiss(&guid).await,
            Action::DismissAll => {
                let mut snapshot = self.snapshot.lock().await;
                let count = snapshot.total_items();
                *snapshot = ingest::remove_all(mem::take(&mut *snapshot));
                self.flush(&snapshot);
                info!("Dismissed all {} items", count);
            }
        }
    }

    async fn dismiss(&self, guid: &str) {
        let mut snapshot = self.snapshot.lock().await;
        *snapshot = ingest::remove_item(mem::take(&mut *snapshot), guid);
        self.flush(&snapshot);
        debug!("Dismissed {}", guid);
    }

    /// Fetch every configured feed and merge whatever comes back.
    ///
    /// Feeds are merged one at a time as their fetches finish. A failing
    /// feed is logged and skipped. If a cycle is already running this one
    /// does nothing.
    pub async fn refresh(&self) -> CycleReport {
        let Ok(_running) = self.cycle.try_lock() else {
            info!("Update already in progress, skipping");
            return CycleReport::Skipped;
        };

        if self.feeds.is_empty() {
            info!("No feeds configured");
            return CycleReport::Completed { added: 0, failed: 0 };
        }

        let start = Instant::now();
        let mut pending = self.fetcher.spawn_all(&self.feeds);
        let mut added = 0;
        let mut failed = 0;

        while let Some(joined) = pending.next().await {
            match joined {
                Ok(FeedOutcome {
                    location,
                    result: Ok(parsed),
                }) => {
                    added += self.merge_feed(&location, parsed).await;
                }
                Ok(FeedOutcome {
                    location,
                    result: Err(e),
                }) => {
                    failed += 1;
                    warn!("Error updating {}: {}", location, e);
                }
                Err(e) => {
                    failed += 1;
                    error!("Task join error: {}", e);
                }
            }
        }

        info!(
            "Update complete: {} new items, {} errors ({:.1}s)",
            added,
            failed,
            start.elapsed().as_secs_f64()
        );
        CycleReport::Completed { added, failed }
    }

    async fn merge_feed(&self, location: &str, parsed: ParsedFeed) -> usize {
        let unidentified = parsed
            .items
            .iter()
            .filter(|item| item.identity.is_unidentified())
            .count();
        if unidentified > 1 {
            warn!(
                "{} entries in {} have neither guid nor link and count as one item",
                unidentified, location
            );
        }

        let mut snapshot = self.snapshot.lock().await;
        let known = snapshot.items_by_feed.contains_key(location);
        let (merged, added) =
            ingest::merge(mem::take(&mut *snapshot), location, &parsed.title, parsed.items);
        *snapshot = merged;

        if added > 0 || !known {
            self.flush(&snapshot);
        }
        if added > 0 {
            info!("Added {} new items from {}", added, parsed.title);
        } else {
            debug!("Nothing new from {}", location);
        }
        added
    }

    /// Save, then publish. Must be called with the snapshot lock held.
    fn flush(&self, snapshot: &Snapshot) {
        store::save_or_warn(self.store.as_ref(), snapshot);
        self.view_tx
            .send_replace(Arc::new(ingest::view(snapshot, &self.feeds)));
    }
}
