//! # Skimmer
//!
//! A small RSS reader that remembers what you dismissed.
//!
//! ## Architecture
//!
//! ```text
//! Scheduler → Fetcher → Normalizer → Controller (ingest + store) → TUI / CLI
//! ```
//!
//! Feeds are fetched on an interval, new entries are appended to their
//! feed's stored list, and dismissed entries are remembered forever so a
//! feed re-publishing them does not bring them back.
//!
//! ## Quick Start
//!
//! ```bash
//! # Fetch all configured feeds once
//! skimmer update
//!
//! # Print what would be shown
//! skimmer list
//!
//! # Launch the TUI
//! skimmer
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the config,
/// store, fetcher and controller.
pub mod app;

/// Command-line interface using clap.
pub mod cli;

/// Configuration loaded from `~/.config/skimmer/config.toml`: the feed
/// list, fetch interval, data file and keybindings.
pub mod config;

/// Owner of the snapshot; applies user actions and update cycles.
pub mod controller;

/// Core domain models.
///
/// - [`Item`](domain::Item): A stored entry
/// - [`Identity`](domain::Identity): How an entry's guid was resolved
/// - [`Snapshot`](domain::Snapshot): Everything persisted between runs
/// - [`FeedConfig`](domain::FeedConfig): One configured feed
pub mod domain;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for feed fetching
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
/// - [`ParallelFetcher`](fetcher::parallel::ParallelFetcher): Concurrent fetching with semaphore
pub mod fetcher;

/// Merge, dismissal and view building over a [`Snapshot`](domain::Snapshot).
pub mod ingest;

/// RSS parsing into [`RawItem`](domain::RawItem)s.
pub mod normalizer;

/// Periodic, non-overlapping update cycles.
pub mod scheduler;

/// Snapshot persistence.
///
/// - [`Store`](store::Store): Trait defining storage operations
/// - [`JsonStore`](store::JsonStore): Single JSON file implementation
pub mod store;

/// Terminal user interface.
///
/// Keybindings: j/k navigate, o opens in browser and dismisses, d dismisses,
/// D dismisses everything, R refreshes, q quits.
pub mod tui;
