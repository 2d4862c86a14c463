use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::Result;
use crate::config::Config;
use crate::controller::{Controller, SystemOpener};
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::parallel::{ParallelFetcher, DEFAULT_WORKERS};
use crate::fetcher::Fetcher;
use crate::store::JsonStore;

pub struct AppContext {
    pub config: Config,
    pub data_file: PathBuf,
    pub controller: Arc<Controller>,
}

impl AppContext {
    /// Wire the real HTTP fetcher, JSON store and system link opener.
    ///
    /// `data_file` overrides the path from the configuration.
    pub fn new(config: Config, data_file: Option<PathBuf>) -> Result<Self> {
        let data_file = Self::resolve_data_file(&config, data_file)?;

        let fetcher: Arc<dyn Fetcher + Send + Sync> =
            Arc::new(HttpFetcher::with_timeout(config.request_timeout())?);
        let parallel_fetcher = ParallelFetcher::with_workers(fetcher, DEFAULT_WORKERS);

        let controller = Controller::new(
            config.feeds.clone(),
            Box::new(JsonStore::new(&data_file)),
            parallel_fetcher,
            Box::new(SystemOpener),
        );

        Ok(Self {
            config,
            data_file,
            controller: Arc::new(controller),
        })
    }

    /// Command line first, then config, then the platform data directory.
    pub fn resolve_data_file(config: &Config, data_file: Option<PathBuf>) -> Result<PathBuf> {
        match data_file.or_else(|| config.data_file.clone()) {
            Some(p) => Ok(p),
            None => JsonStore::default_path(),
        }
    }
}
