//! Configuration management for Skimmer.
//!
//! Configuration is read from `~/.config/skimmer/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

pub mod keybindings;

pub use keybindings::KeybindingConfig;

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::FeedConfig;
use crate::fetcher::http_fetcher::DEFAULT_TIMEOUT_SECS;

pub const DEFAULT_FETCH_INTERVAL_MS: u64 = 60_000;

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Time between two update cycles.
    pub fetch_interval_ms: u64,
    /// Per-request HTTP timeout.
    pub request_timeout_secs: u64,
    /// Where the snapshot lives. Defaults to the platform data directory.
    pub data_file: Option<PathBuf>,
    pub feeds: Vec<FeedConfig>,
    pub keybindings: KeybindingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch_interval_ms: DEFAULT_FETCH_INTERVAL_MS,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            data_file: None,
            feeds: Vec::new(),
            keybindings: KeybindingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load and validate the configuration at `path`.
    ///
    /// Missing fields use default values.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate().map_err(|message| ConfigError::Invalid {
            path: path.to_path_buf(),
            message,
        })?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.fetch_interval_ms == 0 {
            return Err("fetch_interval_ms must be greater than zero".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than zero".to_string());
        }
        self.keybindings.validate()?;

        for (i, feed) in self.feeds.iter().enumerate() {
            if let Err(e) = feed.validate() {
                return Err(format!("feeds[{}]: {}", i, e));
            }
            if self.feeds[..i].iter().any(|f| f.location == feed.location) {
                return Err(format!("feeds[{}]: duplicate location {}", i, feed.location));
            }
        }

        Ok(())
    }

    pub fn fetch_interval(&self) -> Duration {
        Duration::from_millis(self.fetch_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Get the default config file path: `~/.config/skimmer/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("skimmer").join("config.toml"))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &PathBuf) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# Skimmer Configuration

# How often all feeds are fetched, in milliseconds
fetch_interval_ms = 60000

# HTTP request timeout in seconds
request_timeout_secs = 30

# Where read/dismissed state is kept (default: platform data directory)
# data_file = "/home/me/.local/share/skimmer/persisted_data.json"

# Feeds to follow. max_items limits how many of the newest stored
# entries of that feed are shown; leave it out to show all of them.
#
# [[feeds]]
# location = "https://example.com/feed"
# max_items = 100
#
# [[feeds]]
# location = "https://anotherdomain.com/feed"

# Keybindings can be specified as:
# - Single characters: "a", "A", "1"
# - Special keys: Enter, Tab, BackTab, Backspace, Delete, Home, End,
#   PageUp, PageDown, Up, Down, Left, Right, Esc, Space, F1-F12
# - With modifiers: "Ctrl+c", "Shift+Tab", "Alt+Enter"

[keybindings]
quit = ["q", "Ctrl+c"]
move_up = ["k", "Up"]
move_down = ["j", "Down"]
next_page = ["n", "PageDown"]
prev_page = ["p", "PageUp"]
open_link = ["o", "Enter"]
dismiss = ["d", "Delete"]
dismiss_all = ["D"]
refresh = ["R"]
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid config file at {path}: {message}")]
    Invalid { path: PathBuf, message: String },
}
