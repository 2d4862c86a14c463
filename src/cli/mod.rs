pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "skimmer")]
#[command(about = "A small RSS reader that remembers what you dismissed", long_about = None)]
pub struct Cli {
    /// Path to the config file (default: ~/.config/skimmer/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the saved state file, overriding the config
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Launch the TUI (default)
    Tui,
    /// Fetch all feeds once
    Update,
    /// List the items that would be shown
    List,
    /// Dismiss one item by its guid
    Dismiss {
        /// Guid of the item, as printed by `list`
        guid: String,
    },
    /// Dismiss every stored item
    DismissAll,
    /// Open an item's link in the browser and dismiss it
    Open {
        /// Guid of the item, as printed by `list`
        guid: String,
    },
    /// Keep fetching in the foreground until interrupted
    Daemon {
        /// Update interval (e.g., "90s", "30m", "1h"); defaults to the config value
        #[arg(short, long)]
        interval: Option<String>,

        /// Skip initial update on start
        #[arg(long)]
        no_initial_update: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::try_parse_from(["skimmer"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_global_paths_after_subcommand() {
        let cli = Cli::try_parse_from(["skimmer", "list", "--data-file", "/tmp/state.json"]).unwrap();
        assert_eq!(cli.command, Some(Commands::List));
        assert_eq!(cli.data_file, Some(PathBuf::from("/tmp/state.json")));
    }

    #[test]
    fn test_daemon_flags() {
        let cli =
            Cli::try_parse_from(["skimmer", "daemon", "-i", "30m", "--no-initial-update"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Daemon {
                interval: Some("30m".to_string()),
                no_initial_update: true,
            })
        );
    }

    #[test]
    fn test_dismiss_requires_guid() {
        assert!(Cli::try_parse_from(["skimmer", "dismiss"]).is_err());
    }
}
