use std::fs::{self, File};
use std::path::Path;
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use skimmer::app::AppContext;
use skimmer::cli::{commands, Cli, Commands};
use skimmer::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_file = AppContext::resolve_data_file(&config, cli.data_file)?;

    // The TUI owns the terminal, so its logs go to a file.
    if command == Commands::Tui {
        init_tracing_to_file(&data_file.with_file_name("skimmer.log"));
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(env_filter())
            .init();
    }

    let ctx = AppContext::new(config, Some(data_file))?;

    match command {
        Commands::Tui => skimmer::tui::run(&ctx).await?,
        Commands::Update => commands::update_feeds(&ctx).await?,
        Commands::List => commands::list_items(&ctx).await?,
        Commands::Dismiss { guid } => commands::dismiss(&ctx, &guid).await?,
        Commands::DismissAll => commands::dismiss_all(&ctx).await?,
        Commands::Open { guid } => commands::open_item(&ctx, &guid).await?,
        Commands::Daemon {
            interval,
            no_initial_update,
        } => commands::run_daemon(&ctx, interval.as_deref(), no_initial_update).await?,
    }

    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_tracing_to_file(path: &Path) {
    let file = path
        .parent()
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|_| File::options().create(true).append(true).open(path));

    match file {
        Ok(file) => tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter())
            .init(),
        Err(_) => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::sink))
            .with(env_filter())
            .init(),
    }
}
