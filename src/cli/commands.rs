use tokio::sync::watch;

use crate::app::{AppContext, Result, SkimmerError};
use crate::controller::{Action, CycleReport};
use crate::domain::Item;
use crate::scheduler::{Scheduler, SchedulerConfig};

pub async fn update_feeds(ctx: &AppContext) -> Result<()> {
    let feeds = ctx.controller.feeds();
    if feeds.is_empty() {
        println!("No feeds configured");
        return Ok(());
    }

    println!("Updating {} feeds...", feeds.len());

    match ctx.controller.refresh().await {
        CycleReport::Completed { added, failed } => {
            println!("Update complete: {} new items, {} errors", added, failed);
        }
        CycleReport::Skipped => println!("An update is already running"),
    }
    Ok(())
}

pub async fn list_items(ctx: &AppContext) -> Result<()> {
    let items = ctx.controller.view().await;

    if items.is_empty() {
        println!("No items");
        return Ok(());
    }

    for item in &items {
        println!("{}", format_item(item));
    }

    Ok(())
}

fn format_item(item: &Item) -> String {
    format!(
        "{} [{}] {}\n  {}",
        item.pub_date.format("%Y-%m-%d %H:%M"),
        item.feed_title,
        item.title,
        item.guid
    )
}

pub async fn dismiss(ctx: &AppContext, guid: &str) -> Result<()> {
    let known = ctx.controller.find(guid).await.is_some();
    ctx.controller
        .apply(Action::Dismiss {
            guid: guid.to_string(),
        })
        .await;

    if known {
        println!("Dismissed: {}", guid);
    } else {
        println!("Not currently stored, will never be shown: {}", guid);
    }
    Ok(())
}

pub async fn dismiss_all(ctx: &AppContext) -> Result<()> {
    let count = ctx.controller.snapshot().await.total_items();
    ctx.controller.apply(Action::DismissAll).await;
    println!("Dismissed {} items", count);
    Ok(())
}

pub async fn open_item(ctx: &AppContext, guid: &str) -> Result<()> {
    let item = ctx
        .controller
        .find(guid)
        .await
        .ok_or_else(|| SkimmerError::ItemNotFound(guid.to_string()))?;

    println!("Opening: {}", item.link);
    ctx.controller
        .apply(Action::OpenLink {
            link: item.link,
            guid: item.guid,
        })
        .await;
    Ok(())
}

/// Run the scheduler in the foreground until SIGINT/SIGTERM.
pub async fn run_daemon(
    ctx: &AppContext,
    interval: Option<&str>,
    no_initial_update: bool,
) -> Result<()> {
    let interval = match interval {
        Some(s) => SchedulerConfig::parse_interval(s).map_err(SkimmerError::Other)?,
        None => ctx.config.fetch_interval(),
    };

    let scheduler = Scheduler::new(
        ctx.controller.clone(),
        SchedulerConfig {
            interval,
            update_on_start: !no_initial_update,
        },
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown_tx.send_replace(true);
    });

    scheduler.run(shutdown_rx).await;
    Ok(())
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {},
                _ = sigint.recv() => {},
            }
        }
        _ => {
            tracing::warn!("Failed to set up signal handlers, falling back to Ctrl-C");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(windows)]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
