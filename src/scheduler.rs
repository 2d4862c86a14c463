//! Periodic feed updates.
//!
//! One cycle at start, then one per interval. A cycle always finishes
//! (merges and saves included) before the next tick is awaited, and ticks
//! missed while a slow cycle was running are dropped rather than queued.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::info;

use crate::controller::{Controller, CycleReport};

/// One year.
pub const MAX_INTERVAL_SECS: u64 = 365 * 86400;

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub interval: Duration,
    /// Whether to run an update immediately on start
    pub update_on_start: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(crate::config::DEFAULT_FETCH_INTERVAL_MS),
            update_on_start: true,
        }
    }
}

impl SchedulerConfig {
    /// Parse interval string like "90s", "30m", "6h", "1d" or bare seconds.
    pub fn parse_interval(s: &str) -> Result<Duration, String> {
        let s = s.trim().to_lowercase();

        let (digits, unit, name) = if let Some(hours) = s.strip_suffix('h') {
            (hours, 3600, "hours")
        } else if let Some(minutes) = s.strip_suffix('m') {
            (minutes, 60, "minutes")
        } else if let Some(days) = s.strip_suffix('d') {
            (days, 86400, "days")
        } else if let Some(secs) = s.strip_suffix('s') {
            (secs, 1, "seconds")
        } else {
            (s.as_str(), 1, "interval")
        };

        let count = digits
            .parse::<u64>()
            .map_err(|_| match name {
                "interval" => {
                    format!("Invalid interval: {}. Use format like '1h', '30m', '1d'", s)
                }
                _ => format!("Invalid {}: {}", name, digits),
            })?;

        match count.checked_mul(unit) {
            Some(0) => Err("Interval must be greater than zero".to_string()),
            Some(secs) if secs <= MAX_INTERVAL_SECS => Ok(Duration::from_secs(secs)),
            _ => Err("Interval too large".to_string()),
        }
    }

    /// Format interval for display
    pub fn format_interval(interval: Duration) -> String {
        let secs = interval.as_secs();
        if interval.subsec_millis() != 0 || secs == 0 {
            format!("{}ms", interval.as_millis())
        } else if secs >= 86400 && secs.is_multiple_of(86400) {
            format!("{}d", secs / 86400)
        } else if secs >= 3600 && secs.is_multiple_of(3600) {
            format!("{}h", secs / 3600)
        } else if secs >= 60 && secs.is_multiple_of(60) {
            format!("{}m", secs / 60)
        } else {
            format!("{}s", secs)
        }
    }
}

pub struct Scheduler {
    controller: Arc<Controller>,
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(controller: Arc<Controller>, config: SchedulerConfig) -> Self {
        Self { controller, config }
    }

    /// Run cycles until `shutdown` flips to `true` or its sender goes away.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            "Scheduler started (update interval: {})",
            SchedulerConfig::format_interval(self.config.interval)
        );

        if self.config.update_on_start {
            info!("Running initial update...");
            tokio::select! {
                _ = self.run_cycle() => {}
                _ = wait_for_shutdown(&mut shutdown) => {
                    info!("Scheduler stopped");
                    return;
                }
            }
        }

        let mut timer = interval_at(Instant::now() + self.config.interval, self.config.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = timer.tick() => {
                    info!("Running scheduled update...");
                    self.run_cycle().await;
                }
                _ = wait_for_shutdown(&mut shutdown) => break,
            }
        }

        info!("Scheduler stopped");
    }

    async fn run_cycle(&self) {
        if self.controller.refresh().await == CycleReport::Skipped {
            info!("Previous update still running, tick skipped");
        }
    }
}

async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}
