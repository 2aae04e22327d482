//! Periodic triggers for the aggregator
//!
//! One loop runs an update cycle every `update_interval`, starting
//! immediately. A second loop clears the cache and refreshes every
//! `reset_interval`, first firing one full interval after start.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use tracing::info;

use crate::aggregator::PriceAggregator;

/// Default spacing between update cycles
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(60);

/// Default spacing between daily resets
pub const DEFAULT_RESET_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub update_interval: Duration,
    pub reset_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            update_interval: DEFAULT_UPDATE_INTERVAL,
            reset_interval: DEFAULT_RESET_INTERVAL,
        }
    }
}

/// Handles to the running trigger loops
#[derive(Debug)]
pub struct Scheduler {
    update_task: JoinHandle<()>,
    reset_task: JoinHandle<()>,
}

impl Scheduler {
    /// Spawn both loops on the current runtime
    pub fn start(aggregator: Arc<PriceAggregator>, config: SchedulerConfig) -> Self {
        info!(
            "Starting scheduler (update every {:?}, reset every {:?})",
            config.update_interval, config.reset_interval
        );

        let update_agg = Arc::clone(&aggregator);
        let update_every = config.update_interval;
        let update_task = tokio::spawn(async move {
            let mut ticker = interval(update_every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                update_agg.run_cycle().await;
            }
        });

        let reset_every = config.reset_interval;
        let reset_task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + reset_every, reset_every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                info!("Running daily reset");
                aggregator.daily_reset().await;
            }
        });

        Self {
            update_task,
            reset_task,
        }
    }

    /// Stop both loops
    pub fn shutdown(self) {
        self.update_task.abort();
        self.reset_task.abort();
        info!("Scheduler stopped");
    }
}
