//! Autonomous blink scheduling
//!
//! A self-perpetuating timer chain: wait a uniformly random interval,
//! close the eyes, hold briefly, open them, reschedule. The task is
//! owned by a [`TaskHandle`], so teardown is deterministic: after
//! `stop().await` no further blink callback runs, even one pending
//! mid-cycle between close and open.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::Rng;
use tracing::trace;

use crate::core::scheduler::TaskHandle;
use crate::expression::targets::{TargetBuffer, TargetIndex};

/// Blink timing configuration
#[derive(Debug, Clone)]
pub struct BlinkConfig {
    /// Lower bound of the random inter-blink interval
    pub min_interval: Duration,
    /// Upper bound (exclusive); min == max disables the jitter
    pub max_interval: Duration,
    /// How long the eyes stay closed
    pub blink_duration: Duration,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(3000),
            max_interval: Duration::from_millis(5000),
            blink_duration: Duration::from_millis(150),
        }
    }
}

/// Periodic blink pulse generator
#[derive(Debug, Clone)]
pub struct BlinkScheduler {
    config: BlinkConfig,
}

impl BlinkScheduler {
    pub fn new(config: BlinkConfig) -> Self {
        Self { config }
    }

    /// Start the timer chain; `apply(true)` closes, `apply(false)` opens
    ///
    /// Requires a tokio runtime context. The returned handle owns the
    /// task: dropping it aborts, `stop().await` aborts and joins.
    pub fn start<F>(&self, mut apply: F) -> TaskHandle
    where
        F: FnMut(bool) + Send + 'static,
    {
        let config = self.config.clone();
        TaskHandle::spawn(async move {
            loop {
                tokio::time::sleep(next_interval(&config)).await;
                trace!("blink");
                apply(true);
                tokio::time::sleep(config.blink_duration).await;
                apply(false);
            }
        })
    }

    /// Start blinking against resolved eye indices in a shared buffer
    ///
    /// One or two indices (left/right eye) may be driven; the timing
    /// contract is identical either way. Names the model lacks are
    /// skipped; with no resolvable index the task still runs but writes
    /// nothing.
    pub fn start_on_buffer(
        &self,
        buffer: Arc<Mutex<TargetBuffer>>,
        names: &[&str],
    ) -> TaskHandle {
        let indices: Vec<TargetIndex> = {
            match buffer.lock() {
                Ok(buf) => names.iter().filter_map(|name| buf.resolve(name)).collect(),
                Err(_) => Vec::new(),
            }
        };
        self.start(move |active| {
            if let Ok(mut buf) = buffer.lock() {
                let weight = if active { 1.0 } else { 0.0 };
                for &target in &indices {
                    buf.set(target, weight);
                }
            }
        })
    }
}

/// Uniformly random wait before the next blink
fn next_interval(config: &BlinkConfig) -> Duration {
    let min = config.min_interval.as_millis() as u64;
    let max = config.max_interval.as_millis() as u64;
    if max > min {
        let ms = rand::thread_rng().gen_range(min..max);
        Duration::from_millis(ms)
    } else {
        config.min_interval
    }
}
