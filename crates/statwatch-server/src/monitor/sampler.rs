//! Sampler seam and the periodic sampling driver.
//!
//! Reading CPU/memory/disk/network counters is left to implementors of
//! [`Sampler`]; the driver only stamps the tick and feeds the store.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::{self, Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use statwatch_core::error::{MonitorError, Result};
use statwatch_core::{MetricStore, Reading};

use crate::obs::metrics::MonitorMetrics;

/// Produces one fresh sample per metric type on demand.
#[async_trait]
pub trait Sampler: Send + Sync {
    fn name(&self) -> &'static str;
    /// Take one reading stamped with `now` (unix seconds).
    async fn sample(&self, now: i64) -> Result<Reading>;
}

/// Ingest a reading and account for it. Shared by the sampling driver and
/// the HTTP ingest endpoint.
pub fn record(store: &MetricStore, metrics: &MonitorMetrics, reading: &Reading) -> Result<()> {
    match store.ingest(reading) {
        Ok(()) => {
            for metric in reading.keys() {
                metrics.samples_ingested.inc(&[("metric", metric.as_str())]);
            }
            Ok(())
        }
        Err(e) => {
            let reason = match &e {
                MonitorError::OutOfOrder { .. } => "out_of_order",
                MonitorError::Stopped => "stopped",
                MonitorError::BadRequest(_) => "invalid_value",
                _ => "other",
            };
            metrics.ingest_rejected.inc(&[("reason", reason)]);
            Err(e)
        }
    }
}

pub async fn run_sampling_loop(
    sampler: Arc<dyn Sampler>,
    store: Arc<MetricStore>,
    metrics: Arc<MonitorMetrics>,
    every: Duration,
    shutdown: CancellationToken,
) {
    let name = sampler.name();
    tracing::info!(sampler = name, every_secs = every.as_secs_f64(), "sampling started");

    let mut ticker = time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {
                let reading = match sampler.sample(super::unix_now()).await {
                    Ok(r) => r,
                    Err(e) => {
                        tracing::warn!(sampler = name, error=%e, "sample failed");
                        continue;
                    }
                };
                match record(&store, &metrics, &reading) {
                    Ok(()) => {}
                    Err(MonitorError::Stopped) => break,
                    Err(e) => tracing::warn!(sampler = name, error=%e, "reading rejected"),
                }
            }
        }
    }

    tracing::info!(sampler = name, "sampling stopped");
}
