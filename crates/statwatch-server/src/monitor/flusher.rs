//! Background snapshot flushing.

use std::sync::Arc;

use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use statwatch_core::MetricStore;

use crate::obs::metrics::MonitorMetrics;

/// Persist the store once, off the async workers. Failures are logged and
/// counted; the in-memory store stays authoritative until the next success.
pub async fn flush_once(
    store: &Arc<MetricStore>,
    metrics: &MonitorMetrics,
    trigger: &'static str,
) -> bool {
    let s = Arc::clone(store);
    let res = tokio::task::spawn_blocking(move || s.persist()).await;

    let ok = match res {
        Ok(Ok(())) => {
            tracing::debug!(trigger, path=%store.path().display(), "snapshot flushed");
            true
        }
        Ok(Err(e)) => {
            tracing::error!(
                trigger,
                path=%store.path().display(),
                error=%e,
                "snapshot flush failed"
            );
            false
        }
        Err(e) => {
            tracing::error!(trigger, error=%e, "snapshot flush task aborted");
            false
        }
    };
    metrics
        .flushes
        .inc(&[("trigger", trigger), ("result", if ok { "ok" } else { "error" })]);
    ok
}

/// Flush every `period` until `shutdown` fires, then flush one last time.
pub async fn run_flush_loop(
    store: Arc<MetricStore>,
    metrics: Arc<MonitorMetrics>,
    period: Duration,
    shutdown: CancellationToken,
) {
    tracing::info!(
        period_secs = period.as_secs(),
        path=%store.path().display(),
        "snapshot flusher started"
    );

    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                flush_once(&store, &metrics, "shutdown").await;
                break;
            }
            _ = ticker.tick() => {
                flush_once(&store, &metrics, "periodic").await;
            }
        }
    }

    tracing::info!("snapshot flusher stopped");
}
