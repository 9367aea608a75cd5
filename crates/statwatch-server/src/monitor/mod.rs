//! Metric store lifecycle inside the server process.
//!
//! `MonitorRuntime::init` opens the store and starts the snapshot flusher;
//! `MonitorRuntime::shutdown` stops samplers, closes the store, and makes
//! sure one final flush reaches disk.

pub mod flusher;
pub mod sampler;
pub mod service;

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use statwatch_core::error::Result;
use statwatch_core::MetricStore;

use crate::config::MonitorConfig;
use crate::obs::metrics::MonitorMetrics;

pub use sampler::Sampler;
pub use service::{AllResp, MonitorService, StateReq, StateResp};

/// Current unix time in seconds.
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

pub struct MonitorRuntime {
    store: Arc<MetricStore>,
    metrics: Arc<MonitorMetrics>,
    sampling_stop: CancellationToken,
    flush_stop: CancellationToken,
    samplers: Vec<JoinHandle<()>>,
    flusher: Option<JoinHandle<()>>,
}

impl MonitorRuntime {
    /// Open the store and start the periodic flusher (if `flush_secs > 0`).
    /// Must be called from within a tokio runtime.
    pub fn init(cfg: &MonitorConfig) -> Result<Self> {
        cfg.validate()?;
        let store = Arc::new(MetricStore::open(cfg.store_options())?);
        let metrics = Arc::new(MonitorMetrics::default());
        let flush_stop = CancellationToken::new();

        let flusher = match cfg.file.flush_period() {
            Some(period) => Some(tokio::spawn(flusher::run_flush_loop(
                Arc::clone(&store),
                Arc::clone(&metrics),
                period,
                flush_stop.clone(),
            ))),
            None => {
                tracing::warn!("monitor.file.flush_secs is 0, periodic snapshots disabled");
                None
            }
        };

        tracing::info!(
            path=%store.path().display(),
            max_record = store.max_record(),
            "monitor runtime started"
        );

        Ok(Self {
            store,
            metrics,
            sampling_stop: CancellationToken::new(),
            flush_stop,
            samplers: Vec::new(),
            flusher,
        })
    }

    pub fn store(&self) -> Arc<MetricStore> {
        Arc::clone(&self.store)
    }

    pub fn metrics(&self) -> Arc<MonitorMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn service(&self) -> MonitorService {
        MonitorService::new(self.store(), self.metrics())
    }

    /// Drive `sampler` every `every` until shutdown.
    pub fn spawn_sampler(&mut self, sampler: Arc<dyn Sampler>, every: Duration) {
        let handle = tokio::spawn(sampler::run_sampling_loop(
            sampler,
            self.store(),
            self.metrics(),
            every,
            self.sampling_stop.clone(),
        ));
        self.samplers.push(handle);
    }

    /// Stop samplers, close the store, and flush it one last time.
    pub async fn shutdown(self) {
        self.metrics.set_draining();

        self.sampling_stop.cancel();
        for h in self.samplers {
            if let Err(e) = h.await {
                tracing::error!(error=%e, "sampler task failed");
            }
        }

        self.store.close();

        match self.flusher {
            Some(h) => {
                self.flush_stop.cancel();
                if let Err(e) = h.await {
                    tracing::error!(error=%e, "flusher task failed, flushing inline");
                    flusher::flush_once(&self.store, &self.metrics, "shutdown").await;
                }
            }
            None => {
                flusher::flush_once(&self.store, &self.metrics, "shutdown").await;
            }
        }

        tracing::info!("monitor runtime stopped");
    }
}
