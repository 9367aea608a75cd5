//! Shared application state for the statwatch server.
//!
//! The store is built once by `MonitorRuntime::init` and handed to the HTTP
//! layer here; nothing reaches it through globals.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::monitor::{MonitorRuntime, MonitorService};
use crate::obs::metrics::MonitorMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    monitor: MonitorService,
    metrics: Arc<MonitorMetrics>,
}

struct AppStateInner {
    cfg: ServerConfig,
}

impl AppState {
    pub fn new(cfg: ServerConfig, runtime: &MonitorRuntime) -> Self {
        Self {
            inner: Arc::new(AppStateInner { cfg }),
            monitor: runtime.service(),
            metrics: runtime.metrics(),
        }
    }

    pub fn cfg(&self) -> &ServerConfig {
        &self.inner.cfg
    }

    pub fn monitor(&self) -> &MonitorService {
        &self.monitor
    }

    pub fn metrics(&self) -> &MonitorMetrics {
        &self.metrics
    }
}
