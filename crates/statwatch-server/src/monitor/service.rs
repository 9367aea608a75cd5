//! Monitor queries as seen by the HTTP layer.

use std::sync::Arc;

use serde::Serialize;

use statwatch_core::error::Result;
use statwatch_core::{MetricStore, MetricType, Reading, Sample};

use crate::obs::metrics::MonitorMetrics;

use super::sampler;

#[derive(Debug, Clone, Copy)]
pub struct StateReq {
    pub monitor_type: MetricType,
    pub start_time: i64,
    pub end_time: i64,
}

#[derive(Debug, Serialize)]
pub struct StateResp {
    pub data: Vec<Sample>,
}

/// Every metric type over the same window, each in its own field.
#[derive(Debug, Serialize)]
pub struct AllResp {
    pub cpu: Vec<Sample>,
    pub disk: Vec<Sample>,
    pub net_send: Vec<Sample>,
    pub net_recv: Vec<Sample>,
    pub mem: Vec<Sample>,
}

#[derive(Clone)]
pub struct MonitorService {
    store: Arc<MetricStore>,
    metrics: Arc<MonitorMetrics>,
}

impl MonitorService {
    pub fn new(store: Arc<MetricStore>, metrics: Arc<MonitorMetrics>) -> Self {
        Self { store, metrics }
    }

    pub fn store(&self) -> &MetricStore {
        &self.store
    }

    pub fn ingest(&self, reading: &Reading) -> Result<()> {
        sampler::record(&self.store, &self.metrics, reading)
    }

    pub fn state(&self, req: StateReq) -> StateResp {
        StateResp {
            data: self.range(req.monitor_type, req.start_time, req.end_time),
        }
    }

    pub fn all(&self, start_time: i64, end_time: i64) -> AllResp {
        AllResp {
            cpu: self.range(MetricType::Cpu, start_time, end_time),
            disk: self.range(MetricType::Disk, start_time, end_time),
            net_send: self.range(MetricType::NetSend, start_time, end_time),
            net_recv: self.range(MetricType::NetRecv, start_time, end_time),
            mem: self.range(MetricType::Mem, start_time, end_time),
        }
    }

    fn range(&self, metric: MetricType, start: i64, end: i64) -> Vec<Sample> {
        self.metrics.range_queries.inc(&[("metric", metric.as_str())]);
        self.store.range_query(metric, start, end)
    }
}
