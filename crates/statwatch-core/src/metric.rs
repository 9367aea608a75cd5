//! Metric model: what a sample measures and the sample itself.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MonitorError;

/// Closed set of measured quantities.
///
/// The string tag (`as_str`) is the stable name used in snapshots, query
/// parameters, and JSON payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    /// CPU utilization (percent).
    Cpu,
    /// Memory utilization (percent).
    Mem,
    /// Root disk utilization (ratio).
    Disk,
    /// Network bytes sent.
    NetSend,
    /// Network bytes received.
    NetRecv,
}

impl MetricType {
    /// Every metric type, in tag order.
    pub const ALL: [MetricType; 5] = [
        MetricType::Cpu,
        MetricType::Mem,
        MetricType::Disk,
        MetricType::NetSend,
        MetricType::NetRecv,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MetricType::Cpu => "cpu",
            MetricType::Mem => "mem",
            MetricType::Disk => "disk",
            MetricType::NetSend => "net_send",
            MetricType::NetRecv => "net_recv",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricType {
    type Err = MonitorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| MonitorError::UnknownMetricType(s.to_string()))
    }
}

/// One `(timestamp, value)` observation. Timestamps are unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Older snapshots label this field `key`.
    #[serde(alias = "key")]
    pub timestamp: i64,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

impl From<(i64, f64)> for Sample {
    fn from((timestamp, value): (i64, f64)) -> Self {
        Self { timestamp, value }
    }
}

/// One fresh sample per metric type, produced once per sampling tick.
pub type Reading = BTreeMap<MetricType, Sample>;
