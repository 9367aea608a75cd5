//! Bounded in-memory time-series store.
//!
//! One series per [`MetricType`], each a sliding window of at most
//! `max_record` samples in non-decreasing timestamp order. A single
//! reader/writer lock covers the whole map: ingest is exclusive, queries and
//! snapshot encoding are shared.

mod snapshot;

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};

use crate::error::{MonitorError, Result};
use crate::metric::{MetricType, Reading, Sample};

use snapshot::SeriesMap;

/// Store construction options.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Snapshot file location.
    pub path: PathBuf,
    /// Maximum samples retained per series.
    pub max_record: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Running,
    Stopped,
}

pub struct MetricStore {
    series: RwLock<SeriesMap>,
    path: PathBuf,
    max_record: usize,
    stopped: AtomicBool,
    /// Serializes snapshot writers so files land in encode order.
    persist_lock: Mutex<()>,
}

impl MetricStore {
    /// Build a store and hydrate it from the snapshot at `opts.path`.
    ///
    /// A missing or corrupt snapshot yields an empty store; only invalid
    /// options are reported as errors.
    pub fn open(opts: StoreOptions) -> Result<Self> {
        if opts.max_record == 0 {
            return Err(MonitorError::BadRequest("max_record must be positive".into()));
        }
        let series = snapshot::load(&opts.path, opts.max_record);
        Ok(Self {
            series: RwLock::new(series),
            path: opts.path,
            max_record: opts.max_record,
            stopped: AtomicBool::new(false),
            persist_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn max_record(&self) -> usize {
        self.max_record
    }

    pub fn state(&self) -> LifecycleState {
        if self.stopped.load(Ordering::Acquire) {
            LifecycleState::Stopped
        } else {
            LifecycleState::Running
        }
    }

    /// Append one sample per metric type.
    ///
    /// The reading is applied all-or-nothing: if any sample is older than the
    /// newest sample of its series, nothing is written and `OutOfOrder` is
    /// returned. Non-finite values are rejected with `BadRequest`; JSON
    /// snapshots cannot hold them. Each series that overflows `max_record`
    /// drops its single oldest sample.
    pub fn ingest(&self, reading: &Reading) -> Result<()> {
        let mut series = self.series.write();
        if self.stopped.load(Ordering::Acquire) {
            return Err(MonitorError::Stopped);
        }

        for (&metric, sample) in reading {
            if !sample.value.is_finite() {
                return Err(MonitorError::BadRequest(format!(
                    "non-finite value for {metric} at {}",
                    sample.timestamp
                )));
            }
            if let Some(last) = series.get(&metric).and_then(VecDeque::back) {
                if sample.timestamp < last.timestamp {
                    return Err(MonitorError::OutOfOrder {
                        metric,
                        last: last.timestamp,
                        got: sample.timestamp,
                    });
                }
            }
        }

        for (&metric, &sample) in reading {
            let s = series.entry(metric).or_default();
            s.push_back(sample);
            if s.len() > self.max_record {
                s.pop_front();
            }
        }
        Ok(())
    }

    /// Samples of `metric` with `start <= timestamp <= end`, oldest first.
    ///
    /// Unknown types and empty windows yield an empty vec.
    pub fn range_query(&self, metric: MetricType, start: i64, end: i64) -> Vec<Sample> {
        let series = self.series.read();
        let Some(s) = series.get(&metric) else { return vec![]; };
        if s.is_empty() {
            return vec![];
        }

        let lower = s.partition_point(|x| x.timestamp < start);
        let upper = s.partition_point(|x| x.timestamp <= end);
        if lower >= s.len() || upper == 0 || lower >= upper {
            return vec![];
        }
        s.range(lower..upper).copied().collect()
    }

    /// Full copy of one series.
    pub fn series(&self, metric: MetricType) -> Vec<Sample> {
        self.series
            .read()
            .get(&metric)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn len(&self, metric: MetricType) -> usize {
        self.series.read().get(&metric).map_or(0, VecDeque::len)
    }

    pub fn is_empty(&self) -> bool {
        self.series.read().values().all(VecDeque::is_empty)
    }

    /// Write the whole store to the snapshot path, replacing the previous file.
    pub fn persist(&self) -> Result<()> {
        let _writer = self.persist_lock.lock();
        let bytes = {
            let series = self.series.read();
            snapshot::encode(&series)?
        };
        snapshot::write_atomic(&self.path, &bytes)?;
        tracing::debug!(path=%self.path.display(), bytes = bytes.len(), "snapshot persisted");
        Ok(())
    }

    /// Stop accepting ingest. Idempotent; queries and persist keep working.
    ///
    /// Takes the write lock so every ingest that returned `Ok` is visible to
    /// a persist issued after `close` returns.
    pub fn close(&self) {
        let _series = self.series.write();
        if !self.stopped.swap(true, Ordering::AcqRel) {
            tracing::info!(path=%self.path.display(), "metric store stopped");
        }
    }
}
