//! Shared helpers for store integration tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(dead_code)]

use std::path::Path;

use statwatch_core::{MetricStore, MetricType, Reading, Sample, StoreOptions};

pub fn open(path: &Path, max_record: usize) -> MetricStore {
    MetricStore::open(StoreOptions {
        path: path.to_path_buf(),
        max_record,
    })
    .expect("open store")
}

pub fn one(metric: MetricType, ts: i64, value: f64) -> Reading {
    Reading::from([(metric, Sample::new(ts, value))])
}

/// Same timestamp for every metric type, value offset per type.
pub fn tick(ts: i64) -> Reading {
    MetricType::ALL
        .into_iter()
        .enumerate()
        .map(|(i, m)| (m, Sample::new(ts, ts as f64 + i as f64)))
        .collect()
}
