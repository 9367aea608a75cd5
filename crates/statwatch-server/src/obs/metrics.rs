//! Counter registry for the monitor.
//!
//! Labels are flattened into sorted key vectors to keep deterministic
//! ordering; each label set owns one atomic counter.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut key: Vec<(String, String)> = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value for one label set (0 if never touched).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} counter", name);
        let mut rows: Vec<(String, u64)> = self
            .map
            .iter()
            .map(|r| {
                let label_str = r
                    .key()
                    .iter()
                    .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
                    .collect::<Vec<_>>()
                    .join(",");
                (label_str, r.value().load(Ordering::Relaxed))
            })
            .collect();
        rows.sort();
        for (label_str, val) in rows {
            let _ = writeln!(out, "{}{{{}}} {}", name, label_str, val);
        }
    }
}

#[derive(Default)]
pub struct MonitorMetrics {
    /// Samples accepted, by metric type.
    pub samples_ingested: CounterVec,
    /// Readings rejected by the store, by reason.
    pub ingest_rejected: CounterVec,
    /// Range queries served, by metric type.
    pub range_queries: CounterVec,
    /// Snapshot flushes, by trigger and result.
    pub flushes: CounterVec,
    draining: AtomicBool,
}

impl MonitorMetrics {
    /// Mark draining state.
    pub fn set_draining(&self) {
        self.draining.store(true, Ordering::Relaxed);
    }
    /// Return whether draining is active.
    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::Relaxed)
    }

    /// Render all counters plus per-series gauges supplied by the caller.
    pub fn render(&self, series_len: &[(&str, usize)]) -> String {
        let mut out = String::new();
        self.samples_ingested.render("statwatch_samples_ingested_total", &mut out);
        self.ingest_rejected.render("statwatch_ingest_rejected_total", &mut out);
        self.range_queries.render("statwatch_range_queries_total", &mut out);
        self.flushes.render("statwatch_snapshot_flushes_total", &mut out);

        let _ = writeln!(out, "# TYPE statwatch_series_samples gauge");
        for (metric, len) in series_len {
            let _ = writeln!(
                out,
                "statwatch_series_samples{{metric=\"{}\"}} {}",
                escape_label(metric),
                len
            );
        }
        let _ = writeln!(
            out,
            "# TYPE statwatch_draining gauge\nstatwatch_draining {}",
            if self.is_draining() { 1 } else { 0 }
        );
        out
    }
}
