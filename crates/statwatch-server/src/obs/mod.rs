//! Lightweight in-process counters (dependency-free).
//!
//! Counts ingest, rejection, query, and flush outcomes for the metric store
//! and renders them with the `/metrics` handler in Prometheus text format.

pub mod metrics;
