//! statwatch core: metric model, error types, and the bounded time-series store.
//!
//! This crate owns the in-process metric store: one sliding-window series per
//! metric type, binary-search range queries, and crash-safe JSON snapshots.
//! It carries no async runtime dependency; timers and HTTP live in
//! `statwatch-server`.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! A corrupt snapshot or a failed flush degrades to in-memory operation
//! instead of taking the process down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metric;
pub mod store;

/// Shared result type.
pub use error::{ClientCode, MonitorError, Result};
pub use metric::{MetricType, Reading, Sample};
pub use store::{LifecycleState, MetricStore, StoreOptions};
