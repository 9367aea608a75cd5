//! statwatch server library entry.
//!
//! Wires config, the monitor runtime (store lifecycle, flusher, samplers),
//! and the HTTP surface into one process. Consumed by the binary (`main.rs`)
//! and by integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod monitor;
pub mod obs;
pub mod ops;
pub mod router;
