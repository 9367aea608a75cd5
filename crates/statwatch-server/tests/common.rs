//! Shared helpers for server integration tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(dead_code)]

use std::path::Path;

use statwatch_server::config::{self, MonitorConfig};

pub fn monitor_cfg(path: &Path, max_record: usize, flush_secs: u64) -> MonitorConfig {
    let yaml = format!(
        "version: 1
monitor:
  max_record: {max_record}
  file:
    path: {:?}
    flush_secs: {flush_secs}
",
        path.display().to_string()
    );
    config::load_from_str(&yaml).expect("test config").monitor
}
