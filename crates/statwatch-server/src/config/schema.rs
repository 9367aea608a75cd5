use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use statwatch_core::error::{MonitorError, Result};
use statwatch_core::StoreOptions;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub monitor: MonitorConfig,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MonitorError::UnsupportedVersion);
        }
        self.server.validate()?;
        self.monitor.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self { listen: default_listen() }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        if self.listen.parse::<std::net::SocketAddr>().is_err() {
            return Err(MonitorError::BadRequest(format!(
                "server.listen must be a valid socket address, got {:?}",
                self.listen
            )));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorConfig {
    /// Samples retained per metric type (sliding window).
    #[serde(default = "default_max_record")]
    pub max_record: usize,

    #[serde(default)]
    pub file: FileSection,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            max_record: default_max_record(),
            file: FileSection::default(),
        }
    }
}

impl MonitorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_record == 0 {
            return Err(MonitorError::BadRequest(
                "monitor.max_record must be positive".into(),
            ));
        }
        self.file.validate()
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            path: PathBuf::from(&self.file.path),
            max_record: self.max_record,
        }
    }
}

// 24h at one sample every 5s
fn default_max_record() -> usize {
    17_280
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSection {
    #[serde(default = "default_path")]
    pub path: String,

    /// Seconds between snapshot flushes; 0 disables the periodic timer.
    #[serde(default = "default_flush_secs")]
    pub flush_secs: u64,
}

impl Default for FileSection {
    fn default() -> Self {
        Self {
            path: default_path(),
            flush_secs: default_flush_secs(),
        }
    }
}

impl FileSection {
    pub fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            return Err(MonitorError::BadRequest(
                "monitor.file.path must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn flush_period(&self) -> Option<Duration> {
        (self.flush_secs > 0).then(|| Duration::from_secs(self.flush_secs))
    }
}

fn default_path() -> String {
    "data/monitor.json".into()
}
fn default_flush_secs() -> u64 {
    60
}
