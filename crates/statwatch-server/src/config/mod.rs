//! Server config loader (strict parsing).

pub mod schema;

use std::fs;

use statwatch_core::error::{MonitorError, Result};

pub use schema::{FileSection, MonitorConfig, ServerConfig, ServerSection};

/// Env var that overrides the default config path.
pub const CONFIG_ENV: &str = "STATWATCH_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "statwatch.yaml";

pub fn config_path() -> String {
    std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

pub fn load_from_file(path: &str) -> Result<ServerConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| MonitorError::Internal(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ServerConfig> {
    let cfg: ServerConfig = serde_yaml::from_str(s)
        .map_err(|e| MonitorError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
