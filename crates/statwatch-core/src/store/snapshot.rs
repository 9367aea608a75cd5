//! On-disk snapshot of the whole store.
//!
//! Format: one pretty-printed JSON object keyed by metric tag, each value an
//! array of `{"timestamp", "value"}` records in ingest order. Loading is
//! best-effort; writing goes through a temp file + fsync + rename.

use std::collections::{BTreeMap, VecDeque};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{MonitorError, Result};
use crate::metric::{MetricType, Sample};

pub(crate) type SeriesMap = BTreeMap<MetricType, VecDeque<Sample>>;

/// Load the snapshot at `path`.
///
/// Never fails: a missing file means "no prior data", and an unreadable or
/// malformed file is logged and treated the same way.
pub(crate) fn load(path: &Path, max_record: usize) -> SeriesMap {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path=%path.display(), "no snapshot, starting empty");
            return SeriesMap::new();
        }
        Err(e) => {
            tracing::warn!(path=%path.display(), error=%e, "snapshot read failed, starting empty");
            return SeriesMap::new();
        }
    };

    match decode(&raw, max_record) {
        Ok(map) => {
            let samples: usize = map.values().map(VecDeque::len).sum();
            tracing::info!(path=%path.display(), series = map.len(), samples, "snapshot loaded");
            map
        }
        Err(e) => {
            tracing::warn!(path=%path.display(), error=%e, "snapshot corrupt, starting empty");
            SeriesMap::new()
        }
    }
}

pub(crate) fn decode(raw: &[u8], max_record: usize) -> Result<SeriesMap> {
    let doc: BTreeMap<String, Vec<Sample>> = serde_json::from_slice(raw)
        .map_err(|e| MonitorError::Internal(format!("invalid snapshot json: {e}")))?;

    let mut map = SeriesMap::new();
    for (tag, mut samples) in doc {
        let metric = match tag.parse::<MetricType>() {
            Ok(m) => m,
            Err(_) => {
                tracing::warn!(tag=%tag, "snapshot has unknown metric type, skipping");
                continue;
            }
        };

        if samples.windows(2).any(|w| w[0].timestamp > w[1].timestamp) {
            tracing::warn!(%metric, "snapshot series out of order, re-sorting");
            samples.sort_by_key(|s| s.timestamp);
        }
        if samples.len() > max_record {
            let excess = samples.len() - max_record;
            samples.drain(..excess);
        }

        map.insert(metric, samples.into());
    }
    Ok(map)
}

pub(crate) fn encode(map: &SeriesMap) -> Result<Vec<u8>> {
    let doc: BTreeMap<&'static str, &VecDeque<Sample>> =
        map.iter().map(|(m, s)| (m.as_str(), s)).collect();
    serde_json::to_vec_pretty(&doc)
        .map_err(|e| MonitorError::Internal(format!("snapshot encode failed: {e}")))
}

/// Replace `path` with `bytes` so that readers only ever see a complete file.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .map_err(|e| MonitorError::Io(format!("create dir {} failed: {e}", dir.display())))?;
    }

    let tmp = temp_path(path);
    let mut file = File::create(&tmp)
        .map_err(|e| MonitorError::Io(format!("create {} failed: {e}", tmp.display())))?;
    if let Err(e) = file.write_all(bytes).and_then(|()| file.sync_all()) {
        drop(file);
        let _ = fs::remove_file(&tmp);
        return Err(MonitorError::Io(format!("write {} failed: {e}", tmp.display())));
    }
    drop(file);

    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        MonitorError::Io(format!("rename to {} failed: {e}", path.display()))
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "snapshot".into());
    name.push(".tmp");
    path.with_file_name(name)
}
