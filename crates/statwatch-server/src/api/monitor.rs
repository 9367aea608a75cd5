//! `/system/monitor` endpoints.
//!
//! - `GET  /system/monitor`        : every metric type over a window (default: last 24h)
//! - `GET  /system/monitor/state`  : one metric type over a window
//! - `POST /system/monitor`        : ingest one reading from an external sampler

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use statwatch_core::error::MonitorError;
use statwatch_core::{MetricType, Reading};

use crate::api::ApiError;
use crate::app_state::AppState;
use crate::monitor::{unix_now, AllResp, StateReq, StateResp};

const DEFAULT_WINDOW_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
}

impl WindowQuery {
    /// Missing bounds default to the last 24h ending now.
    pub fn resolve(&self) -> (i64, i64) {
        let end = self.end_time.unwrap_or_else(unix_now);
        let start = self
            .start_time
            .unwrap_or_else(|| end.saturating_sub(DEFAULT_WINDOW_SECS));
        (start, end)
    }
}

#[derive(Debug, Deserialize)]
pub struct StateQuery {
    pub monitor_type: String,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
}

pub async fn all(State(state): State<AppState>, Query(q): Query<WindowQuery>) -> Json<AllResp> {
    let (start, end) = q.resolve();
    Json(state.monitor().all(start, end))
}

pub async fn state(
    State(state): State<AppState>,
    Query(q): Query<StateQuery>,
) -> Result<Json<StateResp>, ApiError> {
    let monitor_type: MetricType = q.monitor_type.parse()?;
    let (start_time, end_time) = WindowQuery {
        start_time: q.start_time,
        end_time: q.end_time,
    }
    .resolve();
    Ok(Json(state.monitor().state(StateReq {
        monitor_type,
        start_time,
        end_time,
    })))
}

pub async fn ingest(
    State(state): State<AppState>,
    body: Result<Json<Reading>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(reading) =
        body.map_err(|e| MonitorError::BadRequest(format!("invalid reading: {}", e.body_text())))?;
    state.monitor().ingest(&reading)?;
    Ok(StatusCode::NO_CONTENT)
}
