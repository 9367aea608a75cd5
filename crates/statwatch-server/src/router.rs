//! Axum router wiring.

use axum::{routing::get, Router};

use crate::{api, app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/system/monitor", get(api::monitor::all).post(api::monitor::ingest))
        .route("/system/monitor/state", get(api::monitor::state))
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
