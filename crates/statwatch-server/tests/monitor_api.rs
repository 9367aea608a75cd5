//! Monitor HTTP handlers, called directly with their extractors.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, Query, State},
    http::{header, Request, StatusCode},
    response::IntoResponse,
    Json,
};

use statwatch_core::{MetricType, Reading, Sample};
use statwatch_server::api::monitor::{self, StateQuery, WindowQuery};
use statwatch_server::app_state::AppState;
use statwatch_server::config;
use statwatch_server::monitor::MonitorRuntime;
use statwatch_server::ops;

fn app(dir: &tempfile::TempDir) -> (MonitorRuntime, AppState) {
    let yaml = format!(
        "version: 1\nmonitor:\n  max_record: 16\n  file:\n    path: {:?}\n    flush_secs: 0\n",
        dir.path().join("monitor.json").display().to_string()
    );
    let cfg = config::load_from_str(&yaml).unwrap();
    let runtime = MonitorRuntime::init(&cfg.monitor).unwrap();
    let state = AppState::new(cfg, &runtime);
    (runtime, state)
}

fn reading(ts: i64) -> Reading {
    Reading::from([
        (MetricType::Cpu, Sample::new(ts, 1.0)),
        (MetricType::Mem, Sample::new(ts, 2.0)),
        (MetricType::Disk, Sample::new(ts, 3.0)),
        (MetricType::NetSend, Sample::new(ts, 4.0)),
        (MetricType::NetRecv, Sample::new(ts, 5.0)),
    ])
}

#[tokio::test]
async fn aggregate_returns_each_type_in_its_own_field() {
    let dir = tempfile::tempdir().unwrap();
    let (runtime, state) = app(&dir);
    assert_eq!(state.cfg().monitor.max_record, 16);

    for ts in [10, 20, 30] {
        let status = monitor::ingest(State(state.clone()), Ok(Json(reading(ts)))).await.unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    let Json(all) = monitor::all(
        State(state.clone()),
        Query(WindowQuery { start_time: Some(15), end_time: Some(30) }),
    )
    .await;

    let values = |s: &[Sample]| s.iter().map(|x| x.value).collect::<Vec<_>>();
    assert_eq!(values(&all.cpu), vec![1.0, 1.0]);
    assert_eq!(values(&all.mem), vec![2.0, 2.0]);
    assert_eq!(values(&all.disk), vec![3.0, 3.0]);
    assert_eq!(values(&all.net_send), vec![4.0, 4.0]);
    assert_eq!(values(&all.net_recv), vec![5.0, 5.0]);

    let body = serde_json::to_value(&all).unwrap();
    assert_eq!(body["net_recv"][0]["timestamp"], 20);

    runtime.shutdown().await;
}

#[tokio::test]
async fn state_query_single_type() {
    let dir = tempfile::tempdir().unwrap();
    let (runtime, state) = app(&dir);
    monitor::ingest(State(state.clone()), Ok(Json(reading(100)))).await.unwrap();

    let Json(resp) = monitor::state(
        State(state.clone()),
        Query(StateQuery {
            monitor_type: "net_send".into(),
            start_time: Some(0),
            end_time: Some(200),
        }),
    )
    .await
    .unwrap();
    assert_eq!(resp.data, vec![Sample::new(100, 4.0)]);

    runtime.shutdown().await;
}

#[tokio::test]
async fn state_query_unknown_type_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let (runtime, state) = app(&dir);

    let err = monitor::state(
        State(state.clone()),
        Query(StateQuery {
            monitor_type: "gpu".into(),
            start_time: None,
            end_time: None,
        }),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

    runtime.shutdown().await;
}

#[tokio::test]
async fn out_of_order_ingest_is_409_and_stopped_is_503() {
    let dir = tempfile::tempdir().unwrap();
    let (runtime, state) = app(&dir);

    monitor::ingest(State(state.clone()), Ok(Json(reading(50)))).await.unwrap();
    let err = monitor::ingest(State(state.clone()), Ok(Json(reading(40))))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::CONFLICT);
    assert_eq!(
        state.metrics().ingest_rejected.get(&[("reason", "out_of_order")]),
        1
    );

    runtime.shutdown().await;
    let err = monitor::ingest(State(state.clone()), Ok(Json(reading(60))))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[test]
fn window_defaults_to_last_day() {
    let (start, end) = WindowQuery { start_time: None, end_time: Some(100_000) }.resolve();
    assert_eq!((start, end), (100_000 - 86_400, 100_000));
    let (start, end) = WindowQuery { start_time: Some(5), end_time: Some(6) }.resolve();
    assert_eq!((start, end), (5, 6));
    let (start, end) = WindowQuery { start_time: None, end_time: Some(i64::MIN) }.resolve();
    assert_eq!((start, end), (i64::MIN, i64::MIN));
}

#[tokio::test]
async fn ops_endpoints_track_store_and_draining() {
    let dir = tempfile::tempdir().unwrap();
    let (runtime, state) = app(&dir);
    monitor::ingest(State(state.clone()), Ok(Json(reading(1)))).await.unwrap();

    let ready = ops::readyz(State(state.clone())).await.into_response();
    assert_eq!(ready.status(), StatusCode::OK);

    let page = ops::metrics(State(state.clone())).await;
    assert_eq!(page.status(), StatusCode::OK);
    let body = axum::body::to_bytes(page.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("statwatch_series_samples{metric=\"cpu\"} 1"), "{text}");
    assert!(text.contains("statwatch_samples_ingested_total{metric=\"mem\"} 1"), "{text}");

    runtime.shutdown().await;
    let ready = ops::readyz(State(state.clone())).await.into_response();
    assert_eq!(ready.status(), StatusCode::SERVICE_UNAVAILABLE);
}

async fn post_body(raw: &'static str) -> Result<Json<Reading>, JsonRejection> {
    let req = Request::builder()
        .method("POST")
        .uri("/system/monitor")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(raw))
        .unwrap();
    Json::<Reading>::from_request(req, &()).await
}

#[tokio::test]
async fn malformed_reading_is_json_400() {
    let dir = tempfile::tempdir().unwrap();
    let (runtime, state) = app(&dir);

    for raw in [
        r#"{"gpu": {"timestamp": 1, "value": 1.0}}"#,
        r#"{"cpu": {"timestamp": 1"#,
    ] {
        let err = monitor::ingest(State(state.clone()), post_body(raw).await)
            .await
            .unwrap_err();
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body={raw}");
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(doc["error"], "BAD_REQUEST");
        assert!(doc["message"].as_str().unwrap().contains("invalid reading"));
    }

    let ok = monitor::ingest(
        State(state.clone()),
        post_body(r#"{"cpu": {"timestamp": 1, "value": 1.0}}"#).await,
    )
    .await
    .unwrap();
    assert_eq!(ok, StatusCode::NO_CONTENT);

    runtime.shutdown().await;
}

#[tokio::test]
async fn non_finite_value_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let (runtime, state) = app(&dir);

    let mut bad = reading(1);
    bad.insert(MetricType::Disk, Sample::new(1, f64::NAN));
    let err = monitor::ingest(State(state.clone()), Ok(Json(bad))).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        state.metrics().ingest_rejected.get(&[("reason", "invalid_value")]),
        1
    );
    assert_eq!(state.monitor().store().len(MetricType::Cpu), 0);

    runtime.shutdown().await;
}
