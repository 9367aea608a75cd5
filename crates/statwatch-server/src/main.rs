//! statwatch server
//!
//! - Loads `statwatch.yaml` (or `$STATWATCH_CONFIG`)
//! - Hydrates the metric store from its snapshot and starts the flusher
//! - Serves the monitor endpoints until SIGINT/SIGTERM
//! - Takes samples only through `POST /system/monitor`; the binary runs no
//!   in-process `Sampler` (embedders call `MonitorRuntime::spawn_sampler`)
//! - Flushes the store one last time before exiting

use std::net::SocketAddr;
use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use statwatch_core::error::{MonitorError, Result};
use statwatch_server::{app_state, config, monitor::MonitorRuntime, router};

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error=%e, "statwatch-server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let path = config::config_path();
    let cfg = config::load_from_file(&path)?;
    let listen: SocketAddr = cfg
        .server
        .listen
        .parse()
        .map_err(|e| MonitorError::BadRequest(format!("server.listen: {e}")))?;

    let runtime = MonitorRuntime::init(&cfg.monitor)?;
    let state = app_state::AppState::new(cfg, &runtime);
    let app = router::build_router(state.clone());

    tracing::info!(
        %listen,
        config=%path,
        snapshot=%state.cfg().monitor.file.path,
        max_record = state.cfg().monitor.max_record,
        "statwatch-server starting; samples accepted via POST /system/monitor"
    );
    let listener = tokio::net::TcpListener::bind(listen).await?;

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await;

    // flush even if the server died
    runtime.shutdown().await;
    served.map_err(MonitorError::from)
}

async fn shutdown_signal(state: app_state::AppState) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error=%e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error=%e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    state.metrics().set_draining();
    tracing::info!("signal received, starting graceful shutdown");
}
