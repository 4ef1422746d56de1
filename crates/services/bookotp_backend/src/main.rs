// --- File: crates/services/bookotp_backend/src/main.rs ---
use bookotp_backend::{build_router, spawn_otp_sweeper, AppState, BookOtpServiceFactory};
use bookotp_common::logging;
use bookotp_config::load_config;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            logging::init();
            error!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };
    logging::init_with_level(logging::parse_level(&config.logging.level));

    let factory = match BookOtpServiceFactory::new(&config).await {
        Ok(factory) => factory,
        Err(e) => {
            error!("Failed to initialize services: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let state = AppState::new(config.clone(), &factory);
    let app = build_router(&state);

    let sweeper = spawn_otp_sweeper(
        state.otp.clone(),
        Duration::from_secs(config.otp.sweep_interval_seconds),
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    let served = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await;
    sweeper.abort();

    match served {
        Ok(()) => {
            info!("Server stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
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
    info!("Shutdown signal received");
}
