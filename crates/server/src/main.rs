mod fixtures;
mod health;
pub mod routes;

use std::future::{Future, IntoFuture};
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use margo_core::config::{AppConfig, LoadOptions};

fn init_logging(config: &AppConfig) {
    use margo_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let state = fixtures::demo_state();
    let router = routes::router(state);

    let address = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;

    tracing::info!(
        event_name = "system.server.started",
        bind_address = %address,
        "margo-server listening"
    );

    let drain_grace = Duration::from_secs(config.server.graceful_shutdown_secs);
    serve_until_shutdown(listener, router, drain_grace, wait_for_shutdown()).await?;

    tracing::info!(event_name = "system.server.stopped", "margo-server stopped");

    Ok(())
}

/// Serves until `shutdown` resolves, then drains in-flight connections
/// for at most `drain_grace` before exiting anyway.
async fn serve_until_shutdown(
    listener: tokio::net::TcpListener,
    router: Router,
    drain_grace: Duration,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let (drain_started_tx, drain_started_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        shutdown.await;
        let _ = drain_started_tx.send(());
    })
    .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => result?,
        _ = async {
            let _ = drain_started_rx.await;
            tokio::time::sleep(drain_grace).await;
        } => {
            tracing::warn!(
                event_name = "system.server.drain_timeout",
                grace_secs = drain_grace.as_secs(),
                "shutdown grace period elapsed with connections still draining"
            );
        }
    }

    Ok(())
}

/// Resolves on ctrl-c or, on unix, SIGTERM.
async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(
                event_name = "system.server.shutdown_signal_error",
                error = %error,
                "failed to listen for ctrl-c"
            );
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!(
                    event_name = "system.server.shutdown_signal_error",
                    error = %error,
                    "failed to listen for SIGTERM"
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
