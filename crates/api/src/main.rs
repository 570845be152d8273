use anyhow::Result;
use todo_api::{app, config, middleware};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration; failures are logged with default logging settings
    let config = match config::Config::load() {
        Ok(config) => config,
        Err(e) => {
            middleware::logging::init_logging(&config::LoggingConfig::default());
            error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    // Initialize logging
    middleware::logging::init_logging(&config.logging);

    info!("Starting todo service v{}", env!("CARGO_PKG_VERSION"));

    if config.metrics.enabled {
        middleware::init_metrics()?;
    }

    // Without storage there is nothing to serve; a failed connection ends the
    // process with a non-zero status.
    let todos = app::build_repository(&config.database)
        .await
        .inspect_err(|e| error!(error = %e, "Error connecting to MongoDB"))?;

    // Build application
    let addr = config.socket_addr()?;
    let app = app::create_app(config, todos);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => warn!("Got INT. Initiating shutdown"),
        _ = terminate => warn!("Got TERM. Initiating shutdown"),
    }
}
