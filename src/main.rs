use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clubledger::api::{self, AppState};
use clubledger::config::Config;
use clubledger::store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clubledger=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting club ledger server...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        commission_rate = %config.billing.commission_rate,
        due_day = config.billing.due_day,
        "Configuration loaded successfully"
    );

    // Seed the store from the catalog
    let store = store::create_store(config.catalog_path.as_deref())?;

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    // Build application state
    let state = AppState {
        store,
        config,
    };
    let app = api::app(state);

    tracing::info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install CTRL+C signal handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, cleaning up...");
}
