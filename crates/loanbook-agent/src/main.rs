//! # loanbook-agent -- Binary Entry Point
//!
//! Starts the Axum HTTP server. Binds to `PORT` (default 8080).

use std::sync::Arc;

use loanbook_agent::state::{AppConfig, AppState};
use loanbook_node_client::{NodeClient, NodeRpcConfig};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Invalid agent configuration: {e}");
        e
    })?;

    // A missing node configuration still starts the server; business
    // routes and readiness then answer 503.
    let state = match NodeRpcConfig::from_env() {
        Ok(node_config) => {
            tracing::info!(node_url = %node_config.node_url, "ledger node client configured");
            let client = NodeClient::new(node_config).map_err(|e| {
                tracing::error!("Failed to create ledger node client: {e}");
                e
            })?;
            AppState::new(config.clone(), Arc::new(client))
        }
        Err(e) => {
            tracing::warn!("Ledger node client not configured: {e}. Loan routes will return 503.");
            AppState::without_ledger(config.clone())
        }
    };

    let app = loanbook_agent::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(agent_account = %config.agent_account, "loanbook-agent listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
