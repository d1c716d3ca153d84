//! # loanbook-node-stub -- Binary Entry Point
//!
//! Runs the in-memory ledger node on `LEDGER_STUB_PORT` (default 10050).

use std::net::SocketAddr;

use loanbook_node_stub::{router, NodeStore, StubConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = StubConfig::from_env()?;
    tracing::info!(?config, "starting ledger node stub");

    let store = NodeStore::seeded(config.host.clone(), config.agent_account);
    let app = router(store, config.rpc_token);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("loanbook-node-stub listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
