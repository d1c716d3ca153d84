//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers via
//! the `State` extractor. Holds immutable configuration and the ledger node
//! client; nothing in here is mutated after startup.

use std::sync::Arc;

use loanbook_core::AccountId;
use loanbook_node_client::LedgerRpc;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// The agent's own account. Loans are listed and issued under it.
    pub agent_account: AccountId,
}

/// Error reading [`AppConfig`] from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("AGENT_ACCOUNT_ID must be set to the agent's account UUID")]
    MissingAccountId,

    #[error("AGENT_ACCOUNT_ID is not a valid UUID: {0}")]
    InvalidAccountId(String),

    #[error("PORT is not a valid port number: {0}")]
    InvalidPort(String),
}

impl AppConfig {
    /// Read configuration from environment variables.
    ///
    /// - `PORT`: listening port (default 8080)
    /// - `AGENT_ACCOUNT_ID`: required
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => 8080,
        };
        let raw = std::env::var("AGENT_ACCOUNT_ID").map_err(|_| ConfigError::MissingAccountId)?;
        let agent_account = raw
            .trim()
            .parse::<uuid::Uuid>()
            .map(AccountId::from_uuid)
            .map_err(|_| ConfigError::InvalidAccountId(raw))?;
        Ok(Self {
            port,
            agent_account,
        })
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    /// Ledger node client. `None` when the node is not configured, in which
    /// case every business route answers 503.
    pub ledger: Option<Arc<dyn LedgerRpc>>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("ledger_configured", &self.ledger.is_some())
            .finish()
    }
}

impl AppState {
    /// Create state with a configured ledger client.
    pub fn new(config: AppConfig, ledger: Arc<dyn LedgerRpc>) -> Self {
        Self {
            config,
            ledger: Some(ledger),
        }
    }

    /// Create state with no ledger client.
    pub fn without_ledger(config: AppConfig) -> Self {
        Self {
            config,
            ledger: None,
        }
    }

    /// The agent's own account.
    pub fn agent_account(&self) -> AccountId {
        self.config.agent_account
    }
}
