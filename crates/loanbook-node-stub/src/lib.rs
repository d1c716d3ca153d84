//! # loanbook-node-stub -- In-memory ledger node
//!
//! Serves the flow RPC endpoints that `loanbook-node-client` calls, backed by
//! an in-memory vault. Used for local development and for the agent's
//! end-to-end tests. Data is lost on restart.

pub mod routes;
pub mod store;

use loanbook_core::{AccountId, PartyName, ValidationError};

pub use routes::router;
pub use store::{FlowError, NodeStore};

/// Default identity of the hosting node.
pub const DEFAULT_HOST: &str = "O=Agent Bank, L=London, C=GB";

/// Default listening port.
pub const DEFAULT_PORT: u16 = 10050;

/// Stub configuration read from the environment.
#[derive(Clone)]
pub struct StubConfig {
    /// `LEDGER_STUB_PORT`.
    pub port: u16,
    /// `LEDGER_STUB_HOST`; identity of the hosting node.
    pub host: PartyName,
    /// `STUB_AGENT_ACCOUNT_ID`; a random id when unset.
    pub agent_account: AccountId,
    /// `LEDGER_RPC_TOKEN`; enforced as a bearer token when set.
    pub rpc_token: Option<String>,
}

impl std::fmt::Debug for StubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StubConfig")
            .field("port", &self.port)
            .field("host", &self.host)
            .field("agent_account", &self.agent_account)
            .field("rpc_token", &self.rpc_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Error reading [`StubConfig`].
#[derive(Debug, thiserror::Error)]
pub enum StubConfigError {
    #[error("STUB_AGENT_ACCOUNT_ID is not a valid UUID: {0}")]
    InvalidAccountId(String),

    #[error("LEDGER_STUB_PORT is not a valid port: {0}")]
    InvalidPort(String),

    #[error("LEDGER_STUB_HOST is invalid: {0}")]
    InvalidHost(#[from] ValidationError),
}

impl StubConfig {
    /// Read configuration from environment variables.
    pub fn from_env() -> Result<Self, StubConfigError> {
        let port = match std::env::var("LEDGER_STUB_PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| StubConfigError::InvalidPort(raw))?,
            Err(_) => DEFAULT_PORT,
        };
        let host = PartyName::new(
            std::env::var("LEDGER_STUB_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
        )?;
        let agent_account = match std::env::var("STUB_AGENT_ACCOUNT_ID") {
            Ok(raw) => raw
                .parse::<uuid::Uuid>()
                .map(AccountId::from_uuid)
                .map_err(|_| StubConfigError::InvalidAccountId(raw))?,
            Err(_) => AccountId::new(),
        };
        let rpc_token = std::env::var("LEDGER_RPC_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());
        Ok(Self {
            port,
            host,
            agent_account,
            rpc_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_token() {
        let config = StubConfig {
            port: DEFAULT_PORT,
            host: PartyName::new(DEFAULT_HOST).unwrap(),
            agent_account: AccountId::new(),
            rpc_token: Some("super-secret".into()),
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn seeded_store_hosts_agent_account() {
        let agent = AccountId::new();
        let store = NodeStore::seeded(PartyName::new(DEFAULT_HOST).unwrap(), agent);
        assert_eq!(store.host().as_str(), DEFAULT_HOST);
        assert!(store
            .accounts(false)
            .iter()
            .any(|a| a.data().account_id == agent));
    }
}
