//! Ledger node RPC client configuration.
//!
//! Configures the node's base URL, bearer token and request timeout.
//! Override via environment variables or explicit construction for testing.

use url::Url;
use zeroize::Zeroizing;

/// Default node RPC address.
const DEFAULT_NODE_URL: &str = "http://127.0.0.1:10050";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for connecting to a ledger node.
///
/// Custom `Debug` implementation redacts the `rpc_token` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct NodeRpcConfig {
    /// Base URL of the node's RPC listener.
    pub node_url: Url,
    /// Bearer token for RPC authentication. Zeroed on drop.
    pub rpc_token: Zeroizing<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for NodeRpcConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRpcConfig")
            .field("node_url", &self.node_url)
            .field("rpc_token", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl NodeRpcConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `LEDGER_NODE_URL` (default: `http://127.0.0.1:10050`)
    /// - `LEDGER_RPC_TOKEN` (required)
    /// - `LEDGER_RPC_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let rpc_token = std::env::var("LEDGER_RPC_TOKEN").map_err(|_| ConfigError::MissingToken)?;

        Ok(Self {
            node_url: env_url("LEDGER_NODE_URL", DEFAULT_NODE_URL)?,
            rpc_token: Zeroizing::new(rpc_token),
            timeout_secs: std::env::var("LEDGER_RPC_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Configuration for a node listening on localhost (stub or test server).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if the localhost URL cannot be parsed.
    pub fn local(port: u16, token: &str) -> Result<Self, ConfigError> {
        let raw = format!("http://127.0.0.1:{port}");
        let node_url = Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(raw, e.to_string()))?;
        Ok(Self {
            node_url,
            rpc_token: Zeroizing::new(token.to_string()),
            timeout_secs: 5,
        })
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("LEDGER_RPC_TOKEN environment variable is required")]
    MissingToken,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_builds_valid_config() {
        let cfg = NodeRpcConfig::local(10050, "test-token").unwrap();
        assert_eq!(cfg.rpc_token.as_str(), "test-token");
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.node_url.as_str(), "http://127.0.0.1:10050/");
    }

    #[test]
    fn debug_redacts_token() {
        let cfg = NodeRpcConfig::local(10050, "super-secret").unwrap();
        let out = format!("{cfg:?}");
        assert!(!out.contains("super-secret"));
        assert!(out.contains("[REDACTED]"));
    }

    #[test]
    fn env_url_uses_default_when_var_absent() {
        let url = env_url("NONEXISTENT_LEDGER_VAR_12345", "http://node.example:10050").unwrap();
        assert_eq!(url.as_str(), "http://node.example:10050/");
    }

    #[test]
    fn env_url_rejects_invalid_url() {
        std::env::set_var("TEST_BAD_LEDGER_URL", "not a url");
        let result = env_url("TEST_BAD_LEDGER_URL", DEFAULT_NODE_URL);
        std::env::remove_var("TEST_BAD_LEDGER_URL");
        assert!(matches!(result, Err(ConfigError::InvalidUrl(..))));
    }
}
