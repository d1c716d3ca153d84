//! Ledger node RPC error types.

/// Errors from flow RPC calls.
#[derive(Debug, thiserror::Error)]
pub enum NodeRpcError {
    /// HTTP transport error (connection refused, timeout, TLS).
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The node rejected the flow or the flow failed (non-2xx).
    #[error("flow {endpoint} returned {status}: {body}")]
    Flow {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}
