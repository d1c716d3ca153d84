//! # Validation Errors
//!
//! Structured errors for ledger primitive construction, built with
//! `thiserror`. Each variant carries the rejected input so callers can
//! report it back verbatim.

use thiserror::Error;

/// Domain primitive validation failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Transaction hash is not 64 hex characters.
    #[error("invalid transaction hash {0:?}: expected 64 hex characters")]
    InvalidSecureHash(String),

    /// Signing key is empty or contains characters outside the Base58 alphabet.
    #[error("invalid signing key {0:?}: expected non-empty Base58 text")]
    InvalidSigningKey(String),

    /// Party name is empty.
    #[error("invalid party name: must not be empty")]
    EmptyPartyName,

    /// Output index could not be parsed as a non-negative integer.
    #[error("invalid output index {0:?}: expected a non-negative integer")]
    InvalidIndex(String),
}
