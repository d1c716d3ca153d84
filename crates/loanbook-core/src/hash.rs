//! # Transaction Hashes
//!
//! [`SecureHash`] is the ledger's transaction identifier: a SHA-256 digest
//! rendered as 64 hex characters. Ledger nodes emit upper-case hex. The
//! string is kept exactly as received, so a lower-case rendering of the same
//! digest is a different reference for selection purposes.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ValidationError;

/// Length of a SHA-256 digest in hex characters.
const HEX_LEN: usize = 64;

/// A transaction hash in its canonical text form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SecureHash(String);

impl SecureHash {
    /// Parse a transaction hash, validating length and hex alphabet.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidSecureHash`] unless the input is
    /// exactly 64 ASCII hex digits.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.len() != HEX_LEN || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValidationError::InvalidSecureHash(s));
        }
        Ok(Self(s))
    }

    /// Access the hash text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SecureHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for SecureHash {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for SecureHash {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SecureHash> for String {
    fn from(hash: SecureHash) -> Self {
        hash.0
    }
}

/// Compute the SHA-256 of `data` as an upper-case [`SecureHash`].
pub fn sha256_hash(data: &[u8]) -> SecureHash {
    let digest = Sha256::digest(data);
    SecureHash(digest.iter().map(|b| format!("{b:02X}")).collect())
}
