//! # Identity Newtypes
//!
//! Identifiers for accounts, node identities and signing keys.
//!
//! - [`AccountId`]: UUID of an account, always valid by construction.
//! - [`SigningKey`]: a public key in its canonical Base58 text encoding.
//! - [`PartyName`]: the X.500 distinguished name of a node identity,
//!   e.g. `O=Agent Bank, L=London, C=GB`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Bitcoin Base58 alphabet (no `0`, `O`, `I`, `l`).
const BASE58_ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Encode bytes as Base58 text using the Bitcoin alphabet.
///
/// Leading zero bytes become leading `1` characters.
pub fn base58_encode(bytes: &[u8]) -> String {
    let zeros = bytes.iter().take_while(|b| **b == 0).count();

    // Little-endian base-58 digits of the non-zero tail.
    let mut digits: Vec<u8> = Vec::with_capacity(bytes.len() * 138 / 100 + 1);
    for &byte in &bytes[zeros..] {
        let mut carry = u32::from(byte);
        for digit in digits.iter_mut() {
            carry += u32::from(*digit) << 8;
            *digit = (carry % 58) as u8;
            carry /= 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }

    let mut out = String::with_capacity(zeros + digits.len());
    out.extend(std::iter::repeat('1').take(zeros));
    out.extend(
        digits
            .iter()
            .rev()
            .map(|d| BASE58_ALPHABET[usize::from(*d)] as char),
    );
    out
}

// ---------------------------------------------------------------------------
// UUID-based identifiers
// ---------------------------------------------------------------------------

/// Identifier of an account hosted on a ledger node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Create a new random account identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an account identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// String-based identifiers (validated at construction)
// ---------------------------------------------------------------------------

/// Public signing key reference in canonical Base58 text.
///
/// # Validation
///
/// [`SigningKey::new`] requires non-empty input drawn from the Base58
/// alphabet; use it for keys typed by a caller. Deserialization accepts any
/// string, since keys in node replies are the node's own encoding and a key
/// the agent would not have minted must not make a whole listing unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SigningKey(String);

impl SigningKey {
    /// Parse an already-encoded key.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidSigningKey`] for empty input or any
    /// character outside the Base58 alphabet.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.is_empty() || !s.bytes().all(|b| BASE58_ALPHABET.contains(&b)) {
            return Err(ValidationError::InvalidSigningKey(s));
        }
        Ok(Self(s))
    }

    /// Encode raw public key bytes.
    pub fn from_public_key_bytes(bytes: &[u8]) -> Self {
        Self(base58_encode(bytes))
    }

    /// Access the Base58 text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for SigningKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<String> for SigningKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<SigningKey> for String {
    fn from(key: SigningKey) -> Self {
        key.0
    }
}

/// X.500 name of a ledger node identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PartyName(String);

impl PartyName {
    /// Create a party name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyPartyName`] for blank input.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.trim().is_empty() {
            return Err(ValidationError::EmptyPartyName);
        }
        Ok(Self(s))
    }

    /// Access the name text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PartyName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PartyName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PartyName> for String {
    fn from(name: PartyName) -> Self {
        name.0
    }
}
