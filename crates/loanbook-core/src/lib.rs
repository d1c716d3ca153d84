#![deny(missing_docs)]

//! # loanbook-core -- Ledger Record Types
//!
//! Types shared by every crate in the workspace: the node client that speaks
//! the flow RPC wire format, the agent that projects records into views, and
//! the in-memory node stub that produces them.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for ledger primitives.** A [`SecureHash`] is not a
//!    `String`, a [`SigningKey`] is not a [`PartyName`]. Text forms are
//!    validated at construction and on deserialization.
//!
//! 2. **Canonical text is the identity.** Selection by reference or by key is
//!    an exact comparison of canonical strings. No case folding happens
//!    anywhere in this crate.
//!
//! 3. **Records are read-only.** [`StateAndRef`] values are produced by the
//!    ledger node; a mutation always yields new references.

pub mod error;
pub mod hash;
pub mod identity;
pub mod state;

pub use error::ValidationError;
pub use hash::{sha256_hash, SecureHash};
pub use identity::{base58_encode, AccountId, PartyName, SigningKey};
pub use state::{AccountInfo, LoanBook, StateAndRef, StateRef, TransactionState};
