//! # Ledger States
//!
//! Records the ledger node returns from its flows. A state is always
//! delivered together with the reference of the transaction output that
//! holds it, as a [`StateAndRef`].
//!
//! ## Wire Format
//!
//! camelCase JSON, matching the node's flow RPC payloads:
//!
//! ```json
//! {
//!   "state": { "data": { "dealId": "…", "valueInUSD": 10000000, "owningAccount": "…" } },
//!   "ref":   { "txhash": "9F86D0…", "index": 0 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hash::SecureHash;
use crate::identity::{AccountId, PartyName, SigningKey};

/// Pointer to one output of a ledger transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateRef {
    /// Hash of the transaction that produced the output.
    pub txhash: SecureHash,
    /// Position of the output within that transaction.
    pub index: u32,
}

impl StateRef {
    /// Create a reference to output `index` of transaction `txhash`.
    pub fn new(txhash: SecureHash, index: u32) -> Self {
        Self { txhash, index }
    }
}

impl std::fmt::Display for StateRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.txhash, self.index)
    }
}

/// Envelope around the contract data of a state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionState<T> {
    /// Contract data.
    pub data: T,
}

/// A state together with the reference of the output that holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateAndRef<T> {
    /// The state.
    pub state: TransactionState<T>,
    /// Where the state lives on the ledger.
    #[serde(rename = "ref")]
    pub reference: StateRef,
}

impl<T> StateAndRef<T> {
    /// Wrap `data` as the state at `reference`.
    pub fn new(data: T, reference: StateRef) -> Self {
        Self {
            state: TransactionState { data },
            reference,
        }
    }

    /// Shorthand for `self.state.data`.
    pub fn data(&self) -> &T {
        &self.state.data
    }
}

/// A loan asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanBook {
    /// Deal identifier, preserved across splits and moves.
    pub deal_id: Uuid,
    /// Principal in US dollars.
    #[serde(rename = "valueInUSD")]
    pub value_in_usd: i64,
    /// Signing key of the owning account. `None` for an unowned loan.
    #[serde(default)]
    pub owning_account: Option<SigningKey>,
}

/// An account known to the ledger node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    /// Human-readable account name.
    pub account_name: String,
    /// Identity of the node hosting the account.
    pub account_host: PartyName,
    /// Account identifier.
    pub account_id: AccountId,
    /// Signing key the account owns states under.
    #[serde(default)]
    pub signing_key: Option<SigningKey>,
    /// Parties that receive a copy of every transaction for this account.
    #[serde(default, alias = "carbonCopyReivers")]
    pub carbon_copy_receivers: Vec<PartyName>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::sha256_hash;

    fn sample_loan() -> StateAndRef<LoanBook> {
        StateAndRef::new(
            LoanBook {
                deal_id: Uuid::nil(),
                value_in_usd: 10_000_000,
                owning_account: Some(SigningKey::new("3yZe7d").unwrap()),
            },
            StateRef::new(sha256_hash(b"tx"), 1),
        )
    }

    #[test]
    fn loan_wire_format_uses_node_field_names() {
        let json = serde_json::to_value(sample_loan()).unwrap();
        let data = &json["state"]["data"];
        assert_eq!(data["dealId"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(data["valueInUSD"], 10_000_000);
        assert_eq!(data["owningAccount"], "3yZe7d");
        assert_eq!(json["ref"]["index"], 1);
        assert_eq!(json["ref"]["txhash"], sha256_hash(b"tx").as_str());
    }

    #[test]
    fn loan_without_owner_deserializes() {
        let json = serde_json::json!({
            "state": { "data": { "dealId": Uuid::nil(), "valueInUSD": 5 } },
            "ref": { "txhash": sha256_hash(b"x").as_str(), "index": 0 }
        });
        let loan: StateAndRef<LoanBook> = serde_json::from_value(json).unwrap();
        assert!(loan.data().owning_account.is_none());
    }

    #[test]
    fn loan_owned_by_non_base58_key_deserializes() {
        let json = serde_json::json!({
            "state": { "data": { "dealId": Uuid::nil(), "valueInUSD": 5, "owningAccount": "O=Legacy" } },
            "ref": { "txhash": sha256_hash(b"x").as_str(), "index": 0 }
        });
        let loan: StateAndRef<LoanBook> = serde_json::from_value(json).unwrap();
        assert_eq!(loan.data().owning_account.as_ref().unwrap().as_str(), "O=Legacy");
    }

    #[test]
    fn invalid_txhash_is_rejected_on_deserialize() {
        let json = serde_json::json!({
            "state": { "data": { "dealId": Uuid::nil(), "valueInUSD": 5 } },
            "ref": { "txhash": "nope", "index": 0 }
        });
        assert!(serde_json::from_value::<StateAndRef<LoanBook>>(json).is_err());
    }

    #[test]
    fn account_accepts_legacy_receiver_field_name() {
        let json = serde_json::json!({
            "accountName": "treasury",
            "accountHost": "O=Agent Bank, L=London, C=GB",
            "accountId": Uuid::nil(),
            "signingKey": "9Ab",
            "carbonCopyReivers": ["O=Regulator, L=New York, C=US"]
        });
        let info: AccountInfo = serde_json::from_value(json).unwrap();
        assert_eq!(info.carbon_copy_receivers.len(), 1);
        assert_eq!(info.signing_key.unwrap().as_str(), "9Ab");
    }

    #[test]
    fn state_ref_ordering_is_by_hash_then_index() {
        let h = sha256_hash(b"a");
        assert!(StateRef::new(h.clone(), 0) < StateRef::new(h, 1));
    }
}
