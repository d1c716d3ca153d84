//! Flow RPC wire contract.
//!
//! Every flow is a `POST` to `{node_url}/rpc/flows/{flow}` with a camelCase
//! JSON body; the response body is the flow's return value.
//!
//! | Flow | Body | Returns |
//! |------|------|---------|
//! | `loans-owned-by-account` | [`LoansOwnedByAccount`] | `[StateAndRef<LoanBook>]` |
//! | `issue-loan` | [`IssueLoan`] | `StateAndRef<LoanBook>` |
//! | `accounts` | [`ListAccounts`] | `[StateAndRef<AccountInfo>]` |
//! | `split-loan` | [`SplitLoan`] | `[StateAndRef<LoanBook>]` |
//! | `move-loan` | [`MoveLoan`] | `StateAndRef<LoanBook>` |
//!
//! `GET {node_url}/rpc/health` answers `200` when the node accepts flows.

use loanbook_core::{AccountId, LoanBook, StateAndRef};
use serde::{Deserialize, Serialize};

/// Path prefix of all flow endpoints, relative to the node URL.
pub const FLOW_PREFIX: &str = "rpc/flows";

/// Path of the node health endpoint, relative to the node URL.
pub const HEALTH_PATH: &str = "rpc/health";

/// Flow names as they appear in the endpoint path.
pub mod names {
    pub const LOANS_OWNED_BY_ACCOUNT: &str = "loans-owned-by-account";
    pub const ISSUE_LOAN: &str = "issue-loan";
    pub const ACCOUNTS: &str = "accounts";
    pub const SPLIT_LOAN: &str = "split-loan";
    pub const MOVE_LOAN: &str = "move-loan";
}

/// Body of `loans-owned-by-account`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoansOwnedByAccount {
    pub account: AccountId,
}

/// Body of `issue-loan`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueLoan {
    #[serde(rename = "valueInUSD")]
    pub value_in_usd: i64,
    pub owning_account: AccountId,
}

/// Body of `accounts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAccounts {
    pub include_inactive: bool,
}

/// Body of `split-loan`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitLoan {
    pub loan: StateAndRef<LoanBook>,
    pub split_value: i64,
}

/// Body of `move-loan`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveLoan {
    pub target_account_id: AccountId,
    pub loan: StateAndRef<LoanBook>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_loan_body_field_names() {
        let id = AccountId::from_uuid(uuid::Uuid::nil());
        let json = serde_json::to_value(IssueLoan {
            value_in_usd: 10_000_000,
            owning_account: id,
        })
        .unwrap();
        assert_eq!(json["valueInUSD"], 10_000_000);
        assert_eq!(json["owningAccount"], "00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn list_accounts_body_field_names() {
        let json = serde_json::to_value(ListAccounts {
            include_inactive: false,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "includeInactive": false }));
    }
}
