//! Flat JSON projections of ledger states.
//!
//! Built fresh per request from the records a flow returned; never stored.

use loanbook_core::{AccountInfo, LoanBook, StateAndRef};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A loan as served by the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoanBookView {
    pub deal_id: Uuid,
    #[serde(rename = "valueInUSD")]
    pub value_in_usd: i64,
    /// Base58 signing key of the owning account.
    pub owning_account: Option<String>,
    /// Output index within the producing transaction.
    pub index: u32,
    /// Hash of the producing transaction.
    pub tx_hash: String,
}

impl From<&StateAndRef<LoanBook>> for LoanBookView {
    fn from(loan: &StateAndRef<LoanBook>) -> Self {
        let data = loan.data();
        Self {
            deal_id: data.deal_id,
            value_in_usd: data.value_in_usd,
            owning_account: data.owning_account.as_ref().map(|k| k.to_string()),
            index: loan.reference.index,
            tx_hash: loan.reference.txhash.to_string(),
        }
    }
}

/// An account as served by the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfoView {
    pub account_name: String,
    /// X.500 name of the hosting node.
    pub account_host: String,
    pub account_id: Uuid,
    /// Base58 signing key of the account.
    pub key: Option<String>,
    pub carbon_copy_receivers: Vec<String>,
}

impl From<&StateAndRef<AccountInfo>> for AccountInfoView {
    fn from(account: &StateAndRef<AccountInfo>) -> Self {
        let data = account.data();
        Self {
            account_name: data.account_name.clone(),
            account_host: data.account_host.to_string(),
            account_id: *data.account_id.as_uuid(),
            key: data.signing_key.as_ref().map(|k| k.to_string()),
            carbon_copy_receivers: data
                .carbon_copy_receivers
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

/// Map a flow result to views, preserving order.
pub fn loan_views(loans: &[StateAndRef<LoanBook>]) -> Vec<LoanBookView> {
    loans.iter().map(LoanBookView::from).collect()
}

/// Map a flow result to views, preserving order.
pub fn account_views(accounts: &[StateAndRef<AccountInfo>]) -> Vec<AccountInfoView> {
    accounts.iter().map(AccountInfoView::from).collect()
}
