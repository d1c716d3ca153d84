//! In-memory [`LedgerRpc`] and request helpers for handler tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use http_body_util::BodyExt;
use loanbook_core::{
    sha256_hash, AccountId, AccountInfo, LoanBook, PartyName, SecureHash, SigningKey, StateAndRef,
    StateRef,
};
use loanbook_node_client::{LedgerRpc, NodeRpcError};
use uuid::Uuid;

use crate::state::AppConfig;

/// Key every fake loan is owned by unless moved.
pub const AGENT_KEY: &str = "Agent1";

pub fn agent_account() -> AccountId {
    AccountId::from_uuid(Uuid::from_u128(1))
}

pub fn config() -> AppConfig {
    AppConfig {
        port: 0,
        agent_account: agent_account(),
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_string(resp: Response) -> String {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(resp: Response) -> serde_json::Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// A flow started on the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    LoansOwnedByAccount(AccountId),
    IssueLoan(i64, AccountId),
    Accounts(bool),
    SplitLoan(StateRef, i64),
    MoveLoan(AccountId, StateRef),
}

#[derive(Default)]
struct Inner {
    loans: Vec<StateAndRef<LoanBook>>,
    accounts: Vec<StateAndRef<AccountInfo>>,
    calls: Vec<Call>,
    failing: bool,
    transactions: u32,
}

/// Ledger fake that keeps a vault in a `Vec`, so duplicates can be planted.
#[derive(Clone, Default)]
pub struct FakeLedger {
    inner: Arc<Mutex<Inner>>,
}

impl FakeLedger {
    pub fn with_loan(self, txhash: SecureHash, index: u32, value_in_usd: i64) -> Self {
        self.inner.lock().unwrap().loans.push(StateAndRef::new(
            LoanBook {
                deal_id: Uuid::new_v4(),
                value_in_usd,
                owning_account: Some(SigningKey::new(AGENT_KEY).unwrap()),
            },
            StateRef::new(txhash, index),
        ));
        self
    }

    pub fn with_account(self, name: &str, key: &str) -> Self {
        let account = StateAndRef::new(
            AccountInfo {
                account_name: name.to_string(),
                account_host: PartyName::new("O=Agent Bank, L=London, C=GB").unwrap(),
                account_id: AccountId::new(),
                signing_key: Some(SigningKey::new(key).unwrap()),
                carbon_copy_receivers: Vec::new(),
            },
            StateRef::new(sha256_hash(name.as_bytes()), 0),
        );
        self.inner.lock().unwrap().accounts.push(account);
        self
    }

    /// Make every flow fail as if the node rejected it.
    pub fn failing(self) -> Self {
        self.inner.lock().unwrap().failing = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn loans(&self) -> Vec<StateAndRef<LoanBook>> {
        self.inner.lock().unwrap().loans.clone()
    }

    pub fn accounts(&self) -> Vec<StateAndRef<AccountInfo>> {
        self.inner.lock().unwrap().accounts.clone()
    }

    fn record(&self, call: Call) -> Result<(), NodeRpcError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(call);
        if inner.failing {
            return Err(NodeRpcError::Flow {
                endpoint: "fake".into(),
                status: 500,
                body: "flow failed".into(),
            });
        }
        Ok(())
    }
}

impl Inner {
    fn next_txhash(&mut self) -> SecureHash {
        self.transactions += 1;
        sha256_hash(format!("tx-{}", self.transactions).as_bytes())
    }

    fn consume(&mut self, reference: &StateRef) -> Result<StateAndRef<LoanBook>, NodeRpcError> {
        let pos = self
            .loans
            .iter()
            .position(|l| &l.reference == reference)
            .ok_or_else(|| NodeRpcError::Flow {
                endpoint: "fake".into(),
                status: 409,
                body: "input already consumed".into(),
            })?;
        Ok(self.loans.remove(pos))
    }
}

#[async_trait]
impl LedgerRpc for FakeLedger {
    async fn loans_owned_by_account(
        &self,
        account: AccountId,
    ) -> Result<Vec<StateAndRef<LoanBook>>, NodeRpcError> {
        self.record(Call::LoansOwnedByAccount(account))?;
        Ok(self.loans())
    }

    async fn issue_loan(
        &self,
        value_in_usd: i64,
        owning_account: AccountId,
    ) -> Result<StateAndRef<LoanBook>, NodeRpcError> {
        self.record(Call::IssueLoan(value_in_usd, owning_account))?;
        let mut inner = self.inner.lock().unwrap();
        let txhash = inner.next_txhash();
        let loan = StateAndRef::new(
            LoanBook {
                deal_id: Uuid::new_v4(),
                value_in_usd,
                owning_account: Some(SigningKey::new(AGENT_KEY).unwrap()),
            },
            StateRef::new(txhash, 0),
        );
        inner.loans.push(loan.clone());
        Ok(loan)
    }

    async fn accounts(
        &self,
        include_inactive: bool,
    ) -> Result<Vec<StateAndRef<AccountInfo>>, NodeRpcError> {
        self.record(Call::Accounts(include_inactive))?;
        Ok(self.accounts())
    }

    async fn split_loan(
        &self,
        loan: &StateAndRef<LoanBook>,
        split_value: i64,
    ) -> Result<Vec<StateAndRef<LoanBook>>, NodeRpcError> {
        self.record(Call::SplitLoan(loan.reference.clone(), split_value))?;
        let mut inner = self.inner.lock().unwrap();
        let input = inner.consume(&loan.reference)?;
        let txhash = inner.next_txhash();
        let remainder = input.data().value_in_usd - split_value;
        let outputs: Vec<_> = [split_value, remainder]
            .into_iter()
            .enumerate()
            .map(|(i, value_in_usd)| {
                StateAndRef::new(
                    LoanBook {
                        value_in_usd,
                        ..input.data().clone()
                    },
                    StateRef::new(txhash.clone(), i as u32),
                )
            })
            .collect();
        inner.loans.extend(outputs.iter().cloned());
        Ok(outputs)
    }

    async fn move_loan(
        &self,
        target: AccountId,
        loan: &StateAndRef<LoanBook>,
    ) -> Result<StateAndRef<LoanBook>, NodeRpcError> {
        self.record(Call::MoveLoan(target, loan.reference.clone()))?;
        let mut inner = self.inner.lock().unwrap();
        let owner = inner
            .accounts
            .iter()
            .find(|a| a.data().account_id == target)
            .and_then(|a| a.data().signing_key.clone());
        let input = inner.consume(&loan.reference)?;
        let txhash = inner.next_txhash();
        let moved = StateAndRef::new(
            LoanBook {
                owning_account: owner,
                ..input.data().clone()
            },
            StateRef::new(txhash, 0),
        );
        inner.loans.push(moved.clone());
        Ok(moved)
    }

    async fn health(&self) -> Result<(), NodeRpcError> {
        if self.inner.lock().unwrap().failing {
            return Err(NodeRpcError::Flow {
                endpoint: "fake".into(),
                status: 503,
                body: "starting".into(),
            });
        }
        Ok(())
    }
}
