//! # loanbook-node-client -- Typed client for the ledger node's flow RPC
//!
//! One typed method per flow the loan book agent starts on the node:
//! - **loans owned by account** (read-only)
//! - **issue loan** (mutating)
//! - **accounts** (read-only)
//! - **split loan** (mutating)
//! - **move loan** (mutating)
//!
//! ## Architecture
//!
//! [`LedgerRpc`] is the seam the agent's handlers are written against.
//! [`NodeClient`] implements it over HTTP/JSON (see [`flows`] for the wire
//! contract). Tests substitute in-memory implementations.
//!
//! ## Retry Policy
//!
//! Read-only flows retry transport failures with exponential backoff.
//! Mutating flows are sent exactly once; a transport failure on a mutating
//! flow leaves the outcome unknown and is reported as such.

pub mod config;
pub mod error;
pub mod flows;
pub(crate) mod retry;

pub use config::NodeRpcConfig;
pub use error::NodeRpcError;

use std::time::Duration;

use async_trait::async_trait;
use loanbook_core::{AccountId, AccountInfo, LoanBook, StateAndRef};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Typed interface to the ledger node's flows.
///
/// Every call blocks the caller (asynchronously) until the flow has
/// completed and its single result is available.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Unconsumed loan states visible to `account`'s node.
    async fn loans_owned_by_account(
        &self,
        account: AccountId,
    ) -> Result<Vec<StateAndRef<LoanBook>>, NodeRpcError>;

    /// Issue a new loan of `value_in_usd` owned by `owning_account`.
    async fn issue_loan(
        &self,
        value_in_usd: i64,
        owning_account: AccountId,
    ) -> Result<StateAndRef<LoanBook>, NodeRpcError>;

    /// Accounts known to the node, optionally including inactive ones.
    async fn accounts(
        &self,
        include_inactive: bool,
    ) -> Result<Vec<StateAndRef<AccountInfo>>, NodeRpcError>;

    /// Split `loan`, carving off a new output worth `split_value`.
    async fn split_loan(
        &self,
        loan: &StateAndRef<LoanBook>,
        split_value: i64,
    ) -> Result<Vec<StateAndRef<LoanBook>>, NodeRpcError>;

    /// Reassign `loan` to the account `target`.
    async fn move_loan(
        &self,
        target: AccountId,
        loan: &StateAndRef<LoanBook>,
    ) -> Result<StateAndRef<LoanBook>, NodeRpcError>;

    /// Check that the node is reachable and accepting flows.
    async fn health(&self) -> Result<(), NodeRpcError>;
}

/// HTTP implementation of [`LedgerRpc`].
#[derive(Debug, Clone)]
pub struct NodeClient {
    http: reqwest::Client,
    base_url: String,
}

impl NodeClient {
    /// Create a new node client from configuration.
    pub fn new(config: NodeRpcConfig) -> Result<Self, NodeRpcError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::AUTHORIZATION,
                    reqwest::header::HeaderValue::from_str(&format!(
                        "Bearer {}",
                        config.rpc_token.as_str()
                    ))
                    .map_err(|_| NodeRpcError::Config(config::ConfigError::MissingToken))?,
                );
                headers
            })
            .build()
            .map_err(|e| NodeRpcError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        let base_url = config.node_url.as_str().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    /// Start `flow` with `body` and decode its return value.
    async fn start_flow<B, R>(&self, flow: &str, body: &B) -> Result<R, NodeRpcError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let endpoint = format!("POST /{}/{flow}", flows::FLOW_PREFIX);
        let url = format!("{}/{}/{flow}", self.base_url, flows::FLOW_PREFIX);

        let resp = retry::send_flow(flow, || self.http.post(&url).json(body).send())
            .await
            .map_err(|e| NodeRpcError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(NodeRpcError::Flow {
                endpoint,
                status,
                body,
            });
        }

        resp.json().await.map_err(|e| NodeRpcError::Deserialization {
            endpoint,
            source: e,
        })
    }
}

#[async_trait]
impl LedgerRpc for NodeClient {
    async fn loans_owned_by_account(
        &self,
        account: AccountId,
    ) -> Result<Vec<StateAndRef<LoanBook>>, NodeRpcError> {
        let body = flows::LoansOwnedByAccount { account };
        self.start_flow(flows::names::LOANS_OWNED_BY_ACCOUNT, &body).await
    }

    async fn issue_loan(
        &self,
        value_in_usd: i64,
        owning_account: AccountId,
    ) -> Result<StateAndRef<LoanBook>, NodeRpcError> {
        let body = flows::IssueLoan {
            value_in_usd,
            owning_account,
        };
        self.start_flow(flows::names::ISSUE_LOAN, &body).await
    }

    async fn accounts(
        &self,
        include_inactive: bool,
    ) -> Result<Vec<StateAndRef<AccountInfo>>, NodeRpcError> {
        let body = flows::ListAccounts { include_inactive };
        self.start_flow(flows::names::ACCOUNTS, &body).await
    }

    async fn split_loan(
        &self,
        loan: &StateAndRef<LoanBook>,
        split_value: i64,
    ) -> Result<Vec<StateAndRef<LoanBook>>, NodeRpcError> {
        let body = flows::SplitLoan {
            loan: loan.clone(),
            split_value,
        };
        self.start_flow(flows::names::SPLIT_LOAN, &body).await
    }

    async fn move_loan(
        &self,
        target: AccountId,
        loan: &StateAndRef<LoanBook>,
    ) -> Result<StateAndRef<LoanBook>, NodeRpcError> {
        let body = flows::MoveLoan {
            target_account_id: target,
            loan: loan.clone(),
        };
        self.start_flow(flows::names::MOVE_LOAN, &body).await
    }

    async fn health(&self) -> Result<(), NodeRpcError> {
        let endpoint = format!("GET /{}", flows::HEALTH_PATH);
        let url = format!("{}/{}", self.base_url, flows::HEALTH_PATH);

        let resp = retry::send_flow(flows::HEALTH_PATH, || self.http.get(&url).send())
            .await
            .map_err(|e| NodeRpcError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(NodeRpcError::Flow {
                endpoint,
                status,
                body,
            });
        }
        Ok(())
    }
}
