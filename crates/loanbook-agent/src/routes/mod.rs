//! # Business Routes
//!
//! | Route | Flows started |
//! |-------|---------------|
//! | `GET /loans` | `loans-owned-by-account` |
//! | `GET /createLoan` | `issue-loan` |
//! | `GET /accounts` | `accounts` |
//! | `GET /loan/split/:tx_hash/:tx_idx` | `loans-owned-by-account`, `split-loan`, `loans-owned-by-account` |
//! | `GET /loan/move/:tx_hash/:tx_idx/:account_key` | `loans-owned-by-account`, `accounts`, `move-loan`, `loans-owned-by-account` |
//!
//! Every flow is awaited before the next starts. Path parameters are
//! validated before the first flow.

pub mod accounts;
pub mod loans;

use axum::Router;
use loanbook_node_client::LedgerRpc;

use crate::error::AppError;
use crate::state::AppState;

/// Router for all business routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(loans::router())
        .merge(accounts::router())
}

/// Extract the ledger client from state, or return 503.
pub(crate) fn require_ledger(state: &AppState) -> Result<&dyn LedgerRpc, AppError> {
    state.ledger.as_deref().ok_or_else(|| {
        AppError::service_unavailable(
            "ledger node client not configured. Set LEDGER_RPC_TOKEN and LEDGER_NODE_URL.",
        )
    })
}
