//! Route definitions for the ledger node stub.
//!
//! Serves the flow endpoints `loanbook-node-client` calls, with request and
//! response bodies taken from the client's own wire types so the two sides
//! cannot drift apart.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use loanbook_node_client::flows;

use crate::store::{FlowError, NodeStore};

impl IntoResponse for FlowError {
    fn into_response(self) -> Response {
        let status = match &self {
            FlowError::UnknownAccount(_) => StatusCode::NOT_FOUND,
            FlowError::StateConsumed(_) => StatusCode::CONFLICT,
            FlowError::InvalidArgument(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        tracing::debug!(%status, error = %self, "flow failed");
        (status, self.to_string()).into_response()
    }
}

/// Build the complete stub router.
///
/// When `rpc_token` is set every request must carry it as a bearer token.
pub fn router(store: NodeStore, rpc_token: Option<String>) -> Router {
    let flow_route = |flow: &str| format!("/{}/{flow}", flows::FLOW_PREFIX);

    let app = Router::new()
        .route(&format!("/{}", flows::HEALTH_PATH), get(health))
        .route(
            &flow_route(flows::names::LOANS_OWNED_BY_ACCOUNT),
            post(loans_owned_by_account),
        )
        .route(&flow_route(flows::names::ISSUE_LOAN), post(issue_loan))
        .route(&flow_route(flows::names::ACCOUNTS), post(accounts))
        .route(&flow_route(flows::names::SPLIT_LOAN), post(split_loan))
        .route(&flow_route(flows::names::MOVE_LOAN), post(move_loan))
        .fallback(not_implemented)
        .with_state(store);

    match rpc_token {
        Some(token) => app.layer(middleware::from_fn_with_state(
            Arc::<str>::from(token),
            require_bearer,
        )),
        None => app,
    }
}

async fn require_bearer(State(token): State<Arc<str>>, req: Request, next: Next) -> Response {
    let presented = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    if presented != Some(&*token) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    next.run(req).await
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn not_implemented() -> StatusCode {
    StatusCode::NOT_IMPLEMENTED
}

// ── Flows ───────────────────────────────────────────────────────────

async fn loans_owned_by_account(
    State(store): State<NodeStore>,
    Json(body): Json<flows::LoansOwnedByAccount>,
) -> Response {
    match store.loans_owned_by_account(body.account) {
        Ok(loans) => Json(loans).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn issue_loan(
    State(store): State<NodeStore>,
    Json(body): Json<flows::IssueLoan>,
) -> Response {
    match store.issue_loan(body.value_in_usd, body.owning_account) {
        Ok(loan) => Json(loan).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn accounts(
    State(store): State<NodeStore>,
    Json(body): Json<flows::ListAccounts>,
) -> Response {
    Json(store.accounts(body.include_inactive)).into_response()
}

async fn split_loan(
    State(store): State<NodeStore>,
    Json(body): Json<flows::SplitLoan>,
) -> Response {
    match store.split_loan(&body.loan.reference, body.split_value) {
        Ok(outputs) => Json(outputs).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn move_loan(
    State(store): State<NodeStore>,
    Json(body): Json<flows::MoveLoan>,
) -> Response {
    match store.move_loan(body.target_account_id, &body.loan.reference) {
        Ok(moved) => Json(moved).into_response(),
        Err(e) => e.into_response(),
    }
}
