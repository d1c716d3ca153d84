//! `GET /accounts`: active accounts known to the ledger node.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use super::require_ledger;
use crate::error::AppError;
use crate::state::AppState;
use crate::views::{account_views, AccountInfoView};

pub fn router() -> Router<AppState> {
    Router::new().route("/accounts", get(accounts_known))
}

/// List active accounts. Inactive accounts are never included.
#[utoipa::path(
    get,
    path = "/accounts",
    responses(
        (status = 200, description = "Active accounts", body = [AccountInfoView]),
        (status = 502, description = "Ledger node error", body = crate::error::ErrorBody),
        (status = 503, description = "Ledger node client not configured", body = crate::error::ErrorBody),
    ),
    tag = "accounts"
)]
pub(crate) async fn accounts_known(
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountInfoView>>, AppError> {
    let ledger = require_ledger(&state)?;
    let accounts = ledger.accounts(false).await?;
    tracing::debug!(count = accounts.len(), "listed accounts");
    Ok(Json(account_views(&accounts)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use tower::ServiceExt;

    use super::*;
    use crate::test_support::{self, body_json, get, Call, FakeLedger};

    #[tokio::test]
    async fn accounts_lists_exactly_what_the_node_returns() {
        let ledger = FakeLedger::default()
            .with_account("agent", "Agent1")
            .with_account("counterparty", "Counter2");
        let state = AppState::new(test_support::config(), Arc::new(ledger.clone()));
        let app = router().with_state(state);

        let resp = app.oneshot(get("/accounts")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let views: Vec<AccountInfoView> = serde_json::from_value(body_json(resp).await).unwrap();
        assert_eq!(views.len(), 2);
        assert_eq!(views[1].key.as_deref(), Some("Counter2"));
        assert_eq!(ledger.calls(), vec![Call::Accounts(false)]);
    }
}
