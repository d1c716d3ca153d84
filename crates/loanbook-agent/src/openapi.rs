//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into one OpenAPI document,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// OpenAPI document for the agent's business routes.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Loan Book Agent",
        version = "0.1.0",
        description = "List, issue, split and move loans held on a ledger node, and list the node's accounts.",
        license(name = "Apache-2.0")
    ),
    paths(
        crate::routes::loans::get_loans,
        crate::routes::loans::create_loan,
        crate::routes::loans::split_loan,
        crate::routes::loans::move_loan,
        crate::routes::accounts::accounts_known,
    ),
    components(schemas(
        crate::views::LoanBookView,
        crate::views::AccountInfoView,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "loans", description = "Loan issuance, splitting and transfer"),
        (name = "accounts", description = "Accounts known to the ledger node"),
    )
)]
pub struct ApiDoc;

/// Router serving `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
