//! Loan routes: list, issue, split and move.

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use loanbook_core::{SecureHash, SigningKey, StateRef, ValidationError};

use super::require_ledger;
use crate::error::AppError;
use crate::extractors::extract_path;
use crate::select::select_single;
use crate::state::AppState;
use crate::views::{loan_views, LoanBookView};

/// Principal of every loan issued through `/createLoan`.
pub const NEW_LOAN_VALUE_USD: i64 = 10_000_000;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/loans", get(get_loans))
        .route("/createLoan", get(create_loan))
        .route("/loan/split/:tx_hash/:tx_idx", get(split_loan))
        .route("/loan/move/:tx_hash/:tx_idx/:account_key", get(move_loan))
}

/// Parse the `(tx_hash, tx_idx)` path pair into a state reference.
fn parse_state_ref(tx_hash: &str, tx_idx: &str) -> Result<StateRef, AppError> {
    let txhash = SecureHash::new(tx_hash)?;
    let index = tx_idx
        .parse::<u32>()
        .map_err(|_| ValidationError::InvalidIndex(tx_idx.to_string()))?;
    Ok(StateRef::new(txhash, index))
}

/// List loans in the agent account's vault view.
#[utoipa::path(
    get,
    path = "/loans",
    responses(
        (status = 200, description = "Unconsumed loans", body = [LoanBookView]),
        (status = 502, description = "Ledger node error", body = crate::error::ErrorBody),
        (status = 503, description = "Ledger node client not configured", body = crate::error::ErrorBody),
    ),
    tag = "loans"
)]
pub(crate) async fn get_loans(
    State(state): State<AppState>,
) -> Result<Json<Vec<LoanBookView>>, AppError> {
    let ledger = require_ledger(&state)?;
    let loans = ledger.loans_owned_by_account(state.agent_account()).await?;
    Ok(Json(loan_views(&loans)))
}

/// Issue a new loan of 10,000,000 USD owned by the agent account.
#[utoipa::path(
    get,
    path = "/createLoan",
    responses(
        (status = 200, description = "The issued loan", body = LoanBookView),
        (status = 502, description = "Ledger node error", body = crate::error::ErrorBody),
        (status = 503, description = "Ledger node client not configured", body = crate::error::ErrorBody),
    ),
    tag = "loans"
)]
pub(crate) async fn create_loan(
    State(state): State<AppState>,
) -> Result<Json<LoanBookView>, AppError> {
    let ledger = require_ledger(&state)?;
    let loan = ledger
        .issue_loan(NEW_LOAN_VALUE_USD, state.agent_account())
        .await?;
    tracing::info!(reference = %loan.reference, deal_id = %loan.data().deal_id, "loan issued");
    Ok(Json(LoanBookView::from(&loan)))
}

/// Split a loan in half and return the refreshed loan list.
#[utoipa::path(
    get,
    path = "/loan/split/{tx_hash}/{tx_idx}",
    params(
        ("tx_hash" = String, Path, description = "Hash of the transaction holding the loan"),
        ("tx_idx" = u32, Path, description = "Output index of the loan"),
    ),
    responses(
        (status = 200, description = "Loans after the split", body = [LoanBookView]),
        (status = 400, description = "Malformed path parameter", body = crate::error::ErrorBody),
        (status = 404, description = "No loan at this reference", body = crate::error::ErrorBody),
        (status = 409, description = "Several loans at this reference", body = crate::error::ErrorBody),
        (status = 502, description = "Ledger node error", body = crate::error::ErrorBody),
        (status = 503, description = "Ledger node client not configured", body = crate::error::ErrorBody),
    ),
    tag = "loans"
)]
pub(crate) async fn split_loan(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<Vec<LoanBookView>>, AppError> {
    let (tx_hash, tx_idx) = extract_path(path)?;
    let target = parse_state_ref(&tx_hash, &tx_idx)?;
    let ledger = require_ledger(&state)?;
    let account = state.agent_account();

    let loans = ledger.loans_owned_by_account(account).await?;
    let loan = select_single(&loans, |l| l.reference == target, format!("loan at {target}"))?;
    let split_value = loan.data().value_in_usd / 2;

    let outputs = ledger.split_loan(loan, split_value).await?;
    tracing::info!(input = %target, split_value, outputs = outputs.len(), "loan split");

    let refreshed = ledger.loans_owned_by_account(account).await?;
    Ok(Json(loan_views(&refreshed)))
}

/// Move a loan to the account holding `account_key` and return the
/// refreshed loan list.
#[utoipa::path(
    get,
    path = "/loan/move/{tx_hash}/{tx_idx}/{account_key}",
    params(
        ("tx_hash" = String, Path, description = "Hash of the transaction holding the loan"),
        ("tx_idx" = u32, Path, description = "Output index of the loan"),
        ("account_key" = String, Path, description = "Base58 signing key of the target account"),
    ),
    responses(
        (status = 200, description = "Loans after the move", body = [LoanBookView]),
        (status = 400, description = "Malformed path parameter", body = crate::error::ErrorBody),
        (status = 404, description = "No loan at this reference or no account with this key", body = crate::error::ErrorBody),
        (status = 409, description = "Several loans or accounts match", body = crate::error::ErrorBody),
        (status = 502, description = "Ledger node error", body = crate::error::ErrorBody),
        (status = 503, description = "Ledger node client not configured", body = crate::error::ErrorBody),
    ),
    tag = "loans"
)]
pub(crate) async fn move_loan(
    State(state): State<AppState>,
    path: Result<Path<(String, String, String)>, PathRejection>,
) -> Result<Json<Vec<LoanBookView>>, AppError> {
    let (tx_hash, tx_idx, account_key) = extract_path(path)?;
    let target = parse_state_ref(&tx_hash, &tx_idx)?;
    let key = SigningKey::new(account_key)?;
    let ledger = require_ledger(&state)?;
    let account = state.agent_account();

    let loans = ledger.loans_owned_by_account(account).await?;
    let accounts = ledger.accounts(false).await?;
    let loan = select_single(&loans, |l| l.reference == target, format!("loan at {target}"))?;
    let recipient = select_single(
        &accounts,
        |a| a.data().signing_key.as_ref() == Some(&key),
        format!("account with key {key}"),
    )?;
    let recipient_id = recipient.data().account_id;

    let moved = ledger.move_loan(recipient_id, loan).await?;
    tracing::info!(input = %target, output = %moved.reference, recipient = %recipient_id, "loan moved");

    let refreshed = ledger.loans_owned_by_account(account).await?;
    Ok(Json(loan_views(&refreshed)))
}
