//! # loanbook-agent -- HTTP front end for a ledger node's loan flows
//!
//! Thin translation layer: parses and validates path parameters, starts
//! typed flows on the ledger node through [`loanbook_node_client::LedgerRpc`],
//! awaits each result, and projects returned states into flat JSON views.
//! No domain rules live here; issuance, splitting and transfer are the
//! node's business.
//!
//! ## Routes
//!
//! - business routes: see [`routes`]
//! - `GET /health/liveness`, `GET /health/readiness`
//! - `GET /metrics` (unless `AGENT_METRICS_ENABLED=false`)
//! - `GET /openapi.json`

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod select;
pub mod state;
pub mod views;

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::{Extension, Router};
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

fn metrics_enabled() -> bool {
    std::env::var("AGENT_METRICS_ENABLED")
        .map(|v| v.to_lowercase() != "false")
        .unwrap_or(true)
}

/// Build the complete application router.
pub fn app(state: AppState) -> Router {
    build_app(state, metrics_enabled())
}

fn build_app(state: AppState, metrics_on: bool) -> Router {
    let metrics = ApiMetrics::new();

    let mut api = Router::new()
        .merge(routes::router())
        .merge(openapi::router());

    if metrics_on {
        api = api
            .layer(from_fn(middleware::metrics::metrics_middleware))
            .layer(Extension(metrics.clone()));
    }

    let api = api.layer(TraceLayer::new_for_http()).with_state(state.clone());

    let mut ops = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    if metrics_on {
        ops = ops
            .route("/metrics", axum::routing::get(prometheus_metrics))
            .layer(Extension(metrics));
    }

    Router::new().merge(ops.with_state(state)).merge(api)
}

async fn prometheus_metrics(
    Extension(metrics): Extension<ApiMetrics>,
) -> Result<impl IntoResponse, AppError> {
    let body = metrics.gather_and_encode().map_err(AppError::Internal)?;
    Ok((
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        body,
    ))
}

async fn liveness() -> &'static str {
    "ok"
}

/// Ready when the ledger node is configured and answers its health check.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let Some(ledger) = &state.ledger else {
        return (StatusCode::SERVICE_UNAVAILABLE, "ledger node client not configured")
            .into_response();
    };
    if let Err(e) = ledger.health().await {
        let msg = format!("ledger node unreachable: {e}");
        tracing::warn!("{msg}");
        return (StatusCode::SERVICE_UNAVAILABLE, msg).into_response();
    }
    (StatusCode::OK, "ready").into_response()
}

#[cfg(test)]
pub(crate) mod test_support;
