//! Transport retry policy for flow calls.
//!
//! A flow that only reads the vault may be re-sent when the node could not be
//! reached. A flow that changes ledger state is sent once: if the connection
//! drops after the node accepted it, a second attempt would spend the input
//! twice or fail confusingly, so the caller gets the transport error instead.
//! Non-2xx answers are never retried here; the node did answer.

use std::time::Duration;

use crate::flows;

/// Retries after the first attempt of a read-only flow.
const MAX_RETRIES: u32 = 3;

/// Delay before the first retry; doubles for each further one.
const BASE_DELAY_MS: u64 = 200;

/// Whether a flow changes ledger state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FlowKind {
    ReadOnly,
    Mutating,
}

impl FlowKind {
    /// Classify a flow by name (or the health path). Unknown names are
    /// treated as mutating.
    pub(crate) fn of(flow: &str) -> Self {
        match flow {
            flows::names::LOANS_OWNED_BY_ACCOUNT | flows::names::ACCOUNTS | flows::HEALTH_PATH => {
                Self::ReadOnly
            }
            _ => Self::Mutating,
        }
    }

    fn attempts(self) -> u32 {
        match self {
            Self::ReadOnly => MAX_RETRIES + 1,
            Self::Mutating => 1,
        }
    }
}

/// Delay before retry number `retry` (1-based): 200ms, 400ms, 800ms.
fn backoff(retry: u32) -> Duration {
    Duration::from_millis(BASE_DELAY_MS << (retry - 1))
}

/// Send a request for `flow`, re-sending on transport failure when the flow
/// is read-only.
pub(crate) async fn send_flow<F, Fut>(flow: &str, send: F) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    let kind = FlowKind::of(flow);
    let attempts = kind.attempts();
    let mut attempt = 1;
    loop {
        match send().await {
            Ok(resp) => return Ok(resp),
            Err(e) if attempt < attempts => {
                let delay = backoff(attempt);
                tracing::warn!(flow, attempt, attempts, ?delay, error = %e, "ledger node unreachable, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                if kind == FlowKind::Mutating {
                    tracing::error!(flow, error = %e, "mutating flow not confirmed by the node; outcome unknown");
                }
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    async fn count_attempts(flow: &str) -> u32 {
        let calls = Arc::new(AtomicU32::new(0));
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();

        let result = send_flow(flow, || {
            calls.fetch_add(1, Ordering::SeqCst);
            // Nothing listens on port 1.
            client.get("http://127.0.0.1:1/").send()
        })
        .await;
        assert!(result.is_err());
        calls.load(Ordering::SeqCst)
    }

    #[test]
    fn flows_are_classified_by_effect() {
        assert_eq!(FlowKind::of(flows::names::LOANS_OWNED_BY_ACCOUNT), FlowKind::ReadOnly);
        assert_eq!(FlowKind::of(flows::names::ACCOUNTS), FlowKind::ReadOnly);
        assert_eq!(FlowKind::of(flows::HEALTH_PATH), FlowKind::ReadOnly);
        assert_eq!(FlowKind::of(flows::names::ISSUE_LOAN), FlowKind::Mutating);
        assert_eq!(FlowKind::of(flows::names::SPLIT_LOAN), FlowKind::Mutating);
        assert_eq!(FlowKind::of(flows::names::MOVE_LOAN), FlowKind::Mutating);
        assert_eq!(FlowKind::of("settle-loan"), FlowKind::Mutating);
    }

    #[test]
    fn backoff_doubles() {
        assert_eq!(backoff(1), Duration::from_millis(200));
        assert_eq!(backoff(2), Duration::from_millis(400));
        assert_eq!(backoff(3), Duration::from_millis(800));
    }

    #[tokio::test]
    async fn read_only_flow_is_resent_until_attempts_run_out() {
        assert_eq!(count_attempts(flows::names::ACCOUNTS).await, MAX_RETRIES + 1);
    }

    #[tokio::test]
    async fn mutating_flow_is_sent_once() {
        assert_eq!(count_attempts(flows::names::SPLIT_LOAN).await, 1);
    }
}
