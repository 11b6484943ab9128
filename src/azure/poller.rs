//! Long-running operation polling
//!
//! ARM reports asynchronous work in three ways, tried in this order:
//!
//! 1. an `Azure-AsyncOperation` header pointing at a status document
//!    (`{"status": "InProgress" | "Succeeded" | "Failed" | "Canceled"}`),
//! 2. a `Location` header on a `202 Accepted`, which keeps answering `202`
//!    until the work is done,
//! 3. a `properties.provisioningState` on the resource itself.
//!
//! [`Poller`] drives one of those to a terminal state. Time comes from a
//! [`Clock`] so tests can run the whole state machine without sleeping.

use super::client::ArmClient;
use super::http::ArmResponse;
use crate::error::{Error, Result};
use futures::future::BoxFuture;
use reqwest::Method;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Source of time for polling and deadlines.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()>;
}

/// Wall clock backed by tokio timers.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Stand-in expiry for budgets too large to represent as an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Wall-clock budget for one operation.
#[derive(Debug, Clone)]
pub struct Deadline {
    clock: Arc<dyn Clock>,
    expires_at: Instant,
    timeout: Duration,
    operation: String,
}

impl Deadline {
    pub fn new(clock: Arc<dyn Clock>, timeout: Duration, operation: impl Into<String>) -> Self {
        let now = clock.now();
        // Instant addition panics on overflow; clamp to a distant deadline.
        let expires_at = now
            .checked_add(timeout)
            .or_else(|| now.checked_add(FAR_FUTURE))
            .unwrap_or(now);
        Self {
            clock,
            expires_at,
            timeout,
            operation: operation.into(),
        }
    }

    /// Time left before the deadline, zero once expired.
    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(self.clock.now())
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_zero()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// The error reported when this deadline passes.
    pub fn timeout_error(&self) -> Error {
        Error::Timeout {
            operation: self.operation.clone(),
            timeout: self.timeout,
        }
    }
}

/// Status of an asynchronous operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    InProgress,
    Succeeded,
    Failed,
    Canceled,
}

impl OperationState {
    /// Parse an ARM status string. Anything unknown is still running.
    pub fn parse(status: &str) -> Self {
        match status.to_ascii_lowercase().as_str() {
            "succeeded" => Self::Succeeded,
            "failed" => Self::Failed,
            "canceled" | "cancelled" => Self::Canceled,
            _ => Self::InProgress,
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// What to poll after a mutating call returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollTarget {
    /// Nothing left to wait for.
    Done,
    /// Status document from the `Azure-AsyncOperation` header.
    AsyncOperation(String),
    /// `Location` URL that answers 202 while the operation runs.
    Location(String),
    /// The resource URL; wait for a terminal `provisioningState`.
    ProvisioningState(String),
    /// The resource URL; wait until it answers 404.
    UntilGone(String),
}

impl PollTarget {
    /// Pick the polling strategy for `response` to `method` on `resource_url`.
    pub fn from_response(method: &Method, resource_url: &str, response: &ArmResponse) -> Self {
        if let Some(url) = &response.async_operation {
            return Self::AsyncOperation(url.clone());
        }
        if response.status == 202 {
            if let Some(url) = &response.location {
                return Self::Location(url.clone());
            }
            if *method == Method::DELETE {
                return Self::UntilGone(resource_url.to_string());
            }
        }
        if *method != Method::DELETE {
            let pending = response
                .provisioning_state()
                .map(|s| !OperationState::parse(s).is_terminal())
                .unwrap_or(false);
            if pending || response.status == 202 {
                return Self::ProvisioningState(resource_url.to_string());
            }
        }
        Self::Done
    }
}

/// Result of a single poll request.
#[derive(Debug, Clone, PartialEq)]
pub enum PollStep {
    Pending(Option<Duration>),
    Done,
}

/// Interpret a status document returned by an `Azure-AsyncOperation` URL.
pub fn evaluate_status_document(body: &Value) -> Result<OperationState> {
    let status = body
        .get("status")
        .and_then(|s| s.as_str())
        .unwrap_or("InProgress");
    let state = OperationState::parse(status);
    match state {
        OperationState::Failed | OperationState::Canceled => {
            Err(operation_failed(status, body.get("error").unwrap_or(body)))
        },
        _ => Ok(state),
    }
}

/// Interpret the resource body while waiting on `provisioningState`.
pub fn evaluate_provisioning_state(body: &Value) -> Result<OperationState> {
    let properties = body.get("properties").unwrap_or(&Value::Null);
    let status = properties
        .get("provisioningState")
        .and_then(|s| s.as_str())
        .unwrap_or("Succeeded");
    let state = OperationState::parse(status);
    match state {
        OperationState::Failed | OperationState::Canceled => Err(operation_failed(
            status,
            properties.get("error").unwrap_or(&Value::Null),
        )),
        _ => Ok(state),
    }
}

fn operation_failed(status: &str, error: &Value) -> Error {
    let (code, message) = super::http::parse_error_envelope(error);
    Error::OperationFailed {
        status: status.to_string(),
        code,
        message,
    }
}

/// Drives one [`PollTarget`] to completion.
pub struct Poller<'a> {
    client: &'a ArmClient,
    target: PollTarget,
    interval: Duration,
}

impl<'a> Poller<'a> {
    pub fn new(client: &'a ArmClient, target: PollTarget) -> Self {
        Self {
            client,
            target,
            interval: client.poll_interval(),
        }
    }

    pub fn target(&self) -> &PollTarget {
        &self.target
    }

    /// Issue one poll request.
    pub async fn poll_once(&self) -> Result<PollStep> {
        match &self.target {
            PollTarget::Done => Ok(PollStep::Done),
            PollTarget::AsyncOperation(url) => {
                let response = self.client.get_url(url).await?;
                match evaluate_status_document(&response.body)? {
                    OperationState::Succeeded => Ok(PollStep::Done),
                    _ => Ok(PollStep::Pending(response.retry_after)),
                }
            },
            PollTarget::Location(url) => {
                let response = self.client.get_url(url).await?;
                if response.status == 202 {
                    Ok(PollStep::Pending(response.retry_after))
                } else {
                    Ok(PollStep::Done)
                }
            },
            PollTarget::ProvisioningState(url) => {
                let response = self.client.get_url(url).await?;
                match evaluate_provisioning_state(&response.body)? {
                    OperationState::Succeeded => Ok(PollStep::Done),
                    _ => Ok(PollStep::Pending(response.retry_after)),
                }
            },
            PollTarget::UntilGone(url) => match self.client.get_url(url).await {
                Ok(response) => Ok(PollStep::Pending(response.retry_after)),
                Err(e) if e.is_not_found() => Ok(PollStep::Done),
                Err(e) => Err(e),
            },
        }
    }

    /// Poll until the operation is terminal or `deadline` passes.
    pub async fn wait(&self, deadline: &Deadline) -> Result<()> {
        let mut delay = None;
        let mut attempts: u32 = 0;

        loop {
            if matches!(self.target, PollTarget::Done) {
                return Ok(());
            }
            if deadline.is_expired() {
                tracing::warn!(
                    "giving up on {:?} after {} polls: deadline for {} passed",
                    self.target,
                    attempts,
                    deadline.operation()
                );
                return Err(deadline.timeout_error());
            }

            if attempts > 0 {
                let wait = delay.unwrap_or(self.interval).min(deadline.remaining());
                deadline.clock().sleep(wait).await;
                if deadline.is_expired() {
                    return Err(deadline.timeout_error());
                }
            }

            attempts += 1;
            match self.poll_once().await? {
                PollStep::Done => {
                    tracing::debug!("{:?} finished after {} polls", self.target, attempts);
                    return Ok(());
                },
                PollStep::Pending(retry_after) => {
                    tracing::debug!("{:?} still in progress (poll {})", self.target, attempts);
                    delay = retry_after;
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(status: u16, body: Value) -> ArmResponse {
        ArmResponse {
            status,
            body,
            async_operation: None,
            location: None,
            retry_after: None,
        }
    }

    #[test]
    fn test_operation_state_parse_is_case_insensitive() {
        assert_eq!(OperationState::parse("Succeeded"), OperationState::Succeeded);
        assert_eq!(OperationState::parse("SUCCEEDED"), OperationState::Succeeded);
        assert_eq!(OperationState::parse("Cancelled"), OperationState::Canceled);
        assert_eq!(OperationState::parse("Updating"), OperationState::InProgress);
        assert!(!OperationState::parse("Building").is_terminal());
    }

    #[test]
    fn test_target_prefers_async_operation_header() {
        let mut resp = response(201, json!({"properties": {"provisioningState": "Building"}}));
        resp.async_operation = Some("https://op".to_string());
        resp.location = Some("https://loc".to_string());
        assert_eq!(
            PollTarget::from_response(&Method::PUT, "https://res", &resp),
            PollTarget::AsyncOperation("https://op".to_string())
        );
    }

    #[test]
    fn test_target_location_on_accepted() {
        let mut resp = response(202, Value::Null);
        resp.location = Some("https://loc".to_string());
        assert_eq!(
            PollTarget::from_response(&Method::DELETE, "https://res", &resp),
            PollTarget::Location("https://loc".to_string())
        );
    }

    #[test]
    fn test_target_bare_accepted_delete_waits_until_gone() {
        let resp = response(202, Value::Null);
        assert_eq!(
            PollTarget::from_response(&Method::DELETE, "https://res", &resp),
            PollTarget::UntilGone("https://res".to_string())
        );
    }

    #[test]
    fn test_target_provisioning_state() {
        let resp = response(201, json!({"properties": {"provisioningState": "Provisioning"}}));
        assert_eq!(
            PollTarget::from_response(&Method::PUT, "https://res", &resp),
            PollTarget::ProvisioningState("https://res".to_string())
        );

        let done = response(200, json!({"properties": {"provisioningState": "Succeeded"}}));
        assert_eq!(
            PollTarget::from_response(&Method::PUT, "https://res", &done),
            PollTarget::Done
        );

        let deleted = response(200, Value::Null);
        assert_eq!(
            PollTarget::from_response(&Method::DELETE, "https://res", &deleted),
            PollTarget::Done
        );
    }

    #[test]
    fn test_status_document_failure_carries_error() {
        let body = json!({
            "status": "Failed",
            "error": {"code": "QuotaExceeded", "message": "not enough hosts"}
        });
        let err = evaluate_status_document(&body).unwrap_err();
        match err {
            Error::OperationFailed { status, code, message } => {
                assert_eq!(status, "Failed");
                assert_eq!(code, "QuotaExceeded");
                assert_eq!(message, "not enough hosts");
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_status_document_without_status_is_pending() {
        assert_eq!(
            evaluate_status_document(&json!({})).unwrap(),
            OperationState::InProgress
        );
    }

    #[test]
    fn test_provisioning_state_missing_counts_as_done() {
        assert_eq!(
            evaluate_provisioning_state(&json!({"name": "x"})).unwrap(),
            OperationState::Succeeded
        );
        assert!(evaluate_provisioning_state(
            &json!({"properties": {"provisioningState": "Canceled"}})
        )
        .is_err());
    }

    #[test]
    fn test_deadline_remaining_with_system_clock() {
        let deadline = Deadline::new(Arc::new(SystemClock), Duration::from_secs(60), "create");
        assert!(!deadline.is_expired());
        assert!(deadline.remaining() <= Duration::from_secs(60));

        let expired = Deadline::new(Arc::new(SystemClock), Duration::ZERO, "delete");
        assert!(expired.is_expired());
        assert!(expired.timeout_error().is_timeout());
    }

    #[test]
    fn test_deadline_with_unrepresentable_timeout_does_not_overflow() {
        let deadline = Deadline::new(Arc::new(SystemClock), Duration::MAX, "create");
        assert!(!deadline.is_expired());
        assert_eq!(deadline.timeout(), Duration::MAX);
    }
}
