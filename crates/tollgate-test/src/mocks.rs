//! Mock implementations of the capability traits.
//!
//! Each mock answers from a queue of scripted responses, falls back to a
//! default when the queue is empty, and captures what it was asked. Internal
//! state uses `std::sync::Mutex` so builder methods work without a runtime.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tollgate_approval::{ApprovalHandler, ApprovalRequest, ApprovalResponse};
use tollgate_core::Arguments;
use tollgate_elicitation::{ElicitationOutcome, ElicitationPresenter, ElicitationRequest};
use tollgate_runtime::{ToolExecutionError, ToolExecutor};

// ---------------------------------------------------------------------------
// MockExecutor
// ---------------------------------------------------------------------------

/// A [`ToolExecutor`] returning scripted results per tool.
///
/// Tools without a scripted result echo their arguments back as a JSON
/// object.
#[derive(Debug, Default)]
pub struct MockExecutor {
    results: Mutex<HashMap<String, Result<Value, ToolExecutionError>>>,
    calls: Mutex<Vec<(String, Arguments)>>,
    delay: Option<Duration>,
}

impl MockExecutor {
    /// Create an executor that echoes arguments.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `value` whenever `tool` runs.
    #[must_use]
    pub fn with_result(self, tool: impl Into<String>, value: Value) -> Self {
        if let Ok(mut guard) = self.results.lock() {
            guard.insert(tool.into(), Ok(value));
        }
        self
    }

    /// Fail with `message` whenever `tool` runs.
    #[must_use]
    pub fn with_error(self, tool: impl Into<String>, message: impl Into<String>) -> Self {
        if let Ok(mut guard) = self.results.lock() {
            guard.insert(tool.into(), Err(ToolExecutionError::new(message)));
        }
        self
    }

    /// Sleep for `delay` before answering.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Wrap in an `Arc` for the coordinator builder.
    #[must_use]
    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Every call made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<(String, Arguments)> {
        self.calls.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Number of calls made for `tool`.
    #[must_use]
    pub fn call_count(&self, tool: &str) -> usize {
        self.calls
            .lock()
            .map(|g| g.iter().filter(|(t, _)| t == tool).count())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ToolExecutor for MockExecutor {
    async fn execute(&self, tool: &str, arguments: Arguments) -> Result<Value, ToolExecutionError> {
        if let Ok(mut guard) = self.calls.lock() {
            guard.push((tool.to_string(), arguments.clone()));
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let scripted = self.results.lock().ok().and_then(|g| g.get(tool).cloned());
        scripted.unwrap_or(Ok(Value::Object(arguments)))
    }
}

// ---------------------------------------------------------------------------
// MockApprovalHandler
// ---------------------------------------------------------------------------

/// An [`ApprovalHandler`] answering from a queue.
///
/// A `None` entry (or default) means the prompt was dismissed.
#[derive(Debug)]
pub struct MockApprovalHandler {
    responses: Mutex<VecDeque<Option<ApprovalResponse>>>,
    default_response: Option<ApprovalResponse>,
    requests: Mutex<Vec<ApprovalRequest>>,
    delay: Option<Duration>,
    never_answer: bool,
}

impl MockApprovalHandler {
    fn with_default(default_response: Option<ApprovalResponse>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            default_response,
            requests: Mutex::new(Vec::new()),
            delay: None,
            never_answer: false,
        }
    }

    /// Approve every request once.
    #[must_use]
    pub fn approving() -> Self {
        Self::with_default(Some(ApprovalResponse::approve()))
    }

    /// Deny every request once.
    #[must_use]
    pub fn denying() -> Self {
        Self::with_default(Some(ApprovalResponse::deny()))
    }

    /// Dismiss every request.
    #[must_use]
    pub fn dismissing() -> Self {
        Self::with_default(None)
    }

    /// Never answer; the call waits until cancelled or timed out.
    #[must_use]
    pub fn silent() -> Self {
        Self {
            never_answer: true,
            ..Self::dismissing()
        }
    }

    /// Queue a response, used before the default.
    #[must_use]
    pub fn with_response(self, response: ApprovalResponse) -> Self {
        self.queue(Some(response));
        self
    }

    /// Sleep for `delay` before answering.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a response (or a dismissal) after construction.
    pub fn queue(&self, response: Option<ApprovalResponse>) {
        if let Ok(mut guard) = self.responses.lock() {
            guard.push_back(response);
        }
    }

    /// Wrap in an `Arc` for the coordinator builder.
    #[must_use]
    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Every request presented so far.
    #[must_use]
    pub fn requests(&self) -> Vec<ApprovalRequest> {
        self.requests.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Number of requests presented so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|g| g.len()).unwrap_or_default()
    }
}

#[async_trait]
impl ApprovalHandler for MockApprovalHandler {
    async fn request_approval(&self, request: ApprovalRequest) -> Option<ApprovalResponse> {
        if let Ok(mut guard) = self.requests.lock() {
            guard.push(request);
        }
        if self.never_answer {
            return std::future::pending().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.responses
            .lock()
            .ok()
            .and_then(|mut g| g.pop_front())
            .unwrap_or(self.default_response)
    }
}

// ---------------------------------------------------------------------------
// MockElicitationPresenter
// ---------------------------------------------------------------------------

/// An [`ElicitationPresenter`] answering from a queue.
#[derive(Debug)]
pub struct MockElicitationPresenter {
    outcomes: Mutex<VecDeque<ElicitationOutcome>>,
    default_outcome: ElicitationOutcome,
    requests: Mutex<Vec<ElicitationRequest>>,
}

impl MockElicitationPresenter {
    fn with_default(default_outcome: ElicitationOutcome) -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            default_outcome,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Accept every request with `values`.
    #[must_use]
    pub fn accepting(values: Arguments) -> Self {
        Self::with_default(ElicitationOutcome::Accept(values))
    }

    /// Decline every request.
    #[must_use]
    pub fn declining() -> Self {
        Self::with_default(ElicitationOutcome::Decline)
    }

    /// Cancel every request.
    #[must_use]
    pub fn cancelling() -> Self {
        Self::with_default(ElicitationOutcome::Cancel)
    }

    /// Queue an outcome, used before the default.
    #[must_use]
    pub fn with_outcome(self, outcome: ElicitationOutcome) -> Self {
        if let Ok(mut guard) = self.outcomes.lock() {
            guard.push_back(outcome);
        }
        self
    }

    /// Wrap in an `Arc` for the coordinator builder.
    #[must_use]
    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Every request presented so far.
    #[must_use]
    pub fn requests(&self) -> Vec<ElicitationRequest> {
        self.requests.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Number of requests presented so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|g| g.len()).unwrap_or_default()
    }
}

#[async_trait]
impl ElicitationPresenter for MockElicitationPresenter {
    async fn present(&self, request: ElicitationRequest) -> ElicitationOutcome {
        if let Ok(mut guard) = self.requests.lock() {
            guard.push(request);
        }
        self.outcomes
            .lock()
            .ok()
            .and_then(|mut g| g.pop_front())
            .unwrap_or_else(|| self.default_outcome.clone())
    }
}
