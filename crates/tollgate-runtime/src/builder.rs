//! Builder for [`InvocationCoordinator`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tollgate_approval::{ApprovalHandler, DecisionEngine};
use tollgate_audit::AuditLog;
use tollgate_core::SchemaRegistry;
use tollgate_elicitation::{ElicitationEngine, ElicitationPresenter};
use tollgate_policy::PolicyStore;

use crate::coordinator::InvocationCoordinator;
use crate::error::{RuntimeError, RuntimeResult};
use crate::executor::ToolExecutor;

/// Wires the components of an [`InvocationCoordinator`].
///
/// The schema registry, executor, approval handler and elicitation
/// presenter are required. The policy store defaults to an empty
/// session-only store and the audit log to an in-memory log.
#[derive(Default)]
pub struct CoordinatorBuilder {
    registry: Option<Arc<dyn SchemaRegistry>>,
    executor: Option<Arc<dyn ToolExecutor>>,
    approval: Option<Arc<dyn ApprovalHandler>>,
    presenter: Option<Arc<dyn ElicitationPresenter>>,
    policy: Option<Arc<PolicyStore>>,
    audit: Option<Arc<AuditLog>>,
    approval_timeout: Option<Duration>,
    elicitation_timeout: Option<Duration>,
}

impl CoordinatorBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the schema registry.
    #[must_use]
    pub fn registry(mut self, registry: Arc<dyn SchemaRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Set the tool executor.
    #[must_use]
    pub fn executor(mut self, executor: Arc<dyn ToolExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Set the approval handler.
    #[must_use]
    pub fn approval_handler(mut self, handler: Arc<dyn ApprovalHandler>) -> Self {
        self.approval = Some(handler);
        self
    }

    /// Set the elicitation presenter.
    #[must_use]
    pub fn elicitation_presenter(mut self, presenter: Arc<dyn ElicitationPresenter>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    /// Use an existing policy store.
    #[must_use]
    pub fn policy_store(mut self, policy: Arc<PolicyStore>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Use an existing audit log.
    #[must_use]
    pub fn audit_log(mut self, audit: Arc<AuditLog>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Treat unanswered approval prompts as cancelled after `timeout`.
    #[must_use]
    pub fn approval_timeout(mut self, timeout: Duration) -> Self {
        self.approval_timeout = Some(timeout);
        self
    }

    /// Treat unanswered elicitation prompts as cancelled after `timeout`.
    #[must_use]
    pub fn elicitation_timeout(mut self, timeout: Duration) -> Self {
        self.elicitation_timeout = Some(timeout);
        self
    }

    /// Assemble the coordinator.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::MissingComponent`] if a required component
    /// was not set.
    pub fn build(self) -> RuntimeResult<InvocationCoordinator> {
        let registry = self
            .registry
            .ok_or(RuntimeError::MissingComponent("schema registry"))?;
        let executor = self
            .executor
            .ok_or(RuntimeError::MissingComponent("tool executor"))?;
        let approval = self
            .approval
            .ok_or(RuntimeError::MissingComponent("approval handler"))?;
        let presenter = self
            .presenter
            .ok_or(RuntimeError::MissingComponent("elicitation presenter"))?;

        let policy = self
            .policy
            .unwrap_or_else(|| Arc::new(PolicyStore::new()));
        let audit = self.audit.unwrap_or_else(|| Arc::new(AuditLog::in_memory()));

        let mut elicitation = ElicitationEngine::new(presenter);
        if let Some(timeout) = self.elicitation_timeout {
            elicitation = elicitation.with_timeout(timeout);
        }

        let mut engine = DecisionEngine::new(registry, policy, elicitation, approval);
        if let Some(timeout) = self.approval_timeout {
            engine = engine.with_approval_timeout(timeout);
        }

        Ok(InvocationCoordinator::new(engine, executor, audit))
    }
}

impl fmt::Debug for CoordinatorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoordinatorBuilder")
            .field("has_registry", &self.registry.is_some())
            .field("has_executor", &self.executor.is_some())
            .field("has_approval_handler", &self.approval.is_some())
            .field("has_elicitation_presenter", &self.presenter.is_some())
            .field("policy", &self.policy)
            .field("approval_timeout", &self.approval_timeout)
            .field("elicitation_timeout", &self.elicitation_timeout)
            .finish_non_exhaustive()
    }
}
