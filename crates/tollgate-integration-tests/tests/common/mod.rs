//! Shared test harness for integration tests.

use std::sync::Arc;

use tollgate_audit::{AuditLog, AuditRecord};
use tollgate_core::RequestId;
use tollgate_policy::{PolicyEntry, PolicyStore};
use tollgate_runtime::InvocationCoordinator;
use tollgate_test::{
    MockApprovalHandler, MockElicitationPresenter, MockExecutor, init_test_logging, test_registry,
};

/// A coordinator wired to mocks, with handles to inspect each of them.
#[allow(dead_code)]
pub struct Harness {
    /// The coordinator under test.
    pub coordinator: Arc<InvocationCoordinator>,
    /// The executor behind the coordinator.
    pub executor: Arc<MockExecutor>,
    /// The approval handler behind the coordinator.
    pub approval: Arc<MockApprovalHandler>,
    /// The elicitation presenter behind the coordinator.
    pub presenter: Arc<MockElicitationPresenter>,
}

#[allow(dead_code)]
impl Harness {
    /// Build a harness over an in-memory policy store and audit log.
    pub fn new(
        policy: PolicyStore,
        approval: MockApprovalHandler,
        presenter: MockElicitationPresenter,
        executor: MockExecutor,
    ) -> Self {
        Self::with_audit(policy, AuditLog::in_memory(), approval, presenter, executor)
    }

    /// Build a harness over the given audit log.
    pub fn with_audit(
        policy: PolicyStore,
        audit: AuditLog,
        approval: MockApprovalHandler,
        presenter: MockElicitationPresenter,
        executor: MockExecutor,
    ) -> Self {
        init_test_logging();

        let executor = executor.into_arc();
        let approval = approval.into_arc();
        let presenter = presenter.into_arc();
        let coordinator = InvocationCoordinator::builder()
            .registry(test_registry())
            .executor(executor.clone())
            .approval_handler(approval.clone())
            .elicitation_presenter(presenter.clone())
            .policy_store(Arc::new(policy))
            .audit_log(Arc::new(audit))
            .build()
            .expect("all components supplied");

        Self {
            coordinator: Arc::new(coordinator),
            executor,
            approval,
            presenter,
        }
    }

    /// The only audit record for `request_id`.
    pub fn record(&self, request_id: &RequestId) -> AuditRecord {
        self.coordinator
            .audit()
            .get(request_id)
            .expect("every invocation leaves a record")
    }

    /// The current policy entry for `tool`.
    pub fn policy(&self, tool: &str) -> Option<PolicyEntry> {
        self.coordinator.policy().lookup(tool)
    }
}

/// A policy store seeded with one entry.
#[allow(dead_code)]
pub fn policy_with(tool: &str, entry: PolicyEntry) -> PolicyStore {
    PolicyStore::new().with_entries([(tool, entry)])
}
