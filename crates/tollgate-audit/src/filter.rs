//! Audit queries.

use tollgate_core::{PermissionDecision, Timestamp};

use crate::record::AuditRecord;

/// Criteria for [`AuditLog::query`](crate::AuditLog::query).
///
/// Unset criteria match everything. The time range applies to the request
/// timestamp and is inclusive at both ends. Filtering on
/// [`PermissionDecision::Asked`] selects records that went through an
/// approval prompt, whatever the final decision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditFilter {
    /// Only records for this tool.
    pub tool: Option<String>,
    /// Only records requested at or after this time.
    pub since: Option<Timestamp>,
    /// Only records requested at or before this time.
    pub until: Option<Timestamp>,
    /// Only records with this decision.
    pub decision: Option<PermissionDecision>,
}

impl AuditFilter {
    /// A filter that matches every record.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to one tool.
    #[must_use]
    pub fn tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = Some(tool.into());
        self
    }

    /// Restrict to requests at or after `since`.
    #[must_use]
    pub fn since(mut self, since: Timestamp) -> Self {
        self.since = Some(since);
        self
    }

    /// Restrict to requests at or before `until`.
    #[must_use]
    pub fn until(mut self, until: Timestamp) -> Self {
        self.until = Some(until);
        self
    }

    /// Restrict to one decision.
    #[must_use]
    pub fn decision(mut self, decision: PermissionDecision) -> Self {
        self.decision = Some(decision);
        self
    }

    /// Check whether `record` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, record: &AuditRecord) -> bool {
        if self.tool.as_deref().is_some_and(|t| t != record.tool) {
            return false;
        }
        if self.since.is_some_and(|s| record.requested_at < s) {
            return false;
        }
        if self.until.is_some_and(|u| record.requested_at > u) {
            return false;
        }
        match self.decision {
            None => true,
            Some(PermissionDecision::Asked) => record.asked,
            Some(d) => record.decision == d,
        }
    }
}
