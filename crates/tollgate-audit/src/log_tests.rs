use super::*;
use crate::record::ExecutionOutcome;
use chrono::Duration;
use serde_json::json;
use tollgate_core::{Arguments, PermissionDecision, Timestamp};
use tollgate_elicitation::ElicitationState;

fn record(tool: &str, decision: PermissionDecision, asked: bool) -> AuditRecord {
    let now = Timestamp::now();
    let outcome = if decision.permits_execution() {
        ExecutionOutcome::Success {
            payload: json!({"ok": true}),
        }
    } else {
        ExecutionOutcome::not_executed("denied by policy")
    };
    AuditRecord {
        request_id: RequestId::new(),
        tool: tool.to_string(),
        arguments: Arguments::new(),
        decision,
        asked,
        elicitation: None,
        outcome,
        requested_at: now,
        decided_at: now,
        completed_at: now,
    }
}

#[test]
fn test_append_and_get() {
    let log = AuditLog::in_memory();
    let rec = record("read_file", PermissionDecision::Allowed, false);
    let id = rec.request_id;
    log.append(rec.clone()).unwrap();

    assert_eq!(log.len(), 1);
    assert_eq!(log.get(&id), Some(rec));
    assert_eq!(log.get(&RequestId::new()), None);
}

#[test]
fn test_duplicate_request_rejected() {
    let log = AuditLog::in_memory();
    let rec = record("read_file", PermissionDecision::Allowed, false);
    let id = rec.request_id;
    log.append(rec.clone()).unwrap();

    let err = log.append(rec).unwrap_err();
    assert_eq!(err, AuditError::DuplicateRecord { request_id: id });
    assert_eq!(log.len(), 1);
}

#[test]
fn test_reserve_claims_an_id_once() {
    let log = AuditLog::in_memory();
    let rec = record("read_file", PermissionDecision::Allowed, false);
    let id = rec.request_id;

    log.reserve(id).unwrap();
    assert_eq!(
        log.reserve(id),
        Err(AuditError::DuplicateRecord { request_id: id })
    );

    // The claim holder still appends.
    log.append(rec).unwrap();
    assert_eq!(
        log.reserve(id),
        Err(AuditError::DuplicateRecord { request_id: id })
    );
    assert_eq!(log.len(), 1);
}

/// Refuses every append.
struct BrokenStorage;

impl AuditStorage for BrokenStorage {
    fn append(&self, _entry: &AuditEntry) -> AuditResult<()> {
        Err(AuditError::Storage("disk full".to_string()))
    }

    fn load(&self) -> AuditResult<Vec<AuditEntry>> {
        Ok(Vec::new())
    }

    fn flush(&self) -> AuditResult<()> {
        Ok(())
    }
}

#[test]
fn test_failed_append_keeps_the_claim() {
    let log = AuditLog::with_storage(Arc::new(BrokenStorage)).unwrap();
    let rec = record("delete_file", PermissionDecision::Allowed, false);
    let id = rec.request_id;

    log.reserve(id).unwrap();
    assert!(matches!(log.append(rec), Err(AuditError::Storage(_))));
    assert!(log.is_empty());
    assert_eq!(
        log.reserve(id),
        Err(AuditError::DuplicateRecord { request_id: id })
    );
}

#[test]
fn test_query_filters_in_insertion_order() {
    let log = AuditLog::in_memory();
    log.append(record("write_file", PermissionDecision::Allowed, true))
        .unwrap();
    log.append(record("delete_file", PermissionDecision::Denied, false))
        .unwrap();
    log.append(record("write_file", PermissionDecision::Denied, true))
        .unwrap();

    let all = log.query(&AuditFilter::all());
    let tools: Vec<&str> = all.iter().map(|r| r.tool.as_str()).collect();
    assert_eq!(tools, vec!["write_file", "delete_file", "write_file"]);

    let writes = log.query(&AuditFilter::all().tool("write_file"));
    assert_eq!(writes.len(), 2);
    assert_eq!(writes[0].decision, PermissionDecision::Allowed);
    assert_eq!(writes[1].decision, PermissionDecision::Denied);

    let denied = log.query(&AuditFilter::all().decision(PermissionDecision::Denied));
    assert_eq!(denied.len(), 2);

    let asked = log.query(&AuditFilter::all().decision(PermissionDecision::Asked));
    assert_eq!(asked.len(), 2);
    assert!(asked.iter().all(|r| r.tool == "write_file"));
}

#[test]
fn test_query_time_range() {
    let log = AuditLog::in_memory();
    let mut old = record("read_file", PermissionDecision::Allowed, false);
    old.requested_at = Timestamp::from_datetime(chrono::Utc::now() - Duration::hours(2));
    log.append(old).unwrap();
    log.append(record("read_file", PermissionDecision::Allowed, false))
        .unwrap();

    let hour_ago = Timestamp::from_datetime(chrono::Utc::now() - Duration::hours(1));
    assert_eq!(log.query(&AuditFilter::all().since(hour_ago)).len(), 1);
    assert_eq!(log.query(&AuditFilter::all().until(hour_ago)).len(), 1);
}

#[test]
fn test_chain_verifies() {
    let log = AuditLog::in_memory();
    for _ in 0..5 {
        log.append(record("read_file", PermissionDecision::Allowed, false))
            .unwrap();
    }
    let result = log.verify_chain();
    assert!(result.valid);
    assert_eq!(result.entries_verified, 5);

    let entries = log.entries();
    assert!(entries[0].previous_hash.is_zero());
    assert!(entries[4].follows(&entries[3]));
}

#[test]
fn test_verify_detects_tampering() {
    let first = AuditEntry::seal(
        0,
        ChainHash::zero(),
        record("a", PermissionDecision::Denied, false),
    );
    let mut second = AuditEntry::seal(
        1,
        first.hash,
        record("b", PermissionDecision::Denied, false),
    );
    second.record.decision = PermissionDecision::Allowed;

    let result = verify_entries(&[first.clone(), second]);
    assert!(!result.valid);
    assert_eq!(result.issues, vec![ChainIssue::HashMismatch { seq: 1 }]);

    let third = AuditEntry::seal(
        2,
        first.hash,
        record("c", PermissionDecision::Denied, false),
    );
    let result = verify_entries(&[first, third]);
    assert!(result.issues.contains(&ChainIssue::SequenceGap {
        expected: 1,
        found: 2
    }));
}

#[test]
fn test_file_log_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.jsonl");

    let mut rec = record("send_email", PermissionDecision::Allowed, true);
    rec.elicitation = Some(ElicitationState::Accepted);
    rec.arguments.insert("to".into(), json!("a@b.c"));
    rec.arguments.insert("subject".into(), json!("Hi"));
    let id = rec.request_id;
    {
        let log = AuditLog::open(&path).unwrap();
        log.append(rec.clone()).unwrap();
        log.append(record("delete_file", PermissionDecision::Denied, false))
            .unwrap();
        log.flush().unwrap();
    }

    let log = AuditLog::open(&path).unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log.get(&id), Some(rec.clone()));
    assert!(log.verify_chain().valid);

    // Reopened logs keep rejecting duplicates and keep extending the chain.
    assert!(matches!(
        log.append(rec),
        Err(AuditError::DuplicateRecord { .. })
    ));
    log.append(record("read_file", PermissionDecision::Allowed, false))
        .unwrap();
    assert_eq!(log.entries()[2].seq, 2);
    assert!(log.verify_chain().valid);
}

#[test]
fn test_open_rejects_edited_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.jsonl");
    {
        let log = AuditLog::open(&path).unwrap();
        log.append(record("delete_file", PermissionDecision::Denied, false))
            .unwrap();
    }

    let contents = std::fs::read_to_string(&path).unwrap();
    std::fs::write(&path, contents.replace("\"denied\"", "\"allowed\"")).unwrap();

    let err = AuditLog::open(&path).unwrap_err();
    assert!(matches!(err, AuditError::IntegrityViolation { seq: 0, .. }));
}
