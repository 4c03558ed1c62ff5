//! Audit command - view and verify the audit log.

use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use colored::Colorize;
use tollgate_audit::{AuditError, AuditFilter, AuditLog, AuditRecord, ExecutionOutcome};
use tollgate_core::{PermissionDecision, Timestamp};

use crate::theme::Theme;

/// Filters accepted by `audit show`, as typed on the command line.
#[derive(Debug, Default)]
pub(crate) struct ShowArgs {
    pub(crate) tool: Option<String>,
    pub(crate) decision: Option<String>,
    pub(crate) since: Option<String>,
    pub(crate) until: Option<String>,
    pub(crate) json: bool,
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub(crate) fn parse_time(raw: &str) -> anyhow::Result<Timestamp> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Timestamp::from_datetime(dt.with_timezone(&Utc)));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid time '{raw}'; expected RFC 3339 or YYYY-MM-DD"))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .with_context(|| format!("invalid date '{raw}'"))?;
    Ok(Timestamp::from_datetime(midnight.and_utc()))
}

/// Build the filter for `audit show`.
pub(crate) fn build_filter(args: &ShowArgs) -> anyhow::Result<AuditFilter> {
    let mut filter = AuditFilter::all();
    if let Some(tool) = &args.tool {
        filter = filter.tool(tool);
    }
    if let Some(decision) = &args.decision {
        let decision: PermissionDecision = decision.parse().map_err(anyhow::Error::msg)?;
        filter = filter.decision(decision);
    }
    if let Some(since) = &args.since {
        filter = filter.since(parse_time(since)?);
    }
    if let Some(until) = &args.until {
        filter = filter.until(parse_time(until)?);
    }
    Ok(filter)
}

fn open(path: &Path) -> anyhow::Result<AuditLog> {
    if !path.exists() {
        anyhow::bail!("no audit log at {}", path.display());
    }
    AuditLog::open(path).with_context(|| format!("failed to open audit log {}", path.display()))
}

fn outcome_label(outcome: &ExecutionOutcome) -> String {
    match outcome {
        ExecutionOutcome::Success { .. } => "OK".green().to_string(),
        ExecutionOutcome::ToolError { .. } => "FAIL".red().to_string(),
        ExecutionOutcome::NotExecuted { .. } => "SKIPPED".dimmed().to_string(),
    }
}

fn print_record(record: &AuditRecord) {
    let timestamp = Theme::timestamp(&record.completed_at.into_inner());
    let asked = if record.asked { "asked" } else { "" };
    println!(
        "{timestamp:>20} {:<24} {:<10} {:<6} {}",
        record.tool,
        Theme::decision(record.decision),
        asked,
        outcome_label(&record.outcome)
    );
    match &record.outcome {
        ExecutionOutcome::ToolError { message } => {
            println!("{:>20} {}", "", Theme::dimmed(message));
        },
        ExecutionOutcome::NotExecuted { reason } => {
            println!("{:>20} {}", "", Theme::dimmed(reason));
        },
        ExecutionOutcome::Success { .. } => {},
    }
}

/// Show audit records matching the filters.
pub(crate) fn show_audit_records(path: &Path, args: &ShowArgs) -> anyhow::Result<()> {
    let filter = build_filter(args)?;
    let log = open(path)?;
    let records = log.query(&filter);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("{}", Theme::info("No matching audit records"));
        return Ok(());
    }

    println!("\n{}", Theme::header("Audit Records"));
    println!(
        "{:>20} {:<24} {:<10} {:<6} {}",
        "COMPLETED".dimmed(),
        "TOOL".dimmed(),
        "DECISION".dimmed(),
        "ASKED".dimmed(),
        "RESULT".dimmed()
    );
    println!("{}", Theme::separator());
    for record in &records {
        print_record(record);
    }
    println!(
        "\n{}",
        Theme::dimmed(&format!("{} of {} records", records.len(), log.len()))
    );
    Ok(())
}

/// Verify audit chain integrity.
pub(crate) fn verify_audit_chain(path: &Path) -> anyhow::Result<()> {
    let log = match open(path) {
        Ok(log) => log,
        Err(e) => {
            if let Some(AuditError::IntegrityViolation { seq, reason }) =
                e.downcast_ref::<AuditError>()
            {
                println!(
                    "{}",
                    Theme::error(&format!("Chain broken at entry {seq}: {reason}"))
                );
                anyhow::bail!("audit chain verification failed");
            }
            return Err(e);
        },
    };

    let result = log.verify_chain();
    if result.valid {
        println!(
            "{}",
            Theme::success(&format!(
                "Audit chain verified ({} entries)",
                result.entries_verified
            ))
        );
        return Ok(());
    }

    println!("{}", Theme::error("Audit chain verification failed"));
    for issue in &result.issues {
        println!("  {}", Theme::warning(&issue.to_string()));
    }
    anyhow::bail!("{} integrity issues found", result.issues.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_time_rfc3339() {
        let ts = parse_time("2026-03-01T12:30:00+02:00").unwrap();
        assert_eq!(
            ts.into_inner(),
            Utc.with_ymd_and_hms(2026, 3, 1, 10, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_time_bare_date() {
        let ts = parse_time("2026-03-01").unwrap();
        assert_eq!(
            ts.into_inner(),
            Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_time_rejects_garbage() {
        let err = parse_time("yesterday").unwrap_err();
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn test_build_filter_rejects_unknown_decision() {
        let args = ShowArgs {
            decision: Some("maybe".to_string()),
            ..ShowArgs::default()
        };
        assert!(build_filter(&args).is_err());
    }

    #[test]
    fn test_build_filter_accepts_all_fields() {
        let args = ShowArgs {
            tool: Some("send_email".to_string()),
            decision: Some("denied".to_string()),
            since: Some("2026-01-01".to_string()),
            until: Some("2026-12-31T23:59:59Z".to_string()),
            json: false,
        };
        assert!(build_filter(&args).is_ok());
    }

    #[test]
    fn test_missing_log_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        assert!(verify_audit_chain(&path).is_err());
        assert!(show_audit_records(&path, &ShowArgs::default()).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_verify_empty_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        AuditLog::open(&path).unwrap();
        verify_audit_chain(&path).unwrap();
    }
}
