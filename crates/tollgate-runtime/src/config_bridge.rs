//! Bridge from `tollgate_config::Config` to runtime components.
//!
//! The config crate has no dependencies on other tollgate crates. This
//! module translates its sections into the policy store, audit log,
//! timeouts and logging setup used at startup, so the conversion happens
//! in one place for every frontend.

use std::str::FromStr;
use std::time::Duration;

use tollgate_audit::AuditLog;
use tollgate_config::Config;
use tollgate_policy::{PolicyEntry, PolicyStore};
use tollgate_telemetry::{LogConfig, LogFormat};

use crate::builder::CoordinatorBuilder;
use crate::error::{RuntimeError, RuntimeResult};

/// Parse the `[policy.entries]` table.
///
/// # Errors
///
/// Returns [`RuntimeError::Config`] for a value other than allow, deny or ask.
pub fn to_policy_entries(cfg: &Config) -> RuntimeResult<Vec<(String, PolicyEntry)>> {
    cfg.policy
        .entries
        .iter()
        .map(|(tool, value)| {
            PolicyEntry::from_str(value)
                .map(|entry| (tool.clone(), entry))
                .map_err(|e| RuntimeError::Config(format!("policy.entries.{tool}: {e}")))
        })
        .collect()
}

/// Build the policy store described by `[policy]`.
///
/// A durable store is opened at `policy.path`; otherwise the store lives for
/// the session only. Configured entries never replace entries loaded from
/// the policy file.
///
/// # Errors
///
/// Returns an error if the policy file cannot be read or an entry is invalid.
pub async fn to_policy_store(cfg: &Config) -> RuntimeResult<PolicyStore> {
    let entries = to_policy_entries(cfg)?;

    let store = if cfg.policy.durable {
        let path = cfg.policy.resolved_path().ok_or_else(|| {
            RuntimeError::Config("policy.durable requires policy.path".to_string())
        })?;
        PolicyStore::open(path).await?
    } else {
        PolicyStore::new()
    };

    Ok(store.with_entries(entries))
}

/// Build the audit log described by `[audit]`.
///
/// # Errors
///
/// Returns an error if the audit file cannot be opened or its chain is
/// broken.
pub fn to_audit_log(cfg: &Config) -> RuntimeResult<AuditLog> {
    match cfg.audit.resolved_path() {
        Some(path) => Ok(AuditLog::open(path)?),
        None => Ok(AuditLog::in_memory()),
    }
}

/// The approval prompt timeout, if configured.
#[must_use]
pub fn approval_timeout(cfg: &Config) -> Option<Duration> {
    cfg.approval.timeout_secs.map(Duration::from_secs)
}

/// The elicitation prompt timeout, if configured.
#[must_use]
pub fn elicitation_timeout(cfg: &Config) -> Option<Duration> {
    cfg.approval
        .elicitation_timeout_secs
        .map(Duration::from_secs)
}

/// Convert config to [`LogConfig`].
#[must_use]
pub fn to_log_config(cfg: &Config) -> LogConfig {
    let format = LogFormat::from_str(&cfg.logging.format).unwrap_or_default();

    let mut log_config = LogConfig::new(&cfg.logging.level).with_format(format);

    for directive in &cfg.logging.directives {
        log_config = log_config.with_directive(directive);
    }

    if let Some(file) = cfg.logging.resolved_file() {
        log_config = log_config.with_file(file);
    }

    log_config
}

/// A builder with the policy store, audit log and timeouts from `cfg`.
///
/// The caller still supplies the registry, executor and prompt handlers.
///
/// # Errors
///
/// Returns an error if the policy store or audit log cannot be opened.
pub async fn to_coordinator_builder(cfg: &Config) -> RuntimeResult<CoordinatorBuilder> {
    let mut builder = CoordinatorBuilder::new()
        .policy_store(std::sync::Arc::new(to_policy_store(cfg).await?))
        .audit_log(std::sync::Arc::new(to_audit_log(cfg)?));

    if let Some(timeout) = approval_timeout(cfg) {
        builder = builder.approval_timeout(timeout);
    }
    if let Some(timeout) = elicitation_timeout(cfg) {
        builder = builder.elicitation_timeout(timeout);
    }

    Ok(builder)
}
