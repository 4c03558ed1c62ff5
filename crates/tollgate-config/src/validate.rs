//! Post-merge configuration validation.
//!
//! Validates that deserialized [`Config`](crate::Config) values are within
//! acceptable ranges and that cross-field invariants hold.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Accepted `logging.level` values.
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
/// Accepted `logging.format` values.
const LOG_FORMATS: &[&str] = &["pretty", "compact", "json"];
/// Accepted `policy.entries` values.
const POLICY_VALUES: &[&str] = &["allow", "deny", "ask"];

/// Validate a fully-merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_policy(config)?;
    validate_audit(config)?;
    validate_approval(config)?;
    validate_logging(config)?;
    Ok(())
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

fn validate_policy(config: &Config) -> ConfigResult<()> {
    let p = &config.policy;

    match p.path.as_deref() {
        Some(path) if path.trim().is_empty() => {
            return Err(invalid("policy.path", "path must not be empty"));
        },
        None if p.durable => {
            return Err(invalid(
                "policy.path",
                "durable policy requires a path to store choices in",
            ));
        },
        _ => {},
    }

    for (tool, value) in &p.entries {
        if tool.trim().is_empty() {
            return Err(invalid("policy.entries", "tool name must not be empty"));
        }
        let normalized = value.trim().to_ascii_lowercase();
        if !POLICY_VALUES.contains(&normalized.as_str()) {
            return Err(invalid(
                format!("policy.entries.{tool}"),
                format!("unknown policy '{value}'; expected one of: allow, deny, ask"),
            ));
        }
    }

    Ok(())
}

fn validate_audit(config: &Config) -> ConfigResult<()> {
    if config
        .audit
        .path
        .as_deref()
        .is_some_and(|p| p.trim().is_empty())
    {
        return Err(invalid("audit.path", "path must not be empty"));
    }
    Ok(())
}

fn validate_approval(config: &Config) -> ConfigResult<()> {
    let a = &config.approval;
    if a.timeout_secs == Some(0) {
        return Err(invalid(
            "approval.timeout_secs",
            "timeout must be greater than 0; omit it to wait without limit",
        ));
    }
    if a.elicitation_timeout_secs == Some(0) {
        return Err(invalid(
            "approval.elicitation_timeout_secs",
            "timeout must be greater than 0; omit it to wait without limit",
        ));
    }
    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let l = &config.logging;

    if !LOG_LEVELS.contains(&l.level.to_ascii_lowercase().as_str()) {
        return Err(invalid(
            "logging.level",
            format!(
                "unknown level '{}'; expected one of: {}",
                l.level,
                LOG_LEVELS.join(", ")
            ),
        ));
    }

    if !LOG_FORMATS.contains(&l.format.to_ascii_lowercase().as_str()) {
        return Err(invalid(
            "logging.format",
            format!(
                "unknown format '{}'; expected one of: {}",
                l.format,
                LOG_FORMATS.join(", ")
            ),
        ));
    }

    if l.file.as_deref().is_some_and(|f| f.trim().is_empty()) {
        return Err(invalid("logging.file", "path must not be empty"));
    }

    Ok(())
}
