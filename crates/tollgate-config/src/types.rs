//! Configuration struct definitions.
//!
//! Every section derives `Default` with the same values as `defaults.toml`,
//! so a partially written file deserializes to a complete [`Config`].

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level Tollgate configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remembered permission choices.
    pub policy: PolicySection,
    /// Audit log storage.
    pub audit: AuditSection,
    /// Interactive prompt behavior.
    pub approval: ApprovalSection,
    /// Logging and tracing.
    pub logging: LoggingSection,
}

// ---------------------------------------------------------------------------
// PolicySection
// ---------------------------------------------------------------------------

/// Policy store settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicySection {
    /// Persist remembered choices to `path`.
    pub durable: bool,
    /// Location of the policy file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Entries seeded at startup: tool name to `"allow"`, `"deny"` or `"ask"`.
    pub entries: BTreeMap<String, String>,
}

impl PolicySection {
    /// The policy file path with a leading `~` expanded.
    #[must_use]
    pub fn resolved_path(&self) -> Option<PathBuf> {
        self.path.as_deref().map(expand_home)
    }
}

// ---------------------------------------------------------------------------
// AuditSection
// ---------------------------------------------------------------------------

/// Audit log settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditSection {
    /// JSON-lines audit file. In-memory only when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl AuditSection {
    /// The audit file path with a leading `~` expanded.
    #[must_use]
    pub fn resolved_path(&self) -> Option<PathBuf> {
        self.path.as_deref().map(expand_home)
    }
}

// ---------------------------------------------------------------------------
// ApprovalSection
// ---------------------------------------------------------------------------

/// Prompt timeouts. An unset timeout waits until the caller cancels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApprovalSection {
    /// Seconds to wait for an approval answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Seconds to wait for an elicitation answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elicitation_timeout_secs: Option<u64>,
}

// ---------------------------------------------------------------------------
// LoggingSection
// ---------------------------------------------------------------------------

/// Logging and tracing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"` or `"json"`.
    pub format: String,
    /// Per-crate tracing directives (e.g. `["tollgate_policy=debug"]`).
    pub directives: Vec<String>,
    /// Log file. Logs go to stderr when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "pretty".to_owned(),
            directives: Vec::new(),
            file: None,
        }
    }
}

impl LoggingSection {
    /// The log file path with a leading `~` expanded.
    #[must_use]
    pub fn resolved_file(&self) -> Option<PathBuf> {
        self.file.as_deref().map(expand_home)
    }
}

/// Expand a leading `~/` to the user's home directory.
///
/// The path is returned unchanged when it has no `~` prefix or the home
/// directory cannot be determined.
#[must_use]
pub fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/")
        && let Some(dirs) = directories::BaseDirs::new()
    {
        return dirs.home_dir().join(rest);
    }
    PathBuf::from(raw)
}
