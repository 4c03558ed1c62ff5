//! CLI theme and styling.

use colored::Colorize;
use tollgate_core::PermissionDecision;
use tollgate_policy::PolicyEntry;

/// CLI theme configuration.
pub(crate) struct Theme;

impl Theme {
    /// Format a header.
    pub(crate) fn header(text: &str) -> String {
        format!("{}", text.bold().cyan())
    }

    /// Format a success message.
    pub(crate) fn success(text: &str) -> String {
        format!("{} {}", "✓".green(), text)
    }

    /// Format an error message.
    pub(crate) fn error(text: &str) -> String {
        format!("{} {}", "✗".red(), text.red())
    }

    /// Format a warning message.
    pub(crate) fn warning(text: &str) -> String {
        format!("{} {}", "!".yellow(), text.yellow())
    }

    /// Format an info message.
    pub(crate) fn info(text: &str) -> String {
        format!("{} {}", "i".blue(), text)
    }

    /// Format a dimmed message.
    pub(crate) fn dimmed(text: &str) -> String {
        format!("{}", text.dimmed())
    }

    /// Format a separator line.
    pub(crate) fn separator() -> String {
        "━".repeat(50).dimmed().to_string()
    }

    /// Format a policy entry with its color.
    pub(crate) fn policy(entry: PolicyEntry) -> String {
        let text = entry.to_string();
        match entry {
            PolicyEntry::AlwaysAllow => text.green().to_string(),
            PolicyEntry::AlwaysDeny => text.red().to_string(),
            PolicyEntry::Ask => text.yellow().to_string(),
        }
    }

    /// Format a permission decision with its color.
    pub(crate) fn decision(decision: PermissionDecision) -> String {
        let text = decision.to_string();
        match decision {
            PermissionDecision::Allowed => text.green().to_string(),
            PermissionDecision::Denied => text.red().to_string(),
            PermissionDecision::Asked => text.yellow().to_string(),
        }
    }

    /// Format a timestamp for display.
    pub(crate) fn timestamp(dt: &chrono::DateTime<chrono::Utc>) -> String {
        dt.format("%Y-%m-%d %H:%M:%S").to_string().dimmed().to_string()
    }
}
