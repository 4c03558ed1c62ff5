//! Policy entries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A remembered per-tool policy.
///
/// The absence of an entry means "ask", the same as [`PolicyEntry::Ask`];
/// `Ask` exists so configuration can state it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyEntry {
    /// Execute without prompting.
    #[serde(rename = "allow")]
    AlwaysAllow,
    /// Refuse without prompting.
    #[serde(rename = "deny")]
    AlwaysDeny,
    /// Prompt every time.
    #[serde(rename = "ask")]
    Ask,
}

impl PolicyEntry {
    /// Check whether this entry requires an interactive prompt.
    #[must_use]
    pub fn requires_prompt(self) -> bool {
        matches!(self, Self::Ask)
    }
}

impl fmt::Display for PolicyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlwaysAllow => write!(f, "allow"),
            Self::AlwaysDeny => write!(f, "deny"),
            Self::Ask => write!(f, "ask"),
        }
    }
}

impl std::str::FromStr for PolicyEntry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(Self::AlwaysAllow),
            "deny" => Ok(Self::AlwaysDeny),
            "ask" => Ok(Self::Ask),
            other => Err(format!(
                "invalid policy '{other}'; expected allow, deny or ask"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_short_names() {
        assert_eq!(
            serde_json::to_string(&PolicyEntry::AlwaysAllow).unwrap(),
            "\"allow\""
        );
        let entry: PolicyEntry = serde_json::from_str("\"deny\"").unwrap();
        assert_eq!(entry, PolicyEntry::AlwaysDeny);
    }

    #[test]
    fn test_parse() {
        assert_eq!(" Ask ".parse(), Ok(PolicyEntry::Ask));
        assert!("always".parse::<PolicyEntry>().is_err());
    }
}
