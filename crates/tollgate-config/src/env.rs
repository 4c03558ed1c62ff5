//! Environment variable fallbacks.
//!
//! Env vars are **fallback**, not override: they are only applied to fields
//! that no config file set.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::merge::{ConfigLayer, FieldSources};

/// Mapping from environment variable name to config field path.
struct EnvMapping {
    var_name: &'static str,
    field_path: &'static str,
}

/// All supported `TOLLGATE_*` env var mappings.
const ENV_MAPPINGS: &[EnvMapping] = &[
    EnvMapping {
        var_name: "TOLLGATE_LOG_LEVEL",
        field_path: "logging.level",
    },
    EnvMapping {
        var_name: "TOLLGATE_LOG_FORMAT",
        field_path: "logging.format",
    },
    EnvMapping {
        var_name: "TOLLGATE_POLICY_PATH",
        field_path: "policy.path",
    },
    EnvMapping {
        var_name: "TOLLGATE_POLICY_DURABLE",
        field_path: "policy.durable",
    },
    EnvMapping {
        var_name: "TOLLGATE_AUDIT_PATH",
        field_path: "audit.path",
    },
    EnvMapping {
        var_name: "TOLLGATE_APPROVAL_TIMEOUT_SECS",
        field_path: "approval.timeout_secs",
    },
];

/// Apply environment variable fallbacks to fields that were **not** set by
/// any config file layer.
///
/// Returns the number of env vars applied.
pub fn apply_env_fallbacks<S: ::std::hash::BuildHasher>(
    merged: &mut toml::Value,
    sources: &mut FieldSources,
    env_vars: &HashMap<String, String, S>,
) -> usize {
    let mut count: usize = 0;

    for mapping in ENV_MAPPINGS {
        if sources
            .get(mapping.field_path)
            .is_some_and(ConfigLayer::is_file)
        {
            continue;
        }

        let Some(val) = env_vars.get(mapping.var_name) else {
            continue;
        };

        let Some(toml_val) = coerce_to_toml_value(mapping.field_path, val) else {
            warn!(
                var = mapping.var_name,
                value = %val,
                "ignoring environment variable with invalid value"
            );
            continue;
        };

        set_field(merged, mapping.field_path, toml_val);
        sources.insert(mapping.field_path.to_owned(), ConfigLayer::Environment);
        debug!(
            var = mapping.var_name,
            field = mapping.field_path,
            "applying env var fallback"
        );
        count = count.saturating_add(1);
    }

    count
}

/// Set a dotted-path field in the TOML tree, creating intermediate tables.
fn set_field(root: &mut toml::Value, path: &str, val: toml::Value) {
    let mut current = root;
    let mut segments = path.split('.').peekable();

    while let Some(segment) = segments.next() {
        let Some(table) = current.as_table_mut() else {
            return;
        };
        if segments.peek().is_none() {
            table.insert(segment.to_owned(), val);
            return;
        }
        current = table
            .entry(segment.to_owned())
            .or_insert(toml::Value::Table(toml::map::Map::new()));
    }
}

/// Coerce a string env var value to the TOML type of the field.
///
/// Returns `None` when a typed field cannot be parsed.
fn coerce_to_toml_value(path: &str, val: &str) -> Option<toml::Value> {
    match path {
        "policy.durable" => val.trim().parse::<bool>().ok().map(toml::Value::Boolean),
        "approval.timeout_secs" => val.trim().parse::<i64>().ok().map(toml::Value::Integer),
        _ => Some(toml::Value::String(val.to_owned())),
    }
}

/// Collect all current environment variables into a map.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_apply_env_fallbacks() {
        let mut merged: toml::Value = toml::from_str("[policy]\ndurable = false").unwrap();
        let mut sources = FieldSources::new();
        sources.insert("policy.durable".to_owned(), ConfigLayer::Defaults);
        let env = make_env(&[
            ("TOLLGATE_POLICY_DURABLE", "true"),
            ("TOLLGATE_AUDIT_PATH", "/tmp/audit.jsonl"),
        ]);

        let count = apply_env_fallbacks(&mut merged, &mut sources, &env);

        assert_eq!(count, 2);
        assert_eq!(merged["policy"]["durable"].as_bool(), Some(true));
        assert_eq!(
            merged["audit"]["path"].as_str(),
            Some("/tmp/audit.jsonl")
        );
        assert_eq!(sources.get("audit.path"), Some(&ConfigLayer::Environment));
    }

    #[test]
    fn test_env_fallback_skips_file_values() {
        let mut merged: toml::Value = toml::from_str("[logging]\nlevel = \"warn\"").unwrap();
        let mut sources = FieldSources::new();
        sources.insert("logging.level".to_owned(), ConfigLayer::User);

        let env = make_env(&[("TOLLGATE_LOG_LEVEL", "debug")]);
        let count = apply_env_fallbacks(&mut merged, &mut sources, &env);

        assert_eq!(count, 0);
        assert_eq!(merged["logging"]["level"].as_str(), Some("warn"));
    }

    #[test]
    fn test_invalid_typed_value_is_ignored() {
        let mut merged = toml::Value::Table(toml::map::Map::new());
        let mut sources = FieldSources::new();
        let env = make_env(&[("TOLLGATE_APPROVAL_TIMEOUT_SECS", "soon")]);

        assert_eq!(apply_env_fallbacks(&mut merged, &mut sources, &env), 0);
        assert!(merged.get("approval").is_none());
    }

    #[test]
    fn test_coerce() {
        assert_eq!(
            coerce_to_toml_value("approval.timeout_secs", "30"),
            Some(toml::Value::Integer(30))
        );
        assert_eq!(
            coerce_to_toml_value("policy.durable", "maybe"),
            None
        );
        assert_eq!(
            coerce_to_toml_value("logging.level", "trace"),
            Some(toml::Value::String("trace".to_owned()))
        );
    }
}
