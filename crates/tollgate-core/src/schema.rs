//! Tool argument schemas.
//!
//! A [`ToolSchema`] is an ordered list of named [`FieldSpec`]s plus the
//! tool's description and [`RiskLevel`]. It answers two questions for the
//! decision engine: which required arguments are still missing, and whether a
//! supplied value is acceptable for a field.
//!
//! Schemas can be built by hand or converted from an MCP `inputSchema`
//! (a JSON Schema object with `properties` and `required`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;

use crate::error::{SchemaError, SchemaResult};
use crate::request::json_type_name;
use crate::risk::RiskLevel;
use crate::types::Arguments;

/// Declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// A JSON string
    #[default]
    String,
    /// Any JSON number
    Number,
    /// A JSON number with no fractional part
    Integer,
    /// `true` or `false`
    Boolean,
    /// A JSON array
    Array,
    /// A JSON object
    Object,
}

impl FieldType {
    /// Check whether `value` is of this type.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
        }
    }

    /// Name used in JSON Schema documents.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    fn parse(field: &str, type_name: &str) -> SchemaResult<Self> {
        match type_name {
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            "integer" => Ok(Self::Integer),
            "boolean" => Ok(Self::Boolean),
            "array" => Ok(Self::Array),
            "object" => Ok(Self::Object),
            other => Err(SchemaError::UnsupportedType {
                field: field.to_string(),
                type_name: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Specification of a single argument field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Declared type.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether the tool cannot run without this field.
    #[serde(default)]
    pub required: bool,
    /// Human-readable description shown to the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Suggested value. A required field with a default is still missing
    /// until the caller or the user supplies it; the default is a prefill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Allowed values for a string field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl FieldSpec {
    /// A required field of the given type.
    #[must_use]
    pub fn required(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: true,
            description: None,
            default: None,
            options: None,
        }
    }

    /// An optional field of the given type.
    #[must_use]
    pub fn optional(field_type: FieldType) -> Self {
        Self {
            required: false,
            ..Self::required(field_type)
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the suggested default.
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Restrict the field to an enumerated set of strings.
    #[must_use]
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    /// Check a supplied value against this spec.
    ///
    /// # Errors
    ///
    /// Returns a human-readable problem description when the value has the
    /// wrong type or is not one of the allowed options.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        if !self.field_type.matches(value) {
            return Err(format!(
                "expected {}, found {}",
                self.field_type,
                json_type_name(value)
            ));
        }
        if let (Some(options), Some(s)) = (&self.options, value.as_str())
            && !options.iter().any(|o| o == s)
        {
            return Err(format!("'{s}' is not one of: {}", options.join(", ")));
        }
        Ok(())
    }

    fn to_json_schema(&self) -> Value {
        let mut prop = Map::new();
        prop.insert("type".into(), json!(self.field_type.as_str()));
        if let Some(description) = &self.description {
            prop.insert("description".into(), json!(description));
        }
        if let Some(default) = &self.default {
            prop.insert("default".into(), default.clone());
        }
        if let Some(options) = &self.options {
            prop.insert("enum".into(), json!(options));
        }
        Value::Object(prop)
    }
}

/// Argument schema for one tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    risk: RiskLevel,
    #[serde(default)]
    fields: Vec<(String, FieldSpec)>,
}

impl ToolSchema {
    /// Create an empty schema for `name` with medium risk.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            risk: RiskLevel::default(),
            fields: Vec::new(),
        }
    }

    /// Set the tool description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the tool's risk level.
    #[must_use]
    pub fn with_risk(mut self, risk: RiskLevel) -> Self {
        self.risk = risk;
        self
    }

    /// Add a field. A field with the same name is replaced in place.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        let name = name.into();
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = spec;
        } else {
            self.fields.push((name, spec));
        }
        self
    }

    /// The tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The tool description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The tool's risk level.
    #[must_use]
    pub fn risk(&self) -> RiskLevel {
        self.risk
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(n, s)| (n.as_str(), s))
    }

    /// Look up a single field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    /// Check whether the schema declares no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Required fields that are absent or `null` in `arguments`, in
    /// declaration order.
    #[must_use]
    pub fn missing_fields(&self, arguments: &Arguments) -> Vec<String> {
        self.fields
            .iter()
            .filter(|(name, spec)| spec.required && is_absent(arguments.get(name)))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Check whether every required field has a value.
    #[must_use]
    pub fn is_complete(&self, arguments: &Arguments) -> bool {
        self.missing_fields(arguments).is_empty()
    }

    /// A copy of this schema restricted to the named fields.
    ///
    /// Names that are not declared are ignored. Declaration order is kept.
    #[must_use]
    pub fn subset(&self, names: &[String]) -> Self {
        Self {
            name: self.name.clone(),
            description: self.description.clone(),
            risk: self.risk,
            fields: self
                .fields
                .iter()
                .filter(|(n, _)| names.contains(n))
                .cloned()
                .collect(),
        }
    }

    /// Render as a JSON Schema object (the MCP `inputSchema` shape).
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for (name, spec) in &self.fields {
            properties.insert(name.clone(), spec.to_json_schema());
            if spec.required {
                required.push(json!(name));
            }
        }
        let mut schema = Map::new();
        schema.insert("type".into(), json!("object"));
        if let Some(description) = &self.description {
            schema.insert("description".into(), json!(description));
        }
        schema.insert("properties".into(), Value::Object(properties));
        schema.insert("required".into(), Value::Array(required));
        Value::Object(schema)
    }

    /// Build a schema from a JSON Schema object such as an MCP tool's
    /// `inputSchema`.
    ///
    /// Properties without a `type` are treated as strings. A union type such
    /// as `["string", "null"]` uses its first non-null member.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if the document or a property is not an
    /// object, a property declares an unsupported type, or `required` names
    /// an undeclared property.
    pub fn from_json_schema(name: impl Into<String>, schema: &Value) -> SchemaResult<Self> {
        let name = name.into();
        let Value::Object(doc) = schema else {
            return Err(SchemaError::NotAnObject {
                context: format!("input schema for '{name}'"),
                found: json_type_name(schema).to_string(),
            });
        };

        let mut out = Self::new(name);
        if let Some(description) = doc.get("description").and_then(Value::as_str) {
            out.description = Some(description.to_string());
        }

        let required: Vec<&str> = doc
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        if let Some(properties) = doc.get("properties") {
            let Value::Object(properties) = properties else {
                return Err(SchemaError::NotAnObject {
                    context: format!("properties of '{}'", out.name),
                    found: json_type_name(properties).to_string(),
                });
            };
            for (field, prop) in properties {
                let spec = parse_property(field, prop, required.contains(&field.as_str()))?;
                out.fields.push((field.clone(), spec));
            }
        }

        if let Some(undeclared) = required.iter().find(|r| out.field(r).is_none()) {
            return Err(SchemaError::UndeclaredRequired {
                field: (*undeclared).to_string(),
            });
        }

        Ok(out)
    }
}

fn parse_property(field: &str, prop: &Value, required: bool) -> SchemaResult<FieldSpec> {
    let Value::Object(prop) = prop else {
        return Err(SchemaError::NotAnObject {
            context: format!("property '{field}'"),
            found: json_type_name(prop).to_string(),
        });
    };

    let field_type = match prop.get("type") {
        None => FieldType::String,
        Some(Value::String(t)) => FieldType::parse(field, t)?,
        Some(Value::Array(types)) => {
            let first = types
                .iter()
                .filter_map(Value::as_str)
                .find(|t| *t != "null")
                .unwrap_or("string");
            FieldType::parse(field, first)?
        },
        Some(other) => {
            return Err(SchemaError::UnsupportedType {
                field: field.to_string(),
                type_name: other.to_string(),
            });
        },
    };

    let options = prop.get("enum").and_then(Value::as_array).map(|values| {
        values
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    });

    Ok(FieldSpec {
        field_type,
        required,
        description: prop
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string),
        default: prop.get("default").cloned(),
        options,
    })
}

fn is_absent(value: Option<&Value>) -> bool {
    value.is_none_or(Value::is_null)
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
