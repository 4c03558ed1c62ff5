use super::*;
use serde_json::json;

fn send_email() -> ToolSchema {
    ToolSchema::new("send_email")
        .with_field("to", FieldSpec::required(FieldType::String))
        .with_field(
            "subject",
            FieldSpec::required(FieldType::String).with_description("Subject line"),
        )
        .with_field("cc", FieldSpec::optional(FieldType::Array))
}

fn args(value: Value) -> Arguments {
    match value {
        Value::Object(map) => map,
        _ => panic!("test arguments must be an object"),
    }
}

#[test]
fn test_missing_fields_in_declaration_order() {
    let schema = send_email();
    assert_eq!(
        schema.missing_fields(&Arguments::new()),
        vec!["to".to_string(), "subject".to_string()]
    );
    assert_eq!(
        schema.missing_fields(&args(json!({"to": "a@b.c"}))),
        vec!["subject".to_string()]
    );
}

#[test]
fn test_null_counts_as_missing() {
    let schema = send_email();
    let missing = schema.missing_fields(&args(json!({"to": "a@b.c", "subject": null})));
    assert_eq!(missing, vec!["subject".to_string()]);
}

#[test]
fn test_optional_fields_never_missing() {
    let schema = send_email();
    assert!(schema.is_complete(&args(json!({"to": "a@b.c", "subject": "Hi"}))));
}

#[test]
fn test_required_with_default_is_still_missing() {
    let schema = ToolSchema::new("t").with_field(
        "mode",
        FieldSpec::required(FieldType::String).with_default(json!("fast")),
    );
    assert_eq!(schema.missing_fields(&Arguments::new()), vec!["mode".to_string()]);
}

#[test]
fn test_subset_keeps_only_named_fields() {
    let schema = send_email();
    let subset = schema.subset(&["subject".to_string(), "unknown".to_string()]);
    let names: Vec<&str> = subset.fields().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["subject"]);
    assert_eq!(
        subset.field("subject").unwrap().description.as_deref(),
        Some("Subject line")
    );
}

#[test]
fn test_with_field_replaces_in_place() {
    let schema = send_email().with_field("to", FieldSpec::optional(FieldType::String));
    let names: Vec<&str> = schema.fields().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["to", "subject", "cc"]);
    assert!(!schema.field("to").unwrap().required);
}

#[test]
fn test_field_type_matches() {
    assert!(FieldType::Integer.matches(&json!(3)));
    assert!(!FieldType::Integer.matches(&json!(3.5)));
    assert!(FieldType::Number.matches(&json!(3.5)));
    assert!(FieldType::Object.matches(&json!({})));
    assert!(!FieldType::String.matches(&json!(null)));
}

#[test]
fn test_check_options() {
    let spec = FieldSpec::required(FieldType::String).with_options(["low", "high"]);
    assert!(spec.check(&json!("low")).is_ok());
    let problem = spec.check(&json!("medium")).unwrap_err();
    assert!(problem.contains("low, high"));
    let problem = spec.check(&json!(1)).unwrap_err();
    assert_eq!(problem, "expected string, found integer");
}

#[test]
fn test_from_json_schema() {
    let input = json!({
        "type": "object",
        "description": "Write a file",
        "properties": {
            "filepath": {"type": "string", "description": "Path"},
            "content": {"type": "string"},
            "mode": {"type": ["string", "null"], "enum": ["overwrite", "append"], "default": "overwrite"},
            "size": {"type": "integer"}
        },
        "required": ["filepath", "content"]
    });
    let schema = ToolSchema::from_json_schema("write_file", &input).unwrap();
    assert_eq!(schema.description(), Some("Write a file"));
    assert_eq!(schema.risk(), RiskLevel::Medium);
    assert!(schema.field("filepath").unwrap().required);
    assert!(!schema.field("mode").unwrap().required);
    assert_eq!(
        schema.field("mode").unwrap().options,
        Some(vec!["overwrite".to_string(), "append".to_string()])
    );
    assert_eq!(schema.field("size").unwrap().field_type, FieldType::Integer);
    let names: Vec<&str> = schema.fields().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["filepath", "content", "mode", "size"]);
}

#[test]
fn test_from_json_schema_without_properties() {
    let schema = ToolSchema::from_json_schema("ping", &json!({"type": "object"})).unwrap();
    assert!(schema.is_empty());
}

#[test]
fn test_from_json_schema_rejects_undeclared_required() {
    let input = json!({"properties": {}, "required": ["ghost"]});
    let err = ToolSchema::from_json_schema("t", &input).unwrap_err();
    assert_eq!(
        err,
        SchemaError::UndeclaredRequired {
            field: "ghost".to_string()
        }
    );
}

#[test]
fn test_from_json_schema_rejects_unknown_type() {
    let input = json!({"properties": {"x": {"type": "date"}}});
    let err = ToolSchema::from_json_schema("t", &input).unwrap_err();
    assert!(matches!(err, SchemaError::UnsupportedType { .. }));
}

#[test]
fn test_to_json_schema_round_trips_shape() {
    let schema = send_email().subset(&["subject".to_string()]);
    let doc = schema.to_json_schema();
    assert_eq!(doc["type"], json!("object"));
    assert_eq!(doc["required"], json!(["subject"]));
    assert_eq!(doc["properties"]["subject"]["description"], json!("Subject line"));
}
