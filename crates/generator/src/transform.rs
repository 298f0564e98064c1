//! Structural rewrites applied to an OpenAPI v3 schema before it is written
//! out as JSON Schema.
//!
//! Every pass walks a [`serde_json::Value`] in place. Only objects and arrays
//! are descended into; every other value is a leaf.

use crate::config::TransformOptions;
use serde_json::{json, Map, Value};

/// Apply the enabled passes in emission order: close-by-default, then
/// int-or-string widening, then nullable-optional widening.
pub fn apply(definition: &mut Value, options: &TransformOptions) {
    additional_properties(definition);
    replace_int_or_string(definition);
    if options.allow_null_optional_fields {
        allow_null_optional_fields(definition);
    }
}

/// Set `additionalProperties: false` on every object that declares
/// `properties` without an explicit `additionalProperties`, matching the
/// strictness kubectl applies when validating against the API server's
/// OpenAPI document.
///
/// Recurses through object values only. Schemas nested inside arrays (e.g.
/// `anyOf` branches) are left as they are.
pub fn additional_properties(value: &mut Value) {
    let Value::Object(map) = value else {
        return;
    };

    if map.contains_key("properties") && !map.contains_key("additionalProperties") {
        map.insert("additionalProperties".to_string(), Value::Bool(false));
    }

    for child in map.values_mut() {
        additional_properties(child);
    }
}

/// Replace every `int-or-string` node with a `oneOf` of string and integer.
/// Sibling keys of a replaced node are dropped.
pub fn replace_int_or_string(value: &mut Value) {
    if is_int_or_string(value) {
        *value = int_or_string_schema();
        return;
    }

    match value {
        Value::Object(map) => {
            for child in map.values_mut() {
                replace_int_or_string(child);
            }
        }
        Value::Array(items) => {
            for item in items {
                replace_int_or_string(item);
            }
        }
        _ => {}
    }
}

fn is_int_or_string(value: &Value) -> bool {
    value.get("format").and_then(Value::as_str) == Some("int-or-string")
}

fn int_or_string_schema() -> Value {
    json!({"oneOf": [{"type": "string"}, {"type": "integer"}]})
}

/// Let optional fields be `null`: a scalar `type` becomes `[type, "null"]`
/// unless the field's name is listed in the `required` array of the object
/// schema that declares it.
///
/// The field name is the key a node sits under; the declaring schema is that
/// node's grandparent (`schema.properties.<name>`). The root schema has no
/// name and is never widened.
///
/// Branches of `anyOf`, `oneOf` and `allOf` are not widened themselves: a
/// `null` admitted by several `oneOf` branches would be rejected. Fields
/// declared inside a branch are still widened against the branch's own
/// `required` list.
pub fn allow_null_optional_fields(value: &mut Value) {
    widen_optional(value, None, &[], &[]);
}

fn widen_optional(
    node: &mut Value,
    key: Option<&str>,
    parent_required: &[String],
    grandparent_required: &[String],
) {
    match node {
        Value::Object(map) => {
            let optional =
                key.is_some_and(|name| !grandparent_required.iter().any(|r| r == name));

            if optional {
                let widened = match map.get("type") {
                    Some(Value::String(ty)) if ty != "null" => Some(json!([ty, "null"])),
                    _ => None,
                };
                if let Some(widened) = widened {
                    map.insert("type".to_string(), widened);
                }
            }

            let required = required_fields(map);
            for (child_key, child) in map.iter_mut() {
                if is_composition(child_key) {
                    widen_branches(child, &required);
                } else {
                    widen_optional(child, Some(child_key), &required, parent_required);
                }
            }
        }
        // array elements are visited as if they were the array itself
        Value::Array(items) => {
            for item in items {
                widen_optional(item, key, parent_required, grandparent_required);
            }
        }
        _ => {}
    }
}

fn widen_branches(branches: &mut Value, required: &[String]) {
    if let Value::Array(branches) = branches {
        for branch in branches {
            widen_optional(branch, None, required, &[]);
        }
    }
}

fn is_composition(key: &str) -> bool {
    matches!(key, "anyOf" | "oneOf" | "allOf")
}

fn required_fields(map: &Map<String, Value>) -> Vec<String> {
    map.get("required")
        .and_then(Value::as_array)
        .map(|required| {
            required
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_additional_properties_injected_where_properties_declared() {
        let mut schema = json!({
            "type": "object",
            "properties": {
                "spec": {
                    "type": "object",
                    "properties": {
                        "replicas": {"type": "integer"}
                    }
                },
                "labels": {
                    "type": "object",
                    "additionalProperties": {"type": "string"}
                }
            }
        });

        additional_properties(&mut schema);

        assert_eq!(
            schema,
            json!({
                "type": "object",
                "properties": {
                    "spec": {
                        "type": "object",
                        "properties": {
                            "replicas": {"type": "integer"}
                        },
                        "additionalProperties": false
                    },
                    "labels": {
                        "type": "object",
                        "additionalProperties": {"type": "string"}
                    }
                },
                "additionalProperties": false
            })
        );
    }

    #[test]
    fn test_explicit_additional_properties_is_kept() {
        let mut schema = json!({
            "properties": {"a": {"type": "string"}},
            "additionalProperties": true
        });

        additional_properties(&mut schema);

        assert_eq!(schema["additionalProperties"], json!(true));
    }

    #[test]
    fn test_additional_properties_skips_array_elements() {
        let mut schema = json!({
            "anyOf": [
                {"properties": {"a": {"type": "string"}}}
            ]
        });
        let expected = schema.clone();

        additional_properties(&mut schema);

        assert_eq!(schema, expected);
    }

    #[test]
    fn test_additional_properties_is_idempotent() {
        let mut once = json!({"properties": {"a": {"properties": {}}}});
        additional_properties(&mut once);
        let mut twice = once.clone();
        additional_properties(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_additional_properties_leaves_scalars() {
        let mut value = json!("properties");
        additional_properties(&mut value);
        assert_eq!(value, json!("properties"));
    }

    #[test]
    fn test_int_or_string_replaced() {
        let mut schema = json!({
            "properties": {
                "port": {
                    "format": "int-or-string",
                    "description": "target port",
                    "pattern": "^[0-9]+$"
                },
                "name": {"type": "string"}
            }
        });

        replace_int_or_string(&mut schema);

        assert_eq!(
            schema,
            json!({
                "properties": {
                    "port": {"oneOf": [{"type": "string"}, {"type": "integer"}]},
                    "name": {"type": "string"}
                }
            })
        );
    }

    #[test]
    fn test_int_or_string_inside_arrays() {
        let mut schema = json!({
            "properties": {
                "ports": {
                    "type": "array",
                    "items": {"format": "int-or-string"}
                }
            },
            "allOf": [{"format": "int-or-string"}, {"type": "object"}]
        });

        replace_int_or_string(&mut schema);

        assert_eq!(schema["properties"]["ports"]["items"], int_or_string_schema());
        assert_eq!(schema["allOf"][0], int_or_string_schema());
        assert_eq!(schema["allOf"][1], json!({"type": "object"}));
    }

    #[test]
    fn test_kubernetes_int_or_string_extension_is_kept() {
        let mut schema = json!({
            "properties": {
                "maxSurge": {
                    "anyOf": [{"type": "integer"}, {"type": "string"}],
                    "pattern": "^[0-9]+%$",
                    "x-kubernetes-int-or-string": true
                }
            }
        });
        let expected = schema.clone();

        replace_int_or_string(&mut schema);

        assert_eq!(schema, expected);
    }

    #[test]
    fn test_int_or_string_is_idempotent() {
        let mut once = json!({"properties": {"port": {"format": "int-or-string"}}});
        replace_int_or_string(&mut once);
        let mut twice = once.clone();
        replace_int_or_string(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_other_formats_untouched() {
        let mut schema = json!({"properties": {"at": {"type": "string", "format": "date-time"}}});
        let expected = schema.clone();
        replace_int_or_string(&mut schema);
        assert_eq!(schema, expected);
    }

    #[test]
    fn test_null_allowed_only_for_optional_fields() {
        let mut schema = json!({
            "type": "object",
            "required": ["name"],
            "properties": {
                "name": {"type": "string"},
                "size": {"type": "integer"},
                "nothing": {"type": "null"}
            }
        });

        allow_null_optional_fields(&mut schema);

        assert_eq!(schema["type"], json!("object"));
        assert_eq!(schema["properties"]["name"]["type"], json!("string"));
        assert_eq!(schema["properties"]["size"]["type"], json!(["integer", "null"]));
        assert_eq!(schema["properties"]["nothing"]["type"], json!("null"));
    }

    #[test]
    fn test_null_allowed_uses_the_declaring_object() {
        let mut schema = json!({
            "type": "object",
            "required": ["spec"],
            "properties": {
                "spec": {
                    "type": "object",
                    "required": ["replicas"],
                    "properties": {
                        "replicas": {"type": "integer"},
                        "paused": {"type": "boolean"},
                        "tags": {"type": "array", "items": {"type": "string"}}
                    }
                },
                "status": {"type": "object"}
            }
        });

        allow_null_optional_fields(&mut schema);

        let spec = &schema["properties"]["spec"];
        assert_eq!(spec["type"], json!("object"));
        assert_eq!(spec["properties"]["replicas"]["type"], json!("integer"));
        assert_eq!(spec["properties"]["paused"]["type"], json!(["boolean", "null"]));
        assert_eq!(spec["properties"]["tags"]["type"], json!(["array", "null"]));
        assert_eq!(
            spec["properties"]["tags"]["items"]["type"],
            json!(["string", "null"])
        );
        assert_eq!(schema["properties"]["status"]["type"], json!(["object", "null"]));
    }

    #[test]
    fn test_null_allowed_leaves_composition_branches() {
        let mut schema = json!({
            "type": "object",
            "required": ["port"],
            "properties": {
                "port": {
                    "anyOf": [{"type": "integer"}, {"type": "string"}]
                },
                "opt": {"oneOf": [{"type": "string"}, {"type": "integer"}]},
                "size": {
                    "type": "string",
                    "anyOf": [{"type": "string"}]
                }
            }
        });

        allow_null_optional_fields(&mut schema);

        assert_eq!(
            schema["properties"]["port"],
            json!({"anyOf": [{"type": "integer"}, {"type": "string"}]})
        );
        assert_eq!(schema["properties"]["opt"], int_or_string_schema());
        assert_eq!(schema["properties"]["size"]["type"], json!(["string", "null"]));
        assert_eq!(schema["properties"]["size"]["anyOf"], json!([{"type": "string"}]));
    }

    #[test]
    fn test_null_allowed_inside_branch_properties() {
        let mut schema = json!({
            "properties": {
                "source": {
                    "oneOf": [{
                        "type": "object",
                        "required": ["url"],
                        "properties": {
                            "url": {"type": "string"},
                            "ref": {"type": "string"}
                        }
                    }]
                }
            }
        });

        allow_null_optional_fields(&mut schema);

        let branch = &schema["properties"]["source"]["oneOf"][0];
        assert_eq!(branch["type"], json!("object"));
        assert_eq!(branch["properties"]["url"]["type"], json!("string"));
        assert_eq!(branch["properties"]["ref"]["type"], json!(["string", "null"]));
    }

    #[test]
    fn test_null_allowed_is_idempotent() {
        let mut once = json!({"properties": {"a": {"type": "string"}}});
        allow_null_optional_fields(&mut once);
        let mut twice = once.clone();
        allow_null_optional_fields(&mut twice);
        assert_eq!(once, twice);
        assert_eq!(once["properties"]["a"]["type"], json!(["string", "null"]));
    }

    #[test]
    fn test_apply_respects_options() {
        let schema = json!({
            "properties": {
                "port": {"format": "int-or-string"},
                "name": {"type": "string"}
            }
        });

        let mut default = schema.clone();
        apply(&mut default, &TransformOptions::default());
        assert_eq!(default["additionalProperties"], json!(false));
        assert_eq!(default["properties"]["port"], int_or_string_schema());
        assert_eq!(default["properties"]["name"]["type"], json!("string"));

        let mut nullable = schema;
        apply(
            &mut nullable,
            &TransformOptions {
                allow_null_optional_fields: true,
            },
        );
        assert_eq!(nullable["properties"]["name"]["type"], json!(["string", "null"]));
    }
}
