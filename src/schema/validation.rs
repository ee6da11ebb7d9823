use serde_json::Value;

use super::error::SchemaError;
use super::schema::{Schema, SchemaKind};

/// 验证值是否符合 Schema
pub(crate) fn validate_value(
    schema: &Schema,
    value: &Value,
    path: &mut Vec<String>,
) -> Result<(), SchemaError> {
    match &schema.kind {
        SchemaKind::Null => expect(value.is_null(), "expected null", path),
        SchemaKind::Boolean => expect(value.is_boolean(), "expected boolean", path),
        SchemaKind::Integer => expect(
            value.is_i64() || value.is_u64(),
            "expected integer",
            path,
        ),
        SchemaKind::Number => expect(value.is_number(), "expected number", path),
        SchemaKind::String => expect(value.is_string(), "expected string", path),
        SchemaKind::Array { items } => {
            let array = value
                .as_array()
                .ok_or_else(|| SchemaError::validation("expected array", path))?;
            for (idx, element) in array.iter().enumerate() {
                path.push(idx.to_string());
                validate_value(items, element, path)?;
                path.pop();
            }
            Ok(())
        }
        SchemaKind::Object {
            properties,
            required,
            additional,
        } => {
            let object = value
                .as_object()
                .ok_or_else(|| SchemaError::validation("expected object", path))?;

            if let Some(missing) = required.iter().find(|key| !object.contains_key(*key)) {
                path.push(missing.clone());
                return Err(SchemaError::validation(
                    format!("missing required property `{missing}`"),
                    path,
                ));
            }

            for (key, val) in object {
                path.push(key.clone());
                match properties.get(key) {
                    Some(sub_schema) => validate_value(sub_schema, val, path)?,
                    None if !additional => {
                        return Err(SchemaError::validation(
                            format!("unexpected property `{key}`"),
                            path,
                        ));
                    }
                    None => {}
                }
                path.pop();
            }
            Ok(())
        }
        SchemaKind::Any => Ok(()),
    }
}

fn expect(ok: bool, message: &str, path: &[String]) -> Result<(), SchemaError> {
    if ok {
        Ok(())
    } else {
        Err(SchemaError::validation(message, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order_schema() -> Schema {
        Schema::object()
            .required("order_id", Schema::string())
            .property("quantity", Schema::integer())
            .property("tags", Schema::array(Schema::string()))
            .build()
    }

    #[test]
    fn accepts_matching_value() {
        let value = json!({"order_id": "abc", "quantity": 2, "tags": ["a"], "extra": true});
        assert!(order_schema().validate(&value).is_ok());
    }

    #[test]
    fn reports_missing_required_property_path() {
        let err = order_schema().validate(&json!({"quantity": 1})).unwrap_err();
        assert_eq!(err.path(), ["order_id".to_string()]);
    }

    #[test]
    fn reports_nested_type_mismatch() {
        let err = order_schema()
            .validate(&json!({"order_id": "a", "tags": ["x", 3]}))
            .unwrap_err();
        assert_eq!(err.path(), ["tags".to_string(), "1".to_string()]);
        assert!(err.to_string().contains("$.tags.1"));
    }

    #[test]
    fn closed_object_rejects_unknown_property() {
        let schema = Schema::object()
            .required("id", Schema::string())
            .deny_additional()
            .build();
        assert!(schema.validate(&json!({"id": "1", "other": 1})).is_err());
    }

    #[test]
    fn deserializes_from_json_schema_like_form() {
        let schema: Schema = serde_json::from_value(json!({
            "type": "object",
            "properties": {"message": {"type": "string"}},
            "required": ["message"]
        }))
        .unwrap();
        assert!(schema.validate(&json!({"message": "hi"})).is_ok());
        assert!(schema.validate(&json!({"message": 1})).is_err());
    }
}
