use serde_json::json;
use stepflow::{Schema, SchemaKind};

#[test]
fn object_schema_checks_required_and_additional() {
    let order = Schema::object()
        .required("order_id", Schema::string())
        .property("quantity", Schema::integer())
        .deny_additional()
        .build()
        .with_name("order");

    assert!(order.validate(&json!({"order_id": "abc123", "quantity": 2})).is_ok());

    let missing = order.validate(&json!({"quantity": 2})).unwrap_err();
    assert_eq!(missing.path(), ["order_id".to_string()]);

    let extra = order
        .validate(&json!({"order_id": "abc123", "coupon": "FREE"}))
        .unwrap_err();
    assert_eq!(extra.path(), ["coupon".to_string()]);
}

#[test]
fn nested_errors_report_full_path() {
    let schema = Schema::object()
        .required("items", Schema::array(Schema::object().required("sku", Schema::string()).build()))
        .build();

    let err = schema
        .validate(&json!({"items": [{"sku": "a"}, {"sku": 7}]}))
        .unwrap_err();
    assert_eq!(err.path(), ["items", "1", "sku"].map(String::from));
    assert!(err.to_string().contains("$.items.1.sku"));
}

#[test]
fn schema_deserializes_from_step_config_json() -> anyhow::Result<()> {
    let schema: Schema = serde_json::from_value(json!({
        "type": "object",
        "properties": {
            "message": {"type": "string"},
            "count": {"type": "number"}
        },
        "required": ["message"]
    }))?;

    assert!(matches!(schema.kind, SchemaKind::Object { additional: true, .. }));
    assert!(schema.validate(&json!({"message": "hi", "count": 1.5, "extra": true})).is_ok());
    assert!(schema.validate(&json!({"count": 1})).is_err());
    assert!(schema.validate(&json!("not an object")).is_err());
    Ok(())
}

#[test]
fn any_accepts_everything() {
    let any = Schema::any();
    for value in [json!(null), json!(1), json!("x"), json!([1, 2]), json!({"a": 1})] {
        assert!(any.validate(&value).is_ok());
    }
}
