mod common;

use std::sync::Arc;

use serde_json::{json, Value};
use stepflow::steps::new_order_notifications::{self, NewOrderNotifications};
use stepflow::{
    event_handler_fn, EventConfig, EventStep, LogLevel, Schema, StateStore, StepFlowError,
};

use common::harness;

fn records_with_order(records: &[stepflow::LogRecord]) -> Vec<&stepflow::LogRecord> {
    records
        .iter()
        .filter(|record| {
            record
                .data
                .as_ref()
                .and_then(Value::as_object)
                .is_some_and(|data| data.contains_key("order_id") && data.contains_key("order"))
        })
        .collect()
}

#[tokio::test]
async fn new_order_notification_logs_resolved_order_once() -> anyhow::Result<()> {
    let h = harness("trace-abc");
    let order = json!({"id": "abc123", "status": "placed"});
    h.state.set("orders", "abc123", order.clone()).await?;

    let step = new_order_notifications::step();
    let emitted = step.invoke(json!({"order_id": "abc123"}), &h.ctx).await?;

    assert!(emitted.is_empty());
    assert_eq!(
        h.state.gets(),
        vec![("orders".to_string(), "abc123".to_string())]
    );

    let records = h.sink.records();
    let with_order = records_with_order(&records);
    assert_eq!(with_order.len(), 1, "exactly one record carries the order");

    let data = with_order[0].data.as_ref().expect("data");
    assert_eq!(data["order_id"], "abc123");
    assert_eq!(data["order"], order);
    assert_eq!(data["trace_id"], "trace-abc");
    assert_eq!(with_order[0].level, LogLevel::Info);
    assert_eq!(with_order[0].step.as_deref(), Some("NewOrderNotifications"));
    assert!(records.iter().all(|record| record.trace_id == "trace-abc"));
    Ok(())
}

#[tokio::test]
async fn missing_order_id_reads_absent_key_and_logs_null() -> anyhow::Result<()> {
    let h = harness("trace-empty");

    let emitted = new_order_notifications::step()
        .invoke(json!({}), &h.ctx)
        .await?;

    assert!(emitted.is_empty());
    assert_eq!(h.state.gets(), vec![("orders".to_string(), String::new())]);

    let records = h.sink.records();
    let with_order = records_with_order(&records);
    assert_eq!(with_order.len(), 1);
    let data = with_order[0].data.as_ref().expect("data");
    assert_eq!(data["order_id"], Value::Null);
    assert_eq!(data["order"], Value::Null);
    Ok(())
}

#[tokio::test]
async fn unknown_order_is_not_an_error() -> anyhow::Result<()> {
    let h = harness("trace-unknown");
    new_order_notifications::step()
        .invoke(json!({"order_id": "nope"}), &h.ctx)
        .await?;

    let records = h.sink.records();
    let with_order = records_with_order(&records);
    assert_eq!(with_order[0].data.as_ref().expect("data")["order"], Value::Null);
    Ok(())
}

#[tokio::test]
async fn step_without_emits_cannot_publish() -> anyhow::Result<()> {
    let h = harness("trace-emit");
    let config = new_order_notifications::config();
    assert!(config.emits.is_empty());

    let step = EventStep::new(
        config,
        event_handler_fn(|_input, ctx| async move { ctx.emit("order-shipped", json!({})) }),
    );
    let err = step.invoke(json!({}), &h.ctx).await.unwrap_err();
    assert!(matches!(err, StepFlowError::UndeclaredTopic { .. }));
    Ok(())
}

#[tokio::test]
async fn declared_topics_are_returned_to_the_caller() -> anyhow::Result<()> {
    let h = harness("trace-audit");
    let config = EventConfig::builder("StateAudit")
        .subscribe("audit-requested")
        .emit("order-audit-warning")
        .flow("basic-tutorial")
        .build();
    let step = EventStep::new(
        config,
        event_handler_fn(|input, ctx| async move {
            ctx.logger().info("auditing", Some(input.clone()));
            ctx.emit("order-audit-warning", json!({"message": "late", "input": input}))
        }),
    );

    let events = step.invoke(json!({"order_id": "a1"}), &h.ctx).await?;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].topic, "order-audit-warning");
    assert_eq!(events[0].trace_id, "trace-audit");
    assert_eq!(events[0].data["input"]["order_id"], "a1");

    let second = step.invoke(json!({"order_id": "a2"}), &h.ctx).await?;
    assert_eq!(second.len(), 1, "each invocation gets its own buffer");
    Ok(())
}

#[tokio::test]
async fn declared_input_schema_rejects_bad_payload_before_handler_runs() -> anyhow::Result<()> {
    let h = harness("trace-schema");
    let config = EventConfig::builder("PeriodicJobHandled")
        .subscribe("periodic-job-handled")
        .input(
            Schema::object()
                .required("message", Schema::string())
                .build(),
        )
        .build();
    let calls = Arc::new(parking_lot::Mutex::new(0usize));
    let counter = Arc::clone(&calls);
    let step = EventStep::new(
        config,
        event_handler_fn(move |_input, _ctx| {
            let counter = Arc::clone(&counter);
            async move {
                *counter.lock() += 1;
                Ok(())
            }
        }),
    );

    let err = step.invoke(json!({"message": 42}), &h.ctx).await.unwrap_err();
    match err {
        StepFlowError::InvalidInput { step, path, .. } => {
            assert_eq!(step, "PeriodicJobHandled");
            assert_eq!(path, vec!["message".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(*calls.lock(), 0);

    step.invoke(json!({"message": "ok"}), &h.ctx).await?;
    assert_eq!(*calls.lock(), 1);
    Ok(())
}

#[tokio::test]
async fn handler_struct_can_be_called_directly() -> anyhow::Result<()> {
    let h = harness("trace-direct");
    let scoped = h.ctx.for_step(new_order_notifications::NAME, Vec::new());
    stepflow::EventHandler::handle(&NewOrderNotifications, json!({"order_id": "x"}), &scoped)
        .await?;
    assert_eq!(h.sink.records().len(), 3);
    Ok(())
}

#[tokio::test]
async fn numeric_order_id_is_looked_up_as_given() -> anyhow::Result<()> {
    let h = harness("trace-numeric");
    let order = json!({"id": 123, "status": "placed"});
    h.state.set("orders", "123", order.clone()).await?;

    new_order_notifications::step()
        .invoke(json!({"order_id": 123}), &h.ctx)
        .await?;

    assert_eq!(h.state.gets(), vec![("orders".to_string(), "123".to_string())]);

    let records = h.sink.records();
    let id_record = records
        .iter()
        .find(|record| record.message == "[NewOrderNotifications] order id")
        .expect("order id record");
    assert_eq!(id_record.data, Some(json!(123)));

    let with_order = records_with_order(&records);
    assert_eq!(with_order.len(), 1);
    let data = with_order[0].data.as_ref().expect("data");
    assert_eq!(data["order_id"], 123);
    assert_eq!(data["order"], order);
    Ok(())
}
