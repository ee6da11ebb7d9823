//! Sends a notification when a new order lands, reading the order back from
//! the `orders` state group.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::Result;
use crate::step::{EventConfig, EventHandler, EventStep, StepContext};

pub const NAME: &str = "NewOrderNotifications";
pub const TOPIC: &str = "new-order-notification";
pub const ORDERS_GROUP: &str = "orders";

pub fn config() -> EventConfig {
    EventConfig::builder(NAME)
        .description("Checks a state change and notifies about the new order")
        .subscribe(TOPIC)
        .flow("basic-tutorial")
        .build()
}

pub fn step() -> EventStep {
    EventStep::new(config(), Arc::new(NewOrderNotifications))
}

pub struct NewOrderNotifications;

#[async_trait]
impl EventHandler for NewOrderNotifications {
    async fn handle(&self, input: Value, ctx: &StepContext) -> Result<()> {
        let logger = ctx.logger();
        logger.info("Processing NewOrderNotifications", Some(input.clone()));

        let order_id = input.get("order_id").cloned().unwrap_or(Value::Null);
        logger.info("[NewOrderNotifications] order id", Some(order_id.clone()));

        let order = ctx.state().get(ORDERS_GROUP, &state_key(&order_id)).await?;

        // Stand-in for a call to the notification service.
        logger.info(
            "New order notification sent",
            Some(json!({
                "order_id": order_id,
                "order": order,
                "trace_id": ctx.trace_id(),
            })),
        );
        Ok(())
    }
}

/// State key for an `order_id` as given. "" is the absent key: never stored,
/// always read back as None.
fn state_key(order_id: &Value) -> String {
    match order_id {
        Value::Null => String::new(),
        Value::String(id) => id.clone(),
        other => other.to_string(),
    }
}
