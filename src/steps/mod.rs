// Built-in steps.

pub mod new_order_notifications;

use crate::step::EventStep;

/// All built-in event steps.
pub fn builtin_event_steps() -> Vec<EventStep> {
    vec![new_order_notifications::step()]
}
