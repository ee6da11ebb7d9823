// Step declarations, execution context and handlers.

mod config;
mod context;
mod handler;

pub use config::{
    ApiConfig, CronConfig, EventConfig, EventConfigBuilder, NoopConfig, StepConfig,
};
pub use context::{new_trace_id, Event, StepContext};
pub use handler::{event_handler_fn, EventHandler, EventStep};
