pub mod cli;
pub mod codegen;
pub mod config;
pub mod error;
pub mod logger;
pub mod manifest;
pub mod router;
pub mod schema;
pub mod state;
pub mod step;
pub mod steps;
pub mod utils;

pub use codegen::{
    check_entries, plan_router, render, render_router, ApiStepSource, RouterEntry, RouterPlan,
    RouterTarget,
};
pub use config::EnvConfig;
pub use error::{Result, StepFlowError};
pub use logger::{LogLevel, LogRecord, LogSink, Logger, TracingSink};
pub use manifest::{
    validate_cron_expression, StepEntry, StepRuntime, StepsManifest, ValidationIssue,
    ValidationReport,
};
pub use router::{
    handler_fn, ApiHandler, ApiRequest, ApiResponse, HandlerRegistry, HttpMethod, RouteConfig,
    RouteKey, RoutePath, RouteSpec, RouteTable, RouteTableBuilder,
};
pub use schema::{Schema, SchemaError, SchemaKind};
pub use state::{MemoryStateStore, StateStore};
pub use step::{
    event_handler_fn, new_trace_id, ApiConfig, CronConfig, Event, EventConfig, EventHandler,
    EventStep, NoopConfig, StepConfig, StepContext,
};
pub use utils::{logging, validation};
