use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;
use tracing::Instrument;

use crate::error::{Result, StepFlowError};
use crate::schema::SchemaError;

use super::config::EventConfig;
use super::context::{Event, StepContext};

#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, input: Value, ctx: &StepContext) -> Result<()>;
}

type BoxedEventFn = dyn Fn(Value, StepContext) -> BoxFuture<'static, Result<()>> + Send + Sync;

struct FnEventHandler {
    func: Box<BoxedEventFn>,
}

#[async_trait]
impl EventHandler for FnEventHandler {
    async fn handle(&self, input: Value, ctx: &StepContext) -> Result<()> {
        (self.func)(input, ctx.clone()).await
    }
}

/// Wraps an async closure as an [`EventHandler`].
pub fn event_handler_fn<F, Fut>(func: F) -> Arc<dyn EventHandler>
where
    F: Fn(Value, StepContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    Arc::new(FnEventHandler {
        func: Box::new(move |input, ctx| Box::pin(func(input, ctx))),
    })
}

/// An event step: its declaration plus the handler behind it.
#[derive(Clone)]
pub struct EventStep {
    pub config: EventConfig,
    pub handler: Arc<dyn EventHandler>,
}

impl EventStep {
    pub fn new(config: EventConfig, handler: Arc<dyn EventHandler>) -> Self {
        Self { config, handler }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Runs the handler once and hands back whatever it emitted.
    ///
    /// Input is checked against `config.input` when a schema is declared and
    /// passed through untouched otherwise.
    pub async fn invoke(&self, input: Value, ctx: &StepContext) -> Result<Vec<Event>> {
        if let Some(schema) = &self.config.input {
            schema
                .validate(&input)
                .map_err(|err| self.invalid_input(err))?;
        }

        let scoped = ctx.for_step(&self.config.name, self.config.emits.clone());
        let span = tracing::info_span!(
            "event_step",
            step = %self.config.name,
            trace_id = %scoped.trace_id()
        );
        self.handler
            .handle(input, &scoped)
            .instrument(span)
            .await
            .inspect_err(|err| {
                tracing::warn!(step = %self.config.name, error = %err, "event step failed");
            })?;

        Ok(scoped.take_emitted())
    }

    fn invalid_input(&self, err: SchemaError) -> StepFlowError {
        let SchemaError::Validation { message, path } = err;
        StepFlowError::InvalidInput {
            step: self.config.name.clone(),
            message,
            path,
        }
    }
}
