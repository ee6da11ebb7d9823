use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, StepFlowError};
use crate::step::StepContext;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ApiRequest {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub path_params: HashMap<String, String>,
    #[serde(default)]
    pub query_params: HashMap<String, String>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: Value,
}

impl ApiRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    pub fn with_path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: u16,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body,
        }
    }

    pub fn ok(body: Value) -> Self {
        Self::new(200, body)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Handler bound to one or more routes.
#[async_trait]
pub trait ApiHandler: Send + Sync {
    async fn handle(&self, request: ApiRequest, ctx: &StepContext) -> Result<ApiResponse>;
}

type BoxedApiFn =
    dyn Fn(ApiRequest, StepContext) -> BoxFuture<'static, Result<ApiResponse>> + Send + Sync;

struct FnApiHandler {
    func: Box<BoxedApiFn>,
}

#[async_trait]
impl ApiHandler for FnApiHandler {
    async fn handle(&self, request: ApiRequest, ctx: &StepContext) -> Result<ApiResponse> {
        (self.func)(request, ctx.clone()).await
    }
}

/// Wraps an async closure as a shareable [`ApiHandler`].
pub fn handler_fn<F, Fut>(func: F) -> Arc<dyn ApiHandler>
where
    F: Fn(ApiRequest, StepContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ApiResponse>> + Send + 'static,
{
    Arc::new(FnApiHandler {
        func: Box::new(move |request, ctx| Box::pin(func(request, ctx))),
    })
}

/// Handlers registered by name, so declarative route specs can refer to them.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn ApiHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Returns the handler previously registered under `name`, if any.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        handler: Arc<dyn ApiHandler>,
    ) -> Option<Arc<dyn ApiHandler>> {
        let name = name.into();
        let previous = self.handlers.insert(name.clone(), handler);
        if previous.is_some() {
            tracing::warn!(handler = %name, "handler registration replaced an existing entry");
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ApiHandler>> {
        self.handlers.get(name).map(Arc::clone)
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<dyn ApiHandler>> {
        self.get(name)
            .ok_or_else(|| StepFlowError::HandlerNotRegistered(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
