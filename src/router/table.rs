use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StepFlowError};
use crate::step::StepContext;

use super::config::RouteConfig;
use super::handler::{ApiHandler, ApiRequest, ApiResponse, HandlerRegistry};
use super::key::RouteKey;
use super::method::HttpMethod;

/// One registered route: the step behind it, its verb, handler and options.
#[derive(Clone)]
pub struct RoutePath {
    pub step_name: String,
    pub method: HttpMethod,
    pub handler: Arc<dyn ApiHandler>,
    pub config: RouteConfig,
}

impl RoutePath {
    pub fn new(
        step_name: impl Into<String>,
        method: HttpMethod,
        handler: Arc<dyn ApiHandler>,
        config: RouteConfig,
    ) -> Self {
        Self {
            step_name: step_name.into(),
            method,
            handler,
            config,
        }
    }

    /// Runs the handler, bounded by `config.timeout` when one is set.
    pub async fn call(&self, request: ApiRequest, ctx: &StepContext) -> Result<ApiResponse> {
        let ctx = ctx.for_step(&self.step_name, self.config.emits.clone());
        match self.config.timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.handler.handle(request, &ctx))
                .await
                .map_err(|_| StepFlowError::Timeout {
                    step: self.step_name.clone(),
                    timeout_ms: timeout.as_millis() as u64,
                })?,
            None => self.handler.handle(request, &ctx).await,
        }
    }
}

impl fmt::Debug for RoutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutePath")
            .field("step_name", &self.step_name)
            .field("method", &self.method)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Declarative route entry; `handler` names a registered handler.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RouteSpec {
    pub key: String,
    pub step_name: String,
    pub method: HttpMethod,
    pub handler: String,
    #[serde(default)]
    pub config: RouteConfig,
}

/// Immutable route snapshot. Built once, then only read.
#[derive(Clone, Debug, Default)]
pub struct RouteTable {
    routes: BTreeMap<RouteKey, RoutePath>,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// Resolves every handler reference up front; a dangling one fails the whole table.
    pub fn from_specs(specs: &[RouteSpec], handlers: &HandlerRegistry) -> Result<Self> {
        let mut builder = Self::builder();
        for spec in specs {
            let handler = handlers.resolve(&spec.handler)?;
            let key = RouteKey::parse(&spec.key)?;
            builder = builder.route(
                key,
                RoutePath::new(
                    spec.step_name.clone(),
                    spec.method,
                    handler,
                    spec.config.clone(),
                ),
            )?;
        }
        Ok(builder.build())
    }

    pub fn get(&self, method: HttpMethod, path: &str) -> Option<&RoutePath> {
        let key = RouteKey::new(method, path).ok()?;
        self.routes.get(&key)
    }

    pub fn lookup(&self, raw_key: &str) -> Option<&RoutePath> {
        let key = RouteKey::parse(raw_key).ok()?;
        self.routes.get(&key)
    }

    pub fn contains(&self, key: &RouteKey) -> bool {
        self.routes.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &RouteKey> {
        self.routes.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RouteKey, &RoutePath)> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[derive(Default)]
pub struct RouteTableBuilder {
    routes: BTreeMap<RouteKey, RoutePath>,
}

impl RouteTableBuilder {
    pub fn route(mut self, key: RouteKey, path: RoutePath) -> Result<Self> {
        if path.method != key.method() {
            return Err(StepFlowError::MethodMismatch {
                key: key.to_string(),
                method: path.method.as_str().to_string(),
            });
        }
        if self.routes.contains_key(&key) {
            return Err(StepFlowError::DuplicateRoute(key.to_string()));
        }
        tracing::debug!(route = %key, step = %path.step_name, "route registered");
        self.routes.insert(key, path);
        Ok(self)
    }

    /// Shorthand for `route` with a raw `"<METHOD> <path>"` key.
    pub fn route_str(self, raw_key: &str, path: RoutePath) -> Result<Self> {
        let key = RouteKey::parse(raw_key)?;
        self.route(key, path)
    }

    pub fn build(self) -> RouteTable {
        RouteTable {
            routes: self.routes,
        }
    }
}
