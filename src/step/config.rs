use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::router::{HttpMethod, RouteConfig, RouteKey};
use crate::schema::Schema;

/// Step declaration, tagged by `type`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StepConfig {
    Event(EventConfig),
    Api(ApiConfig),
    Cron(CronConfig),
    Noop(NoopConfig),
}

impl StepConfig {
    pub fn name(&self) -> &str {
        match self {
            StepConfig::Event(config) => &config.name,
            StepConfig::Api(config) => &config.name,
            StepConfig::Cron(config) => &config.name,
            StepConfig::Noop(config) => &config.name,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            StepConfig::Event(_) => "event",
            StepConfig::Api(_) => "api",
            StepConfig::Cron(_) => "cron",
            StepConfig::Noop(_) => "noop",
        }
    }

    pub fn flows(&self) -> &[String] {
        match self {
            StepConfig::Event(config) => &config.flows,
            StepConfig::Api(config) => &config.flows,
            StepConfig::Cron(config) => &config.flows,
            StepConfig::Noop(config) => &config.flows,
        }
    }

    /// Topics the step may publish. Noop steps only declare virtual edges.
    pub fn emits(&self) -> &[String] {
        match self {
            StepConfig::Event(config) => &config.emits,
            StepConfig::Api(config) => &config.emits,
            StepConfig::Cron(config) => &config.emits,
            StepConfig::Noop(_) => &[],
        }
    }
}

/// Declaration of an event-triggered step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub subscribes: Vec<String>,
    #[serde(default)]
    pub emits: Vec<String>,
    #[serde(default)]
    pub flows: Vec<String>,
    /// `None` means the payload reaches the handler unvalidated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Schema>,
}

impl EventConfig {
    pub fn builder(name: impl Into<String>) -> EventConfigBuilder {
        EventConfigBuilder::new(name)
    }

    pub fn subscribes_to(&self, topic: &str) -> bool {
        self.subscribes.iter().any(|t| t == topic)
    }
}

pub struct EventConfigBuilder {
    config: EventConfig,
}

impl EventConfigBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            config: EventConfig {
                name: name.into(),
                description: None,
                subscribes: Vec::new(),
                emits: Vec::new(),
                flows: Vec::new(),
                input: None,
            },
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.config.description = Some(description.into());
        self
    }

    pub fn subscribe(mut self, topic: impl Into<String>) -> Self {
        self.config.subscribes.push(topic.into());
        self
    }

    pub fn emit(mut self, topic: impl Into<String>) -> Self {
        self.config.emits.push(topic.into());
        self
    }

    pub fn flow(mut self, flow: impl Into<String>) -> Self {
        self.config.flows.push(flow.into());
        self
    }

    pub fn input(mut self, schema: Schema) -> Self {
        self.config.input = Some(schema);
        self
    }

    pub fn build(self) -> EventConfig {
        self.config
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub method: HttpMethod,
    pub path: String,
    #[serde(default)]
    pub emits: Vec<String>,
    #[serde(default)]
    pub flows: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_schema: Option<Schema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub auth_required: bool,
}

impl ApiConfig {
    pub fn route_key(&self) -> Result<RouteKey> {
        RouteKey::new(self.method, self.path.clone())
    }

    pub fn route_config(&self) -> RouteConfig {
        RouteConfig {
            timeout: self.timeout_ms.map(Duration::from_millis),
            auth_required: self.auth_required,
            emits: self.emits.clone(),
            flows: self.flows.clone(),
            ..RouteConfig::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CronConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub cron: String,
    #[serde(default)]
    pub emits: Vec<String>,
    #[serde(default)]
    pub flows: Vec<String>,
}

/// Code-less node that only connects other steps in a flow diagram.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoopConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub virtual_subscribes: Vec<String>,
    #[serde(default)]
    pub virtual_emits: Vec<String>,
    #[serde(default)]
    pub flows: Vec<String>,
}
