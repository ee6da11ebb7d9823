// Step manifest: loading, runtime detection and pre-build validation.

mod cron;
mod validation;

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::codegen::{ApiStepSource, RouterTarget};
use crate::error::{Result, StepFlowError};
use crate::step::StepConfig;

pub use cron::validate_cron_expression;
pub use validation::{ValidationIssue, ValidationReport, MAX_STEP_NAME_LEN};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepEntry {
    pub file_path: String,
    pub config: StepConfig,
}

impl StepEntry {
    pub fn runtime(&self) -> StepRuntime {
        StepRuntime::detect(self)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StepsManifest {
    #[serde(default)]
    pub steps: Vec<StepEntry>,
}

impl StepsManifest {
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|err| StepFlowError::Manifest(err.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|err| {
            StepFlowError::Manifest(format!("cannot read `{}`: {err}", path.display()))
        })?;
        let manifest = Self::from_json(&content)?;
        tracing::debug!(path = %path.display(), steps = manifest.steps.len(), "manifest loaded");
        Ok(manifest)
    }

    pub fn find(&self, name: &str) -> Option<&StepEntry> {
        self.steps.iter().find(|entry| entry.config.name() == name)
    }

    /// API steps the given router target is responsible for, in manifest order.
    pub fn api_steps(&self, target: RouterTarget) -> Vec<ApiStepSource> {
        self.steps
            .iter()
            .filter(|entry| entry.runtime().router_target() == Some(target))
            .filter_map(|entry| match &entry.config {
                StepConfig::Api(api) => Some(ApiStepSource {
                    step_name: api.name.clone(),
                    method: api.method,
                    path: api.path.clone(),
                    file_path: entry.file_path.clone(),
                }),
                _ => None,
            })
            .collect()
    }

    pub fn validate(&self) -> ValidationReport {
        validation::validate_steps(&self.steps)
    }
}

/// Language a step is written in, decided from its config and file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepRuntime {
    Node,
    Python,
    Ruby,
    Noop,
    Unknown,
}

impl StepRuntime {
    pub fn detect(entry: &StepEntry) -> Self {
        if matches!(entry.config, StepConfig::Noop(_)) {
            return StepRuntime::Noop;
        }
        let path = entry.file_path.as_str();
        if path.ends_with(".ts") || path.ends_with(".js") {
            StepRuntime::Node
        } else if path.ends_with(".py") {
            StepRuntime::Python
        } else if path.ends_with(".rb") {
            StepRuntime::Ruby
        } else {
            StepRuntime::Unknown
        }
    }

    pub fn router_target(&self) -> Option<RouterTarget> {
        match self {
            StepRuntime::Node => Some(RouterTarget::Node),
            StepRuntime::Python => Some(RouterTarget::Python),
            _ => None,
        }
    }
}

impl fmt::Display for StepRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StepRuntime::Node => "node",
            StepRuntime::Python => "python",
            StepRuntime::Ruby => "ruby",
            StepRuntime::Noop => "noop",
            StepRuntime::Unknown => "unknown",
        };
        f.write_str(label)
    }
}
