// Router module generation for the Node and Python runtimes.

mod plan;
mod render;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StepFlowError;

pub use plan::{check_entries, plan_router, render_router, ApiStepSource, RouterPlan};
pub use render::{render, RouterEntry};

/// Language of the generated router module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouterTarget {
    Node,
    Python,
}

impl RouterTarget {
    pub fn file_name(&self) -> &'static str {
        match self {
            RouterTarget::Node => "router.ts",
            RouterTarget::Python => "router.py",
        }
    }
}

impl fmt::Display for RouterTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterTarget::Node => f.write_str("node"),
            RouterTarget::Python => f.write_str("python"),
        }
    }
}

impl FromStr for RouterTarget {
    type Err = StepFlowError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "node" => Ok(RouterTarget::Node),
            "python" => Ok(RouterTarget::Python),
            other => Err(StepFlowError::Other(anyhow::anyhow!(
                "unsupported router target `{other}`"
            ))),
        }
    }
}
