use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::step::StepConfig;
use crate::utils::ConfigValidator;

use super::cron::validate_cron_expression;
use super::{StepEntry, StepRuntime};

pub const MAX_STEP_NAME_LEN: usize = 30;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub file_path: String,
    pub step: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.file_path, self.step, self.message)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, entry: &StepEntry, message: impl Into<String>) {
        self.errors.push(issue(entry, message));
    }

    fn warning(&mut self, entry: &StepEntry, message: impl Into<String>) {
        self.warnings.push(issue(entry, message));
    }
}

fn issue(entry: &StepEntry, message: impl Into<String>) -> ValidationIssue {
    ValidationIssue {
        file_path: entry.file_path.clone(),
        step: entry.config.name().to_string(),
        message: message.into(),
    }
}

pub(super) fn validate_steps(steps: &[StepEntry]) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut names = HashSet::new();
    let mut endpoints: HashMap<String, &str> = HashMap::new();

    for entry in steps {
        if !names.insert(entry.config.name()) {
            report.error(
                entry,
                format!("Duplicate step names: `{}`", entry.config.name()),
            );
        }
    }

    for entry in steps {
        if let Err(err) = ConfigValidator::validate_step_name(entry.config.name(), MAX_STEP_NAME_LEN)
        {
            report.error(entry, err.to_string());
        }

        for topic in entry.config.emits() {
            if let Err(err) = ConfigValidator::validate_topic(topic) {
                report.error(entry, err.to_string());
            }
        }

        match &entry.config {
            StepConfig::Cron(cron) => {
                if let Err(reason) = validate_cron_expression(&cron.cron) {
                    report.error(
                        entry,
                        format!("Cron step has an invalid cron expression `{}`: {reason}", cron.cron),
                    );
                }
            }
            StepConfig::Api(api) => {
                if let Err(err) = ConfigValidator::validate_route_path(&api.path) {
                    report.error(entry, err.to_string());
                }
                let endpoint = format!("{} {}", api.method.as_upper(), api.path);
                match endpoints.get(endpoint.as_str()) {
                    Some(first) => report.error(
                        entry,
                        format!(
                            "Endpoint conflict: `{endpoint}` is defined in `{}` and `{first}`",
                            entry.file_path
                        ),
                    ),
                    None => {
                        endpoints.insert(endpoint, entry.file_path.as_str());
                    }
                }
            }
            StepConfig::Event(event) => {
                if event.subscribes.is_empty() {
                    report.warning(entry, "Event step subscribes to no topics");
                }
            }
            StepConfig::Noop(_) => {}
        }

        match entry.runtime() {
            StepRuntime::Unknown | StepRuntime::Ruby => {
                report.warning(
                    entry,
                    format!("No builder found for runtime `{}`", entry.runtime()),
                );
            }
            _ => {}
        }
    }

    if !report.is_ok() {
        tracing::warn!(errors = report.errors.len(), "step validation failed");
    }
    report
}
