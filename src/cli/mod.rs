use std::env;
use std::path::{Component, Path};

use serde::Serialize;

use crate::codegen::{render_router, RouterTarget};
use crate::error::{Result, StepFlowError};
use crate::manifest::{StepsManifest, ValidationReport};
use crate::step::StepConfig;
use crate::steps::builtin_event_steps;

#[derive(Clone, Debug, Serialize)]
pub struct StepRow {
    pub name: String,
    pub kind: String,
    pub runtime: String,
    pub flows: Vec<String>,
}

pub fn load_manifest(path: &Path) -> Result<StepsManifest> {
    StepsManifest::from_path(path)
}

pub fn step_rows(manifest: &StepsManifest) -> Vec<StepRow> {
    manifest
        .steps
        .iter()
        .map(|entry| StepRow {
            name: entry.config.name().to_string(),
            kind: entry.config.kind().to_string(),
            runtime: entry.runtime().to_string(),
            flows: entry.config.flows().to_vec(),
        })
        .collect()
}

/// Validates the manifest and renders the router for `target`; any validation
/// error aborts generation. `router_dir` is where the module will live, relative to
/// the project root.
pub fn generate_router(
    manifest: &StepsManifest,
    target: RouterTarget,
    router_dir: &str,
) -> Result<String> {
    let report = manifest.validate();
    if !report.is_ok() {
        let details: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
        return Err(StepFlowError::Manifest(format!(
            "{} validation error(s): {}",
            report.errors.len(),
            details.join("; ")
        )));
    }
    render_router(target, router_dir, &manifest.api_steps(target))
}

/// Project-relative directory of the router file at `output`. Step paths in the
/// manifest are relative to the working directory, which is the project root.
pub fn router_dir_for(output: Option<&Path>) -> Result<String> {
    let Some(dir) = output.and_then(Path::parent) else {
        return Ok(String::new());
    };
    let dir = if dir.is_absolute() {
        let cwd = env::current_dir().map_err(|err| {
            StepFlowError::Other(anyhow::anyhow!("cannot read working directory: {err}"))
        })?;
        dir.strip_prefix(&cwd)
            .map_err(|_| {
                StepFlowError::Other(anyhow::anyhow!(
                    "router output `{}` is outside the project root `{}`",
                    dir.display(),
                    cwd.display()
                ))
            })?
            .to_path_buf()
    } else {
        dir.to_path_buf()
    };
    let parts: Vec<String> = dir
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect();
    Ok(parts.join("/"))
}

pub fn validation_summary(report: &ValidationReport) -> String {
    let mut lines = Vec::new();
    for error in &report.errors {
        lines.push(format!("error: {error}"));
    }
    for warning in &report.warnings {
        lines.push(format!("warning: {warning}"));
    }
    lines.push(format!(
        "{} error(s), {} warning(s)",
        report.errors.len(),
        report.warnings.len()
    ));
    lines.join("\n")
}

pub fn builtin_step_configs() -> Vec<StepConfig> {
    builtin_event_steps()
        .into_iter()
        .map(|step| StepConfig::Event(step.config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn router_dir_follows_output_location() {
        assert_eq!(router_dir_for(None).unwrap(), "");
        assert_eq!(router_dir_for(Some(Path::new("router.ts"))).unwrap(), "");
        assert_eq!(
            router_dir_for(Some(Path::new("./dist/router.ts"))).unwrap(),
            "dist"
        );

        let cwd = env::current_dir().unwrap();
        let absolute: PathBuf = cwd.join("build").join("py").join("router.py");
        assert_eq!(router_dir_for(Some(&absolute)).unwrap(), "build/py");
    }
}
