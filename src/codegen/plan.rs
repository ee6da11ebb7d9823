use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StepFlowError};
use crate::router::{HttpMethod, RouteKey};

use super::render::{quote, render, RouterEntry};
use super::RouterTarget;

/// An API step as seen by the generator: where it lives and what it serves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiStepSource {
    pub step_name: String,
    pub method: HttpMethod,
    pub path: String,
    pub file_path: String,
}

/// The two slots of a router module.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouterPlan {
    pub imports: Vec<String>,
    pub entries: Vec<RouterEntry>,
}

impl RouterPlan {
    pub fn render(&self, target: RouterTarget) -> String {
        render(target, &self.imports, &self.entries)
    }
}

/// Gives each step a `route{index}` alias, one import and one entry, in input order.
///
/// `router_dir` is the directory the generated module is written to, relative to the
/// project root (`""` for the root itself). Step paths are imported relative to it.
pub fn plan_router(
    target: RouterTarget,
    router_dir: &str,
    steps: &[ApiStepSource],
) -> Result<RouterPlan> {
    let base = project_components(router_dir)?;
    let mut plan = RouterPlan::default();
    for (index, step) in steps.iter().enumerate() {
        let alias = format!("route{index}");
        let module_path = relative_to(&base, &step.file_path);
        let import = match target {
            RouterTarget::Node => format!(
                "import * as {alias} from {}",
                quote(&node_module_path(&module_path))
            ),
            RouterTarget::Python => format!(
                "{alias} = _load_step({}, {})",
                quote(&alias),
                quote(&module_path)
            ),
        };
        plan.imports.push(import);
        plan.entries.push(RouterEntry {
            step_name: step.step_name.clone(),
            method: step.method,
            path: step.path.clone(),
            handler_ref: format!("{alias}.handler"),
            config_ref: format!("{alias}.config"),
        });
    }
    Ok(plan)
}

/// Checks what the runtime expects of a generated table: parseable, unique keys.
pub fn check_entries(entries: &[RouterEntry]) -> Result<()> {
    let mut seen = HashSet::new();
    for entry in entries {
        let key = RouteKey::new(entry.method, entry.path.clone())?;
        if entry.path.contains(char::is_whitespace) {
            return Err(StepFlowError::InvalidRouteKey(entry.key()));
        }
        if !seen.insert(key) {
            return Err(StepFlowError::DuplicateRoute(entry.key()));
        }
        if entry.handler_ref.trim().is_empty() {
            return Err(StepFlowError::HandlerNotRegistered(entry.step_name.clone()));
        }
    }
    Ok(())
}

/// Plans, checks and renders in one go.
pub fn render_router(
    target: RouterTarget,
    router_dir: &str,
    steps: &[ApiStepSource],
) -> Result<String> {
    let plan = plan_router(target, router_dir, steps)?;
    check_entries(&plan.entries)?;
    tracing::debug!(router = %target, routes = plan.entries.len(), "router rendered");
    Ok(plan.render(target))
}

/// Splits a project-relative directory into normal components. A directory that
/// climbs out of the project cannot be related back to the step files.
fn project_components(dir: &str) -> Result<Vec<String>> {
    let normalized = dir.replace('\\', "/");
    if normalized.starts_with('/') {
        return Err(StepFlowError::Other(anyhow::anyhow!(
            "router directory `{dir}` must be relative to the project root"
        )));
    }
    let parts = lexical_components(&normalized);
    if parts.first().is_some_and(|part| part == "..") {
        return Err(StepFlowError::Other(anyhow::anyhow!(
            "router directory `{dir}` is outside the project root"
        )));
    }
    Ok(parts)
}

/// Path components with `.` dropped and `..` folded where possible.
fn lexical_components(path: &str) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." if parts.last().is_some_and(|last| last != "..") => {
                parts.pop();
            }
            other => parts.push(other.to_string()),
        }
    }
    parts
}

/// `file_path` (project-relative) as seen from the directory `base`.
fn relative_to(base: &[String], file_path: &str) -> String {
    let normalized = file_path.replace('\\', "/");
    if normalized.starts_with('/') {
        return normalized;
    }
    let file = lexical_components(&normalized);
    let common = base
        .iter()
        .zip(&file)
        .take_while(|(dir, part)| dir == part)
        .count();
    let mut parts = vec!["..".to_string(); base.len() - common];
    parts.extend(file[common..].iter().cloned());
    parts.join("/")
}

/// Bundled output is JavaScript, so TypeScript sources are imported by their `.js` name.
fn node_module_path(path: &str) -> String {
    let path = match path.rsplit_once('.') {
        Some((stem, "ts")) => format!("{stem}.js"),
        _ => path.to_string(),
    };
    if path.starts_with("../") || path.starts_with('/') {
        path
    } else {
        format!("./{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_paths_are_relative_js() {
        assert_eq!(node_module_path("steps/a.step.ts"), "./steps/a.step.js");
        assert_eq!(node_module_path("steps/b.js"), "./steps/b.js");
        assert_eq!(node_module_path("../shared/c.ts"), "../shared/c.js");
        assert_eq!(node_module_path("/abs/d.ts"), "/abs/d.js");
    }

    #[test]
    fn rewritten_sources_are_node_steps() {
        use crate::manifest::{StepEntry, StepRuntime};
        use crate::step::{EventConfig, StepConfig};

        for file in ["steps/a.ts", "steps/b.js", "steps/c.tsx", "steps/d.mts"] {
            let entry = StepEntry {
                file_path: file.to_string(),
                config: StepConfig::Event(EventConfig::builder("Orders").subscribe("x").build()),
            };
            let rewritten = node_module_path(file).ends_with(".js") && !file.ends_with(".js");
            if rewritten {
                assert_eq!(StepRuntime::detect(&entry), StepRuntime::Node, "{file}");
            }
        }
        assert_eq!(node_module_path("steps/c.tsx"), "./steps/c.tsx");
    }

    #[test]
    fn step_paths_are_relative_to_router_dir() {
        let root = project_components("").unwrap();
        assert_eq!(relative_to(&root, "./steps/a.ts"), "steps/a.ts");
        assert_eq!(relative_to(&root, r"steps\win.ts"), "steps/win.ts");

        let dist = project_components("./dist/").unwrap();
        assert_eq!(relative_to(&dist, "steps/a.ts"), "../steps/a.ts");
        assert_eq!(relative_to(&dist, "dist/local.ts"), "local.ts");
        assert_eq!(relative_to(&dist, "../shared/c.ts"), "../../shared/c.ts");

        let nested = project_components("build/out/../router").unwrap();
        assert_eq!(nested, vec!["build".to_string(), "router".to_string()]);
        assert_eq!(relative_to(&nested, "build/steps/a.py"), "../steps/a.py");
    }

    #[test]
    fn router_dir_must_stay_inside_project() {
        assert!(project_components("../elsewhere").is_err());
        assert!(project_components("/tmp/out").is_err());
    }
}
