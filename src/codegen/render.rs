use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::router::HttpMethod;

use super::RouterTarget;

/// One generated router entry; `handler_ref` and `config_ref` are expressions
/// in the target language.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterEntry {
    pub step_name: String,
    pub method: HttpMethod,
    pub path: String,
    pub handler_ref: String,
    pub config_ref: String,
}

impl RouterEntry {
    /// `"<METHOD> <path>"`, the key this entry is stored under.
    pub fn key(&self) -> String {
        format!("{} {}", self.method.as_upper(), self.path)
    }
}

const NODE_CORE_MODULE: &str = "@motiadev/core";

const METHOD_LITERALS_NODE: &str =
    "'get' | 'post' | 'put' | 'delete' | 'patch' | 'options' | 'head'";
const METHOD_LITERALS_PYTHON: &str =
    "'get', 'post', 'put', 'delete', 'patch', 'options', 'head'";

/// Fills the target's router module with `imports` and `entries`.
///
/// Pure: the output depends only on the arguments.
pub fn render(target: RouterTarget, imports: &[String], entries: &[RouterEntry]) -> String {
    match target {
        RouterTarget::Node => render_node(imports, entries),
        RouterTarget::Python => render_python(imports, entries),
    }
}

fn render_node(imports: &[String], entries: &[RouterEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "import type {{ ApiRouteConfig, ApiRouteHandler }} from {}",
        quote(NODE_CORE_MODULE)
    );
    for import in imports {
        let _ = writeln!(out, "{import}");
    }
    out.push('\n');
    out.push_str("type RouterPath = {\n");
    out.push_str("  stepName: string\n");
    let _ = writeln!(out, "  method: {METHOD_LITERALS_NODE}");
    out.push_str("  handler: ApiRouteHandler\n");
    out.push_str("  config: ApiRouteConfig\n");
    out.push_str("}\n\n");
    out.push_str("export const routerPaths: Record<string, RouterPath> = {\n");
    let lines: Vec<String> = entries
        .iter()
        .map(|entry| {
            format!(
                "  {}: {{ stepName: {}, method: {}, handler: {}, config: {} }}",
                quote(&entry.key()),
                quote(&entry.step_name),
                quote(entry.method.as_str()),
                entry.handler_ref,
                entry.config_ref
            )
        })
        .collect();
    push_entries(&mut out, &lines);
    out.push_str("}\n");
    out
}

fn render_python(imports: &[String], entries: &[RouterEntry]) -> String {
    let mut out = String::new();
    out.push_str("import importlib.util\n");
    out.push_str("import os\n");
    out.push_str("from typing import Dict, Callable, Any, Literal\n\n\n");
    out.push_str("_ROUTER_DIR = os.path.dirname(os.path.abspath(__file__))\n\n\n");
    out.push_str("def _load_step(name: str, path: str):\n");
    out.push_str("    location = os.path.join(_ROUTER_DIR, path)\n");
    out.push_str("    spec = importlib.util.spec_from_file_location(name, location)\n");
    out.push_str("    module = importlib.util.module_from_spec(spec)\n");
    out.push_str("    spec.loader.exec_module(module)\n");
    out.push_str("    return module\n\n\n");
    for import in imports {
        let _ = writeln!(out, "{import}");
    }
    if !imports.is_empty() {
        out.push_str("\n\n");
    }
    out.push_str("class RouterPath:\n");
    let _ = writeln!(
        out,
        "    def __init__(self, step_name: str, method: Literal[{METHOD_LITERALS_PYTHON}], handler: Callable, config: Dict[str, Any]):"
    );
    out.push_str("        self.step_name = step_name\n");
    out.push_str("        self.method = method\n");
    out.push_str("        self.handler = handler\n");
    out.push_str("        self.config = config\n\n\n");
    out.push_str("router_paths: Dict[str, RouterPath] = {\n");
    let lines: Vec<String> = entries
        .iter()
        .map(|entry| {
            format!(
                "    {}: RouterPath({}, {}, {}, {})",
                quote(&entry.key()),
                quote(&entry.step_name),
                quote(entry.method.as_str()),
                entry.handler_ref,
                entry.config_ref
            )
        })
        .collect();
    push_entries(&mut out, &lines);
    out.push_str("}\n");
    out
}

fn push_entries(out: &mut String, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    out.push_str(&lines.join(",\n"));
    out.push('\n');
}

/// Single-quoted literal valid in both TypeScript and Python.
pub(crate) fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}
