use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use stepflow::cli::{
    builtin_step_configs, generate_router, load_manifest, router_dir_for, step_rows,
    validation_summary, StepRow,
};
use stepflow::codegen::RouterTarget;
use stepflow::config::EnvConfig;
use stepflow::utils::LoggingConfig;

#[derive(Parser)]
#[command(name = "stepflow", version, about = "StepFlow CLI", author)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Steps {
        #[command(subcommand)]
        command: StepsCommand,
    },
    Router {
        #[command(subcommand)]
        command: RouterCommand,
    },
}

#[derive(Subcommand)]
enum StepsCommand {
    List {
        #[arg(long)]
        manifest: Option<PathBuf>,
    },
    Validate {
        #[arg(long)]
        manifest: Option<PathBuf>,
    },
    Builtin {
        /// Single-line JSON instead of pretty-printed output.
        #[arg(long)]
        compact: bool,
    },
}

#[derive(Subcommand)]
enum RouterCommand {
    Render {
        #[arg(long, value_parser = parse_target)]
        target: RouterTarget,
        #[arg(long)]
        manifest: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn parse_target(raw: &str) -> Result<RouterTarget, String> {
    raw.parse().map_err(|err: stepflow::StepFlowError| err.to_string())
}

fn main() -> anyhow::Result<ExitCode> {
    LoggingConfig::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Steps { command } => match command {
            StepsCommand::List { manifest } => handle_steps_list(manifest),
            StepsCommand::Validate { manifest } => handle_steps_validate(manifest),
            StepsCommand::Builtin { compact } => handle_steps_builtin(compact),
        },
        Command::Router { command } => match command {
            RouterCommand::Render {
                target,
                manifest,
                output,
            } => handle_router_render(target, manifest, output),
        },
    }
}

fn handle_steps_list(manifest: Option<PathBuf>) -> anyhow::Result<ExitCode> {
    let path = EnvConfig::resolve_manifest_path(manifest);
    let manifest = load_manifest(&path)?;
    let rows = step_rows(&manifest);
    if rows.is_empty() {
        println!("No steps found in manifest `{}`", path.display());
    } else {
        render_step_table(&rows);
    }
    Ok(ExitCode::SUCCESS)
}

fn render_step_table(rows: &[StepRow]) {
    println!("{:<32} {:<8} {:<8} {}", "Name", "Type", "Runtime", "Flows");
    for row in rows {
        println!(
            "{:<32} {:<8} {:<8} {}",
            row.name,
            row.kind,
            row.runtime,
            row.flows.join(",")
        );
    }
}

fn handle_steps_validate(manifest: Option<PathBuf>) -> anyhow::Result<ExitCode> {
    let path = EnvConfig::resolve_manifest_path(manifest);
    let report = load_manifest(&path)?.validate();
    println!("{}", validation_summary(&report));
    if report.is_ok() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn handle_steps_builtin(compact: bool) -> anyhow::Result<ExitCode> {
    let configs = builtin_step_configs();
    let content = if compact {
        serde_json::to_string(&configs)?
    } else {
        serde_json::to_string_pretty(&configs)?
    };
    println!("{content}");
    Ok(ExitCode::SUCCESS)
}

fn handle_router_render(
    target: RouterTarget,
    manifest: Option<PathBuf>,
    output: Option<PathBuf>,
) -> anyhow::Result<ExitCode> {
    let path = EnvConfig::resolve_manifest_path(manifest);
    let manifest = load_manifest(&path)?;
    let router_dir = router_dir_for(output.as_deref())?;
    let source = generate_router(&manifest, target, &router_dir)?;

    if let Some(output) = output {
        fs::write(&output, source)?;
        println!("Router written to `{}`", output.display());
    } else {
        print!("{source}");
    }
    Ok(ExitCode::SUCCESS)
}
