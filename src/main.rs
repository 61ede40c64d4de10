mod render;

use clap::{Args, Parser, Subcommand};
use script_review::config::AppConfig;
use script_review::error::AppError;
use script_review::review::{EvaluationReport, ScriptReviewService, ScriptSubmission};
use script_review::telemetry;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const SAMPLE_SUBMISSION: &str = include_str!("../demos/sample-script.json");
const OUTPUT_SUFFIX: &str = "-output.json";

#[derive(Parser, Debug)]
#[command(
    name = "script-review",
    about = "Score pharmaceutical influencer scripts for comfort, empathy and humor, then refine them",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a script submission stored as JSON
    Evaluate(EvaluateArgs),
    /// Evaluate the bundled DermaFlow sample script
    Demo(DemoArgs),
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    /// Path to the submission JSON (product, rawScript, rules)
    path: PathBuf,
    /// Where to write the report (defaults to `<input>-output.json`)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Skip writing the report file
    #[arg(long)]
    no_write: bool,
    /// Force heuristic scoring even when an API key is configured
    #[arg(long)]
    heuristic: bool,
    /// Override the configured chat completions model
    #[arg(long)]
    model: Option<String>,
    /// Print the report as JSON instead of the console layout
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct DemoArgs {
    /// Force heuristic scoring even when an API key is configured
    #[arg(long)]
    heuristic: bool,
    /// Print the report as JSON instead of the console layout
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Evaluate(args) => run_evaluate(config, args).await,
        Command::Demo(args) => run_demo(config, args).await,
    }
}

fn build_service(
    mut config: AppConfig,
    heuristic: bool,
    model: Option<String>,
) -> Result<ScriptReviewService, AppError> {
    if heuristic {
        config.generation = None;
    }
    if let Some(model) = model {
        if let Some(generation) = config.generation.as_mut() {
            generation.model = model.clone();
        }
        config.defaults.model = model;
    }

    let service = ScriptReviewService::from_config(&config)?;
    info!(
        ?config.environment,
        mode = service.mode().label(),
        model = %config.defaults.model,
        "script reviewer ready"
    );
    Ok(service)
}

async fn run_evaluate(config: AppConfig, args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        path,
        output,
        no_write,
        heuristic,
        model,
        json,
    } = args;

    let raw = fs::read_to_string(&path)?;
    let submission: ScriptSubmission = serde_json::from_str(&raw)?;
    let service = build_service(config, heuristic, model)?;

    if !json {
        print!("{}", render::render_banner(service.mode().label()));
    }
    let report = service.evaluate_script(submission).await?;

    let source = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    print_report(&report, source.as_deref(), json)?;

    if !no_write {
        let output = output.unwrap_or_else(|| default_output_path(&path));
        fs::write(&output, serde_json::to_string_pretty(&report)?)?;
        info!(path = %output.display(), "report written");
        if !json {
            println!("\nResults saved to: {}", output.display());
        }
    }

    Ok(())
}

async fn run_demo(config: AppConfig, args: DemoArgs) -> Result<(), AppError> {
    let submission: ScriptSubmission = serde_json::from_str(SAMPLE_SUBMISSION)?;
    let service = build_service(config, args.heuristic, None)?;

    if !args.json {
        print!("{}", render::render_banner(service.mode().label()));
    }
    let report = service.evaluate_script(submission).await?;
    print_report(&report, Some("sample-script.json"), args.json)
}

fn print_report(report: &EvaluationReport, source: Option<&str>, json: bool) -> Result<(), AppError> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", render::render_report(report, source));
    }
    Ok(())
}

/// `script.json` becomes `script-output.json` next to the input; other names
/// get the suffix appended.
fn default_output_path(input: &Path) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let output_name = match file_name.strip_suffix(".json") {
        Some(stem) => format!("{stem}{OUTPUT_SUFFIX}"),
        None => format!("{file_name}{OUTPUT_SUFFIX}"),
    };
    input.with_file_name(output_name)
}
