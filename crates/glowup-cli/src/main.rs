use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use glowup_analysis::metrics::{engagement_report, TimelinePost};
use glowup_analysis::{analyze, AnalysisRequest, GeminiClient, GeminiConfig};

#[derive(Debug, Parser)]
#[command(name = "glowup-cli")]
#[command(about = "Then-vs-now post analysis over the Gemini API")]
struct Cli {
    /// Read the JSON payload from this file instead of stdin.
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    /// Fallback Gemini API key when the payload does not carry one.
    #[arg(long, env = "GEMINI_API_KEY", global = true, hide_env_values = true)]
    gemini_api_key: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build the then-vs-now report from a `{"then": [..], "now": [..]}` payload.
    Analyze,
    /// Summarize engagement totals and growth for a raw timeline dump.
    Engagement,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("{}", serde_json::json!({ "error": format!("{e:#}") }));
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout stays reserved for the report JSON.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let raw = read_payload(cli.input.as_deref())?;
    match cli.command.unwrap_or(Commands::Analyze) {
        Commands::Analyze => run_analyze(&raw, cli.gemini_api_key).await,
        Commands::Engagement => run_engagement(&raw),
    }
}

fn read_payload(input: Option<&Path>) -> anyhow::Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read stdin")?;
            Ok(raw)
        }
    }
}

/// Run the six-call analysis and print the report to stdout.
///
/// The payload key takes precedence; `fallback_key` (flag or `GEMINI_API_KEY`)
/// is only used when the payload does not carry one. A missing key is not an
/// error here: the report comes back with every field error-tagged instead.
///
/// # Errors
///
/// Returns an error if the payload is not valid JSON, the endpoint
/// configuration is invalid, or the HTTP client cannot be constructed.
async fn run_analyze(raw: &str, fallback_key: Option<String>) -> anyhow::Result<()> {
    let mut request: AnalysisRequest =
        serde_json::from_str(raw).map_err(|e| anyhow::anyhow!("Invalid JSON input: {e}"))?;
    if request.gemini_api_key.is_none() {
        request.gemini_api_key = fallback_key;
    }
    tracing::debug!(
        then = request.then.len(),
        now = request.now.len(),
        has_key = request.gemini_api_key.is_some(),
        "analysis payload parsed"
    );

    let config = GeminiConfig::from_env()?;
    let client = GeminiClient::new(&config)?;
    let report = analyze(&client, &request).await;

    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}

/// Parse a timeline dump, split it into halves, and print the engagement
/// comparison to stdout.
///
/// # Errors
///
/// Returns an error if the payload is not a valid JSON array of posts.
fn run_engagement(raw: &str) -> anyhow::Result<()> {
    let posts: Vec<TimelinePost> =
        serde_json::from_str(raw).map_err(|e| anyhow::anyhow!("Invalid JSON input: {e}"))?;
    let report = engagement_report(posts);
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}
