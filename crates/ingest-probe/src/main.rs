//! Ingest probe — entry point.

use std::io::Write;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use ingest_probe::config::{ConfigOverrides, ProbeConfig};
use ingest_probe::payload::Priority;
use ingest_probe::render::{self, OutputMode};

#[derive(Parser)]
#[command(
    name = "ingest-probe",
    about = "Send one request to the video ingest API and report what came back",
    version,
    args_conflicts_with_subcommands = true,
    after_help = "Exit status is 0 only when the endpoint answered 2xx with a JSON body."
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(flatten)]
    probe: ProbeArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct ProbeArgs {
    /// Video URL to submit for ingestion
    video_url: Option<String>,

    /// Ingest endpoint (also reads INGEST_PROBE_ENDPOINT)
    #[arg(long)]
    endpoint: Option<String>,

    /// Bearer token (also reads INGEST_PROBE_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Priority: an integer or "high" (= 2)
    #[arg(long)]
    priority: Option<Priority>,

    /// Request timeout in milliseconds (also reads INGEST_PROBE_TIMEOUT_MS)
    #[arg(long)]
    timeout: Option<u64>,

    /// Skip TLS certificate verification. Local/self-signed endpoints only.
    #[arg(long)]
    insecure: bool,
}

impl ProbeArgs {
    fn into_overrides(self) -> ConfigOverrides {
        ConfigOverrides {
            endpoint: self.endpoint,
            token: self.token,
            video_url: self.video_url.unwrap_or_default(),
            priority: self.priority,
            timeout_ms: self.timeout,
            insecure: self.insecure,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved configuration (token redacted) without sending
    Config(ProbeArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish)
        shell: Shell,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { cli.log_level.as_str() };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let result = match cli.command {
        None => send_probe(cli.probe, mode).await,
        Some(Commands::Config(args)) => show_config(args),
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "ingest-probe", &mut std::io::stdout());
            Ok(0)
        }
    };

    match result {
        Ok(0) => Ok(()),
        Ok(code) => std::process::exit(code),
        Err(e) => {
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "ok": false,
                        "kind": "setup",
                        "message": format!("{e:#}"),
                    }))?
                );
            } else if !cli.quiet {
                eprintln!("Error: {e:#}");
            }
            std::process::exit(1);
        }
    }
}

/// Send the probe and render its outcome. Returns the process exit code.
async fn send_probe(args: ProbeArgs, mode: OutputMode) -> Result<i32> {
    if args.video_url.is_none() {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "the VIDEO_URL argument is required",
            )
            .exit();
    }
    let config = ProbeConfig::resolve(args.into_overrides())?;
    let outcome = ingest_probe::probe::run(config).await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render::render(&outcome, mode, &mut out).context("failed to write outcome")?;
    out.flush()?;

    Ok(outcome.exit_code())
}

fn show_config(args: ProbeArgs) -> Result<i32> {
    let config = ProbeConfig::resolve(args.into_overrides())?;
    println!("{}", serde_json::to_string_pretty(&config.to_redacted_json())?);
    Ok(0)
}
