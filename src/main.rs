// Staffcall - function-calling chat client
// Main entry point

use anyhow::Result;
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use staffcall::app::build_session;
use staffcall::cli::{run_batch, SAMPLE_PROMPTS};
use staffcall::config::load_config;
use staffcall::directory::LookupPolicy;
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "staffcall")]
#[command(about = "Ask a chat model about employees; it calls a directory lookup when needed", version)]
struct Args {
    /// Prompts to send, one turn each (default: the built-in sample prompts)
    prompts: Vec<String>,

    /// Where employee lookups are answered from
    #[arg(long, value_enum)]
    lookup: Option<LookupPolicy>,

    /// Model identifier (overrides config and STAFFCALL_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Path to a config.toml (default: ~/.staffcall/config.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    init_tracing();

    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every turn succeeded
async fn run(args: Args) -> Result<bool> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(lookup) = args.lookup {
        config.lookup = Some(lookup);
    }
    if let Some(model) = args.model {
        config.model.model = model;
    }

    let session = build_session(&config)?;

    let prompts: Vec<String> = if args.prompts.is_empty() {
        println!("간단한 Function Calling Test\n");
        SAMPLE_PROMPTS.iter().map(|p| p.to_string()).collect()
    } else {
        args.prompts
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let report = run_batch(&session, &prompts, &mut out).await?;
    out.flush()?;

    if !report.is_success() {
        eprintln!(
            "\n{}/{} turns failed",
            report.failed.len(),
            report.total()
        );
    }

    Ok(report.is_success())
}

fn init_tracing() {
    let show_debug = std::env::var("STAFFCALL_DEBUG")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false);

    // Default: WARN so the transcript on stdout stays readable; RUST_LOG wins
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(if show_debug { "debug" } else { "warn" })
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    // Bridge log crate → tracing (for dependencies using log crate)
    tracing_log::LogTracer::init().ok();
}
