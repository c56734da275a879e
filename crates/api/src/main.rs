//! VitalScope command-line interface
//!
//! Prints JSON on stdout; logs go to stderr.

use anyhow::Context;
use clap::Parser;
use vitalscope_lib::utils::logging::{init_tracing, LogFormat};
use vitalscope_lib::{execute, AppContext, Command};

#[derive(Parser, Debug)]
#[command(name = "vitalscope")]
#[command(version, about = "Collect and analyze web vitals, UX metrics and survey responses")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // .env must be loaded before logging reads RUST_LOG and VITALSCOPE_LOG_FORMAT
    let dotenv = dotenvy::dotenv();
    init_tracing(LogFormat::from_env()).context("failed to initialise logging")?;

    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!(error = %err, "could not load .env file"),
    }

    let context = AppContext::new().context("failed to initialise application context")?;
    let result = execute(&context, cli.command).await;
    context.shutdown().await?;

    let output = result?;
    let rendered = serde_json::to_string_pretty(&output).context("failed to render output")?;
    println!("{rendered}");
    Ok(())
}
