//! Binary crate for the `weather-lookup` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - The interactive lookup prompt
//! - Printing rendered records

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
