use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use capital_gains::cli::{runner, Cli};
use capital_gains::config::Config;

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only results
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let stdout = io::stdout().lock();

    match cli.input {
        Some(path) => {
            info!("Reading operations from: {}", path.display());
            let file = File::open(&path)
                .with_context(|| format!("failed to open input file {}", path.display()))?;
            runner::run(BufReader::new(file), stdout, &config.tax)?;
        }
        None => {
            runner::run(io::stdin().lock(), stdout, &config.tax)?;
        }
    }

    Ok(())
}
