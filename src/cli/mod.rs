use clap::Parser;
use std::path::PathBuf;

use crate::config::CONFIG_ENV_VAR;

pub mod runner;

#[derive(Parser, Debug)]
#[command(name = "capital-gains")]
#[command(
    version,
    about = "Capital gains tax calculator for stock operations"
)]
#[command(
    long_about = "Reads one JSON array of buy/sell operations per line and writes one JSON array of taxes per line. Processing stops at the first empty line or at end of input."
)]
pub struct Cli {
    /// Read operations from this file instead of standard input
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// TOML file with tax policy overrides
    #[arg(short, long, env = CONFIG_ENV_VAR)]
    pub config: Option<PathBuf>,
}
