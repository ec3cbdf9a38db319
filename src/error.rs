//! Error handling for capital-gains
//!
//! Errors come from the edges (decoding input lines, reading files, loading
//! configuration) and from amounts too large for `Decimal` arithmetic.

use thiserror::Error;

/// Error types raised around the tax engine
#[derive(Error, Debug)]
pub enum CapitalGainsError {
    #[error("malformed input on line {line}: {source}")]
    Decode {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("arithmetic overflow computing {0}")]
    Overflow(&'static str),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error")]
    Io(#[from] std::io::Error),
}

/// Result type alias used by the application layer
pub type Result<T> = anyhow::Result<T>;
