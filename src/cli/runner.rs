use anyhow::Context;
use std::io::{BufRead, Write};
use tracing::{debug, info};

use crate::error::{CapitalGainsError, Result};
use crate::models::Operation;
use crate::tax::{process_operations_with_policy, TaxPolicy};

/// Process newline-delimited operation lists until EOF or the first blank line.
///
/// Each line is independent: it gets a fresh position and its own output
/// line. A line that does not decode aborts the run with nothing written for
/// it. Returns the number of lines processed.
pub fn run<R: BufRead, W: Write>(reader: R, mut writer: W, policy: &TaxPolicy) -> Result<usize> {
    let mut processed = 0;

    for (index, line) in reader.lines().enumerate() {
        let line = line
            .map_err(CapitalGainsError::from)
            .context("failed to read input")?;
        if line.trim().is_empty() {
            debug!("Blank line {}, stopping", index + 1);
            break;
        }

        let operations: Vec<Operation> = serde_json::from_str(&line)
            .map_err(|source| CapitalGainsError::Decode { line: index + 1, source })?;
        let results = process_operations_with_policy(&operations, policy)
            .with_context(|| format!("failed to compute taxes for line {}", index + 1))?;
        debug!("Line {}: {} operations", index + 1, operations.len());

        let encoded = serde_json::to_string(&results).context("failed to encode results")?;
        writeln!(writer, "{}", encoded).map_err(CapitalGainsError::from)?;
        writer.flush().map_err(CapitalGainsError::from)?;
        processed += 1;
    }

    info!("Processed {} line(s)", processed);
    Ok(processed)
}
