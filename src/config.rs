//! Configuration loading
//!
//! Optional TOML file, located through `--config` or `CAPITAL_GAINS_CONFIG`.
//! Every key has a default, so an empty file is a valid configuration.

use anyhow::Context;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

use crate::error::{CapitalGainsError, Result};
use crate::tax::TaxPolicy;

pub const CONFIG_ENV_VAR: &str = "CAPITAL_GAINS_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub tax: TaxPolicy,
}

impl Config {
    /// Load from `path`, or return the defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let contents = std::fs::read_to_string(path)
            .map_err(CapitalGainsError::from)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&contents)
            .with_context(|| format!("invalid config file {}", path.display()))?;

        debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)
            .map_err(|e| CapitalGainsError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> std::result::Result<(), CapitalGainsError> {
        if self.tax.exemption_threshold < Decimal::ZERO {
            return Err(CapitalGainsError::Config(format!(
                "exemption_threshold must not be negative (got {})",
                self.tax.exemption_threshold
            )));
        }
        if self.tax.rate < Decimal::ZERO || self.tax.rate > Decimal::ONE {
            return Err(CapitalGainsError::Config(format!(
                "rate must be between 0 and 1 (got {})",
                self.tax.rate
            )));
        }
        Ok(())
    }
}
