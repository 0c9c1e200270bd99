//! Ledger configuration (TOML)
//!
//! ```toml
//! [ledger]
//! period_length = 86400
//! initial_anchor_time = 1700000000
//! fee_per_period = 1897231348405366   # 1e18-scaled fraction per period
//! ```

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::clock;
use crate::engine::InitParams;
use crate::error::LedgerError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] LedgerError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Seconds per compounding period
    pub period_length: u64,
    /// Unix seconds the first period starts from
    pub initial_anchor_time: u64,
    /// Fraction of the multiplier removed each period, 1e18-scaled
    #[serde(default)]
    pub fee_per_period: u64,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    ledger: LedgerConfig,
}

impl LedgerConfig {
    /// Parse the `[ledger]` table of a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(contents)?;
        file.ledger.validate()?;
        Ok(file.ledger)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        clock::validate_period_length(self.period_length)?;
        clock::validate_anchor(self.initial_anchor_time)?;
        clock::validate_fee(U256::from(self.fee_per_period))?;
        Ok(())
    }

    pub fn init_params(&self) -> InitParams {
        InitParams {
            period_length: self.period_length,
            initial_anchor_time: self.initial_anchor_time,
            fee_per_period: U256::from(self.fee_per_period),
        }
    }
}
