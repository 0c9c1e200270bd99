//! Token configuration (TOML)
//!
//! ```toml
//! [token]
//! name = "Auto Fee Dollar"
//! symbol = "AFD"
//!
//! [ledger]
//! period_length = 86400
//! initial_anchor_time = 1700000000
//! fee_per_period = 0
//! ```

use autofee_core::{ConfigError, LedgerConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Decimals are fixed: amounts share the multiplier's 1e18 scale
pub const DECIMALS: u8 = 18;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    pub token: TokenMetadata,
    pub ledger: LedgerConfig,
}

impl TokenConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: TokenConfig = toml::from_str(contents)?;
        config.ledger.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}
