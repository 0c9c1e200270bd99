//! Ledger error types

use primitive_types::U256;
use thiserror::Error;

/// Errors surfaced by the share/multiplier engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Ledger not initialized")]
    NotInitialized,

    #[error("Ledger already initialized")]
    AlreadyInitialized,

    #[error("Null account not allowed here")]
    ZeroAddress,

    #[error("Insufficient shares: requested {requested}, available {available}")]
    InsufficientShares { requested: U256, available: U256 },

    #[error("Invalid multiplier: {0}")]
    InvalidMultiplier(String),

    #[error("Stale multiplier: expected {expected}, current {current}")]
    StaleMultiplier { expected: U256, current: U256 },

    #[error("Configuration locked: override pending until {activation_time}")]
    ConfigurationLocked { activation_time: u64 },

    #[error("Invalid fee per period: {0}")]
    InvalidFee(String),

    #[error("Invalid period length: {0}")]
    InvalidPeriodLength(u64),

    #[error("Invalid anchor time: {0}")]
    InvalidAnchor(u64),

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Insolvent ledger: total shares {total_shares}, sum of balances {sum_of_balances}")]
    Insolvent {
        total_shares: U256,
        sum_of_balances: U256,
    },

    #[error("Corrupt snapshot: {0}")]
    CorruptSnapshot(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
