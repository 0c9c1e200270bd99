//! Policy error types

use autofee_core::{Address, ConfigError, LedgerError, U256};
use thiserror::Error;

use crate::roles::Role;

#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Account {account} is missing role {role:?}")]
    MissingRole { account: Address, role: Role },

    #[error("Token is paused")]
    Paused,

    #[error("Account is sanctioned: {0}")]
    Sanctioned(Address),

    #[error("Insufficient allowance: requested {requested}, available {available}")]
    InsufficientAllowance { requested: U256, available: U256 },

    #[error("Allowance underflow: decrease {decrease}, current {current}")]
    AllowanceUnderflow { decrease: U256, current: U256 },

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, PolicyError>;
