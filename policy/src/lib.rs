//! Auto-fee token policy layer
//!
//! Wraps the core ledger with the checks a deployed token needs:
//! - role capabilities (owner, minter, burner, pauser, multiplier updater)
//! - a global pause switch
//! - sanctions screening through an external list
//! - ERC-20 style allowances for `transfer_from` / `transfer_shares_from`

pub mod allowance;
pub mod config;
pub mod error;
pub mod guard;
pub mod roles;
pub mod token;

pub use allowance::Allowances;
pub use config::{TokenConfig, TokenMetadata, DECIMALS};
pub use error::{PolicyError, Result};
pub use guard::{PauseSwitch, SanctionsList, StaticSanctionsList};
pub use roles::{AccessControl, Role};
pub use token::AutoFeeToken;
