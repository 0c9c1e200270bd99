//! Auto-fee ledger core
//!
//! Share/multiplier accounting for a token whose balances decay by a fixed
//! fee every period without touching individual accounts:
//! - accounts hold shares; balances are `shares * multiplier / 1e18`
//! - the multiplier compounds lazily from a period anchor
//! - one scheduled multiplier override may be pending at a time

pub mod address;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod math;
pub mod shares;
pub mod snapshot;
pub mod time_sync;

pub use address::{Address, AddressError};
pub use clock::{MultiplierClock, MultiplierView, OverrideOutcome, PendingOverride, Settlement};
pub use config::{ConfigError, LedgerConfig};
pub use engine::{AutoFeeLedger, InitParams};
pub use error::{LedgerError, Result};
pub use events::LedgerEvent;
pub use math::SCALE;
pub use shares::ShareLedger;
pub use snapshot::{ClockSnapshot, LedgerSnapshot};
pub use time_sync::{ManualTimeSource, SystemTimeSource, TimeSource};

pub use primitive_types::U256;
