//! Ledger snapshots
//!
//! Flat, serializable copy of the whole ledger state. The clock is stored in
//! its two-slot form (pending factor + activation time, with SCALE / 0
//! meaning "nothing pending") so the persisted layout matches the storage
//! fields one-to-one.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::address::Address;
use crate::clock::{MultiplierClock, PendingOverride};
use crate::error::{LedgerError, Result};
use crate::shares::ShareLedger;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockSnapshot {
    pub last_multiplier: U256,
    pub last_period_anchor: u64,
    pub period_length: u64,
    pub fee_per_period: U256,
    pub pending_multiplier_update: U256,
    pub pending_activation_time: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: u32,
    pub clock: Option<ClockSnapshot>,
    pub total_shares: U256,
    pub shares: BTreeMap<Address, U256>,
}

impl From<&MultiplierClock> for ClockSnapshot {
    fn from(clock: &MultiplierClock) -> Self {
        Self {
            last_multiplier: clock.last_multiplier(),
            last_period_anchor: clock.last_period_anchor(),
            period_length: clock.period_length(),
            fee_per_period: clock.fee_per_period(),
            pending_multiplier_update: clock.pending_multiplier_update(),
            pending_activation_time: clock.pending_activation_time(),
        }
    }
}

impl ClockSnapshot {
    pub fn restore(&self) -> Result<MultiplierClock> {
        let pending = match self.pending_activation_time {
            0 => None,
            activation_time => Some(PendingOverride {
                relative: self.pending_multiplier_update,
                activation_time,
            }),
        };
        MultiplierClock::from_parts(
            self.last_multiplier,
            self.last_period_anchor,
            self.period_length,
            self.fee_per_period,
            pending,
        )
    }
}

impl LedgerSnapshot {
    pub fn capture(clock: Option<&MultiplierClock>, shares: &ShareLedger) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            clock: clock.map(ClockSnapshot::from),
            total_shares: shares.total_shares(),
            shares: shares
                .holders()
                .map(|(account, held)| (*account, *held))
                .collect(),
        }
    }

    pub fn restore(self) -> Result<(Option<MultiplierClock>, ShareLedger)> {
        if self.version != SNAPSHOT_VERSION {
            return Err(LedgerError::CorruptSnapshot(format!(
                "unsupported snapshot version {}",
                self.version
            )));
        }
        let clock = self.clock.as_ref().map(ClockSnapshot::restore).transpose()?;
        let shares = ShareLedger::from_parts(self.shares, self.total_shares)?;
        Ok((clock, shares))
    }
}
