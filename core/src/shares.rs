//! Share bookkeeping
//!
//! Holds the account -> shares mapping and the aggregate counter. No
//! rounding happens here; all values are exact share units.

use primitive_types::U256;
use std::collections::BTreeMap;

use crate::address::Address;
use crate::error::{LedgerError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareLedger {
    shares: BTreeMap<Address, U256>,
    total_shares: U256,
}

impl ShareLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from raw balances, checking the aggregate matches
    pub fn from_parts(shares: BTreeMap<Address, U256>, total_shares: U256) -> Result<Self> {
        if shares.iter().any(|(account, held)| account.is_zero() && !held.is_zero()) {
            return Err(LedgerError::CorruptSnapshot(
                "null account holds shares".to_string(),
            ));
        }
        let mut ledger = Self {
            shares,
            total_shares,
        };
        if let Err(err) = ledger.check_solvency() {
            return Err(LedgerError::CorruptSnapshot(err.to_string()));
        }
        ledger.shares.retain(|_, held| !held.is_zero());
        Ok(ledger)
    }

    pub fn shares_of(&self, account: &Address) -> U256 {
        self.shares.get(account).copied().unwrap_or_default()
    }

    pub fn total_shares(&self) -> U256 {
        self.total_shares
    }

    /// Accounts currently holding a non-zero balance
    pub fn holders(&self) -> impl Iterator<Item = (&Address, &U256)> {
        self.shares.iter()
    }

    pub fn holder_count(&self) -> usize {
        self.shares.len()
    }

    pub fn credit(&mut self, account: &Address, delta: U256) -> Result<()> {
        self.check_credit(account, delta)?;
        self.apply_credit(account, delta);
        Ok(())
    }

    pub fn debit(&mut self, account: &Address, delta: U256) -> Result<()> {
        self.check_debit(account, delta)?;
        self.apply_debit(account, delta);
        Ok(())
    }

    /// Debit then credit; either both happen or neither does
    pub fn move_shares(&mut self, from: &Address, to: &Address, delta: U256) -> Result<()> {
        self.check_debit(from, delta)?;
        if to.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        // recipient balance stays bounded by total_shares, so no overflow
        self.apply_debit(from, delta);
        self.apply_credit(to, delta);
        Ok(())
    }

    /// Validate a credit without applying it
    pub fn check_credit(&self, account: &Address, delta: U256) -> Result<()> {
        if account.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        self.total_shares
            .checked_add(delta)
            .ok_or(LedgerError::Overflow)?;
        Ok(())
    }

    /// Validate a debit without applying it
    pub fn check_debit(&self, account: &Address, delta: U256) -> Result<()> {
        if account.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        let available = self.shares_of(account);
        if available < delta {
            return Err(LedgerError::InsufficientShares {
                requested: delta,
                available,
            });
        }
        Ok(())
    }

    fn apply_credit(&mut self, account: &Address, delta: U256) {
        if delta.is_zero() {
            return;
        }
        *self.shares.entry(*account).or_default() += delta;
        self.total_shares += delta;
    }

    fn apply_debit(&mut self, account: &Address, delta: U256) {
        if delta.is_zero() {
            return;
        }
        if let Some(held) = self.shares.get_mut(account) {
            *held -= delta;
            if held.is_zero() {
                self.shares.remove(account);
            }
        }
        self.total_shares -= delta;
    }

    /// Sum of every account balance (for invariant checks)
    pub fn sum_of_balances(&self) -> Result<U256> {
        self.shares.values().try_fold(U256::zero(), |acc, held| {
            acc.checked_add(*held).ok_or(LedgerError::Overflow)
        })
    }

    /// `total_shares` must equal the sum of all balances
    pub fn check_solvency(&self) -> Result<()> {
        let sum_of_balances = self.sum_of_balances()?;
        if sum_of_balances != self.total_shares {
            return Err(LedgerError::Insolvent {
                total_shares: self.total_shares,
                sum_of_balances,
            });
        }
        Ok(())
    }
}
