//! Spending allowances, in underlying-token units

use autofee_core::{Address, U256};
use std::collections::HashMap;

use crate::error::{PolicyError, Result};

#[derive(Debug, Clone, Default)]
pub struct Allowances {
    granted: HashMap<(Address, Address), U256>,
}

impl Allowances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> U256 {
        self.granted
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or_default()
    }

    pub fn approve(&mut self, owner: Address, spender: Address, amount: U256) {
        if amount.is_zero() {
            self.granted.remove(&(owner, spender));
        } else {
            self.granted.insert((owner, spender), amount);
        }
    }

    pub fn increase(&mut self, owner: Address, spender: Address, added: U256) -> U256 {
        let current = self.allowance(&owner, &spender);
        let updated = current.saturating_add(added);
        self.approve(owner, spender, updated);
        updated
    }

    pub fn decrease(&mut self, owner: Address, spender: Address, removed: U256) -> Result<U256> {
        let current = self.allowance(&owner, &spender);
        let updated = current
            .checked_sub(removed)
            .ok_or(PolicyError::AllowanceUnderflow {
                decrease: removed,
                current,
            })?;
        self.approve(owner, spender, updated);
        Ok(updated)
    }

    /// Check `spender` may move `amount` of `owner`'s tokens
    pub fn check(&self, owner: &Address, spender: &Address, amount: U256) -> Result<()> {
        let available = self.allowance(owner, spender);
        if available < amount {
            return Err(PolicyError::InsufficientAllowance {
                requested: amount,
                available,
            });
        }
        Ok(())
    }

    /// Deduct `amount`; an allowance of `U256::MAX` is never decremented
    pub fn spend(&mut self, owner: &Address, spender: &Address, amount: U256) -> Result<()> {
        self.check(owner, spender, amount)?;
        let available = self.allowance(owner, spender);
        if available != U256::MAX {
            self.approve(*owner, *spender, available - amount);
        }
        Ok(())
    }
}
