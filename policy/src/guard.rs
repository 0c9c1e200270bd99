//! Pause switch and sanctions screening

use autofee_core::Address;
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{PolicyError, Result};

/// External sanctions oracle consulted before value moves
pub trait SanctionsList {
    fn is_sanctioned(&self, account: &Address) -> bool;
}

impl<S: SanctionsList + ?Sized> SanctionsList for Arc<S> {
    fn is_sanctioned(&self, account: &Address) -> bool {
        (**self).is_sanctioned(account)
    }
}

/// In-memory sanctions list
#[derive(Debug, Clone, Default)]
pub struct StaticSanctionsList {
    blocked: HashSet<Address>,
}

impl StaticSanctionsList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, account: Address) {
        self.blocked.insert(account);
    }

    pub fn remove(&mut self, account: &Address) {
        self.blocked.remove(account);
    }
}

impl FromIterator<Address> for StaticSanctionsList {
    fn from_iter<I: IntoIterator<Item = Address>>(iter: I) -> Self {
        Self {
            blocked: iter.into_iter().collect(),
        }
    }
}

impl SanctionsList for StaticSanctionsList {
    fn is_sanctioned(&self, account: &Address) -> bool {
        self.blocked.contains(account)
    }
}

/// Fail with `Sanctioned` for the first listed account
pub fn screen<S: SanctionsList + ?Sized>(list: &S, accounts: &[&Address]) -> Result<()> {
    for account in accounts {
        if list.is_sanctioned(account) {
            log::warn!("rejected: {} is sanctioned", account);
            return Err(PolicyError::Sanctioned(**account));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PauseSwitch {
    paused: bool,
}

impl PauseSwitch {
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn unpause(&mut self) {
        self.paused = false;
    }

    pub fn ensure_not_paused(&self) -> Result<()> {
        if self.paused {
            return Err(PolicyError::Paused);
        }
        Ok(())
    }
}
