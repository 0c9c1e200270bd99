//! Role-based capabilities

use autofee_core::Address;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::{PolicyError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Configuration and role administration
    Owner,
    Minter,
    Burner,
    Pauser,
    /// Multiplier overrides and absolute multiplier updates
    MultiplierUpdater,
}

#[derive(Debug, Clone, Default)]
pub struct AccessControl {
    members: HashMap<Role, HashSet<Address>>,
}

impl AccessControl {
    /// Access control with `owner` holding the Owner role
    pub fn new(owner: Address) -> Self {
        let mut access = Self::default();
        access.insert(Role::Owner, owner);
        access
    }

    pub fn has_role(&self, role: Role, account: &Address) -> bool {
        self.members
            .get(&role)
            .map(|set| set.contains(account))
            .unwrap_or(false)
    }

    pub fn require(&self, role: Role, account: &Address) -> Result<()> {
        if !self.has_role(role, account) {
            log::warn!("{} rejected: missing role {:?}", account, role);
            return Err(PolicyError::MissingRole {
                account: *account,
                role,
            });
        }
        Ok(())
    }

    /// Grant `role` to `account`; `caller` must be an Owner
    pub fn grant_role(&mut self, caller: &Address, role: Role, account: Address) -> Result<bool> {
        self.require(Role::Owner, caller)?;
        let added = self.insert(role, account);
        if added {
            log::info!("granted {:?} to {}", role, account);
        }
        Ok(added)
    }

    /// Revoke `role` from `account`; `caller` must be an Owner
    pub fn revoke_role(&mut self, caller: &Address, role: Role, account: &Address) -> Result<bool> {
        self.require(Role::Owner, caller)?;
        let removed = self
            .members
            .get_mut(&role)
            .map(|set| set.remove(account))
            .unwrap_or(false);
        if removed {
            log::info!("revoked {:?} from {}", role, account);
        }
        Ok(removed)
    }

    pub fn members(&self, role: Role) -> Vec<Address> {
        let mut members: Vec<_> = self
            .members
            .get(&role)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        members.sort();
        members
    }

    fn insert(&mut self, role: Role, account: Address) -> bool {
        self.members.entry(role).or_default().insert(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_grants_and_revokes() {
        let owner = Address::from_low_u64(1);
        let minter = Address::from_low_u64(2);
        let mut access = AccessControl::new(owner);

        assert!(access.grant_role(&owner, Role::Minter, minter).unwrap());
        assert!(!access.grant_role(&owner, Role::Minter, minter).unwrap());
        assert!(access.has_role(Role::Minter, &minter));
        assert_eq!(access.members(Role::Minter), vec![minter]);

        assert!(access.revoke_role(&owner, Role::Minter, &minter).unwrap());
        assert!(!access.has_role(Role::Minter, &minter));
    }

    #[test]
    fn test_non_owner_cannot_grant() {
        let owner = Address::from_low_u64(1);
        let other = Address::from_low_u64(2);
        let mut access = AccessControl::new(owner);
        let err = access.grant_role(&other, Role::Minter, other).unwrap_err();
        assert!(matches!(
            err,
            PolicyError::MissingRole {
                role: Role::Owner,
                ..
            }
        ));
    }
}
