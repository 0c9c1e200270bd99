//! Policy-wrapped token
//!
//! `AutoFeeToken` owns the core ledger and runs every entry point through
//! the same sequence of checks before handing off:
//! capability -> pause -> sanctions -> allowance -> ledger.
//! Time comes from the injected [`TimeSource`].

use autofee_core::{
    Address, AutoFeeLedger, LedgerEvent, MultiplierView, OverrideOutcome, TimeSource, U256,
};

use std::path::Path;

use crate::allowance::Allowances;
use crate::config::{TokenConfig, TokenMetadata, DECIMALS};
use crate::error::Result;
use crate::guard::{screen, PauseSwitch, SanctionsList};
use crate::roles::{AccessControl, Role};

pub struct AutoFeeToken<T: TimeSource, S: SanctionsList> {
    metadata: TokenMetadata,
    ledger: AutoFeeLedger,
    access: AccessControl,
    pause: PauseSwitch,
    allowances: Allowances,
    sanctions: S,
    time: T,
}

impl<T: TimeSource, S: SanctionsList> AutoFeeToken<T, S> {
    /// Initialize a fresh ledger from `config`; `owner` receives the Owner role
    pub fn new(config: TokenConfig, owner: Address, time: T, sanctions: S) -> Result<Self> {
        let ledger = AutoFeeLedger::with_params(config.ledger.init_params())?;
        Ok(Self::from_ledger(config.token, ledger, owner, time, sanctions))
    }

    /// Load a TOML token config from `path` and initialize from it
    pub fn from_config_file<P: AsRef<Path>>(
        path: P,
        owner: Address,
        time: T,
        sanctions: S,
    ) -> Result<Self> {
        let config = TokenConfig::from_file(path)?;
        log::info!(
            "loaded token config {} ({})",
            config.token.name,
            config.token.symbol
        );
        Self::new(config, owner, time, sanctions)
    }

    /// Wrap an existing (e.g. restored) ledger
    pub fn from_ledger(
        metadata: TokenMetadata,
        ledger: AutoFeeLedger,
        owner: Address,
        time: T,
        sanctions: S,
    ) -> Self {
        Self {
            metadata,
            ledger,
            access: AccessControl::new(owner),
            pause: PauseSwitch::default(),
            allowances: Allowances::new(),
            sanctions,
            time,
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    pub fn decimals(&self) -> u8 {
        DECIMALS
    }

    pub fn ledger(&self) -> &AutoFeeLedger {
        &self.ledger
    }

    pub fn time_source(&self) -> &T {
        &self.time
    }

    pub fn take_events(&mut self) -> Vec<LedgerEvent> {
        self.ledger.take_events()
    }

    // ------------------------------------------------------------------
    // Roles and pause
    // ------------------------------------------------------------------

    pub fn has_role(&self, role: Role, account: &Address) -> bool {
        self.access.has_role(role, account)
    }

    pub fn grant_role(&mut self, caller: &Address, role: Role, account: Address) -> Result<bool> {
        self.access.grant_role(caller, role, account)
    }

    pub fn revoke_role(&mut self, caller: &Address, role: Role, account: &Address) -> Result<bool> {
        self.access.revoke_role(caller, role, account)
    }

    pub fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    pub fn pause(&mut self, caller: &Address) -> Result<()> {
        self.access.require(Role::Pauser, caller)?;
        self.pause.pause();
        log::info!("token paused by {}", caller);
        Ok(())
    }

    pub fn unpause(&mut self, caller: &Address) -> Result<()> {
        self.access.require(Role::Pauser, caller)?;
        self.pause.unpause();
        log::info!("token unpaused by {}", caller);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Allowances
    // ------------------------------------------------------------------

    pub fn allowance(&self, owner: &Address, spender: &Address) -> U256 {
        self.allowances.allowance(owner, spender)
    }

    pub fn approve(&mut self, caller: &Address, spender: Address, amount: U256) -> Result<()> {
        self.pause.ensure_not_paused()?;
        screen(&self.sanctions, &[caller, &spender])?;
        self.allowances.approve(*caller, spender, amount);
        Ok(())
    }

    pub fn increase_allowance(&mut self, caller: &Address, spender: Address, added: U256) -> Result<U256> {
        self.pause.ensure_not_paused()?;
        screen(&self.sanctions, &[caller, &spender])?;
        Ok(self.allowances.increase(*caller, spender, added))
    }

    pub fn decrease_allowance(&mut self, caller: &Address, spender: Address, removed: U256) -> Result<U256> {
        self.pause.ensure_not_paused()?;
        screen(&self.sanctions, &[caller, &spender])?;
        self.allowances.decrease(*caller, spender, removed)
    }

    // ------------------------------------------------------------------
    // Value movement
    // ------------------------------------------------------------------

    pub fn transfer(&mut self, caller: &Address, to: &Address, amount: U256) -> Result<U256> {
        self.pause.ensure_not_paused()?;
        screen(&self.sanctions, &[caller, to])?;
        let now = self.time.now();
        Ok(self.ledger.transfer(caller, to, amount, now)?)
    }

    pub fn transfer_from(
        &mut self,
        caller: &Address,
        from: &Address,
        to: &Address,
        amount: U256,
    ) -> Result<U256> {
        self.pause.ensure_not_paused()?;
        screen(&self.sanctions, &[caller, from, to])?;
        self.allowances.check(from, caller, amount)?;
        let now = self.time.now();
        let shares = self.ledger.transfer(from, to, amount, now)?;
        self.allowances.spend(from, caller, amount)?;
        Ok(shares)
    }

    pub fn transfer_shares(&mut self, caller: &Address, to: &Address, shares: U256) -> Result<U256> {
        self.pause.ensure_not_paused()?;
        screen(&self.sanctions, &[caller, to])?;
        let now = self.time.now();
        Ok(self.ledger.transfer_shares(caller, to, shares, now)?)
    }

    /// Allowance is charged the shares' underlying value at the settled multiplier
    pub fn transfer_shares_from(
        &mut self,
        caller: &Address,
        from: &Address,
        to: &Address,
        shares: U256,
    ) -> Result<U256> {
        self.pause.ensure_not_paused()?;
        screen(&self.sanctions, &[caller, from, to])?;
        let now = self.time.now();
        let amount = self.ledger.underlying_amount_by_shares(shares, now)?;
        self.allowances.check(from, caller, amount)?;
        let amount = self.ledger.transfer_shares(from, to, shares, now)?;
        self.allowances.spend(from, caller, amount)?;
        Ok(amount)
    }

    pub fn mint(&mut self, caller: &Address, to: &Address, amount: U256) -> Result<U256> {
        self.access.require(Role::Minter, caller)?;
        self.pause.ensure_not_paused()?;
        screen(&self.sanctions, &[caller, to])?;
        let now = self.time.now();
        Ok(self.ledger.mint(to, amount, now)?)
    }

    pub fn burn(&mut self, caller: &Address, from: &Address, amount: U256) -> Result<U256> {
        self.access.require(Role::Burner, caller)?;
        self.pause.ensure_not_paused()?;
        screen(&self.sanctions, &[caller, from])?;
        let now = self.time.now();
        Ok(self.ledger.burn(from, amount, now)?)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn balance_of(&self, account: &Address) -> Result<U256> {
        Ok(self.ledger.balance_of(account, self.time.now())?)
    }

    pub fn total_supply(&self) -> Result<U256> {
        Ok(self.ledger.total_supply(self.time.now())?)
    }

    pub fn shares_of(&self, account: &Address) -> U256 {
        self.ledger.shares_of(account)
    }

    pub fn total_shares(&self) -> U256 {
        self.ledger.total_shares()
    }

    pub fn current_multiplier(&self) -> Result<MultiplierView> {
        Ok(self.ledger.current_multiplier(self.time.now())?)
    }

    pub fn shares_by_underlying_amount(&self, amount: U256) -> Result<U256> {
        Ok(self
            .ledger
            .shares_by_underlying_amount(amount, self.time.now())?)
    }

    pub fn underlying_amount_by_shares(&self, shares: U256) -> Result<U256> {
        Ok(self
            .ledger
            .underlying_amount_by_shares(shares, self.time.now())?)
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    pub fn update_fee_per_period(&mut self, caller: &Address, fee: U256) -> Result<()> {
        self.access.require(Role::Owner, caller)?;
        let now = self.time.now();
        Ok(self.ledger.update_fee_per_period(fee, now)?)
    }

    pub fn set_period_length(&mut self, caller: &Address, period_length: u64) -> Result<()> {
        self.access.require(Role::Owner, caller)?;
        let now = self.time.now();
        Ok(self.ledger.set_period_length(period_length, now)?)
    }

    pub fn set_last_period_anchor(&mut self, caller: &Address, anchor: u64) -> Result<()> {
        self.access.require(Role::Owner, caller)?;
        let now = self.time.now();
        Ok(self.ledger.set_last_period_anchor(anchor, now)?)
    }

    pub fn schedule_multiplier_override(
        &mut self,
        caller: &Address,
        relative: U256,
        activation_time: u64,
        expected_multiplier: U256,
    ) -> Result<OverrideOutcome> {
        self.access.require(Role::MultiplierUpdater, caller)?;
        let now = self.time.now();
        Ok(self.ledger.schedule_multiplier_override(
            relative,
            activation_time,
            expected_multiplier,
            now,
        )?)
    }

    pub fn set_multiplier(&mut self, caller: &Address, multiplier: U256, expected_old: U256) -> Result<()> {
        self.access.require(Role::MultiplierUpdater, caller)?;
        let now = self.time.now();
        Ok(self.ledger.set_multiplier(multiplier, expected_old, now)?)
    }
}
