//! Auto-fee ledger
//!
//! Every mutating entry point settles the multiplier clock first and then
//! works against the freshly settled multiplier. Settlement is staged on a
//! copy of the clock and committed together with the share movement, so a
//! failed call leaves no trace. Read-only queries compute the settled view
//! on the fly without writing it back.

use primitive_types::U256;

use crate::address::Address;
use crate::clock::{MultiplierClock, MultiplierView, OverrideOutcome, Settlement};
use crate::error::{LedgerError, Result};
use crate::events::LedgerEvent;
use crate::math;
use crate::shares::ShareLedger;
use crate::snapshot::LedgerSnapshot;

/// Parameters for [`AutoFeeLedger::initialize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitParams {
    pub period_length: u64,
    pub initial_anchor_time: u64,
    pub fee_per_period: U256,
}

/// Clock settled for one call, not yet committed
struct Staged {
    clock: MultiplierClock,
    settlement: Settlement,
    events: Vec<LedgerEvent>,
}

impl Staged {
    fn multiplier(&self) -> U256 {
        self.clock.last_multiplier()
    }

    fn emit(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }
}

#[derive(Debug, Clone, Default)]
pub struct AutoFeeLedger {
    clock: Option<MultiplierClock>,
    shares: ShareLedger,
    events: Vec<LedgerEvent>,
}

impl AutoFeeLedger {
    /// Uninitialized ledger; call [`initialize`](Self::initialize) before use
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct and initialize in one step
    pub fn with_params(params: InitParams) -> Result<Self> {
        let mut ledger = Self::new();
        ledger.initialize(params)?;
        Ok(ledger)
    }

    pub fn initialize(&mut self, params: InitParams) -> Result<()> {
        if self.clock.is_some() {
            return Err(LedgerError::AlreadyInitialized);
        }
        let clock = MultiplierClock::new(
            params.period_length,
            params.initial_anchor_time,
            params.fee_per_period,
        )?;
        log::info!(
            "ledger initialized: period {}s, anchor {}, fee {}",
            params.period_length,
            params.initial_anchor_time,
            math::format_scaled(params.fee_per_period)
        );
        self.clock = Some(clock);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.clock.is_some()
    }

    /// Committed clock state (not settled to any particular time)
    pub fn clock(&self) -> Result<&MultiplierClock> {
        self.clock.as_ref().ok_or(LedgerError::NotInitialized)
    }

    pub fn share_ledger(&self) -> &ShareLedger {
        &self.shares
    }

    // ------------------------------------------------------------------
    // Settlement plumbing
    // ------------------------------------------------------------------

    fn stage(&self, now: u64) -> Result<Staged> {
        let mut clock = *self.clock()?;
        let settlement = clock.settle(now)?;
        let mut events = Vec::new();
        if settlement.multiplier_changed {
            events.push(LedgerEvent::MultiplierUpdated {
                multiplier: clock.last_multiplier(),
            });
        }
        Ok(Staged {
            clock,
            settlement,
            events,
        })
    }

    fn commit(&mut self, staged: Staged) {
        self.clock = Some(staged.clock);
        self.events.extend(staged.events);
    }

    /// Persist any compounding and due override at `now`
    pub fn settle(&mut self, now: u64) -> Result<Settlement> {
        let staged = self.stage(now)?;
        let settlement = staged.settlement;
        self.commit(staged);
        Ok(settlement)
    }

    // ------------------------------------------------------------------
    // Value movement
    // ------------------------------------------------------------------

    /// Move `amount` underlying tokens; returns the shares moved
    pub fn transfer(&mut self, from: &Address, to: &Address, amount: U256, now: u64) -> Result<U256> {
        let mut staged = self.stage(now)?;
        let shares = math::to_shares(amount, staged.multiplier())?;
        self.shares.move_shares(from, to, shares)?;

        log::debug!("transfer {} -> {}: {} ({} shares)", from, to, amount, shares);
        staged.emit(LedgerEvent::Transfer {
            from: *from,
            to: *to,
            amount,
        });
        staged.emit(LedgerEvent::TransferShares {
            from: *from,
            to: *to,
            shares,
        });
        self.commit(staged);
        Ok(shares)
    }

    /// Move exact `shares`; returns their underlying value at the settled multiplier
    pub fn transfer_shares(&mut self, from: &Address, to: &Address, shares: U256, now: u64) -> Result<U256> {
        let mut staged = self.stage(now)?;
        let amount = math::to_amount(shares, staged.multiplier())?;
        self.shares.move_shares(from, to, shares)?;

        log::debug!("transfer shares {} -> {}: {} ({} tokens)", from, to, shares, amount);
        staged.emit(LedgerEvent::Transfer {
            from: *from,
            to: *to,
            amount,
        });
        staged.emit(LedgerEvent::TransferShares {
            from: *from,
            to: *to,
            shares,
        });
        self.commit(staged);
        Ok(amount)
    }

    /// Credit `to` with `amount` worth of new shares; returns shares minted
    pub fn mint(&mut self, to: &Address, amount: U256, now: u64) -> Result<U256> {
        let mut staged = self.stage(now)?;
        let shares = math::to_shares(amount, staged.multiplier())?;
        self.shares.credit(to, shares)?;

        log::debug!("mint {}: {} ({} shares)", to, amount, shares);
        staged.emit(LedgerEvent::Transfer {
            from: Address::ZERO,
            to: *to,
            amount,
        });
        staged.emit(LedgerEvent::TransferShares {
            from: Address::ZERO,
            to: *to,
            shares,
        });
        self.commit(staged);
        Ok(shares)
    }

    /// Destroy `amount` worth of `from`'s shares; returns shares burned
    pub fn burn(&mut self, from: &Address, amount: U256, now: u64) -> Result<U256> {
        let mut staged = self.stage(now)?;
        let shares = math::to_shares(amount, staged.multiplier())?;
        self.shares.debit(from, shares)?;

        log::debug!("burn {}: {} ({} shares)", from, amount, shares);
        staged.emit(LedgerEvent::Transfer {
            from: *from,
            to: Address::ZERO,
            amount,
        });
        staged.emit(LedgerEvent::TransferShares {
            from: *from,
            to: Address::ZERO,
            shares,
        });
        self.commit(staged);
        Ok(shares)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn current_multiplier(&self, now: u64) -> Result<MultiplierView> {
        self.clock()?.compute_current(now)
    }

    pub fn balance_of(&self, account: &Address, now: u64) -> Result<U256> {
        let view = self.current_multiplier(now)?;
        math::to_amount(self.shares.shares_of(account), view.multiplier)
    }

    pub fn total_supply(&self, now: u64) -> Result<U256> {
        let view = self.current_multiplier(now)?;
        math::to_amount(self.shares.total_shares(), view.multiplier)
    }

    pub fn shares_of(&self, account: &Address) -> U256 {
        self.shares.shares_of(account)
    }

    pub fn total_shares(&self) -> U256 {
        self.shares.total_shares()
    }

    pub fn shares_by_underlying_amount(&self, amount: U256, now: u64) -> Result<U256> {
        let view = self.current_multiplier(now)?;
        math::to_shares(amount, view.multiplier)
    }

    pub fn underlying_amount_by_shares(&self, shares: U256, now: u64) -> Result<U256> {
        let view = self.current_multiplier(now)?;
        math::to_amount(shares, view.multiplier)
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    pub fn update_fee_per_period(&mut self, fee: U256, now: u64) -> Result<()> {
        let mut staged = self.stage(now)?;
        staged.clock.set_fee_per_period(fee)?;
        log::info!("fee per period set to {}", math::format_scaled(fee));
        staged.emit(LedgerEvent::FeePerPeriodUpdated { fee });
        self.commit(staged);
        Ok(())
    }

    pub fn set_period_length(&mut self, period_length: u64, now: u64) -> Result<()> {
        let mut staged = self.stage(now)?;
        staged.clock.set_period_length(period_length)?;
        log::info!("period length set to {}s", period_length);
        staged.emit(LedgerEvent::PeriodLengthUpdated { period_length });
        self.commit(staged);
        Ok(())
    }

    pub fn set_last_period_anchor(&mut self, anchor: u64, now: u64) -> Result<()> {
        let mut staged = self.stage(now)?;
        staged.clock.set_last_period_anchor(anchor)?;
        log::info!("last period anchor set to {}", anchor);
        staged.emit(LedgerEvent::LastPeriodAnchorUpdated { anchor });
        self.commit(staged);
        Ok(())
    }

    /// Apply `relative` at `activation_time` (immediately if not in the future).
    ///
    /// `expected_multiplier` must equal the committed multiplier after
    /// settling at `now`, otherwise the call fails with `StaleMultiplier`.
    pub fn schedule_multiplier_override(
        &mut self,
        relative: U256,
        activation_time: u64,
        expected_multiplier: U256,
        now: u64,
    ) -> Result<OverrideOutcome> {
        let mut staged = self.stage(now)?;
        staged.clock.ensure_current(expected_multiplier)?;
        let outcome = staged
            .clock
            .schedule_override(relative, activation_time, now)?;

        match outcome {
            OverrideOutcome::Applied { multiplier } => {
                log::info!(
                    "multiplier override applied: {}",
                    math::format_scaled(multiplier)
                );
                staged.emit(LedgerEvent::MultiplierUpdated { multiplier });
            }
            OverrideOutcome::Scheduled(pending) => {
                log::info!(
                    "multiplier override x{} scheduled for {}",
                    math::format_scaled(pending.relative),
                    pending.activation_time
                );
                staged.emit(LedgerEvent::MultiplierOverrideScheduled {
                    relative: pending.relative,
                    activation_time: pending.activation_time,
                });
            }
        }
        self.commit(staged);
        Ok(outcome)
    }

    /// Replace the multiplier outright, guarded by the old value
    pub fn set_multiplier(&mut self, multiplier: U256, expected_old: U256, now: u64) -> Result<()> {
        let mut staged = self.stage(now)?;
        staged.clock.ensure_current(expected_old)?;
        staged.clock.set_multiplier(multiplier)?;
        log::info!("multiplier set to {}", math::format_scaled(multiplier));
        staged.emit(LedgerEvent::MultiplierUpdated { multiplier });
        self.commit(staged);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Notifications and persistence
    // ------------------------------------------------------------------

    /// Notifications emitted since the last drain, oldest first
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    /// `total_shares` must equal the sum of all balances
    pub fn check_solvency(&self) -> Result<()> {
        self.shares.check_solvency()
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot::capture(self.clock.as_ref(), &self.shares)
    }

    /// Rebuild a ledger from a snapshot; pending notifications are not restored
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Result<Self> {
        let (clock, shares) = snapshot.restore()?;
        Ok(Self {
            clock,
            shares,
            events: Vec::new(),
        })
    }
}
