//! Multiplier clock
//!
//! Tracks the share -> amount multiplier. The multiplier decays by
//! `fee_per_period` once per whole period elapsed since the anchor; the
//! decay is computed lazily on read and only written back by [`settle`].
//! At most one override may be pending; scheduling another replaces it.
//!
//! [`settle`]: MultiplierClock::settle

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::math::{self, SCALE};

/// An override waiting for its activation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingOverride {
    /// Relative factor (1e18 scale) applied to the committed multiplier
    pub relative: U256,
    /// Unix seconds at which the override takes effect
    pub activation_time: u64,
}

/// Multiplier as observed at some `now`, without committing anything
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplierView {
    pub multiplier: U256,
    pub periods_elapsed: u64,
    pub override_applied: bool,
}

/// What a call to [`MultiplierClock::settle`] changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    pub view: MultiplierView,
    pub multiplier_changed: bool,
}

/// Result of scheduling an override
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideOutcome {
    /// Activation time was not in the future; folded in right away
    Applied { multiplier: U256 },
    /// Stored in the pending slot
    Scheduled(PendingOverride),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiplierClock {
    last_multiplier: U256,
    last_period_anchor: u64,
    period_length: u64,
    fee_per_period: U256,
    pending: Option<PendingOverride>,
}

impl MultiplierClock {
    /// Fresh clock at multiplier 1.0
    pub fn new(period_length: u64, anchor: u64, fee_per_period: U256) -> Result<Self> {
        validate_period_length(period_length)?;
        validate_anchor(anchor)?;
        validate_fee(fee_per_period)?;
        Ok(Self {
            last_multiplier: SCALE,
            last_period_anchor: anchor,
            period_length,
            fee_per_period,
            pending: None,
        })
    }

    /// Rebuild a clock from persisted fields
    pub fn from_parts(
        last_multiplier: U256,
        last_period_anchor: u64,
        period_length: u64,
        fee_per_period: U256,
        pending: Option<PendingOverride>,
    ) -> Result<Self> {
        validate_period_length(period_length)?;
        validate_anchor(last_period_anchor)?;
        validate_fee(fee_per_period)?;
        if let Some(p) = pending {
            if p.relative.is_zero() || p.activation_time == 0 {
                return Err(LedgerError::CorruptSnapshot(
                    "pending override with zero factor or activation time".to_string(),
                ));
            }
        }
        Ok(Self {
            last_multiplier,
            last_period_anchor,
            period_length,
            fee_per_period,
            pending,
        })
    }

    pub fn last_multiplier(&self) -> U256 {
        self.last_multiplier
    }

    pub fn last_period_anchor(&self) -> u64 {
        self.last_period_anchor
    }

    pub fn period_length(&self) -> u64 {
        self.period_length
    }

    pub fn fee_per_period(&self) -> U256 {
        self.fee_per_period
    }

    pub fn pending(&self) -> Option<PendingOverride> {
        self.pending
    }

    /// Pending relative factor; SCALE (no-op) when nothing is pending
    pub fn pending_multiplier_update(&self) -> U256 {
        self.pending.map(|p| p.relative).unwrap_or(SCALE)
    }

    /// Pending activation time; 0 when nothing is pending
    pub fn pending_activation_time(&self) -> u64 {
        self.pending.map(|p| p.activation_time).unwrap_or(0)
    }

    /// Whole periods between the anchor and `now`
    pub fn periods_elapsed(&self, now: u64) -> u64 {
        now.saturating_sub(self.last_period_anchor)
            .checked_div(self.period_length)
            .unwrap_or(0)
    }

    /// Multiplier at `now`. Pure: never touches stored state.
    ///
    /// A due override is folded into the base before decay, so every period
    /// elapsed since the anchor is charged against `last * relative`.
    /// Each elapsed period costs one compounding step, so reads get slower
    /// the longer the clock goes unsettled.
    pub fn compute_current(&self, now: u64) -> Result<MultiplierView> {
        let (base, override_applied) = match self.pending {
            Some(p) if p.activation_time <= now => (
                math::mul_div(self.last_multiplier, p.relative, SCALE)?,
                true,
            ),
            _ => (self.last_multiplier, false),
        };

        let periods_elapsed = self.periods_elapsed(now);
        let multiplier = math::compound(base, self.fee_per_period, periods_elapsed)?;

        Ok(MultiplierView {
            multiplier,
            periods_elapsed,
            override_applied,
        })
    }

    /// Persist the multiplier observed at `now`.
    ///
    /// The anchor advances by whole periods only, keeping the sub-period
    /// remainder for the next settlement.
    pub fn settle(&mut self, now: u64) -> Result<Settlement> {
        let view = self.compute_current(now)?;

        let advance = self
            .period_length
            .checked_mul(view.periods_elapsed)
            .ok_or(LedgerError::Overflow)?;
        let anchor = self
            .last_period_anchor
            .checked_add(advance)
            .ok_or(LedgerError::Overflow)?;

        self.last_period_anchor = anchor;
        let multiplier_changed = view.multiplier != self.last_multiplier;
        if multiplier_changed {
            log::debug!(
                "settled multiplier {} -> {} ({} periods, override {})",
                math::format_scaled(self.last_multiplier),
                math::format_scaled(view.multiplier),
                view.periods_elapsed,
                view.override_applied
            );
            self.last_multiplier = view.multiplier;
        }
        if view.override_applied {
            self.pending = None;
        }

        Ok(Settlement {
            view,
            multiplier_changed,
        })
    }

    /// Fail with `StaleMultiplier` unless `expected` is the committed value
    pub fn ensure_current(&self, expected: U256) -> Result<()> {
        if expected != self.last_multiplier {
            return Err(LedgerError::StaleMultiplier {
                expected,
                current: self.last_multiplier,
            });
        }
        Ok(())
    }

    /// Apply `relative` now, or park it until `activation_time`.
    ///
    /// Callers settle first. A future activation must land before the end
    /// of the current period.
    pub fn schedule_override(
        &mut self,
        relative: U256,
        activation_time: u64,
        now: u64,
    ) -> Result<OverrideOutcome> {
        if relative.is_zero() {
            return Err(LedgerError::InvalidMultiplier(
                "relative multiplier must be non-zero".to_string(),
            ));
        }

        if activation_time <= now {
            let multiplier = math::mul_div(self.last_multiplier, relative, SCALE)?;
            if multiplier.is_zero() {
                return Err(LedgerError::InvalidMultiplier(
                    "override would zero the multiplier".to_string(),
                ));
            }
            self.last_multiplier = multiplier;
            return Ok(OverrideOutcome::Applied { multiplier });
        }

        let boundary = self.last_period_anchor.saturating_add(self.period_length);
        if activation_time >= boundary {
            return Err(LedgerError::InvalidMultiplier(format!(
                "activation time {} is not before the next period boundary {}",
                activation_time, boundary
            )));
        }

        if math::mul_div(self.last_multiplier, relative, SCALE)?.is_zero() {
            return Err(LedgerError::InvalidMultiplier(
                "override would zero the multiplier".to_string(),
            ));
        }

        let pending = PendingOverride {
            relative,
            activation_time,
        };
        self.pending = Some(pending);
        Ok(OverrideOutcome::Scheduled(pending))
    }

    /// Replace the committed multiplier outright
    pub fn set_multiplier(&mut self, multiplier: U256) -> Result<()> {
        if multiplier.is_zero() {
            return Err(LedgerError::InvalidMultiplier(
                "multiplier must be non-zero".to_string(),
            ));
        }
        self.last_multiplier = multiplier;
        Ok(())
    }

    pub fn set_fee_per_period(&mut self, fee: U256) -> Result<()> {
        self.ensure_unlocked()?;
        validate_fee(fee)?;
        self.fee_per_period = fee;
        Ok(())
    }

    pub fn set_period_length(&mut self, period_length: u64) -> Result<()> {
        self.ensure_unlocked()?;
        validate_period_length(period_length)?;
        self.period_length = period_length;
        Ok(())
    }

    pub fn set_last_period_anchor(&mut self, anchor: u64) -> Result<()> {
        self.ensure_unlocked()?;
        validate_anchor(anchor)?;
        self.last_period_anchor = anchor;
        Ok(())
    }

    fn ensure_unlocked(&self) -> Result<()> {
        match self.pending {
            Some(p) => Err(LedgerError::ConfigurationLocked {
                activation_time: p.activation_time,
            }),
            None => Ok(()),
        }
    }
}

pub(crate) fn validate_fee(fee: U256) -> Result<()> {
    if fee >= SCALE {
        return Err(LedgerError::InvalidFee(format!(
            "{} must be below {}",
            fee, SCALE
        )));
    }
    Ok(())
}

pub(crate) fn validate_period_length(period_length: u64) -> Result<()> {
    if period_length == 0 {
        return Err(LedgerError::InvalidPeriodLength(period_length));
    }
    Ok(())
}

pub(crate) fn validate_anchor(anchor: u64) -> Result<()> {
    if anchor == 0 {
        return Err(LedgerError::InvalidAnchor(anchor));
    }
    Ok(())
}
