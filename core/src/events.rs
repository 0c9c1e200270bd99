//! Notifications emitted for off-ledger observers

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::address::Address;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// Value moved, in underlying-token units. Mint/burn use the null account.
    Transfer {
        from: Address,
        to: Address,
        amount: U256,
    },
    /// Same movement expressed in shares
    TransferShares {
        from: Address,
        to: Address,
        shares: U256,
    },
    MultiplierUpdated {
        multiplier: U256,
    },
    MultiplierOverrideScheduled {
        relative: U256,
        activation_time: u64,
    },
    FeePerPeriodUpdated {
        fee: U256,
    },
    PeriodLengthUpdated {
        period_length: u64,
    },
    LastPeriodAnchorUpdated {
        anchor: u64,
    },
}

impl LedgerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LedgerEvent::Transfer { .. } => "Transfer",
            LedgerEvent::TransferShares { .. } => "TransferShares",
            LedgerEvent::MultiplierUpdated { .. } => "MultiplierUpdated",
            LedgerEvent::MultiplierOverrideScheduled { .. } => "MultiplierOverrideScheduled",
            LedgerEvent::FeePerPeriodUpdated { .. } => "FeePerPeriodUpdated",
            LedgerEvent::PeriodLengthUpdated { .. } => "PeriodLengthUpdated",
            LedgerEvent::LastPeriodAnchorUpdated { .. } => "LastPeriodAnchorUpdated",
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_tagged() {
        let event = LedgerEvent::MultiplierUpdated {
            multiplier: U256::from(16),
        };
        let json = event.to_json().unwrap();
        assert!(json.contains("\"event\":\"multiplier_updated\""));
        assert!(json.contains("\"multiplier\":\"0x10\""));
        let back: LedgerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
        assert_eq!(back.name(), "MultiplierUpdated");
    }
}
