//! Fixed-point arithmetic at 1e18 scale
//!
//! Every share/amount conversion and every compounding step goes through
//! these helpers. All division truncates toward zero and intermediate
//! products are carried in 512 bits.

use primitive_types::{U256, U512};

use crate::error::{LedgerError, Result};

/// Fixed-point scale (1.0 == 10^18)
pub const SCALE: U256 = U256([1_000_000_000_000_000_000, 0, 0, 0]);

/// `a * b / d`, floored, with a double-width intermediate
pub fn mul_div(a: U256, b: U256, d: U256) -> Result<U256> {
    if d.is_zero() {
        return Err(LedgerError::InvalidMultiplier(
            "division by a zero multiplier".to_string(),
        ));
    }
    let quotient = a.full_mul(b) / U512::from(d);
    U256::try_from(quotient).map_err(|_| LedgerError::Overflow)
}

/// Underlying amount -> shares at `multiplier`
pub fn to_shares(amount: U256, multiplier: U256) -> Result<U256> {
    mul_div(amount, SCALE, multiplier)
}

/// Shares -> underlying amount at `multiplier`
pub fn to_amount(shares: U256, multiplier: U256) -> Result<U256> {
    mul_div(shares, multiplier, SCALE)
}

/// One period of fee decay: `multiplier * (SCALE - fee) / SCALE`
pub fn compound_once(multiplier: U256, fee_per_period: U256) -> Result<U256> {
    let keep = SCALE
        .checked_sub(fee_per_period)
        .ok_or_else(|| LedgerError::InvalidFee(fee_per_period.to_string()))?;
    mul_div(multiplier, keep, SCALE)
}

/// Apply `compound_once` `periods` times in sequence.
///
/// Stops early once the multiplier hits zero since no later period can
/// change it. Cost is linear in `periods`; hosts that read rarely should
/// settle periodically to keep the gap short.
pub fn compound(mut multiplier: U256, fee_per_period: U256, periods: u64) -> Result<U256> {
    if fee_per_period.is_zero() {
        return Ok(multiplier);
    }
    for _ in 0..periods {
        if multiplier.is_zero() {
            break;
        }
        multiplier = compound_once(multiplier, fee_per_period)?;
    }
    Ok(multiplier)
}

/// Render a 1e18-scaled value as a decimal string (for logs)
pub fn format_scaled(value: U256) -> String {
    let whole = value / SCALE;
    let frac = value % SCALE;
    if frac.is_zero() {
        return whole.to_string();
    }
    let frac = format!("{:0>18}", frac.to_string());
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e18(n: u64) -> U256 {
        U256::from(n) * SCALE
    }

    #[test]
    fn test_scale_constant() {
        assert_eq!(SCALE, U256::exp10(18));
    }

    #[test]
    fn test_conversions_floor() {
        // 1.5x multiplier: 10 units -> 6 shares (6.666 floored)
        let m = U256::from(1_500_000_000_000_000_000u128);
        assert_eq!(to_shares(U256::from(10), m).unwrap(), U256::from(6));
        assert_eq!(to_amount(U256::from(6), m).unwrap(), U256::from(9));
    }

    #[test]
    fn test_zero_multiplier_rejected() {
        assert!(matches!(
            to_shares(U256::from(1), U256::zero()),
            Err(LedgerError::InvalidMultiplier(_))
        ));
    }

    #[test]
    fn test_wide_intermediate() {
        // 2^200 * 1e18 overflows 256 bits but the quotient fits
        let big = U256::one() << 200;
        assert_eq!(to_amount(big, SCALE).unwrap(), big);
        assert_eq!(to_shares(big, SCALE).unwrap(), big);
    }

    #[test]
    fn test_overflow_reported() {
        let result = to_shares(U256::MAX, U256::one());
        assert!(matches!(result, Err(LedgerError::Overflow)));
    }

    #[test]
    fn test_compound_once() {
        // 1% fee
        let fee = U256::exp10(16);
        assert_eq!(
            compound_once(SCALE, fee).unwrap(),
            U256::from(990_000_000_000_000_000u128)
        );
        assert!(compound_once(SCALE, SCALE + 1).is_err());
    }

    #[test]
    fn test_compound_matches_loop() {
        let fee = U256::from(1_897_231_348_405_366u64);
        let mut expected = SCALE;
        for _ in 0..10 {
            expected = compound_once(expected, fee).unwrap();
        }
        assert_eq!(compound(SCALE, fee, 10).unwrap(), expected);
    }

    #[test]
    fn test_compound_zero_fee_is_identity() {
        assert_eq!(compound(e18(3), U256::zero(), u64::MAX).unwrap(), e18(3));
    }

    #[test]
    fn test_compound_stops_at_zero() {
        // 100% fee zeroes after one period, loop must not spin for u64::MAX
        assert_eq!(compound(SCALE, SCALE, u64::MAX).unwrap(), U256::zero());
    }

    #[test]
    fn test_format_scaled() {
        assert_eq!(format_scaled(e18(2)), "2");
        assert_eq!(format_scaled(U256::from(1_100_000_000_000_000_000u128)), "1.1");
        assert_eq!(format_scaled(U256::from(5)), "0.000000000000000005");
    }
}
