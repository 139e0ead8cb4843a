//! # Slippage Protection Module
//!
//! Turns a quoted output into the worst acceptable output and verifies
//! executed trades against it. The tolerance is a fixed integer ratio
//! (98/100 = at most 2% negative slippage); all arithmetic stays in
//! `Nat` form so no precision is lost on large amounts.

use candid::Nat;

use crate::infrastructure::constants::{SLIPPAGE_DENOMINATOR, SLIPPAGE_NUMERATOR};
use crate::infrastructure::errors::{Result, TradingError, VaultError};
use crate::infrastructure::math::multiply_and_divide;

/// Minimum acceptable output for a quoted `expected` amount:
/// `expected * 98 / 100`, truncating.
pub fn minimum_out(expected: &Nat) -> Result<Nat> {
    if expected == &Nat::from(0u64) {
        return Err(VaultError::Trading(TradingError::InvalidSwapParams {
            reason: "Expected output cannot be zero".to_string(),
        }));
    }

    multiply_and_divide(
        expected,
        &Nat::from(SLIPPAGE_NUMERATOR),
        &Nat::from(SLIPPAGE_DENOMINATOR),
    )
}

/// Verify an executed amount against the quoted expectation.
///
/// Positive slippage (more than quoted) is always accepted; the venue
/// already enforces `minimum`, this re-checks it on the reply.
pub fn validate_swap_result(expected: &Nat, actual: &Nat, minimum: &Nat) -> Result<()> {
    if actual >= expected {
        ic_cdk::println!(
            "✅ Positive slippage: expected {}, got {}",
            expected,
            actual
        );
        return Ok(());
    }

    if actual < minimum {
        return Err(VaultError::Trading(TradingError::SlippageExceeded {
            expected: expected.to_string(),
            actual: actual.to_string(),
            minimum: minimum.to_string(),
        }));
    }

    ic_cdk::println!(
        "✅ Slippage acceptable: expected {}, got {} (minimum {})",
        expected,
        actual,
        minimum
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimum_out_ratio() {
        // 50,000 quoted at 98/100 → 49,000 minimum
        let min = minimum_out(&Nat::from(50_000u64)).unwrap();
        assert_eq!(min, Nat::from(49_000u64));
    }

    #[test]
    fn test_minimum_out_truncates() {
        // 99 * 98 / 100 = 97.02 → 97
        let min = minimum_out(&Nat::from(99u64)).unwrap();
        assert_eq!(min, Nat::from(97u64));
    }

    #[test]
    fn test_minimum_out_zero_expected_rejected() {
        let result = minimum_out(&Nat::from(0u64));
        assert!(matches!(
            result,
            Err(VaultError::Trading(TradingError::InvalidSwapParams { .. }))
        ));
    }

    #[test]
    fn test_minimum_out_large_amounts() {
        // Past u64: Nat arithmetic must not overflow
        let expected = Nat::from(u64::MAX) * Nat::from(10u64);
        let min = minimum_out(&expected).unwrap();
        assert_eq!(
            min,
            Nat::from(u64::MAX) * Nat::from(10u64) * Nat::from(98u64) / Nat::from(100u64)
        );
    }

    #[test]
    fn test_validate_within_tolerance() {
        let expected = Nat::from(50_000u64);
        let minimum = minimum_out(&expected).unwrap();
        assert!(validate_swap_result(&expected, &Nat::from(49_000u64), &minimum).is_ok());
    }

    #[test]
    fn test_validate_positive_slippage_always_ok() {
        let expected = Nat::from(50_000u64);
        let minimum = minimum_out(&expected).unwrap();
        assert!(validate_swap_result(&expected, &Nat::from(50_500u64), &minimum).is_ok());
    }

    #[test]
    fn test_validate_below_minimum_fails() {
        let expected = Nat::from(50_000u64);
        let minimum = minimum_out(&expected).unwrap();
        let result = validate_swap_result(&expected, &Nat::from(48_999u64), &minimum);
        assert!(matches!(
            result,
            Err(VaultError::Trading(TradingError::SlippageExceeded { .. }))
        ));
    }
}
