//! Rounding policies for converting exact fractions to decimal strings

use num_bigint::BigInt;
use num_traits::Zero;

/// Rounding policy applied when an exact fraction is shortened to a
/// fixed number of digits.
///
/// Monetary display uses [`Rounding::RoundDown`] to match on-chain
/// truncating division; generic fractions default to half-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Truncate toward zero
    RoundDown,
    /// Round half away from zero
    RoundHalfUp,
    /// Round away from zero whenever a remainder exists
    RoundUp,
}

/// Divide `numerator / denominator` applying the rounding policy.
///
/// Both operands must be non-negative and `denominator` non-zero; sign
/// handling is the caller's concern.
pub(crate) fn div_round(numerator: &BigInt, denominator: &BigInt, rounding: Rounding) -> BigInt {
    debug_assert!(!denominator.is_zero());
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder.is_zero() {
        return quotient;
    }
    match rounding {
        Rounding::RoundDown => quotient,
        Rounding::RoundUp => quotient + 1,
        Rounding::RoundHalfUp => {
            if &remainder * 2 >= *denominator {
                quotient + 1
            } else {
                quotient
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_div_round_policies() {
        let d = BigInt::from(3);
        assert_eq!(div_round(&BigInt::from(10), &d, Rounding::RoundDown), BigInt::from(3));
        assert_eq!(div_round(&BigInt::from(10), &d, Rounding::RoundHalfUp), BigInt::from(3));
        assert_eq!(div_round(&BigInt::from(10), &d, Rounding::RoundUp), BigInt::from(4));

        // exactly half rounds up
        let two = BigInt::from(2);
        assert_eq!(div_round(&BigInt::from(5), &two, Rounding::RoundHalfUp), BigInt::from(3));
        assert_eq!(div_round(&BigInt::from(5), &two, Rounding::RoundDown), BigInt::from(2));
    }

    #[test]
    fn test_div_round_exact() {
        let d = BigInt::from(4);
        for rounding in [Rounding::RoundDown, Rounding::RoundHalfUp, Rounding::RoundUp] {
            assert_eq!(div_round(&BigInt::from(8), &d, rounding), BigInt::from(2));
        }
    }
}
