//! Currency-bound exact amounts

use num_bigint::BigInt;
use num_traits::Signed;
use once_cell::sync::Lazy;

use crate::domain::numeric::{Fraction, Rounding};
use crate::shared::errors::AmountError;

use super::Currency;

static MAX_UINT256: Lazy<BigInt> = Lazy::new(|| (BigInt::from(1) << 256) - 1);

/// An exact amount of one currency.
///
/// Internally a [`Fraction`] whose denominator is pinned to
/// `10^currency.decimals`; the numerator is the raw on-chain integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyAmount {
    currency: Currency,
    fraction: Fraction,
}

impl CurrencyAmount {
    /// Build from a raw integer amount in the currency's smallest unit.
    ///
    /// The raw value must be a non-negative integer representable in an
    /// unsigned 256-bit word.
    pub fn new(currency: Currency, raw: impl Into<BigInt>) -> Result<Self, AmountError> {
        let raw = raw.into();
        if raw.is_negative() || raw > *MAX_UINT256 {
            return Err(AmountError::ValueOutOfRange(format!(
                "{} is not a uint256 amount",
                raw
            )));
        }
        let denominator = BigInt::from(10u8).pow(currency.decimals() as u32);
        Ok(Self {
            currency,
            fraction: Fraction::new(raw, denominator),
        })
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// The raw integer numerator.
    pub fn raw(&self) -> &BigInt {
        self.fraction.numerator()
    }

    pub fn as_fraction(&self) -> &Fraction {
        &self.fraction
    }

    pub fn is_zero(&self) -> bool {
        self.fraction.is_zero()
    }

    fn require_same_currency(&self, other: &CurrencyAmount) -> Result<(), AmountError> {
        if !self.currency.equals(&other.currency) {
            return Err(AmountError::CurrencyMismatch {
                left: self.currency.label(),
                right: other.currency.label(),
            });
        }
        Ok(())
    }

    pub fn add(&self, other: &CurrencyAmount) -> Result<CurrencyAmount, AmountError> {
        self.require_same_currency(other)?;
        CurrencyAmount::new(self.currency.clone(), self.raw() + other.raw())
    }

    /// Subtraction below zero is rejected: raw amounts are unsigned.
    pub fn subtract(&self, other: &CurrencyAmount) -> Result<CurrencyAmount, AmountError> {
        self.require_same_currency(other)?;
        CurrencyAmount::new(self.currency.clone(), self.raw() - other.raw())
    }

    /// Render with `decimal_places` fractional digits; a currency's
    /// precision caps how many are renderable.
    ///
    /// Monetary display rounds down by default so client-visible amounts
    /// never overstate value.
    pub fn to_fixed(&self, decimal_places: u32, rounding: Rounding) -> String {
        assert!(
            decimal_places <= self.currency.decimals() as u32,
            "decimal places exceed currency precision"
        );
        self.fraction.to_fixed(decimal_places, rounding)
    }

    pub fn to_significant(&self, digits: u32, rounding: Rounding) -> String {
        self.fraction.to_significant(digits, rounding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::currency::Token;
    use crate::shared::types::{chains, Address};

    fn usdc() -> Currency {
        Currency::Token(Token::new(
            chains::MAINNET,
            Address::repeat_byte(0xa0),
            6,
            Some("USDC".to_string()),
            None,
        ))
    }

    #[test]
    fn test_range_validation() {
        assert!(CurrencyAmount::new(usdc(), 0u64).is_ok());
        assert!(matches!(
            CurrencyAmount::new(usdc(), BigInt::from(-1)),
            Err(AmountError::ValueOutOfRange(_))
        ));
        assert!(matches!(
            CurrencyAmount::new(usdc(), BigInt::from(1) << 256),
            Err(AmountError::ValueOutOfRange(_))
        ));
        assert!(CurrencyAmount::new(usdc(), (BigInt::from(1) << 256) - 1).is_ok());
    }

    #[test]
    fn test_add_subtract_same_currency() {
        let a = CurrencyAmount::new(usdc(), 1_500_000u64).unwrap();
        let b = CurrencyAmount::new(usdc(), 500_000u64).unwrap();
        assert_eq!(a.add(&b).unwrap().raw(), &BigInt::from(2_000_000u64));
        assert_eq!(a.subtract(&b).unwrap().raw(), &BigInt::from(1_000_000u64));
        // underflow is out of range, not a negative amount
        assert!(matches!(
            b.subtract(&a),
            Err(AmountError::ValueOutOfRange(_))
        ));
    }

    #[test]
    fn test_currency_mismatch() {
        let eth = Currency::native(chains::MAINNET).unwrap();
        let a = CurrencyAmount::new(usdc(), 1u64).unwrap();
        let b = CurrencyAmount::new(eth, 1u64).unwrap();
        assert!(matches!(
            a.add(&b),
            Err(AmountError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_display_rounds_down() {
        // 1.999999 USDC shown with 2 decimals must not overstate
        let a = CurrencyAmount::new(usdc(), 1_999_999u64).unwrap();
        assert_eq!(a.to_fixed(2, Rounding::RoundDown), "1.99");
        assert_eq!(a.to_significant(4, Rounding::RoundDown), "1.999");
    }

    #[test]
    #[should_panic(expected = "exceed currency precision")]
    fn test_to_fixed_capped_by_decimals() {
        let a = CurrencyAmount::new(usdc(), 1u64).unwrap();
        a.to_fixed(7, Rounding::RoundDown);
    }
}
