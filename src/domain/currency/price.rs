//! Base/quote exchange rates

use num_bigint::BigInt;

use crate::domain::numeric::{Fraction, Rounding};
use crate::shared::errors::AmountError;

use super::{Currency, CurrencyAmount};

/// An exchange rate from a base currency to a quote currency.
///
/// The inner fraction is the *raw* ratio: quote smallest-units per base
/// smallest-unit. [`Price::adjusted`] rescales by the decimal gap to
/// express the rate in human units.
#[derive(Debug, Clone)]
pub struct Price {
    base: Currency,
    quote: Currency,
    fraction: Fraction,
}

impl Price {
    /// Build from raw unit counts: `quote_raw` smallest quote units per
    /// `base_raw` smallest base units.
    pub fn from_raw(
        base: Currency,
        quote: Currency,
        base_raw: impl Into<BigInt>,
        quote_raw: impl Into<BigInt>,
    ) -> Self {
        Self {
            base,
            quote,
            fraction: Fraction::new(quote_raw, base_raw),
        }
    }

    pub fn base(&self) -> &Currency {
        &self.base
    }

    pub fn quote_currency(&self) -> &Currency {
        &self.quote
    }

    /// The unscaled quote/base ratio in raw units.
    pub fn raw(&self) -> &Fraction {
        &self.fraction
    }

    /// `10^base_decimals / 10^quote_decimals`
    pub fn scalar(&self) -> Fraction {
        Fraction::new(
            BigInt::from(10u8).pow(self.base.decimals() as u32),
            BigInt::from(10u8).pow(self.quote.decimals() as u32),
        )
    }

    /// The rate in human units.
    pub fn adjusted(&self) -> Fraction {
        self.fraction.multiply(self.scalar())
    }

    pub fn invert(&self) -> Price {
        Price {
            base: self.quote.clone(),
            quote: self.base.clone(),
            fraction: self.fraction.invert(),
        }
    }

    /// Compose two chained rates: `self` (A→B) times `other` (B→C) is A→C.
    pub fn multiply(&self, other: &Price) -> Result<Price, AmountError> {
        if !self.quote.equals(&other.base) {
            return Err(AmountError::CurrencyMismatch {
                left: self.quote.label(),
                right: other.base.label(),
            });
        }
        Ok(Price {
            base: self.base.clone(),
            quote: other.quote.clone(),
            fraction: self.fraction.multiply(other.fraction.clone()),
        })
    }

    /// Value an amount of the base currency in the quote currency.
    ///
    /// Floors to an integer raw amount, matching pool math.
    pub fn quote_amount(&self, amount: &CurrencyAmount) -> Result<CurrencyAmount, AmountError> {
        if !amount.currency().equals(&self.base) {
            return Err(AmountError::CurrencyMismatch {
                left: amount.currency().label(),
                right: self.base.label(),
            });
        }
        let raw = self.fraction.multiply(amount.raw()).quotient();
        CurrencyAmount::new(self.quote.clone(), raw)
    }

    pub fn to_significant(&self, digits: u32, rounding: Rounding) -> String {
        self.adjusted().to_significant(digits, rounding)
    }
}
