//! Arbitrary-precision fractions
//!
//! Fractions are kept unreduced: reducing to lowest terms buys nothing for
//! correctness and intermediate products must stay bit-aligned with
//! on-chain integer math. `BigInt` components make overflow impossible.

use std::cmp::Ordering;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};

use crate::shared::types::U256;
use crate::shared::utils::bigint_from_u256;

use super::rounding::{div_round, Rounding};

/// An exact rational number.
///
/// Immutable: every operation returns a new value. The denominator is
/// never zero and its sign is normalized into the numerator at
/// construction.
#[derive(Debug, Clone)]
pub struct Fraction {
    numerator: BigInt,
    denominator: BigInt,
}

fn pow10(exp: u32) -> BigInt {
    BigInt::from(10u8).pow(exp)
}

impl Fraction {
    /// Build a fraction from a numerator and a non-zero denominator.
    ///
    /// Panics on a zero denominator: that is always a caller bug, never
    /// a recoverable condition.
    pub fn new(numerator: impl Into<BigInt>, denominator: impl Into<BigInt>) -> Self {
        let numerator = numerator.into();
        let denominator = denominator.into();
        assert!(!denominator.is_zero(), "fraction denominator is zero");
        if denominator.is_negative() {
            Self {
                numerator: -numerator,
                denominator: -denominator,
            }
        } else {
            Self {
                numerator,
                denominator,
            }
        }
    }

    pub fn from_integer(value: impl Into<BigInt>) -> Self {
        Self::new(value, 1)
    }

    pub fn zero() -> Self {
        Self::from_integer(0)
    }

    pub fn numerator(&self) -> &BigInt {
        &self.numerator
    }

    pub fn denominator(&self) -> &BigInt {
        &self.denominator
    }

    pub fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.numerator.is_negative()
    }

    pub fn add(&self, other: impl Into<Fraction>) -> Fraction {
        let other = other.into();
        if self.denominator == other.denominator {
            return Fraction::new(&self.numerator + &other.numerator, self.denominator.clone());
        }
        Fraction::new(
            &self.numerator * &other.denominator + &other.numerator * &self.denominator,
            &self.denominator * &other.denominator,
        )
    }

    pub fn subtract(&self, other: impl Into<Fraction>) -> Fraction {
        let other = other.into();
        if self.denominator == other.denominator {
            return Fraction::new(&self.numerator - &other.numerator, self.denominator.clone());
        }
        Fraction::new(
            &self.numerator * &other.denominator - &other.numerator * &self.denominator,
            &self.denominator * &other.denominator,
        )
    }

    pub fn multiply(&self, other: impl Into<Fraction>) -> Fraction {
        let other = other.into();
        Fraction::new(
            &self.numerator * &other.numerator,
            &self.denominator * &other.denominator,
        )
    }

    /// Panics when dividing by a zero fraction.
    pub fn divide(&self, other: impl Into<Fraction>) -> Fraction {
        let other = other.into();
        Fraction::new(
            &self.numerator * &other.denominator,
            &self.denominator * &other.numerator,
        )
    }

    pub fn invert(&self) -> Fraction {
        Fraction::new(self.denominator.clone(), self.numerator.clone())
    }

    /// Floor division of numerator by denominator.
    pub fn quotient(&self) -> BigInt {
        self.numerator.div_floor(&self.denominator)
    }

    /// Remainder after truncating division, kept over the same denominator.
    pub fn remainder(&self) -> Fraction {
        Fraction::new(&self.numerator % &self.denominator, self.denominator.clone())
    }

    /// Comparison by cross-multiplication: no division before the final
    /// result. Denominators are positive by construction.
    fn cross_cmp(&self, other: &Fraction) -> Ordering {
        (&self.numerator * &other.denominator).cmp(&(&other.numerator * &self.denominator))
    }

    pub fn less_than(&self, other: impl Into<Fraction>) -> bool {
        self.cross_cmp(&other.into()) == Ordering::Less
    }

    pub fn equal_to(&self, other: impl Into<Fraction>) -> bool {
        self.cross_cmp(&other.into()) == Ordering::Equal
    }

    pub fn greater_than(&self, other: impl Into<Fraction>) -> bool {
        self.cross_cmp(&other.into()) == Ordering::Greater
    }

    /// Render with exactly `decimal_places` fractional digits.
    pub fn to_fixed(&self, decimal_places: u32, rounding: Rounding) -> String {
        let scaled = (&self.numerator * pow10(decimal_places)).abs();
        let q = div_round(&scaled, &self.denominator, rounding);
        let sign = if self.numerator.is_negative() && !q.is_zero() {
            "-"
        } else {
            ""
        };
        if decimal_places == 0 {
            return format!("{}{}", sign, q);
        }
        let digits = format!("{:0>width$}", q.to_string(), width = decimal_places as usize + 1);
        let split = digits.len() - decimal_places as usize;
        format!("{}{}.{}", sign, &digits[..split], &digits[split..])
    }

    /// Render with at most `digits` significant digits, trailing zeros
    /// trimmed.
    pub fn to_significant(&self, digits: u32, rounding: Rounding) -> String {
        assert!(digits > 0, "significant digits must be positive");
        if self.numerator.is_zero() {
            return "0".to_string();
        }
        let num = self.numerator.abs();
        let den = &self.denominator;

        // decimal exponent e with 10^e <= |value| < 10^(e+1)
        let compare_pow = |e: i64| -> Ordering {
            if e >= 0 {
                num.cmp(&(den * pow10(e as u32)))
            } else {
                (&num * pow10((-e) as u32)).cmp(den)
            }
        };
        let mut e = num.to_string().len() as i64 - den.to_string().len() as i64;
        if compare_pow(e) == Ordering::Less {
            e -= 1;
        } else if compare_pow(e + 1) != Ordering::Less {
            e += 1;
        }

        let shift = digits as i64 - 1 - e;
        let (scaled_num, scaled_den) = if shift >= 0 {
            (&num * pow10(shift as u32), den.clone())
        } else {
            (num.clone(), den * pow10((-shift) as u32))
        };
        let q = div_round(&scaled_num, &scaled_den, rounding);
        let rendered = q.to_string();
        // rounding can carry into one extra digit (e.g. 999.96 -> 1000)
        if rendered.len() as u32 > digits {
            e += 1;
        }

        let point = e + 1;
        let mut out = if point <= 0 {
            format!("0.{}{}", "0".repeat((-point) as usize), rendered)
        } else if point as usize >= rendered.len() {
            format!("{}{}", rendered, "0".repeat(point as usize - rendered.len()))
        } else {
            format!("{}.{}", &rendered[..point as usize], &rendered[point as usize..])
        };
        if out.contains('.') {
            while out.ends_with('0') {
                out.pop();
            }
            if out.ends_with('.') {
                out.pop();
            }
        }
        if self.numerator.is_negative() && out != "0" {
            format!("-{}", out)
        } else {
            out
        }
    }
}

impl PartialEq for Fraction {
    fn eq(&self, other: &Self) -> bool {
        self.cross_cmp(other) == Ordering::Equal
    }
}

impl Eq for Fraction {}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cross_cmp(other))
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cross_cmp(other)
    }
}

impl From<BigInt> for Fraction {
    fn from(value: BigInt) -> Self {
        Fraction::from_integer(value)
    }
}

impl From<&BigInt> for Fraction {
    fn from(value: &BigInt) -> Self {
        Fraction::from_integer(value.clone())
    }
}

impl From<U256> for Fraction {
    fn from(value: U256) -> Self {
        Fraction::from_integer(bigint_from_u256(value))
    }
}

macro_rules! fraction_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Fraction {
            fn from(value: $t) -> Self {
                Fraction::from_integer(BigInt::from(value))
            }
        })*
    };
}

fraction_from_int!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128);
