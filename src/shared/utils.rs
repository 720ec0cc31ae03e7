//! Utility functions and helpers

use num_bigint::{BigInt, Sign};

use super::types::U256;

/// Convert a `U256` into an arbitrary-precision integer
pub fn bigint_from_u256(value: U256) -> BigInt {
    BigInt::from_bytes_be(Sign::Plus, &value.to_be_bytes::<32>())
}
