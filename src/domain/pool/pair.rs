//! Constant-product pair model
//!
//! A pair is an immutable value: a swap returns the computed amount
//! together with a new pair reflecting the updated reserves. All math
//! is arbitrary-precision integer math; reserve products routinely
//! exceed 2^64 and intermediate products exceed 2^128.

use num_bigint::BigInt;
use num_integer::Roots;
use num_traits::{Signed, Zero};

use crate::domain::currency::{Currency, CurrencyAmount, Price, Token};
use crate::exchanges::Platform;
use crate::shared::errors::{AmountError, PairError};
use crate::shared::types::{
    Address, ChainId, BPS_DENOMINATOR, MINIMUM_LIQUIDITY, PROTOCOL_FEE_DENOMINATOR,
};

use super::identity;

/// A two-sided constant-product liquidity pool.
///
/// Tokens are kept in canonical order (lexicographic by address), so
/// `token0`/`reserve0` are well-defined regardless of construction
/// order.
#[derive(Debug, Clone)]
pub struct Pair {
    platform: Platform,
    fee_bps: u16,
    token0: Token,
    token1: Token,
    reserve0: CurrencyAmount,
    reserve1: CurrencyAmount,
}

impl Pair {
    pub fn new(
        amount_a: CurrencyAmount,
        amount_b: CurrencyAmount,
        fee_bps: u16,
        platform: Platform,
    ) -> Result<Pair, PairError> {
        let (token_a, token_b) = match (amount_a.currency(), amount_b.currency()) {
            (Currency::Token(a), Currency::Token(b)) => (a.clone(), b.clone()),
            _ => return Err(PairError::InvalidTokens),
        };
        if token_a.chain_id != token_b.chain_id {
            return Err(PairError::InvalidTokens);
        }
        if token_a.address == token_b.address {
            return Err(PairError::IdenticalAddresses);
        }
        if fee_bps >= BPS_DENOMINATOR {
            return Err(AmountError::ValueOutOfRange(format!(
                "swap fee {} bps exceeds the basis-point denominator",
                fee_bps
            ))
            .into());
        }
        let (token0, token1, reserve0, reserve1) = if token_a.sorts_before(&token_b) {
            (token_a, token_b, amount_a, amount_b)
        } else {
            (token_b, token_a, amount_b, amount_a)
        };
        Ok(Pair {
            platform,
            fee_bps,
            token0,
            token1,
            reserve0,
            reserve1,
        })
    }

    /// Construct with the platform's default swap fee.
    pub fn with_default_fee(
        amount_a: CurrencyAmount,
        amount_b: CurrencyAmount,
        platform: Platform,
    ) -> Result<Pair, PairError> {
        let fee = platform.default_fee_bps();
        Pair::new(amount_a, amount_b, fee, platform)
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn fee_bps(&self) -> u16 {
        self.fee_bps
    }

    pub fn chain_id(&self) -> ChainId {
        self.token0.chain_id
    }

    pub fn token0(&self) -> &Token {
        &self.token0
    }

    pub fn token1(&self) -> &Token {
        &self.token1
    }

    pub fn reserve0(&self) -> &CurrencyAmount {
        &self.reserve0
    }

    pub fn reserve1(&self) -> &CurrencyAmount {
        &self.reserve1
    }

    pub fn involves(&self, token: &Token) -> bool {
        self.token0.equals(token) || self.token1.equals(token)
    }

    pub fn reserve_of(&self, token: &Token) -> Result<&CurrencyAmount, PairError> {
        if self.token0.equals(token) {
            Ok(&self.reserve0)
        } else if self.token1.equals(token) {
            Ok(&self.reserve1)
        } else {
            Err(self.not_involved(token))
        }
    }

    pub fn other_token(&self, token: &Token) -> Result<&Token, PairError> {
        if self.token0.equals(token) {
            Ok(&self.token1)
        } else if self.token1.equals(token) {
            Ok(&self.token0)
        } else {
            Err(self.not_involved(token))
        }
    }

    fn not_involved(&self, token: &Token) -> PairError {
        AmountError::CurrencyMismatch {
            left: token.label(),
            right: format!("{}/{}", self.token0.label(), self.token1.label()),
        }
        .into()
    }

    /// The pair's deterministic address, derived CREATE2-style from the
    /// platform salt and the ordered token addresses.
    pub fn address(&self) -> Address {
        identity::pair_address(
            self.platform,
            self.chain_id(),
            self.token0.address,
            self.token1.address,
        )
    }

    /// The pair's LP share token: 18 decimals at the pair address.
    pub fn liquidity_token(&self) -> Token {
        Token::new(
            self.chain_id(),
            self.address(),
            18,
            Some(self.platform.lp_token_symbol().to_string()),
            Some(self.platform.lp_token_name().to_string()),
        )
    }

    /// Mid-price of `token0` denominated in `token1`.
    pub fn token0_price(&self) -> Price {
        Price::from_raw(
            Currency::Token(self.token0.clone()),
            Currency::Token(self.token1.clone()),
            self.reserve0.raw().clone(),
            self.reserve1.raw().clone(),
        )
    }

    /// Mid-price of `token1` denominated in `token0`.
    pub fn token1_price(&self) -> Price {
        Price::from_raw(
            Currency::Token(self.token1.clone()),
            Currency::Token(self.token0.clone()),
            self.reserve1.raw().clone(),
            self.reserve0.raw().clone(),
        )
    }

    pub fn price_of(&self, token: &Token) -> Result<Price, PairError> {
        if self.token0.equals(token) {
            Ok(self.token0_price())
        } else if self.token1.equals(token) {
            Ok(self.token1_price())
        } else {
            Err(self.not_involved(token))
        }
    }

    /// Exact swap output for a given input, and the pair after the swap.
    ///
    /// `out = floor(in' * reserve_out / (reserve_in * 10000 + in'))`
    /// with `in' = in * (10000 - fee_bps)`.
    pub fn get_output_amount(
        &self,
        input: &CurrencyAmount,
    ) -> Result<(CurrencyAmount, Pair), PairError> {
        let input_token = self.token_of(input)?;
        if self.reserve0.is_zero() || self.reserve1.is_zero() {
            return Err(PairError::InsufficientReserves);
        }
        let output_token = self.other_token(&input_token)?.clone();
        let reserve_in = self.reserve_of(&input_token)?;
        let reserve_out = self.reserve_of(&output_token)?;

        let input_after_fee = input.raw() * BigInt::from(BPS_DENOMINATOR - self.fee_bps);
        let numerator = &input_after_fee * reserve_out.raw();
        let denominator = reserve_in.raw() * BigInt::from(BPS_DENOMINATOR) + &input_after_fee;
        let output_raw = numerator / denominator;
        if output_raw.is_zero() {
            return Err(PairError::InsufficientInputAmount);
        }
        let output = CurrencyAmount::new(Currency::Token(output_token), output_raw)?;

        let next = Pair::new(
            reserve_in.add(input)?,
            reserve_out.subtract(&output)?,
            self.fee_bps,
            self.platform,
        )?;
        Ok((output, next))
    }

    /// Exact swap input required for a desired output, and the pair
    /// after the swap.
    ///
    /// The `+1` after the floor division is a contractual rounding rule:
    /// the pool never under-collects.
    pub fn get_input_amount(
        &self,
        output: &CurrencyAmount,
    ) -> Result<(CurrencyAmount, Pair), PairError> {
        let output_token = self.token_of(output)?;
        if self.reserve0.is_zero() || self.reserve1.is_zero() {
            return Err(PairError::InsufficientReserves);
        }
        let reserve_out = self.reserve_of(&output_token)?;
        if output.raw() >= reserve_out.raw() {
            return Err(PairError::InsufficientReserves);
        }
        let input_token = self.other_token(&output_token)?.clone();
        let reserve_in = self.reserve_of(&input_token)?;

        let numerator = reserve_in.raw() * output.raw() * BigInt::from(BPS_DENOMINATOR);
        let denominator =
            (reserve_out.raw() - output.raw()) * BigInt::from(BPS_DENOMINATOR - self.fee_bps);
        let input_raw = numerator / denominator + 1;
        let input = CurrencyAmount::new(Currency::Token(input_token), input_raw)?;

        let next = Pair::new(
            reserve_in.add(&input)?,
            reserve_out.subtract(output)?,
            self.fee_bps,
            self.platform,
        )?;
        Ok((input, next))
    }

    /// LP shares minted for supplying `amount_a`/`amount_b` against the
    /// current reserves.
    pub fn get_liquidity_minted(
        &self,
        total_supply: &CurrencyAmount,
        amount_a: &CurrencyAmount,
        amount_b: &CurrencyAmount,
    ) -> Result<CurrencyAmount, PairError> {
        let lp_currency = self.require_lp_currency(total_supply)?;
        let token_a = self.token_of(amount_a)?;
        let token_b = self.token_of(amount_b)?;
        if token_a.equals(&token_b) {
            return Err(PairError::IdenticalAddresses);
        }
        let (amount0, amount1) = if token_a.equals(&self.token0) {
            (amount_a, amount_b)
        } else {
            (amount_b, amount_a)
        };

        let liquidity = if total_supply.raw().is_zero() {
            (amount0.raw() * amount1.raw()).sqrt() - BigInt::from(MINIMUM_LIQUIDITY)
        } else {
            let minted0 = amount0.raw() * total_supply.raw() / self.reserve0.raw();
            let minted1 = amount1.raw() * total_supply.raw() / self.reserve1.raw();
            minted0.min(minted1)
        };
        if liquidity.is_negative() || liquidity.is_zero() {
            return Err(PairError::InsufficientInputAmount);
        }
        Ok(CurrencyAmount::new(lp_currency, liquidity)?)
    }

    /// Value of `liquidity` LP shares in one of the pair's tokens.
    ///
    /// When protocol fees are on and `k_last` is non-zero, the supply is
    /// first inflated by the fee liquidity accrued since the last
    /// liquidity event.
    pub fn get_liquidity_value(
        &self,
        token: &Token,
        total_supply: &CurrencyAmount,
        liquidity: &CurrencyAmount,
        fee_on: bool,
        k_last: Option<&BigInt>,
    ) -> Result<CurrencyAmount, PairError> {
        let _ = self.require_lp_currency(total_supply)?;
        let _ = self.require_lp_currency(liquidity)?;
        let reserve = self.reserve_of(token)?;
        if liquidity.raw() > total_supply.raw() {
            return Err(AmountError::ValueOutOfRange(
                "liquidity exceeds total supply".to_string(),
            )
            .into());
        }

        let mut adjusted_supply = total_supply.raw().clone();
        if fee_on {
            if let Some(k_last) = k_last.filter(|k| !k.is_zero()) {
                let root_k = (self.reserve0.raw() * self.reserve1.raw()).sqrt();
                let root_k_last = k_last.sqrt();
                if root_k > root_k_last {
                    let numerator = total_supply.raw() * (&root_k - &root_k_last);
                    let denominator =
                        &root_k * BigInt::from(PROTOCOL_FEE_DENOMINATOR) + &root_k_last;
                    adjusted_supply += numerator / denominator;
                }
            }
        }

        let value = liquidity.raw() * reserve.raw() / adjusted_supply;
        Ok(CurrencyAmount::new(
            Currency::Token(token.clone()),
            value,
        )?)
    }

    fn token_of(&self, amount: &CurrencyAmount) -> Result<Token, PairError> {
        match amount.currency() {
            Currency::Token(t) if self.involves(t) => Ok(t.clone()),
            currency => Err(AmountError::CurrencyMismatch {
                left: currency.label(),
                right: format!("{}/{}", self.token0.label(), self.token1.label()),
            }
            .into()),
        }
    }

    fn require_lp_currency(&self, amount: &CurrencyAmount) -> Result<Currency, PairError> {
        let lp = self.liquidity_token();
        match amount.currency() {
            Currency::Token(t) if t.equals(&lp) => Ok(Currency::Token(lp)),
            currency => Err(AmountError::CurrencyMismatch {
                left: currency.label(),
                right: lp.label(),
            }
            .into()),
        }
    }
}
