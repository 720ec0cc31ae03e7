//! Trade quotes and their ranking

use std::cmp::Ordering;

use num_bigint::BigInt;

use crate::domain::currency::{Currency, CurrencyAmount, Price};
use crate::domain::numeric::Fraction;
use crate::exchanges::Platform;
use crate::shared::errors::{AmountError, PairError, TradeError};
use crate::shared::types::BPS_DENOMINATOR;

use super::Route;

/// Whether the fixed side of the trade is the input or the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeType {
    ExactIn,
    ExactOut,
}

/// Where a trade came from: the in-process pool model, or an external
/// quote source. Venue-specific trades are variants, not subclasses;
/// the shared payload lives once on [`Trade`].
#[derive(Debug, Clone)]
pub enum TradeKind {
    Amm { route: Route },
    External { provider: String },
}

/// A priced swap, immutable once constructed.
#[derive(Debug, Clone)]
pub struct Trade {
    kind: TradeKind,
    trade_type: TradeType,
    input_amount: CurrencyAmount,
    output_amount: CurrencyAmount,
    execution_price: Price,
    price_impact: Fraction,
    max_slippage_bps: u32,
    fee_amount: CurrencyAmount,
}

impl Trade {
    /// Price a fixed input amount along a route.
    pub fn exact_in(
        route: Route,
        amount_in: &CurrencyAmount,
        max_slippage_bps: u32,
    ) -> Result<Trade, TradeError> {
        if !amount_in.currency().equals(route.input()) {
            return Err(AmountError::CurrencyMismatch {
                left: amount_in.currency().label(),
                right: route.input().label(),
            }
            .into());
        }
        let mut amount = CurrencyAmount::new(
            Currency::Token(route.path()[0].clone()),
            amount_in.raw().clone(),
        )
        .map_err(PairError::from)?;
        for pair in route.pairs() {
            let (output, _) = pair.get_output_amount(&amount)?;
            amount = output;
        }
        let output_amount = CurrencyAmount::new(route.output().clone(), amount.raw().clone())
            .map_err(PairError::from)?;
        Self::assemble(
            TradeType::ExactIn,
            route,
            amount_in.clone(),
            output_amount,
            max_slippage_bps,
        )
    }

    /// Price a fixed output amount along a route, walking it backwards.
    pub fn exact_out(
        route: Route,
        amount_out: &CurrencyAmount,
        max_slippage_bps: u32,
    ) -> Result<Trade, TradeError> {
        if !amount_out.currency().equals(route.output()) {
            return Err(AmountError::CurrencyMismatch {
                left: amount_out.currency().label(),
                right: route.output().label(),
            }
            .into());
        }
        let last = route.path().len() - 1;
        let mut amount = CurrencyAmount::new(
            Currency::Token(route.path()[last].clone()),
            amount_out.raw().clone(),
        )
        .map_err(PairError::from)?;
        for pair in route.pairs().iter().rev() {
            let (input, _) = pair.get_input_amount(&amount)?;
            amount = input;
        }
        let input_amount = CurrencyAmount::new(route.input().clone(), amount.raw().clone())
            .map_err(PairError::from)?;
        Self::assemble(
            TradeType::ExactOut,
            route,
            input_amount,
            amount_out.clone(),
            max_slippage_bps,
        )
    }

    fn assemble(
        trade_type: TradeType,
        route: Route,
        input_amount: CurrencyAmount,
        output_amount: CurrencyAmount,
        max_slippage_bps: u32,
    ) -> Result<Trade, TradeError> {
        if input_amount.is_zero() {
            return Err(PairError::InsufficientInputAmount.into());
        }
        let execution_price = Price::from_raw(
            input_amount.currency().clone(),
            output_amount.currency().clone(),
            input_amount.raw().clone(),
            output_amount.raw().clone(),
        );

        // loss versus the no-impact mid-price valuation of the input
        let mid = route.mid_price()?;
        let expected = mid.raw().multiply(input_amount.raw());
        let price_impact = if expected.is_zero() {
            Fraction::zero()
        } else {
            expected
                .subtract(Fraction::from(output_amount.raw()))
                .divide(expected)
        };

        // realized LP fee, denominated in the input currency
        let mut remaining = Fraction::from_integer(1);
        for pair in route.pairs() {
            remaining = remaining.multiply(Fraction::new(
                BPS_DENOMINATOR - pair.fee_bps(),
                BPS_DENOMINATOR,
            ));
        }
        let fee_raw = Fraction::from_integer(1)
            .subtract(remaining)
            .multiply(input_amount.raw())
            .quotient();
        let fee_amount = CurrencyAmount::new(input_amount.currency().clone(), fee_raw)
            .map_err(PairError::from)?;

        Ok(Trade {
            kind: TradeKind::Amm { route },
            trade_type,
            input_amount,
            output_amount,
            execution_price,
            price_impact,
            max_slippage_bps,
            fee_amount,
        })
    }

    /// Wrap a quote obtained from an external venue.
    pub fn external(
        provider: impl Into<String>,
        trade_type: TradeType,
        input_amount: CurrencyAmount,
        output_amount: CurrencyAmount,
        fee_amount: CurrencyAmount,
        max_slippage_bps: u32,
    ) -> Result<Trade, TradeError> {
        if input_amount.is_zero() {
            return Err(PairError::InsufficientInputAmount.into());
        }
        let execution_price = Price::from_raw(
            input_amount.currency().clone(),
            output_amount.currency().clone(),
            input_amount.raw().clone(),
            output_amount.raw().clone(),
        );
        Ok(Trade {
            kind: TradeKind::External {
                provider: provider.into(),
            },
            trade_type,
            input_amount,
            output_amount,
            execution_price,
            // unknown for external quotes
            price_impact: Fraction::zero(),
            max_slippage_bps,
            fee_amount,
        })
    }

    pub fn kind(&self) -> &TradeKind {
        &self.kind
    }

    pub fn route(&self) -> Option<&Route> {
        match &self.kind {
            TradeKind::Amm { route } => Some(route),
            TradeKind::External { .. } => None,
        }
    }

    pub fn trade_type(&self) -> TradeType {
        self.trade_type
    }

    pub fn input_amount(&self) -> &CurrencyAmount {
        &self.input_amount
    }

    pub fn output_amount(&self) -> &CurrencyAmount {
        &self.output_amount
    }

    pub fn execution_price(&self) -> &Price {
        &self.execution_price
    }

    pub fn price_impact(&self) -> &Fraction {
        &self.price_impact
    }

    pub fn max_slippage_bps(&self) -> u32 {
        self.max_slippage_bps
    }

    pub fn fee_amount(&self) -> &CurrencyAmount {
        &self.fee_amount
    }

    pub fn platform(&self) -> Option<Platform> {
        self.route().map(|r| r.platform())
    }

    /// Venue label for display: the platform name or the provider name.
    pub fn venue(&self) -> String {
        match &self.kind {
            TradeKind::Amm { route } => route.platform().name().to_string(),
            TradeKind::External { provider } => provider.clone(),
        }
    }

    /// The least output the trade may settle at under the slippage
    /// tolerance. Exact-out trades settle the output exactly.
    pub fn minimum_amount_out(&self) -> Result<CurrencyAmount, AmountError> {
        match self.trade_type {
            TradeType::ExactOut => Ok(self.output_amount.clone()),
            TradeType::ExactIn => {
                let raw = (self.output_amount.raw() * BigInt::from(BPS_DENOMINATOR))
                    / (BigInt::from(BPS_DENOMINATOR) + BigInt::from(self.max_slippage_bps));
                CurrencyAmount::new(self.output_amount.currency().clone(), raw)
            }
        }
    }

    /// The most input the trade may consume under the slippage
    /// tolerance. Exact-in trades spend the input exactly.
    pub fn maximum_amount_in(&self) -> Result<CurrencyAmount, AmountError> {
        match self.trade_type {
            TradeType::ExactIn => Ok(self.input_amount.clone()),
            TradeType::ExactOut => {
                let raw = (self.input_amount.raw()
                    * (BigInt::from(BPS_DENOMINATOR) + BigInt::from(self.max_slippage_bps)))
                    / BigInt::from(BPS_DENOMINATOR);
                CurrencyAmount::new(self.input_amount.currency().clone(), raw)
            }
        }
    }
}

/// Ranking comparator: `Less` means "better, sort first".
///
/// Exact-in prefers higher output, then smaller input; exact-out
/// prefers smaller input, then higher output. Exact ties keep discovery
/// order (sorting callers insert stably). Comparing trades with
/// differing input/output currencies is a caller bug; sorting callers
/// validate currencies up front.
pub fn trade_comparator(a: &Trade, b: &Trade) -> Ordering {
    debug_assert!(
        a.input_amount.currency().equals(b.input_amount.currency())
            && a.output_amount.currency().equals(b.output_amount.currency()),
        "compared trades must share input and output currencies"
    );
    match a.trade_type {
        TradeType::ExactIn => b
            .output_amount
            .raw()
            .cmp(a.output_amount.raw())
            .then_with(|| a.input_amount.raw().cmp(b.input_amount.raw())),
        TradeType::ExactOut => a
            .input_amount
            .raw()
            .cmp(b.input_amount.raw())
            .then_with(|| b.output_amount.raw().cmp(a.output_amount.raw())),
    }
}
