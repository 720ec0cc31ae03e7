//! Normalized quote requests

use crate::domain::currency::{Currency, CurrencyAmount};
use crate::domain::routing::TradeType;
use crate::shared::types::Address;

/// One aggregation request: a fixed amount on one side and the desired
/// currency on the other.
#[derive(Debug, Clone)]
pub struct QuoteRequest {
    pub trade_type: TradeType,
    /// The fixed side: input for exact-in, output for exact-out.
    pub amount: CurrencyAmount,
    /// The opposite side's currency.
    pub other_currency: Currency,
    pub max_slippage_bps: u32,
    pub receiver: Option<Address>,
}

impl QuoteRequest {
    pub fn exact_in(
        amount_in: CurrencyAmount,
        currency_out: Currency,
        max_slippage_bps: u32,
    ) -> Self {
        Self {
            trade_type: TradeType::ExactIn,
            amount: amount_in,
            other_currency: currency_out,
            max_slippage_bps,
            receiver: None,
        }
    }

    pub fn exact_out(
        currency_in: Currency,
        amount_out: CurrencyAmount,
        max_slippage_bps: u32,
    ) -> Self {
        Self {
            trade_type: TradeType::ExactOut,
            amount: amount_out,
            other_currency: currency_in,
            max_slippage_bps,
            receiver: None,
        }
    }

    pub fn with_receiver(mut self, receiver: Address) -> Self {
        self.receiver = Some(receiver);
        self
    }

    pub fn input_currency(&self) -> &Currency {
        match self.trade_type {
            TradeType::ExactIn => self.amount.currency(),
            TradeType::ExactOut => &self.other_currency,
        }
    }

    pub fn output_currency(&self) -> &Currency {
        match self.trade_type {
            TradeType::ExactIn => &self.other_currency,
            TradeType::ExactOut => self.amount.currency(),
        }
    }
}
