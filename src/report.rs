// src/report.rs
use chrono::{DateTime, Utc};
use serde::Serialize;

use derouter::{AggregatedQuotes, QuoteRequest, Rounding, Trade, TradeType};

/// Quote aggregation report, rendered to the caller as JSON
#[derive(Debug, Serialize)]
pub struct QuoteReport {
    pub request: RequestDetails,
    pub quotes: Vec<QuoteDetails>,
    pub errors: Vec<ErrorDetails>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct RequestDetails {
    pub trade_type: String,
    pub token_in: String,
    pub token_out: String,
    /// The fixed-side amount, in human units
    pub amount: String,
    pub slippage_bps: u32,
}

#[derive(Debug, Serialize)]
pub struct QuoteDetails {
    pub venue: String,
    pub amount_in: String,
    pub amount_out: String,
    pub execution_price: String,
    pub price_impact_pct: String,
    pub fee_amount: String,
    /// Route length for AMM quotes; absent for external venues
    pub hops: Option<usize>,
    pub path: Option<Vec<String>>,
    pub guaranteed_amount: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub provider: String,
    pub error: String,
}

fn quote_details(trade: &Trade) -> QuoteDetails {
    let guaranteed = match trade.trade_type() {
        TradeType::ExactIn => trade
            .minimum_amount_out()
            .map(|a| a.to_significant(6, Rounding::RoundDown)),
        TradeType::ExactOut => trade
            .maximum_amount_in()
            .map(|a| a.to_significant(6, Rounding::RoundDown)),
    }
    .unwrap_or_else(|e| format!("<{}>", e));
    QuoteDetails {
        venue: trade.venue(),
        amount_in: trade.input_amount().to_significant(6, Rounding::RoundDown),
        amount_out: trade.output_amount().to_significant(6, Rounding::RoundDown),
        execution_price: trade
            .execution_price()
            .to_significant(6, Rounding::RoundHalfUp),
        price_impact_pct: trade
            .price_impact()
            .multiply(100u32)
            .to_fixed(2, Rounding::RoundHalfUp),
        fee_amount: trade.fee_amount().to_significant(6, Rounding::RoundDown),
        hops: trade.route().map(|r| r.hops()),
        path: trade
            .route()
            .map(|r| r.path().iter().map(|t| t.label()).collect()),
        guaranteed_amount: guaranteed,
    }
}

impl QuoteReport {
    pub fn new(request: &QuoteRequest, quotes: &AggregatedQuotes) -> Self {
        Self {
            request: RequestDetails {
                trade_type: match request.trade_type {
                    TradeType::ExactIn => "exact-in".to_string(),
                    TradeType::ExactOut => "exact-out".to_string(),
                },
                token_in: request.input_currency().label(),
                token_out: request.output_currency().label(),
                amount: request.amount.to_significant(6, Rounding::RoundDown),
                slippage_bps: request.max_slippage_bps,
            },
            quotes: quotes.trades.iter().map(quote_details).collect(),
            errors: quotes
                .errors
                .iter()
                .map(|failure| ErrorDetails {
                    provider: failure.provider.clone(),
                    error: failure.error.to_string(),
                })
                .collect(),
            timestamp: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use derouter::shared::types::{chains, Address};
    use derouter::{Currency, CurrencyAmount, Token};
    use tokio_util::sync::CancellationToken;

    fn token(byte: u8, symbol: &str) -> Token {
        Token::new(
            chains::MAINNET,
            Address::repeat_byte(byte),
            18,
            Some(symbol.to_string()),
            None,
        )
    }

    #[tokio::test]
    async fn test_report_round_trips_to_json() {
        let a = token(1, "AAA");
        let b = token(2, "BBB");
        let pair = derouter::Pair::new(
            CurrencyAmount::new(Currency::Token(a.clone()), 1_000_000u64).unwrap(),
            CurrencyAmount::new(Currency::Token(b.clone()), 1_000_000u64).unwrap(),
            30,
            derouter::Platform::Uniswap,
        )
        .unwrap();
        let graph = std::sync::Arc::new(derouter::exchanges::StaticPoolGraph::new(vec![pair]));
        let mut aggregator = derouter::QuoteAggregator::new();
        aggregator.register(std::sync::Arc::new(derouter::AmmQuoteProvider::new(
            derouter::Platform::Uniswap,
            graph,
        )));

        let request = QuoteRequest::exact_in(
            CurrencyAmount::new(Currency::Token(a), 1_000u64).unwrap(),
            Currency::Token(b),
            50,
        );
        let quotes = aggregator
            .aggregate(&request, CancellationToken::new())
            .await
            .unwrap();
        let report = QuoteReport::new(&request, &quotes);
        assert_eq!(report.quotes.len(), 1);
        assert_eq!(report.quotes[0].hops, Some(1));

        let json = report.to_json().unwrap();
        assert!(json.contains("exact-in"));
        assert!(json.contains("uniswap-v2"));
    }
}
