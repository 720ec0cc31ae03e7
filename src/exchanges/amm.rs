//! In-process AMM quote provider
//!
//! Runs the best-trade search over one platform's pool graph and
//! contributes the winning trade to the aggregation, side by side with
//! external venues.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::application::QuoteRequest;
use crate::domain::routing::{best_trade_exact_in, best_trade_exact_out, SearchOptions, Trade, TradeType};
use crate::shared::errors::ProviderError;

use super::provider::{PoolGraphSource, QuoteProvider};
use super::Platform;

pub struct AmmQuoteProvider {
    platform: Platform,
    graph: Arc<dyn PoolGraphSource>,
    options: SearchOptions,
}

impl AmmQuoteProvider {
    pub fn new(platform: Platform, graph: Arc<dyn PoolGraphSource>) -> Self {
        Self {
            platform,
            graph,
            options: SearchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }
}

#[async_trait]
impl QuoteProvider for AmmQuoteProvider {
    fn name(&self) -> &str {
        self.platform.name()
    }

    async fn quote(
        &self,
        request: &QuoteRequest,
        cancel: CancellationToken,
    ) -> Result<Option<Trade>, ProviderError> {
        let input_currency = request.input_currency();
        let output_currency = request.output_currency();

        // the graph fetch is the only suspension point; the search
        // itself is pure and synchronous
        let pairs = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(None),
            fetched = self.graph.pairs(input_currency, output_currency, self.platform) => fetched?,
        };
        debug!(
            platform = self.platform.name(),
            pools = pairs.len(),
            "running best-trade search"
        );

        let trades = match request.trade_type {
            TradeType::ExactIn => best_trade_exact_in(
                &pairs,
                &request.amount,
                output_currency,
                request.max_slippage_bps,
                self.options,
            ),
            TradeType::ExactOut => best_trade_exact_out(
                &pairs,
                input_currency,
                &request.amount,
                request.max_slippage_bps,
                self.options,
            ),
        }
        .map_err(|e| ProviderError::Api(e.to_string()))?;

        Ok(trades.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::currency::{Currency, CurrencyAmount, Token};
    use crate::domain::pool::Pair;
    use crate::exchanges::provider::StaticPoolGraph;
    use crate::shared::types::{chains, Address};

    fn token(byte: u8, symbol: &str) -> Token {
        Token::new(
            chains::MAINNET,
            Address::repeat_byte(byte),
            18,
            Some(symbol.to_string()),
            None,
        )
    }

    fn amount(token: &Token, raw: u128) -> CurrencyAmount {
        CurrencyAmount::new(Currency::Token(token.clone()), raw).unwrap()
    }

    #[tokio::test]
    async fn test_quotes_best_search_result() {
        let a = token(1, "AAA");
        let b = token(2, "BBB");
        let graph = Arc::new(StaticPoolGraph::new(vec![Pair::new(
            amount(&a, 1_000_000),
            amount(&b, 1_000_000),
            30,
            Platform::Uniswap,
        )
        .unwrap()]));
        let provider = AmmQuoteProvider::new(Platform::Uniswap, graph);
        let request = QuoteRequest::exact_in(amount(&a, 1_000), Currency::Token(b), 50);

        let trade = provider
            .quote(&request, CancellationToken::new())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(trade.output_amount().raw(), &num_bigint::BigInt::from(996));
        assert_eq!(trade.venue(), "uniswap-v2");
    }

    #[tokio::test]
    async fn test_no_route_resolves_to_none() {
        let a = token(1, "AAA");
        let b = token(2, "BBB");
        let provider = AmmQuoteProvider::new(
            Platform::Uniswap,
            Arc::new(StaticPoolGraph::new(vec![])),
        );
        let request = QuoteRequest::exact_in(amount(&a, 1_000), Currency::Token(b), 50);
        let trade = provider
            .quote(&request, CancellationToken::new())
            .await
            .unwrap();
        assert!(trade.is_none());
    }

    #[tokio::test]
    async fn test_pre_cancelled_token_short_circuits() {
        let a = token(1, "AAA");
        let b = token(2, "BBB");
        let provider = AmmQuoteProvider::new(
            Platform::Uniswap,
            Arc::new(StaticPoolGraph::new(vec![])),
        );
        let request = QuoteRequest::exact_in(amount(&a, 1_000), Currency::Token(b), 50);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let trade = provider.quote(&request, cancel).await.unwrap();
        assert!(trade.is_none());
    }
}
