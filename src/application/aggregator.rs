//! Quote aggregation across providers
//!
//! Fans out one request to every registered provider under a single
//! cancellation signal, collects per-provider failures without failing
//! the batch, and returns a deterministically ranked trade list.
//! Cancellation is all-or-nothing: once the signal fires, completed
//! partial results are discarded. A provider's HTTP call may still run
//! to completion out-of-band; its result is ignored.

use std::sync::Arc;
use std::time::Duration;

use futures::future::{self, join_all};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::domain::routing::{trade_comparator, Trade};
use crate::exchanges::QuoteProvider;
use crate::shared::errors::{AggregatorError, ProviderError};

use super::QuoteRequest;

/// One provider's failure, reported alongside successful trades.
#[derive(Debug, Clone)]
pub struct ProviderFailure {
    pub provider: String,
    pub error: ProviderError,
}

/// Result of one aggregation call; created fresh per call, never
/// persisted.
#[derive(Debug, Default)]
pub struct AggregatedQuotes {
    /// Ranked best-first by the trade comparator.
    pub trades: Vec<Trade>,
    pub errors: Vec<ProviderFailure>,
}

/// Fans a quote request out to registered providers.
#[derive(Default)]
pub struct QuoteAggregator {
    providers: Vec<Arc<dyn QuoteProvider>>,
    timeout: Option<Duration>,
}

impl QuoteAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a global deadline; elapsing counts as cancellation.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn register(&mut self, provider: Arc<dyn QuoteProvider>) -> &mut Self {
        self.providers.push(provider);
        self
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Run the fan-out.
    ///
    /// Resolves to the merged, sorted trades and the per-provider
    /// errors, or to [`AggregatorError::Cancelled`] if the token fires
    /// (or the deadline elapses) first. Never rejects on provider
    /// failures alone: all-fail yields an empty trade list with one
    /// error per failed provider.
    pub async fn aggregate(
        &self,
        request: &QuoteRequest,
        cancel: CancellationToken,
    ) -> Result<AggregatedQuotes, AggregatorError> {
        let cancel = cancel.child_token();
        info!(
            "🔄 aggregating quotes from {} providers",
            self.providers.len()
        );

        // every provider runs as its own task: a panic or a slow venue
        // never takes the siblings down with it
        let handles: Vec<_> = self
            .providers
            .iter()
            .map(|provider| {
                let provider = Arc::clone(provider);
                let token = cancel.clone();
                let request = request.clone();
                let name = provider.name().to_string();
                let handle =
                    tokio::spawn(async move { provider.quote(&request, token).await });
                (name, handle)
            })
            .collect();
        let fan_out = join_all(handles.into_iter().map(|(name, handle)| async move {
            let outcome = match handle.await {
                Ok(result) => result,
                Err(join_error) => Err(ProviderError::Api(format!(
                    "provider task failed: {}",
                    join_error
                ))),
            };
            (name, outcome)
        }));
        let deadline = async {
            match self.timeout {
                Some(timeout) => sleep(timeout).await,
                None => future::pending::<()>().await,
            }
        };

        let results = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("🛑 aggregation cancelled by caller");
                return Err(AggregatorError::Cancelled);
            }
            _ = deadline => {
                warn!("🛑 aggregation timed out");
                cancel.cancel();
                return Err(AggregatorError::Cancelled);
            }
            results = fan_out => results,
        };

        let mut quotes = AggregatedQuotes::default();
        for (name, outcome) in results {
            match outcome {
                Ok(Some(trade)) => {
                    // a trade answering a different request must not
                    // reach the comparator; charge it to the provider
                    if trade.trade_type() != request.trade_type
                        || !trade
                            .input_amount()
                            .currency()
                            .equals(request.input_currency())
                        || !trade
                            .output_amount()
                            .currency()
                            .equals(request.output_currency())
                    {
                        quotes.errors.push(ProviderFailure {
                            provider: name,
                            error: ProviderError::Api(
                                "quote does not match the request".to_string(),
                            ),
                        });
                        continue;
                    }
                    quotes.trades.push(trade);
                }
                Ok(None) => {}
                Err(error) => {
                    warn!("⚠️ provider {} failed: {}", name, error);
                    quotes.errors.push(ProviderFailure {
                        provider: name,
                        error,
                    });
                }
            }
        }

        // stable sort: ties keep provider registration order
        quotes.trades.sort_by(trade_comparator);
        info!(
            "✅ aggregation finished: {} trades, {} errors",
            quotes.trades.len(),
            quotes.errors.len()
        );
        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use num_bigint::BigInt;

    use crate::domain::currency::{Currency, CurrencyAmount, Token};
    use crate::domain::routing::TradeType;
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

    fn request() -> QuoteRequest {
        QuoteRequest::exact_in(amount(&token(1, "AAA"), 1_000), Currency::Token(token(2, "BBB")), 50)
    }

    enum Behavior {
        Trade { output_raw: u128 },
        WrongCurrency,
        NoTrade,
        Fail,
        HangUntilCancelled,
    }

    struct MockProvider {
        name: String,
        behavior: Behavior,
    }

    impl MockProvider {
        fn new(name: &str, behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                behavior,
            })
        }
    }

    #[async_trait]
    impl QuoteProvider for MockProvider {
        fn name(&self) -> &str {
            &self.name
        }

        async fn quote(
            &self,
            request: &QuoteRequest,
            cancel: CancellationToken,
        ) -> Result<Option<Trade>, ProviderError> {
            match &self.behavior {
                Behavior::Trade { output_raw } => {
                    let output = CurrencyAmount::new(
                        request.output_currency().clone(),
                        BigInt::from(*output_raw),
                    )
                    .unwrap();
                    let fee =
                        CurrencyAmount::new(request.input_currency().clone(), 0u64).unwrap();
                    Ok(Some(
                        Trade::external(
                            self.name.clone(),
                            TradeType::ExactIn,
                            request.amount.clone(),
                            output,
                            fee,
                            request.max_slippage_bps,
                        )
                        .unwrap(),
                    ))
                }
                Behavior::WrongCurrency => {
                    let bogus = token(9, "ZZZ");
                    let output =
                        CurrencyAmount::new(Currency::Token(bogus), 1_000u64).unwrap();
                    let fee =
                        CurrencyAmount::new(request.input_currency().clone(), 0u64).unwrap();
                    Ok(Some(
                        Trade::external(
                            self.name.clone(),
                            TradeType::ExactIn,
                            request.amount.clone(),
                            output,
                            fee,
                            request.max_slippage_bps,
                        )
                        .unwrap(),
                    ))
                }
                Behavior::NoTrade => Ok(None),
                Behavior::Fail => Err(ProviderError::Api("venue exploded".to_string())),
                Behavior::HangUntilCancelled => {
                    cancel.cancelled().await;
                    Ok(None)
                }
            }
        }
    }

    #[tokio::test]
    async fn test_merges_and_ranks_trades() {
        let mut aggregator = QuoteAggregator::new();
        aggregator.register(MockProvider::new("worse", Behavior::Trade { output_raw: 900 }));
        aggregator.register(MockProvider::new("better", Behavior::Trade { output_raw: 990 }));
        aggregator.register(MockProvider::new("silent", Behavior::NoTrade));

        let quotes = aggregator
            .aggregate(&request(), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(quotes.trades.len(), 2);
        assert_eq!(quotes.trades[0].venue(), "better");
        assert_eq!(quotes.trades[1].venue(), "worse");
        assert!(quotes.errors.is_empty());
    }

    #[tokio::test]
    async fn test_ties_keep_registration_order() {
        let mut aggregator = QuoteAggregator::new();
        aggregator.register(MockProvider::new("first", Behavior::Trade { output_raw: 990 }));
        aggregator.register(MockProvider::new("second", Behavior::Trade { output_raw: 990 }));

        let quotes = aggregator
            .aggregate(&request(), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(quotes.trades[0].venue(), "first");
        assert_eq!(quotes.trades[1].venue(), "second");
    }

    #[tokio::test]
    async fn test_failures_do_not_fail_the_batch() {
        let mut aggregator = QuoteAggregator::new();
        aggregator.register(MockProvider::new("broken", Behavior::Fail));
        aggregator.register(MockProvider::new("works", Behavior::Trade { output_raw: 990 }));

        let quotes = aggregator
            .aggregate(&request(), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(quotes.trades.len(), 1);
        assert_eq!(quotes.errors.len(), 1);
        assert_eq!(quotes.errors[0].provider, "broken");
    }

    #[tokio::test]
    async fn test_all_fail_yields_empty_trades_and_all_errors() {
        let mut aggregator = QuoteAggregator::new();
        aggregator.register(MockProvider::new("a", Behavior::Fail));
        aggregator.register(MockProvider::new("b", Behavior::Fail));

        let quotes = aggregator
            .aggregate(&request(), CancellationToken::new())
            .await
            .unwrap();
        assert!(quotes.trades.is_empty());
        assert_eq!(quotes.errors.len(), 2);
    }

    #[tokio::test]
    async fn test_zero_providers_resolve_immediately() {
        let aggregator = QuoteAggregator::new();
        let quotes = aggregator
            .aggregate(&request(), CancellationToken::new())
            .await
            .unwrap();
        assert!(quotes.trades.is_empty());
        assert!(quotes.errors.is_empty());
    }

    #[tokio::test]
    async fn test_pre_cancelled_call_is_cancelled() {
        let mut aggregator = QuoteAggregator::new();
        aggregator.register(MockProvider::new("fine", Behavior::Trade { output_raw: 990 }));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = aggregator.aggregate(&request(), cancel).await;
        assert!(matches!(outcome, Err(AggregatorError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancellation_discards_partial_results() {
        let mut aggregator = QuoteAggregator::new();
        aggregator.register(MockProvider::new("fast", Behavior::Trade { output_raw: 990 }));
        aggregator.register(MockProvider::new("stuck", Behavior::HangUntilCancelled));
        let cancel = CancellationToken::new();

        let canceller = cancel.clone();
        let cancel_task = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });
        let outcome = aggregator.aggregate(&request(), cancel).await;
        cancel_task.await.unwrap();
        // the fast provider already resolved, but cancellation is
        // all-or-nothing at this boundary
        assert!(matches!(outcome, Err(AggregatorError::Cancelled)));
    }

    #[tokio::test]
    async fn test_timeout_counts_as_cancellation() {
        let mut aggregator = QuoteAggregator::new().with_timeout(Duration::from_millis(20));
        aggregator.register(MockProvider::new("stuck", Behavior::HangUntilCancelled));

        let outcome = aggregator
            .aggregate(&request(), CancellationToken::new())
            .await;
        assert!(matches!(outcome, Err(AggregatorError::Cancelled)));
    }

    #[tokio::test]
    async fn test_mismatched_currency_charged_to_provider() {
        let mut aggregator = QuoteAggregator::new();
        aggregator.register(MockProvider::new("liar", Behavior::WrongCurrency));
        aggregator.register(MockProvider::new("honest", Behavior::Trade { output_raw: 990 }));

        let quotes = aggregator
            .aggregate(&request(), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(quotes.trades.len(), 1);
        assert_eq!(quotes.trades[0].venue(), "honest");
        assert_eq!(quotes.errors.len(), 1);
        assert_eq!(quotes.errors[0].provider, "liar");
    }
}
