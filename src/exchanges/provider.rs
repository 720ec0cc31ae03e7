//! Quote-source interfaces
//!
//! The aggregation layer consumes every venue through these narrow
//! traits; transport concerns (RPC, HTTP, indexers) stay behind them.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::application::QuoteRequest;
use crate::domain::currency::Currency;
use crate::domain::pool::Pair;
use crate::domain::routing::Trade;
use crate::shared::errors::ProviderError;
use crate::shared::types::{Address, U256};

use super::Platform;

/// Raw reserve snapshot for one pair, as read from the chain.
#[derive(Debug, Clone, Copy)]
pub struct PairReserves {
    pub reserve0: U256,
    pub reserve1: U256,
    pub fee_bps: u16,
}

/// An asynchronous quote source.
///
/// Implementations must honor the cancellation token and must not let
/// errors escape uncaught past this boundary; the aggregator wraps
/// defensively regardless.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Resolve to `Ok(None)` when the provider has no trade for the
    /// request (including when cancelled mid-flight).
    async fn quote(
        &self,
        request: &QuoteRequest,
        cancel: CancellationToken,
    ) -> Result<Option<Trade>, ProviderError>;
}

/// Reads reserve snapshots used to build [`Pair`] values before a
/// search. Batching is a caller concern.
#[async_trait]
pub trait ReserveSource: Send + Sync {
    async fn fetch_reserves(&self, pair_address: Address) -> Result<PairReserves, ProviderError>;
}

/// Supplies the candidate pools connecting two currencies on one
/// platform.
#[async_trait]
pub trait PoolGraphSource: Send + Sync {
    async fn pairs(
        &self,
        currency_a: &Currency,
        currency_b: &Currency,
        platform: Platform,
    ) -> Result<Vec<Pair>, ProviderError>;
}

/// A fixed, in-memory pool graph.
///
/// Backs offline runs and tests; a subgraph- or chain-backed source
/// implements the same trait.
#[derive(Debug, Default)]
pub struct StaticPoolGraph {
    pairs: Vec<Pair>,
}

impl StaticPoolGraph {
    pub fn new(pairs: Vec<Pair>) -> Self {
        Self { pairs }
    }
}

#[async_trait]
impl PoolGraphSource for StaticPoolGraph {
    async fn pairs(
        &self,
        currency_a: &Currency,
        _currency_b: &Currency,
        platform: Platform,
    ) -> Result<Vec<Pair>, ProviderError> {
        Ok(self
            .pairs
            .iter()
            .filter(|pair| pair.platform() == platform && pair.chain_id() == currency_a.chain_id())
            .cloned()
            .collect())
    }
}
