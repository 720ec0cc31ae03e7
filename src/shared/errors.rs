//! Error handling for the application

use thiserror::Error;

/// Amount and price arithmetic errors
///
/// These are caller bugs and fail fast: nothing in the search or the
/// aggregator catches them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AmountError {
    #[error("currency mismatch: {left} vs {right}")]
    CurrencyMismatch { left: String, right: String },

    #[error("value out of range: {0}")]
    ValueOutOfRange(String),
}

/// Pair-level errors
///
/// `InsufficientReserves` and `InsufficientInputAmount` are recoverable:
/// the route search treats them as "skip this branch".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PairError {
    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error("insufficient reserves")]
    InsufficientReserves,

    #[error("insufficient input amount")]
    InsufficientInputAmount,

    #[error("identical token addresses")]
    IdenticalAddresses,

    #[error("pair requires token currencies on one chain")]
    InvalidTokens,
}

/// Route construction errors, fatal for that route
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error("route has no pairs")]
    EmptyRoute,

    #[error("route pairs span multiple chains")]
    ChainMismatch,

    #[error("route pairs span multiple platforms")]
    PlatformMismatch,

    #[error("route pairs do not chain at hop {0}")]
    Disconnected(usize),

    #[error("input currency not in first pair")]
    InvalidInput,

    #[error("output currency not in last pair")]
    InvalidOutput,

    #[error("currency has no wrapped token on chain {0}")]
    UnwrappableCurrency(u64),
}

/// Trade construction errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TradeError {
    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error(transparent)]
    Pair(#[from] PairError),

    #[error(transparent)]
    Route(#[from] RouteError),
}

/// External quote source errors
///
/// Captured into the aggregator's error list; never fails sibling
/// providers or the overall call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("response decode failed: {0}")]
    Decode(String),

    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// Aggregation call outcome errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregatorError {
    #[error("aggregation cancelled")]
    Cancelled,
}
