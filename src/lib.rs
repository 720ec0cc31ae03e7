//! Derouter - DEX Quote Router v2
//! Built with Domain-Driven Design principles

pub mod application;
pub mod domain;
pub mod exchanges;
pub mod shared;

// Re-export main types for convenience
pub use application::{AggregatedQuotes, QuoteAggregator, QuoteRequest};
pub use domain::currency::{Currency, CurrencyAmount, Price, Token};
pub use domain::numeric::{Fraction, Rounding};
pub use domain::pool::Pair;
pub use domain::routing::{
    best_trade_exact_in, best_trade_exact_out, SearchOptions, Trade, TradeKind, TradeType,
};
pub use exchanges::{AmmQuoteProvider, HttpQuoteProvider, Platform};
