//! Routes, trades and the best-trade search

mod route;
mod search;
mod trade;

pub use route::Route;
pub use search::{best_trade_exact_in, best_trade_exact_out, SearchOptions};
pub use trade::{trade_comparator, Trade, TradeKind, TradeType};
