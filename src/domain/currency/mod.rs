//! Currencies, currency-bound amounts and exchange rates

mod amount;
mod currency;
mod price;

pub use amount::CurrencyAmount;
pub use currency::{Currency, NativeAsset, Token};
pub use price::Price;
