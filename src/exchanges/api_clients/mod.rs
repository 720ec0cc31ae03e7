//! HTTP clients for external quote APIs

mod http_provider;

pub use http_provider::HttpQuoteProvider;
