//! Generic JSON quote API client
//!
//! Speaks a narrow venue-agnostic schema: the request carries the
//! token addresses and the fixed amount, the response carries both
//! amounts and the venue fee. Anything venue-specific stays on the
//! server side of this interface.

use async_trait::async_trait;
use num_bigint::BigInt;
use reqwest::Client;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::application::QuoteRequest;
use crate::domain::currency::CurrencyAmount;
use crate::domain::routing::{Trade, TradeType};
use crate::shared::errors::ProviderError;
use crate::shared::types::BPS_DENOMINATOR;

use super::super::provider::QuoteProvider;

/// Response from the quote endpoint
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    /// Raw input amount as a decimal string
    #[serde(rename = "amountIn")]
    amount_in: String,
    /// Raw output amount as a decimal string
    #[serde(rename = "amountOut")]
    amount_out: String,
    /// Venue fee in basis points
    #[serde(rename = "feeBps", default)]
    fee_bps: u16,
}

/// External quote provider over a JSON HTTP API
pub struct HttpQuoteProvider {
    name: String,
    http_client: Client,
    base_url: String,
}

impl HttpQuoteProvider {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            http_client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Probe the API with a cheap request.
    pub async fn is_available(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("⚠️ quote API {} is not available: {}", self.name, e);
                false
            }
        }
    }

    async fn fetch(&self, request: &QuoteRequest) -> Result<QuoteResponse, ProviderError> {
        let input = request
            .input_currency()
            .wrapped()
            .ok_or_else(|| ProviderError::Api("input currency has no wrapped token".to_string()))?;
        let output = request
            .output_currency()
            .wrapped()
            .ok_or_else(|| ProviderError::Api("output currency has no wrapped token".to_string()))?;
        let side = match request.trade_type {
            TradeType::ExactIn => "exactIn",
            TradeType::ExactOut => "exactOut",
        };
        let url = format!("{}/quote", self.base_url);
        info!("🔍 fetching quote from {}: {}", self.name, url);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("chainId", request.amount.currency().chain_id().to_string()),
                ("tokenIn", input.address.to_string()),
                ("tokenOut", output.address.to_string()),
                ("tradeType", side.to_string()),
                ("amount", request.amount.raw().to_string()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ProviderError::Api(format!(
                "quote request failed with status {}",
                response.status()
            )));
        }
        response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

#[async_trait]
impl QuoteProvider for HttpQuoteProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn quote(
        &self,
        request: &QuoteRequest,
        cancel: CancellationToken,
    ) -> Result<Option<Trade>, ProviderError> {
        let payload = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(None),
            fetched = self.fetch(request) => fetched?,
        };

        let amount_in: BigInt = payload
            .amount_in
            .parse()
            .map_err(|_| ProviderError::Decode(format!("bad amountIn '{}'", payload.amount_in)))?;
        let amount_out: BigInt = payload
            .amount_out
            .parse()
            .map_err(|_| ProviderError::Decode(format!("bad amountOut '{}'", payload.amount_out)))?;

        let input = CurrencyAmount::new(request.input_currency().clone(), amount_in.clone())
            .map_err(|e| ProviderError::Decode(e.to_string()))?;
        let output = CurrencyAmount::new(request.output_currency().clone(), amount_out)
            .map_err(|e| ProviderError::Decode(e.to_string()))?;
        let fee_raw = amount_in * BigInt::from(payload.fee_bps) / BigInt::from(BPS_DENOMINATOR);
        let fee = CurrencyAmount::new(request.input_currency().clone(), fee_raw)
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        let trade = Trade::external(
            self.name.clone(),
            request.trade_type,
            input,
            output,
            fee,
            request.max_slippage_bps,
        )
        .map_err(|e| ProviderError::Api(e.to_string()))?;
        Ok(Some(trade))
    }
}
