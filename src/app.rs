// src/app.rs
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use num_bigint::BigInt;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use derouter::domain::routing::SearchOptions;
use derouter::shared::errors::AggregatorError;
use derouter::shared::types::Address;
use derouter::{
    AmmQuoteProvider, Currency, CurrencyAmount, HttpQuoteProvider, Pair, Platform,
    QuoteAggregator, QuoteRequest, Token,
};

use crate::config::{Config, PoolCfg, TokenInfo};
use crate::report::QuoteReport;

#[derive(Debug, Clone)]
pub struct AppCfg {
    pub chain_id: u64,
    pub token_in: TokenInfo,
    pub token_out: TokenInfo,
    pub amount: String,
    pub slippage_bps: u32,
    pub timeout_ms: Option<u64>,
    pub exact_out: bool,
    pub search: SearchOptions,
    pub pools: Vec<PoolCfg>,
    pub providers: Vec<crate::config::ProviderCfg>,
}

impl AppCfg {
    pub fn from_config(cfg: Config) -> Result<Self> {
        let defaults = SearchOptions::default();
        Ok(Self {
            chain_id: cfg.tokens.chain_id,
            token_in: cfg.tokens.token_in,
            token_out: cfg.tokens.token_out,
            amount: cfg.trade.amount,
            slippage_bps: cfg.trade.slippage_bps,
            timeout_ms: cfg.trade.timeout_ms,
            exact_out: cfg.trade.exact_out.unwrap_or(false),
            search: SearchOptions {
                max_hops: cfg.trade.max_hops.unwrap_or(defaults.max_hops),
                max_num_results: cfg.trade.max_results.unwrap_or(defaults.max_num_results),
            },
            pools: cfg.pools,
            providers: cfg.providers,
        })
    }
}

/// Parse a human-unit decimal amount into raw units, exactly.
fn parse_amount(text: &str, decimals: u8) -> Result<BigInt> {
    let (whole, frac) = match text.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (text, ""),
    };
    if frac.len() > decimals as usize {
        return Err(anyhow!(
            "amount '{}' has more than {} decimal places",
            text,
            decimals
        ));
    }
    if whole.is_empty() && frac.is_empty() {
        return Err(anyhow!("empty amount"));
    }
    let whole: BigInt = if whole.is_empty() {
        BigInt::from(0)
    } else {
        whole.parse().context("parse amount")?
    };
    let mut frac_raw = BigInt::from(0);
    if !frac.is_empty() {
        let parsed: BigInt = frac.parse().context("parse amount fraction")?;
        frac_raw = parsed * BigInt::from(10u8).pow(decimals as u32 - frac.len() as u32);
    }
    Ok(whole * BigInt::from(10u8).pow(decimals as u32) + frac_raw)
}

fn build_token(chain_id: u64, info: &TokenInfo) -> Result<Token> {
    let address: Address = info
        .address
        .parse()
        .map_err(|_| anyhow!("invalid token address '{}'", info.address))?;
    Ok(Token::new(
        chain_id,
        address,
        info.decimals,
        Some(info.symbol.clone()),
        None,
    ))
}

fn build_pool(chain_id: u64, cfg: &PoolCfg) -> Result<Pair> {
    let platform = Platform::from_name(&cfg.platform)
        .ok_or_else(|| anyhow!("unknown platform '{}'", cfg.platform))?;
    let token_a = build_token(chain_id, &cfg.token_a)?;
    let token_b = build_token(chain_id, &cfg.token_b)?;
    let reserve_a: BigInt = cfg.reserve_a.parse().context("parse reserve_a")?;
    let reserve_b: BigInt = cfg.reserve_b.parse().context("parse reserve_b")?;
    let amount_a = CurrencyAmount::new(Currency::Token(token_a), reserve_a)?;
    let amount_b = CurrencyAmount::new(Currency::Token(token_b), reserve_b)?;
    let pair = match cfg.fee_bps {
        Some(fee_bps) => Pair::new(amount_a, amount_b, fee_bps, platform)?,
        None => Pair::with_default_fee(amount_a, amount_b, platform)?,
    };
    Ok(pair)
}

pub async fn run(cfg: AppCfg) -> Result<()> {
    let token_in = build_token(cfg.chain_id, &cfg.token_in)?;
    let token_out = build_token(cfg.chain_id, &cfg.token_out)?;

    let pools = cfg
        .pools
        .iter()
        .map(|p| build_pool(cfg.chain_id, p))
        .collect::<Result<Vec<_>>>()?;
    info!("🔧 Loaded {} pool snapshots", pools.len());

    let mut platforms: Vec<Platform> = pools.iter().map(|p| p.platform()).collect();
    platforms.sort_by_key(|p| p.name());
    platforms.dedup();

    let graph = Arc::new(derouter::exchanges::StaticPoolGraph::new(pools));
    let mut aggregator = QuoteAggregator::new();
    if let Some(timeout_ms) = cfg.timeout_ms {
        aggregator = aggregator.with_timeout(Duration::from_millis(timeout_ms));
    }
    for platform in platforms {
        info!("🔧 Registering AMM search on {}", platform.name());
        aggregator.register(Arc::new(
            AmmQuoteProvider::new(platform, graph.clone()).with_options(cfg.search),
        ));
    }
    for provider in &cfg.providers {
        info!("🔧 Registering external provider {}", provider.name);
        aggregator.register(Arc::new(HttpQuoteProvider::new(
            provider.name.clone(),
            provider.base_url.clone(),
        )));
    }

    let request = if cfg.exact_out {
        let amount_raw = parse_amount(&cfg.amount, token_out.decimals)?;
        let amount = CurrencyAmount::new(Currency::Token(token_out), amount_raw)?;
        QuoteRequest::exact_out(Currency::Token(token_in), amount, cfg.slippage_bps)
    } else {
        let amount_raw = parse_amount(&cfg.amount, token_in.decimals)?;
        let amount = CurrencyAmount::new(Currency::Token(token_in), amount_raw)?;
        QuoteRequest::exact_in(amount, Currency::Token(token_out), cfg.slippage_bps)
    };

    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("🛑 interrupt received, cancelling");
            ctrl_c_cancel.cancel();
        }
    });

    match aggregator.aggregate(&request, cancel).await {
        Ok(quotes) => {
            let report = QuoteReport::new(&request, &quotes);
            println!("{}", report.to_json()?);
        }
        Err(AggregatorError::Cancelled) => {
            warn!("🛑 aggregation cancelled, no quotes returned");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1.5", 6).unwrap(), BigInt::from(1_500_000));
        assert_eq!(parse_amount("0.000001", 6).unwrap(), BigInt::from(1));
        assert_eq!(parse_amount("2", 6).unwrap(), BigInt::from(2_000_000));
        assert_eq!(parse_amount(".5", 6).unwrap(), BigInt::from(500_000));
        assert!(parse_amount("1.1234567", 6).is_err());
        assert!(parse_amount("", 6).is_err());
    }
}
