use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Clone, Deserialize)]
pub struct TokenInfo {
    pub address: String,
    pub symbol: String,
    pub decimals: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokensCfg {
    pub chain_id: u64,
    pub token_in: TokenInfo,
    pub token_out: TokenInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TradeCfg {
    /// Fixed-side amount in human units, e.g. "1.5"
    pub amount: String,
    pub slippage_bps: u32,
    pub timeout_ms: Option<u64>,
    pub exact_out: Option<bool>,
    pub max_hops: Option<usize>,
    pub max_results: Option<usize>,
}

/// An offline reserve snapshot for one pool
#[derive(Debug, Clone, Deserialize)]
pub struct PoolCfg {
    pub platform: String,
    pub token_a: TokenInfo,
    pub token_b: TokenInfo,
    /// Raw reserves in the tokens' smallest units
    pub reserve_a: String,
    pub reserve_b: String,
    /// Defaults to the platform's swap fee
    pub fee_bps: Option<u16>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderCfg {
    pub name: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub tokens: TokensCfg,
    pub trade: TradeCfg,
    #[serde(default)]
    pub pools: Vec<PoolCfg>,
    #[serde(default)]
    pub providers: Vec<ProviderCfg>,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path.as_ref())?;
        let cfg: Self = toml::from_str(&s).context("parse Config.toml")?;
        Ok(cfg)
    }
}
