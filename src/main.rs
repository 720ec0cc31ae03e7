mod app;
mod config;
mod report;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "DEX quote router for constant-product pools with multi-venue aggregation")]
struct Args {
    /// Path to config file
    #[arg(long, default_value = "Config.toml")]
    config: String,

    /// Fixed-side amount in human units (overrides config)
    #[arg(long)]
    amount: Option<String>,

    /// Quote a fixed output amount instead of a fixed input
    #[arg(long)]
    exact_out: bool,

    /// Slippage tolerance in basis points (overrides config)
    #[arg(long)]
    slippage_bps: Option<u32>,

    /// Global quote timeout in milliseconds (overrides config)
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Maximum pools per route (overrides config)
    #[arg(long)]
    max_hops: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let cfg = config::Config::from_file(&args.config)?;
    let mut app_cfg = app::AppCfg::from_config(cfg)?;

    // CLI args override the config file
    if let Some(amount) = args.amount {
        app_cfg.amount = amount;
    }
    if args.exact_out {
        app_cfg.exact_out = true;
    }
    if let Some(slippage_bps) = args.slippage_bps {
        app_cfg.slippage_bps = slippage_bps;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        app_cfg.timeout_ms = Some(timeout_ms);
    }
    if let Some(max_hops) = args.max_hops {
        app_cfg.search.max_hops = max_hops;
    }

    app::run(app_cfg).await
}
