//! Common types used across the application

pub use alloy_primitives::{Address, B256, U256};

/// EVM chain identifier
pub type ChainId = u64;

/// Basis-point denominator (10000 = 100%)
pub const BPS_DENOMINATOR: u16 = 10_000;

/// Liquidity permanently locked on the first mint of a pair
pub const MINIMUM_LIQUIDITY: u64 = 1_000;

/// Share of swap-fee growth minted to the protocol on liquidity events (1/6th)
pub const PROTOCOL_FEE_DENOMINATOR: u64 = 5;

/// Well-known chain ids
pub mod chains {
    use super::ChainId;

    pub const MAINNET: ChainId = 1;
    pub const GNOSIS: ChainId = 100;
    pub const ARBITRUM_ONE: ChainId = 42_161;
}
