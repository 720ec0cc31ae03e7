//! Venue registry and quote-source interfaces

pub mod amm;
pub mod api_clients;
pub mod provider;

use alloy_primitives::{address, b256};

use crate::shared::types::{chains, Address, ChainId, B256};

pub use amm::AmmQuoteProvider;
pub use api_clients::HttpQuoteProvider;
pub use provider::{PairReserves, PoolGraphSource, QuoteProvider, ReserveSource, StaticPoolGraph};

/// A supported constant-product venue.
///
/// Each platform carries the CREATE2 salt pair (factory address and pair
/// init-code hash) used to derive pair addresses, plus its default swap
/// fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Swapline,
    Uniswap,
    Sushiswap,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Swapline, Platform::Uniswap, Platform::Sushiswap];

    pub fn name(&self) -> &'static str {
        match self {
            Platform::Swapline => "swapline",
            Platform::Uniswap => "uniswap-v2",
            Platform::Sushiswap => "sushiswap",
        }
    }

    pub fn from_name(name: &str) -> Option<Platform> {
        Platform::ALL.into_iter().find(|p| p.name() == name)
    }

    /// The factory deployment used for pair-address derivation.
    ///
    /// Chains without a dedicated deployment fall back to the primary
    /// one; derivation stays a total, deterministic function.
    pub fn factory(&self, chain_id: ChainId) -> Address {
        match self {
            Platform::Swapline => match chain_id {
                chains::GNOSIS => address!("5D48C95AdfFD4B40c1AAADc4e08fc44117E02179"),
                chains::ARBITRUM_ONE => address!("359F20Ad0F42D75a5077e65F30274cABe6f4F01a"),
                _ => address!("d34971BaB6E5E356fd250715F5dE0492BB070452"),
            },
            Platform::Uniswap => address!("5C69bEe701ef814a2B6a3EDD4B1652CB9cc5aA6f"),
            Platform::Sushiswap => address!("C0AEe478e3658e2610c5F7A4A2E1777cE9e4f2Ac"),
        }
    }

    /// keccak256 of the pair contract creation code.
    pub fn init_code_hash(&self) -> B256 {
        match self {
            Platform::Swapline => {
                b256!("d306a548755b9295ee49cc729e13ca4a45e00199bbd890fa146da43a50571776")
            }
            Platform::Uniswap => {
                b256!("96e8ac4277198ff8b6f785478aa9a39f403cb768dd02cbe574a913e250248299")
            }
            Platform::Sushiswap => {
                b256!("e18a34eb0e04b04f7a0ac29a6e80748dca96319b42c54d679cb821dca90c6303")
            }
        }
    }

    pub fn default_fee_bps(&self) -> u16 {
        match self {
            Platform::Swapline => 25,
            Platform::Uniswap | Platform::Sushiswap => 30,
        }
    }

    pub fn lp_token_symbol(&self) -> &'static str {
        match self {
            Platform::Swapline => "SLP",
            Platform::Uniswap => "UNI-V2",
            Platform::Sushiswap => "SUSHI-LP",
        }
    }

    pub fn lp_token_name(&self) -> &'static str {
        match self {
            Platform::Swapline => "Swapline LP Token",
            Platform::Uniswap => "Uniswap V2",
            Platform::Sushiswap => "SushiSwap LP Token",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_round_trips_by_name() {
        for platform in Platform::ALL {
            assert_eq!(Platform::from_name(platform.name()), Some(platform));
        }
        assert_eq!(Platform::from_name("unknown"), None);
    }

    #[test]
    fn test_factory_fallback_is_total() {
        // unknown chain still yields a deterministic factory
        let a = Platform::Swapline.factory(999_999);
        let b = Platform::Swapline.factory(999_999);
        assert_eq!(a, b);
    }
}
