//! Token and native-asset representation

use std::hash::{Hash, Hasher};

use crate::shared::types::{chains, Address, ChainId};

/// An ERC-20 style token, identified by `(chain_id, address)`.
#[derive(Debug, Clone, Eq)]
pub struct Token {
    pub chain_id: ChainId,
    pub address: Address,
    pub decimals: u8,
    pub symbol: Option<String>,
    pub name: Option<String>,
}

impl Token {
    pub fn new(
        chain_id: ChainId,
        address: Address,
        decimals: u8,
        symbol: Option<String>,
        name: Option<String>,
    ) -> Self {
        Self {
            chain_id,
            address,
            decimals,
            symbol,
            name,
        }
    }

    pub fn equals(&self, other: &Token) -> bool {
        self.chain_id == other.chain_id && self.address == other.address
    }

    /// Canonical ordering: lexicographic by address bytes.
    pub fn sorts_before(&self, other: &Token) -> bool {
        self.address < other.address
    }

    pub fn label(&self) -> String {
        self.symbol
            .clone()
            .unwrap_or_else(|| self.address.to_string())
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.chain_id.hash(state);
        self.address.hash(state);
    }
}

/// The chain's native asset; one singleton per chain, no address identity.
#[derive(Debug, Clone, Eq)]
pub struct NativeAsset {
    pub chain_id: ChainId,
    pub decimals: u8,
    pub symbol: Option<String>,
    pub name: Option<String>,
}

impl PartialEq for NativeAsset {
    fn eq(&self, other: &Self) -> bool {
        self.chain_id == other.chain_id
    }
}

impl Hash for NativeAsset {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.chain_id.hash(state);
    }
}

/// A currency is either a chain's native asset or a token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Currency {
    Native(NativeAsset),
    Token(Token),
}

impl Currency {
    /// The native asset singleton for a known chain.
    pub fn native(chain_id: ChainId) -> Option<Currency> {
        let (symbol, name) = match chain_id {
            chains::MAINNET | chains::ARBITRUM_ONE => ("ETH", "Ether"),
            chains::GNOSIS => ("XDAI", "xDAI"),
            _ => return None,
        };
        Some(Currency::Native(NativeAsset {
            chain_id,
            decimals: 18,
            symbol: Some(symbol.to_string()),
            name: Some(name.to_string()),
        }))
    }

    pub fn chain_id(&self) -> ChainId {
        match self {
            Currency::Native(n) => n.chain_id,
            Currency::Token(t) => t.chain_id,
        }
    }

    pub fn decimals(&self) -> u8 {
        match self {
            Currency::Native(n) => n.decimals,
            Currency::Token(t) => t.decimals,
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Currency::Native(_))
    }

    pub fn equals(&self, other: &Currency) -> bool {
        self == other
    }

    /// The token this currency trades as: the token itself, or the
    /// canonical wrapper for a native asset.
    pub fn wrapped(&self) -> Option<Token> {
        match self {
            Currency::Token(t) => Some(t.clone()),
            Currency::Native(n) => wrapped_native(n.chain_id),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Currency::Native(n) => n
                .symbol
                .clone()
                .unwrap_or_else(|| format!("native:{}", n.chain_id)),
            Currency::Token(t) => t.label(),
        }
    }
}

fn wrapped_native(chain_id: ChainId) -> Option<Token> {
    use alloy_primitives::address;

    let (address, symbol, name) = match chain_id {
        chains::MAINNET => (
            address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"),
            "WETH",
            "Wrapped Ether",
        ),
        chains::GNOSIS => (
            address!("e91D153E0b41518A2Ce8Dd3D7944Fa863463a97d"),
            "WXDAI",
            "Wrapped xDAI",
        ),
        chains::ARBITRUM_ONE => (
            address!("82aF49447D8a07e3bd95BD0d56f35241523fBab1"),
            "WETH",
            "Wrapped Ether",
        ),
        _ => return None,
    };
    Some(Token::new(
        chain_id,
        address,
        18,
        Some(symbol.to_string()),
        Some(name.to_string()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(chain_id: ChainId, byte: u8) -> Token {
        Token::new(chain_id, Address::repeat_byte(byte), 18, None, None)
    }

    #[test]
    fn test_token_identity() {
        let a = token(chains::MAINNET, 1);
        let mut b = token(chains::MAINNET, 1);
        b.symbol = Some("AAA".to_string());
        // identity is (chain, address); metadata does not matter
        assert!(a.equals(&b));
        assert!(!a.equals(&token(chains::GNOSIS, 1)));
    }

    #[test]
    fn test_native_singleton_per_chain() {
        let eth = Currency::native(chains::MAINNET).unwrap();
        let eth2 = Currency::native(chains::MAINNET).unwrap();
        let xdai = Currency::native(chains::GNOSIS).unwrap();
        assert!(eth.equals(&eth2));
        assert!(!eth.equals(&xdai));
        assert!(!eth.equals(&Currency::Token(token(chains::MAINNET, 1))));
    }

    #[test]
    fn test_wrapped() {
        let eth = Currency::native(chains::MAINNET).unwrap();
        let weth = eth.wrapped().unwrap();
        assert_eq!(weth.symbol.as_deref(), Some("WETH"));
        let t = token(chains::MAINNET, 9);
        assert!(Currency::Token(t.clone()).wrapped().unwrap().equals(&t));
    }

    #[test]
    fn test_sort_order() {
        let low = token(chains::MAINNET, 1);
        let high = token(chains::MAINNET, 2);
        assert!(low.sorts_before(&high));
        assert!(!high.sorts_before(&low));
    }
}
