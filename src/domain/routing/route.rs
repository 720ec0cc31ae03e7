//! Multi-hop route representation

use crate::domain::currency::{Currency, Price, Token};
use crate::domain::pool::Pair;
use crate::exchanges::Platform;
use crate::shared::errors::RouteError;
use crate::shared::types::ChainId;

/// An ordered sequence of pairs connecting an input currency to an
/// output currency on a single chain and platform.
///
/// `path[i]` is the token entering hop `i`; `path` has one more entry
/// than `pairs`.
#[derive(Debug, Clone)]
pub struct Route {
    pairs: Vec<Pair>,
    path: Vec<Token>,
    input: Currency,
    output: Currency,
}

impl Route {
    pub fn new(pairs: Vec<Pair>, input: Currency, output: Currency) -> Result<Route, RouteError> {
        let first = pairs.first().ok_or(RouteError::EmptyRoute)?;
        let chain_id = first.chain_id();
        if pairs.iter().any(|p| p.chain_id() != chain_id) {
            return Err(RouteError::ChainMismatch);
        }
        if input.chain_id() != chain_id || output.chain_id() != chain_id {
            return Err(RouteError::ChainMismatch);
        }
        let platform = first.platform();
        if pairs.iter().any(|p| p.platform() != platform) {
            return Err(RouteError::PlatformMismatch);
        }

        let wrapped_input = input
            .wrapped()
            .ok_or(RouteError::UnwrappableCurrency(chain_id))?;
        let wrapped_output = output
            .wrapped()
            .ok_or(RouteError::UnwrappableCurrency(chain_id))?;
        if !first.involves(&wrapped_input) {
            return Err(RouteError::InvalidInput);
        }

        let mut path = vec![wrapped_input];
        for (hop, pair) in pairs.iter().enumerate() {
            let current = &path[hop];
            let next = pair
                .other_token(current)
                .map_err(|_| RouteError::Disconnected(hop))?
                .clone();
            path.push(next);
        }
        if !path[path.len() - 1].equals(&wrapped_output) {
            return Err(RouteError::InvalidOutput);
        }

        Ok(Route {
            pairs,
            path,
            input,
            output,
        })
    }

    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    pub fn path(&self) -> &[Token] {
        &self.path
    }

    pub fn input(&self) -> &Currency {
        &self.input
    }

    pub fn output(&self) -> &Currency {
        &self.output
    }

    pub fn chain_id(&self) -> ChainId {
        self.pairs[0].chain_id()
    }

    pub fn platform(&self) -> Platform {
        self.pairs[0].platform()
    }

    pub fn hops(&self) -> usize {
        self.pairs.len()
    }

    /// Composite mid-price: per-hop prices folded left-to-right.
    pub fn mid_price(&self) -> Result<Price, RouteError> {
        let mut folded: Option<Price> = None;
        for (hop, pair) in self.pairs.iter().enumerate() {
            let hop_price = pair
                .price_of(&self.path[hop])
                .map_err(|_| RouteError::Disconnected(hop))?;
            folded = Some(match folded {
                None => hop_price,
                Some(acc) => acc.multiply(&hop_price)?,
            });
        }
        // rebind to the route's own (possibly native) currencies; the
        // wrapped tokens share their decimals so the raw ratio carries
        let folded = folded.ok_or(RouteError::EmptyRoute)?;
        Ok(Price::from_raw(
            self.input.clone(),
            self.output.clone(),
            folded.raw().denominator().clone(),
            folded.raw().numerator().clone(),
        ))
    }
}
