//! Best-trade search over a pair graph
//!
//! Bounded depth-first enumeration of simple paths: a pair is never
//! revisited within one path and paths never loop back through the
//! origin token. Reserve-insufficiency on a branch prunes the branch,
//! it never aborts the whole search.

use std::cmp::Ordering;

use crate::domain::currency::{Currency, CurrencyAmount, Token};
use crate::domain::pool::Pair;
use crate::shared::errors::{PairError, RouteError, TradeError};

use super::{trade_comparator, Route, Trade};

/// Bounds for the path enumeration.
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    /// Maximum number of trades returned, best first.
    pub max_num_results: usize,
    /// Maximum pools a single path may cross.
    pub max_hops: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_num_results: 3,
            max_hops: 3,
        }
    }
}

/// Insert keeping the list sorted by the comparator, stably: an equal
/// candidate lands after the trades already found. Truncates to
/// `max_size`.
fn sorted_insert(trades: &mut Vec<Trade>, trade: Trade, max_size: usize) {
    let position = trades
        .iter()
        .position(|existing| trade_comparator(&trade, existing) == Ordering::Less)
        .unwrap_or(trades.len());
    trades.insert(position, trade);
    trades.truncate(max_size);
}

fn is_recoverable(error: &TradeError) -> bool {
    matches!(
        error,
        TradeError::Pair(PairError::InsufficientReserves)
            | TradeError::Pair(PairError::InsufficientInputAmount)
    )
}

/// Top-K trades spending exactly `amount_in`, ranked by output amount.
pub fn best_trade_exact_in(
    pairs: &[Pair],
    amount_in: &CurrencyAmount,
    currency_out: &Currency,
    max_slippage_bps: u32,
    options: SearchOptions,
) -> Result<Vec<Trade>, TradeError> {
    let mut best = Vec::new();
    if options.max_hops == 0 || options.max_num_results == 0 || pairs.is_empty() {
        return Ok(best);
    }
    let chain_id = amount_in.currency().chain_id();
    let wrapped_in = amount_in
        .currency()
        .wrapped()
        .ok_or(RouteError::UnwrappableCurrency(chain_id))?;
    let wrapped_out = currency_out
        .wrapped()
        .ok_or(RouteError::UnwrappableCurrency(currency_out.chain_id()))?;
    let start = CurrencyAmount::new(Currency::Token(wrapped_in.clone()), amount_in.raw().clone())
        .map_err(PairError::from)?;

    let mut current_pairs = Vec::new();
    exact_in_step(
        pairs,
        amount_in,
        currency_out,
        &wrapped_in,
        &wrapped_out,
        &start,
        &mut current_pairs,
        options.max_hops,
        max_slippage_bps,
        options.max_num_results,
        &mut best,
    )?;
    Ok(best)
}

#[allow(clippy::too_many_arguments)]
fn exact_in_step(
    pairs: &[Pair],
    original_amount_in: &CurrencyAmount,
    currency_out: &Currency,
    origin: &Token,
    target: &Token,
    current_amount: &CurrencyAmount,
    current_pairs: &mut Vec<Pair>,
    hops_left: usize,
    max_slippage_bps: u32,
    max_num_results: usize,
    best: &mut Vec<Trade>,
) -> Result<(), TradeError> {
    for pair in pairs {
        if let Currency::Token(frontier) = current_amount.currency() {
            if !pair.involves(frontier) {
                continue;
            }
        }
        if current_pairs
            .iter()
            .any(|used| used.address() == pair.address())
        {
            continue;
        }
        if let Some(first) = current_pairs.first() {
            if pair.platform() != first.platform() {
                continue;
            }
        }

        let (output, _) = match pair.get_output_amount(current_amount) {
            Ok(result) => result,
            Err(PairError::InsufficientReserves) | Err(PairError::InsufficientInputAmount) => {
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        let reached = match output.currency() {
            Currency::Token(t) => t.clone(),
            _ => continue,
        };

        if reached.equals(target) {
            // materialize with the original, un-decayed input amount
            current_pairs.push(pair.clone());
            let route = Route::new(
                current_pairs.clone(),
                original_amount_in.currency().clone(),
                currency_out.clone(),
            );
            let candidate =
                route.map_err(TradeError::from).and_then(|route| {
                    Trade::exact_in(route, original_amount_in, max_slippage_bps)
                });
            current_pairs.pop();
            match candidate {
                Ok(trade) => sorted_insert(best, trade, max_num_results),
                Err(ref e) if is_recoverable(e) => {}
                Err(e) => return Err(e),
            }
        } else if reached.equals(origin) {
            // looping back through the origin token cannot improve
            continue;
        } else if hops_left > 1 {
            current_pairs.push(pair.clone());
            exact_in_step(
                pairs,
                original_amount_in,
                currency_out,
                origin,
                target,
                &output,
                current_pairs,
                hops_left - 1,
                max_slippage_bps,
                max_num_results,
                best,
            )?;
            current_pairs.pop();
        }
    }
    Ok(())
}

/// Top-K trades delivering exactly `amount_out`, ranked by input
/// amount. The graph is walked backwards from the output token.
pub fn best_trade_exact_out(
    pairs: &[Pair],
    currency_in: &Currency,
    amount_out: &CurrencyAmount,
    max_slippage_bps: u32,
    options: SearchOptions,
) -> Result<Vec<Trade>, TradeError> {
    let mut best = Vec::new();
    if options.max_hops == 0 || options.max_num_results == 0 || pairs.is_empty() {
        return Ok(best);
    }
    let wrapped_in = currency_in
        .wrapped()
        .ok_or(RouteError::UnwrappableCurrency(currency_in.chain_id()))?;
    let chain_id = amount_out.currency().chain_id();
    let wrapped_out = amount_out
        .currency()
        .wrapped()
        .ok_or(RouteError::UnwrappableCurrency(chain_id))?;
    let goal = CurrencyAmount::new(Currency::Token(wrapped_out.clone()), amount_out.raw().clone())
        .map_err(PairError::from)?;

    let mut current_pairs = Vec::new();
    exact_out_step(
        pairs,
        currency_in,
        amount_out,
        &wrapped_in,
        &wrapped_out,
        &goal,
        &mut current_pairs,
        options.max_hops,
        max_slippage_bps,
        options.max_num_results,
        &mut best,
    )?;
    Ok(best)
}

#[allow(clippy::too_many_arguments)]
fn exact_out_step(
    pairs: &[Pair],
    currency_in: &Currency,
    original_amount_out: &CurrencyAmount,
    target_in: &Token,
    origin_out: &Token,
    current_amount: &CurrencyAmount,
    current_pairs: &mut Vec<Pair>,
    hops_left: usize,
    max_slippage_bps: u32,
    max_num_results: usize,
    best: &mut Vec<Trade>,
) -> Result<(), TradeError> {
    for pair in pairs {
        if let Currency::Token(frontier) = current_amount.currency() {
            if !pair.involves(frontier) {
                continue;
            }
        }
        if current_pairs
            .iter()
            .any(|used| used.address() == pair.address())
        {
            continue;
        }
        if let Some(first) = current_pairs.first() {
            if pair.platform() != first.platform() {
                continue;
            }
        }

        let (input, _) = match pair.get_input_amount(current_amount) {
            Ok(result) => result,
            Err(PairError::InsufficientReserves) | Err(PairError::InsufficientInputAmount) => {
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        let reached = match input.currency() {
            Currency::Token(t) => t.clone(),
            _ => continue,
        };

        if reached.equals(target_in) {
            current_pairs.insert(0, pair.clone());
            let route = Route::new(
                current_pairs.clone(),
                currency_in.clone(),
                original_amount_out.currency().clone(),
            );
            let candidate =
                route.map_err(TradeError::from).and_then(|route| {
                    Trade::exact_out(route, original_amount_out, max_slippage_bps)
                });
            current_pairs.remove(0);
            match candidate {
                Ok(trade) => sorted_insert(best, trade, max_num_results),
                Err(ref e) if is_recoverable(e) => {}
                Err(e) => return Err(e),
            }
        } else if reached.equals(origin_out) {
            continue;
        } else if hops_left > 1 {
            current_pairs.insert(0, pair.clone());
            exact_out_step(
                pairs,
                currency_in,
                original_amount_out,
                target_in,
                origin_out,
                &input,
                current_pairs,
                hops_left - 1,
                max_slippage_bps,
                max_num_results,
                best,
            )?;
            current_pairs.remove(0);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchanges::Platform;
    use crate::shared::types::{chains, Address};

    fn token(byte: u8, symbol: &str) -> Token {
        Token::new(
            chains::MAINNET,
            Address::repeat_byte(byte),
            18,
            Some(symbol.to_string()),
            None,
        )
    }

    fn amount(token: &Token, raw: u128) -> CurrencyAmount {
        CurrencyAmount::new(Currency::Token(token.clone()), raw).unwrap()
    }

    fn pair(a: &Token, b: &Token, reserve_a: u128, reserve_b: u128) -> Pair {
        Pair::new(
            amount(a, reserve_a),
            amount(b, reserve_b),
            30,
            Platform::Uniswap,
        )
        .unwrap()
    }

    /// A, B, C with a direct A/C pool and a deeper A→B→C detour.
    fn diamond() -> (Token, Token, Token, Vec<Pair>) {
        let a = token(1, "AAA");
        let b = token(2, "BBB");
        let c = token(3, "CCC");
        let graph = vec![
            pair(&a, &c, 1_000_000, 1_000_000),
            pair(&a, &b, 10_000_000, 10_000_000),
            pair(&b, &c, 10_000_000, 10_000_000),
        ];
        (a, b, c, graph)
    }

    #[test]
    fn test_exact_in_finds_and_ranks_routes() {
        let (a, _, c, graph) = diamond();
        let trades = best_trade_exact_in(
            &graph,
            &amount(&a, 10_000),
            &Currency::Token(c),
            0,
            SearchOptions::default(),
        )
        .unwrap();
        assert_eq!(trades.len(), 2);
        // sorted by strictly non-increasing output
        assert!(trades[0].output_amount().raw() >= trades[1].output_amount().raw());
        // deep two-hop detour beats the shallow direct pool here
        assert_eq!(trades[0].route().unwrap().hops(), 2);
        assert_eq!(trades[1].route().unwrap().hops(), 1);
    }

    #[test]
    fn test_max_hops_bounds_paths() {
        let (a, _, c, graph) = diamond();
        let trades = best_trade_exact_in(
            &graph,
            &amount(&a, 10_000),
            &Currency::Token(c),
            0,
            SearchOptions {
                max_num_results: 3,
                max_hops: 1,
            },
        )
        .unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].route().unwrap().hops(), 1);
    }

    #[test]
    fn test_max_num_results_caps_list() {
        let (a, _, c, graph) = diamond();
        let trades = best_trade_exact_in(
            &graph,
            &amount(&a, 10_000),
            &Currency::Token(c),
            0,
            SearchOptions {
                max_num_results: 1,
                max_hops: 3,
            },
        )
        .unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].route().unwrap().hops(), 2);
    }

    #[test]
    fn test_no_pair_reused() {
        let (a, _, c, graph) = diamond();
        let trades = best_trade_exact_in(
            &graph,
            &amount(&a, 10_000),
            &Currency::Token(c),
            0,
            SearchOptions {
                max_num_results: 10,
                max_hops: 4,
            },
        )
        .unwrap();
        for trade in &trades {
            let route = trade.route().unwrap();
            let mut addresses: Vec<_> = route.pairs().iter().map(|p| p.address()).collect();
            addresses.sort();
            addresses.dedup();
            assert_eq!(addresses.len(), route.hops());
        }
    }

    #[test]
    fn test_empty_reserve_branches_are_skipped() {
        let a = token(1, "AAA");
        let b = token(2, "BBB");
        let c = token(3, "CCC");
        let graph = vec![
            pair(&a, &b, 0, 0),
            pair(&a, &c, 1_000_000, 1_000_000),
            pair(&b, &c, 1_000_000, 1_000_000),
        ];
        let trades = best_trade_exact_in(
            &graph,
            &amount(&a, 1_000),
            &Currency::Token(c),
            0,
            SearchOptions::default(),
        )
        .unwrap();
        // the empty A/B pool prunes its branch without failing the search
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].route().unwrap().hops(), 1);
    }

    #[test]
    fn test_exact_out_prefers_cheapest_input() {
        let (a, _, c, graph) = diamond();
        let trades = best_trade_exact_out(
            &graph,
            &Currency::Token(a),
            &amount(&c, 10_000),
            0,
            SearchOptions::default(),
        )
        .unwrap();
        assert_eq!(trades.len(), 2);
        assert!(trades[0].input_amount().raw() <= trades[1].input_amount().raw());
        // every trade settles the requested output exactly
        for trade in &trades {
            assert_eq!(
                trade.output_amount().raw(),
                amount(&c, 10_000).raw()
            );
        }
    }

    #[test]
    fn test_unreachable_output_yields_empty() {
        let a = token(1, "AAA");
        let b = token(2, "BBB");
        let d = token(9, "DDD");
        let graph = vec![pair(&a, &b, 1_000_000, 1_000_000)];
        let trades = best_trade_exact_in(
            &graph,
            &amount(&a, 1_000),
            &Currency::Token(d),
            0,
            SearchOptions::default(),
        )
        .unwrap();
        assert!(trades.is_empty());
    }
}
