// src/mc/barrier.rs
//! Discretely monitored knock-in / knock-out options.
//!
//! A path is knocked when any simulated price touches the barrier
//! (max ≥ H for up barriers, min ≤ H for down barriers, S_0 included).
//! Out types pay the vanilla terminal payoff on unknocked paths, in types
//! only on knocked ones, so in + out equals the vanilla payoff path by path.

use crate::error::McResult;
use crate::mc::path_simulator::{PathSet, PathSimulator};
use crate::mc::payoffs::BarrierType;
use crate::mc::{discounted_mean, path_payoffs};
use crate::params::{MarketParameters, OptionType};
use crate::rng::RandomSource;

pub fn price_barrier(
    market: &MarketParameters,
    option_type: OptionType,
    barrier_type: BarrierType,
    barrier_level: f64,
    simulator: &PathSimulator,
    source: RandomSource,
) -> McResult<f64> {
    let paths = simulator.simulate(market, source)?;
    barrier_price(
        &paths,
        market.strike,
        market.rate,
        option_type,
        barrier_type,
        barrier_level,
    )
}

/// Barrier price over an existing path set.
pub fn barrier_price(
    paths: &PathSet,
    strike: f64,
    rate: f64,
    option_type: OptionType,
    barrier_type: BarrierType,
    barrier_level: f64,
) -> McResult<f64> {
    let payoffs = path_payoffs(paths, |row| {
        let knocked = barrier_type.is_knocked(row, barrier_level);
        if knocked != barrier_type.is_knock_in() {
            return 0.0;
        }
        let terminal = row[row.len() - 1];
        option_type.intrinsic(terminal, strike)
    });
    let discount = (-rate * paths.maturity()).exp();
    discounted_mean("Barrier Monte Carlo", &payoffs, discount).map(|(price, _)| price)
}
