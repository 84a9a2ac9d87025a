// src/mc/asian.rs
//! Average-price (Asian) options.
//!
//! ```text
//! A     = (1/(M+1)) Σ S_t            arithmetic
//! A     = exp((1/(M+1)) Σ ln S_t)    geometric
//! price = e^(-rT) * mean(payoff(A))
//! ```
//!
//! The average includes the spot at column 0.

use crate::error::McResult;
use crate::mc::path_simulator::{PathSet, PathSimulator};
use crate::mc::payoffs::AverageType;
use crate::mc::{discounted_mean, path_payoffs};
use crate::params::{MarketParameters, OptionType};
use crate::rng::RandomSource;

pub fn price_asian(
    market: &MarketParameters,
    option_type: OptionType,
    average_type: AverageType,
    simulator: &PathSimulator,
    source: RandomSource,
) -> McResult<f64> {
    let paths = simulator.simulate(market, source)?;
    asian_price(&paths, market.strike, market.rate, option_type, average_type)
}

/// Asian price over an existing path set.
pub fn asian_price(
    paths: &PathSet,
    strike: f64,
    rate: f64,
    option_type: OptionType,
    average_type: AverageType,
) -> McResult<f64> {
    let payoffs = path_payoffs(paths, |row| {
        option_type.intrinsic(average_type.average(row), strike)
    });
    let discount = (-rate * paths.maturity()).exp();
    discounted_mean("Asian Monte Carlo", &payoffs, discount).map(|(price, _)| price)
}
