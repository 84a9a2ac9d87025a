// src/mc/european.rs
//! Monte Carlo European estimator.
//!
//! Production European pricing is closed form; this estimator exists to
//! check the simulator against Black-Scholes and to anchor barrier in/out
//! parity on identical paths.

use crate::error::McResult;
use crate::mc::path_simulator::{PathSet, PathSimulator};
use crate::mc::{discounted_mean, path_payoffs};
use crate::params::{MarketParameters, OptionType};
use crate::rng::RandomSource;

/// Returns `(price, variance_of_estimate)`.
pub fn mc_price_european(
    market: &MarketParameters,
    option_type: OptionType,
    simulator: &PathSimulator,
    source: RandomSource,
) -> McResult<(f64, f64)> {
    let paths = simulator.simulate(market, source)?;
    european_estimate(&paths, market.strike, market.rate, option_type)
}

pub fn european_estimate(
    paths: &PathSet,
    strike: f64,
    rate: f64,
    option_type: OptionType,
) -> McResult<(f64, f64)> {
    let payoffs = path_payoffs(paths, |row| {
        option_type.intrinsic(row[row.len() - 1], strike)
    });
    let discount = (-rate * paths.maturity()).exp();
    discounted_mean("European Monte Carlo", &payoffs, discount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::bs_analytic;
    use crate::params::SimulationConfig;

    #[test]
    fn test_put_close_to_analytic() {
        let market = MarketParameters::new(100.0, 105.0, 0.5, 0.03, 0.25).with_dividend_yield(0.01);
        let sim = PathSimulator::new(SimulationConfig::new(50_000, 1));
        let (price, variance) =
            mc_price_european(&market, OptionType::Put, &sim, RandomSource::Seeded(11)).unwrap();
        let analytic = bs_analytic::bs_price(&market, OptionType::Put);
        let stderr = variance.sqrt();
        assert!(
            (price - analytic).abs() < 4.0 * stderr,
            "MC {} analytic {} stderr {}",
            price,
            analytic,
            stderr
        );
    }
}
