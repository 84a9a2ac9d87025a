//! # exotic-mc: Monte Carlo Pricing for Path-Dependent Options
//!
//! Risk-neutral GBM simulation with evaluators for American (Longstaff-Schwartz),
//! Asian and barrier options, plus finite-difference Greeks under common
//! random numbers.
//!
//! ## Key Features
//!
//! - **Reproducible**: every run is a pure function of its inputs and seed
//! - **Parallel**: per-path random streams let rayon spread the work without changing results
//! - **Longstaff-Schwartz**: quadratic regression on in-the-money paths
//! - **Greeks**: Delta, Gamma, Vega, Theta and Rho with shared-seed bumps
//! - **Closed forms**: Black-Scholes and down-and-out call references for validation
//!
//! ## Quick Start
//!
//! ```rust
//! use exotic_mc::{price, GreeksConfig, MarketParameters, OptionType, PayoffSpec, PricingRequest, SimulationConfig};
//!
//! let market = MarketParameters::new(100.0, 100.0, 1.0, 0.05, 0.2);
//! let request = PricingRequest::new(market, OptionType::Put, PayoffSpec::American)
//!     .with_simulation(SimulationConfig::new(5_000, 50).with_seed(7))
//!     .with_greeks(GreeksConfig::DELTA);
//!
//! let result = price(&request).expect("valid request");
//! assert!(result.price > 5.0);
//! assert!(result.greeks.and_then(|g| g.delta).unwrap() < 0.0);
//! ```
//!
//! ## Mathematical Foundation
//!
//! Prices follow `dS = (r - q) S dt + σ S dW` under the risk-neutral measure.
//! Each option value is the discounted sample mean of its payoff over the
//! simulated paths; early exercise is resolved backwards through the grid.

pub mod analytics;
pub mod error;
pub mod math_utils;
pub mod mc;
pub mod models;
pub mod params;
pub mod pricing;
pub mod rng;

pub use error::{McError, McResult};
pub use mc::greeks::{BumpSizes, GreekEstimator, GreekSet, GreeksConfig};
pub use mc::path_simulator::{CancelToken, PathSet, PathSimulator};
pub use mc::payoffs::{AverageType, BarrierType, PayoffSpec};
pub use params::{MarketParameters, OptionType, SimulationConfig};
pub use pricing::{price, PricingEngine, PricingRequest, PricingResult};
pub use rng::RandomSource;
