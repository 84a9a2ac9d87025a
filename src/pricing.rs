// src/pricing.rs
//! Pricing facade: validates a request, dispatches it to the evaluator for its
//! style and, when asked, runs the Greek estimator over the same evaluator.

use crate::analytics::bs_analytic;
use crate::error::McResult;
use crate::mc::american::price_american;
use crate::mc::asian::price_asian;
use crate::mc::barrier::price_barrier;
use crate::mc::greeks::{BumpSizes, GreekEstimator, GreekSet, GreeksConfig, GREEK_SEED};
use crate::mc::path_simulator::{CancelToken, PathSimulator};
use crate::mc::payoffs::PayoffSpec;
use crate::params::{MarketParameters, OptionType, SimulationConfig};
use crate::rng::RandomSource;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Everything needed to price one contract.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingRequest {
    #[serde(flatten)]
    pub market: MarketParameters,
    pub option_type: OptionType,
    #[serde(flatten)]
    pub payoff: PayoffSpec,
    #[serde(flatten)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub greeks: GreeksConfig,
}

impl PricingRequest {
    pub fn new(market: MarketParameters, option_type: OptionType, payoff: PayoffSpec) -> Self {
        PricingRequest {
            market,
            option_type,
            payoff,
            simulation: SimulationConfig::default(),
            greeks: GreeksConfig::NONE,
        }
    }

    pub fn with_simulation(mut self, simulation: SimulationConfig) -> Self {
        self.simulation = simulation;
        self
    }

    pub fn with_greeks(mut self, greeks: GreeksConfig) -> Self {
        self.greeks = greeks;
        self
    }

    /// Reject invalid market inputs, path counts and barrier placement up front.
    pub fn validate(&self) -> McResult<()> {
        self.market.validate()?;
        self.simulation.validate()?;
        self.payoff.validate(self.market.spot)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub price: f64,
    pub greeks: Option<GreekSet>,
}

/// A style bound to its simulator; prices any market with any random source.
struct StylePricer<'a> {
    option_type: OptionType,
    payoff: PayoffSpec,
    simulator: &'a PathSimulator,
}

impl StylePricer<'_> {
    fn price(&self, market: &MarketParameters, source: RandomSource) -> McResult<f64> {
        match self.payoff {
            PayoffSpec::European => Ok(bs_analytic::bs_price(market, self.option_type)),
            PayoffSpec::American => {
                price_american(market, self.option_type, self.simulator, source)
            }
            PayoffSpec::Asian { average_type } => {
                price_asian(market, self.option_type, average_type, self.simulator, source)
            }
            PayoffSpec::Barrier {
                barrier_type,
                barrier_level,
            } => price_barrier(
                market,
                self.option_type,
                barrier_type,
                barrier_level,
                self.simulator,
                source,
            ),
        }
    }
}

/// Facade over the evaluators and the Greek estimator.
#[derive(Debug, Clone)]
pub struct PricingEngine {
    bumps: BumpSizes,
    greek_seed: u64,
    cancel: Option<CancelToken>,
}

impl Default for PricingEngine {
    fn default() -> Self {
        PricingEngine {
            bumps: BumpSizes::default(),
            greek_seed: GREEK_SEED,
            cancel: None,
        }
    }
}

impl PricingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bumps(mut self, bumps: BumpSizes) -> Self {
        self.bumps = bumps;
        self
    }

    pub fn with_greek_seed(mut self, seed: u64) -> Self {
        self.greek_seed = seed;
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn simulator(&self, config: SimulationConfig) -> PathSimulator {
        let simulator = PathSimulator::new(config);
        match &self.cancel {
            Some(token) => simulator.with_cancel_token(token.clone()),
            None => simulator,
        }
    }

    #[instrument(
        level = "debug",
        skip(self, request),
        fields(style = request.payoff.style_name(), option_type = %request.option_type)
    )]
    pub fn price(&self, request: &PricingRequest) -> McResult<PricingResult> {
        request.validate()?;

        let sim = request.simulation;
        info!(
            paths = sim.num_paths,
            steps = sim.num_steps,
            seed = ?sim.seed,
            greeks = ?request.greeks,
            "pricing request"
        );

        let simulator = self.simulator(sim);
        let pricer = StylePricer {
            option_type: request.option_type,
            payoff: request.payoff,
            simulator: &simulator,
        };

        let price = pricer.price(&request.market, RandomSource::from_seed(sim.seed))?;

        let greeks = if request.greeks.is_empty() {
            None
        } else if let PayoffSpec::European = request.payoff {
            Some(
                bs_analytic::bs_greeks(&request.market, request.option_type)
                    .select(request.greeks),
            )
        } else {
            let estimator = GreekEstimator::new()
                .with_bumps(self.bumps)
                .with_seed(self.greek_seed)
                .with_selection(request.greeks);
            Some(estimator.estimate(|m, source| pricer.price(m, source), &request.market)?)
        };

        info!(price, "priced");
        Ok(PricingResult { price, greeks })
    }
}

/// Price with default engine settings.
pub fn price(request: &PricingRequest) -> McResult<PricingResult> {
    PricingEngine::default().price(request)
}
