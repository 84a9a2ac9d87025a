// src/mc/greeks.rs
//! Finite-difference Greeks with common random numbers.
//!
//! # Formulas
//!
//! ```text
//! Δ = [V(S+h) - V(S-h)] / 2h
//! Γ = [V(S+h) - 2V(S) + V(S-h)] / h²
//! ν = [V(σ+h) - V(σ-h)] / 2h / 100
//! Θ = [V(T-h) - V(T)] / h              h = 1/365, T-h floored at 0
//! ρ = [V(r+h) - V(r-h)] / 2h / 100
//! ```
//!
//! # Common Random Numbers
//!
//! Every scenario re-prices from scratch with its own simulator stream built
//! from the same seed, so each path sees the same Brownian increments in every
//! scenario and the noise cancels in the differences:
//! ```text
//! Var[V(S+h) - V(S-h)] << Var[V(S+h)] + Var[V(S-h)]
//! ```
//! The seed is fixed per estimator (42 unless overridden) and does not follow
//! the seed of the headline price.
//!
//! Scenarios shared between Greeks (S±h for Δ and Γ, the base for Γ and Θ)
//! are priced once; under a shared seed the repeated calls would return the
//! same bits anyway. Distinct scenarios run concurrently on the rayon pool.

use crate::error::{McError, McResult};
use crate::params::MarketParameters;
use crate::rng::RandomSource;
use bitflags::bitflags;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Seed shared by every bumped scenario of one Greek bundle.
pub const GREEK_SEED: u64 = 42;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct GreeksConfig: u32 {
        const NONE  = 0;
        const DELTA = 1 << 0;
        const VEGA  = 1 << 1;
        const RHO   = 1 << 2;
        const GAMMA = 1 << 3;
        const THETA = 1 << 4;
        const ALL = Self::DELTA.bits()
            | Self::VEGA.bits()
            | Self::RHO.bits()
            | Self::GAMMA.bits()
            | Self::THETA.bits();
    }
}

impl Default for GreeksConfig {
    fn default() -> Self {
        GreeksConfig::NONE
    }
}

/// Sensitivities; a Greek that was not requested is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GreekSet {
    pub delta: Option<f64>,
    pub gamma: Option<f64>,
    pub vega: Option<f64>,
    pub theta: Option<f64>,
    pub rho: Option<f64>,
}

impl GreekSet {
    pub fn full(delta: f64, gamma: f64, vega: f64, theta: f64, rho: f64) -> Self {
        GreekSet {
            delta: Some(delta),
            gamma: Some(gamma),
            vega: Some(vega),
            theta: Some(theta),
            rho: Some(rho),
        }
    }

    /// Drop every Greek not named in `selection`.
    pub fn select(self, selection: GreeksConfig) -> Self {
        let keep = |flag: GreeksConfig, v: Option<f64>| v.filter(|_| selection.contains(flag));
        GreekSet {
            delta: keep(GreeksConfig::DELTA, self.delta),
            gamma: keep(GreeksConfig::GAMMA, self.gamma),
            vega: keep(GreeksConfig::VEGA, self.vega),
            theta: keep(GreeksConfig::THETA, self.theta),
            rho: keep(GreeksConfig::RHO, self.rho),
        }
    }
}

/// Absolute bump sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BumpSizes {
    pub spot: f64,
    pub volatility: f64,
    pub rate: f64,
    /// Calendar time in years, applied downwards only.
    pub time: f64,
}

impl Default for BumpSizes {
    fn default() -> Self {
        BumpSizes {
            spot: 0.01,
            volatility: 0.01,
            rate: 0.01,
            time: 1.0 / 365.0,
        }
    }
}

/// One re-pricing of the base market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Scenario {
    Base,
    SpotUp,
    SpotDown,
    VolUp,
    VolDown,
    RateUp,
    RateDown,
    TimeDecay,
}

impl Scenario {
    fn market(self, base: &MarketParameters, bumps: &BumpSizes) -> MarketParameters {
        match self {
            Scenario::Base => *base,
            Scenario::SpotUp => base.with_spot(base.spot + bumps.spot),
            Scenario::SpotDown => base.with_spot(base.spot - bumps.spot),
            Scenario::VolUp => base.with_volatility(base.volatility + bumps.volatility),
            Scenario::VolDown => base.with_volatility(base.volatility - bumps.volatility),
            Scenario::RateUp => base.with_rate(base.rate + bumps.rate),
            Scenario::RateDown => base.with_rate(base.rate - bumps.rate),
            Scenario::TimeDecay => base.with_maturity((base.maturity - bumps.time).max(0.0)),
        }
    }

    /// Distinct scenarios needed for `selection`, in a fixed order.
    fn required(selection: GreeksConfig) -> Vec<Scenario> {
        let mut out = Vec::with_capacity(8);
        let mut push = |s: Scenario| {
            if !out.contains(&s) {
                out.push(s);
            }
        };
        if selection.intersects(GreeksConfig::DELTA | GreeksConfig::GAMMA) {
            push(Scenario::SpotUp);
            push(Scenario::SpotDown);
        }
        if selection.intersects(GreeksConfig::GAMMA | GreeksConfig::THETA) {
            push(Scenario::Base);
        }
        if selection.contains(GreeksConfig::VEGA) {
            push(Scenario::VolUp);
            push(Scenario::VolDown);
        }
        if selection.contains(GreeksConfig::THETA) {
            push(Scenario::TimeDecay);
        }
        if selection.contains(GreeksConfig::RHO) {
            push(Scenario::RateUp);
            push(Scenario::RateDown);
        }
        out
    }
}

/// Central difference of two bumped prices.
#[inline]
pub fn central_difference(up: f64, down: f64, h: f64) -> f64 {
    (up - down) / (2.0 * h)
}

/// Second central difference around `center`.
#[inline]
pub fn second_difference(up: f64, center: f64, down: f64, h: f64) -> f64 {
    (up - 2.0 * center + down) / (h * h)
}

/// Bumps each market input and re-prices through a caller-supplied pricer.
#[derive(Debug, Clone, Copy)]
pub struct GreekEstimator {
    bumps: BumpSizes,
    seed: u64,
    selection: GreeksConfig,
}

impl Default for GreekEstimator {
    fn default() -> Self {
        GreekEstimator {
            bumps: BumpSizes::default(),
            seed: GREEK_SEED,
            selection: GreeksConfig::ALL,
        }
    }
}

impl GreekEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bumps(mut self, bumps: BumpSizes) -> Self {
        self.bumps = bumps;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_selection(mut self, selection: GreeksConfig) -> Self {
        self.selection = selection;
        self
    }

    pub fn bumps(&self) -> &BumpSizes {
        &self.bumps
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The σ - h scenario may go negative; GBM with -σ is the same process
    /// driven by -Z, so it is priced rather than rejected.
    fn validate(&self, base: &MarketParameters) -> McResult<()> {
        let b = &self.bumps;
        for (name, h) in [
            ("spot_bump", b.spot),
            ("volatility_bump", b.volatility),
            ("rate_bump", b.rate),
            ("time_bump", b.time),
        ] {
            if !(h.is_finite() && h > 0.0) {
                return Err(McError::InvalidParameters {
                    parameter: name.to_string(),
                    value: h,
                    constraint: "bump size must be finite and positive".to_string(),
                });
            }
        }
        if self
            .selection
            .intersects(GreeksConfig::DELTA | GreeksConfig::GAMMA)
            && base.spot <= b.spot
        {
            return Err(McError::InvalidParameters {
                parameter: "spot".to_string(),
                value: base.spot,
                constraint: format!("must exceed the spot bump {} for delta/gamma", b.spot),
            });
        }
        Ok(())
    }

    /// Estimate the selected Greeks of `pricer` around `base`.
    ///
    /// `pricer` must build a fresh simulation from the `RandomSource` it is
    /// handed; it is called once per distinct scenario, possibly concurrently.
    #[instrument(level = "debug", skip(self, pricer, base), fields(seed = self.seed))]
    pub fn estimate<F>(&self, pricer: F, base: &MarketParameters) -> McResult<GreekSet>
    where
        F: Fn(&MarketParameters, RandomSource) -> McResult<f64> + Sync,
    {
        self.validate(base)?;

        let scenarios = Scenario::required(self.selection);
        debug!(scenarios = scenarios.len(), "pricing bumped scenarios");

        let prices: Vec<f64> = scenarios
            .par_iter()
            .map(|sc| pricer(&sc.market(base, &self.bumps), RandomSource::Seeded(self.seed)))
            .collect::<McResult<Vec<f64>>>()?;
        let priced: HashMap<Scenario, f64> = scenarios.into_iter().zip(prices).collect();
        let get = |sc: Scenario| priced.get(&sc).copied();

        let b = &self.bumps;
        let wants = |flag: GreeksConfig| self.selection.contains(flag);

        let delta = wants(GreeksConfig::DELTA)
            .then(|| Some(central_difference(get(Scenario::SpotUp)?, get(Scenario::SpotDown)?, b.spot)))
            .flatten();
        let gamma = wants(GreeksConfig::GAMMA)
            .then(|| {
                Some(second_difference(
                    get(Scenario::SpotUp)?,
                    get(Scenario::Base)?,
                    get(Scenario::SpotDown)?,
                    b.spot,
                ))
            })
            .flatten();
        let vega = wants(GreeksConfig::VEGA)
            .then(|| {
                Some(central_difference(get(Scenario::VolUp)?, get(Scenario::VolDown)?, b.volatility) / 100.0)
            })
            .flatten();
        let theta = wants(GreeksConfig::THETA)
            .then(|| Some((get(Scenario::TimeDecay)? - get(Scenario::Base)?) / b.time))
            .flatten();
        let rho = wants(GreeksConfig::RHO)
            .then(|| {
                Some(central_difference(get(Scenario::RateUp)?, get(Scenario::RateDown)?, b.rate) / 100.0)
            })
            .flatten();

        Ok(GreekSet {
            delta,
            gamma,
            vega,
            theta,
            rho,
        })
    }
}

/// All five Greeks with default bumps and the fixed Greek seed.
pub fn greeks<F>(pricer: F, base: &MarketParameters) -> McResult<GreekSet>
where
    F: Fn(&MarketParameters, RandomSource) -> McResult<f64> + Sync,
{
    GreekEstimator::default().estimate(pricer, base)
}
