// src/mc/path_simulator.rs
//! GBM path generation.
//!
//! # Algorithm
//!
//! ```text
//! dt  = T / M
//! S_0 = spot
//! S_t = S_{t-1} * exp((r - q - σ²/2) dt + σ √dt Z_t),   Z_t ~ N(0,1)
//! ```
//!
//! The matrix is filled one time step at a time. Within a step every path
//! draws from its own stream (see [`crate::rng`]), so the step is spread over
//! the rayon pool without changing a single bit of the output.
//!
//! A [`CancelToken`] attached to the simulator is polled between steps.

use crate::error::{validation::validate_paths, McError, McResult};
use crate::models::gbm::Gbm;
use crate::params::{MarketParameters, SimulationConfig};
use crate::rng::{self, RandomSource};
use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut1, Axis, Zip};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Cooperative cancellation flag shared between a caller and running simulations.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Simulated price matrix: one row per path, column 0 is the spot.
///
/// Owned by the pricing call that generated it and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSet {
    paths: Array2<f64>,
    maturity: f64,
}

impl PathSet {
    /// Wrap an externally built matrix (rows = paths, columns = time points).
    pub fn from_array(paths: Array2<f64>, maturity: f64) -> McResult<Self> {
        if paths.nrows() == 0 || paths.ncols() == 0 {
            return Err(McError::config(
                "paths",
                format!("path matrix must be non-empty, got {:?}", paths.dim()),
            ));
        }
        if paths.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(McError::config(
                "paths",
                "every simulated price must be finite and positive",
            ));
        }
        Ok(PathSet { paths, maturity })
    }

    /// Degenerate single-column set: every path sits at `spot`.
    pub fn constant(spot: f64, num_paths: usize, maturity: f64) -> Self {
        PathSet {
            paths: Array2::from_elem((num_paths, 1), spot),
            maturity,
        }
    }

    pub fn num_paths(&self) -> usize {
        self.paths.nrows()
    }

    /// Number of time steps M; the matrix has M + 1 columns.
    pub fn num_steps(&self) -> usize {
        self.paths.ncols() - 1
    }

    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    /// Step size; zero for a single-column set.
    pub fn dt(&self) -> f64 {
        match self.num_steps() {
            0 => 0.0,
            m => self.maturity / m as f64,
        }
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.paths.view()
    }

    pub fn column(&self, step: usize) -> ArrayView1<'_, f64> {
        self.paths.column(step)
    }

    pub fn terminal(&self) -> ArrayView1<'_, f64> {
        self.paths.column(self.num_steps())
    }
}

/// Builds [`PathSet`]s for one [`SimulationConfig`].
#[derive(Debug, Clone)]
pub struct PathSimulator {
    config: SimulationConfig,
    cancel: Option<CancelToken>,
}

impl PathSimulator {
    pub fn new(config: SimulationConfig) -> Self {
        PathSimulator {
            config,
            cancel: None,
        }
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Simulate `num_paths × (num_steps + 1)` risk-neutral prices.
    ///
    /// `T = 0` or `num_steps = 0` returns a single column equal to the spot
    /// without consuming any randomness.
    pub fn simulate(&self, market: &MarketParameters, source: RandomSource) -> McResult<PathSet> {
        let n = self.config.num_paths;
        let m = self.config.num_steps;
        validate_paths(n)?;

        if m == 0 || market.maturity == 0.0 {
            return Ok(PathSet::constant(market.spot, n, market.maturity));
        }

        let factory = source.factory();
        debug!(
            paths = n,
            steps = m,
            base_seed = factory.base_seed(),
            "simulating GBM paths"
        );

        let dt = market.maturity / m as f64;
        let step_model = Gbm::risk_neutral(market).step(dt);

        let mut streams = factory.path_streams(n);
        let mut paths = Array2::<f64>::zeros((n, m + 1));
        paths.column_mut(0).fill(market.spot);

        for step in 1..=m {
            if let Some(token) = &self.cancel {
                if token.is_cancelled() {
                    warn!(step, "path simulation cancelled");
                    return Err(McError::Cancelled { step });
                }
            }

            let (done, mut rest) = paths.view_mut().split_at(Axis(1), step);
            let prev = done.column(step - 1);
            Zip::from(rest.column_mut(0))
                .and(prev)
                .and(ArrayViewMut1::from(&mut streams[..]))
                .par_for_each(|s, &s_prev, stream| {
                    *s = step_model.advance(s_prev, rng::get_normal_draw(stream));
                });
        }

        Ok(PathSet {
            paths,
            maturity: market.maturity,
        })
    }
}

/// Free-function form: `simulate(S0, T, r, σ, q, N, M, seed?)`.
#[allow(clippy::too_many_arguments)]
pub fn simulate(
    s0: f64,
    t: f64,
    r: f64,
    sigma: f64,
    q: f64,
    num_paths: usize,
    num_steps: usize,
    seed: Option<u64>,
) -> McResult<PathSet> {
    let market = MarketParameters::new(s0, s0, t, r, sigma).with_dividend_yield(q);
    let config = SimulationConfig {
        num_paths,
        num_steps,
        seed,
    };
    PathSimulator::new(config).simulate(&market, RandomSource::from_seed(seed))
}
