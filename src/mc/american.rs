// src/mc/american.rs
//! American options by Longstaff-Schwartz least-squares Monte Carlo.
//!
//! # Algorithm
//!
//! ```text
//! CF      = payoff(S_M)
//! for t = M-1 .. 1:
//!     CF  = CF * e^(-r dt)
//!     ITM = { i : payoff(S_t,i) > 0 }
//!     fit C(x) = β₀ + β₁x + β₂x²  to (x = S_t,i / K, CF_i) over ITM
//!     CF_i = payoff(S_t,i)  where i ∈ ITM and payoff(S_t,i) > C(x_i)
//! price = e^(-r dt) * mean(CF)
//! ```
//!
//! Exercise needs a strict improvement over the continuation estimate, so
//! ties continue. A step with fewer than three ITM paths, or a singular
//! regression, exercises nothing and just carries the discounted cash flows.

use crate::error::{McError, McResult};
use crate::mc::path_simulator::{PathSet, PathSimulator};
use crate::params::{MarketParameters, OptionType};
use crate::rng::RandomSource;
use nalgebra::{Matrix3, Vector3};
use ndarray::{Array1, ArrayView1};
use tracing::debug;

/// Minimum ITM sample that determines the quadratic basis.
const MIN_REGRESSION_PATHS: usize = 3;

/// Simulate a fresh path set and price the American option on it.
pub fn price_american(
    market: &MarketParameters,
    option_type: OptionType,
    simulator: &PathSimulator,
    source: RandomSource,
) -> McResult<f64> {
    let paths = simulator.simulate(market, source)?;
    lsm_price(&paths, market.strike, market.rate, option_type)
}

/// Longstaff-Schwartz backward induction over an existing path set.
pub fn lsm_price(
    paths: &PathSet,
    strike: f64,
    rate: f64,
    option_type: OptionType,
) -> McResult<f64> {
    let n = paths.num_paths();
    let m = paths.num_steps();
    let intrinsic = paths.view().mapv(|s| option_type.intrinsic(s, strike));

    if m == 0 {
        return finite_price(intrinsic.column(0).sum() / n as f64);
    }

    let step_discount = (-rate * paths.dt()).exp();
    let mut cash_flows: Array1<f64> = intrinsic.column(m).to_owned();
    let mut itm: Vec<usize> = Vec::with_capacity(n);
    let mut skipped_steps = 0usize;

    for step in (1..m).rev() {
        cash_flows *= step_discount;

        let exercise_values = intrinsic.column(step);
        itm.clear();
        itm.extend((0..n).filter(|&i| exercise_values[i] > 0.0));
        if itm.is_empty() {
            continue;
        }

        let spots = paths.column(step);
        let Some(beta) = fit_continuation(&itm, spots, cash_flows.view(), strike) else {
            skipped_steps += 1;
            continue;
        };

        for &i in &itm {
            let continuation = continuation_value(&beta, spots[i] / strike);
            if should_exercise(exercise_values[i], continuation) {
                cash_flows[i] = exercise_values[i];
            }
        }
    }

    if skipped_steps > 0 {
        debug!(
            skipped_steps,
            "LSM regression degenerate, continuing on those steps"
        );
    }

    finite_price(step_discount * cash_flows.sum() / n as f64)
}

#[inline]
fn should_exercise(intrinsic: f64, continuation: f64) -> bool {
    intrinsic > continuation
}

#[inline]
fn continuation_value(beta: &Vector3<f64>, x: f64) -> f64 {
    beta[0] + x * (beta[1] + x * beta[2])
}

/// Least-squares fit of discounted cash flow on `{1, x, x²}` over the ITM
/// subset via the 3×3 normal equations.
fn fit_continuation(
    itm: &[usize],
    spots: ArrayView1<'_, f64>,
    cash_flows: ArrayView1<'_, f64>,
    strike: f64,
) -> Option<Vector3<f64>> {
    if itm.len() < MIN_REGRESSION_PATHS {
        return None;
    }

    let mut s1 = 0.0_f64;
    let mut s_x = 0.0_f64;
    let mut s_x2 = 0.0_f64;
    let mut s_x3 = 0.0_f64;
    let mut s_x4 = 0.0_f64;
    let mut s_y = 0.0_f64;
    let mut s_xy = 0.0_f64;
    let mut s_x2y = 0.0_f64;

    for &i in itm {
        let x = spots[i] / strike;
        let x2 = x * x;
        let y = cash_flows[i];
        s1 += 1.0;
        s_x += x;
        s_x2 += x2;
        s_x3 += x2 * x;
        s_x4 += x2 * x2;
        s_y += y;
        s_xy += x * y;
        s_x2y += x2 * y;
    }

    let xtx = Matrix3::new(s1, s_x, s_x2, s_x, s_x2, s_x3, s_x2, s_x3, s_x4);
    let xty = Vector3::new(s_y, s_xy, s_x2y);

    xtx.lu()
        .solve(&xty)
        .filter(|beta| beta.iter().all(|b| b.is_finite()))
}

fn finite_price(price: f64) -> McResult<f64> {
    if price.is_finite() {
        Ok(price)
    } else {
        Err(McError::NumericalInstability {
            method: "Longstaff-Schwartz".to_string(),
            reason: format!("Price estimate is not finite: {}", price),
        })
    }
}
