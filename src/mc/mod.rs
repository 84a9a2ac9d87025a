//! Monte Carlo engine: path generation, per-style evaluators and the
//! finite-difference Greek estimator.

pub mod american;
pub mod asian;
pub mod barrier;
pub mod european;
pub mod greeks;
pub mod path_simulator;
pub mod payoffs;

use crate::error::{McError, McResult};
use crate::mc::path_simulator::PathSet;
use ndarray::parallel::prelude::*;
use ndarray::{ArrayView1, Axis};

/// Evaluate `payoff` on every row of the path set, in path order.
pub(crate) fn path_payoffs<F>(paths: &PathSet, payoff: F) -> Vec<f64>
where
    F: Fn(ArrayView1<'_, f64>) -> f64 + Sync + Send,
{
    paths
        .view()
        .axis_iter(Axis(0))
        .into_par_iter()
        .map(|row| payoff(row))
        .collect()
}

/// Discounted sample mean and the variance of that estimate.
///
/// The sum runs sequentially so the result does not depend on the thread count.
pub(crate) fn discounted_mean(
    method: &str,
    payoffs: &[f64],
    discount: f64,
) -> McResult<(f64, f64)> {
    let n = payoffs.len() as f64;
    let mean = payoffs.iter().sum::<f64>() / n;
    let price = discount * mean;

    // Two passes keep the sum of squares non-negative
    let variance = if payoffs.len() > 1 {
        let ss = payoffs.iter().map(|p| (p - mean) * (p - mean)).sum::<f64>();
        ss / (n - 1.0) * discount * discount / n
    } else {
        0.0
    };

    if !price.is_finite() {
        return Err(McError::NumericalInstability {
            method: method.to_string(),
            reason: format!("Price estimate is not finite: {}", price),
        });
    }
    if !variance.is_finite() || variance < 0.0 {
        return Err(McError::NumericalInstability {
            method: method.to_string(),
            reason: format!("Variance estimate is invalid: {}", variance),
        });
    }

    Ok((price, variance))
}
