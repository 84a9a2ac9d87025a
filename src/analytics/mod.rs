//! Closed-form reference prices.

pub mod barrier_analytic;
pub mod bs_analytic;
