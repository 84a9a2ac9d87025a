// src/analytics/barrier_analytic.rs
//! Continuously monitored down-and-out call (Merton 1973, Reiner-Rubinstein 1991).
//!
//! ```text
//! λ  = (r - q + σ²/2) / σ²
//! y  = ln(H²/(S K)) / (σ√T) + λσ√T
//! x₁ = ln(S/H) / (σ√T) + λσ√T
//! y₁ = ln(H/S) / (σ√T) + λσ√T
//!
//! H ≤ K:  c_do = c - [S e^(-qT) (H/S)^(2λ) Φ(y) - K e^(-rT) (H/S)^(2λ-2) Φ(y - σ√T)]
//! H ≥ K:  c_do = S e^(-qT) Φ(x₁) - K e^(-rT) Φ(x₁ - σ√T)
//!              - S e^(-qT) (H/S)^(2λ) Φ(y₁) + K e^(-rT) (H/S)^(2λ-2) Φ(y₁ - σ√T)
//! ```
//!
//! Only used to validate the Monte Carlo barrier evaluator. Discrete daily
//! monitoring knocks out less often, so the simulated price sits slightly above.

use crate::analytics::bs_analytic::bs_price;
use crate::math_utils::norm_cdf;
use crate::mc::payoffs::BarrierType;
use crate::params::{MarketParameters, OptionType};

/// Closed form where one exists (down-and-out call), `None` otherwise.
pub fn barrier_closed_form(
    m: &MarketParameters,
    option_type: OptionType,
    barrier_type: BarrierType,
    barrier_level: f64,
) -> Option<f64> {
    match (option_type, barrier_type) {
        (OptionType::Call, BarrierType::DownAndOut) => {
            Some(down_and_out_call(m, barrier_level))
        }
        _ => None,
    }
}

pub fn down_and_out_call(m: &MarketParameters, h: f64) -> f64 {
    if m.spot <= h {
        return 0.0;
    }
    if m.maturity <= 0.0 {
        return OptionType::Call.intrinsic(m.spot, m.strike);
    }

    let (s, k, t, r, q, sigma) = (
        m.spot,
        m.strike,
        m.maturity,
        m.rate,
        m.dividend_yield,
        m.volatility,
    );
    let vol_sqrt_t = sigma * t.sqrt();
    let lambda = (r - q + 0.5 * sigma * sigma) / (sigma * sigma);
    let div_df = (-q * t).exp();
    let rate_df = (-r * t).exp();
    let ratio = h / s;
    let spot_leg = s * div_df * ratio.powf(2.0 * lambda);
    let strike_leg = k * rate_df * ratio.powf(2.0 * lambda - 2.0);

    if h <= k {
        let y = (h * h / (s * k)).ln() / vol_sqrt_t + lambda * vol_sqrt_t;
        let down_and_in = spot_leg * norm_cdf(y) - strike_leg * norm_cdf(y - vol_sqrt_t);
        bs_price(m, OptionType::Call) - down_and_in
    } else {
        let x1 = (s / h).ln() / vol_sqrt_t + lambda * vol_sqrt_t;
        let y1 = (h / s).ln() / vol_sqrt_t + lambda * vol_sqrt_t;
        s * div_df * norm_cdf(x1) - k * rate_df * norm_cdf(x1 - vol_sqrt_t)
            - spot_leg * norm_cdf(y1)
            + strike_leg * norm_cdf(y1 - vol_sqrt_t)
    }
}
