// src/analytics/bs_analytic.rs
//! Analytical Black-Scholes formulas for European options and Greeks
//!
//! # Mathematical Foundation
//!
//! Under the Black-Scholes model with continuous dividend yield q:
//! ```text
//! dS_t = (r - q) S_t dt + σ S_t dW_t
//! ```
//!
//! ```text
//! d₁ = [ln(S/K) + (r - q + σ²/2)T] / (σ√T)
//! d₂ = d₁ - σ√T
//! C  = S e^(-qT) Φ(d₁) - K e^(-rT) Φ(d₂)
//! P  = K e^(-rT) Φ(-d₂) - S e^(-qT) Φ(-d₁)
//! ```
//!
//! Greeks are reported in the same units as the Monte Carlo estimator:
//! vega and rho per 1% move, theta per year of calendar time.

use crate::mc::greeks::GreekSet;
use crate::math_utils::{norm_cdf, norm_pdf};
use crate::params::{MarketParameters, OptionType};

fn d1_d2(m: &MarketParameters) -> (f64, f64) {
    let vol_sqrt_t = m.volatility * m.maturity.sqrt();
    let d1 = ((m.spot / m.strike).ln()
        + (m.rate - m.dividend_yield + 0.5 * m.volatility * m.volatility) * m.maturity)
        / vol_sqrt_t;
    (d1, d1 - vol_sqrt_t)
}

/// Black-Scholes European price; intrinsic value at T = 0.
pub fn bs_price(m: &MarketParameters, option_type: OptionType) -> f64 {
    if m.maturity <= 0.0 {
        return option_type.intrinsic(m.spot, m.strike);
    }
    let (d1, d2) = d1_d2(m);
    let fwd_spot = m.spot * (-m.dividend_yield * m.maturity).exp();
    let pv_strike = m.strike * (-m.rate * m.maturity).exp();
    match option_type {
        OptionType::Call => fwd_spot * norm_cdf(d1) - pv_strike * norm_cdf(d2),
        OptionType::Put => pv_strike * norm_cdf(-d2) - fwd_spot * norm_cdf(-d1),
    }
}

/// Closed-form Greeks.
///
/// # Formulas
/// ```text
/// Δ_call = e^(-qT) Φ(d₁)            Δ_put = e^(-qT) (Φ(d₁) - 1)
/// Γ      = e^(-qT) φ(d₁) / (S σ √T)
/// ν      = S e^(-qT) φ(d₁) √T / 100
/// Θ_call = -S e^(-qT) φ(d₁) σ / (2√T) - r K e^(-rT) Φ(d₂) + q S e^(-qT) Φ(d₁)
/// Θ_put  = -S e^(-qT) φ(d₁) σ / (2√T) + r K e^(-rT) Φ(-d₂) - q S e^(-qT) Φ(-d₁)
/// ρ_call = K T e^(-rT) Φ(d₂) / 100  ρ_put = -K T e^(-rT) Φ(-d₂) / 100
/// ```
///
/// At expiry only delta survives, as the step function of moneyness.
pub fn bs_greeks(m: &MarketParameters, option_type: OptionType) -> GreekSet {
    if m.maturity <= 0.0 {
        let delta = match option_type {
            OptionType::Call if m.spot > m.strike => 1.0,
            OptionType::Put if m.spot < m.strike => -1.0,
            _ => 0.0,
        };
        return GreekSet::full(delta, 0.0, 0.0, 0.0, 0.0);
    }

    let (d1, d2) = d1_d2(m);
    let sqrt_t = m.maturity.sqrt();
    let div_df = (-m.dividend_yield * m.maturity).exp();
    let rate_df = (-m.rate * m.maturity).exp();
    let pdf_d1 = norm_pdf(d1);

    let gamma = div_df * pdf_d1 / (m.spot * m.volatility * sqrt_t);
    let vega = m.spot * div_df * pdf_d1 * sqrt_t / 100.0;
    let decay = -(m.spot * div_df * pdf_d1 * m.volatility) / (2.0 * sqrt_t);

    let (delta, theta, rho) = match option_type {
        OptionType::Call => (
            div_df * norm_cdf(d1),
            decay - m.rate * m.strike * rate_df * norm_cdf(d2)
                + m.dividend_yield * m.spot * div_df * norm_cdf(d1),
            m.strike * m.maturity * rate_df * norm_cdf(d2),
        ),
        OptionType::Put => (
            div_df * (norm_cdf(d1) - 1.0),
            decay + m.rate * m.strike * rate_df * norm_cdf(-d2)
                - m.dividend_yield * m.spot * div_df * norm_cdf(-d1),
            -m.strike * m.maturity * rate_df * norm_cdf(-d2),
        ),
    };

    GreekSet::full(delta, gamma, vega, theta, rho / 100.0)
}
