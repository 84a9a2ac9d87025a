// src/models/gbm.rs
//! Risk-neutral geometric Brownian motion.
//!
//! ```text
//! dS_t = (r - q) S_t dt + σ S_t dW_t
//! ```
//!
//! Sampled with the exact log-normal step, so there is no discretisation bias
//! in the marginal distribution at the grid points.
use crate::params::MarketParameters;

#[derive(Debug, Clone, Copy)]
pub struct Gbm {
    pub mu: f64,
    pub sigma: f64,
}

/// Drift and diffusion of one exact step for a fixed dt.
#[derive(Debug, Clone, Copy)]
pub struct LogStep {
    drift: f64,
    diffusion: f64,
}

impl LogStep {
    /// S_{t+dt} = S_t exp(drift + diffusion · z)
    #[inline]
    pub fn advance(&self, s_t: f64, normal_draw: f64) -> f64 {
        s_t * (self.drift + self.diffusion * normal_draw).exp()
    }
}

impl Gbm {
    /// Risk-neutral dynamics: drift r - q.
    pub fn risk_neutral(market: &MarketParameters) -> Self {
        Gbm {
            mu: market.rate - market.dividend_yield,
            sigma: market.volatility,
        }
    }

    pub fn step(&self, dt: f64) -> LogStep {
        LogStep {
            drift: (self.mu - 0.5 * self.sigma * self.sigma) * dt,
            diffusion: self.sigma * dt.sqrt(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market() -> MarketParameters {
        MarketParameters::new(100.0, 100.0, 1.0, 0.05, 0.2)
    }

    #[test]
    fn test_zero_draw_step_carries_drift_only() {
        let step = Gbm::risk_neutral(&market()).step(0.5);
        let expected = 100.0 * ((0.05 - 0.02) * 0.5_f64).exp();
        assert!((step.advance(100.0, 0.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_risk_neutral_drift_net_of_dividends() {
        let gbm = Gbm::risk_neutral(&market().with_dividend_yield(0.03));
        assert!((gbm.mu - 0.02).abs() < 1e-15);
        assert_eq!(gbm.sigma, 0.2);
    }

    #[test]
    fn test_negative_volatility_mirrors_the_draw() {
        let up = Gbm::risk_neutral(&market().with_volatility(0.005)).step(0.25);
        let down = Gbm::risk_neutral(&market().with_volatility(-0.005)).step(0.25);
        assert_eq!(up.advance(100.0, 1.3), down.advance(100.0, -1.3));
    }
}
