// src/params.rs
//! Market and simulation inputs shared by every evaluator.
//!
//! Both types derive `serde` so an external loader can produce them directly.
//! Field aliases accept the long key names (`underlying_price`,
//! `num_simulations`, ...). Enum names such as `option_type` are read through
//! their `FromStr` impls, so `"Call"` and `" put "` are accepted. The payoff
//! style itself is tagged `style` and must be lowercase.

use crate::error::{validation::*, McError, McResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Intrinsic value of exercising at `spot`.
    #[inline]
    pub fn intrinsic(self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }
}

impl FromStr for OptionType {
    type Err = McError;

    fn from_str(s: &str) -> McResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" => Ok(OptionType::Call),
            "put" => Ok(OptionType::Put),
            other => Err(McError::config(
                "option_type",
                format!("unknown option type '{}', expected one of: call, put", other),
            )),
        }
    }
}

impl TryFrom<String> for OptionType {
    type Error = McError;

    fn try_from(name: String) -> McResult<Self> {
        name.parse()
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "call"),
            OptionType::Put => write!(f, "put"),
        }
    }
}

/// Market inputs of a single pricing call. Never mutated; bumped copies are
/// made with the `with_*` builders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketParameters {
    /// Spot price S
    #[serde(alias = "underlying_price")]
    pub spot: f64,
    /// Strike K
    #[serde(alias = "strike_price")]
    pub strike: f64,
    /// Time to maturity T in years
    #[serde(alias = "time_to_maturity")]
    pub maturity: f64,
    /// Continuously compounded risk-free rate r
    #[serde(alias = "risk_free_rate")]
    pub rate: f64,
    /// Volatility σ
    pub volatility: f64,
    /// Continuous dividend yield q
    #[serde(default)]
    pub dividend_yield: f64,
}

impl MarketParameters {
    pub fn new(spot: f64, strike: f64, maturity: f64, rate: f64, volatility: f64) -> Self {
        MarketParameters {
            spot,
            strike,
            maturity,
            rate,
            volatility,
            dividend_yield: 0.0,
        }
    }

    pub fn with_dividend_yield(mut self, q: f64) -> Self {
        self.dividend_yield = q;
        self
    }

    pub fn with_spot(mut self, spot: f64) -> Self {
        self.spot = spot;
        self
    }

    pub fn with_volatility(mut self, volatility: f64) -> Self {
        self.volatility = volatility;
        self
    }

    pub fn with_rate(mut self, rate: f64) -> Self {
        self.rate = rate;
        self
    }

    pub fn with_maturity(mut self, maturity: f64) -> Self {
        self.maturity = maturity;
        self
    }

    /// Reject S ≤ 0, K ≤ 0, T < 0, σ ≤ 0, q < 0 and any non-finite input.
    pub fn validate(&self) -> McResult<()> {
        validate_positive("spot", self.spot)?;
        validate_positive("strike", self.strike)?;
        validate_non_negative("maturity", self.maturity)?;
        validate_finite("rate", self.rate)?;
        validate_positive("volatility", self.volatility)?;
        validate_non_negative("dividend_yield", self.dividend_yield)?;

        for (name, value) in [
            ("spot", self.spot),
            ("strike", self.strike),
            ("maturity", self.maturity),
            ("volatility", self.volatility),
            ("dividend_yield", self.dividend_yield),
        ] {
            validate_finite(name, value)?;
        }

        Ok(())
    }
}

fn default_paths() -> usize {
    10_000
}

fn default_steps() -> usize {
    252
}

/// Shape and seed of a simulated path set: `num_paths` rows by
/// `num_steps + 1` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_paths", alias = "num_simulations")]
    pub num_paths: usize,
    #[serde(default = "default_steps")]
    pub num_steps: usize,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SimulationConfig {
    pub fn new(num_paths: usize, num_steps: usize) -> Self {
        SimulationConfig {
            num_paths,
            num_steps,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> McResult<()> {
        validate_paths(self.num_paths)?;
        validate_steps(self.num_steps)?;
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            num_paths: default_paths(),
            num_steps: default_steps(),
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> MarketParameters {
        MarketParameters::new(100.0, 100.0, 1.0, 0.05, 0.2)
    }

    #[test]
    fn test_market_validation() {
        assert!(base().validate().is_ok());
        assert!(base().with_maturity(0.0).validate().is_ok());
        assert!(base().with_rate(-0.01).validate().is_ok());

        assert!(base().with_spot(0.0).validate().is_err());
        assert!(base().with_maturity(-0.5).validate().is_err());
        assert!(base().with_volatility(0.0).validate().is_err());
        assert!(base().with_dividend_yield(-0.02).validate().is_err());

        let mut bad_strike = base();
        bad_strike.strike = -1.0;
        assert!(bad_strike.validate().is_err());
    }

    #[test]
    fn test_option_type_parsing() {
        assert_eq!("Call".parse::<OptionType>().unwrap(), OptionType::Call);
        assert_eq!(" put ".parse::<OptionType>().unwrap(), OptionType::Put);
        assert!(matches!(
            "straddle".parse::<OptionType>(),
            Err(McError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_option_type_from_json_ignores_case() {
        let parsed: Vec<OptionType> = serde_json::from_str(r#"["Call", "PUT", " put "]"#).unwrap();
        assert_eq!(parsed, vec![OptionType::Call, OptionType::Put, OptionType::Put]);
        assert!(serde_json::from_str::<OptionType>(r#""straddle""#).is_err());
        assert_eq!(serde_json::to_string(&OptionType::Call).unwrap(), r#""call""#);
    }

    #[test]
    fn test_intrinsic() {
        assert_eq!(OptionType::Call.intrinsic(110.0, 100.0), 10.0);
        assert_eq!(OptionType::Call.intrinsic(90.0, 100.0), 0.0);
        assert_eq!(OptionType::Put.intrinsic(90.0, 100.0), 10.0);
        assert_eq!(OptionType::Put.intrinsic(110.0, 100.0), 0.0);
    }

    #[test]
    fn test_simulation_defaults() {
        let cfg = SimulationConfig::default();
        assert_eq!(cfg.num_paths, 10_000);
        assert_eq!(cfg.num_steps, 252);
        assert_eq!(cfg.seed, None);
        assert!(SimulationConfig::new(0, 10).validate().is_err());
        assert!(SimulationConfig::new(10, 0).validate().is_err());
    }
}
