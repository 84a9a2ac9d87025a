//! Option Payoff Specifications
//!
//! # Styles
//!
//! - **European**: max(S_T - K, 0) / max(K - S_T, 0), priced in closed form
//! - **American**: exercisable on every simulated date (Longstaff-Schwartz)
//! - **Asian**: intrinsic value of the path average instead of S_T
//! - **Barrier**: European payoff switched on/off by a barrier crossing
//!
//! # Implementation Notes
//!
//! The per-path helpers here operate on a single row of a `PathSet`
//! (`[S_0, S_1, ..., S_M]`), so evaluators can apply them across rows in
//! parallel.

use crate::error::{McError, McResult};
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the Asian path average is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum AverageType {
    #[default]
    Arithmetic,
    Geometric,
}

impl AverageType {
    /// Average over every observed price on the path, S_0 included.
    pub fn average(self, path: ArrayView1<'_, f64>) -> f64 {
        let n = path.len() as f64;
        match self {
            AverageType::Arithmetic => path.sum() / n,
            AverageType::Geometric => (path.iter().map(|s| s.ln()).sum::<f64>() / n).exp(),
        }
    }
}

impl FromStr for AverageType {
    type Err = McError;

    fn from_str(s: &str) -> McResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arithmetic" => Ok(AverageType::Arithmetic),
            "geometric" => Ok(AverageType::Geometric),
            other => Err(McError::config(
                "average_type",
                format!(
                    "unknown average type '{}', expected one of: arithmetic, geometric",
                    other
                ),
            )),
        }
    }
}

impl TryFrom<String> for AverageType {
    type Error = McError;

    fn try_from(name: String) -> McResult<Self> {
        name.parse()
    }
}

impl fmt::Display for AverageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AverageType::Arithmetic => write!(f, "arithmetic"),
            AverageType::Geometric => write!(f, "geometric"),
        }
    }
}

/// Barrier direction and knock behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum BarrierType {
    UpAndOut,
    UpAndIn,
    DownAndOut,
    DownAndIn,
}

impl BarrierType {
    pub const ALL: [BarrierType; 4] = [
        BarrierType::UpAndOut,
        BarrierType::UpAndIn,
        BarrierType::DownAndOut,
        BarrierType::DownAndIn,
    ];

    /// Monitored against the path maximum.
    #[inline]
    pub fn is_up(self) -> bool {
        matches!(self, BarrierType::UpAndOut | BarrierType::UpAndIn)
    }

    /// Payoff only survives on knocked paths.
    #[inline]
    pub fn is_knock_in(self) -> bool {
        matches!(self, BarrierType::UpAndIn | BarrierType::DownAndIn)
    }

    /// Knock event: max(path) ≥ level for up barriers, min(path) ≤ level for down.
    pub fn is_knocked(self, path: ArrayView1<'_, f64>, level: f64) -> bool {
        if self.is_up() {
            path.fold(f64::NEG_INFINITY, |m, &s| m.max(s)) >= level
        } else {
            path.fold(f64::INFINITY, |m, &s| m.min(s)) <= level
        }
    }

    /// Barrier must sit above spot for up types and below it for down types.
    pub fn validate_level(self, level: f64, spot: f64) -> McResult<()> {
        if !level.is_finite() || level <= 0.0 {
            return Err(McError::config(
                "barrier_level",
                format!("must be finite and positive, got {}", level),
            ));
        }
        if self.is_up() && level <= spot {
            return Err(McError::config(
                "barrier_level",
                format!("{} barrier {} must be above spot {}", self, level, spot),
            ));
        }
        if !self.is_up() && level >= spot {
            return Err(McError::config(
                "barrier_level",
                format!("{} barrier {} must be below spot {}", self, level, spot),
            ));
        }
        Ok(())
    }
}

impl FromStr for BarrierType {
    type Err = McError;

    fn from_str(s: &str) -> McResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up-and-out" => Ok(BarrierType::UpAndOut),
            "up-and-in" => Ok(BarrierType::UpAndIn),
            "down-and-out" => Ok(BarrierType::DownAndOut),
            "down-and-in" => Ok(BarrierType::DownAndIn),
            other => Err(McError::config(
                "barrier_type",
                format!(
                    "unknown barrier type '{}', expected one of: up-and-out, up-and-in, down-and-out, down-and-in",
                    other
                ),
            )),
        }
    }
}

impl TryFrom<String> for BarrierType {
    type Error = McError;

    fn try_from(name: String) -> McResult<Self> {
        name.parse()
    }
}

impl fmt::Display for BarrierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BarrierType::UpAndOut => "up-and-out",
            BarrierType::UpAndIn => "up-and-in",
            BarrierType::DownAndOut => "down-and-out",
            BarrierType::DownAndIn => "down-and-in",
        };
        f.write_str(name)
    }
}

/// Exercise style plus the fields each style needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "lowercase")]
pub enum PayoffSpec {
    European,
    American,
    Asian {
        #[serde(default)]
        average_type: AverageType,
    },
    Barrier {
        barrier_type: BarrierType,
        barrier_level: f64,
    },
}

impl PayoffSpec {
    pub fn style_name(&self) -> &'static str {
        match self {
            PayoffSpec::European => "european",
            PayoffSpec::American => "american",
            PayoffSpec::Asian { .. } => "asian",
            PayoffSpec::Barrier { .. } => "barrier",
        }
    }

    /// Style-specific checks that depend on the spot.
    pub fn validate(&self, spot: f64) -> McResult<()> {
        match *self {
            PayoffSpec::Barrier {
                barrier_type,
                barrier_level,
            } => barrier_type.validate_level(barrier_level, spot),
            _ => Ok(()),
        }
    }
}
