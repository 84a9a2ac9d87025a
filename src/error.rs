// src/error.rs
use thiserror::Error;

/// Error types for the exotic-mc pricing engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum McError {
    /// Invalid parameter values
    #[error("Invalid parameter '{parameter}' = {value}: {constraint}")]
    InvalidParameters {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Invalid configuration (unknown style names, misplaced barriers, bad path counts)
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// Numerical instability in an estimator
    #[error("Numerical instability in {method}: {reason}")]
    NumericalInstability { method: String, reason: String },

    /// Simulation was cancelled through its `CancelToken`
    #[error("Simulation cancelled before step {step}")]
    Cancelled { step: usize },
}

impl McError {
    pub(crate) fn config(field: &str, reason: impl Into<String>) -> Self {
        McError::InvalidConfiguration {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for exotic-mc operations
pub type McResult<T> = Result<T, McError>;

/// Validation utilities
pub mod validation {
    use super::{McError, McResult};

    /// Upper bound on simulated paths per pricing call
    pub const MAX_PATHS: usize = 1_000_000_000;

    /// Upper bound on time steps per path
    pub const MAX_STEPS: usize = 100_000;

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> McResult<()> {
        if value <= 0.0 || value.is_nan() {
            Err(McError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> McResult<()> {
        if value < 0.0 || value.is_nan() {
            Err(McError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be non-negative (≥ 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> McResult<()> {
        if !value.is_finite() {
            Err(McError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate paths count
    pub fn validate_paths(paths: usize) -> McResult<()> {
        if paths == 0 {
            Err(McError::config("num_paths", "must be greater than 0"))
        } else if paths > MAX_PATHS {
            Err(McError::config("num_paths", "exceeds maximum allowed (1 billion)"))
        } else {
            Ok(())
        }
    }

    /// Validate steps count
    pub fn validate_steps(steps: usize) -> McResult<()> {
        if steps == 0 {
            Err(McError::config("num_steps", "must be greater than 0"))
        } else if steps > MAX_STEPS {
            Err(McError::config("num_steps", "exceeds maximum allowed (100,000)"))
        } else {
            Ok(())
        }
    }
}
