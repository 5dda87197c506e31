//! Error types for the macrocast library.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur during series preparation, fitting, or forecasting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// An input token could not be parsed into the expected shape.
    #[error("malformed input {value:?}: expected {expected}")]
    MalformedInput {
        value: String,
        expected: &'static str,
    },

    /// The requested frequency is not one of daily/monthly/quarterly.
    #[error("unsupported frequency {0:?}: expected \"daily\", \"monthly\", or \"quarterly\"")]
    UnsupportedFrequency(String),

    /// Too few observations for the requested operation.
    #[error("insufficient data: need at least {needed} observations, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// The fitted AR polynomial has a root inside the unit circle.
    ///
    /// Warning-level: `fit` never returns this, it flags the model and logs.
    #[error("non-stationary AR polynomial (coefficients {ar:?}); forecasts may diverge")]
    NonStationary { ar: Vec<f64> },

    /// Forecast horizon must be at least one step.
    #[error("invalid horizon {0}: must be >= 1")]
    InvalidHorizon(usize),

    /// Confidence level must lie strictly between 0 and 1.
    #[error("invalid confidence level {0}: must be in (0, 1)")]
    InvalidConfidenceLevel(f64),
}
