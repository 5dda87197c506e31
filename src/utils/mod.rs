//! Numerical building blocks for estimation and interval computation.

pub mod optimization;
pub mod stats;

pub use optimization::{nelder_mead, Minimum, OptimizerOptions};
pub use stats::{autocorrelation, mean, normal_quantile, variance};
