//! ARIMA(p,d,q) model: differencing, estimation, and forecasting.

pub mod diff;
mod estimator;
pub(crate) mod forecaster;

pub use estimator::{ArimaEstimator, EstimatorConfig, FitDiagnostics, FittedModel};
pub use forecaster::forecast;

use std::fmt;

/// Model order: p autoregressive lags, d differences, q moving-average lags.
///
/// Fixed before fitting; the pipeline performs no order search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArimaOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
}

impl ArimaOrder {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// Estimated parameters: AR + MA coefficients plus the constant.
    pub fn num_params(&self) -> usize {
        self.p + self.q + 1
    }

    /// Fewest raw observations a fit will accept.
    pub fn min_observations(&self) -> usize {
        self.p + self.d + self.q + 1
    }
}

impl Default for ArimaOrder {
    /// ARIMA(1,1,1), the fixed order used for every series in the source
    /// forecasts.
    fn default() -> Self {
        Self::new(1, 1, 1)
    }
}

impl fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.p, self.d, self.q)
    }
}
