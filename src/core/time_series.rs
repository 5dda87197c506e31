//! Period-indexed univariate time series.

use crate::core::period::{Frequency, Period};
use crate::error::{ForecastError, Result};

/// A univariate time series indexed by discrete periods.
///
/// Construction validates the invariants the pipeline relies on: periods and
/// values have equal length, every period shares one frequency, periods are
/// strictly increasing, and every value is finite. Contiguity (no gaps in the
/// period grid) is established by the preparer and can be queried with
/// [`TimeSeries::is_contiguous`].
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    periods: Vec<Period>,
    values: Vec<f64>,
}

impl TimeSeries {
    pub fn new(periods: Vec<Period>, values: Vec<f64>) -> Result<Self> {
        if periods.len() != values.len() {
            return Err(ForecastError::MalformedInput {
                value: format!("{} periods, {} values", periods.len(), values.len()),
                expected: "one value per period",
            });
        }
        if periods.is_empty() {
            return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
        }
        let frequency = periods[0].frequency();
        for window in periods.windows(2) {
            if window[1].frequency() != frequency {
                return Err(ForecastError::MalformedInput {
                    value: window[1].to_string(),
                    expected: "a single frequency across the series",
                });
            }
            if window[1] <= window[0] {
                return Err(ForecastError::MalformedInput {
                    value: window[1].to_string(),
                    expected: "strictly increasing periods without duplicates",
                });
            }
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(ForecastError::MalformedInput {
                value: bad.to_string(),
                expected: "a finite value",
            });
        }
        Ok(Self { periods, values })
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn frequency(&self) -> Frequency {
        self.periods[0].frequency()
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn first_period(&self) -> Period {
        self.periods[0]
    }

    pub fn last_period(&self) -> Period {
        self.periods[self.periods.len() - 1]
    }

    /// True when consecutive periods differ by exactly one frequency step.
    pub fn is_contiguous(&self) -> bool {
        self.periods
            .windows(2)
            .all(|w| w[0].steps_until(&w[1]) == 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Period, f64)> + '_ {
        self.periods.iter().copied().zip(self.values.iter().copied())
    }
}
