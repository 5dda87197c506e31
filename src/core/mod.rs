//! Core data structures: periods, time series, and forecast tables.

mod forecast;
mod period;
mod time_series;

pub use forecast::{ForecastEntry, ForecastResult};
pub use period::{Frequency, Period};
pub use time_series::TimeSeries;
