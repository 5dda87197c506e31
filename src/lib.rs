//! # macrocast
//!
//! ARIMA forecasting for univariate economic time series.
//!
//! One pipeline, three stages, applied identically to daily, monthly, and
//! quarterly data: [`prepare::SeriesPreparer`] turns raw (timestamp, value)
//! pairs into a validated period-indexed series, [`arima::ArimaEstimator`]
//! fits an ARIMA(p,d,q) model by conditional maximum likelihood, and
//! [`arima::forecast`] projects the fitted model forward with symmetric
//! confidence intervals.
//!
//! CSV parsing, plotting, and CLI wiring are external collaborators: the
//! pipeline consumes parsed `(timestamp, value)` string pairs and hands back
//! a [`core::ForecastResult`] table.

#![allow(clippy::needless_range_loop)]

pub mod arima;
pub mod core;
pub mod error;
pub mod pipeline;
pub mod prepare;
pub mod utils;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::arima::{forecast, ArimaEstimator, ArimaOrder, FittedModel};
    pub use crate::core::{ForecastResult, Frequency, Period, TimeSeries};
    pub use crate::error::{ForecastError, Result};
    pub use crate::pipeline::{ForecastPipeline, PipelineConfig};
    pub use crate::prepare::{GapPolicy, RawObservation, SeriesPreparer};
}
