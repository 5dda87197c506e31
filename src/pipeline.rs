//! The end-to-end forecasting pipeline: prepare, fit, forecast.
//!
//! One parameterized engine replaces the per-series variants in the source
//! forecasts: frequency, gap policy, order, horizon, and confidence level are
//! configuration, not copies of the pipeline.

use crate::arima::{forecast, ArimaEstimator, ArimaOrder, FittedModel};
use crate::core::{ForecastResult, Frequency, TimeSeries};
use crate::error::Result;
use crate::prepare::{GapPolicy, RawObservation, SeriesPreparer};

/// Everything that varies between series.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub frequency: Frequency,
    pub gap_policy: GapPolicy,
    pub order: ArimaOrder,
    pub horizon: usize,
    pub confidence_level: f64,
}

impl Default for PipelineConfig {
    /// The monthly CPI setup: drop missing rows, ARIMA(1,1,1), four steps
    /// ahead at 95%.
    fn default() -> Self {
        Self {
            frequency: Frequency::Monthly,
            gap_policy: GapPolicy::DropMissing,
            order: ArimaOrder::default(),
            horizon: 4,
            confidence_level: 0.95,
        }
    }
}

/// Intermediate artifacts alongside the forecast, for callers that overlay
/// history, forecast line, and confidence band.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub series: TimeSeries,
    pub model: FittedModel,
    pub result: ForecastResult,
}

/// Runs prepare → fit → forecast for one configured series.
///
/// Stateless between calls; independent series can be run concurrently on
/// separate pipelines (or the same one, behind a shared reference).
#[derive(Debug, Clone)]
pub struct ForecastPipeline {
    config: PipelineConfig,
}

impl ForecastPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Produce the forecast table for one batch of raw observations.
    pub fn run(&self, raw: &[RawObservation]) -> Result<ForecastResult> {
        Ok(self.run_full(raw)?.result)
    }

    /// Like [`ForecastPipeline::run`], also returning the prepared series
    /// and fitted model.
    pub fn run_full(&self, raw: &[RawObservation]) -> Result<PipelineRun> {
        let preparer = SeriesPreparer::for_order(
            self.config.frequency,
            self.config.gap_policy,
            self.config.order,
        );
        let series = preparer.prepare(raw)?;
        let model = ArimaEstimator::new(self.config.order).fit(&series)?;
        let result = forecast(&model, self.config.horizon, self.config.confidence_level)?;
        Ok(PipelineRun {
            series,
            model,
            result,
        })
    }
}
