//! ARIMA(p,d,q) coefficient estimation by conditional maximum likelihood.

use crate::arima::diff::difference_with_seeds;
use crate::arima::ArimaOrder;
use crate::core::{Frequency, Period, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::utils::optimization::{nelder_mead, OptimizerOptions};
use crate::utils::stats::{autocorrelation, mean};

const LN_2PI: f64 = 1.8378770664093453;
/// Stationarity/invertibility box for AR and MA coefficients.
const COEF_BOUND: f64 = 0.99;

/// Estimation settings: iteration cap and convergence tolerance on the
/// relative change of the log-likelihood.
#[derive(Debug, Clone)]
pub struct EstimatorConfig {
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tolerance: 1e-6,
        }
    }
}

/// Convergence and stationarity diagnostics from a fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitDiagnostics {
    /// Optimizer iterations used.
    pub iterations: usize,
    /// False when the iteration cap was hit; the best iterate is still kept.
    pub converged: bool,
    /// Conditional Gaussian log-likelihood at the chosen coefficients.
    pub log_likelihood: f64,
    /// False when the AR polynomial has a root inside the unit circle.
    pub stationary: bool,
}

/// An immutable fitted ARIMA model: coefficients, residual variance, and the
/// differenced-state tail needed to seed forecasting.
#[derive(Debug, Clone)]
pub struct FittedModel {
    order: ArimaOrder,
    frequency: Frequency,
    last_period: Period,
    ar: Vec<f64>,
    ma: Vec<f64>,
    intercept: f64,
    residual_variance: f64,
    differenced: Vec<f64>,
    residuals: Vec<f64>,
    seeds: Vec<f64>,
    diagnostics: FitDiagnostics,
}

impl FittedModel {
    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Last observed period of the series the model was fit on.
    pub fn last_period(&self) -> Period {
        self.last_period
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Sample variance of the one-step-ahead prediction residuals.
    pub fn residual_variance(&self) -> f64 {
        self.residual_variance
    }

    pub fn diagnostics(&self) -> FitDiagnostics {
        self.diagnostics
    }

    pub fn is_stationary(&self) -> bool {
        self.diagnostics.stationary
    }

    /// The warning-level stationarity failure, for callers that want to
    /// escalate it to a hard error.
    pub fn stationarity_violation(&self) -> Option<ForecastError> {
        if self.diagnostics.stationary {
            None
        } else {
            Some(ForecastError::NonStationary {
                ar: self.ar.clone(),
            })
        }
    }

    /// Project `horizon` steps ahead at the given confidence level.
    pub fn forecast(&self, horizon: usize, confidence_level: f64) -> Result<crate::core::ForecastResult> {
        crate::arima::forecaster::forecast(self, horizon, confidence_level)
    }

    pub(crate) fn differenced(&self) -> &[f64] {
        &self.differenced
    }

    pub(crate) fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    pub(crate) fn seeds(&self) -> &[f64] {
        &self.seeds
    }
}

/// Fits ARIMA(p,d,q) models of a fixed order.
///
/// Pure function of its inputs: the starting point is a deterministic
/// ACF-based heuristic, so repeated fits of the same series are identical.
#[derive(Debug, Clone, Default)]
pub struct ArimaEstimator {
    order: ArimaOrder,
    config: EstimatorConfig,
}

impl ArimaEstimator {
    pub fn new(order: ArimaOrder) -> Self {
        Self {
            order,
            config: EstimatorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EstimatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    /// Fit the model to a prepared series.
    ///
    /// Differences `d` times, then maximizes the conditional Gaussian
    /// log-likelihood of the ARMA(p,q) residuals over AR/MA coefficients and
    /// a constant. Non-convergence and non-stationarity are surfaced as
    /// warnings in [`FitDiagnostics`], not errors.
    pub fn fit(&self, series: &TimeSeries) -> Result<FittedModel> {
        let order = self.order;
        if series.len() < order.min_observations() {
            return Err(ForecastError::InsufficientData {
                needed: order.min_observations(),
                got: series.len(),
            });
        }

        let diffed = difference_with_seeds(series.values(), order.d);
        let w = &diffed.values;
        if w.len() < order.p + order.q + 1 {
            return Err(ForecastError::InsufficientData {
                needed: order.p + order.q + 1,
                got: w.len(),
            });
        }

        let p = order.p;
        let q = order.q;
        let (params, iterations, converged) = if p + q == 0 {
            (vec![mean(w)], 0, true)
        } else {
            let initial = initial_parameters(w, p, q);
            let mut bounds = vec![(f64::NEG_INFINITY, f64::INFINITY)];
            bounds.resize(1 + p + q, (-COEF_BOUND, COEF_BOUND));
            let options = OptimizerOptions {
                max_iterations: self.config.max_iterations,
                tolerance: self.config.tolerance,
                ..Default::default()
            };
            let minimum = nelder_mead(
                |params| negative_log_likelihood(w, p, q, params),
                &initial,
                &bounds,
                &options,
            );
            (minimum.point, minimum.iterations, minimum.converged)
        };

        let intercept = params[0];
        let ar = params[1..1 + p].to_vec();
        let ma = params[1 + p..].to_vec();

        let (residuals, start) = one_step_residuals(w, &ar, &ma, intercept);
        let n_eff = (w.len() - start) as f64;
        let css: f64 = residuals[start..].iter().map(|e| e * e).sum();
        let residual_variance = css / n_eff;
        let log_likelihood =
            -0.5 * n_eff * (LN_2PI + residual_variance.max(f64::MIN_POSITIVE).ln() + 1.0);

        if !converged {
            log::warn!(
                "ARIMA{order} estimation stopped at the {iterations}-iteration cap \
                 without converging; keeping the best iterate (log-likelihood {log_likelihood:.4})",
            );
        }

        let stationary = ar_is_stationary(&ar);
        if !stationary {
            log::warn!("{}", ForecastError::NonStationary { ar: ar.clone() });
        }

        Ok(FittedModel {
            order,
            frequency: series.frequency(),
            last_period: series.last_period(),
            ar,
            ma,
            intercept,
            residual_variance,
            differenced: diffed.values,
            residuals,
            seeds: diffed.seeds,
            diagnostics: FitDiagnostics {
                iterations,
                converged,
                log_likelihood,
                stationary,
            },
        })
    }
}

/// Deterministic starting point: series mean for the constant, the lag-1
/// autocorrelation for the leading AR coefficient, damped small values for
/// the rest.
fn initial_parameters(w: &[f64], p: usize, q: usize) -> Vec<f64> {
    let mut initial = Vec::with_capacity(1 + p + q);
    initial.push(mean(w));
    for i in 0..p {
        if i == 0 {
            let acf1 = autocorrelation(w, 1);
            initial.push(if acf1.is_finite() { acf1.clamp(-0.9, 0.9) } else { 0.0 });
        } else {
            initial.push(0.05 / (i + 1) as f64);
        }
    }
    for i in 0..q {
        initial.push(0.05 / (i + 1) as f64);
    }
    initial
}

/// One-step-ahead prediction residuals, conditioning on the first
/// `max(p, q)` observations (their residuals are left at zero).
fn one_step_residuals(w: &[f64], ar: &[f64], ma: &[f64], intercept: f64) -> (Vec<f64>, usize) {
    let start = ar.len().max(ma.len());
    let mut residuals = vec![0.0; w.len()];
    for t in start..w.len() {
        let mut pred = intercept;
        for (i, phi) in ar.iter().enumerate() {
            pred += phi * (w[t - 1 - i] - intercept);
        }
        for (i, theta) in ma.iter().enumerate() {
            pred += theta * residuals[t - 1 - i];
        }
        residuals[t] = w[t] - pred;
    }
    (residuals, start)
}

/// Negative conditional Gaussian log-likelihood, concentrated over the
/// innovation variance.
fn negative_log_likelihood(w: &[f64], p: usize, q: usize, params: &[f64]) -> f64 {
    let intercept = params[0];
    let ar = &params[1..1 + p];
    let ma = &params[1 + p..];
    let (residuals, start) = one_step_residuals(w, ar, ma, intercept);
    let n_eff = (w.len() - start) as f64;
    if n_eff < 1.0 {
        return f64::MAX;
    }
    let css: f64 = residuals[start..].iter().map(|e| e * e).sum();
    let sigma2 = (css / n_eff).max(f64::MIN_POSITIVE);
    0.5 * n_eff * (LN_2PI + sigma2.ln() + 1.0)
}

/// Schur-Cohn stationarity test via the reverse Durbin recursion: the AR
/// polynomial has all roots outside the unit circle iff every partial
/// autocorrelation it implies lies strictly inside (-1, 1).
fn ar_is_stationary(ar: &[f64]) -> bool {
    let mut coefs = ar.to_vec();
    for k in (1..=coefs.len()).rev() {
        let last = coefs[k - 1];
        if last.abs() >= 1.0 {
            return false;
        }
        if k > 1 {
            let denom = 1.0 - last * last;
            let mut reduced = Vec::with_capacity(k - 1);
            for i in 0..k - 1 {
                reduced.push((coefs[i] + last * coefs[k - 2 - i]) / denom);
            }
            coefs = reduced;
        }
    }
    true
}
