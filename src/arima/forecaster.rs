//! Multi-step forecasting from a fitted ARIMA model.

use crate::arima::diff::integrate;
use crate::arima::estimator::FittedModel;
use crate::core::{ForecastEntry, ForecastResult};
use crate::error::{ForecastError, Result};
use crate::utils::stats::normal_quantile;

/// Project `horizon` steps ahead with symmetric confidence intervals.
///
/// Point forecasts come from the ARMA recursion on the differenced scale
/// (future residuals zero), re-integrated to the original scale. Interval
/// half-widths grow with the cumulative squared impulse-response weights of
/// the integrated process times the residual variance.
pub fn forecast(
    model: &FittedModel,
    horizon: usize,
    confidence_level: f64,
) -> Result<ForecastResult> {
    if horizon < 1 {
        return Err(ForecastError::InvalidHorizon(horizon));
    }
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(ForecastError::InvalidConfidenceLevel(confidence_level));
    }

    let order = model.order();
    let ar = model.ar_coefficients();
    let ma = model.ma_coefficients();
    let intercept = model.intercept();

    // ARMA recursion on the differenced scale. Residuals beyond the
    // estimation window are zero by convention.
    let mut history = model.differenced().to_vec();
    let mut residuals = model.residuals().to_vec();
    let observed = history.len();
    for _ in 0..horizon {
        let t = history.len();
        let mut pred = intercept;
        for (i, phi) in ar.iter().enumerate() {
            if t > i {
                pred += phi * (history[t - 1 - i] - intercept);
            }
        }
        for (i, theta) in ma.iter().enumerate() {
            if t > i {
                pred += theta * residuals[t - 1 - i];
            }
        }
        history.push(pred);
        residuals.push(0.0);
    }

    let points = integrate(&history[observed..], model.seeds());

    let psi = integrated_psi_weights(ar, ma, order.d, horizon);
    let sigma2 = model.residual_variance();
    let z = normal_quantile((1.0 + confidence_level) / 2.0);

    let mut entries = Vec::with_capacity(horizon);
    let mut cumulative = 0.0;
    let mut period = model.last_period();
    for (k, &point) in points.iter().enumerate() {
        cumulative += psi[k] * psi[k];
        let half_width = z * (sigma2 * cumulative).sqrt();
        period = period.next();
        entries.push(ForecastEntry {
            period,
            point,
            lower: point - half_width,
            upper: point + half_width,
        });
    }

    Ok(ForecastResult::new(confidence_level, entries))
}

/// Impulse-response weights of the ARIMA process.
///
/// The ARMA psi recursion `psi_j = theta_j + Σ phi_i psi_{j-i}` gives the
/// weights on the differenced scale; `d` rounds of cumulative summation lift
/// them to the integrated scale.
fn integrated_psi_weights(ar: &[f64], ma: &[f64], d: usize, horizon: usize) -> Vec<f64> {
    let mut psi = vec![0.0; horizon];
    psi[0] = 1.0;
    for j in 1..horizon {
        let mut weight = if j <= ma.len() { ma[j - 1] } else { 0.0 };
        for (i, phi) in ar.iter().enumerate() {
            if j > i {
                weight += phi * psi[j - 1 - i];
            }
        }
        psi[j] = weight;
    }
    for _ in 0..d {
        for j in 1..horizon {
            psi[j] += psi[j - 1];
        }
    }
    psi
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arima::{ArimaEstimator, ArimaOrder};
    use crate::core::{Period, TimeSeries};
    use approx::assert_relative_eq;

    fn fitted(order: ArimaOrder, n: usize) -> FittedModel {
        let start = Period::monthly(2020, 1).unwrap();
        let periods = (0..n as i64).map(|i| start.advance(i)).collect();
        let values: Vec<f64> = (0..n)
            .map(|i| 100.0 + 0.6 * i as f64 + (i as f64 * 0.7).sin())
            .collect();
        let series = TimeSeries::new(periods, values).unwrap();
        ArimaEstimator::new(order).fit(&series).unwrap()
    }

    #[test]
    fn horizon_one_advances_exactly_one_period() {
        let model = fitted(ArimaOrder::new(1, 1, 1), 48);
        let result = forecast(&model, 1, 0.95).unwrap();
        assert_eq!(result.horizon(), 1);
        assert_eq!(result.entries()[0].period, model.last_period().next());
    }

    #[test]
    fn periods_are_consecutive_and_count_matches() {
        let model = fitted(ArimaOrder::new(1, 1, 1), 48);
        let result = forecast(&model, 6, 0.95).unwrap();
        assert_eq!(result.horizon(), 6);
        for (k, entry) in result.iter().enumerate() {
            assert_eq!(entry.period, model.last_period().advance(k as i64 + 1));
        }
    }

    #[test]
    fn interval_width_is_monotone_in_horizon() {
        let model = fitted(ArimaOrder::new(1, 1, 1), 60);
        let result = forecast(&model, 10, 0.95).unwrap();
        let mut previous = 0.0;
        for entry in result.iter() {
            let width = entry.upper - entry.lower;
            assert!(width >= previous - 1e-12);
            assert!(entry.lower <= entry.point && entry.point <= entry.upper);
            previous = width;
        }
    }

    #[test]
    fn wider_confidence_level_widens_intervals_by_z_ratio() {
        let model = fitted(ArimaOrder::new(1, 1, 1), 60);
        let narrow = forecast(&model, 5, 0.80).unwrap();
        let wide = forecast(&model, 5, 0.95).unwrap();
        let ratio = normal_quantile(0.975) / normal_quantile(0.90);
        for (n, w) in narrow.iter().zip(wide.iter()) {
            assert_relative_eq!(n.point, w.point, epsilon = 1e-12);
            let n_width = n.upper - n.lower;
            let w_width = w.upper - w.lower;
            assert_relative_eq!(w_width / n_width, ratio, epsilon = 1e-9);
        }
    }

    #[test]
    fn random_walk_variance_grows_linearly() {
        // ARIMA(0,1,0): psi weights are all one, so the forecast variance at
        // step k is k * sigma2.
        let model = fitted(ArimaOrder::new(0, 1, 0), 40);
        let result = forecast(&model, 4, 0.95).unwrap();
        let z = normal_quantile(0.975);
        let sigma = model.residual_variance().sqrt();
        for (k, entry) in result.iter().enumerate() {
            let expected = z * sigma * ((k + 1) as f64).sqrt();
            assert_relative_eq!(entry.upper - entry.point, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn trend_is_continued_after_integration() {
        let model = fitted(ArimaOrder::new(1, 1, 0), 60);
        let result = forecast(&model, 5, 0.95).unwrap();
        // The source series climbs ~0.6/step; forecasts should keep climbing.
        let points = result.points();
        assert!(points[4] > points[0]);
    }

    #[test]
    fn rejects_zero_horizon() {
        let model = fitted(ArimaOrder::new(1, 1, 1), 48);
        assert_eq!(
            forecast(&model, 0, 0.95).unwrap_err(),
            ForecastError::InvalidHorizon(0)
        );
    }

    #[test]
    fn rejects_out_of_range_confidence_levels() {
        let model = fitted(ArimaOrder::new(1, 1, 1), 48);
        for level in [0.0, 1.0, -0.5, 1.5] {
            assert_eq!(
                forecast(&model, 3, level).unwrap_err(),
                ForecastError::InvalidConfidenceLevel(level)
            );
        }
    }

    #[test]
    fn psi_weights_for_pure_ma() {
        let psi = integrated_psi_weights(&[], &[0.4], 0, 4);
        assert_eq!(psi, vec![1.0, 0.4, 0.0, 0.0]);
    }

    #[test]
    fn psi_weights_for_ar1_decay_geometrically() {
        let psi = integrated_psi_weights(&[0.5], &[], 0, 4);
        assert_relative_eq!(psi[1], 0.5, epsilon = 1e-12);
        assert_relative_eq!(psi[2], 0.25, epsilon = 1e-12);
        assert_relative_eq!(psi[3], 0.125, epsilon = 1e-12);
    }
}
