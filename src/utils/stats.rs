//! Statistical helpers shared by estimation and forecasting.

use statrs::distribution::{ContinuousCDF, Normal};

/// Standard-normal quantile (inverse CDF).
///
/// `normal_quantile(0.975)` ≈ 1.959964, the two-sided z-score for a 95%
/// confidence level.
pub fn normal_quantile(p: f64) -> f64 {
    let normal = Normal::new(0.0, 1.0).unwrap();
    normal.inverse_cdf(p)
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance with n-1 denominator.
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

/// Autocorrelation at the given lag.
pub fn autocorrelation(values: &[f64], lag: usize) -> f64 {
    if values.len() <= lag {
        return f64::NAN;
    }
    let m = mean(values);
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for i in 0..values.len() {
        denominator += (values[i] - m).powi(2);
        if i >= lag {
            numerator += (values[i] - m) * (values[i - lag] - m);
        }
    }
    if denominator == 0.0 {
        return 0.0;
    }
    numerator / denominator
}
