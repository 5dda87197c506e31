//! Differencing and re-integration for the I(d) part of ARIMA.

/// Apply the difference operator `d` times.
///
/// Each pass replaces `value[i]` with `value[i] - value[i-1]`, shrinking the
/// series by one observation per pass.
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut current = series.to_vec();
    for _ in 0..d {
        if current.len() <= 1 {
            return vec![];
        }
        let mut next = Vec::with_capacity(current.len() - 1);
        for i in 1..current.len() {
            next.push(current[i] - current[i - 1]);
        }
        current = next;
    }
    current
}

/// A `d`-times-differenced series plus the state needed to undo it.
#[derive(Debug, Clone, PartialEq)]
pub struct Differenced {
    /// The d-times-differenced values.
    pub values: Vec<f64>,
    /// `seeds[level]` is the last value of the level-times-differenced
    /// series, for levels `0..d`. Re-integration of forecasts starts from
    /// these.
    pub seeds: Vec<f64>,
}

/// Difference `d` times, recording the last value at every level.
pub fn difference_with_seeds(series: &[f64], d: usize) -> Differenced {
    let mut seeds = Vec::with_capacity(d);
    let mut current = series.to_vec();
    for _ in 0..d {
        if current.is_empty() {
            break;
        }
        seeds.push(current[current.len() - 1]);
        current = difference(&current, 1);
    }
    Differenced {
        values: current,
        seeds,
    }
}

/// Undo `seeds.len()` levels of differencing on a forecast continuation.
///
/// `differenced` holds values that continue the fully differenced series one
/// step past where the seeds were taken; the result continues the original
/// series on its raw scale.
pub fn integrate(differenced: &[f64], seeds: &[f64]) -> Vec<f64> {
    let mut current = differenced.to_vec();
    for &seed in seeds.iter().rev() {
        let mut running = seed;
        for value in &mut current {
            running += *value;
            *value = running;
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn difference_orders() {
        let series = [1.0, 3.0, 6.0, 10.0, 15.0];
        assert_eq!(difference(&series, 0), series.to_vec());
        assert_eq!(difference(&series, 1), vec![2.0, 3.0, 4.0, 5.0]);
        assert_eq!(difference(&series, 2), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn difference_exhausts_short_series() {
        assert!(difference(&[5.0], 1).is_empty());
        assert!(difference(&[], 1).is_empty());
        assert!(difference(&[1.0, 2.0], 2).is_empty());
    }

    #[test]
    fn seeds_record_last_value_per_level() {
        let series = [1.0, 3.0, 6.0, 10.0, 15.0];
        let diffed = difference_with_seeds(&series, 2);
        assert_eq!(diffed.values, vec![1.0, 1.0, 1.0]);
        // Level 0 ends at 15, level 1 (first differences) ends at 5.
        assert_eq!(diffed.seeds, vec![15.0, 5.0]);
    }

    #[test]
    fn integrate_continues_the_original_scale() {
        let original = [10.0, 12.0, 15.0, 19.0, 24.0];
        let diffed = difference_with_seeds(&original, 1);
        let continuation = integrate(&[6.0, 7.0], &diffed.seeds);
        assert_relative_eq!(continuation[0], 30.0, epsilon = 1e-12);
        assert_relative_eq!(continuation[1], 37.0, epsilon = 1e-12);
    }

    #[test]
    fn round_trip_reconstructs_exactly() {
        // Difference the first half, then integrating the second half's
        // differenced values must reproduce the second half.
        let series: Vec<f64> = (0..20)
            .map(|i| 50.0 + 1.7 * i as f64 + 0.03 * (i * i) as f64 + (i as f64 * 0.9).sin())
            .collect();
        for d in 1..=2 {
            let split = 12;
            let head = difference_with_seeds(&series[..split], d);
            let full = difference(&series, d);
            let future = &full[split - d..];
            let rebuilt = integrate(future, &head.seeds);
            assert_eq!(rebuilt.len(), series.len() - split);
            for (got, want) in rebuilt.iter().zip(&series[split..]) {
                assert_relative_eq!(got, want, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn integrate_with_no_seeds_is_identity() {
        assert_eq!(integrate(&[1.0, 2.0], &[]), vec![1.0, 2.0]);
    }
}
