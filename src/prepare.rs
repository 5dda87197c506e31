//! Series preparation: raw (timestamp, value) pairs to a validated series.

use crate::arima::ArimaOrder;
use crate::core::{Frequency, Period, TimeSeries};
use crate::error::{ForecastError, Result};
use std::collections::BTreeMap;

/// How missing or unparseable observations are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapPolicy {
    /// Drop rows that fail to parse; surviving rows are kept as-is.
    DropMissing,
    /// Fill every missing slot on the contiguous period grid by linear
    /// interpolation between its nearest observed neighbours.
    InterpolateLinear,
}

/// An unparsed observation as handed over by the external loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawObservation {
    pub timestamp: String,
    pub value: String,
}

impl RawObservation {
    pub fn new(timestamp: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            value: value.into(),
        }
    }
}

/// Normalizes raw pairs into a strictly ordered, deduplicated series at a
/// fixed frequency.
///
/// Timestamps are parsed into discrete periods, values are parsed with
/// decoration stripping (percent suffix, thousands separators), duplicate
/// periods resolve to the last occurrence, and gaps are handled per
/// [`GapPolicy`].
#[derive(Debug, Clone)]
pub struct SeriesPreparer {
    frequency: Frequency,
    gap_policy: GapPolicy,
    min_observations: usize,
}

impl SeriesPreparer {
    pub fn new(frequency: Frequency, gap_policy: GapPolicy) -> Self {
        Self {
            frequency,
            gap_policy,
            min_observations: 1,
        }
    }

    /// A preparer that enforces the observation floor `p + d + q + 1` the
    /// downstream fit requires.
    pub fn for_order(frequency: Frequency, gap_policy: GapPolicy, order: ArimaOrder) -> Self {
        Self {
            frequency,
            gap_policy,
            min_observations: order.min_observations(),
        }
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn gap_policy(&self) -> GapPolicy {
        self.gap_policy
    }

    pub fn prepare(&self, raw: &[RawObservation]) -> Result<TimeSeries> {
        // Last occurrence wins on exact period collision, so a plain insert
        // over an ordered map does both the dedup and the sort.
        let mut slots: BTreeMap<Period, Option<f64>> = BTreeMap::new();
        for obs in raw {
            let Ok(period) = Period::parse(&obs.timestamp, self.frequency) else {
                // A row that cannot be placed on the grid is dropped under
                // both policies.
                continue;
            };
            match parse_value(&obs.value) {
                Some(value) => {
                    slots.insert(period, Some(value));
                }
                None => match self.gap_policy {
                    GapPolicy::DropMissing => {}
                    GapPolicy::InterpolateLinear => {
                        slots.insert(period, None);
                    }
                },
            }
        }

        let (periods, values) = match self.gap_policy {
            GapPolicy::DropMissing => {
                let mut periods = Vec::new();
                let mut values = Vec::new();
                for (period, value) in &slots {
                    if let Some(v) = value {
                        periods.push(*period);
                        values.push(*v);
                    }
                }
                (periods, values)
            }
            GapPolicy::InterpolateLinear => self.interpolated_grid(&slots),
        };

        if periods.len() < self.min_observations {
            return Err(ForecastError::InsufficientData {
                needed: self.min_observations,
                got: periods.len(),
            });
        }

        let series = TimeSeries::new(periods, values)?;
        if self.gap_policy == GapPolicy::DropMissing && !series.is_contiguous() {
            log::warn!(
                "prepared {} series has gaps between {} and {} after dropping rows; \
                 periods will be treated as consecutive steps",
                self.frequency,
                series.first_period(),
                series.last_period(),
            );
        }
        Ok(series)
    }

    /// Build the contiguous grid from the first to the last observed period
    /// and fill empty slots linearly. Unanchored edges (leading or trailing
    /// slots with no observed value) are trimmed, not extrapolated.
    fn interpolated_grid(&self, slots: &BTreeMap<Period, Option<f64>>) -> (Vec<Period>, Vec<f64>) {
        let anchored: Vec<Period> = slots
            .iter()
            .filter_map(|(p, v)| v.is_some().then_some(*p))
            .collect();
        let (Some(&first), Some(&last)) = (anchored.first(), anchored.last()) else {
            return (vec![], vec![]);
        };

        let span = first.steps_until(&last) as usize + 1;
        let mut periods = Vec::with_capacity(span);
        let mut values: Vec<Option<f64>> = Vec::with_capacity(span);
        for step in 0..span {
            let period = first.advance(step as i64);
            periods.push(period);
            values.push(slots.get(&period).copied().flatten());
        }

        let mut filled = Vec::with_capacity(span);
        let mut prev_anchor = 0usize;
        for i in 0..span {
            match values[i] {
                Some(v) => {
                    filled.push(v);
                    prev_anchor = i;
                }
                None => {
                    // The next anchor always exists: the grid ends on one.
                    let next_anchor = (i + 1..span)
                        .find(|&j| values[j].is_some())
                        .unwrap_or(span - 1);
                    let left = filled[prev_anchor];
                    let right = values[next_anchor].unwrap_or(left);
                    let fraction =
                        (i - prev_anchor) as f64 / (next_anchor - prev_anchor) as f64;
                    filled.push(left + fraction * (right - left));
                }
            }
        }
        (periods, filled)
    }
}

/// Parse a numeric token, stripping percent suffixes, thousands separators,
/// and surrounding whitespace. Returns `None` for anything non-finite.
fn parse_value(token: &str) -> Option<f64> {
    let trimmed = token.trim().trim_end_matches('%').trim();
    if trimmed.is_empty() {
        return None;
    }
    let cleaned: String = trimmed.chars().filter(|&c| c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn obs(pairs: &[(&str, &str)]) -> Vec<RawObservation> {
        pairs
            .iter()
            .map(|(t, v)| RawObservation::new(*t, *v))
            .collect()
    }

    #[test]
    fn parse_value_strips_decoration() {
        assert_eq!(parse_value(" 5.3% "), Some(5.3));
        assert_eq!(parse_value("2,315.40"), Some(2315.4));
        assert_eq!(parse_value("-0.7"), Some(-0.7));
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("n/a"), None);
        assert_eq!(parse_value("NaN"), None);
    }

    #[test]
    fn sorts_and_deduplicates_last_wins() {
        let preparer = SeriesPreparer::new(Frequency::Monthly, GapPolicy::DropMissing);
        let series = preparer
            .prepare(&obs(&[
                ("2024-03", "3.0"),
                ("2024-01", "1.0"),
                ("2024-02", "2.0"),
                ("2024-01", "1.5"),
            ]))
            .unwrap();
        assert_eq!(series.values(), &[1.5, 2.0, 3.0]);
        assert!(series.is_contiguous());
        assert_eq!(series.first_period().to_string(), "2024-01");
    }

    #[test]
    fn drop_policy_excludes_malformed_rows() {
        let preparer = SeriesPreparer::new(Frequency::Monthly, GapPolicy::DropMissing);
        let series = preparer
            .prepare(&obs(&[
                ("2024-01", "4.1%"),
                ("", "4.2%"),
                ("2024-03", "bad"),
                ("2024-04", "4.4%"),
            ]))
            .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.values(), &[4.1, 4.4]);
    }

    #[test]
    fn missing_day_is_interpolated_to_neighbour_mean() {
        // Ten daily closes with day 5 absent: its slot must become the
        // arithmetic mean of day 4 and day 6.
        let mut rows = Vec::new();
        for day in 1..=10u32 {
            if day == 5 {
                continue;
            }
            rows.push(RawObservation::new(
                format!("2024-07-{day:02}"),
                format!("{}", 2300.0 + day as f64 * 2.0),
            ));
        }
        let preparer = SeriesPreparer::new(Frequency::Daily, GapPolicy::InterpolateLinear);
        let series = preparer.prepare(&rows).unwrap();
        assert_eq!(series.len(), 10);
        assert!(series.is_contiguous());
        let day4 = series.values()[3];
        let day6 = series.values()[5];
        assert_relative_eq!(series.values()[4], (day4 + day6) / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn interpolation_spans_longer_gaps_linearly() {
        let preparer = SeriesPreparer::new(Frequency::Monthly, GapPolicy::InterpolateLinear);
        let series = preparer
            .prepare(&obs(&[("2024-01", "10.0"), ("2024-04", "16.0")]))
            .unwrap();
        assert_eq!(series.len(), 4);
        assert_relative_eq!(series.values()[1], 12.0, epsilon = 1e-12);
        assert_relative_eq!(series.values()[2], 14.0, epsilon = 1e-12);
    }

    #[test]
    fn unparseable_value_becomes_an_interpolated_slot() {
        let preparer = SeriesPreparer::new(Frequency::Quarterly, GapPolicy::InterpolateLinear);
        let series = preparer
            .prepare(&obs(&[
                ("2024Q1", "1.0"),
                ("2024Q2", "??"),
                ("2024Q3", "3.0"),
            ]))
            .unwrap();
        assert_eq!(series.values(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn unanchored_edges_are_trimmed_not_extrapolated() {
        let preparer = SeriesPreparer::new(Frequency::Monthly, GapPolicy::InterpolateLinear);
        let series = preparer
            .prepare(&obs(&[
                ("2024-01", "bad"),
                ("2024-02", "2.0"),
                ("2024-03", "3.0"),
                ("2024-04", "bad"),
            ]))
            .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.first_period().to_string(), "2024-02");
    }

    #[test]
    fn observation_floor_is_enforced() {
        let preparer = SeriesPreparer::for_order(
            Frequency::Monthly,
            GapPolicy::DropMissing,
            ArimaOrder::new(1, 1, 1),
        );
        // Floor is p+d+q+1 = 4; only three rows survive.
        let err = preparer
            .prepare(&obs(&[
                ("2024-01", "1.0"),
                ("", "2.0"),
                ("2024-03", "3.0"),
                ("2024-04", "4.0"),
            ]))
            .unwrap_err();
        assert_eq!(err, ForecastError::InsufficientData { needed: 4, got: 3 });
    }

    #[test]
    fn empty_input_is_insufficient() {
        let preparer = SeriesPreparer::new(Frequency::Daily, GapPolicy::InterpolateLinear);
        assert!(matches!(
            preparer.prepare(&[]),
            Err(ForecastError::InsufficientData { needed: 1, got: 0 })
        ));
    }
}
