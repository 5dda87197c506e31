//! Forecast output table: point forecasts with confidence bounds per period.

use crate::core::period::Period;

/// One forecast step: a future period, its point forecast, and the symmetric
/// confidence bounds around it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastEntry {
    pub period: Period,
    pub point: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Ordered forecast table, one entry per step in increasing period order.
///
/// Produced once per forecast call and returned by value; holds no reference
/// back into the fitted model.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    confidence_level: f64,
    entries: Vec<ForecastEntry>,
}

impl ForecastResult {
    pub(crate) fn new(confidence_level: f64, entries: Vec<ForecastEntry>) -> Self {
        Self {
            confidence_level,
            entries,
        }
    }

    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    pub fn horizon(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[ForecastEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &ForecastEntry> {
        self.entries.iter()
    }

    pub fn points(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.point).collect()
    }

    pub fn lower_bounds(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.lower).collect()
    }

    pub fn upper_bounds(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.upper).collect()
    }

    /// Render the table for an external writer: one row per step with the
    /// period label, point forecast, lower bound, and upper bound.
    pub fn rows(&self) -> Vec<(String, f64, f64, f64)> {
        self.entries
            .iter()
            .map(|e| (e.period.to_string(), e.point, e.lower, e.upper))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::period::Period;

    fn sample() -> ForecastResult {
        let start = Period::monthly(2025, 1).unwrap();
        let entries = (0..3)
            .map(|i| ForecastEntry {
                period: start.advance(i),
                point: 10.0 + i as f64,
                lower: 9.0 + i as f64,
                upper: 11.0 + i as f64,
            })
            .collect();
        ForecastResult::new(0.95, entries)
    }

    #[test]
    fn accessors_expose_columns() {
        let result = sample();
        assert_eq!(result.horizon(), 3);
        assert_eq!(result.confidence_level(), 0.95);
        assert_eq!(result.points(), vec![10.0, 11.0, 12.0]);
        assert_eq!(result.lower_bounds(), vec![9.0, 10.0, 11.0]);
        assert_eq!(result.upper_bounds(), vec![11.0, 12.0, 13.0]);
    }

    #[test]
    fn rows_render_period_labels() {
        let rows = sample().rows();
        assert_eq!(rows[0].0, "2025-01");
        assert_eq!(rows[2].0, "2025-03");
        assert_eq!(rows[1].1, 11.0);
    }
}
