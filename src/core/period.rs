//! Discrete calendar periods at daily, monthly, or quarterly frequency.

use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// Sampling frequency of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Frequency {
    Daily,
    Monthly,
    Quarterly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
        }
    }
}

impl FromStr for Frequency {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        // Accept the pandas-style single-letter codes the source data uses.
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" | "d" => Ok(Frequency::Daily),
            "monthly" | "month" | "m" => Ok(Frequency::Monthly),
            "quarterly" | "quarter" | "q" => Ok(Frequency::Quarterly),
            _ => Err(ForecastError::UnsupportedFrequency(s.to_string())),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discrete calendar unit: one day, one calendar month, or one quarter.
///
/// Periods are ordinal-backed so that consecutive periods differ by exactly
/// one, which makes gap detection and forecasting arithmetic integer-exact:
/// days count from the Common Era, months and quarters from year zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    frequency: Frequency,
    ordinal: i64,
}

impl Period {
    /// Parse a timestamp label into a period at the given frequency.
    ///
    /// Daily accepts `YYYY-MM-DD` (or `/`-separated). Monthly accepts
    /// `YYYY-MM` or a full date, which maps to its month. Quarterly accepts
    /// `YYYYQn` / `YYYY-Qn` or a full date, which maps to its quarter.
    pub fn parse(label: &str, frequency: Frequency) -> Result<Self> {
        let s = label.trim();
        match frequency {
            Frequency::Daily => {
                let date = parse_date(s).ok_or_else(|| ForecastError::MalformedInput {
                    value: label.to_string(),
                    expected: "a date (YYYY-MM-DD)",
                })?;
                Ok(Self::from_date(date, frequency))
            }
            Frequency::Monthly => {
                if let Some((year, month)) = parse_year_month(s) {
                    return Self::monthly(year, month);
                }
                let date = parse_date(s).ok_or_else(|| ForecastError::MalformedInput {
                    value: label.to_string(),
                    expected: "a year-month (YYYY-MM) or date",
                })?;
                Ok(Self::from_date(date, frequency))
            }
            Frequency::Quarterly => {
                if let Some((year, quarter)) = parse_year_quarter(s) {
                    return Self::quarterly(year, quarter);
                }
                let date = parse_date(s).ok_or_else(|| ForecastError::MalformedInput {
                    value: label.to_string(),
                    expected: "a year-quarter (YYYYQn) or date",
                })?;
                Ok(Self::from_date(date, frequency))
            }
        }
    }

    /// Period containing the given date at the given frequency.
    pub fn from_date(date: NaiveDate, frequency: Frequency) -> Self {
        let ordinal = match frequency {
            Frequency::Daily => i64::from(date.num_days_from_ce()),
            Frequency::Monthly => i64::from(date.year()) * 12 + i64::from(date.month0()),
            Frequency::Quarterly => i64::from(date.year()) * 4 + i64::from(date.month0() / 3),
        };
        Self { frequency, ordinal }
    }

    /// Monthly period for a calendar year and 1-based month.
    pub fn monthly(year: i32, month: u32) -> Result<Self> {
        if month < 1 || month > 12 {
            return Err(ForecastError::MalformedInput {
                value: format!("{year}-{month}"),
                expected: "a month between 1 and 12",
            });
        }
        Ok(Self {
            frequency: Frequency::Monthly,
            ordinal: i64::from(year) * 12 + i64::from(month) - 1,
        })
    }

    /// Quarterly period for a calendar year and 1-based quarter.
    pub fn quarterly(year: i32, quarter: u32) -> Result<Self> {
        if quarter < 1 || quarter > 4 {
            return Err(ForecastError::MalformedInput {
                value: format!("{year}Q{quarter}"),
                expected: "a quarter between 1 and 4",
            });
        }
        Ok(Self {
            frequency: Frequency::Quarterly,
            ordinal: i64::from(year) * 4 + i64::from(quarter) - 1,
        })
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn ordinal(&self) -> i64 {
        self.ordinal
    }

    /// The period one frequency step later.
    pub fn next(&self) -> Self {
        Self {
            frequency: self.frequency,
            ordinal: self.ordinal + 1,
        }
    }

    /// The period `steps` frequency steps later.
    pub fn advance(&self, steps: i64) -> Self {
        Self {
            frequency: self.frequency,
            ordinal: self.ordinal + steps,
        }
    }

    /// Number of frequency steps from `self` to `other`.
    pub fn steps_until(&self, other: &Period) -> i64 {
        other.ordinal - self.ordinal
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.frequency {
            Frequency::Daily => {
                match NaiveDate::from_num_days_from_ce_opt(self.ordinal as i32) {
                    Some(date) => write!(f, "{}", date.format("%Y-%m-%d")),
                    None => write!(f, "day#{}", self.ordinal),
                }
            }
            Frequency::Monthly => {
                let year = self.ordinal.div_euclid(12);
                let month = self.ordinal.rem_euclid(12) + 1;
                write!(f, "{year:04}-{month:02}")
            }
            Frequency::Quarterly => {
                let year = self.ordinal.div_euclid(4);
                let quarter = self.ordinal.rem_euclid(4) + 1;
                write!(f, "{year:04}Q{quarter}")
            }
        }
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
        .ok()
}

fn parse_year_month(s: &str) -> Option<(i32, u32)> {
    let (year, month) = s.split_once(['-', '/'])?;
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    if (1..=12).contains(&month) {
        Some((year, month))
    } else {
        None
    }
}

fn parse_year_quarter(s: &str) -> Option<(i32, u32)> {
    let upper = s.to_ascii_uppercase();
    let (year, quarter) = upper.split_once('Q')?;
    let year: i32 = year.trim_end_matches('-').trim().parse().ok()?;
    let quarter: u32 = quarter.trim().parse().ok()?;
    if (1..=4).contains(&quarter) {
        Some((year, quarter))
    } else {
        None
    }
}
