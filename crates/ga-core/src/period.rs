//! Calendar window calculation for the four award tiers.
//!
//! A [`Period`] is an inclusive `[start, end]` span: the start is midnight
//! of the first day, the end is 23:59:59 of the last day. Month, quarter,
//! and year windows follow the civil calendar; week boundaries are a policy
//! decision of the caller (calendar week, trailing seven days, ...) and are
//! supplied explicitly.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use thiserror::Error;

/// Errors from window construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PeriodError {
    /// An unrecognized granularity tag was requested.
    #[error("invalid granularity: {value}")]
    InvalidGranularity { value: String },

    /// A month or quarter index outside its calendar range.
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: u32 },

    /// Week windows require explicit start and end dates from the caller.
    #[error("week windows take explicit start and end dates")]
    WeekBoundsRequired,

    /// The supplied week bounds are inverted.
    #[error("week start {start} is after end {end}")]
    InvertedBounds { start: NaiveDate, end: NaiveDate },
}

/// The four nested award tiers' time granularities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Week,
    Month,
    Quarter,
    Year,
}

impl Granularity {
    /// String tag for display and the string entry point.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Granularity {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "quarter" => Ok(Self::Quarter),
            "year" => Ok(Self::Year),
            _ => Err(PeriodError::InvalidGranularity {
                value: s.to_string(),
            }),
        }
    }
}

/// An inclusive calendar window at one granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    pub granularity: Granularity,
    /// First instant of the window (midnight of the first day).
    pub start: NaiveDateTime,
    /// Last instant of the window (23:59:59 of the last day).
    pub end: NaiveDateTime,
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_opt(0, 0, 0).unwrap())
}

fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap())
}

/// Last calendar day of the given month (month is validated by callers).
fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1).unwrap() - Duration::days(1)
}

impl Period {
    /// A week window with caller-supplied bounds.
    pub fn week(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        if start > end {
            return Err(PeriodError::InvertedBounds { start, end });
        }
        Ok(Self {
            granularity: Granularity::Week,
            start: start_of_day(start),
            end: end_of_day(end),
        })
    }

    /// The calendar month window, `month` in 1..=12.
    pub fn month(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::OutOfRange {
                field: "month",
                value: month,
            });
        }
        let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
        Ok(Self {
            granularity: Granularity::Month,
            start: start_of_day(first),
            end: end_of_day(last_day_of_month(year, month)),
        })
    }

    /// The civil quarter window, `quarter` in 1..=4.
    ///
    /// Quarter q spans months `3q-2 ..= 3q`.
    pub fn quarter(year: i32, quarter: u32) -> Result<Self, PeriodError> {
        if !(1..=4).contains(&quarter) {
            return Err(PeriodError::OutOfRange {
                field: "quarter",
                value: quarter,
            });
        }
        let first_month = (quarter - 1) * 3 + 1;
        let last_month = quarter * 3;
        let first = NaiveDate::from_ymd_opt(year, first_month, 1).unwrap();
        Ok(Self {
            granularity: Granularity::Quarter,
            start: start_of_day(first),
            end: end_of_day(last_day_of_month(year, last_month)),
        })
    }

    /// The calendar year window, Jan 1 through Dec 31.
    #[must_use]
    pub fn year(year: i32) -> Self {
        Self {
            granularity: Granularity::Year,
            start: start_of_day(NaiveDate::from_ymd_opt(year, 1, 1).unwrap()),
            end: end_of_day(NaiveDate::from_ymd_opt(year, 12, 31).unwrap()),
        }
    }

    /// Whether a play-log date falls inside the window, inclusive on both
    /// ends.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.date() <= date && date <= self.end.date()
    }

    /// First calendar day of the window.
    #[must_use]
    pub const fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Last calendar day of the window.
    #[must_use]
    pub const fn end_date(&self) -> NaiveDate {
        self.end.date()
    }
}

/// String-tag entry point: `window_for("quarter", 2024, Some(1))`.
///
/// Week windows cannot be built this way because the week boundary is the
/// caller's policy; use [`Period::week`].
pub fn window_for(tag: &str, year: i32, index: Option<u32>) -> Result<Period, PeriodError> {
    match tag.parse::<Granularity>()? {
        Granularity::Week => Err(PeriodError::WeekBoundsRequired),
        Granularity::Month => Period::month(
            year,
            index.ok_or(PeriodError::OutOfRange {
                field: "month",
                value: 0,
            })?,
        ),
        Granularity::Quarter => Period::quarter(
            year,
            index.ok_or(PeriodError::OutOfRange {
                field: "quarter",
                value: 0,
            })?,
        ),
        Granularity::Year => Ok(Period::year(year)),
    }
}
