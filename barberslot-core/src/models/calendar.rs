//! Calendar day types.
//!
//! - [`CalendarDate`] - A concrete day with a 1-indexed month, as sent on the wire
//! - [`PickedDate`] - A day as reported by a date-picker widget (0-indexed month)

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ============================================================================
// Calendar Date
// ============================================================================

/// A concrete calendar day.
///
/// The month is 1-indexed (January = 1). Time of day never participates in
/// construction or comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "CalendarDateRepr", into = "CalendarDateRepr")]
pub struct CalendarDate {
    year: i32,
    month: u32,
    day: u32,
}

#[derive(Serialize, Deserialize)]
struct CalendarDateRepr {
    year: i32,
    month: u32,
    day: u32,
}

impl TryFrom<CalendarDateRepr> for CalendarDate {
    type Error = CoreError;

    fn try_from(repr: CalendarDateRepr) -> Result<Self, Self::Error> {
        Self::new(repr.year, repr.month, repr.day)
    }
}

impl From<CalendarDate> for CalendarDateRepr {
    fn from(date: CalendarDate) -> Self {
        Self {
            year: date.year,
            month: date.month,
            day: date.day,
        }
    }
}

impl CalendarDate {
    /// Creates a date from year, 1-indexed month and day.
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, CoreError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self::from_naive)
            .ok_or_else(|| CoreError::InvalidDate(format!("{year:04}-{month:02}-{day:02}")))
    }

    /// Creates a date from a chrono naive date.
    pub fn from_naive(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }

    /// Takes the calendar day of an instant in its own time zone,
    /// discarding the time of day.
    pub fn from_datetime<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self::from_naive(instant.date_naive())
    }

    /// Today in the local time zone.
    pub fn today() -> Self {
        Self::from_datetime(&Local::now())
    }

    /// Converts a picker report, adding one to its 0-indexed month.
    pub fn from_picker(picked: PickedDate) -> Result<Self, CoreError> {
        let month = picked
            .month0
            .checked_add(1)
            .ok_or_else(|| CoreError::InvalidDate(format!("month index {}", picked.month0)))?;
        Self::new(picked.year, month, picked.day)
    }

    /// Converts back to the picker's 0-indexed representation.
    pub fn to_picker(self) -> PickedDate {
        PickedDate {
            year: self.year,
            month0: self.month - 1,
            day: self.day,
        }
    }

    /// Year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month, 1–12.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Day of month.
    pub fn day(&self) -> u32 {
        self.day
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for CalendarDate {
    type Err = CoreError;

    /// Parses `YYYY-MM-DD`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Self::from_naive)
            .map_err(|_| CoreError::InvalidDate(s.to_string()))
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self::from_naive(date)
    }
}

// ============================================================================
// Picked Date
// ============================================================================

/// A date as produced by a native date-picker widget.
///
/// Pickers report months 0-indexed (January = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PickedDate {
    /// Year.
    pub year: i32,
    /// Month index, 0–11.
    pub month0: u32,
    /// Day of month.
    pub day: u32,
}

impl PickedDate {
    /// Creates a picker report.
    pub fn new(year: i32, month0: u32, day: u32) -> Self {
        Self { year, month0, day }
    }
}
