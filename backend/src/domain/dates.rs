//! Calendar date helpers.
//!
//! Date keys are `YYYY-MM-DD`, month keys are `YYYY-MM`. All date math is done
//! on `NaiveDate` in the household's local calendar.

use chrono::{Datelike, Local, Months, NaiveDate};
use std::fmt;
use std::str::FromStr;

use super::errors::ProgressError;

/// A calendar month, displayed and parsed as `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Fails for months outside 1..=12 and years chrono can't represent
    pub fn new(year: i32, month: u32) -> Result<Self, ProgressError> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(ProgressError::InvalidMonthKey(format!("{:04}-{:02}", year, month)));
        }
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        // Checked in `new`, day 1 always exists.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn days_in_month(&self) -> u32 {
        days_in_month(self.month, self.year)
    }

    /// Every date of the month, in order
    pub fn days(&self) -> Vec<NaiveDate> {
        self.first_day()
            .iter_days()
            .take(self.days_in_month() as usize)
            .collect()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = ProgressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ProgressError::InvalidMonthKey(s.to_string());
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        MonthKey::new(year, month).map_err(|_| invalid())
    }
}

/// Format a date as a `YYYY-MM-DD` key
pub fn format_date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a strict `YYYY-MM-DD` key
pub fn parse_date_key(key: &str) -> Result<NaiveDate, ProgressError> {
    if key.len() != 10 {
        return Err(ProgressError::InvalidDateKey(key.to_string()));
    }
    NaiveDate::parse_from_str(key, "%Y-%m-%d")
        .map_err(|_| ProgressError::InvalidDateKey(key.to_string()))
}

/// Get the number of days in a given month and year
pub fn days_in_month(month: u32, year: i32) -> u32 {
    match month {
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Check if a year is a leap year
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Today's date on the local wall clock
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// First day of the month `offset` months away from `date`'s month
pub fn shift_month(date: NaiveDate, offset: i32) -> NaiveDate {
    let first = MonthKey::from_date(date).first_day();
    let shifted = if offset >= 0 {
        first.checked_add_months(Months::new(offset as u32))
    } else {
        first.checked_sub_months(Months::new(offset.unsigned_abs()))
    };
    shifted.unwrap_or(first)
}
