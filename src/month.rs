//! Calendar month keys in the backend's zero-padded `"MM-YYYY"` format.
//!
//! Month keys must never be compared as strings: `"01-2025"` sorts before
//! `"12-2024"` lexically. [`Month`] parses the key into integers and orders
//! by year, then month.

use crate::error::{CostPlanError, Result};
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar month, e.g. `11-2024`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month {
    // Field order matters: the derived Ord compares year first.
    year: i32,
    month: u32,
}

impl Month {
    /// Create a month from a 1-based month number and a year.
    pub fn new(month: u32, year: i32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(CostPlanError::InvalidMonth(format!(
                "month number {} out of range 1-12",
                month
            )));
        }
        if !(1..=9999).contains(&year) {
            return Err(CostPlanError::InvalidMonth(format!(
                "year {} out of range",
                year
            )));
        }
        Ok(Self { year, month })
    }

    /// Parse a `"MM-YYYY"` key.
    pub fn parse(key: &str) -> Result<Self> {
        let invalid = || CostPlanError::InvalidMonth(format!("expected MM-YYYY, got {:?}", key));

        let (mm, yyyy) = key.trim().split_once('-').ok_or_else(invalid)?;
        if mm.len() != 2 || yyyy.len() != 4 {
            return Err(invalid());
        }
        if !mm.bytes().all(|b| b.is_ascii_digit()) || !yyyy.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let month: u32 = mm.parse().map_err(|_| invalid())?;
        let year: i32 = yyyy.parse().map_err(|_| invalid())?;
        Self::new(month, year)
    }

    /// The month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The current local calendar month.
    pub fn current() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// The following calendar month, rolling December into January.
    ///
    /// `None` past December 9999, which has no four-digit key.
    pub fn succ_opt(&self) -> Option<Self> {
        if self.month == 12 {
            Self::new(1, self.year + 1).ok()
        } else {
            Some(Self {
                year: self.year,
                month: self.month + 1,
            })
        }
    }

    /// The preceding calendar month. `None` before January of year 1.
    pub fn pred_opt(&self) -> Option<Self> {
        if self.month == 1 {
            Self::new(12, self.year - 1).ok()
        } else {
            Some(Self {
                year: self.year,
                month: self.month - 1,
            })
        }
    }

    /// Signed number of months from `self` to `other` (positive if `other` is later).
    pub fn months_until(&self, other: &Month) -> i64 {
        let a = i64::from(self.year) * 12 + i64::from(self.month);
        let b = i64::from(other.year) * 12 + i64::from(other.month);
        b - a
    }

    /// First day of the month.
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:04}", self.month, self.year)
    }
}

impl FromStr for Month {
    type Err = CostPlanError;

    fn from_str(s: &str) -> Result<Self> {
        Month::parse(s)
    }
}

impl TryFrom<String> for Month {
    type Error = CostPlanError;

    fn try_from(s: String) -> Result<Self> {
        Month::parse(&s)
    }
}

impl From<Month> for String {
    fn from(m: Month) -> Self {
        m.to_string()
    }
}
