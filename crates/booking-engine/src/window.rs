//! The date range the widget currently holds data for.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};
use crate::slot::{add_days, date_to_str, parse_date};

/// Inclusive `[min, max]` date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WindowRepr")]
pub struct Window {
    min: NaiveDate,
    max: NaiveDate,
}

#[derive(Deserialize)]
struct WindowRepr {
    min: NaiveDate,
    max: NaiveDate,
}

impl TryFrom<WindowRepr> for Window {
    type Error = BookingError;

    fn try_from(repr: WindowRepr) -> Result<Self> {
        Window::new(repr.min, repr.max)
    }
}

impl Window {
    /// # Errors
    /// Returns `BookingError::InvalidWindow` if `min` is after `max`.
    pub fn new(min: NaiveDate, max: NaiveDate) -> Result<Self> {
        if min > max {
            return Err(BookingError::InvalidWindow {
                min: date_to_str(min),
                max: date_to_str(max),
            });
        }
        Ok(Window { min, max })
    }

    /// `first` through `first + days_ahead`, the range the date picker offers.
    pub fn starting(first: NaiveDate, days_ahead: u32) -> Self {
        Window {
            min: first,
            max: add_days(first, i64::from(days_ahead)),
        }
    }

    /// Parse both bounds from `YYYY-MM-DD` strings.
    pub fn parse(min: &str, max: &str) -> Result<Self> {
        Window::new(parse_date(min)?, parse_date(max)?)
    }

    pub fn min(&self) -> NaiveDate {
        self.min
    }

    pub fn max(&self) -> NaiveDate {
        self.max
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.min <= date && date <= self.max
    }

    /// Every date in the window, in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let max = self.max;
        self.min.iter_days().take_while(move |date| *date <= max)
    }
}
