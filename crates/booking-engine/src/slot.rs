//! Half-hour slot arithmetic and calendar date helpers.
//!
//! A [`TimeSlot`] is stored as a count of half hours since midnight, so every
//! slot is a multiple of 0.5 hours by construction. Hour strings use the
//! `H:MM` form the hour picker emits (`"12:00"`, `"9:30"`).

use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{BookingError, Result};

/// Number of slots in one hour.
pub const SLOTS_PER_HOUR: u16 = 2;

/// The string form of a [`NaiveDate`] on the wire.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const END_OF_DAY: u16 = 24 * SLOTS_PER_HOUR;

/// Longest span a single record may occupy (one full day).
const MAX_SPAN: u16 = END_OF_DAY;

/// A half-hour aligned point in the day.
///
/// Parsed slots lie in `0:00..=24:00`. Slots produced by advancing past the end
/// of a long span may run beyond `24:00`; they are kept on the same date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot(u16);

impl TimeSlot {
    pub const MIDNIGHT: TimeSlot = TimeSlot(0);
    pub const END_OF_DAY: TimeSlot = TimeSlot(END_OF_DAY);

    pub const fn from_half_hours(half_hours: u16) -> Self {
        TimeSlot(half_hours)
    }

    /// Build a slot from a numeric hour (`14.5` → `14:30`).
    ///
    /// # Errors
    /// Returns `BookingError::Format` if `hours` is negative, past 24, or not a
    /// multiple of 0.5.
    pub fn from_hours(hours: f64) -> Result<Self> {
        let halves = half_hours_of(hours, "hour")?;
        if halves > END_OF_DAY {
            return Err(BookingError::Format(format!(
                "hour {} is past the end of the day",
                hours
            )));
        }
        Ok(TimeSlot(halves))
    }

    pub const fn half_hours(self) -> u16 {
        self.0
    }

    /// The numeric hour value (`14:30` → `14.5`).
    pub fn as_hours(self) -> f64 {
        f64::from(self.0) / f64::from(SLOTS_PER_HOUR)
    }

    /// The slot `span` later.
    pub fn advance(self, span: SlotSpan) -> TimeSlot {
        TimeSlot(self.0.saturating_add(span.0))
    }

    /// Every slot in `[self, self + span)`.
    pub fn through(self, span: SlotSpan) -> impl Iterator<Item = TimeSlot> {
        (self.0..self.advance(span).0).map(TimeSlot)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.0 / SLOTS_PER_HOUR;
        let minutes = (self.0 % SLOTS_PER_HOUR) * 30;
        write!(f, "{}:{:02}", hours, minutes)
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Hours arrive either as `"H:MM"` strings or as numeric hours.
#[derive(Deserialize)]
#[serde(untagged)]
enum HourRepr {
    Text(String),
    Number(f64),
}

impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match HourRepr::deserialize(deserializer)? {
            HourRepr::Text(text) => hour_to_slot(&text),
            HourRepr::Number(hours) => TimeSlot::from_hours(hours),
        }
        .map_err(de::Error::custom)
    }
}

/// A duration measured in half-hour slots.
///
/// On the wire a span is written in hours (`1`, `1.5`), which is the unit the
/// hours-amount widget and the data source use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SlotSpan(u16);

impl SlotSpan {
    pub const ZERO: SlotSpan = SlotSpan(0);

    pub const fn from_half_hours(half_hours: u16) -> Self {
        SlotSpan(half_hours)
    }

    /// # Errors
    /// Returns `BookingError::Format` if `hours` is negative, longer than a
    /// day, or not a multiple of 0.5.
    pub fn from_hours(hours: f64) -> Result<Self> {
        let halves = half_hours_of(hours, "duration")?;
        if halves > MAX_SPAN {
            return Err(BookingError::Format(format!(
                "duration {} is longer than a day",
                hours
            )));
        }
        Ok(SlotSpan(halves))
    }

    pub const fn half_hours(self) -> u16 {
        self.0
    }

    pub fn as_hours(self) -> f64 {
        f64::from(self.0) / f64::from(SLOTS_PER_HOUR)
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl Serialize for SlotSpan {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.0 % SLOTS_PER_HOUR == 0 {
            serializer.serialize_u64(u64::from(self.0 / SLOTS_PER_HOUR))
        } else {
            serializer.serialize_f64(self.as_hours())
        }
    }
}

impl<'de> Deserialize<'de> for SlotSpan {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let hours = f64::deserialize(deserializer)?;
        SlotSpan::from_hours(hours).map_err(de::Error::custom)
    }
}

fn half_hours_of(hours: f64, what: &str) -> Result<u16> {
    if !hours.is_finite() || hours < 0.0 {
        return Err(BookingError::Format(format!(
            "{} {} must be a non-negative number",
            what, hours
        )));
    }
    let halves = hours * f64::from(SLOTS_PER_HOUR);
    if halves.fract() != 0.0 {
        return Err(BookingError::Format(format!(
            "{} {} is not a multiple of half an hour",
            what, hours
        )));
    }
    if halves > f64::from(u16::MAX) {
        return Err(BookingError::Format(format!("{} {} is too large", what, hours)));
    }
    Ok(halves as u16)
}

/// Parse an `H:MM` hour string into a slot.
///
/// The hour is unpadded (`9:30`, `14:00`) so that every accepted string is
/// exactly what [`slot_to_hour`] renders. Minutes must be `00` or `30`.
/// `24:00` is accepted as the closing bound of the day.
///
/// # Errors
/// Returns `BookingError::Format` for anything else.
pub fn hour_to_slot(hour: &str) -> Result<TimeSlot> {
    let malformed = || BookingError::Format(format!("hour '{}' is not in H:MM form", hour));

    let (h, m) = hour.split_once(':').ok_or_else(malformed)?;
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if h.len() > 2 || m.len() != 2 || !all_digits(h) || !all_digits(m) {
        return Err(malformed());
    }
    if h.len() == 2 && h.starts_with('0') {
        return Err(BookingError::Format(format!(
            "hour '{}' has a zero-padded hour, expected '{}:{}'",
            hour,
            &h[1..],
            m
        )));
    }

    let hours: u16 = h.parse().map_err(|_| malformed())?;
    let minutes: u16 = m.parse().map_err(|_| malformed())?;

    let half = match minutes {
        0 => 0,
        30 => 1,
        _ => {
            return Err(BookingError::Format(format!(
                "hour '{}' is not aligned to a half hour",
                hour
            )))
        }
    };

    let slot = hours * SLOTS_PER_HOUR + half;
    if slot > END_OF_DAY {
        return Err(BookingError::Format(format!(
            "hour '{}' is past the end of the day",
            hour
        )));
    }
    Ok(TimeSlot(slot))
}

/// Render a slot as `H:MM`. Inverse of [`hour_to_slot`].
pub fn slot_to_hour(slot: TimeSlot) -> String {
    slot.to_string()
}

/// Every slot in `[open, close)`. Empty when `close <= open`.
pub fn slots_between(open: TimeSlot, close: TimeSlot) -> impl Iterator<Item = TimeSlot> {
    (open.0..close.0).map(TimeSlot)
}

/// Parse a `YYYY-MM-DD` date.
///
/// # Errors
/// Returns `BookingError::Format` if the string is not a valid calendar date.
pub fn parse_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|e| BookingError::Format(format!("date '{}': {}", date, e)))
}

pub fn date_to_str(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Shift `date` by `days` (negative moves backwards). Saturates at the ends of
/// the representable calendar.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    Duration::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .unwrap_or(if days < 0 {
            NaiveDate::MIN
        } else {
            NaiveDate::MAX
        })
}
