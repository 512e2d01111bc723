//! Booking and event records as the data source delivers them.
//!
//! Table ids, hours, and durations are resolved into their typed forms during
//! deserialization, once. A record that fails to resolve is dropped from the
//! snapshot with a warning; the remaining records still load.

use std::fmt;

use chrono::NaiveDate;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::{BookingError, Result};
use crate::slot::{hour_to_slot, parse_date, SlotSpan, TimeSlot};

/// Identifier of a physical table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TableId(pub u32);

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TableId {
    fn from(id: u32) -> Self {
        TableId(id)
    }
}

impl std::str::FromStr for TableId {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u32>()
            .map(TableId)
            .map_err(|_| BookingError::Format(format!("table id '{}' is not a number", s)))
    }
}

/// Table ids arrive as numbers from the data source and as strings from
/// `data-table` attributes.
#[derive(Deserialize)]
#[serde(untagged)]
enum TableIdRepr {
    Number(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for TableId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match TableIdRepr::deserialize(deserializer)? {
            TableIdRepr::Number(n) => u32::try_from(n)
                .map(TableId)
                .map_err(|_| de::Error::custom(format!("table id {} is out of range", n))),
            TableIdRepr::Text(text) => text.parse().map_err(de::Error::custom),
        }
    }
}

/// Recurrence of a blocked slot. `false`, `null`, and an absent field all
/// mean no recurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Repeat {
    #[default]
    None,
    Daily,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RepeatRepr {
    Flag(bool),
    Rule(String),
}

impl<'de> Deserialize<'de> for Repeat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match Option::<RepeatRepr>::deserialize(deserializer)? {
            None | Some(RepeatRepr::Flag(false)) => Ok(Repeat::None),
            Some(RepeatRepr::Rule(rule)) if rule.eq_ignore_ascii_case("daily") => Ok(Repeat::Daily),
            Some(RepeatRepr::Flag(true)) => Err(de::Error::custom("repeat rule 'true' is not supported")),
            Some(RepeatRepr::Rule(rule)) => Err(de::Error::custom(format!(
                "repeat rule '{}' is not supported",
                rule
            ))),
        }
    }
}

impl Serialize for Repeat {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Repeat::None => serializer.serialize_bool(false),
            Repeat::Daily => serializer.serialize_str("daily"),
        }
    }
}

/// A confirmed reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub date: NaiveDate,
    pub hour: TimeSlot,
    pub duration: SlotSpan,
    pub table: TableId,
}

impl BookingRecord {
    /// Build a record from wire-form values (`"2019-01-02"`, `"12:00"`, hours).
    pub fn parse(date: &str, hour: &str, duration_hours: f64, table: u32) -> Result<Self> {
        Ok(BookingRecord {
            date: parse_date(date)?,
            hour: hour_to_slot(hour)?,
            duration: SlotSpan::from_hours(duration_hours)?,
            table: TableId(table),
        })
    }
}

/// A slot blocked by the venue, optionally recurring every day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub date: NaiveDate,
    pub hour: TimeSlot,
    pub duration: SlotSpan,
    pub table: TableId,
    #[serde(default)]
    pub repeat: Repeat,
}

impl EventRecord {
    pub fn parse(
        date: &str,
        hour: &str,
        duration_hours: f64,
        table: u32,
        repeat: Repeat,
    ) -> Result<Self> {
        Ok(EventRecord {
            date: parse_date(date)?,
            hour: hour_to_slot(hour)?,
            duration: SlotSpan::from_hours(duration_hours)?,
            table: TableId(table),
            repeat,
        })
    }
}

/// The three record lists fetched for one window.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataSnapshot {
    #[serde(rename = "booking")]
    pub bookings: Vec<BookingRecord>,
    #[serde(rename = "eventsCurrent")]
    pub events_current: Vec<EventRecord>,
    #[serde(rename = "eventsRepeat")]
    pub events_repeat: Vec<EventRecord>,
}

#[derive(Deserialize)]
struct SnapshotDocument {
    #[serde(default)]
    booking: Vec<Value>,
    #[serde(default, rename = "eventsCurrent")]
    events_current: Vec<Value>,
    #[serde(default, rename = "eventsRepeat")]
    events_repeat: Vec<Value>,
}

impl DataSnapshot {
    /// Parse a `{"booking": [..], "eventsCurrent": [..], "eventsRepeat": [..]}`
    /// document. Missing lists are treated as empty.
    ///
    /// # Errors
    /// Returns `BookingError::Format` only if the document itself is not valid
    /// JSON of that shape. Individual malformed records are skipped.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: SnapshotDocument = serde_json::from_str(json)
            .map_err(|e| BookingError::Format(format!("snapshot document: {}", e)))?;

        Ok(DataSnapshot::from_lists(
            document.booking,
            document.events_current,
            document.events_repeat,
        ))
    }

    /// Build a snapshot from the three raw response bodies, one JSON array each.
    pub fn from_lists(bookings: Vec<Value>, events_current: Vec<Value>, events_repeat: Vec<Value>) -> Self {
        DataSnapshot {
            bookings: parse_records("booking", bookings),
            events_current: parse_records("current event", events_current),
            events_repeat: parse_records("repeating event", events_repeat),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty() && self.events_current.is_empty() && self.events_repeat.is_empty()
    }

    /// A copy holding only the records whose table is one of `tables`.
    ///
    /// Records for tables missing from the floor plan are logged and dropped,
    /// so occupancy counts never exceed the number of configured tables.
    pub fn on_floor_plan(&self, tables: &[TableId]) -> DataSnapshot {
        DataSnapshot {
            bookings: retain_tables("booking", &self.bookings, tables, |r| r.table),
            events_current: retain_tables("current event", &self.events_current, tables, |r| r.table),
            events_repeat: retain_tables("repeating event", &self.events_repeat, tables, |r| r.table),
        }
    }
}

fn retain_tables<T: Copy>(kind: &str, records: &[T], tables: &[TableId], table_of: impl Fn(&T) -> TableId) -> Vec<T> {
    records
        .iter()
        .filter(|record| {
            let table = table_of(record);
            let known = tables.contains(&table);
            if !known {
                tracing::warn!(kind, %table, "skipping record for table outside the floor plan");
            }
            known
        })
        .copied()
        .collect()
}

/// Deserialize each item on its own, logging and dropping the ones that fail.
pub fn parse_records<T: DeserializeOwned>(kind: &str, items: Vec<Value>) -> Vec<T> {
    let total = items.len();
    let records: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(position, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(kind, position, error = %e, "skipping malformed record");
                None
            }
        })
        .collect();

    if records.len() < total {
        tracing::debug!(kind, total, kept = records.len(), "records skipped");
    }
    records
}
