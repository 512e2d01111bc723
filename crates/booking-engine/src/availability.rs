//! Read-only queries over an [`OccupancyIndex`].
//!
//! The histogram feeds the range indicator under the hour picker; the occupied
//! set drives the booked/free state of each table for the selected date and
//! hour. Absent dates and slots are vacant. Nothing here mutates the index.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::index::OccupancyIndex;
use crate::records::TableId;
use crate::slot::{slots_between, TimeSlot};

/// Visual bucket for one slot of the range indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Empty,
    Medium,
    Full,
}

impl Tier {
    /// `0` is empty, anything at or above `capacity` is full, the rest medium.
    pub fn classify(count: usize, capacity: usize) -> Tier {
        if count == 0 {
            Tier::Empty
        } else if count >= capacity {
            Tier::Full
        } else {
            Tier::Medium
        }
    }

    /// CSS class name used by the range indicator.
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Empty => "empty",
            Tier::Medium => "medium",
            Tier::Full => "full",
        }
    }
}

/// Count of distinct occupied tables for every slot in `[open, close)`.
///
/// The result has one entry per half hour; an inverted range yields an empty
/// vector.
pub fn histogram(index: &OccupancyIndex, date: NaiveDate, open: TimeSlot, close: TimeSlot) -> Vec<usize> {
    let day = index.day(date);
    slots_between(open, close)
        .map(|slot| {
            day.and_then(|slots| slots.get(&slot))
                .map(|tables| tables.iter().collect::<BTreeSet<_>>().len())
                .unwrap_or(0)
        })
        .collect()
}

/// The histogram classified into tiers against `capacity`.
pub fn availability_tiers(
    index: &OccupancyIndex,
    date: NaiveDate,
    open: TimeSlot,
    close: TimeSlot,
    capacity: usize,
) -> Vec<Tier> {
    histogram(index, date, open, close)
        .into_iter()
        .map(|count| Tier::classify(count, capacity))
        .collect()
}

/// Tables occupied at exactly `hour` on `date`. Empty when nothing is recorded.
pub fn occupied_tables(index: &OccupancyIndex, date: NaiveDate, hour: TimeSlot) -> BTreeSet<TableId> {
    index
        .slot(date, hour)
        .map(|tables| tables.iter().copied().collect())
        .unwrap_or_default()
}

/// The subset of `tables` not occupied at `hour` on `date`, in the given order.
pub fn free_tables(
    index: &OccupancyIndex,
    date: NaiveDate,
    hour: TimeSlot,
    tables: &[TableId],
) -> Vec<TableId> {
    let occupied = occupied_tables(index, date, hour);
    tables
        .iter()
        .copied()
        .filter(|table| !occupied.contains(table))
        .collect()
}
