//! The occupancy index: date → half-hour slot → tables occupied in that slot.
//!
//! The index is rebuilt in full from a [`DataSnapshot`] whenever a window is
//! fetched, and patched one record at a time when a booking is confirmed
//! locally. Marking only ever appends, so a table blocked by two records shows
//! up twice in the same slot; readers dedupe.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::records::{BookingRecord, DataSnapshot, EventRecord, Repeat, TableId};
use crate::slot::{SlotSpan, TimeSlot};
use crate::window::Window;

/// Tables occupying each slot of one day.
pub type DaySlots = BTreeMap<TimeSlot, Vec<TableId>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OccupancyIndex {
    days: BTreeMap<NaiveDate, DaySlots>,
}

impl OccupancyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from typed records. See [`build`].
    pub fn from_records(
        bookings: &[BookingRecord],
        current_events: &[EventRecord],
        repeating_events: &[EventRecord],
        window: &Window,
    ) -> Self {
        build(bookings, current_events, repeating_events, window)
    }

    pub fn from_snapshot(snapshot: &DataSnapshot, window: &Window) -> Self {
        build(
            &snapshot.bookings,
            &snapshot.events_current,
            &snapshot.events_repeat,
            window,
        )
    }

    /// Mark every slot in `[hour, hour + duration)` on `date` as occupied by
    /// `table`. A zero duration marks nothing.
    pub fn mark_span(&mut self, date: NaiveDate, hour: TimeSlot, duration: SlotSpan, table: TableId) {
        if duration.is_zero() {
            return;
        }
        let day = self.days.entry(date).or_default();
        for slot in hour.through(duration) {
            day.entry(slot).or_default().push(table);
        }
    }

    /// Fold a single booking into the index.
    pub fn mark(&mut self, booking: &BookingRecord) {
        self.mark_span(booking.date, booking.hour, booking.duration, booking.table);
    }

    /// Tables recorded for the exact slot, duplicates included.
    pub fn slot(&self, date: NaiveDate, slot: TimeSlot) -> Option<&[TableId]> {
        self.days
            .get(&date)
            .and_then(|day| day.get(&slot))
            .map(Vec::as_slice)
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DaySlots> {
        self.days.get(&date)
    }

    /// Dates with at least one marked slot, ascending.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Merge bookings, one-off events, and daily repeating events into an index.
///
/// 1. Bookings and one-off events mark `[hour, hour + duration)` on their own
///    date.
/// 2. Daily repeating events mark the same span on every date of `window`.
///    Entries in `repeating_events` without a daily rule contribute nothing.
/// 3. Marking is additive.
pub fn build(
    bookings: &[BookingRecord],
    current_events: &[EventRecord],
    repeating_events: &[EventRecord],
    window: &Window,
) -> OccupancyIndex {
    let mut index = OccupancyIndex::new();

    for booking in bookings {
        index.mark(booking);
    }

    for event in current_events {
        index.mark_span(event.date, event.hour, event.duration, event.table);
    }

    let mut expanded = 0usize;
    for event in repeating_events {
        if event.repeat != Repeat::Daily {
            tracing::debug!(table = %event.table, date = %event.date, "ignoring non-daily event in repeating list");
            continue;
        }
        for date in window.dates() {
            index.mark_span(date, event.hour, event.duration, event.table);
        }
        expanded += 1;
    }

    tracing::debug!(
        bookings = bookings.len(),
        current_events = current_events.len(),
        repeating_events = expanded,
        dates = index.days.len(),
        "occupancy index rebuilt"
    );

    index
}
