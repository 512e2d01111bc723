//! Selection state for the booking widget.
//!
//! [`BookingWidget`] owns the occupancy index, the fetched window, and the
//! user's current picks. Every input is a method call; after each one the
//! whole view is recomputed from scratch and handed to a [`Renderer`].
//!
//! The table selection moves between two phases:
//!
//! - `Idle` — no table chosen. Changing the date or the hour always returns
//!   here, as does a successful submission.
//! - `TableSelected` — a table that was free at the selected date and hour
//!   when it was clicked. Clicking a booked table never enters this phase.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::availability::{availability_tiers, occupied_tables, Tier};
use crate::config::WidgetConfig;
use crate::error::{BookingError, Result};
use crate::index::OccupancyIndex;
use crate::records::{BookingRecord, DataSnapshot, TableId};
use crate::refresh::{Generations, RefreshOutcome, RefreshTicket};
use crate::slot::{date_to_str, SlotSpan, TimeSlot};
use crate::source::{BookingSource, ReadQueries};
use crate::submission::{BookingTransport, ContactDetails, SubmissionPayload};
use crate::window::Window;

/// The user's current picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    pub date: NaiveDate,
    pub hour: TimeSlot,
    pub people: u32,
    pub duration: SlotSpan,
    pub selected_table: Option<TableId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    TableSelected(TableId),
}

impl SelectionState {
    pub fn phase(&self) -> Phase {
        match self.selected_table {
            Some(table) => Phase::TableSelected(table),
            None => Phase::Idle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    Available,
    Booked,
    /// The currently selected table.
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub table: TableId,
    pub status: TableStatus,
}

/// Everything the view layer needs to draw the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub date: NaiveDate,
    pub hour: TimeSlot,
    pub people: u32,
    pub duration: SlotSpan,
    pub selected_table: Option<TableId>,
    pub tables: Vec<TableView>,
    /// One tier per half hour from opening to closing time.
    pub availability: Vec<Tier>,
}

/// Draws a [`ViewModel`]. Implemented by the DOM layer, or by anything that
/// wants to observe renders.
pub trait Renderer {
    fn render(&mut self, view: &ViewModel);
}

impl<F: FnMut(&ViewModel)> Renderer for F {
    fn render(&mut self, view: &ViewModel) {
        self(view)
    }
}

/// Discards every render.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _view: &ViewModel) {}
}

/// Classify every configured table for `state` against `index`.
pub fn render_view(index: &OccupancyIndex, config: &WidgetConfig, state: &SelectionState) -> ViewModel {
    let occupied = occupied_tables(index, state.date, state.hour);

    let tables = config
        .tables
        .iter()
        .map(|&table| {
            let status = if occupied.contains(&table) {
                TableStatus::Booked
            } else if state.selected_table == Some(table) {
                TableStatus::Active
            } else {
                TableStatus::Available
            };
            TableView { table, status }
        })
        .collect();

    ViewModel {
        date: state.date,
        hour: state.hour,
        people: state.people,
        duration: state.duration,
        selected_table: state.selected_table,
        tables,
        availability: availability_tiers(index, state.date, config.open, config.close, config.capacity),
    }
}

pub struct BookingWidget<R: Renderer = NullRenderer> {
    config: WidgetConfig,
    index: OccupancyIndex,
    window: Window,
    state: SelectionState,
    generations: Generations,
    renderer: R,
}

impl<R: Renderer> BookingWidget<R> {
    /// Start on the first day of `window`, at opening time, with the minimum
    /// party size and duration, and an empty index.
    ///
    /// # Errors
    /// Returns `BookingError::Config` if `config` does not validate.
    pub fn new(config: WidgetConfig, window: Window, renderer: R) -> Result<Self> {
        config.validate()?;
        let state = SelectionState {
            date: window.min(),
            hour: config.open,
            people: config.people_min,
            duration: config.duration_min,
            selected_table: None,
        };
        Ok(BookingWidget {
            config,
            index: OccupancyIndex::new(),
            window,
            state,
            generations: Generations::default(),
            renderer,
        })
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn index(&self) -> &OccupancyIndex {
        &self.index
    }

    pub fn window(&self) -> Window {
        self.window
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Tables booked at the selected date and hour.
    pub fn occupied(&self) -> BTreeSet<TableId> {
        occupied_tables(&self.index, self.state.date, self.state.hour)
    }

    pub fn view(&self) -> ViewModel {
        render_view(&self.index, &self.config, &self.state)
    }

    /// Date picker changed. Clears the table selection.
    ///
    /// # Errors
    /// Returns `BookingError::Validation` if `date` is outside the fetched
    /// window; the state is left unchanged.
    pub fn set_date(&mut self, date: NaiveDate) -> Result<()> {
        if !self.window.contains(date) {
            return Err(BookingError::Validation(format!(
                "date {} is outside {}..{}",
                date_to_str(date),
                date_to_str(self.window.min()),
                date_to_str(self.window.max())
            )));
        }
        self.state.date = date;
        self.state.selected_table = None;
        self.render();
        Ok(())
    }

    /// Hour picker changed. Clears the table selection.
    ///
    /// # Errors
    /// Returns `BookingError::Validation` if `hour` is not within opening hours.
    pub fn set_hour(&mut self, hour: TimeSlot) -> Result<()> {
        if hour < self.config.open || hour >= self.config.close {
            return Err(BookingError::Validation(format!(
                "hour {} is outside opening hours {}-{}",
                hour, self.config.open, self.config.close
            )));
        }
        self.state.hour = hour;
        self.state.selected_table = None;
        self.render();
        Ok(())
    }

    /// People amount changed. Clamped to the configured bounds.
    pub fn set_people(&mut self, people: u32) {
        self.state.people = people.clamp(self.config.people_min, self.config.people_max);
        self.render();
    }

    /// Hours amount changed. Clamped to the configured bounds.
    pub fn set_duration(&mut self, duration: SlotSpan) {
        self.state.duration = duration.clamp(self.config.duration_min, self.config.duration_max);
        self.render();
    }

    /// A table was clicked. Returns whether it is now the selected table.
    ///
    /// Booked tables and ids outside the floor plan are ignored.
    pub fn click_table(&mut self, table: TableId) -> bool {
        if !self.config.has_table(table) {
            tracing::warn!(%table, "click on unknown table ignored");
            return false;
        }
        if self.occupied().contains(&table) {
            tracing::debug!(%table, hour = %self.state.hour, "click on booked table ignored");
            return false;
        }
        self.state.selected_table = Some(table);
        self.render();
        true
    }

    /// Build the payload for the current selection without sending it.
    ///
    /// # Errors
    /// Returns `BookingError::Validation` when no table is selected.
    pub fn prepare_submission(&self, details: &ContactDetails) -> Result<SubmissionPayload> {
        SubmissionPayload::from_selection(&self.state, details)
    }

    /// The booking endpoint accepted `payload`: fold it into the index, clear
    /// the selection, and re-render. No re-fetch happens.
    pub fn confirm_submission(&mut self, payload: &SubmissionPayload) -> BookingRecord {
        let record = payload.record();
        self.index.mark(&record);
        self.state.selected_table = None;
        tracing::info!(
            table = %record.table,
            date = %record.date,
            hour = %record.hour,
            "booking confirmed"
        );
        self.render();
        record
    }

    /// Validate, send, and on success fold the booking in.
    ///
    /// # Errors
    /// - `BookingError::Validation` when no table is selected; `transport` is
    ///   not called.
    /// - `BookingError::Transport` when `transport` fails; the selection and
    ///   the index are left as they were.
    pub fn submit<T: BookingTransport + ?Sized>(
        &mut self,
        transport: &mut T,
        details: &ContactDetails,
    ) -> Result<BookingRecord> {
        let payload = self.prepare_submission(details)?;

        match transport.submit(&payload) {
            Ok(_ack) => Ok(self.confirm_submission(&payload)),
            Err(e) => {
                tracing::warn!(table = %payload.table, error = %e, "booking submission failed");
                Err(match e {
                    BookingError::Transport(_) => e,
                    other => BookingError::Transport(other.to_string()),
                })
            }
        }
    }

    /// Start fetching data for `window`. Any fetch started earlier becomes
    /// stale.
    pub fn begin_refresh(&mut self, window: Window) -> RefreshTicket {
        self.generations.issue(window)
    }

    /// Apply the data fetched for `ticket`, if it is still the latest fetch.
    ///
    /// Rebuilds the index for the ticket's window from the records on the
    /// configured tables, and renders once. If the
    /// selected date left the window it moves to the window's first day; a
    /// selected table that the new data shows as booked is dropped.
    pub fn complete_refresh(&mut self, ticket: RefreshTicket, snapshot: &DataSnapshot) -> RefreshOutcome {
        if !self.generations.is_current(&ticket) {
            tracing::debug!(
                generation = ticket.generation(),
                latest = self.generations.latest(),
                "discarding stale refresh"
            );
            return RefreshOutcome::Stale;
        }

        self.window = ticket.window();
        let snapshot = snapshot.on_floor_plan(&self.config.tables);
        self.index = OccupancyIndex::from_snapshot(&snapshot, &self.window);

        if !self.window.contains(self.state.date) {
            self.state.date = self.window.min();
            self.state.selected_table = None;
        }
        if let Some(table) = self.state.selected_table {
            if self.occupied().contains(&table) {
                tracing::info!(%table, "selected table is now booked, clearing selection");
                self.state.selected_table = None;
            }
        }

        self.render();
        RefreshOutcome::Applied
    }

    /// A fetch failed. The previous index and window stay in place.
    pub fn fail_refresh(&self, ticket: RefreshTicket, error: &BookingError) {
        if self.generations.is_current(&ticket) {
            tracing::warn!(generation = ticket.generation(), %error, "refresh failed");
        } else {
            tracing::debug!(generation = ticket.generation(), %error, "stale refresh failed");
        }
    }

    /// Fetch `window` from `source` and apply it.
    ///
    /// # Errors
    /// Returns the source's error; nothing is changed in that case.
    pub fn refresh<S: BookingSource + ?Sized>(&mut self, source: &mut S, window: Window) -> Result<RefreshOutcome> {
        let ticket = self.begin_refresh(window);
        let queries = ReadQueries::for_window(&window, &self.config.source);
        match source.fetch(&queries) {
            Ok(snapshot) => Ok(self.complete_refresh(ticket, &snapshot)),
            Err(e) => {
                self.fail_refresh(ticket, &e);
                Err(e)
            }
        }
    }

    fn render(&mut self) {
        let view = self.view();
        self.renderer.render(&view);
    }
}
