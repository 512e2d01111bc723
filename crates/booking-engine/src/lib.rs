//! # booking-engine
//!
//! Table availability for restaurant booking widgets.
//!
//! Bookings, one-off venue events, and daily repeating events are merged into a
//! single occupancy index (date → half-hour slot → occupied tables). From it
//! the engine derives the tier strip shown under the hour picker and the
//! booked/free state of every table at the selected date and hour, and keeps
//! the user's table selection consistent as inputs change.
//!
//! ## Modules
//!
//! - [`slot`] — `H:MM` ↔ half-hour slots, date helpers
//! - [`window`] — the fetched date range
//! - [`records`] — bookings, events, and the fetched snapshot
//! - [`index`] — building and patching the occupancy index
//! - [`availability`] — histogram, tiers, occupied and free tables
//! - [`selection`] — the widget state machine and its view model
//! - [`submission`] — booking payloads and the transport boundary
//! - [`source`] — read queries and the data-source boundary
//! - [`refresh`] — generation tokens for overlapping fetches
//! - [`config`] — TOML configuration
//! - [`error`] — Error types

pub mod availability;
pub mod config;
pub mod error;
pub mod index;
pub mod records;
pub mod refresh;
pub mod selection;
pub mod slot;
pub mod source;
pub mod submission;
pub mod window;

pub use availability::{availability_tiers, free_tables, histogram, occupied_tables, Tier};
pub use config::{SourceConfig, WidgetConfig};
pub use error::BookingError;
pub use index::{build, OccupancyIndex};
pub use records::{BookingRecord, DataSnapshot, EventRecord, Repeat, TableId};
pub use refresh::{PendingRefresh, RefreshOutcome, RefreshTicket, Settlement};
pub use selection::{BookingWidget, NullRenderer, Phase, Renderer, SelectionState, TableStatus, ViewModel};
pub use slot::{add_days, date_to_str, hour_to_slot, parse_date, slot_to_hour, SlotSpan, TimeSlot};
pub use source::{BookingSource, ReadQueries};
pub use submission::{Acknowledgement, BookingTransport, ContactDetails, SubmissionPayload};
pub use window::Window;
