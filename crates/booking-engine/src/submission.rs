//! Turning a confirmed selection into a booking request.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BookingError, Result};
use crate::records::{BookingRecord, TableId};
use crate::selection::SelectionState;
use crate::slot::{SlotSpan, TimeSlot};

/// Form fields collected alongside the table selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactDetails {
    pub address: String,
    pub phone: String,
    /// Values of the checked starter inputs.
    pub starters: Vec<String>,
}

/// The body posted to the booking endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub table: TableId,
    pub date: NaiveDate,
    pub hour: TimeSlot,
    pub ppl: u32,
    pub duration: SlotSpan,
    pub starters: Vec<String>,
    pub address: String,
    pub phone: String,
}

impl SubmissionPayload {
    /// # Errors
    /// Returns `BookingError::Validation("no table selected")` when the
    /// selection has no table.
    pub fn from_selection(selection: &SelectionState, details: &ContactDetails) -> Result<Self> {
        let table = selection
            .selected_table
            .ok_or_else(|| BookingError::Validation("no table selected".to_string()))?;

        Ok(SubmissionPayload {
            table,
            date: selection.date,
            hour: selection.hour,
            ppl: selection.people,
            duration: selection.duration,
            starters: details.starters.clone(),
            address: details.address.clone(),
            phone: details.phone.clone(),
        })
    }

    /// The booking this payload creates once accepted.
    pub fn record(&self) -> BookingRecord {
        BookingRecord {
            date: self.date,
            hour: self.hour,
            duration: self.duration,
            table: self.table,
        }
    }
}

/// Opaque success response from the booking endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Acknowledgement(pub Value);

/// Posts booking payloads. Failures are `BookingError::Transport`; retrying is
/// up to the implementation.
pub trait BookingTransport {
    fn submit(&mut self, payload: &SubmissionPayload) -> Result<Acknowledgement>;
}
