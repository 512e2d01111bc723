//! Widget configuration, loadable from TOML.
//!
//! Every field has a default matching a three-table venue open from noon to
//! midnight, so an empty file is a valid configuration:
//!
//! ```toml
//! open = "12:00"
//! close = "24:00"
//! tables = [1, 2, 3]
//! capacity = 3
//!
//! [source]
//! url = "http://localhost:3131"
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};
use crate::records::TableId;
use crate::slot::{SlotSpan, TimeSlot};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// First bookable slot of the day.
    pub open: TimeSlot,
    /// End of the last bookable slot (exclusive).
    pub close: TimeSlot,
    /// Tables shown in the floor plan.
    pub tables: Vec<TableId>,
    /// Occupied-table count at which a slot renders as full.
    pub capacity: usize,
    pub people_min: u32,
    pub people_max: u32,
    pub duration_min: SlotSpan,
    pub duration_max: SlotSpan,
    /// How many days past the first date the date picker offers.
    pub days_ahead: u32,
    pub source: SourceConfig,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        WidgetConfig {
            open: TimeSlot::from_half_hours(24),
            close: TimeSlot::END_OF_DAY,
            tables: vec![TableId(1), TableId(2), TableId(3)],
            capacity: 3,
            people_min: 1,
            people_max: 9,
            duration_min: SlotSpan::from_half_hours(2),
            duration_max: SlotSpan::from_half_hours(18),
            days_ahead: 14,
            source: SourceConfig::default(),
        }
    }
}

/// Where the booking data lives and how its queries are spelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
    pub booking: String,
    pub event: String,
    pub date_start_param: String,
    pub date_end_param: String,
    /// Full `key=value` pair selecting one-off events.
    pub not_repeat_param: String,
    /// Full `key=value` pair selecting repeating events.
    pub repeat_param: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            url: "http://localhost:3131".to_string(),
            booking: "booking".to_string(),
            event: "event".to_string(),
            date_start_param: "date_gte".to_string(),
            date_end_param: "date_lte".to_string(),
            not_repeat_param: "repeat=false".to_string(),
            repeat_param: "repeat_ne=false".to_string(),
        }
    }
}

impl WidgetConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: WidgetConfig =
            toml::from_str(text).map_err(|e| BookingError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| BookingError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// # Errors
    /// Returns `BookingError::Config` describing the first inconsistency found.
    pub fn validate(&self) -> Result<()> {
        if self.open >= self.close {
            return Err(BookingError::Config(format!(
                "open ({}) must be before close ({})",
                self.open, self.close
            )));
        }
        if self.close > TimeSlot::END_OF_DAY {
            return Err(BookingError::Config(format!(
                "close ({}) is past the end of the day",
                self.close
            )));
        }
        if self.tables.is_empty() {
            return Err(BookingError::Config("at least one table is required".to_string()));
        }
        let distinct: BTreeSet<_> = self.tables.iter().collect();
        if distinct.len() != self.tables.len() {
            return Err(BookingError::Config("table ids must be unique".to_string()));
        }
        if self.capacity == 0 {
            return Err(BookingError::Config("capacity must be positive".to_string()));
        }
        if self.people_min == 0 || self.people_min > self.people_max {
            return Err(BookingError::Config(format!(
                "people bounds {}..={} are invalid",
                self.people_min, self.people_max
            )));
        }
        if self.duration_min.is_zero() || self.duration_min > self.duration_max {
            return Err(BookingError::Config(format!(
                "duration bounds {}..={} hours are invalid",
                self.duration_min.as_hours(),
                self.duration_max.as_hours()
            )));
        }
        Ok(())
    }

    pub fn has_table(&self, table: TableId) -> bool {
        self.tables.contains(&table)
    }
}
