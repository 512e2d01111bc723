//! Error types for booking-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// A malformed hour, date, duration, table id, or repeat rule.
    #[error("Invalid format: {0}")]
    Format(String),

    /// A user-correctable problem with the current selection.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Fetching data or submitting a booking failed.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid window: {min} is after {max}")]
    InvalidWindow { min: String, max: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, BookingError>;
