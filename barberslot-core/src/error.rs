//! Core error types for `BarberSlot`.

use thiserror::Error;

/// Core error type for `BarberSlot` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Date components do not form a calendar day.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Hour outside `[0, 23]`.
    #[error("Invalid hour: {0}")]
    InvalidHour(u8),

    /// No picker capabilities registered for the platform.
    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),
}
