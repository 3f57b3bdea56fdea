// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `BarberSlot` Core
//!
//! Core types, models, and traits for the `BarberSlot` booking flow.
//!
//! This crate provides the foundational abstractions used across all other
//! `BarberSlot` crates:
//!
//! - Domain models (providers, availability, calendar days)
//! - Date-picker capability table
//! - Error types
//! - The [`BookingApi`] retrieval boundary
//!
//! ## Key Types
//!
//! - [`Provider`] - A bookable service professional
//! - [`AvailabilityItem`] / [`DayAvailability`] - Hour slots for one day
//! - [`CalendarDate`] - A concrete day, 1-indexed month
//! - [`PickedDate`] - A picker report, 0-indexed month
//! - [`CapabilityTable`] - Picker behavior keyed by [`Platform`]

pub mod error;
pub mod models;
pub mod traits;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    AFTERNOON_START_HOUR, AvailabilityItem, CalendarDate, CapabilityTable, DayAvailability,
    IOS_PICKER_TEXT_COLOR, MAX_HOUR, PickedDate, PickerCapabilities, PickerDisplay, Platform,
    Provider,
};

// Re-export traits
pub use traits::{ApiError, BookingApi};
