//! Domain models for BarberSlot.
//!
//! ## Submodules
//!
//! - [`provider`] - Bookable service professionals
//! - [`availability`] - Hour slots of a day
//! - [`calendar`] - Calendar days and picker reports
//! - [`platform`] - Date-picker capabilities per platform

mod availability;
mod calendar;
mod platform;
mod provider;

pub use availability::{AFTERNOON_START_HOUR, AvailabilityItem, DayAvailability, MAX_HOUR};
pub use calendar::{CalendarDate, PickedDate};
pub use platform::{
    CapabilityTable, IOS_PICKER_TEXT_COLOR, PickerCapabilities, PickerDisplay, Platform,
};
pub use provider::Provider;
#[cfg(test)]
mod serde_tests;
