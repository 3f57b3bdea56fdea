//! Availability types.
//!
//! This module contains the per-hour schedule of a provider for one day:
//! - [`AvailabilityItem`] - One hour slot with an open/closed flag
//! - [`DayAvailability`] - The ordered list of slots for a day

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Last valid hour of a day.
pub const MAX_HOUR: u8 = 23;

/// Hour at which afternoon slots start.
pub const AFTERNOON_START_HOUR: u8 = 12;

// ============================================================================
// Availability Item
// ============================================================================

/// One hour-slot of a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AvailabilityItem {
    /// Hour of the day, in `[0, 23]`.
    pub hour: u8,
    /// Whether the slot can still be booked.
    pub available: bool,
}

impl AvailabilityItem {
    /// Creates a new slot.
    pub fn new(hour: u8, available: bool) -> Self {
        Self { hour, available }
    }

    /// Validates the hour range.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.hour > MAX_HOUR {
            return Err(CoreError::InvalidHour(self.hour));
        }
        Ok(())
    }

    /// Formats the slot start as `HH:00`.
    pub fn label(&self) -> String {
        format!("{:02}:00", self.hour)
    }
}

// ============================================================================
// Day Availability
// ============================================================================

/// The schedule for one provider on one day.
///
/// Server order is preserved. The whole value is replaced on every refetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayAvailability {
    items: Vec<AvailabilityItem>,
}

impl DayAvailability {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a schedule after checking every hour is in range.
    pub fn from_items(items: Vec<AvailabilityItem>) -> Result<Self, CoreError> {
        for item in &items {
            item.validate()?;
        }
        Ok(Self { items })
    }

    /// Returns all slots in server order.
    pub fn items(&self) -> &[AvailabilityItem] {
        &self.items
    }

    /// Returns the number of offered slots.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if no slot is offered.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Hours that are still open, in order.
    pub fn open_hours(&self) -> Vec<u8> {
        self.items
            .iter()
            .filter(|item| item.available)
            .map(|item| item.hour)
            .collect()
    }

    /// Returns true if `hour` is offered and open.
    pub fn is_open(&self, hour: u8) -> bool {
        self.items
            .iter()
            .any(|item| item.hour == hour && item.available)
    }

    /// Slots before noon.
    pub fn morning(&self) -> impl Iterator<Item = &AvailabilityItem> {
        self.items
            .iter()
            .filter(|item| item.hour < AFTERNOON_START_HOUR)
    }

    /// Slots from noon on.
    pub fn afternoon(&self) -> impl Iterator<Item = &AvailabilityItem> {
        self.items
            .iter()
            .filter(|item| item.hour >= AFTERNOON_START_HOUR)
    }
}

impl From<DayAvailability> for Vec<AvailabilityItem> {
    fn from(day: DayAvailability) -> Self {
        day.items
    }
}
