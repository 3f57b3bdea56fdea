//! The user's current choice of provider, day, and picker visibility.

use barberslot_core::{CalendarDate, PickerCapabilities};
use serde::Serialize;

/// What the user currently has selected.
///
/// `provider_id` may name a provider that is not (yet) in the catalog. It is
/// seeded from the navigation parameter before any providers have loaded,
/// and the flow tolerates that rather than rejecting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    provider_id: String,
    date: CalendarDate,
    date_picker_visible: bool,
}

impl SelectionState {
    /// Seeds the selection with a provider and a day. The picker starts hidden.
    pub fn new(provider_id: impl Into<String>, date: CalendarDate) -> Self {
        Self {
            provider_id: provider_id.into(),
            date,
            date_picker_visible: false,
        }
    }

    /// Selected provider id.
    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    /// Selected day.
    pub fn date(&self) -> CalendarDate {
        self.date
    }

    /// Whether the date picker is on screen.
    pub fn date_picker_visible(&self) -> bool {
        self.date_picker_visible
    }

    /// Replaces the provider. Returns true if the id changed.
    pub fn select_provider(&mut self, provider_id: impl Into<String>) -> bool {
        let provider_id = provider_id.into();
        if provider_id == self.provider_id {
            return false;
        }
        self.provider_id = provider_id;
        true
    }

    /// Flips picker visibility.
    pub fn toggle_date_picker(&mut self) {
        self.date_picker_visible = !self.date_picker_visible;
    }

    /// Handles a picker change event. Returns true if the day changed.
    ///
    /// Auto-dismissing pickers are hidden whether or not a date was
    /// produced. `None` (cancelled) leaves the day untouched.
    pub fn apply_date_change(
        &mut self,
        date: Option<CalendarDate>,
        caps: &PickerCapabilities,
    ) -> bool {
        if caps.auto_dismiss {
            self.date_picker_visible = false;
        }

        match date {
            Some(date) if date != self.date => {
                self.date = date;
                true
            }
            _ => false,
        }
    }
}
