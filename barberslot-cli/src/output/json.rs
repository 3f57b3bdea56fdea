//! JSON output formatting.

use anyhow::Result;
use barberslot_core::{AvailabilityItem, CalendarDate, DayAvailability, Provider};
use barberslot_store::{FlowState, LoadState, PickerProps};
use serde::Serialize;

// ============================================================================
// Output Types
// ============================================================================

/// One provider.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderOutput {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub selected: bool,
}

/// One hour slot.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotOutput {
    pub hour: u8,
    pub label: String,
    pub available: bool,
}

/// One day of a provider's schedule.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayOutput {
    pub provider_id: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub open_hours: Vec<u8>,
    pub slots: Vec<SlotOutput>,
}

/// Load state with its failure message.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateOutput {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Full flow snapshot.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotOutput {
    pub selected_provider_id: String,
    /// `YYYY-MM-DD`.
    pub selected_date: String,
    pub date_picker_visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picker: Option<PickerProps>,
    pub catalog: StateOutput,
    pub providers: Vec<ProviderOutput>,
    pub availability: StateOutput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<DayOutput>,
    pub pending_requests: usize,
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable data.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let output = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(output)
    }

    /// Formats a provider list.
    pub fn format_providers(&self, providers: &[Provider]) -> Result<String> {
        let outputs: Vec<ProviderOutput> =
            providers.iter().map(|p| provider_to_output(p, false)).collect();
        self.format(&outputs)
    }

    /// Formats one day of a schedule.
    pub fn format_day(
        &self,
        provider_id: &str,
        date: CalendarDate,
        day: &DayAvailability,
    ) -> Result<String> {
        self.format(&day_to_output(provider_id, date, day))
    }

    /// Formats a flow snapshot.
    pub fn format_snapshot(&self, state: &FlowState) -> Result<String> {
        self.format(&snapshot_to_output(state))
    }
}

fn provider_to_output(provider: &Provider, selected: bool) -> ProviderOutput {
    ProviderOutput {
        id: provider.id.clone(),
        name: provider.name.clone(),
        avatar_url: provider.avatar().map(str::to_string),
        selected,
    }
}

fn slot_to_output(item: &AvailabilityItem) -> SlotOutput {
    SlotOutput {
        hour: item.hour,
        label: item.label(),
        available: item.available,
    }
}

fn day_to_output(provider_id: &str, date: CalendarDate, day: &DayAvailability) -> DayOutput {
    DayOutput {
        provider_id: provider_id.to_string(),
        date: date.to_string(),
        open_hours: day.open_hours(),
        slots: day.items().iter().map(slot_to_output).collect(),
    }
}

fn state_to_output(state: &LoadState) -> StateOutput {
    let status = match state {
        LoadState::Idle => "idle",
        LoadState::Loading => "loading",
        LoadState::Ready => "ready",
        LoadState::Failed(_) => "failed",
    };
    StateOutput {
        status: status.to_string(),
        error: state.failure().map(|f| f.message().to_string()),
    }
}

pub(crate) fn snapshot_to_output(state: &FlowState) -> SnapshotOutput {
    let selection = state.selection();
    let availability = state.availability();

    SnapshotOutput {
        selected_provider_id: selection.provider_id().to_string(),
        selected_date: selection.date().to_string(),
        date_picker_visible: selection.date_picker_visible(),
        picker: state.picker_props(),
        catalog: state_to_output(state.catalog().state()),
        providers: state
            .catalog()
            .providers()
            .iter()
            .map(|p| provider_to_output(p, state.is_selected(p)))
            .collect(),
        availability: state_to_output(availability.state()),
        day: availability
            .shown()
            .map(|shown| day_to_output(&shown.provider_id, shown.date, availability.day())),
        pending_requests: state.pending_requests(),
    }
}
