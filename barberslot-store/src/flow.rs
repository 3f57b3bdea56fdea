//! The appointment selection flow as a pure reducer.
//!
//! [`FlowState::apply`] takes one [`FlowEvent`] and returns the
//! [`FlowEffect`]s that must run as a consequence. No I/O happens here;
//! the [`crate::controller::AppointmentFlowController`] executes effects and
//! feeds their completions back in as events.
//!
//! Refetch rules:
//! - Mount loads the catalog once and the availability of the seed selection.
//! - A changed provider id or a changed day issues a new availability request.
//! - Cancelled picker events and re-selecting the current value issue nothing.

use barberslot_core::{
    AvailabilityItem, CalendarDate, PickedDate, PickerCapabilities, PickerDisplay, Provider,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::availability::{AvailabilityRequest, AvailabilitySlot, RefetchOrdering};
use crate::catalog::ProviderCatalog;
use crate::selection::SelectionState;

// ============================================================================
// Config
// ============================================================================

/// Construction parameters for a flow.
#[derive(Debug, Clone)]
pub struct FlowConfig {
    /// Provider id passed in by navigation.
    pub seed_provider_id: String,
    /// Initially selected day.
    pub today: CalendarDate,
    /// Picker behavior on the target platform.
    pub picker: PickerCapabilities,
    /// Reconciliation of overlapping availability responses.
    pub ordering: RefetchOrdering,
}

impl FlowConfig {
    /// Creates a config with a persistent picker and arrival ordering.
    pub fn new(seed_provider_id: impl Into<String>, today: CalendarDate) -> Self {
        Self {
            seed_provider_id: seed_provider_id.into(),
            today,
            picker: PickerCapabilities::default(),
            ordering: RefetchOrdering::default(),
        }
    }

    /// Sets the picker capabilities.
    pub fn with_picker(mut self, picker: PickerCapabilities) -> Self {
        self.picker = picker;
        self
    }

    /// Sets the refetch ordering.
    pub fn with_ordering(mut self, ordering: RefetchOrdering) -> Self {
        self.ordering = ordering;
        self
    }
}

// ============================================================================
// Events & Effects
// ============================================================================

/// Something that happened: a user intent or a network completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    /// The screen became active.
    Mount,
    /// A provider in the strip was tapped.
    SelectProvider(String),
    /// The "choose another date" button was pressed.
    ToggleDatePicker,
    /// The picker emitted a change. `None` means the user cancelled.
    DateChanged(Option<PickedDate>),
    /// The user asked to reload a failed catalog.
    RetryCatalog,
    /// The user asked to reload failed availability.
    RetryAvailability,
    /// `GET /providers` finished.
    ProvidersLoaded(Result<Vec<Provider>, String>),
    /// An availability request finished.
    AvailabilityLoaded {
        /// The request that finished.
        request: AvailabilityRequest,
        /// Its outcome.
        result: Result<Vec<AvailabilityItem>, String>,
    },
}

/// A retrieval the controller must start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum FlowEffect {
    /// `GET /providers`.
    FetchProviders,
    /// `GET /providers/{id}/day-availability`.
    FetchAvailability(AvailabilityRequest),
}

// ============================================================================
// Picker Props
// ============================================================================

/// Props for rendering the picker, present only while it is visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickerProps {
    /// Currently selected day.
    pub value: CalendarDate,
    /// Presentation style.
    pub display: PickerDisplay,
    /// Text color, applied only on platforms that style it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

// ============================================================================
// Flow State
// ============================================================================

/// Everything a renderer needs, mutated only through [`FlowState::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowState {
    selection: SelectionState,
    catalog: ProviderCatalog,
    availability: AvailabilitySlot,
    #[serde(skip)]
    picker: PickerCapabilities,
    mounted: bool,
}

impl FlowState {
    /// Seeds a flow. Nothing is requested until [`FlowEvent::Mount`].
    pub fn new(config: FlowConfig) -> Self {
        Self {
            selection: SelectionState::new(config.seed_provider_id, config.today),
            catalog: ProviderCatalog::new(),
            availability: AvailabilitySlot::new(config.ordering),
            picker: config.picker,
            mounted: false,
        }
    }

    /// Current selection.
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Provider catalog.
    pub fn catalog(&self) -> &ProviderCatalog {
        &self.catalog
    }

    /// Availability slot.
    pub fn availability(&self) -> &AvailabilitySlot {
        &self.availability
    }

    /// Picker capabilities in effect.
    pub fn picker_capabilities(&self) -> &PickerCapabilities {
        &self.picker
    }

    /// Returns true after [`FlowEvent::Mount`].
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// The selected provider, if the catalog contains it.
    ///
    /// `None` while the seed id is not (yet) among the loaded providers.
    pub fn selected_provider(&self) -> Option<&Provider> {
        self.catalog.find(self.selection.provider_id())
    }

    /// Returns true if `provider` is the selected one, for highlighting.
    pub fn is_selected(&self, provider: &Provider) -> bool {
        provider.id == self.selection.provider_id()
    }

    /// Picker props, or `None` when hidden.
    pub fn picker_props(&self) -> Option<PickerProps> {
        self.selection.date_picker_visible().then(|| PickerProps {
            value: self.selection.date(),
            display: self.picker.display,
            text_color: self.picker.text_color.clone(),
        })
    }

    /// Number of retrievals still in flight.
    pub fn pending_requests(&self) -> usize {
        usize::from(self.catalog.state().is_loading()) + self.availability.in_flight()
    }

    /// Consuming form of [`FlowState::apply`].
    pub fn reduce(mut self, event: FlowEvent) -> (Self, Vec<FlowEffect>) {
        let effects = self.apply(event);
        (self, effects)
    }

    /// Applies one event and returns the effects to run.
    pub fn apply(&mut self, event: FlowEvent) -> Vec<FlowEffect> {
        match event {
            FlowEvent::Mount => self.on_mount(),
            FlowEvent::SelectProvider(id) => {
                if self.selection.select_provider(id) {
                    self.refetch_availability()
                } else {
                    Vec::new()
                }
            }
            FlowEvent::ToggleDatePicker => {
                self.selection.toggle_date_picker();
                Vec::new()
            }
            FlowEvent::DateChanged(picked) => self.on_date_changed(picked),
            FlowEvent::RetryCatalog => {
                if self.catalog.state().failure().is_some() {
                    self.fetch_catalog()
                } else {
                    Vec::new()
                }
            }
            FlowEvent::RetryAvailability => {
                if self.availability.state().failure().is_some() {
                    self.refetch_availability()
                } else {
                    Vec::new()
                }
            }
            FlowEvent::ProvidersLoaded(result) => {
                match result {
                    Ok(providers) => {
                        info!(count = providers.len(), "Provider catalog loaded");
                        self.catalog.finish(providers);
                        if !self.catalog.contains(self.selection.provider_id()) {
                            debug!(
                                provider = %self.selection.provider_id(),
                                "Selected provider is not in the catalog"
                            );
                        }
                    }
                    Err(message) => {
                        warn!(error = %message, "Provider catalog failed to load");
                        self.catalog.fail(message);
                    }
                }
                Vec::new()
            }
            FlowEvent::AvailabilityLoaded { request, result } => {
                if let Err(message) = &result {
                    warn!(seq = request.seq, error = %message, "Availability failed to load");
                }
                self.availability.complete(request, result);
                Vec::new()
            }
        }
    }

    fn on_mount(&mut self) -> Vec<FlowEffect> {
        if self.mounted {
            debug!("Flow already mounted");
            return Vec::new();
        }
        self.mounted = true;
        info!(provider = %self.selection.provider_id(), date = %self.selection.date(), "Flow mounted");

        let mut effects = self.fetch_catalog();
        effects.extend(self.refetch_availability());
        effects
    }

    fn on_date_changed(&mut self, picked: Option<PickedDate>) -> Vec<FlowEffect> {
        let date = picked.and_then(|p| match CalendarDate::from_picker(p) {
            Ok(date) => Some(date),
            Err(e) => {
                warn!(error = %e, "Ignoring picker event with an invalid date");
                None
            }
        });

        if self.selection.apply_date_change(date, &self.picker) {
            self.refetch_availability()
        } else {
            Vec::new()
        }
    }

    fn fetch_catalog(&mut self) -> Vec<FlowEffect> {
        if !self.mounted || !self.catalog.begin_fetch() {
            return Vec::new();
        }
        vec![FlowEffect::FetchProviders]
    }

    fn refetch_availability(&mut self) -> Vec<FlowEffect> {
        if !self.mounted {
            return Vec::new();
        }
        let request = self
            .availability
            .issue(self.selection.provider_id(), self.selection.date());
        vec![FlowEffect::FetchAvailability(request)]
    }
}
