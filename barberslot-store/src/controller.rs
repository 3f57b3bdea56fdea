//! Async driver for the selection flow.
//!
//! The controller owns the [`FlowState`] and is the only writer. User
//! intents are applied synchronously; each resulting effect is spawned as a
//! tokio task that posts its completion back through a channel. Completions
//! are applied one at a time, in whatever order they arrive, and there is no
//! cancellation: a superseded request still runs to completion.
//!
//! Renderers observe the state through [`AppointmentFlowController::subscribe`].

use barberslot_core::{BookingApi, PickedDate};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, instrument};

use crate::flow::{FlowConfig, FlowEffect, FlowEvent, FlowState};

/// Drives a [`FlowState`] against a [`BookingApi`].
pub struct AppointmentFlowController {
    state: FlowState,
    api: Arc<dyn BookingApi>,
    completions_tx: mpsc::UnboundedSender<FlowEvent>,
    completions_rx: mpsc::UnboundedReceiver<FlowEvent>,
    notify: watch::Sender<FlowState>,
}

impl AppointmentFlowController {
    /// Creates a controller. Nothing is requested until [`Self::mount`].
    pub fn new(api: Arc<dyn BookingApi>, config: FlowConfig) -> Self {
        let state = FlowState::new(config);
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let (notify, _) = watch::channel(state.clone());
        Self {
            state,
            api,
            completions_tx,
            completions_rx,
            notify,
        }
    }

    /// Current state.
    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<FlowState> {
        self.notify.subscribe()
    }

    // ========================================================================
    // User Intents
    // ========================================================================

    /// Activates the screen: loads providers and the seed availability.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(&mut self) -> Vec<FlowEffect> {
        self.dispatch(FlowEvent::Mount)
    }

    /// Selects a provider.
    pub fn select_provider(&mut self, provider_id: impl Into<String>) -> Vec<FlowEffect> {
        self.dispatch(FlowEvent::SelectProvider(provider_id.into()))
    }

    /// Shows or hides the date picker.
    pub fn toggle_date_picker(&mut self) -> Vec<FlowEffect> {
        self.dispatch(FlowEvent::ToggleDatePicker)
    }

    /// Forwards a picker change event. `None` means cancelled.
    pub fn apply_date_change(&mut self, picked: Option<PickedDate>) -> Vec<FlowEffect> {
        self.dispatch(FlowEvent::DateChanged(picked))
    }

    /// Reloads a failed catalog.
    pub fn retry_catalog(&mut self) -> Vec<FlowEffect> {
        self.dispatch(FlowEvent::RetryCatalog)
    }

    /// Reloads failed availability.
    pub fn retry_availability(&mut self) -> Vec<FlowEffect> {
        self.dispatch(FlowEvent::RetryAvailability)
    }

    // ========================================================================
    // Event Loop
    // ========================================================================

    /// Applies an event, starts its effects, and publishes the new state.
    ///
    /// Returns the effects that were started.
    pub fn dispatch(&mut self, event: FlowEvent) -> Vec<FlowEffect> {
        let effects = self.state.apply(event);
        for effect in &effects {
            self.spawn(effect.clone());
        }
        self.notify.send_replace(self.state.clone());
        effects
    }

    /// Waits for the next network completion and applies it.
    ///
    /// Returns false immediately if nothing is in flight.
    pub async fn next_completion(&mut self) -> bool {
        if self.state.pending_requests() == 0 {
            return false;
        }
        match self.completions_rx.recv().await {
            Some(event) => {
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    /// Applies completions until nothing is in flight.
    pub async fn settle(&mut self) {
        while self.next_completion().await {}
    }

    /// Runs until `intents` closes and every request has completed.
    ///
    /// Intents and completions are applied in the order they are received.
    pub async fn run(mut self, mut intents: mpsc::Receiver<FlowEvent>) -> FlowState {
        let mut intents_open = true;
        loop {
            if !intents_open && self.state.pending_requests() == 0 {
                break;
            }
            tokio::select! {
                intent = intents.recv(), if intents_open => match intent {
                    Some(event) => {
                        self.dispatch(event);
                    }
                    None => intents_open = false,
                },
                Some(event) = self.completions_rx.recv(), if self.state.pending_requests() > 0 => {
                    self.dispatch(event);
                }
            }
        }
        self.state
    }

    #[instrument(skip(self))]
    fn spawn(&self, effect: FlowEffect) {
        let api = Arc::clone(&self.api);
        let tx = self.completions_tx.clone();

        tokio::spawn(async move {
            let event = match effect {
                FlowEffect::FetchProviders => {
                    let result = api.list_providers().await.map_err(|e| e.to_string());
                    FlowEvent::ProvidersLoaded(result)
                }
                FlowEffect::FetchAvailability(request) => {
                    let result = api
                        .day_availability(&request.provider_id, request.date)
                        .await
                        .map_err(|e| e.to_string());
                    FlowEvent::AvailabilityLoaded { request, result }
                }
            };
            if tx.send(event).is_err() {
                debug!("Flow controller dropped before completion arrived");
            }
        });
    }
}
