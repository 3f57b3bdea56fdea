//! Provider catalog loaded once per screen.

use barberslot_core::Provider;
use serde::Serialize;

use crate::load::{FlowFailure, LoadState};

/// Providers in server order, plus their load state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProviderCatalog {
    providers: Vec<Provider>,
    state: LoadState,
}

impl ProviderCatalog {
    /// Creates an empty, idle catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Providers in server order. Empty until the first fetch succeeds.
    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    /// Load state.
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Finds a provider by id.
    pub fn find(&self, id: &str) -> Option<&Provider> {
        self.providers.iter().find(|p| p.id == id)
    }

    /// Returns true if a provider with this id is loaded.
    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Index of a provider in display order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.providers.iter().position(|p| p.id == id)
    }

    /// Number of loaded providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true if no providers are loaded.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Marks a fetch as started. Returns false if one is already running.
    pub(crate) fn begin_fetch(&mut self) -> bool {
        if self.state.is_loading() {
            return false;
        }
        self.state = LoadState::Loading;
        true
    }

    /// Stores a successful fetch, preserving server order.
    pub(crate) fn finish(&mut self, providers: Vec<Provider>) {
        self.providers = providers;
        self.state = LoadState::Ready;
    }

    /// Records a failed fetch. Already-loaded providers are kept.
    pub(crate) fn fail(&mut self, message: String) {
        self.state = LoadState::Failed(FlowFailure::CatalogFetchFailure(message));
    }
}
