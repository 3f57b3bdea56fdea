//! Load state shared by the catalog and availability slots.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

// ============================================================================
// Flow Failure
// ============================================================================

/// A retrieval that did not produce data.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum FlowFailure {
    /// `GET /providers` failed.
    #[error("Could not load providers: {0}")]
    CatalogFetchFailure(String),

    /// `GET /providers/{id}/day-availability` failed.
    #[error("Could not load availability: {0}")]
    AvailabilityFetchFailure(String),
}

impl FlowFailure {
    /// Returns the underlying cause.
    pub fn message(&self) -> &str {
        match self {
            Self::CatalogFetchFailure(m) | Self::AvailabilityFetchFailure(m) => m,
        }
    }
}

// ============================================================================
// Load State
// ============================================================================

/// Progress of one data source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "failure", rename_all = "snake_case")]
pub enum LoadState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The latest applied request succeeded.
    Ready,
    /// The latest applied request failed; a retry may be issued.
    Failed(FlowFailure),
}

impl LoadState {
    /// Returns true while a request is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns true once data has arrived.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Returns the failure, if any.
    pub fn failure(&self) -> Option<&FlowFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Loading => f.write_str("loading"),
            Self::Ready => f.write_str("ready"),
            Self::Failed(failure) => write!(f, "failed ({})", failure.message()),
        }
    }
}
