//! Store error types.

use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The configured platform has no picker capabilities.
    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    /// Settings key not recognized.
    #[error("Unknown setting: {0}")]
    UnknownSetting(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Core error.
    #[error("Core error: {0}")]
    Core(#[from] barberslot_core::CoreError),

    /// Fetch client could not be built.
    #[error("Fetch error: {0}")]
    Fetch(#[from] barberslot_fetch::FetchError),
}

impl StoreError {
    /// Returns true if this error comes from a malformed setting.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            StoreError::Config(_) | StoreError::UnknownSetting(_) | StoreError::UnknownPlatform(_)
        )
    }
}
