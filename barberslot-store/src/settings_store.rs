//! User preferences store.
//!
//! Manages settings with persistence and change notification.

use barberslot_core::{CalendarDate, CapabilityTable, PickerCapabilities, Platform};
use barberslot_fetch::{ClientSettings, RetryStrategy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info, warn};

use crate::availability::RefetchOrdering;
use crate::error::StoreError;
use crate::flow::FlowConfig;
use crate::persistence::{default_settings_path, load_json, remove_if_exists, save_json};

/// Default API base URL.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3333";

/// Environment variable overriding [`Settings::api_base_url`].
pub const ENV_API_URL: &str = "BARBERSLOT_API_URL";

/// Environment variable overriding [`Settings::api_token`].
pub const ENV_TOKEN: &str = "BARBERSLOT_TOKEN";

/// Keys accepted by [`Settings::set_value`].
pub const SETTING_KEYS: &[&str] = &[
    "api_base_url",
    "platform",
    "refetch_ordering",
    "timeout_secs",
    "max_retries",
    "api_token",
];

// ============================================================================
// Settings Types
// ============================================================================

/// User preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Booking API base URL.
    pub api_base_url: String,

    /// Platform whose date-picker behavior the flow follows.
    pub platform: Platform,

    /// How overlapping availability responses are reconciled.
    pub refetch_ordering: RefetchOrdering,

    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,

    /// Retries after a failed first attempt. Zero disables retrying.
    pub max_retries: u32,

    /// Bearer token sent with every request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// Extra or replacement picker capabilities, merged over the built-ins.
    #[serde(skip_serializing_if = "CapabilityTable::is_empty")]
    pub platform_capabilities: CapabilityTable,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            platform: Platform::android(),
            refetch_ordering: RefetchOrdering::default(),
            timeout_secs: barberslot_fetch::DEFAULT_TIMEOUT_SECS,
            max_retries: 2,
            api_token: None,
            platform_capabilities: CapabilityTable::empty(),
        }
    }
}

impl Settings {
    /// Built-in capabilities with the configured overrides applied.
    pub fn capability_table(&self) -> CapabilityTable {
        let mut table = CapabilityTable::default();
        table.extend(self.platform_capabilities.clone());
        table
    }

    /// Picker capabilities of the configured platform.
    pub fn picker_capabilities(&self) -> Result<PickerCapabilities, StoreError> {
        self.capability_table()
            .get(&self.platform)
            .cloned()
            .ok_or_else(|| StoreError::UnknownPlatform(self.platform.to_string()))
    }

    /// Flow parameters for a screen opened on `seed_provider_id`.
    pub fn flow_config(
        &self,
        seed_provider_id: impl Into<String>,
        today: CalendarDate,
    ) -> Result<FlowConfig, StoreError> {
        Ok(FlowConfig::new(seed_provider_id, today)
            .with_picker(self.picker_capabilities()?)
            .with_ordering(self.refetch_ordering))
    }

    /// HTTP client settings.
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings::new(self.api_base_url.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_retry(RetryStrategy::new(self.max_retries.saturating_add(1)))
            .with_bearer_token(self.api_token.clone())
    }

    /// Applies `BARBERSLOT_API_URL` and `BARBERSLOT_TOKEN` from `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            debug!(url = %url, "API URL overridden from environment");
            self.api_base_url = url;
        }
        if let Some(token) = lookup(ENV_TOKEN).filter(|v| !v.trim().is_empty()) {
            self.api_token = Some(token);
        }
    }

    /// Sets one setting from its string form.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let value = value.trim();
        match key {
            "api_base_url" => self.api_base_url = value.to_string(),
            "platform" => self.platform = Platform::new(value),
            "refetch_ordering" => {
                self.refetch_ordering = value.parse().map_err(StoreError::Config)?;
            }
            "timeout_secs" => self.timeout_secs = parse_number(key, value)?,
            "max_retries" => self.max_retries = parse_number(key, value)?,
            "api_token" => {
                self.api_token = (!value.is_empty()).then(|| value.to_string());
            }
            _ => return Err(StoreError::UnknownSetting(key.to_string())),
        }
        self.validate()
    }

    /// Checks the settings are usable.
    pub fn validate(&self) -> Result<(), StoreError> {
        barberslot_fetch::Endpoints::new(&self.api_base_url)?;
        if self.timeout_secs == 0 {
            return Err(StoreError::Config("timeout_secs must be positive".to_string()));
        }
        self.picker_capabilities()?;
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, StoreError> {
    value
        .parse()
        .map_err(|_| StoreError::Config(format!("{key} expects a number, got {value:?}")))
}

// ============================================================================
// Settings Store
// ============================================================================

/// Persistent settings store with change notifications.
pub struct SettingsStore {
    settings: Arc<RwLock<Settings>>,
    path: PathBuf,
    notify: watch::Sender<u64>,
}

impl SettingsStore {
    /// Creates a store holding defaults for `path`.
    pub fn new(path: PathBuf) -> Self {
        Self::with_settings(path, Settings::default())
    }

    fn with_settings(path: PathBuf, settings: Settings) -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            settings: Arc::new(RwLock::new(settings)),
            path,
            notify,
        }
    }

    /// Loads settings from the default path.
    ///
    /// # Errors
    ///
    /// Returns error if the settings file exists but cannot be read.
    pub async fn load_default() -> Result<Self, StoreError> {
        Self::load(default_settings_path()).await
    }

    /// Loads settings from a path.
    ///
    /// A missing file yields defaults. A malformed file is logged and
    /// replaced by defaults in memory.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read.
    pub async fn load(path: PathBuf) -> Result<Self, StoreError> {
        let settings = if tokio::fs::try_exists(&path).await? {
            info!(path = %path.display(), "Loading settings");
            match load_json(&path).await {
                Ok(settings) => settings,
                Err(StoreError::Io(e)) => return Err(StoreError::Io(e)),
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Settings::default()
                }
            }
        } else {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            Settings::default()
        };

        Ok(Self::with_settings(path, settings))
    }

    /// Settings file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Updates settings and notifies subscribers.
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        {
            let mut settings = self.settings.write().await;
            f(&mut settings);
        }
        self.notify_change();
    }

    /// Sets one setting from its string form.
    ///
    /// # Errors
    ///
    /// Returns error for an unknown key or an invalid value. The stored
    /// settings are left unchanged in that case.
    pub async fn set_value(&self, key: &str, value: &str) -> Result<(), StoreError> {
        {
            let mut settings = self.settings.write().await;
            let mut candidate = settings.clone();
            candidate.set_value(key, value)?;
            *settings = candidate;
        }
        self.notify_change();
        info!(key = key, "Setting updated");
        Ok(())
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let settings = self.settings.read().await;
        save_json(&self.path, &*settings).await?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    /// Restores defaults and deletes the settings file.
    ///
    /// Returns true if a file was deleted.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be deleted.
    pub async fn reset(&self) -> Result<bool, StoreError> {
        let removed = remove_if_exists(&self.path).await?;
        self.update(|s| *s = Settings::default()).await;
        info!(path = %self.path.display(), removed, "Settings reset");
        Ok(removed)
    }

    /// Subscribes to settings changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    fn notify_change(&self) {
        self.notify.send_modify(|version| *version += 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert!(settings.picker_capabilities().unwrap().auto_dismiss);
    }

    #[test]
    fn test_set_value() {
        let mut settings = Settings::default();
        settings.set_value("platform", "iOS").unwrap();
        settings.set_value("refetch_ordering", "issue_order").unwrap();
        settings.set_value("timeout_secs", "10").unwrap();

        assert_eq!(settings.platform, Platform::ios());
        assert_eq!(settings.refetch_ordering, RefetchOrdering::IssueOrder);
        assert_eq!(settings.timeout_secs, 10);
        assert!(!settings.picker_capabilities().unwrap().auto_dismiss);
    }

    #[test]
    fn test_set_value_rejects_bad_input() {
        let mut settings = Settings::default();
        assert!(matches!(
            settings.set_value("colour", "red"),
            Err(StoreError::UnknownSetting(_))
        ));
        assert!(settings.set_value("timeout_secs", "soon").is_err());
        assert!(settings.set_value("platform", "web").is_err());
    }

    #[test]
    fn test_empty_token_clears() {
        let mut settings = Settings::default();
        settings.set_value("api_token", "abc").unwrap();
        assert_eq!(settings.api_token.as_deref(), Some("abc"));
        settings.set_value("api_token", "").unwrap();
        assert_eq!(settings.api_token, None);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_API_URL, "https://api.example.com"),
            (ENV_TOKEN, "tok"),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        settings.apply_env_overrides(|k| env.get(k).map(ToString::to_string));

        assert_eq!(settings.api_base_url, "https://api.example.com");
        assert_eq!(settings.api_token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_capability_overrides_merge() {
        let mut settings = Settings::default();
        settings.platform_capabilities.insert(
            Platform::new("web"),
            PickerCapabilities::auto_dismiss(),
        );
        settings.platform = Platform::new("web");

        assert!(settings.picker_capabilities().unwrap().auto_dismiss);
        assert!(settings.capability_table().get(&Platform::ios()).is_some());
    }

    #[test]
    fn test_flow_config_follows_platform() {
        let mut settings = Settings::default();
        settings.set_value("platform", "ios").unwrap();
        let today = CalendarDate::new(2024, 5, 10).unwrap();

        let config = settings.flow_config("p1", today).unwrap();
        assert_eq!(config.seed_provider_id, "p1");
        assert!(!config.picker.auto_dismiss);
        assert_eq!(config.ordering, RefetchOrdering::ArrivalOrder);
    }

    #[test]
    fn test_client_settings() {
        let settings = Settings {
            timeout_secs: 7,
            max_retries: 2,
            ..Settings::default()
        };
        let client = settings.client_settings();
        assert_eq!(client.timeout, Duration::from_secs(7));
        assert_eq!(client.retry.max_attempts, 3);
        assert_eq!(client.base_url, DEFAULT_API_BASE_URL);
    }

    #[tokio::test]
    async fn test_store_notifies() {
        let store = SettingsStore::new(PathBuf::from("unused.json"));
        let rx = store.subscribe();
        store.set_value("max_retries", "5").await.unwrap();
        assert_eq!(*rx.borrow(), 1);
        assert_eq!(store.get().await.max_retries, 5);
    }

    #[tokio::test]
    async fn test_store_keeps_settings_on_error() {
        let store = SettingsStore::new(PathBuf::from("unused.json"));
        assert!(store.set_value("max_retries", "-1").await.is_err());
        assert!(store.set_value("timeout_secs", "0").await.is_err());
        assert_eq!(store.get().await, Settings::default());
    }

    #[test]
    fn test_zero_retries_means_single_attempt() {
        let mut settings = Settings::default();
        settings.set_value("max_retries", "0").unwrap();

        assert_eq!(settings.max_retries, 0);
        assert_eq!(settings.client_settings().retry.max_attempts, 1);
        assert_eq!(Settings::default().client_settings().retry.max_attempts, 3);
    }
}
