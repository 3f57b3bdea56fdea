//! Date-picker platform capabilities.
//!
//! Native date pickers differ per platform: some dismiss themselves after a
//! single choice, others stay on screen until the caller hides them, and
//! each takes its own styling props. Instead of branching on the platform
//! inline, the flow looks the behavior up in a [`CapabilityTable`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::CoreError;

/// Text color applied to the spinner picker on iOS.
pub const IOS_PICKER_TEXT_COLOR: &str = "#f4ede8";

// ============================================================================
// Platform
// ============================================================================

/// Target platform identifier (e.g. `android`, `ios`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Platform(String);

impl Platform {
    /// Creates a platform identifier. Identifiers are case-insensitive.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().to_ascii_lowercase())
    }

    /// Android.
    pub fn android() -> Self {
        Self::new("android")
    }

    /// iOS.
    pub fn ios() -> Self {
        Self::new("ios")
    }

    /// Returns the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Platform {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Platform {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.0
    }
}

// ============================================================================
// Picker Capabilities
// ============================================================================

/// How the native picker presents itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PickerDisplay {
    /// Month grid, typically inside a dialog.
    #[default]
    Calendar,
    /// Wheel-style inline spinner.
    Spinner,
}

impl PickerDisplay {
    /// Returns the widget prop value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Calendar => "calendar",
            Self::Spinner => "spinner",
        }
    }
}

/// Behavior and styling of the date picker on one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerCapabilities {
    /// The picker closes itself after any change event.
    pub auto_dismiss: bool,
    /// Presentation style.
    #[serde(default)]
    pub display: PickerDisplay,
    /// Text color prop, applied only when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

impl PickerCapabilities {
    /// A dialog picker that dismisses itself after one choice.
    pub fn auto_dismiss() -> Self {
        Self {
            auto_dismiss: true,
            display: PickerDisplay::Calendar,
            text_color: None,
        }
    }

    /// An inline picker that stays visible until hidden by the caller.
    pub fn persistent() -> Self {
        Self {
            auto_dismiss: false,
            display: PickerDisplay::Spinner,
            text_color: None,
        }
    }

    /// Sets the text color prop.
    pub fn with_text_color(mut self, color: impl Into<String>) -> Self {
        self.text_color = Some(color.into());
        self
    }
}

impl Default for PickerCapabilities {
    fn default() -> Self {
        Self::persistent()
    }
}

// ============================================================================
// Capability Table
// ============================================================================

/// Picker capabilities keyed by platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityTable {
    entries: BTreeMap<Platform, PickerCapabilities>,
}

impl CapabilityTable {
    /// Creates an empty table.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Adds or replaces the entry for a platform.
    pub fn with(mut self, platform: Platform, caps: PickerCapabilities) -> Self {
        self.insert(platform, caps);
        self
    }

    /// Adds or replaces the entry for a platform.
    pub fn insert(&mut self, platform: Platform, caps: PickerCapabilities) {
        self.entries.insert(platform, caps);
    }

    /// Merges another table on top of this one.
    pub fn extend(&mut self, other: CapabilityTable) {
        self.entries.extend(other.entries);
    }

    /// Looks up a platform.
    pub fn get(&self, platform: &Platform) -> Option<&PickerCapabilities> {
        self.entries.get(platform)
    }

    /// Looks up a platform, failing if it has no entry.
    pub fn resolve(&self, platform: &Platform) -> Result<PickerCapabilities, CoreError> {
        self.get(platform)
            .cloned()
            .ok_or_else(|| CoreError::UnknownPlatform(platform.to_string()))
    }

    /// Returns true if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Known platforms, sorted.
    pub fn platforms(&self) -> impl Iterator<Item = &Platform> {
        self.entries.keys()
    }
}

impl Default for CapabilityTable {
    /// Android dismisses its calendar dialog; iOS keeps a styled spinner.
    fn default() -> Self {
        Self::empty()
            .with(Platform::android(), PickerCapabilities::auto_dismiss())
            .with(
                Platform::ios(),
                PickerCapabilities::persistent().with_text_color(IOS_PICKER_TEXT_COLOR),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = CapabilityTable::default();

        let android = table.resolve(&Platform::android()).unwrap();
        assert!(android.auto_dismiss);
        assert_eq!(android.display, PickerDisplay::Calendar);
        assert_eq!(android.text_color, None);

        let ios = table.resolve(&Platform::ios()).unwrap();
        assert!(!ios.auto_dismiss);
        assert_eq!(ios.display, PickerDisplay::Spinner);
        assert_eq!(ios.text_color.as_deref(), Some(IOS_PICKER_TEXT_COLOR));
    }

    #[test]
    fn test_unknown_platform() {
        let table = CapabilityTable::default();
        let err = table.resolve(&Platform::new("web")).unwrap_err();
        assert!(matches!(err, CoreError::UnknownPlatform(ref p) if p == "web"));
    }

    #[test]
    fn test_new_platforms_are_additive() {
        let mut table = CapabilityTable::default();
        table.extend(CapabilityTable::empty().with(Platform::new("web"), PickerCapabilities::auto_dismiss()));

        assert!(table.resolve(&Platform::new("web")).unwrap().auto_dismiss);
        assert!(table.resolve(&Platform::android()).is_ok());
        assert_eq!(table.platforms().count(), 3);
    }

    #[test]
    fn test_platform_ids_are_case_insensitive() {
        assert_eq!(Platform::new(" Android "), Platform::android());
    }

    #[test]
    fn test_table_serde() {
        let json = r#"{"Web":{"auto_dismiss":true}}"#;
        let table: CapabilityTable = serde_json::from_str(json).unwrap();
        let web = table.resolve(&Platform::new("web")).unwrap();
        assert!(web.auto_dismiss);
        assert_eq!(web.display, PickerDisplay::Calendar);
    }
}
