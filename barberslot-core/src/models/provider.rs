//! Provider-related types.
//!
//! A [`Provider`] is a bookable service professional as returned by
//! `GET /providers`. Providers are immutable once fetched.

use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Provider
// ============================================================================

/// A bookable service professional.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Provider {
    /// Unique, stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Avatar image URL. The API may send `null`, which is read as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub avatar_url: String,
}

impl Provider {
    /// Creates a provider without an avatar.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar_url: String::new(),
        }
    }

    /// Sets the avatar URL.
    pub fn with_avatar(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = url.into();
        self
    }

    /// Returns true if the provider has an avatar to render.
    ///
    /// Renderers fall back to a placeholder icon otherwise.
    pub fn has_avatar(&self) -> bool {
        !self.avatar_url.trim().is_empty()
    }

    /// Returns the avatar URL, or `None` when a placeholder should be shown.
    pub fn avatar(&self) -> Option<&str> {
        self.has_avatar().then_some(self.avatar_url.as_str())
    }

    /// Returns the initials of the provider name (at most two characters).
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
