//! CLI command implementations.

pub mod availability;
pub mod config;
pub mod providers;
pub mod session;

use anyhow::{Context, Result};
use barberslot_core::CalendarDate;
use barberslot_fetch::RestBookingApi;
use barberslot_store::{Settings, SettingsStore};
use tracing::debug;

use crate::Cli;

/// Loads settings, then applies environment and command-line overrides.
pub async fn load_settings(cli: &Cli) -> Result<Settings> {
    let store = SettingsStore::load_default().await?;
    let mut settings = store.get().await;
    settings.apply_env_overrides(|key| std::env::var(key).ok());

    if let Some(url) = &cli.api_url {
        settings.set_value("api_base_url", url)?;
    }
    if let Some(platform) = &cli.platform {
        settings.set_value("platform", platform)?;
    }
    settings.validate()?;

    debug!(api = %settings.api_base_url, platform = %settings.platform, "Settings resolved");
    Ok(settings)
}

/// Builds the REST client for the resolved settings.
pub fn build_api(settings: &Settings) -> Result<RestBookingApi> {
    Ok(RestBookingApi::new(&settings.client_settings())?)
}

/// Parses a `YYYY-MM-DD` argument, defaulting to today.
pub fn parse_date(arg: Option<&str>) -> Result<CalendarDate> {
    match arg {
        Some(s) => s
            .parse()
            .with_context(|| format!("Invalid date {s:?}, expected YYYY-MM-DD")),
        None => Ok(CalendarDate::today()),
    }
}
