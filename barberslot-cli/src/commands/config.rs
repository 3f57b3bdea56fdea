//! Config command - manage configuration.

use anyhow::Result;
use barberslot_store::settings_store::SETTING_KEYS;
use barberslot_store::{RefetchOrdering, Settings, SettingsStore, default_config_dir};
use clap::{Args, Subcommand};
use tracing::info;

use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Change one setting.
    Set {
        /// Setting name (api_base_url, platform, refetch_ordering,
        /// timeout_secs, max_retries, api_token).
        key: String,

        /// New value. An empty api_token clears it.
        value: String,
    },

    /// Reset to defaults.
    Reset,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli).await,
        ConfigAction::Path => show_paths(cli).await,
        ConfigAction::Set { key, value } => set_value(key, value).await,
        ConfigAction::Reset => reset_config().await,
    }
}

async fn show_config(cli: &Cli) -> Result<()> {
    let store = SettingsStore::load_default().await?;
    let settings = masked(store.get().await);

    match cli.format {
        OutputFormat::Text => {
            println!("BarberSlot Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("API base URL:     {}", settings.api_base_url);
            println!("API token:        {}", settings.api_token.as_deref().unwrap_or("(none)"));
            println!("Platform:         {}", settings.platform);
            println!("Refetch ordering: {}", settings.refetch_ordering);
            println!("Timeout:          {}s", settings.timeout_secs);
            println!("Max retries:      {}", settings.max_retries);
            println!();
            println!("Date pickers:");
            let table = settings.capability_table();
            for platform in table.platforms() {
                if let Some(caps) = table.get(platform) {
                    let dismiss = if caps.auto_dismiss { "auto-dismiss" } else { "persistent" };
                    let mut line = format!("  • {platform:<10} {dismiss}, {}", caps.display.as_str());
                    if let Some(color) = &caps.text_color {
                        line.push_str(&format!(", text {color}"));
                    }
                    println!("{line}");
                }
            }
            println!();
            let orderings: Vec<String> = RefetchOrdering::all().iter().map(ToString::to_string).collect();
            println!("Orderings: {}", orderings.join(", "));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&settings)?);
        }
    }

    Ok(())
}

async fn show_paths(cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let store = SettingsStore::load_default().await?;
    let settings_path = store.path();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:    {}", config_dir.display());
            println!("Settings file: {}", settings_path.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "settings_file": settings_path.display().to_string(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn set_value(key: &str, value: &str) -> Result<()> {
    if !SETTING_KEYS.contains(&key) {
        anyhow::bail!("Unknown setting: {key}. Use: {}", SETTING_KEYS.join(", "));
    }

    let store = SettingsStore::load_default().await?;
    store.set_value(key, value).await?;
    store.save().await?;

    info!(key = key, "Configuration updated");
    if key == "api_token" {
        println!("{key} updated");
    } else {
        println!("{key} set to: {value}");
    }

    Ok(())
}

async fn reset_config() -> Result<()> {
    let store = SettingsStore::load_default().await?;

    if store.reset().await? {
        println!("Configuration reset to defaults");
    } else {
        println!("No configuration file to reset");
    }

    Ok(())
}

/// Hides the token in displayed settings.
fn masked(mut settings: Settings) -> Settings {
    if let Some(token) = settings.api_token.as_mut() {
        *token = "********".to_string();
    }
    settings
}
