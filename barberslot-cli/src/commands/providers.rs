//! Providers command - list bookable providers.

use anyhow::Result;
use tracing::info;

use super::{build_api, load_settings};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the providers command.
pub async fn run(cli: &Cli) -> Result<()> {
    let settings = load_settings(cli).await?;
    let api = build_api(&settings)?;

    info!("Listing providers");
    let providers = api.fetch_providers().await?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_providers(&providers));
            if !cli.quiet {
                println!();
                println!(
                    "Total: {} providers ({} without avatar)",
                    providers.len(),
                    providers.iter().filter(|p| !p.has_avatar()).count()
                );
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_providers(&providers)?);
        }
    }

    Ok(())
}
