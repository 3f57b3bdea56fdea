//! Availability command - show one day of a provider's schedule.

use anyhow::Result;
use clap::Args;
use tracing::info;

use super::{build_api, load_settings, parse_date};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the availability command.
#[derive(Args)]
pub struct AvailabilityArgs {
    /// Provider id.
    pub provider: String,

    /// Day to query as YYYY-MM-DD (default: today).
    #[arg(long, short)]
    pub date: Option<String>,

    /// Only list open hours.
    #[arg(long)]
    pub open_only: bool,
}

/// Runs the availability command.
pub async fn run(args: &AvailabilityArgs, cli: &Cli) -> Result<()> {
    let date = parse_date(args.date.as_deref())?;
    let settings = load_settings(cli).await?;
    let api = build_api(&settings)?;

    info!(provider = %args.provider, date = %date, "Fetching availability");
    let day = api.fetch_day_availability(&args.provider, date).await?;

    match cli.format {
        OutputFormat::Text if args.open_only => {
            let hours: Vec<String> = day
                .items()
                .iter()
                .filter(|item| item.available)
                .map(barberslot_core::AvailabilityItem::label)
                .collect();
            println!("{}", hours.join("\n"));
        }
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_day(&args.provider, date, &day));
        }
        OutputFormat::Json if args.open_only => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&day.open_hours())?);
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_day(&args.provider, date, &day)?);
        }
    }

    Ok(())
}
