//! Session command - drive the selection flow from stdin.
//!
//! Each input line is one user intent. After every intent the flow is
//! settled and the resulting screen is printed.

use anyhow::{Context, Result};
use barberslot_core::{BookingApi, CalendarDate};
use barberslot_store::{AppointmentFlowController, FlowEvent, RefetchOrdering};
use clap::Args;
use std::io::{IsTerminal, Write};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use super::{build_api, load_settings, parse_date};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

const HELP: &str = "\
Commands:
  select <id>         Select a provider
  toggle              Show or hide the date picker
  pick <YYYY-MM-DD>   Choose a day in the picker
  cancel              Dismiss the picker without choosing
  retry               Reload whatever failed
  show                Print the current screen
  quit                Leave the session";

/// Arguments for the session command.
#[derive(Args)]
pub struct SessionArgs {
    /// Provider id the screen opens on.
    pub provider: String,

    /// Initial day as YYYY-MM-DD (default: today).
    #[arg(long, short)]
    pub date: Option<String>,

    /// How overlapping availability responses are reconciled
    /// (arrival_order or issue_order; default from settings).
    #[arg(long)]
    pub ordering: Option<RefetchOrdering>,
}

/// One parsed input line.
#[derive(Debug, PartialEq, Eq)]
pub enum SessionCommand {
    /// Intents to dispatch, in order.
    Events(Vec<FlowEvent>),
    /// Print the screen.
    Show,
    /// Print the command list.
    Help,
    /// End the session.
    Quit,
}

/// Parses an input line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<SessionCommand>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

    let command = match (verb.to_ascii_lowercase().as_str(), rest) {
        ("select", id) if !id.is_empty() => {
            SessionCommand::Events(vec![FlowEvent::SelectProvider(id.to_string())])
        }
        ("select", _) => anyhow::bail!("select needs a provider id"),
        ("toggle", "") => SessionCommand::Events(vec![FlowEvent::ToggleDatePicker]),
        ("pick", date) => {
            let date: CalendarDate = date
                .parse()
                .with_context(|| format!("Invalid date {date:?}, expected YYYY-MM-DD"))?;
            SessionCommand::Events(vec![FlowEvent::DateChanged(Some(date.to_picker()))])
        }
        ("cancel", "") => SessionCommand::Events(vec![FlowEvent::DateChanged(None)]),
        ("retry", "") => SessionCommand::Events(vec![
            FlowEvent::RetryCatalog,
            FlowEvent::RetryAvailability,
        ]),
        ("show", "") => SessionCommand::Show,
        ("help" | "?", "") => SessionCommand::Help,
        ("quit" | "exit", "") => SessionCommand::Quit,
        _ => anyhow::bail!("Unknown command: {line}. Type 'help' for the list"),
    };

    Ok(Some(command))
}

/// Runs the session command.
pub async fn run(args: &SessionArgs, cli: &Cli) -> Result<()> {
    let today = parse_date(args.date.as_deref())?;
    let settings = load_settings(cli).await?;
    let ordering = args.ordering.unwrap_or(settings.refetch_ordering);
    let config = settings
        .flow_config(args.provider.as_str(), today)?
        .with_ordering(ordering);

    let api: Arc<dyn BookingApi> = Arc::new(build_api(&settings)?);
    let mut flow = AppointmentFlowController::new(api, config);

    info!(provider = %args.provider, date = %today, ordering = %ordering, "Session started");
    flow.mount();
    flow.settle().await;
    render(&flow, cli)?;

    let interactive = cli.format == OutputFormat::Text && std::io::stdin().is_terminal();
    let text = TextFormatter::new(!cli.no_color);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        if interactive {
            print!("> ");
            std::io::stdout().flush()?;
        }
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_line(&line) {
            Ok(None) => {}
            Ok(Some(SessionCommand::Quit)) => break,
            Ok(Some(SessionCommand::Help)) => eprintln!("{HELP}"),
            Ok(Some(SessionCommand::Show)) => render(&flow, cli)?,
            Ok(Some(SessionCommand::Events(events))) => {
                for event in events {
                    let effects = flow.dispatch(event);
                    debug!(started = effects.len(), "Intent applied");
                }
                flow.settle().await;
                render(&flow, cli)?;
            }
            Err(e) => eprintln!("{}", text.format_error("session", &e.to_string())),
        }
    }

    info!("Session ended");
    Ok(())
}

fn render(flow: &AppointmentFlowController, cli: &Cli) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_snapshot(flow.state()));
            println!();
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_snapshot(flow.state())?);
        }
    }
    Ok(())
}
