//! Text output formatting with colors.

use barberslot_core::{AvailabilityItem, CalendarDate, DayAvailability, Provider};
use barberslot_store::{FlowState, LoadState};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

const SELECTED_MARKER: char = '●';
const OPEN_MARK: char = '✓';
const CLOSED_MARK: char = '✗';

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    // ========================================================================
    // Providers
    // ========================================================================

    /// Formats the provider list header.
    pub fn format_providers_header(&self) -> String {
        format!(
            "  {} {} {}",
            self.bold(&format!("{:<24}", "Provider")),
            self.bold(&format!("{:<16}", "ID")),
            self.bold("Avatar")
        )
    }

    /// Formats one provider row, highlighted when selected.
    pub fn format_provider_line(&self, provider: &Provider, selected: bool) -> String {
        let marker = if selected {
            self.cyan(&SELECTED_MARKER.to_string())
        } else {
            " ".to_string()
        };
        let name = format!("{:<24}", provider.name);
        let name = if selected { self.bold(&name) } else { name };
        let avatar = match provider.avatar() {
            Some(url) => url.to_string(),
            None => self.dim(&format!("[{}]", provider.initials())),
        };

        format!("{marker} {name} {:<16} {avatar}", provider.id)
    }

    /// Formats a full provider list.
    pub fn format_providers(&self, providers: &[Provider]) -> String {
        let mut lines = vec![self.format_providers_header(), "─".repeat(60)];
        for provider in providers {
            lines.push(self.format_provider_line(provider, false));
        }
        if providers.is_empty() {
            lines.push(self.dim("  No providers"));
        }
        lines.join("\n")
    }

    // ========================================================================
    // Availability
    // ========================================================================

    /// Formats one hour slot as `09:00 ✓`.
    pub fn format_slot(&self, item: &AvailabilityItem) -> String {
        if item.available {
            format!("{} {}", item.label(), self.green(&OPEN_MARK.to_string()))
        } else {
            self.dim(&format!("{} {CLOSED_MARK}", item.label()))
        }
    }

    /// Formats a day split into morning and afternoon rows.
    pub fn format_day(&self, provider_id: &str, date: CalendarDate, day: &DayAvailability) -> String {
        let mut lines = vec![format!(
            "{} {} on {}",
            self.bold("Availability for"),
            provider_id,
            date
        )];

        if day.is_empty() {
            lines.push(self.dim("  No slots offered"));
            return lines.join("\n");
        }

        lines.push(self.format_period("Morning", day.morning()));
        lines.push(self.format_period("Afternoon", day.afternoon()));
        lines.push(format!("  {} of {} slots open", day.open_hours().len(), day.len()));
        lines.join("\n")
    }

    fn format_period<'a>(
        &self,
        label: &str,
        items: impl Iterator<Item = &'a AvailabilityItem>,
    ) -> String {
        let slots: Vec<String> = items.map(|item| self.format_slot(item)).collect();
        let body = if slots.is_empty() {
            self.dim("none")
        } else {
            slots.join("  ")
        };
        format!("  {:<10} {body}", format!("{label}:"))
    }

    // ========================================================================
    // Flow Snapshot
    // ========================================================================

    /// Formats a load state.
    pub fn format_state(&self, state: &LoadState) -> String {
        match state {
            LoadState::Idle => self.dim("idle"),
            LoadState::Loading => self.yellow("loading"),
            LoadState::Ready => self.green("ready"),
            LoadState::Failed(failure) => self.red(&format!("failed: {}", failure.message())),
        }
    }

    /// Formats everything a screen would render.
    pub fn format_snapshot(&self, state: &FlowState) -> String {
        let selection = state.selection();
        let catalog = state.catalog();
        let availability = state.availability();

        let mut lines = vec![format!(
            "{} ({})",
            self.bold("Providers"),
            self.format_state(catalog.state())
        )];
        for provider in catalog.providers() {
            lines.push(self.format_provider_line(provider, state.is_selected(provider)));
        }
        if state.selected_provider().is_none() {
            lines.push(format!(
                "{} {}",
                self.dim("Selected:"),
                selection.provider_id()
            ));
        }

        lines.push(String::new());
        lines.push(format!("{} {}", self.bold("Date:"), selection.date()));
        if let Some(props) = state.picker_props() {
            let mut picker = format!("  picker open ({})", props.display.as_str());
            if let Some(color) = &props.text_color {
                picker.push_str(&format!(" text {color}"));
            }
            lines.push(self.dim(&picker));
        }

        lines.push(String::new());
        lines.push(format!(
            "{} ({})",
            self.bold("Availability"),
            self.format_state(availability.state())
        ));
        match availability.shown() {
            Some(shown) => {
                let day = self.format_day(&shown.provider_id, shown.date, availability.day());
                lines.extend(day.lines().skip(1).map(str::to_string));
                if !shown.same_key(selection.provider_id(), selection.date()) {
                    lines.push(self.yellow(&format!(
                        "  showing {} on {}",
                        shown.provider_id, shown.date
                    )));
                }
            }
            None => lines.push(self.dim("  Nothing loaded yet")),
        }

        lines.join("\n")
    }

    /// Formats an error message.
    pub fn format_error(&self, context: &str, error: &str) -> String {
        format!("{}: {} - {}", self.bold(context), self.red("Error"), error)
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colors_disabled() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.format_state(&LoadState::Ready), "ready");
        assert!(!formatter.format_providers_header().contains('\x1b'));
    }

    #[test]
    fn test_colors_enabled() {
        let formatter = TextFormatter::new(true);
        assert!(formatter.format_state(&LoadState::Ready).contains(GREEN));
        assert!(formatter.format_state(&LoadState::Loading).contains(YELLOW));
    }

    #[test]
    fn test_selected_row_stays_aligned_with_colors() {
        let formatter = TextFormatter::new(true);
        let provider = Provider::new("abc", "Ana Souza");
        let plain = formatter.format_provider_line(&provider, false);
        let selected = formatter.format_provider_line(&provider, true);

        let id_column = |line: &str| {
            let visible = line.replace(BOLD, "").replace(CYAN, "").replace(RESET, "");
            let byte = visible.find(" abc ").unwrap();
            visible[..byte].chars().count()
        };
        assert_eq!(id_column(&selected), id_column(&plain));
        assert_eq!(id_column(&plain), 26);

        let header = formatter.format_providers_header().replace(BOLD, "").replace(RESET, "");
        assert_eq!(header.find("ID"), Some(27));
    }

    #[test]
    fn test_slot_marks() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.format_slot(&AvailabilityItem::new(9, true)), "09:00 ✓");
        assert_eq!(formatter.format_slot(&AvailabilityItem::new(14, false)), "14:00 ✗");
    }
}
