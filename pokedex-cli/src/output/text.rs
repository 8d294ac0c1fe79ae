//! Text output formatting with stat bars and colors.

use pokedex_core::{CatalogEntryDetail, PageResult, TypeName};
use pokedex_store::{Phase, SearchState, Settings};

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

// Stat bar characters
const BAR_FULL: char = '█';
const BAR_EMPTY: char = '░';

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
    bar_width: usize,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self {
            use_colors,
            bar_width: 20,
        }
    }

    /// Set the stat bar width.
    #[cfg(test)]
    pub fn with_bar_width(mut self, width: usize) -> Self {
        self.bar_width = width;
        self
    }

    /// One line per entry: number, name, types.
    pub fn format_entry_line(&self, entry: &CatalogEntryDetail) -> String {
        let types = entry
            .types
            .iter()
            .map(TypeName::as_str)
            .collect::<Vec<_>>()
            .join("/");
        format!(
            "{} {:<14} {}",
            self.dim(&format!("#{:04}", entry.id)),
            entry.name,
            self.cyan(&types)
        )
    }

    /// Formats one assembled page.
    pub fn format_page(&self, result: &PageResult, page_index: usize, page_size: usize) -> String {
        let mut lines = Vec::new();

        let first = page_index * page_size;
        let header = if result.is_empty() {
            format!("No entries on page {} ({} total)", page_index + 1, result.total_count)
        } else {
            format!(
                "Page {}: entries {}-{} of {}",
                page_index + 1,
                first + 1,
                first + result.len(),
                result.total_count
            )
        };
        lines.push(self.bold(&header));
        lines.push("─".repeat(40));

        for entry in &result.entries {
            lines.push(self.format_entry_line(entry));
        }

        if result.has_more {
            lines.push(String::new());
            lines.push(self.dim(&format!("More results: --page {}", page_index + 1)));
        }

        lines.join("\n")
    }

    /// Formats everything a browse session accumulated.
    pub fn format_browse(&self, state: &SearchState) -> String {
        let mut lines = Vec::new();

        let pages = if state.entries.is_empty() {
            0
        } else {
            state.current_page + 1
        };
        lines.push(self.bold(&format!(
            "{} of {} entries ({} page{})",
            state.entries.len(),
            state.total_count,
            pages,
            if pages == 1 { "" } else { "s" }
        )));
        lines.push("─".repeat(40));

        for entry in &state.entries {
            lines.push(self.format_entry_line(entry));
        }

        match (&state.phase, &state.error) {
            (Phase::Error, Some(error)) => {
                lines.push(String::new());
                lines.push(self.red(&format!("Stopped: {error}")));
            }
            _ if state.has_more => {
                lines.push(String::new());
                lines.push(self.dim("More results available"));
            }
            _ => {}
        }

        lines.join("\n")
    }

    /// Formats the detail view for one entry.
    pub fn format_detail(&self, entry: &CatalogEntryDetail) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "{} {}",
            self.bold(&display_name(&entry.name)),
            self.dim(&format!("#{:04}", entry.id))
        ));
        lines.push("─".repeat(40));

        let types = entry
            .types
            .iter()
            .map(TypeName::display_name)
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("Types:     {}", self.cyan(&types)));
        lines.push(format!("Height:    {:.1} m", entry.height_meters()));
        lines.push(format!("Weight:    {:.1} kg", entry.weight_kg()));

        let abilities = entry
            .abilities
            .iter()
            .map(|a| a.replace('-', " "))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("Abilities: {abilities}"));

        if !entry.stats.is_empty() {
            lines.push(String::new());
            lines.push(self.bold("Base stats"));
            for stat in &entry.stats {
                lines.push(format!(
                    "{:<16} {:>3} {}",
                    stat.display_name(),
                    stat.base_value,
                    self.stat_bar(stat.bar_percent())
                ));
            }
        }

        if let Some(image) = entry.display_image() {
            lines.push(String::new());
            lines.push(format!("Image:     {}", self.dim(image)));
        }

        lines.join("\n")
    }

    /// Formats the type list.
    pub fn format_types(&self, types: &[TypeName]) -> String {
        let mut lines = vec![self.bold(&format!("{} types", types.len())), "─".repeat(40)];
        lines.extend(types.iter().map(TypeName::display_name));
        lines.join("\n")
    }

    /// Formats settings.
    pub fn format_settings(&self, settings: &Settings) -> String {
        [
            self.bold("Pokedex Configuration"),
            "─".repeat(40),
            format!("Base URL:           {}", settings.base_url),
            format!("Page size:          {}", settings.page_size),
            format!("Request timeout:    {} ms", settings.request_timeout_ms),
            format!("Max attempts:       {}", settings.max_attempts),
            format!("Retry base delay:   {} ms", settings.retry_base_delay_ms),
            format!("Search batch limit: {}", settings.search_batch_limit),
            format!("Cache TTL:          {} s", settings.cache_ttl_secs),
            format!("Cache capacity:     {}", settings.cache_capacity),
            format!("Debounce:           {} ms", settings.debounce_ms),
            format!("Log level:          {}", settings.log_level),
        ]
        .join("\n")
    }

    /// Formats a stat bar for a 0-100 percentage.
    pub fn stat_bar(&self, percent: f64) -> String {
        let percent = percent.clamp(0.0, 100.0);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let filled = ((percent / 100.0) * self.bar_width as f64).round() as usize;
        let empty = self.bar_width.saturating_sub(filled);

        let bar = format!(
            "{}{}",
            BAR_FULL.to_string().repeat(filled),
            BAR_EMPTY.to_string().repeat(empty)
        );

        self.color_for_percent(percent, &bar)
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn color_for_percent(&self, percent: f64, text: &str) -> String {
        if percent < 25.0 {
            self.red(text)
        } else if percent < 50.0 {
            self.yellow(text)
        } else {
            self.green(text)
        }
    }

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

/// Capitalizes each `-`-separated word: `mr-mime` becomes `Mr Mime`.
fn display_name(name: &str) -> String {
    name.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
