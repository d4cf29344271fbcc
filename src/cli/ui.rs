use crate::core::RateResponse;
use chrono::NaiveDate;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;

/// Defines different styles for text elements.
pub enum StyleType {
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Renders a rate the way the service sent it; strings lose their quotes.
pub fn format_rate(rate: &Value) -> String {
    match rate {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Table with one row per day; days without a `rate` show "N/A".
pub fn rates_table(dates: &[NaiveDate], responses: &[RateResponse]) -> Table {
    let mut table = new_styled_table();
    table.set_header(vec![header_cell("Date"), header_cell("Rate")]);

    for (date, response) in dates.iter().zip(responses) {
        let rate_cell = response.rate().map_or(
            Cell::new("N/A")
                .fg(Color::DarkGrey)
                .set_alignment(CellAlignment::Right),
            |rate| Cell::new(format_rate(rate)).set_alignment(CellAlignment::Right),
        );
        table.add_row(vec![Cell::new(date.to_string()), rate_cell]);
    }
    table
}

/// Creates a new `indicatif::ProgressBar` with standard styling.
pub fn new_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(progress_style) = ProgressStyle::default_bar()
        .template("{spinner:.green} {msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
    {
        pb.set_style(progress_style.progress_chars("#>-"));
    }
    pb
}
