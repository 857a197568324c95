//! Terminal summaries for each command.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use geolink_validate::ReviewSummary;

use crate::pipeline::{
    CleanOutcome, CountryStatus, LinkOutcome, StatusRow, ValidateOutcome,
};

pub fn print_clean_summary(outcome: &CleanOutcome) {
    println!(
        "Archive: {} rows across {} countries ({} before 1945 dropped, {} duplicates collapsed)",
        outcome.sources, outcome.countries, outcome.before_min_year, outcome.duplicates
    );
    println!(
        "Standard: {} subdivisions from {} rows",
        outcome.subdivisions, outcome.reference_rows
    );
}

pub fn print_link_summary(outcome: &LinkOutcome) {
    if !outcome.countries.is_empty() {
        println!("{}", link_table(outcome));
    }
    println!(
        "Linked {}, skipped {}, no reference {}, failed {}",
        outcome.count(|status| matches!(status, CountryStatus::Linked { .. })),
        outcome.count(|status| matches!(status, CountryStatus::Skipped)),
        outcome.count(|status| matches!(status, CountryStatus::NoReference)),
        outcome.failed.len(),
    );
    if let Some(message) = retry_message(&outcome.failed) {
        eprintln!("{message}");
    }
}

pub fn link_table(outcome: &LinkOutcome) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Country"),
        header_cell("Status"),
        header_cell("Rows"),
        header_cell("Flagged"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for row in &outcome.countries {
        let (status, rows, flagged) = match &row.status {
            CountryStatus::Linked { rows, flagged } => (
                Cell::new("linked").fg(Color::Green),
                Cell::new(rows),
                count_cell(*flagged, Color::Yellow),
            ),
            CountryStatus::Skipped => (dim_cell("skipped"), dim_cell("-"), dim_cell("-")),
            CountryStatus::NoReference => (
                Cell::new("no reference").fg(Color::Yellow),
                dim_cell("-"),
                dim_cell("-"),
            ),
            CountryStatus::Unknown => (
                Cell::new("not in archive").fg(Color::Yellow),
                dim_cell("-"),
                dim_cell("-"),
            ),
            CountryStatus::Failed { .. } => (
                Cell::new("failed")
                    .fg(Color::Red)
                    .add_attribute(Attribute::Bold),
                dim_cell("-"),
                dim_cell("-"),
            ),
        };
        table.add_row(vec![Cell::new(&row.country), status, rows, flagged]);
    }
    table
}

/// Retry hint listing failed countries, in the order they failed.
pub fn retry_message(failed: &[String]) -> Option<String> {
    if failed.is_empty() {
        return None;
    }
    let flags: Vec<String> = failed
        .iter()
        .map(|country| format!("--country \"{country}\""))
        .collect();
    Some(format!(
        "{} countries failed: {}\nretry with: geolink link {}",
        failed.len(),
        failed.join(", "),
        flags.join(" ")
    ))
}

pub fn print_review_summary(outcome: &ValidateOutcome) {
    println!("Validated {} partitions", outcome.partitions);
    println!("Output: {}", outcome.validated_json.display());
    println!("CSV: {}", outcome.validated_csv.display());
    println!("Work queue: {}", outcome.work_queue_csv.display());
    if !outcome.summary.by_country_label.is_empty() {
        println!("{}", review_table(&outcome.summary));
    }
    println!("{}", review_totals(&outcome.summary));
    for warning in &outcome.warnings {
        eprintln!("warning: {warning}");
    }
}

pub fn review_table(summary: &ReviewSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Country"),
        header_cell("Label"),
        header_cell("Flagged"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for count in &summary.by_country_label {
        let label = match count.label {
            Some(label) => Cell::new(label.as_str()),
            None => Cell::new("unlabeled")
                .fg(Color::Yellow)
                .add_attribute(Attribute::Bold),
        };
        table.add_row(vec![
            Cell::new(&count.country),
            label,
            Cell::new(count.flagged),
        ]);
    }
    table
}

pub fn review_totals(summary: &ReviewSummary) -> String {
    [
        format!("rows: {}", summary.total_rows),
        format!(
            "flagged: {} (labeled {}, unlabeled {})",
            summary.flagged,
            summary.labeled,
            summary.unlabeled()
        ),
        format!("corrected: {}", summary.corrected),
        format!("unresolved override codes: {}", summary.unresolved_codes),
    ]
    .join("\n")
}

pub fn print_status(rows: &[StatusRow]) {
    if rows.is_empty() {
        println!("Nothing cleaned or linked yet");
        return;
    }
    println!("{}", status_table(rows));
    let stored = rows.iter().filter(|row| row.stored.is_some()).count();
    println!("{stored} of {} countries stored", rows.len());
}

pub fn status_table(rows: &[StatusRow]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Country"),
        header_cell("Sources"),
        header_cell("State"),
        header_cell("Rows"),
        header_cell("Flagged"),
        header_cell("Layout"),
        header_cell("Saved"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for row in rows {
        let mut cells = vec![Cell::new(&row.country), Cell::new(row.sources)];
        match &row.stored {
            Some(stored) => cells.extend([
                Cell::new("stored").fg(Color::Green),
                Cell::new(stored.rows),
                count_cell(stored.flagged, Color::Yellow),
                Cell::new(stored.layout.as_str()),
                dim_cell(&stored.saved_at),
            ]),
            None => cells.extend([
                Cell::new("pending").fg(Color::Yellow),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
            ]),
        }
        table.add_row(cells);
    }
    table
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).add_attribute(Attribute::Dim)
}
