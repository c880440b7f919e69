// src/extractors/calendar.rs
use std::collections::HashMap;

use indexmap::IndexMap;

use crate::records::CalendarRecord;
use crate::source::{RawTable, TableSource};
use crate::utils::error::ExtractError;
use crate::utils::text::{clean_cell, normalize_whitespace};

const MIN_HEADER_CELLS: usize = 4;
const MAX_DAY_LABEL_CHARS: usize = 5;

/// Key given to a column whose header cell is blank.
const BLANK_COLUMN_PREFIX: &str = "column_";

pub const HEADER_NOT_FOUND: &str = "Could not identify the header row (weekday labels).";

/// Parses the month grid of an academic calendar page. Takes the first table
/// only; the grid's last row is its legend.
pub fn parse_calendar(
    source: &dyn TableSource,
    page: u32,
) -> Result<Option<CalendarRecord>, ExtractError> {
    tracing::info!("Parsing calendar on page {}", page);

    let tables = source.raw_tables(page)?;
    let Some(table) = tables.first() else {
        tracing::warn!("No table found on calendar page {}", page);
        return Ok(None);
    };
    if tables.len() > 1 {
        tracing::warn!(
            "Multiple tables ({}) found on calendar page {}; processing the first",
            tables.len(),
            page
        );
    }

    let record = structure_calendar(table, page);
    match &record.error {
        Some(error) => tracing::warn!("Calendar on page {} not structured: {}", page, error),
        None => tracing::info!("Calendar on page {} parsed: {} weeks", page, record.rows.len()),
    }
    Ok(Some(record))
}

/// Splits off the legend, finds the day-label header and keys every week by
/// it. Header failure is reported in the record, not raised.
pub fn structure_calendar(table: &RawTable, page: u32) -> CalendarRecord {
    let (body_len, legend) = split_legend(table);
    let title = table.cleaned(0, 0).unwrap_or_default();

    let Some(header_index) = find_header_row(table, body_len) else {
        return CalendarRecord {
            page,
            title,
            rows: Vec::new(),
            legend,
            summary: HEADER_NOT_FOUND.to_string(),
            error: Some(HEADER_NOT_FOUND.to_string()),
        };
    };

    let labels = dedup_labels((0..table.width()).map(|col| {
        table
            .cleaned(header_index, col)
            .unwrap_or_else(|| format!("{}{}", BLANK_COLUMN_PREFIX, col))
    }));

    let week_rows: Vec<usize> = (header_index + 1..body_len)
        .filter(|&row| !table.row_values(row).is_empty())
        .collect();
    let kept_columns: Vec<usize> = (0..table.width())
        .filter(|&col| week_rows.iter().any(|&row| table.cleaned(row, col).is_some()))
        .collect();

    let rows: Vec<IndexMap<String, String>> = week_rows
        .iter()
        .map(|&row| {
            kept_columns
                .iter()
                .map(|&col| {
                    let value = table.cell(row, col).map(normalize_whitespace).unwrap_or_default();
                    (labels[col].clone(), value)
                })
                .collect()
        })
        .collect();

    let summary = summarize_calendar(&title, legend.as_deref().unwrap_or(""), &rows);
    CalendarRecord {
        page,
        title,
        rows,
        legend,
        summary,
        error: None,
    }
}

/// Returns the number of body rows and the legend text of the trailing row.
fn split_legend(table: &RawTable) -> (usize, Option<String>) {
    if table.len() <= 1 {
        return (table.len(), None);
    }
    let legend = clean_cell(table.cell(table.len() - 1, 0));
    (table.len() - 1, legend)
}

/// A row of more than three filled cells, all of them short day labels.
fn find_header_row(table: &RawTable, body_len: usize) -> Option<usize> {
    (0..body_len).find(|&row| {
        let values = table.row_values(row);
        values.len() >= MIN_HEADER_CELLS
            && values.iter().all(|v| v.chars().count() < MAX_DAY_LABEL_CHARS)
    })
}

/// Repeated labels get `_2`, `_3`, ... in order of appearance.
pub fn dedup_labels(labels: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    labels
        .into_iter()
        .map(|label| {
            let count = counts.entry(label.clone()).or_insert(0);
            *count += 1;
            if *count > 1 {
                format!("{}_{}", label, count)
            } else {
                label
            }
        })
        .collect()
}

/// Drops the `_N` suffix added by [`dedup_labels`].
fn base_label(label: &str) -> &str {
    match label.rsplit_once('_') {
        Some((base, suffix)) if !base.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()) => base,
        _ => label,
    }
}

pub fn summarize_calendar(title: &str, legend: &str, rows: &[IndexMap<String, String>]) -> String {
    if rows.is_empty() {
        return format!("Table '{}' (legend: '{}') is empty.", title, legend);
    }

    let weeks: Vec<String> = rows
        .iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let days: Vec<String> = row
                .iter()
                .filter(|(label, value)| !value.is_empty() && !label.starts_with(BLANK_COLUMN_PREFIX))
                .map(|(label, value)| format!("day {} is {}", base_label(label), value))
                .collect();
            if days.is_empty() {
                None
            } else {
                Some(format!("in week {}, {}", index + 1, days.join(", ")))
            }
        })
        .collect();

    format!(
        "Table '{}' describes a calendar. Legend: '{}'. Details: {}.",
        title,
        legend,
        weeks.join("; ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            rows.iter()
                .map(|r| {
                    r.iter()
                        .map(|c| if c.is_empty() { None } else { Some(c.to_string()) })
                        .collect()
                })
                .collect(),
        )
    }

    fn march() -> RawTable {
        grid(&[
            &["MARÇO 2024", "", "", "", "", ""],
            &["D", "S", "T", "Q", "Q", ""],
            &["", "", "", "", "", ""],
            &["3", "4", "5", "6", "7", ""],
            &["10", "11", "12", "13\n", "14", ""],
            &["04/03 - Início das aulas", "", "", "", "", ""],
        ])
    }

    #[test]
    fn test_dedup_header_labels() {
        let labels = dedup_labels(["Mon", "Tue", "Mon"].map(String::from));
        assert_eq!(labels, vec!["Mon", "Tue", "Mon_2"]);
        let labels = dedup_labels(["Q", "Q", "Q"].map(String::from));
        assert_eq!(labels, vec!["Q", "Q_2", "Q_3"]);
    }

    #[test]
    fn test_structure_calendar() {
        let record = structure_calendar(&march(), 5);

        assert_eq!(record.error, None);
        assert_eq!(record.page, 5);
        assert_eq!(record.title, "MARÇO 2024");
        assert_eq!(record.legend.as_deref(), Some("04/03 - Início das aulas"));
        assert_eq!(record.rows.len(), 2, "blank week rows are dropped");

        let labels: Vec<&str> = record.rows[0].keys().map(String::as_str).collect();
        assert_eq!(labels, vec!["D", "S", "T", "Q", "Q_2"], "blank trailing column dropped");
        assert_eq!(record.rows[1]["Q"], "13");

        assert!(record.summary.starts_with("Table 'MARÇO 2024' describes a calendar. Legend: '04/03 - Início das aulas'."));
        assert!(record.summary.contains("in week 1, day D is 3, day S is 4"));
        assert!(record.summary.contains("day Q is 7"), "suffix is stripped from labels");
        assert!(record.summary.contains("; in week 2, day D is 10"));
    }

    #[test]
    fn test_blank_header_cells_are_keyed_by_position_and_left_out_of_summary() {
        let table = grid(&[
            &["JUNHO", "", "", "", "", "", ""],
            &["", "D", "S", "T", "Q", "", "S"],
            &["w1", "1", "2", "3", "4", "5", "6"],
            &["Legenda", "", "", "", "", "", ""],
        ]);
        let record = structure_calendar(&table, 9);

        let labels: Vec<&str> = record.rows[0].keys().map(String::as_str).collect();
        assert_eq!(labels, vec!["column_0", "D", "S", "T", "Q", "column_5", "S_2"]);
        assert_eq!(record.rows[0]["column_5"], "5");

        assert!(record.summary.contains("in week 1, day D is 1, day S is 2, day T is 3, day Q is 4, day S is 6."));
        assert!(!record.summary.contains("column"));
        assert!(!record.summary.contains("day _"));
    }

    #[test]
    fn test_missing_header_is_reported_not_raised() {
        let table = grid(&[&["Title", "Long label"], &["a", "b"], &["legend", ""]]);
        let record = structure_calendar(&table, 2);

        assert_eq!(record.error.as_deref(), Some(HEADER_NOT_FOUND));
        assert_eq!(record.summary, HEADER_NOT_FOUND);
        assert!(record.rows.is_empty());
        assert_eq!(record.title, "Title");
    }

    #[test]
    fn test_empty_summary() {
        assert_eq!(
            summarize_calendar("ABRIL", "", &[]),
            "Table 'ABRIL' (legend: '') is empty."
        );
    }

    #[test]
    fn test_base_label() {
        assert_eq!(base_label("Q_2"), "Q");
        assert_eq!(base_label("SEG_A"), "SEG_A");
        assert_eq!(base_label("column_3"), "column");
    }
}
