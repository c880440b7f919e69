// src/extractors/schedule.rs

// --- Imports ---
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::extractors::calendar::dedup_labels;
use crate::extractors::keywords::{self as kw, has};
use crate::records::{ScheduleRecord, ScheduleRow, Slot};
use crate::source::{RawTable, TableSource};
use crate::utils::error::ExtractError;
use crate::utils::text::{clean_cell, forward_fill, normalize_whitespace};

// --- Constants ---
pub const DEFAULT_METADATA_LINE_LIMIT: usize = 15;
const MIN_FALLBACK_HEADER_CELLS: usize = 3;
const BOILERPLATE_ROOM_INFO: &[&str] = &["indicado", "indicated"];

// --- Regex Patterns (Lazy Static) ---
static SEMESTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d+/\d{4}\s*$").expect("Failed to compile SEMESTER_RE"));

static CLASS_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:CIÊNCIA DA COMPUTAÇÃO|COMPUTER SCIENCE)\s*[-–—]\s*(.+)")
        .expect("Failed to compile CLASS_LABEL_RE")
});

static ROOM_INFO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:SALAS?|ROOMS?):\s*(.+)").expect("Failed to compile ROOM_INFO_RE")
});

static PROFESSOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([^)]+)\)").expect("Failed to compile PROFESSOR_RE"));

// Most specific first: building-qualified rooms, building-qualified labs,
// bare rooms, bare labs.
static ROOM_RE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)P\d\s*[-–—]?\s*Sala\s*\d+",
        r"(?i)LabCC\s*[-–—]?\s*P\d",
        r"(?i)LabRedes\s*[-–—]?\s*P\d",
        r"(?i)Sala\s*\d+",
        r"(?i)LabCC",
        r"(?i)LabRedes",
    ]
    .iter()
    .filter_map(|pat| Regex::new(pat).ok())
    .collect()
});

static DEFAULT_ROOM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(P\d\s*[-–—]?\s*Sala\s*\d+|Sala\s*\d+)")
        .expect("Failed to compile DEFAULT_ROOM_RE")
});

// --- Data Structures ---
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleMetadata {
    pub semester: Option<String>,
    pub class_label: Option<String>,
    pub room_info: Option<String>,
}

/// Parses weekly class schedules: one grid of weekday columns per page.
pub struct ScheduleParser {
    metadata_line_limit: usize,
}

impl Default for ScheduleParser {
    fn default() -> Self {
        Self::new(DEFAULT_METADATA_LINE_LIMIT)
    }
}

impl ScheduleParser {
    pub fn new(metadata_line_limit: usize) -> Self {
        Self { metadata_line_limit }
    }

    /// Builds the schedule record for one page, or `None` when the page has
    /// no usable table.
    pub fn parse(
        &self,
        source: &dyn TableSource,
        page: u32,
    ) -> Result<Option<ScheduleRecord>, ExtractError> {
        tracing::info!("Parsing schedule on page {}", page);

        let metadata = match source.page_text(page) {
            Ok(text) => self.extract_metadata(&text),
            Err(e) => {
                tracing::error!("Failed to read schedule metadata on page {}: {}", page, e);
                return Ok(None);
            }
        };
        tracing::debug!("Schedule metadata on page {}: {:?}", page, metadata);

        let tables = source.raw_tables(page)?;
        let Some(table) = tables.first() else {
            tracing::warn!("No table found on schedule page {}", page);
            return Ok(None);
        };
        if tables.len() > 1 {
            tracing::warn!(
                "Multiple tables ({}) found on schedule page {}; processing the first",
                tables.len(),
                page
            );
        }

        let Some(mut rows) = parse_schedule_grid(table) else {
            tracing::warn!("Could not structure the schedule table on page {}", page);
            return Ok(None);
        };

        if let Some(room) = default_room(metadata.room_info.as_deref()) {
            tracing::debug!("Default room for page {}: '{}'", page, room);
            apply_default_room(&mut rows, &room);
        }

        tracing::info!("Schedule on page {} parsed: {} rows", page, rows.len());
        Ok(Some(ScheduleRecord {
            page,
            semester: metadata.semester,
            class_label: metadata.class_label,
            room_info: metadata.room_info,
            rows,
        }))
    }

    /// Scans the leading lines of the page; each line fills at most one field
    /// and the first match per field wins.
    pub fn extract_metadata(&self, page_text: &str) -> ScheduleMetadata {
        let mut metadata = ScheduleMetadata::default();

        for line in page_text.lines().take(self.metadata_line_limit) {
            let line = line.trim();
            if metadata.semester.is_none() && SEMESTER_RE.is_match(line) {
                metadata.semester = Some(line.to_string());
            } else if let Some(caps) = CLASS_LABEL_RE
                .captures(line)
                .filter(|_| metadata.class_label.is_none())
            {
                metadata.class_label = Some(caps[1].trim().to_string());
            } else if let Some(caps) = ROOM_INFO_RE
                .captures(line)
                .filter(|_| metadata.room_info.is_none())
            {
                metadata.room_info = Some(caps[1].trim().to_string());
            }

            if metadata.semester.is_some()
                && metadata.class_label.is_some()
                && metadata.room_info.is_some()
            {
                break;
            }
        }

        metadata
    }
}

/// Header discovery, forward-fill and cell decomposition for one grid.
pub fn parse_schedule_grid(table: &RawTable) -> Option<Vec<ScheduleRow>> {
    let header_index = find_header_row(table)?;

    let labels: Vec<Option<String>> = (0..table.width())
        .map(|col| table.cleaned(header_index, col))
        .collect();
    let (day_cols, day_labels): (Vec<usize>, Vec<String>) = labels
        .iter()
        .enumerate()
        .filter_map(|(col, label)| {
            let label = label.as_ref()?;
            has(&label.to_lowercase(), kw::WEEKDAYS).then(|| (col, label.clone()))
        })
        .unzip();
    // A repeated weekday keeps its own column as `<day>_2`.
    let day_columns: Vec<(usize, String)> = day_cols.into_iter().zip(dedup_labels(day_labels)).collect();
    if day_columns.is_empty() {
        tracing::warn!("Schedule header row {} has no weekday columns", header_index);
        return None;
    }
    let time_column = day_columns.iter().all(|(col, _)| *col != 0).then_some(0);

    let data_rows: Vec<usize> = (header_index + 1..table.len()).collect();

    // Column-wise copy of the weekday cells so the grid itself stays untouched.
    let mut columns: Vec<Vec<Option<String>>> = day_columns
        .iter()
        .map(|(col, _)| data_rows.iter().map(|&row| table.cleaned(row, *col)).collect())
        .collect();
    for column in columns.iter_mut() {
        forward_fill(column);
    }

    let mut rows = Vec::new();
    for (position, &row) in data_rows.iter().enumerate() {
        if columns.iter().all(|column| column[position].is_none()) {
            continue;
        }

        let slots: IndexMap<String, Slot> = day_columns
            .iter()
            .zip(columns.iter())
            .map(|((_, label), column)| {
                let slot = column[position]
                    .as_deref()
                    .map(decompose_cell)
                    .unwrap_or_default();
                (label.clone(), slot)
            })
            .collect();

        if slots.values().all(Slot::is_empty) {
            continue;
        }

        rows.push(ScheduleRow {
            time: time_column.and_then(|col| table.cleaned(row, col)),
            slots,
        });
    }

    if rows.is_empty() {
        None
    } else {
        Some(rows)
    }
}

/// First row mentioning a weekday; otherwise row 0 when it looks like a
/// header (at least three filled cells).
fn find_header_row(table: &RawTable) -> Option<usize> {
    let by_keyword = (0..table.len()).find(|&row| {
        let text = table.row_values(row).join(" ").to_lowercase();
        has(&text, kw::WEEKDAYS)
    });
    if by_keyword.is_some() {
        return by_keyword;
    }

    tracing::warn!("No weekday header row found, trying the first row");
    if table.len() > 0 && table.row_values(0).len() >= MIN_FALLBACK_HEADER_CELLS {
        Some(0)
    } else {
        tracing::error!("First row does not look like a header either");
        None
    }
}

/// Splits a schedule cell into subject, professor (parenthesized) and a
/// trailing room token.
pub fn decompose_cell(cell_text: &str) -> Slot {
    let text = normalize_whitespace(cell_text);
    if text.is_empty() {
        return Slot::default();
    }

    let mut remainder = text.clone();
    let mut professor = None;
    if let Some(caps) = PROFESSOR_RE.captures(&text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            return Slot::default();
        };
        professor = clean_cell(Some(name.as_str()));
        remainder = normalize_whitespace(&format!(
            "{} {}",
            &text[..whole.start()],
            &text[whole.end()..]
        ));
    }

    let mut room = None;
    for pattern in ROOM_RE.iter() {
        let Some(found) = pattern.find_iter(&remainder).last() else {
            continue;
        };
        // Rooms are trailing tokens; a match followed by more than one
        // character is part of the subject.
        if remainder[found.end()..].chars().count() <= 1 {
            room = Some(normalize_whitespace(found.as_str()));
            remainder = remainder[..found.start()].trim().to_string();
            break;
        }
    }

    let subject = remainder.trim_matches(|c: char| c == ' ' || c == '-').to_string();
    if subject.is_empty() {
        return Slot::default();
    }

    Slot {
        subject: Some(subject),
        professor,
        room,
    }
}

/// The room every lesson without an explicit room takes place in, taken from
/// the page's room line.
pub fn default_room(room_info: Option<&str>) -> Option<String> {
    let room_info = room_info?;
    if let Some(found) = DEFAULT_ROOM_RE.find(room_info) {
        return Some(normalize_whitespace(found.as_str()));
    }

    let first = room_info.split(',').next().unwrap_or_default().trim();
    let lowered = first.to_lowercase();
    if first.chars().count() > 2 && !BOILERPLATE_ROOM_INFO.iter().any(|b| lowered.contains(b)) {
        Some(first.to_string())
    } else {
        None
    }
}

fn apply_default_room(rows: &mut [ScheduleRow], room: &str) {
    for slot in rows.iter_mut().flat_map(|row| row.slots.values_mut()) {
        if slot.subject.is_some() && slot.room.is_none() {
            slot.room = Some(room.to_string());
        }
    }
}
