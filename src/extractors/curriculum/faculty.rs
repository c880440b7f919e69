// src/extractors/curriculum/faculty.rs
use indexmap::IndexMap;

use crate::extractors::keywords::{self as kw, has_all};
use crate::records::{CurriculumSubRecord, FacultyEntry};
use crate::source::RawTable;
use crate::utils::text::{forward_fill, push_joined};

/// Column layout of a faculty roster, decided from the grid width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacultySchema {
    /// item, name, training, regime
    Full,
    /// name, training, regime; no item column
    NameOnly,
    Unrecognized,
}

/// Grid column of each field, `None` for a synthesized absent column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacultyColumns {
    pub item: Option<usize>,
    pub name: usize,
    pub training: usize,
    pub regime: usize,
}

impl FacultySchema {
    pub fn detect(width: usize) -> Self {
        match width {
            0..=2 => FacultySchema::Unrecognized,
            3 => FacultySchema::NameOnly,
            _ => FacultySchema::Full,
        }
    }

    pub fn columns(self) -> Option<FacultyColumns> {
        match self {
            FacultySchema::Full => Some(FacultyColumns { item: Some(0), name: 1, training: 2, regime: 3 }),
            FacultySchema::NameOnly => Some(FacultyColumns { item: None, name: 0, training: 1, regime: 2 }),
            FacultySchema::Unrecognized => None,
        }
    }
}

pub fn parse_faculty(table: &RawTable) -> Option<CurriculumSubRecord> {
    let schema = FacultySchema::detect(table.width());
    let Some(columns) = schema.columns() else {
        tracing::warn!("Faculty table with unexpected column count ({}), skipping", table.width());
        return None;
    };
    if schema == FacultySchema::NameOnly {
        tracing::warn!("Faculty table with 3 columns, assuming [name, training, regime]");
    }

    let data_start = (0..table.len())
        .find(|&row| {
            let text = table.row_values(row).join(" ").to_lowercase();
            has_all(&text, &[kw::PROFESSOR_NAME, kw::WORK_REGIME])
        })
        .map(|header| header + 1)
        .unwrap_or(0);

    let mut entries: Vec<FacultyEntry> = (data_start..table.len())
        .map(|row| FacultyEntry {
            item: columns.item.and_then(|col| table.cleaned(row, col)),
            name: table.cleaned(row, columns.name),
            training: table.cleaned(row, columns.training),
            regime: table.cleaned(row, columns.regime),
        })
        .filter(|entry| {
            entry.item.is_some()
                || entry.name.is_some()
                || entry.training.is_some()
                || entry.regime.is_some()
        })
        .collect();

    // Training lines of one professor continue below the row with the name.
    let mut items: Vec<Option<String>> = entries.iter().map(|e| e.item.clone()).collect();
    let mut names: Vec<Option<String>> = entries.iter().map(|e| e.name.clone()).collect();
    forward_fill(&mut items);
    forward_fill(&mut names);
    for ((entry, item), name) in entries.iter_mut().zip(items).zip(names) {
        entry.item = item;
        entry.name = name;
    }

    entries.retain(|entry| entry.training.is_some());

    let grouped = group_by_professor(entries);
    if grouped.is_empty() {
        return None;
    }
    Some(CurriculumSubRecord::Faculty { entries: grouped })
}

/// First item, all training fragments joined, last regime seen.
fn group_by_professor(entries: Vec<FacultyEntry>) -> Vec<FacultyEntry> {
    let mut groups: IndexMap<String, FacultyEntry> = IndexMap::new();

    for entry in entries {
        let Some(name) = entry.name.clone() else {
            continue;
        };
        let group = groups.entry(name.clone()).or_insert_with(|| FacultyEntry {
            name: Some(name),
            ..FacultyEntry::default()
        });

        group.item = group.item.take().or(entry.item);
        if let Some(training) = entry.training.as_deref() {
            push_joined(&mut group.training, training);
        }
        if entry.regime.is_some() {
            group.regime = entry.regime;
        }
    }

    groups.into_values().collect()
}
