// src/integration/normalize.rs
//! Fixed projection of parsed records onto table blocks.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::integration::document::{TableBlock, TABLE_TYPE};
use crate::records::{
    CalendarRecord, CurriculumPageRecord, CurriculumSubRecord, GenericTableRecord,
    HistoryLogRecord, ScheduleRecord,
};
use crate::source::RawTable;
use crate::utils::error::IntegrationError;

fn block(
    subtype: &str,
    title: String,
    rows: Vec<Map<String, Value>>,
    semantic_summary: Option<String>,
    legend: Option<String>,
    source_page: u32,
) -> TableBlock {
    // Rows of one record share their keys.
    let header_labels = rows
        .first()
        .map(|row| row.keys().cloned().collect())
        .unwrap_or_default();
    TableBlock {
        kind: TABLE_TYPE.to_string(),
        recognized_subtype: subtype.to_string(),
        title,
        header_labels,
        rows,
        semantic_summary,
        legend,
        source_page,
    }
}

fn object_rows<T: Serialize>(rows: &[T], subtype: &str) -> Result<Vec<Map<String, Value>>, IntegrationError> {
    rows.iter()
        .map(|row| match serde_json::to_value(row)? {
            Value::Object(map) => Ok(map),
            _ => Err(IntegrationError::RowShape {
                subtype: subtype.to_string(),
            }),
        })
        .collect()
}

fn raw_rows(raw: &RawTable) -> Vec<Map<String, Value>> {
    raw.rows()
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(col, cell)| {
                    let value = cell.clone().map(Value::String).unwrap_or(Value::Null);
                    (format!("column_{}", col), value)
                })
                .collect()
        })
        .collect()
}

fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or("N/A")
}

pub fn schedule_block(record: &ScheduleRecord) -> Result<TableBlock, IntegrationError> {
    let rows = object_rows(&record.rows, "schedule")?;
    let summary = format!(
        "Schedule for semester {}. Class: {}. Rooms: {}.",
        or_na(record.semester.as_deref()),
        or_na(record.class_label.as_deref()),
        or_na(record.room_info.as_deref()),
    );
    Ok(block(
        "schedule",
        format!("Schedule: {}", or_na(record.class_label.as_deref())),
        rows,
        Some(summary),
        record.room_info.clone(),
        record.page,
    ))
}

pub fn calendar_block(record: &CalendarRecord) -> Result<TableBlock, IntegrationError> {
    let rows = object_rows(&record.rows, "calendar")?;
    let title = if record.title.is_empty() {
        "Academic Calendar".to_string()
    } else {
        record.title.clone()
    };
    Ok(block(
        "calendar",
        title,
        rows,
        Some(record.summary.clone()),
        record.legend.clone(),
        record.page,
    ))
}

/// One block per sub-record, in sub-record order.
pub fn curriculum_blocks(record: &CurriculumPageRecord) -> Result<Vec<TableBlock>, IntegrationError> {
    record
        .sub_records
        .iter()
        .map(|sub| curriculum_sub_block(sub, record.page))
        .collect()
}

fn curriculum_sub_block(sub: &CurriculumSubRecord, page: u32) -> Result<TableBlock, IntegrationError> {
    let subtype = sub.subtype();
    let table = match sub {
        CurriculumSubRecord::Matrix { period, disciplines } => {
            let period = period.as_deref().unwrap_or("Disciplines");
            block(
                subtype,
                format!("Curriculum Matrix: {}", period),
                object_rows(disciplines, subtype)?,
                Some(format!("List of disciplines for {}.", period)),
                None,
                page,
            )
        }
        CurriculumSubRecord::Elective { disciplines } => block(
            subtype,
            "Elective Disciplines".to_string(),
            object_rows(disciplines, subtype)?,
            Some("List of elective disciplines with workload and prerequisites.".to_string()),
            None,
            page,
        ),
        CurriculumSubRecord::Faculty { entries } => block(
            subtype,
            "Faculty".to_string(),
            object_rows(entries, subtype)?,
            Some("List of faculty members, training and work regime.".to_string()),
            None,
            page,
        ),
        CurriculumSubRecord::Syllabus { fields } => {
            let discipline = fields.get("discipline").map(String::as_str).unwrap_or("N/A");
            block(
                subtype,
                format!("Syllabus: {}", discipline),
                object_rows(std::slice::from_ref(fields), subtype)?,
                Some(format!("Syllabus of the discipline {}.", discipline)),
                None,
                page,
            )
        }
        CurriculumSubRecord::Unknown { raw } => block(
            subtype,
            "Pedagogical Project Data".to_string(),
            raw_rows(raw),
            None,
            None,
            page,
        ),
    };
    Ok(table)
}

pub fn history_log_block(record: &HistoryLogRecord) -> Result<TableBlock, IntegrationError> {
    Ok(block(
        "history_log",
        "Change History".to_string(),
        object_rows(&record.rows, "history_log")?,
        None,
        None,
        record.page,
    ))
}

pub fn generic_block(record: &GenericTableRecord) -> Result<TableBlock, IntegrationError> {
    Ok(block(
        "generic",
        "Table".to_string(),
        raw_rows(&record.raw),
        None,
        None,
        record.page,
    ))
}
