// src/records.rs
//! Structured records produced by the category parsers. Every record carries
//! the 1-based page it was extracted from.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::source::RawTable;

/// One lesson slot of a weekly schedule. All fields absent means the slot is
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub subject: Option<String>,
    pub professor: Option<String>,
    pub room: Option<String>,
}

impl Slot {
    pub fn is_empty(&self) -> bool {
        self.subject.is_none()
    }
}

/// One time band of a schedule: the leading time column plus one slot per
/// weekday column, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub time: Option<String>,
    #[serde(flatten)]
    pub slots: IndexMap<String, Slot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub page: u32,
    pub semester: Option<String>,
    pub class_label: Option<String>,
    pub room_info: Option<String>,
    pub rows: Vec<ScheduleRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarRecord {
    pub page: u32,
    pub title: String,
    /// One map per week, keyed by the deduplicated day label.
    pub rows: Vec<IndexMap<String, String>>,
    pub legend: Option<String>,
    pub summary: String,
    /// Set when the table could not be structured; `summary` repeats it.
    pub error: Option<String>,
}

/// One discipline line of a curriculum matrix or elective list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisciplineRow {
    pub discipline: Option<String>,
    pub weekly_theory_hours: Option<String>,
    pub weekly_practice_hours: Option<String>,
    pub weekly_total_hours: Option<String>,
    pub semester_class_hours: Option<String>,
    pub semester_hours: Option<String>,
    pub prerequisites: Option<String>,
}

impl DisciplineRow {
    pub fn is_empty(&self) -> bool {
        self.discipline.is_none()
            && self.weekly_theory_hours.is_none()
            && self.weekly_practice_hours.is_none()
            && self.weekly_total_hours.is_none()
            && self.semester_class_hours.is_none()
            && self.semester_hours.is_none()
            && self.prerequisites.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyEntry {
    pub item: Option<String>,
    pub name: Option<String>,
    pub training: Option<String>,
    pub regime: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CurriculumSubRecord {
    Matrix {
        period: Option<String>,
        disciplines: Vec<DisciplineRow>,
    },
    Elective {
        disciplines: Vec<DisciplineRow>,
    },
    Faculty {
        entries: Vec<FacultyEntry>,
    },
    Syllabus {
        fields: IndexMap<String, String>,
    },
    Unknown {
        raw: RawTable,
    },
}

impl CurriculumSubRecord {
    pub fn subtype(&self) -> &'static str {
        match self {
            CurriculumSubRecord::Matrix { .. } => "curriculum_matrix",
            CurriculumSubRecord::Elective { .. } => "curriculum_elective",
            CurriculumSubRecord::Faculty { .. } => "curriculum_faculty",
            CurriculumSubRecord::Syllabus { .. } => "curriculum_syllabus",
            CurriculumSubRecord::Unknown { .. } => "curriculum_unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurriculumPageRecord {
    pub page: u32,
    pub sub_records: Vec<CurriculumSubRecord>,
    pub raw_tables: Vec<RawTable>,
    pub summary: String,
}

/// Reserved for statute change-history pages; no parser produces it yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryLogRecord {
    pub page: u32,
    pub rows: Vec<IndexMap<String, String>>,
}

/// Raw grid kept for pages no specialized parser claimed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericTableRecord {
    pub page: u32,
    pub raw: RawTable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum ParsedRecord {
    Schedule(ScheduleRecord),
    Calendar(CalendarRecord),
    Curriculum(CurriculumPageRecord),
    HistoryLog(HistoryLogRecord),
    Generic(GenericTableRecord),
}

impl ParsedRecord {
    pub fn page(&self) -> u32 {
        match self {
            ParsedRecord::Schedule(r) => r.page,
            ParsedRecord::Calendar(r) => r.page,
            ParsedRecord::Curriculum(r) => r.page,
            ParsedRecord::HistoryLog(r) => r.page,
            ParsedRecord::Generic(r) => r.page,
        }
    }
}
