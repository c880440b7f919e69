// src/extractors/curriculum/mod.rs
//! Pedagogical-project pages: every table on the page is routed on its own
//! text to one of the sub-parsers.

pub mod elective;
pub mod faculty;
pub mod matrix;
pub mod syllabus;

use std::ops::RangeInclusive;

use crate::extractors::keywords::{self as kw, has, has_all};
use crate::records::{CurriculumPageRecord, CurriculumSubRecord};
use crate::source::{RawTable, TableSource};

/// Pages whose elective tables are not tagged as such.
const ELECTIVE_OVERRIDE_PAGES: RangeInclusive<u32> = 25..=28;
/// Faculty pages whose roster continues without a header.
const FACULTY_OVERRIDE_PAGES: &[u32] = &[97, 98];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurriculumTableKind {
    Syllabus,
    Matrix,
    Elective,
    Faculty,
    /// Recognized but not parsed yet.
    Equivalence,
    Unknown,
}

impl CurriculumTableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CurriculumTableKind::Syllabus => "syllabus",
            CurriculumTableKind::Matrix => "matrix",
            CurriculumTableKind::Elective => "elective",
            CurriculumTableKind::Faculty => "faculty",
            CurriculumTableKind::Equivalence => "equivalence",
            CurriculumTableKind::Unknown => "unknown",
        }
    }
}

/// Routing rule over a table's lower-cased text and its page number.
type TableRule = fn(&str, u32) -> Option<CurriculumTableKind>;

fn syllabus_rule(text: &str, _page: u32) -> Option<CurriculumTableKind> {
    has_all(text, &[kw::DISCIPLINE_LABEL, kw::SYLLABUS_LABEL, kw::BASIC_BIBLIOGRAPHY])
        .then_some(CurriculumTableKind::Syllabus)
}

fn matrix_rule(text: &str, _page: u32) -> Option<CurriculumTableKind> {
    if !has_all(text, &[kw::DISCIPLINE, kw::WEEKLY_WORKLOAD, kw::PREREQUISITES]) {
        return None;
    }
    if has(text, kw::ELECTIVE_DISCIPLINES) {
        Some(CurriculumTableKind::Elective)
    } else {
        Some(CurriculumTableKind::Matrix)
    }
}

fn elective_page_rule(text: &str, page: u32) -> Option<CurriculumTableKind> {
    (ELECTIVE_OVERRIDE_PAGES.contains(&page)
        && (has(text, kw::SPECIAL_TOPICS) || has(text, kw::GEOMETRIC_ALGORITHMS)))
    .then_some(CurriculumTableKind::Elective)
}

fn faculty_rule(text: &str, page: u32) -> Option<CurriculumTableKind> {
    (has(text, kw::PROFESSOR_NAME)
        || has_all(text, &[kw::TRAINING, kw::WORK_REGIME])
        || (FACULTY_OVERRIDE_PAGES.contains(&page) && has(text, kw::MASTERS_DEGREE_IN)))
    .then_some(CurriculumTableKind::Faculty)
}

fn equivalence_rule(text: &str, _page: u32) -> Option<CurriculumTableKind> {
    has_all(text, &[kw::CURRICULAR_COMPONENTS, kw::MATRIX_2015])
        .then_some(CurriculumTableKind::Equivalence)
}

/// Evaluated in order, first match wins.
pub static TABLE_RULES: &[TableRule] = &[
    syllabus_rule,
    matrix_rule,
    elective_page_rule,
    faculty_rule,
    equivalence_rule,
];

pub fn classify_table(table_text: &str, page: u32) -> CurriculumTableKind {
    TABLE_RULES
        .iter()
        .find_map(|rule| rule(table_text, page))
        .unwrap_or(CurriculumTableKind::Unknown)
}

fn parse_table(kind: CurriculumTableKind, table: &RawTable) -> Option<CurriculumSubRecord> {
    match kind {
        CurriculumTableKind::Syllabus => syllabus::parse_syllabus(table),
        CurriculumTableKind::Matrix => matrix::parse_matrix(table),
        CurriculumTableKind::Elective => elective::parse_elective(table),
        CurriculumTableKind::Faculty => faculty::parse_faculty(table),
        CurriculumTableKind::Equivalence => None,
        CurriculumTableKind::Unknown => Some(CurriculumSubRecord::Unknown { raw: table.clone() }),
    }
}

/// Never fails: source errors and sub-parser failures end up in the summary.
pub fn parse_curriculum_page(source: &dyn TableSource, page: u32) -> CurriculumPageRecord {
    let tables = match source.raw_tables(page) {
        Ok(tables) => tables,
        Err(e) => {
            tracing::error!("Could not read tables of curriculum page {}: {}", page, e);
            return CurriculumPageRecord {
                page,
                sub_records: Vec::new(),
                raw_tables: Vec::new(),
                summary: format!("Table source failed: {}", e),
            };
        }
    };

    if tables.is_empty() {
        return CurriculumPageRecord {
            page,
            sub_records: Vec::new(),
            raw_tables: Vec::new(),
            summary: "No tables found on this page.".to_string(),
        };
    }

    let mut sub_records = Vec::new();
    let mut outcomes = Vec::new();

    for (index, table) in tables.iter().enumerate() {
        let kind = classify_table(&table.flattened_text(), page);
        tracing::info!(
            "Table {}/{} on page {} identified as '{}'",
            index + 1,
            tables.len(),
            page,
            kind.as_str()
        );

        match parse_table(kind, table) {
            Some(record) => {
                outcomes.push(format!("{} (parsed)", kind.as_str()));
                sub_records.push(record);
            }
            None => {
                tracing::warn!(
                    "Table {} on page {} detected as '{}' but its parser returned nothing",
                    index + 1,
                    page,
                    kind.as_str()
                );
                outcomes.push(format!("{} (failed)", kind.as_str()));
            }
        }
    }

    CurriculumPageRecord {
        page,
        sub_records,
        raw_tables: tables.clone(),
        summary: format!(
            "Processed {} table(s). Detected: {}",
            tables.len(),
            outcomes.join(", ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::models::PageDump;
    use crate::source::JsonDocument;
    use rstest::rstest;

    #[rstest]
    #[case("disciplina: x\nementa: y\nbibliografia básica: z", 40, CurriculumTableKind::Syllabus)]
    #[case("disciplina ch semanal pré- requisitos", 20, CurriculumTableKind::Matrix)]
    #[case("disciplinas optativas\ndisciplina ch semanal pré – requisitos", 20, CurriculumTableKind::Elective)]
    #[case("tópicos especiais em ia 4", 26, CurriculumTableKind::Elective)]
    #[case("tópicos especiais em ia 4", 30, CurriculumTableKind::Unknown)]
    #[case("item nome do professor formação", 90, CurriculumTableKind::Faculty)]
    #[case("training work regime", 90, CurriculumTableKind::Faculty)]
    #[case("1 ana mestrado em computação 40h", 97, CurriculumTableKind::Faculty)]
    #[case("1 ana mestrado em computação 40h", 96, CurriculumTableKind::Unknown)]
    #[case("componentes curriculares matriz 2015", 110, CurriculumTableKind::Equivalence)]
    #[case("some prose box", 10, CurriculumTableKind::Unknown)]
    fn test_classify_table(#[case] text: &str, #[case] page: u32, #[case] expected: CurriculumTableKind) {
        assert_eq!(classify_table(text, page), expected);
    }

    #[test]
    fn test_syllabus_rule_beats_faculty_rule() {
        let text = "disciplina: x ementa: y bibliografia básica: nome do professor";
        assert_eq!(classify_table(text, 97), CurriculumTableKind::Syllabus);
    }

    fn cells(rows: &[&[&str]]) -> Vec<Vec<Option<String>>> {
        rows.iter()
            .map(|r| {
                r.iter()
                    .map(|c| if c.is_empty() { None } else { Some(c.to_string()) })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_page_with_mixed_tables() {
        let document = JsonDocument::from_pages(vec![PageDump {
            text: "Projeto Pedagógico".to_string(),
            tables: vec![
                cells(&[
                    &["Disciplina:", "Compiladores", "80h", "4"],
                    &["Ementa:", "Análise léxica."],
                    &["Bibliografia Básica:", "AHO."],
                ]),
                cells(&[&["Componentes curriculares", "Matriz 2015"], &["A", "B"]]),
                cells(&[&["Observação geral"]]),
            ],
        }]);

        let record = parse_curriculum_page(&document, 1);
        assert_eq!(record.page, 1);
        assert_eq!(record.raw_tables.len(), 3);
        assert_eq!(record.sub_records.len(), 2);
        assert!(matches!(record.sub_records[0], CurriculumSubRecord::Syllabus { .. }));
        assert!(matches!(record.sub_records[1], CurriculumSubRecord::Unknown { .. }));
        assert_eq!(
            record.summary,
            "Processed 3 table(s). Detected: syllabus (parsed), equivalence (failed), unknown (parsed)"
        );
    }

    #[test]
    fn test_page_without_tables_or_source() {
        let document = JsonDocument::from_pages(vec![PageDump::default()]);
        let record = parse_curriculum_page(&document, 1);
        assert!(record.sub_records.is_empty());
        assert_eq!(record.summary, "No tables found on this page.");

        let record = parse_curriculum_page(&document, 9);
        assert!(record.sub_records.is_empty());
        assert!(record.summary.starts_with("Table source failed"));
    }
}
