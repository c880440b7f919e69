// src/extractors/curriculum/elective.rs
use indexmap::IndexMap;

use crate::extractors::curriculum::matrix::{find_discipline_header, project_row, HEADER_TO_DATA_OFFSET};
use crate::records::{CurriculumSubRecord, DisciplineRow};
use crate::source::RawTable;
use crate::utils::text::{forward_fill, push_joined};

/// Elective list: one logical discipline may span several physical rows.
/// Continuation pages have no header and start at row 0.
pub fn parse_elective(table: &RawTable) -> Option<CurriculumSubRecord> {
    let data_start = match find_discipline_header(table) {
        Some(header) => header + HEADER_TO_DATA_OFFSET,
        None => {
            tracing::debug!("Elective table without header, treating it as a continuation");
            0
        }
    };
    if data_start >= table.len() {
        tracing::warn!("Elective table has no data rows after row {}", data_start);
        return None;
    }

    let mut rows: Vec<DisciplineRow> = (data_start..table.len())
        .map(|row| project_row(table, row))
        .collect();

    let mut names: Vec<Option<String>> = rows.iter().map(|r| r.discipline.clone()).collect();
    forward_fill(&mut names);
    for (row, name) in rows.iter_mut().zip(names) {
        row.discipline = name;
    }

    rows.retain(|row| !row.is_empty() && row.weekly_total_hours.is_some());

    let disciplines = group_by_discipline(rows);
    if disciplines.is_empty() {
        return None;
    }
    Some(CurriculumSubRecord::Elective { disciplines })
}

/// First non-empty value per numeric column; distinct prerequisite texts
/// joined with spaces. Groups keep first-appearance order.
fn group_by_discipline(rows: Vec<DisciplineRow>) -> Vec<DisciplineRow> {
    let mut groups: IndexMap<String, DisciplineRow> = IndexMap::new();
    let mut seen_prerequisites: IndexMap<String, Vec<String>> = IndexMap::new();

    for row in rows {
        let Some(name) = row.discipline.clone() else {
            continue;
        };
        let group = groups.entry(name.clone()).or_insert_with(|| DisciplineRow {
            discipline: Some(name.clone()),
            ..DisciplineRow::default()
        });

        group.weekly_theory_hours = group.weekly_theory_hours.take().or(row.weekly_theory_hours);
        group.weekly_practice_hours = group.weekly_practice_hours.take().or(row.weekly_practice_hours);
        group.weekly_total_hours = group.weekly_total_hours.take().or(row.weekly_total_hours);
        group.semester_class_hours = group.semester_class_hours.take().or(row.semester_class_hours);
        group.semester_hours = group.semester_hours.take().or(row.semester_hours);

        if let Some(prerequisite) = row.prerequisites {
            let seen = seen_prerequisites.entry(name).or_default();
            if !seen.contains(&prerequisite) {
                push_joined(&mut group.prerequisites, &prerequisite);
                seen.push(prerequisite);
            }
        }
    }

    groups.into_values().collect()
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

    #[test]
    fn test_rows_of_one_discipline_are_merged() {
        let table = grid(&[
            &["DISCIPLINAS OPTATIVAS", "", "", "", "", "", ""],
            &["DISCIPLINA", "CH Semanal", "", "", "", "", "Pré- requisitos"],
            &["", "T", "P", "Total", "h/a", "h", ""],
            &["Compilers", "4", "0", "4", "80", "66,7", "Calc 1"],
            &["", "", "", "4", "", "", "Calc 2"],
            &["", "", "", "4", "", "", "Calc 1"],
            &["Graphs", "2", "2", "4", "80", "66,7", ""],
            &["", "", "", "", "", "", "orphan note"],
        ]);

        let Some(CurriculumSubRecord::Elective { disciplines }) = parse_elective(&table) else {
            panic!("expected an elective record");
        };
        assert_eq!(disciplines.len(), 2);
        assert_eq!(disciplines[0].discipline.as_deref(), Some("Compilers"));
        assert_eq!(disciplines[0].prerequisites.as_deref(), Some("Calc 1 Calc 2"));
        assert_eq!(disciplines[0].weekly_theory_hours.as_deref(), Some("4"));
        assert_eq!(disciplines[0].semester_hours.as_deref(), Some("66,7"));
        assert_eq!(disciplines[1].discipline.as_deref(), Some("Graphs"));
        assert_eq!(disciplines[1].prerequisites, None, "row without weekly total is dropped");
    }

    #[test]
    fn test_same_name_rows_group() {
        let table = grid(&[
            &["Compilers", "4", "0", "4", "", "", "Calc 1"],
            &["Compilers", "", "", "4", "80", "", "Calc 2"],
        ]);
        let Some(CurriculumSubRecord::Elective { disciplines }) = parse_elective(&table) else {
            panic!("expected an elective record");
        };
        assert_eq!(disciplines.len(), 1);
        assert_eq!(disciplines[0].prerequisites.as_deref(), Some("Calc 1 Calc 2"));
        assert_eq!(disciplines[0].semester_class_hours.as_deref(), Some("80"));
    }

    #[test]
    fn test_no_weekly_totals_fails() {
        let table = grid(&[&["Special Topics", "", "", ""], &["", "", "", ""]]);
        assert!(parse_elective(&table).is_none());
    }
}
