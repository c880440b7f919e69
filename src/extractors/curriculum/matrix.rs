// src/extractors/curriculum/matrix.rs
use crate::extractors::keywords::{self as kw, has};
use crate::records::{CurriculumSubRecord, DisciplineRow};
use crate::source::RawTable;

/// discipline, 2 weekly-load figures, weekly total, 2 semester-load figures,
/// prerequisites.
pub const MATRIX_COLUMNS: usize = 7;

/// The header row is followed by one sub-header/separator row.
pub const HEADER_TO_DATA_OFFSET: usize = 2;

/// First row whose leading cell names the discipline column.
pub fn find_discipline_header(table: &RawTable) -> Option<usize> {
    (0..table.len()).find(|&row| {
        table
            .cleaned(row, 0)
            .map(|cell| has(&cell.to_lowercase(), kw::DISCIPLINE))
            .unwrap_or(false)
    })
}

/// Maps the first seven columns of a grid row; missing trailing columns stay
/// absent.
pub fn project_row(table: &RawTable, row: usize) -> DisciplineRow {
    let cell = |col: usize| {
        if col < MATRIX_COLUMNS {
            table.cleaned(row, col)
        } else {
            None
        }
    };
    DisciplineRow {
        discipline: cell(0),
        weekly_theory_hours: cell(1),
        weekly_practice_hours: cell(2),
        weekly_total_hours: cell(3),
        semester_class_hours: cell(4),
        semester_hours: cell(5),
        prerequisites: cell(6),
    }
}

/// One period of the curriculum matrix.
pub fn parse_matrix(table: &RawTable) -> Option<CurriculumSubRecord> {
    let Some(header_index) = find_discipline_header(table) else {
        tracing::warn!("Matrix table has no discipline header row");
        return None;
    };

    // The period label sits above the header; body rows are discipline names.
    let period = (0..header_index)
        .filter_map(|row| table.cleaned(row, 0))
        .find(|cell| has(&cell.to_lowercase(), kw::PERIOD));

    let data_start = header_index + HEADER_TO_DATA_OFFSET;
    if data_start >= table.len() {
        tracing::warn!("Matrix header found but no data rows for {:?}", period);
        return None;
    }

    let disciplines: Vec<DisciplineRow> = (data_start..table.len())
        .map(|row| project_row(table, row))
        .filter(|row| {
            !row.discipline
                .as_deref()
                .map(|d| has(&d.to_lowercase(), kw::TOTAL))
                .unwrap_or(false)
        })
        .filter(|row| !row.is_empty())
        .collect();

    if disciplines.is_empty() {
        return None;
    }

    Some(CurriculumSubRecord::Matrix {
        period,
        disciplines,
    })
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
    fn test_parse_matrix_period() {
        let table = grid(&[
            &["1º PERÍODO", "", "", "", "", "", ""],
            &["DISCIPLINA", "CH Semanal", "", "", "CH Semestral", "", "Pré- requisitos"],
            &["", "T", "P", "Total", "h/a", "h", ""],
            &["Cálculo I", "4", "0", "4", "80", "66,7", "-"],
            &["", "", "", "", "", "", ""],
            &["Programação\nI", "2", "2", "4", "80", "66,7", ""],
            &["TOTAL", "6", "2", "8", "160", "133,4", ""],
            &["Subtotal geral", "", "", "", "", "", ""],
        ]);

        let Some(CurriculumSubRecord::Matrix { period, disciplines }) = parse_matrix(&table) else {
            panic!("expected a matrix record");
        };
        assert_eq!(period.as_deref(), Some("1º PERÍODO"));
        assert_eq!(disciplines.len(), 2);
        assert_eq!(disciplines[0].discipline.as_deref(), Some("Cálculo I"));
        assert_eq!(disciplines[0].semester_hours.as_deref(), Some("66,7"));
        assert_eq!(disciplines[1].discipline.as_deref(), Some("Programação I"));
        assert_eq!(disciplines[1].prerequisites, None);
    }

    #[test]
    fn test_total_rows_dropped_case_insensitive() {
        let table = grid(&[
            &["Discipline", "x"],
            &["", ""],
            &["Total hours", "999"],
            &["Algorithms", "4"],
        ]);
        let Some(CurriculumSubRecord::Matrix { disciplines, .. }) = parse_matrix(&table) else {
            panic!("expected a matrix record");
        };
        assert_eq!(disciplines.len(), 1);
        assert_eq!(disciplines[0].discipline.as_deref(), Some("Algorithms"));
        assert_eq!(disciplines[0].weekly_theory_hours.as_deref(), Some("4"));
        assert_eq!(disciplines[0].prerequisites, None, "missing columns padded");
    }

    #[test]
    fn test_matrix_without_header_fails() {
        let table = grid(&[&["1º PERÍODO"], &["Cálculo"]]);
        assert!(parse_matrix(&table).is_none());

        let header_only = grid(&[&["DISCIPLINA"], &["T"]]);
        assert!(parse_matrix(&header_only).is_none());
    }

    #[test]
    fn test_period_is_not_taken_from_discipline_rows() {
        let table = grid(&[
            &["DISCIPLINA", "CH Semanal", "", "", "CH Semestral", "", "Pré- requisitos"],
            &["", "T", "P", "Total", "h/a", "h", ""],
            &["Periodic Signals", "4", "0", "4", "80", "66,7", "-"],
        ]);
        let Some(CurriculumSubRecord::Matrix { period, disciplines }) = parse_matrix(&table) else {
            panic!("expected a matrix record");
        };
        assert_eq!(period, None);
        assert_eq!(disciplines[0].discipline.as_deref(), Some("Periodic Signals"));
    }
}
