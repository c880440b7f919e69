// src/extractors/curriculum/syllabus.rs
use indexmap::IndexMap;

use crate::records::CurriculumSubRecord;
use crate::source::RawTable;
use crate::utils::text::normalize_whitespace;

/// Keys of row 0, columns 1 to 3.
const FIRST_ROW_KEYS: [&str; 3] = ["discipline", "workload", "weekly_classes"];

/// A syllabus is only kept when its body was found under one of these keys.
const BODY_KEYS: &[&str] = &["ementa", "syllabus"];

/// `" Bibliografia Básica:"` becomes `"bibliografia_básica"`.
pub fn normalize_key(raw: &str) -> String {
    raw.trim()
        .trim_end_matches(':')
        .trim()
        .to_lowercase()
        .replace(' ', "_")
}

/// Key/value sheet of one discipline. Rows with an empty key continue the
/// previous key's value.
pub fn parse_syllabus(table: &RawTable) -> Option<CurriculumSubRecord> {
    if table.len() == 0 || table.width() < 2 {
        return None;
    }

    let mut fields: IndexMap<String, String> = IndexMap::new();
    for (offset, key) in FIRST_ROW_KEYS.iter().enumerate() {
        let col = offset + 1;
        if col >= table.width() {
            break;
        }
        fields.insert(key.to_string(), table.cleaned(0, col).unwrap_or_default());
    }

    let mut current_key: Option<String> = None;
    for row in 1..table.len() {
        let key_cell = table.cleaned(row, 0);
        let value_cell = table.cleaned(row, 1);

        match (key_cell, value_cell) {
            (Some(key), value) => {
                let key = normalize_key(&key);
                if key.is_empty() {
                    continue;
                }
                fields.insert(key.clone(), value.unwrap_or_default());
                current_key = Some(key);
            }
            (None, Some(value)) => {
                let Some(key) = current_key.as_ref() else {
                    continue;
                };
                let entry = fields.entry(key.clone()).or_default();
                if !entry.is_empty() {
                    entry.push(' ');
                }
                entry.push_str(&value);
            }
            (None, None) => {}
        }
    }

    for value in fields.values_mut() {
        *value = normalize_whitespace(value);
    }

    let has_body = BODY_KEYS
        .iter()
        .any(|key| fields.get(*key).map(|v| !v.is_empty()).unwrap_or(false));
    if !has_body {
        tracing::debug!("Syllabus table without a body field, discarding");
        return None;
    }

    Some(CurriculumSubRecord::Syllabus { fields })
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
    fn test_normalize_key() {
        assert_eq!(normalize_key(" Bibliografia Básica: "), "bibliografia_básica");
        assert_eq!(normalize_key("Ementa:"), "ementa");
    }

    #[test]
    fn test_wrapped_lines_append_to_previous_key() {
        let table = grid(&[
            &["Disciplina:", "Compiladores", "80h", "4"],
            &["Ementa:", "Análise léxica."],
            &["", "Análise sintática."],
            &["Bibliografia Básica:", ""],
            &["", "AHO, A. Compilers."],
        ]);

        let Some(CurriculumSubRecord::Syllabus { fields }) = parse_syllabus(&table) else {
            panic!("expected a syllabus record");
        };
        assert_eq!(fields["discipline"], "Compiladores");
        assert_eq!(fields["workload"], "80h");
        assert_eq!(fields["weekly_classes"], "4");
        assert_eq!(fields["ementa"], "Análise léxica. Análise sintática.");
        assert_eq!(fields["bibliografia_básica"], "AHO, A. Compilers.");
        let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["discipline", "workload", "weekly_classes", "ementa", "bibliografia_básica"]);
    }

    #[test]
    fn test_three_column_first_row() {
        let table = grid(&[
            &["Discipline:", "Compilers", "80h"],
            &["Syllabus:", "Lexing."],
        ]);
        let Some(CurriculumSubRecord::Syllabus { fields }) = parse_syllabus(&table) else {
            panic!("expected a syllabus record");
        };
        assert!(!fields.contains_key("weekly_classes"));
        assert_eq!(fields["syllabus"], "Lexing.");
    }

    #[test]
    fn test_missing_body_is_rejected() {
        let table = grid(&[&["Disciplina:", "X", "1", "2"], &["Ementa:", ""]]);
        assert!(parse_syllabus(&table).is_none());
    }
}
