// src/source/models.rs
use serde::{Deserialize, Serialize};

use crate::utils::text::clean_cell;

/// One table grid as detected on a page. No header is implied; parsers
/// discover headers themselves and never write back into the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawTable {
    rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Builds a grid, padding short rows with absent cells so every row has
    /// the same length.
    pub fn new(mut rows: Vec<Vec<Option<String>>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in rows.iter_mut() {
            row.resize(width, None);
        }
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    /// True when the grid has no rows or every cell is blank.
    pub fn is_empty(&self) -> bool {
        self.rows
            .iter()
            .all(|row| row.iter().all(|cell| clean_cell(cell.as_deref()).is_none()))
    }

    /// Raw cell text, `None` when out of bounds or absent.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col)?.as_deref()
    }

    /// Whitespace-normalized cell text, `None` when blank.
    pub fn cleaned(&self, row: usize, col: usize) -> Option<String> {
        clean_cell(self.cell(row, col))
    }

    /// Non-blank cells of one row, cleaned, left to right.
    pub fn row_values(&self, row: usize) -> Vec<String> {
        (0..self.width()).filter_map(|col| self.cleaned(row, col)).collect()
    }

    /// Lower-cased text of the whole grid, one line per row, used for
    /// keyword routing.
    pub fn flattened_text(&self) -> String {
        (0..self.len())
            .map(|row| self.row_values(row).join(" "))
            .collect::<Vec<_>>()
            .join("\n")
            .to_lowercase()
    }
}

/// One page of a JSON page dump.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageDump {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub tables: Vec<Vec<Vec<Option<String>>>>,
}

/// Top-level JSON page dump: `{"pages": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentDump {
    pub pages: Vec<PageDump>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[Option<&str>]]) -> RawTable {
        RawTable::new(
            rows.iter()
                .map(|r| r.iter().map(|c| c.map(str::to_string)).collect())
                .collect(),
        )
    }

    #[test]
    fn test_rows_are_padded() {
        let table = grid(&[&[Some("a"), Some("b"), Some("c")], &[Some("d")]]);
        assert_eq!(table.width(), 3);
        assert_eq!(table.rows()[1].len(), 3);
        assert_eq!(table.cell(1, 2), None);
    }

    #[test]
    fn test_flattened_text_is_lowercase_and_skips_blanks() {
        let table = grid(&[&[Some("DISCIPLINA"), Some("  "), Some("CH Semanal")], &[None, Some("Pré- requisitos"), None]]);
        assert_eq!(table.flattened_text(), "disciplina ch semanal\npré- requisitos");
    }

    #[test]
    fn test_blank_grid_is_empty() {
        assert!(grid(&[&[Some(" "), None]]).is_empty());
        assert!(!grid(&[&[Some("x"), None]]).is_empty());
    }
}
