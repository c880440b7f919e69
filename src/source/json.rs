// src/source/json.rs
use std::fs;
use std::path::Path;

use crate::source::models::{DocumentDump, PageDump, RawTable};
use crate::source::{check_page, TableSource};
use crate::utils::error::SourceError;

/// Page dump produced by an upstream PDF decoder and lattice table detector.
#[derive(Debug, Clone, Default)]
pub struct JsonDocument {
    pages: Vec<PageDump>,
}

impl JsonDocument {
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let content = fs::read_to_string(path)?;
        let document = Self::from_json(&content)?;
        tracing::info!("Loaded page dump {} ({} pages)", path.display(), document.pages.len());
        Ok(document)
    }

    pub fn from_json(content: &str) -> Result<Self, SourceError> {
        let dump: DocumentDump = serde_json::from_str(content)?;
        Ok(Self { pages: dump.pages })
    }

    pub fn from_pages(pages: Vec<PageDump>) -> Self {
        Self { pages }
    }
}

impl TableSource for JsonDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn raw_tables(&self, page: u32) -> Result<Vec<RawTable>, SourceError> {
        let index = check_page(page, self.page_count())?;
        let tables = self.pages[index]
            .tables
            .iter()
            .map(|grid| RawTable::new(grid.clone()))
            .filter(|table| !table.is_empty())
            .collect();
        Ok(tables)
    }

    fn page_text(&self, page: u32) -> Result<String, SourceError> {
        let index = check_page(page, self.page_count())?;
        Ok(self.pages[index].text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_dump_pages_are_one_based() {
        let json = r#"{"pages": [
            {"text": "first page", "tables": []},
            {"text": "second page", "tables": [[["a", null], ["b"]], [["", null]]]}
        ]}"#;
        let document = JsonDocument::from_json(json).unwrap();

        assert_eq!(document.page_count(), 2);
        assert_eq!(document.page_text(1).unwrap(), "first page");
        let tables = document.raw_tables(2).unwrap();
        assert_eq!(tables.len(), 1, "blank grids are filtered out");
        assert_eq!(tables[0].width(), 2);
        assert!(matches!(
            document.page_text(3),
            Err(SourceError::PageOutOfRange { page: 3, count: 2 })
        ));
        assert!(document.raw_tables(0).is_err());
    }
}
