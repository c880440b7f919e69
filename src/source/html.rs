// src/source/html.rs
use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::source::models::{PageDump, RawTable};
use crate::source::{check_page, TableSource};
use crate::utils::error::SourceError;
use crate::utils::text::clean_cell;

// Browsers cap colspan at this value.
const MAX_COLSPAN: usize = 1000;

// --- CSS Selectors (Lazy Static) ---
static PAGE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.page, section.page").expect("Failed to compile PAGE_SELECTOR")
});

static BODY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body").expect("Failed to compile BODY_SELECTOR"));

static TABLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("Failed to compile TABLE_SELECTOR"));

static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("Failed to compile ROW_SELECTOR"));

/// HTML export of a PDF where every page is a `div.page` (or `section.page`)
/// and detected tables are plain `<table>` elements. Parsed once up front.
#[derive(Debug, Clone, Default)]
pub struct HtmlDocument {
    pages: Vec<PageDump>,
}

impl HtmlDocument {
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let content = fs::read_to_string(path)?;
        let document = Self::from_html(&content);
        tracing::info!("Loaded HTML export {} ({} pages)", path.display(), document.pages.len());
        Ok(document)
    }

    pub fn from_html(content: &str) -> Self {
        let html = Html::parse_document(content);

        let mut page_elements: Vec<ElementRef> = html.select(&PAGE_SELECTOR).collect();
        if page_elements.is_empty() {
            tracing::debug!("No page containers found, treating <body> as a single page");
            page_elements = html.select(&BODY_SELECTOR).collect();
        }

        let pages = page_elements
            .into_iter()
            .map(|element| PageDump {
                text: page_text(element),
                tables: element
                    .select(&TABLE_SELECTOR)
                    .map(table_grid)
                    .collect(),
            })
            .collect();

        Self { pages }
    }
}

/// Text nodes of the page, one per line, blanks skipped.
fn page_text(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Converts one `<table>` into a grid. Rows that belong to a nested table are
/// skipped; `colspan` expands into absent cells.
fn table_grid(table: ElementRef) -> Vec<Vec<Option<String>>> {
    let mut grid = Vec::new();

    for row in table.select(&ROW_SELECTOR) {
        if !owned_by(row, table) {
            tracing::trace!("Skipping row of a nested table");
            continue;
        }

        let mut cells = Vec::new();
        for cell in row.children().filter_map(ElementRef::wrap) {
            let name = cell.value().name();
            if name != "td" && name != "th" {
                continue;
            }
            let text = cell.text().collect::<Vec<_>>().join("\n");
            cells.push(clean_cell(Some(&text)).map(|_| text.trim().to_string()));

            let span = cell
                .value()
                .attr("colspan")
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(1)
                .min(MAX_COLSPAN);
            for _ in 1..span {
                cells.push(None);
            }
        }
        grid.push(cells);
    }

    grid
}

/// True when the closest `<table>` ancestor of `row` is `table`.
fn owned_by(row: ElementRef, table: ElementRef) -> bool {
    row.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == "table")
        .map(|ancestor| ancestor.id() == table.id())
        .unwrap_or(false)
}

impl TableSource for HtmlDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn raw_tables(&self, page: u32) -> Result<Vec<RawTable>, SourceError> {
        let index = check_page(page, self.page_count())?;
        Ok(self.pages[index]
            .tables
            .iter()
            .map(|grid| RawTable::new(grid.clone()))
            .filter(|table| !table.is_empty())
            .collect())
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
    fn test_html_pages_and_tables() {
        let html = r#"
            <html><body>
            <div class="page">
                <p>1/2024</p>
                <p>Academic Calendar</p>
                <table>
                    <tr><th colspan="2">MARCH</th><td>x</td></tr>
                    <tr><td>D</td><td> </td><td>T</td></tr>
                </table>
            </div>
            <div class="page"><p>Second page</p></div>
            </body></html>
        "#;
        let document = HtmlDocument::from_html(html);

        assert_eq!(document.page_count(), 2);
        let text = document.page_text(1).unwrap();
        assert!(text.lines().any(|line| line == "1/2024"));
        assert!(text.contains("Academic Calendar"));

        let tables = document.raw_tables(1).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].cell(0, 0), Some("MARCH"));
        assert_eq!(tables[0].cell(0, 1), None, "colspan expands into an absent cell");
        assert_eq!(tables[0].cell(0, 2), Some("x"));
        assert_eq!(tables[0].cell(1, 1), None, "blank cell is absent");

        assert!(document.raw_tables(2).unwrap().is_empty());
    }

    #[test]
    fn test_body_fallback_and_nested_tables() {
        let html = r#"<body><table>
            <tr><td>outer</td><td><table><tr><td>inner</td></tr></table></td></tr>
        </table></body>"#;
        let document = HtmlDocument::from_html(html);

        assert_eq!(document.page_count(), 1);
        let tables = document.raw_tables(1).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].len(), 1, "outer table must not absorb nested rows");
        assert_eq!(tables[0].cell(0, 0), Some("outer"));
        assert_eq!(tables[1].cell(0, 0), Some("inner"));
    }

    #[test]
    fn test_oversized_colspan_is_capped() {
        let html = r#"<body><table>
            <tr><td colspan="4000000000">wide</td></tr>
            <tr><td>a</td></tr>
        </table></body>"#;
        let document = HtmlDocument::from_html(html);

        let tables = document.raw_tables(1).unwrap();
        assert_eq!(tables[0].width(), MAX_COLSPAN);
        assert_eq!(tables[0].cell(0, 0), Some("wide"));
        assert_eq!(tables[0].cell(1, 0), Some("a"));
    }
}
