// src/source/mod.rs
pub mod html;
pub mod json;
pub mod models;

use std::path::Path;

use crate::utils::error::SourceError;

pub use html::HtmlDocument;
pub use json::JsonDocument;
pub use models::RawTable;

/// The two capabilities the pipeline needs from whatever decoded the
/// document. Pages are 1-based.
pub trait TableSource {
    fn page_count(&self) -> u32;

    /// Every table grid detected on the page; empty when there is none.
    fn raw_tables(&self, page: u32) -> Result<Vec<RawTable>, SourceError>;

    /// Plain text of the page, top-to-bottom line order.
    fn page_text(&self, page: u32) -> Result<String, SourceError>;
}

/// Opens a document export, picking the reader from the file extension.
pub fn open_document(path: &Path) -> Result<Box<dyn TableSource>, SourceError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "json" => Ok(Box::new(JsonDocument::from_path(path)?)),
        "html" | "htm" => Ok(Box::new(HtmlDocument::from_path(path)?)),
        other => Err(SourceError::UnsupportedFormat(format!(
            "'{}' (expected .json or .html)",
            other
        ))),
    }
}

pub(crate) fn check_page(page: u32, count: u32) -> Result<usize, SourceError> {
    if page == 0 || page > count {
        return Err(SourceError::PageOutOfRange { page, count });
    }
    Ok((page - 1) as usize)
}
