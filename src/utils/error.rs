// src/utils/error.rs
use thiserror::Error;

// Errors raised by the table source collaborator (page dumps, HTML exports)
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode page dump: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Page {page} out of range (document has {count} pages)")]
    PageOutOfRange { page: u32, count: u32 },

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),
}

// Page-level failures. The orchestrator logs these and moves on.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Table source failed: {0}")]
    Source(#[from] SourceError),
}

#[derive(Error, Debug)]
pub enum IntegrationError {
    #[error("Could not project record to a table block: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Row of {subtype} is not a key/value object")]
    RowShape { subtype: String },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Document source failed: {0}")]
    Source(#[from] SourceError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid document tree: {0}")]
    Tree(#[from] serde_json::Error),
}
