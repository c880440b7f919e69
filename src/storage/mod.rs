// src/storage/mod.rs
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::integration::{DocumentTree, IntegrationReport};
use crate::pipeline::ExtractionResults;
use crate::utils::error::StorageError;

/// Writes run artifacts under `<base_dir>/<stem>/`.
pub struct StorageManager {
    base_dir: PathBuf,
}

/// Facts about one run, written next to the extraction output.
pub struct RunSummary<'a> {
    pub input: &'a Path,
    pub page_count: u32,
    pub results: &'a ExtractionResults,
    pub integration: Option<&'a IntegrationReport>,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Directory holding every artifact of one input document.
    pub fn document_dir(&self, stem: &str) -> Result<PathBuf, StorageError> {
        let target_dir = self.base_dir.join(stem);
        if !target_dir.exists() {
            fs::create_dir_all(&target_dir).map_err(StorageError::IoError)?;
        }
        Ok(target_dir)
    }

    fn write_json<T: Serialize>(&self, stem: &str, suffix: &str, value: &T) -> Result<PathBuf, StorageError> {
        let file_path = self.document_dir(stem)?.join(format!("{}_{}.json", stem, suffix));

        let body = serde_json::to_string_pretty(value)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        let mut file = fs::File::create(&file_path).map_err(StorageError::IoError)?;
        file.write_all(body.as_bytes()).map_err(StorageError::IoError)?;

        Ok(file_path)
    }

    /// Saves the per-category record queues.
    pub fn save_extraction(&self, stem: &str, results: &ExtractionResults) -> Result<PathBuf, StorageError> {
        let path = self.write_json(stem, "extraction", results)?;
        tracing::info!("Saved {} extracted records to {}", results.total(), path.display());
        Ok(path)
    }

    /// Saves the document tree after table reintegration.
    pub fn save_document(&self, stem: &str, tree: &DocumentTree) -> Result<PathBuf, StorageError> {
        let path = self.write_json(stem, "integrated", tree)?;
        tracing::info!("Saved integrated document to {}", path.display());
        Ok(path)
    }

    /// Saves metadata about the run in JSON format
    pub fn save_run_metadata(&self, stem: &str, summary: &RunSummary) -> Result<PathBuf, StorageError> {
        let queues: serde_json::Map<String, serde_json::Value> = summary
            .results
            .counts()
            .into_iter()
            .map(|(name, n)| (name.to_string(), n.into()))
            .collect();

        let metadata = serde_json::json!({
            "input": summary.input.display().to_string(),
            "page_count": summary.page_count,
            "queues": queues,
            "integration": summary.integration,
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let path = self.write_json(stem, "meta", &metadata)?;
        tracing::info!("Saved metadata to {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::DocumentElement;
    use crate::records::CalendarRecord;
    use tempfile::tempdir;

    fn results() -> ExtractionResults {
        ExtractionResults {
            calendars: vec![CalendarRecord {
                page: 2,
                title: "MARÇO".into(),
                rows: vec![],
                legend: None,
                summary: "s".into(),
                error: None,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_artifacts_land_in_document_dir() {
        let dir = tempdir().unwrap();
        let storage = StorageManager::new(dir.path().join("out")).unwrap();

        let extraction = storage.save_extraction("ppc", &results()).unwrap();
        assert_eq!(extraction, dir.path().join("out/ppc/ppc_extraction.json"));

        let saved: ExtractionResults =
            serde_json::from_str(&fs::read_to_string(&extraction).unwrap()).unwrap();
        assert_eq!(saved, results());

        let tree = DocumentTree::new(vec![DocumentElement::paragraph("Intro")]);
        let integrated = storage.save_document("ppc", &tree).unwrap();
        let text = fs::read_to_string(integrated).unwrap();
        assert!(text.contains("\"structure\""));
        assert!(text.contains("\"Intro\""));
    }

    #[test]
    fn test_run_metadata_lists_queue_sizes() {
        let dir = tempdir().unwrap();
        let storage = StorageManager::new(dir.path()).unwrap();
        let results = results();
        let report = IntegrationReport { substituted: 1, blocks_emitted: 1, ..Default::default() };

        let path = storage
            .save_run_metadata(
                "ppc",
                &RunSummary {
                    input: Path::new("ppc.json"),
                    page_count: 12,
                    results: &results,
                    integration: Some(&report),
                },
            )
            .unwrap();

        let meta: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(meta["page_count"], 12);
        assert_eq!(meta["queues"]["calendars"], 1);
        assert_eq!(meta["queues"]["schedules"], 0);
        assert_eq!(meta["integration"]["substituted"], 1);
        assert!(meta["extraction_timestamp"].is_string());
    }
}
