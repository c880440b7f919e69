// src/pipeline.rs
use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::extractors::{
    classify, parse_calendar, parse_curriculum_page, parse_history_log, PageClassification,
    ScheduleParser,
};
use crate::records::{
    CalendarRecord, CurriculumPageRecord, GenericTableRecord, HistoryLogRecord, ParsedRecord,
    ScheduleRecord,
};
use crate::source::TableSource;
use crate::utils::error::ExtractError;

/// Per-category record queues of one document, each in ascending page order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResults {
    pub schedules: Vec<ScheduleRecord>,
    pub curricula: Vec<CurriculumPageRecord>,
    pub calendars: Vec<CalendarRecord>,
    pub history_logs: Vec<HistoryLogRecord>,
    pub generic_tables: Vec<GenericTableRecord>,
}

impl ExtractionResults {
    pub fn push(&mut self, record: ParsedRecord) {
        match record {
            ParsedRecord::Schedule(r) => self.schedules.push(r),
            ParsedRecord::Calendar(r) => self.calendars.push(r),
            ParsedRecord::Curriculum(r) => self.curricula.push(r),
            ParsedRecord::HistoryLog(r) => self.history_logs.push(r),
            ParsedRecord::Generic(r) => self.generic_tables.push(r),
        }
    }

    pub fn total(&self) -> usize {
        self.schedules.len()
            + self.curricula.len()
            + self.calendars.len()
            + self.history_logs.len()
            + self.generic_tables.len()
    }

    /// Queue sizes keyed by category, for logs and run metadata.
    pub fn counts(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("schedules", self.schedules.len()),
            ("curricula", self.curricula.len()),
            ("calendars", self.calendars.len()),
            ("history_logs", self.history_logs.len()),
            ("generic_tables", self.generic_tables.len()),
        ]
    }
}

/// Walks every page of a document, classifies it and hands it to the
/// matching parser.
pub struct Extractor {
    schedule: ScheduleParser,
}

impl Extractor {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            schedule: ScheduleParser::new(config.metadata_line_limit),
        }
    }

    pub fn run(&self, source: &dyn TableSource) -> ExtractionResults {
        let page_count = source.page_count();
        let mut results = ExtractionResults::default();
        tracing::info!("Starting table extraction over {} pages", page_count);

        for page in 1..=page_count {
            let class = match source.page_text(page) {
                Ok(text) => classify(&text),
                Err(e) => {
                    tracing::error!("Could not read text of page {}: {}", page, e);
                    continue;
                }
            };
            tracing::info!("Page {}/{} -> {}", page, page_count, class.as_str());

            match self.dispatch(class, source, page) {
                Ok(Some(record)) => {
                    tracing::debug!("Queued {:?} record from page {}", class, record.page());
                    results.push(record);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::error!("Failed to process page {} ({}): {}", page, class.as_str(), e);
                }
            }
        }

        let counts = results
            .counts()
            .into_iter()
            .filter(|(_, n)| *n > 0)
            .map(|(name, n)| format!("{}={}", name, n))
            .collect::<Vec<_>>();
        tracing::info!("Extraction finished: [{}]", counts.join(", "));
        results
    }

    fn dispatch(
        &self,
        class: PageClassification,
        source: &dyn TableSource,
        page: u32,
    ) -> Result<Option<ParsedRecord>, ExtractError> {
        let record = match class {
            PageClassification::Unknown => None,
            PageClassification::Schedule => {
                self.schedule.parse(source, page)?.map(ParsedRecord::Schedule)
            }
            PageClassification::Calendar => {
                parse_calendar(source, page)?.map(ParsedRecord::Calendar)
            }
            PageClassification::HistoryLog => {
                parse_history_log(source, page)?.map(ParsedRecord::HistoryLog)
            }
            PageClassification::Curriculum => {
                let record = parse_curriculum_page(source, page);
                if record.sub_records.is_empty() {
                    tracing::warn!(
                        "Curriculum page {} yielded no tables: {}",
                        page,
                        record.summary
                    );
                    None
                } else {
                    tracing::info!(
                        "Curriculum page {} yielded {} table(s)",
                        page,
                        record.sub_records.len()
                    );
                    Some(ParsedRecord::Curriculum(record))
                }
            }
        };
        Ok(record)
    }
}

/// Extracts every table of a document into per-category queues. Page
/// failures are logged and skipped, never raised.
pub fn run_extraction(source: &dyn TableSource, config: &PipelineConfig) -> ExtractionResults {
    Extractor::new(config).run(source)
}
