// src/integration/mod.rs
//! Splices extracted tables back into the document tree in place of the
//! placeholder paragraphs the text pipeline left for them.

pub mod document;
pub mod normalize;

use serde::Serialize;

use crate::config::LeftoverPolicy;
use crate::extractors::keywords::{self as kw, has, has_all};
use crate::pipeline::ExtractionResults;
use crate::utils::error::IntegrationError;

pub use document::{DocumentElement, DocumentTree, TableBlock};

/// Queue a trigger phrase draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    HistoryLog,
    Calendar,
    Schedule,
    Curriculum,
    Generic,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::HistoryLog => "history_log",
            Category::Calendar => "calendar",
            Category::Schedule => "schedule",
            Category::Curriculum => "curriculum",
            Category::Generic => "generic",
        }
    }
}

/// Order in which leftover queues are reported and appended.
const ALL_CATEGORIES: [Category; 5] = [
    Category::Schedule,
    Category::Calendar,
    Category::Curriculum,
    Category::HistoryLog,
    Category::Generic,
];

pub struct TriggerRule {
    pub category: Category,
    pub matches: fn(&str) -> bool,
    /// A matching paragraph stops the search even when its queue is empty.
    pub claims_when_empty: bool,
}

fn history_trigger(text: &str) -> bool {
    has_all(text, &[kw::CHANGE_HISTORY, kw::RESOLUTION])
}

fn calendar_trigger(text: &str) -> bool {
    has(text, kw::ACADEMIC_CALENDAR)
}

fn schedule_trigger(text: &str) -> bool {
    has_all(text, &[kw::COMPUTER_SCIENCE, kw::MONDAY])
}

fn curriculum_trigger(text: &str) -> bool {
    has(text, kw::CURRICULUM_MATRIX) || has(text, kw::SYLLABUS_LABEL) || has(text, kw::PEDAGOGICAL_PROJECT)
}

/// Evaluated top to bottom against the lower-cased paragraph text.
pub static TRIGGER_RULES: &[TriggerRule] = &[
    TriggerRule { category: Category::HistoryLog, matches: history_trigger, claims_when_empty: true },
    TriggerRule { category: Category::Calendar, matches: calendar_trigger, claims_when_empty: false },
    TriggerRule { category: Category::Schedule, matches: schedule_trigger, claims_when_empty: false },
    TriggerRule { category: Category::Curriculum, matches: curriculum_trigger, claims_when_empty: false },
];

/// Position of the next unconsumed record in each queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Cursors {
    schedule: usize,
    calendar: usize,
    curriculum: usize,
    history_log: usize,
    generic: usize,
}

impl Cursors {
    fn get_mut(&mut self, category: Category) -> &mut usize {
        match category {
            Category::Schedule => &mut self.schedule,
            Category::Calendar => &mut self.calendar,
            Category::Curriculum => &mut self.curriculum,
            Category::HistoryLog => &mut self.history_log,
            Category::Generic => &mut self.generic,
        }
    }

    fn get(&self, category: Category) -> usize {
        match category {
            Category::Schedule => self.schedule,
            Category::Calendar => self.calendar,
            Category::Curriculum => self.curriculum,
            Category::HistoryLog => self.history_log,
            Category::Generic => self.generic,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntegrationReport {
    /// Paragraphs replaced by table blocks.
    pub substituted: usize,
    pub blocks_emitted: usize,
    /// Substitutions abandoned because a record could not be projected.
    pub failures: usize,
    /// Unconsumed records per category after the walk.
    pub leftovers: Vec<(Category, usize)>,
    pub appended: usize,
}

impl IntegrationReport {
    pub fn leftover_total(&self) -> usize {
        self.leftovers.iter().map(|(_, n)| n).sum()
    }
}

/// Turns the record at an index of a queue into table blocks.
pub type Projection = fn(&ExtractionResults, Category, usize) -> Result<Vec<TableBlock>, IntegrationError>;

/// Blocks for the record at `index` of a queue.
pub fn project_record(
    results: &ExtractionResults,
    category: Category,
    index: usize,
) -> Result<Vec<TableBlock>, IntegrationError> {
    let r = results;
    match category {
        Category::Schedule => normalize::schedule_block(&r.schedules[index]).map(|b| vec![b]),
        Category::Calendar => normalize::calendar_block(&r.calendars[index]).map(|b| vec![b]),
        Category::Curriculum => normalize::curriculum_blocks(&r.curricula[index]),
        Category::HistoryLog => normalize::history_log_block(&r.history_logs[index]).map(|b| vec![b]),
        Category::Generic => normalize::generic_block(&r.generic_tables[index]).map(|b| vec![b]),
    }
}

/// Walks the tree once, consuming each queue front to back.
pub struct Reintegrator<'a> {
    results: &'a ExtractionResults,
    project: Projection,
    cursors: Cursors,
    report: IntegrationReport,
}

impl<'a> Reintegrator<'a> {
    pub fn new(results: &'a ExtractionResults) -> Self {
        Self {
            results,
            project: project_record,
            cursors: Cursors::default(),
            report: IntegrationReport::default(),
        }
    }

    #[cfg(test)]
    fn with_projection(results: &'a ExtractionResults, project: Projection) -> Self {
        Self {
            results,
            project,
            cursors: Cursors::default(),
            report: IntegrationReport::default(),
        }
    }

    fn queue_len(&self, category: Category) -> usize {
        match category {
            Category::Schedule => self.results.schedules.len(),
            Category::Calendar => self.results.calendars.len(),
            Category::Curriculum => self.results.curricula.len(),
            Category::HistoryLog => self.results.history_logs.len(),
            Category::Generic => self.results.generic_tables.len(),
        }
    }

    fn remaining(&self, category: Category) -> usize {
        self.queue_len(category) - self.cursors.get(category)
    }

    /// Projects the next record of a queue; the cursor only moves on success.
    fn consume(&mut self, category: Category) -> Result<Vec<TableBlock>, IntegrationError> {
        let index = self.cursors.get(category);
        let blocks = (self.project)(self.results, category, index)?;
        *self.cursors.get_mut(category) += 1;
        Ok(blocks)
    }

    fn integrate_paragraph(&mut self, text: &str) -> Option<Vec<TableBlock>> {
        let lowered = text.to_lowercase();
        let rule = TRIGGER_RULES.iter().find(|rule| {
            (rule.matches)(&lowered) && (rule.claims_when_empty || self.remaining(rule.category) > 0)
        })?;

        if self.remaining(rule.category) == 0 {
            tracing::debug!("Paragraph matches the {} trigger but nothing is queued", rule.category.as_str());
            return None;
        }

        match self.consume(rule.category) {
            Ok(blocks) => {
                tracing::info!(
                    "Replacing '{}' paragraph with {} table block(s) (page {})",
                    rule.category.as_str(),
                    blocks.len(),
                    blocks.first().map(|b| b.source_page.to_string()).unwrap_or_else(|| "-".to_string())
                );
                Some(blocks)
            }
            Err(e) => {
                tracing::error!("Failed to substitute {} paragraph, keeping original: {}", rule.category.as_str(), e);
                self.report.failures += 1;
                None
            }
        }
    }

    pub fn integrate(mut self, mut tree: DocumentTree, policy: LeftoverPolicy) -> (DocumentTree, IntegrationReport) {
        tracing::info!("Integrating tables into a document of {} elements", tree.elements.len());
        let elements = std::mem::take(&mut tree.elements);
        let mut output = Vec::with_capacity(elements.len());

        for element in elements {
            let DocumentElement::Paragraph(paragraph) = &element else {
                output.push(element);
                continue;
            };
            match self.integrate_paragraph(paragraph.text()) {
                Some(blocks) => {
                    self.report.substituted += 1;
                    self.report.blocks_emitted += blocks.len();
                    output.extend(blocks.into_iter().map(DocumentElement::Table));
                }
                None => output.push(element),
            }
        }

        self.report.leftovers = ALL_CATEGORIES
            .iter()
            .map(|&category| (category, self.remaining(category)))
            .filter(|(_, n)| *n > 0)
            .collect();

        if !self.report.leftovers.is_empty() {
            let detail = self
                .report
                .leftovers
                .iter()
                .map(|(c, n)| format!("{}={}", c.as_str(), n))
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!("Extracted tables left unintegrated: [{}] (policy: {:?})", detail, policy);

            if policy == LeftoverPolicy::Append {
                self.append_leftovers(&mut output);
            }
        }

        tracing::info!(
            "Integration finished: {} paragraph(s) replaced by {} block(s)",
            self.report.substituted,
            self.report.blocks_emitted
        );
        tree.elements = output;
        (tree, self.report)
    }

    fn append_leftovers(&mut self, output: &mut Vec<DocumentElement>) {
        for category in ALL_CATEGORIES {
            while self.remaining(category) > 0 {
                match self.consume(category) {
                    Ok(blocks) => {
                        self.report.appended += blocks.len();
                        output.extend(blocks.into_iter().map(DocumentElement::Table));
                    }
                    Err(e) => {
                        tracing::error!("Could not append leftover {} record: {}", category.as_str(), e);
                        self.report.failures += 1;
                        *self.cursors.get_mut(category) += 1;
                    }
                }
            }
        }
    }
}

/// Replaces placeholder paragraphs with table blocks. Never fails; problems
/// are logged and reported.
pub fn integrate(
    tree: DocumentTree,
    results: &ExtractionResults,
    policy: LeftoverPolicy,
) -> (DocumentTree, IntegrationReport) {
    Reintegrator::new(results).integrate(tree, policy)
}
