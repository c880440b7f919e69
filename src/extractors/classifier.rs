// src/extractors/classifier.rs
use serde::{Deserialize, Serialize};

use crate::extractors::keywords::{self as kw, has, has_all};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageClassification {
    Schedule,
    Curriculum,
    Calendar,
    HistoryLog,
    Unknown,
}

impl PageClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageClassification::Schedule => "schedule",
            PageClassification::Curriculum => "curriculum",
            PageClassification::Calendar => "calendar",
            PageClassification::HistoryLog => "history_log",
            PageClassification::Unknown => "unknown",
        }
    }
}

/// One entry of the page decision list.
pub struct PageRule {
    pub class: PageClassification,
    pub matches: fn(&str) -> bool,
}

fn is_curriculum(text: &str) -> bool {
    has(text, kw::PEDAGOGICAL_PROJECT)
        || has(text, kw::CURRICULUM_MATRIX)
        || has_all(text, &[kw::FACULTY_BODY, kw::WORK_REGIME])
        || has_all(text, &[kw::SYLLABUS_LABEL, kw::BASIC_BIBLIOGRAPHY])
        || has(text, kw::ELECTIVE_DISCIPLINES)
}

fn is_schedule(text: &str) -> bool {
    has_all(text, &[kw::COMPUTER_SCIENCE, kw::MONDAY, kw::TUESDAY, kw::WEDNESDAY])
}

fn is_calendar(text: &str) -> bool {
    has(text, kw::ACADEMIC_CALENDAR)
}

fn is_history_log(text: &str) -> bool {
    has_all(text, &[kw::STATUTE_HISTORY, kw::COUNCIL_RESOLUTION])
}

/// Evaluated top to bottom, first match wins.
pub static PAGE_RULES: &[PageRule] = &[
    PageRule { class: PageClassification::Curriculum, matches: is_curriculum },
    PageRule { class: PageClassification::Schedule, matches: is_schedule },
    PageRule { class: PageClassification::Calendar, matches: is_calendar },
    PageRule { class: PageClassification::HistoryLog, matches: is_history_log },
];

/// Maps the plain text of a page to its semantic category.
pub fn classify(page_text: &str) -> PageClassification {
    let text = page_text.to_lowercase();
    PAGE_RULES
        .iter()
        .find(|rule| (rule.matches)(&text))
        .map(|rule| rule.class)
        .unwrap_or(PageClassification::Unknown)
}
