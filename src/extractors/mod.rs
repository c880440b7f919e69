pub mod calendar;
pub mod classifier;
pub mod curriculum;
pub mod history;
pub mod keywords;
pub mod schedule;

// Re-export key extraction types for convenience
pub use calendar::parse_calendar;
pub use classifier::{classify, PageClassification};
pub use curriculum::parse_curriculum_page;
pub use history::parse_history_log;
pub use schedule::ScheduleParser;
