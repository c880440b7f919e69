// src/config.rs
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::extractors::schedule::DEFAULT_METADATA_LINE_LIMIT;
use crate::utils::AppError;

pub const METADATA_LINES_ENV: &str = "SCHEDULE_METADATA_LINES";

/// What happens to extracted records no placeholder paragraph asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeftoverPolicy {
    /// Report them and leave them out of the document.
    #[default]
    Drop,
    /// Report them and append them as table blocks at the document tail.
    Append,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Leading page lines scanned for schedule metadata.
    pub metadata_line_limit: usize,
    pub leftover_policy: LeftoverPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            metadata_line_limit: DEFAULT_METADATA_LINE_LIMIT,
            leftover_policy: LeftoverPolicy::Drop,
        }
    }
}

impl PipelineConfig {
    /// Defaults, then the environment, then explicit overrides.
    pub fn resolve(
        metadata_lines: Option<usize>,
        leftover_policy: LeftoverPolicy,
    ) -> Result<Self, AppError> {
        let mut config = Self {
            leftover_policy,
            ..Self::default()
        };

        if let Some(lines) = metadata_lines {
            config.metadata_line_limit = lines;
            tracing::debug!("Metadata line limit {} from command line", lines);
        } else if let Ok(value) = std::env::var(METADATA_LINES_ENV) {
            config.metadata_line_limit = value.trim().parse().map_err(|_| {
                AppError::Config(format!("{} must be a positive integer, got '{}'", METADATA_LINES_ENV, value))
            })?;
            tracing::debug!("Metadata line limit {} from {}", config.metadata_line_limit, METADATA_LINES_ENV);
        }

        if config.metadata_line_limit == 0 {
            return Err(AppError::Config("metadata line limit must be at least 1".to_string()));
        }
        Ok(config)
    }
}
