use thiserror::Error;

/// Errors surfaced to the presentation layer for calls it should not make.
///
/// Storage and data-quality problems never show up here: those are logged and
/// repaired (or replaced by defaults) inside the model.
#[derive(Debug, Error, PartialEq)]
pub enum ProgressError {
    #[error("Unknown hero: {0}")]
    UnknownHero(String),
    #[error("Unknown quest: {0}")]
    UnknownQuest(String),
    #[error("Invalid date key: {0}")]
    InvalidDateKey(String),
    #[error("Invalid month key: {0}")]
    InvalidMonthKey(String),
    #[error("Invalid export document: {0}")]
    InvalidExport(String),
}
