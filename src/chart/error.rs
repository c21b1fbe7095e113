use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading a chart. Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Failed to read chart file: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: missing {field}")]
    MissingField { line: usize, field: &'static str },

    #[error("line {line}: unknown lane type {name:?}")]
    UnknownLaneType { line: usize, name: String },

    #[error("line {line}: unknown note type {name:?}")]
    UnknownNoteType { line: usize, name: String },

    #[error("line {line}: invalid number {value:?}")]
    InvalidNumber { line: usize, value: String },
}

impl ChartError {
    /// Line the error was found on, if it came from chart contents
    pub fn line(&self) -> Option<usize> {
        match self {
            ChartError::Io { .. } => None,
            ChartError::MissingField { line, .. }
            | ChartError::UnknownLaneType { line, .. }
            | ChartError::UnknownNoteType { line, .. }
            | ChartError::InvalidNumber { line, .. } => Some(*line),
        }
    }
}
