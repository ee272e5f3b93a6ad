use thiserror::Error;

/// A single line that could not be classified, reported 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: invalid date '{text}'")]
pub struct LineError {
    pub line: usize,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("{} malformed line(s): {}", .0.len(), join_lines(.0))]
    InvalidLines(Vec<LineError>),

    #[error("Invalid priority '{0}': expected a letter A-Z")]
    InvalidPriority(char),

    #[error("Line {line} not found (file has {len} lines)")]
    LineOutOfRange { line: usize, len: usize },

    #[error("Line {line} has no {expected} task")]
    NoTask { line: usize, expected: &'static str },

    #[error("{0}")]
    Usage(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for TodoError {
    fn from(e: serde_json::Error) -> Self {
        TodoError::Json(e.to_string())
    }
}

fn join_lines(errors: &[LineError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, TodoError>;
