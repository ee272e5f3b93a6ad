use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::TodoError;
use crate::parser::split_tags;

pub const PROJECT_PREFIX: char = '+';
pub const CONTEXT_PREFIX: char = '@';

/// Sorts after every real priority letter.
pub const NO_PRIORITY_SORT: char = '~';

/// Single uppercase letter, `A` being the most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Priority(char);

impl Priority {
    pub fn new(letter: char) -> Result<Self, TodoError> {
        if letter.is_ascii_uppercase() {
            Ok(Self(letter))
        } else {
            Err(TodoError::InvalidPriority(letter))
        }
    }

    pub fn letter(self) -> char {
        self.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Priority {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Priority::new(c.to_ascii_uppercase()),
            (Some(c), Some(_)) => Err(TodoError::InvalidPriority(c)),
            (None, _) => Err(TodoError::InvalidPriority(' ')),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TaskKind {
    Incomplete { priority: Option<Priority> },
    Complete { end_date: NaiveDate },
}

/// One recognized line of a todo file.
///
/// `original_text` is everything after the priority and date prefix, kept
/// verbatim; `description` and `tags` are derived from it once, when the
/// record is built. Edits replace the whole record rather than patching it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    line: usize,
    #[serde(flatten)]
    kind: TaskKind,
    start_date: Option<NaiveDate>,
    original_text: String,
    description: String,
    tags: Vec<String>,
}

impl Task {
    pub fn incomplete(
        line: usize,
        text: impl Into<String>,
        priority: Option<Priority>,
        start_date: Option<NaiveDate>,
    ) -> Self {
        Self::new(line, text.into(), TaskKind::Incomplete { priority }, start_date)
    }

    pub fn complete(
        line: usize,
        text: impl Into<String>,
        end_date: NaiveDate,
        start_date: Option<NaiveDate>,
    ) -> Self {
        Self::new(line, text.into(), TaskKind::Complete { end_date }, start_date)
    }

    fn new(line: usize, original_text: String, kind: TaskKind, start_date: Option<NaiveDate>) -> Self {
        let (description, tags) = split_tags(&original_text);
        Self {
            line,
            kind,
            start_date,
            original_text,
            description,
            tags,
        }
    }

    /// Same text and start date, completed on `end_date`.
    pub(crate) fn into_complete(self, end_date: NaiveDate) -> Self {
        Self {
            kind: TaskKind::Complete { end_date },
            ..self
        }
    }

    pub(crate) fn set_line(&mut self, line: usize) {
        self.line = line;
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.kind, TaskKind::Complete { .. })
    }

    pub fn priority(&self) -> Option<Priority> {
        match self.kind {
            TaskKind::Incomplete { priority } => priority,
            TaskKind::Complete { .. } => None,
        }
    }

    /// The priority letter, or [`NO_PRIORITY_SORT`] when there is none.
    pub fn priority_sort_key(&self) -> char {
        self.priority().map_or(NO_PRIORITY_SORT, Priority::letter)
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        match self.kind {
            TaskKind::Complete { end_date } => Some(end_date),
            TaskKind::Incomplete { .. } => None,
        }
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    /// Text with every project and context removed.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Projects and contexts in order of appearance.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn projects(&self) -> impl Iterator<Item = &str> {
        self.tags_with_prefix(PROJECT_PREFIX)
    }

    pub fn contexts(&self) -> impl Iterator<Item = &str> {
        self.tags_with_prefix(CONTEXT_PREFIX)
    }

    fn tags_with_prefix(&self, prefix: char) -> impl Iterator<Item = &str> {
        self.tags
            .iter()
            .map(String::as_str)
            .filter(move |t| t.starts_with(prefix))
    }

    /// Days between start and completion; `None` unless both dates are known.
    pub fn days_taken(&self) -> Option<i64> {
        let start = self.start_date?;
        let end = self.end_date()?;
        Some((end - start).num_days())
    }

    /// Days an open task has been waiting as of `today`.
    pub fn days_since_start(&self, today: NaiveDate) -> Option<i64> {
        if self.is_complete() {
            return None;
        }
        self.start_date.map(|start| (today - start).num_days())
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        match self.kind {
            TaskKind::Incomplete {
                priority: Some(priority),
            } => {
                write!(f, "({})", priority)?;
                sep = " ";
            }
            TaskKind::Incomplete { priority: None } => {}
            TaskKind::Complete { end_date } => {
                write!(f, "x {}", end_date)?;
                sep = " ";
            }
        }
        if let Some(start) = self.start_date {
            write!(f, "{}{}", sep, start)?;
            sep = " ";
        }

        let text = self.original_text.trim_end();
        if !text.is_empty() {
            write!(f, "{}{}", sep, text)?;
        }
        Ok(())
    }
}
