//! Line classifier for the todo.txt format.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::trace;

use crate::error::LineError;
use crate::model::{Priority, Task};

// x END [START ]TEXT
static COMPLETE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^x ([0-9]{4}-[0-9]{2}-[0-9]{2}) (?:([0-9]{4}-[0-9]{2}-[0-9]{2}) )?(.+)$").unwrap()
});

// [(P) ][START ]TEXT
static INCOMPLETE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\(([A-Z])\) )?(?:([0-9]{4}-[0-9]{2}-[0-9]{2}) )?(.+)$").unwrap()
});

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[@+]\S*\w").unwrap());

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Classify one line of a todo file.
///
/// Returns `Ok(None)` for blank lines. A date in the prefix that is shaped
/// like `YYYY-MM-DD` but is not a real calendar day is an error; it is
/// never reinterpreted as plain text.
pub fn parse_line(line_index: usize, line: &str) -> Result<Option<Task>, LineError> {
    if line.trim().is_empty() {
        return Ok(None);
    }

    if let Some(caps) = COMPLETE_RE.captures(line) {
        let end = parse_date(line_index, &caps[1])?;
        let start = caps
            .get(2)
            .map(|m| parse_date(line_index, m.as_str()))
            .transpose()?;
        trace!("line {}: complete", line_index);
        return Ok(Some(Task::complete(line_index, &caps[3], end, start)));
    }

    if let Some(caps) = INCOMPLETE_RE.captures(line) {
        let priority = caps
            .get(1)
            .and_then(|m| m.as_str().chars().next())
            .and_then(|c| Priority::new(c).ok());
        let start = caps
            .get(2)
            .map(|m| parse_date(line_index, m.as_str()))
            .transpose()?;
        trace!("line {}: incomplete", line_index);
        return Ok(Some(Task::incomplete(line_index, &caps[3], priority, start)));
    }

    Ok(None)
}

fn parse_date(line_index: usize, text: &str) -> Result<NaiveDate, LineError> {
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| LineError {
        line: line_index + 1,
        text: text.to_string(),
    })
}

/// Split text into its description and its `+project`/`@context` tags.
pub fn split_tags(text: &str) -> (String, Vec<String>) {
    let tags = TAG_RE
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .collect();
    let description = TAG_RE
        .replace_all(text, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    (description, tags)
}
