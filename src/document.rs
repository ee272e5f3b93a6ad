use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::{Result, TodoError};
use crate::model::{Priority, Task, CONTEXT_PREFIX, PROJECT_PREFIX};
use crate::parser::parse_line;

/// An ordered, line-indexed todo file.
///
/// Slot `i` holds the record for line `i`, or `None` for a blank line, so
/// `next_line` is always the slot count and every record's `line()` equals
/// its slot. Removing a line shifts every later record up by one; indices
/// handed out earlier are stale after any structural operation.
///
/// Operations on a missing or wrong-kind line are no-ops and report `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoFile {
    lines: Vec<Option<Task>>,
}

impl TodoFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a whole file. Every line is checked; if any carries a malformed
    /// date the parse fails with all of them listed.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = Vec::new();
        let mut errors = Vec::new();

        for (i, line) in text.lines().enumerate() {
            match parse_line(i, line) {
                Ok(task) => lines.push(task),
                Err(e) => {
                    warn!("Skipping {}", e);
                    errors.push(e);
                    lines.push(None);
                }
            }
        }

        if !errors.is_empty() {
            return Err(TodoError::InvalidLines(errors));
        }

        debug!("Parsed {} lines", lines.len());
        Ok(Self { lines })
    }

    /// First unused line; new items are appended here.
    pub fn next_line(&self) -> usize {
        self.lines.len()
    }

    pub fn get_item(&self, line: usize) -> Option<&Task> {
        self.lines.get(line).and_then(Option::as_ref)
    }

    /// All records in line order.
    pub fn items(&self) -> impl Iterator<Item = &Task> {
        self.lines.iter().flatten()
    }

    /// Append a record taken from another file, renumbering it.
    pub fn add_existing_item(&mut self, mut task: Task) -> usize {
        let line = self.next_line();
        task.set_line(line);
        debug!("Adding existing item at line {}", line);
        self.lines.push(Some(task));
        line
    }

    /// Append a new incomplete task and return its line.
    ///
    /// Projects and contexts may be given with or without their `+`/`@`.
    pub fn add_item<P, C>(
        &mut self,
        text: &str,
        priority: Option<Priority>,
        start_date: Option<NaiveDate>,
        projects: &[P],
        contexts: &[C],
    ) -> usize
    where
        P: AsRef<str>,
        C: AsRef<str>,
    {
        let line = self.next_line();
        let full_text = build_text(text, projects, contexts);
        debug!("Adding item at line {}", line);
        self.lines
            .push(Some(Task::incomplete(line, full_text, priority, start_date)));
        line
    }

    /// Replace the record at `line` with a new incomplete task, keeping the
    /// previous start date.
    ///
    /// A complete record at `line` is reopened as incomplete: its end date is
    /// dropped. Blank or out-of-range lines are left alone.
    pub fn edit_item<P, C>(
        &mut self,
        line: usize,
        text: &str,
        priority: Option<Priority>,
        projects: &[P],
        contexts: &[C],
    ) -> bool
    where
        P: AsRef<str>,
        C: AsRef<str>,
    {
        let Some(slot) = self.lines.get_mut(line) else {
            return false;
        };
        let Some(previous) = slot.as_ref() else {
            return false;
        };
        let start_date = previous.start_date();
        if previous.is_complete() {
            debug!("Reopening complete item at line {}", line);
        }

        let full_text = build_text(text, projects, contexts);
        *slot = Some(Task::incomplete(line, full_text, priority, start_date));
        debug!("Edited item at line {}", line);
        true
    }

    /// Mark the incomplete task at `line` done on `end_date`.
    pub fn complete_item(&mut self, line: usize, end_date: NaiveDate) -> bool {
        let Some(slot) = self.lines.get_mut(line) else {
            return false;
        };
        match slot.take() {
            Some(task) if !task.is_complete() => {
                *slot = Some(task.into_complete(end_date));
                debug!("Completed item at line {}", line);
                true
            }
            other => {
                *slot = other;
                false
            }
        }
    }

    /// Delete `line`, blank or not, and shift every later line up by one.
    pub fn remove_line(&mut self, line: usize) -> bool {
        self.take_line(line).is_some()
    }

    fn take_line(&mut self, line: usize) -> Option<Option<Task>> {
        if line >= self.lines.len() {
            return None;
        }
        let removed = self.lines.remove(line);
        self.renumber_from(line);
        debug!("Removed line {}", line);
        Some(removed)
    }

    fn renumber_from(&mut self, start: usize) {
        for (i, slot) in self.lines.iter_mut().enumerate().skip(start) {
            if let Some(task) = slot {
                task.set_line(i);
            }
        }
    }

    /// Move the record at `line` to the end of `dest`.
    pub fn move_item(&mut self, line: usize, dest: &mut TodoFile) -> bool {
        if self.get_item(line).is_none() {
            return false;
        }
        match self.take_line(line) {
            Some(Some(task)) => {
                let dest_line = dest.add_existing_item(task);
                debug!("Moved line {} to line {} of destination", line, dest_line);
                true
            }
            _ => false,
        }
    }

    /// Move the record at `line` to `dest`, only if it is complete.
    pub fn archive_item(&mut self, line: usize, dest: &mut TodoFile) -> bool {
        match self.get_item(line) {
            Some(task) if task.is_complete() => self.move_item(line, dest),
            _ => false,
        }
    }

    /// Move every complete record to `dest`, keeping their relative order.
    ///
    /// Records are routed by identity in a single pass rather than by line
    /// number, so the shifting caused by each removal cannot misdirect a
    /// later one. Returns the number of records archived.
    pub fn archive_all_items(&mut self, dest: &mut TodoFile) -> usize {
        let slots = std::mem::take(&mut self.lines);
        let mut archived = 0;

        for slot in slots {
            match slot {
                Some(task) if task.is_complete() => {
                    dest.add_existing_item(task);
                    archived += 1;
                }
                other => self.lines.push(other),
            }
        }

        self.renumber_from(0);
        debug!("Archived {} items", archived);
        archived
    }

    /// Complete records sorted by `key`; equal keys keep line order.
    pub fn get_complete_items<K, F>(&self, key: F) -> Vec<&Task>
    where
        K: Ord,
        F: FnMut(&&Task) -> K,
    {
        sorted_by(self.items().filter(|t| t.is_complete()), key)
    }

    /// Incomplete records sorted by `key`; equal keys keep line order.
    pub fn get_incomplete_items<K, F>(&self, key: F) -> Vec<&Task>
    where
        K: Ord,
        F: FnMut(&&Task) -> K,
    {
        sorted_by(self.items().filter(|t| !t.is_complete()), key)
    }

    pub fn get_all_projects(&self) -> Vec<String> {
        self.unique_tags(PROJECT_PREFIX)
    }

    pub fn get_all_contexts(&self) -> Vec<String> {
        self.unique_tags(CONTEXT_PREFIX)
    }

    fn unique_tags(&self, prefix: char) -> Vec<String> {
        self.items()
            .flat_map(|t| t.tags())
            .filter(|tag| tag.starts_with(prefix))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Text form of the whole file, one line per slot, newline terminated.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for slot in &self.lines {
            if let Some(task) = slot {
                out.push_str(&task.to_string());
            }
            out.push('\n');
        }
        out
    }
}

impl FromStr for TodoFile {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for TodoFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

fn sorted_by<'a, K, F>(items: impl Iterator<Item = &'a Task>, key: F) -> Vec<&'a Task>
where
    K: Ord,
    F: FnMut(&&'a Task) -> K,
{
    let mut items: Vec<&Task> = items.collect();
    items.sort_by_key(key);
    items
}

fn build_text<P, C>(text: &str, projects: &[P], contexts: &[C]) -> String
where
    P: AsRef<str>,
    C: AsRef<str>,
{
    let mut parts = vec![text.trim().to_string()];
    parts.extend(projects.iter().map(|p| with_prefix(PROJECT_PREFIX, p.as_ref())));
    parts.extend(contexts.iter().map(|c| with_prefix(CONTEXT_PREFIX, c.as_ref())));
    parts.retain(|p| !p.is_empty());
    parts.join(" ")
}

fn with_prefix(prefix: char, name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        String::new()
    } else if name.starts_with(prefix) {
        name.to_string()
    } else {
        format!("{}{}", prefix, name)
    }
}
