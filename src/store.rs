use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::document::TodoFile;
use crate::error::{Result, TodoError};

/// A todo file on disk.
pub struct TodoStore {
    path: PathBuf,
}

impl TodoStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the file; a missing file is an empty document.
    pub fn load(&self) -> Result<TodoFile> {
        if !self.path.exists() {
            debug!("{} does not exist yet", self.path.display());
            return Ok(TodoFile::new());
        }

        let content = fs::read_to_string(&self.path)?;
        TodoFile::parse(&content)
    }

    /// Whether both stores resolve to one file on disk.
    pub fn is_same_file(&self, other: &TodoStore) -> bool {
        match (fs::canonicalize(&self.path), fs::canonicalize(&other.path)) {
            (Ok(a), Ok(b)) => a == b,
            _ => self.path == other.path,
        }
    }

    /// Moves between two stores need two distinct files.
    pub fn ensure_distinct(&self, dest: &TodoStore) -> Result<()> {
        if self.is_same_file(dest) {
            return Err(TodoError::Usage(format!(
                "Destination is the source file: {}",
                dest.path.display()
            )));
        }
        Ok(())
    }

    pub fn save(&self, file: &TodoFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    TodoError::Config(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
        }

        fs::write(&self.path, file.serialize())?;
        debug!("Wrote {} lines to {}", file.next_line(), self.path.display());
        Ok(())
    }
}
