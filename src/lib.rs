//! Round-trip parsing and editing of todo.txt task lists.
//!
//! ```
//! use todofile::TodoFile;
//!
//! let mut todo = TodoFile::parse("(A) Call mom +family\nx 2023-02-01 Pay rent\n").unwrap();
//! let mut done = TodoFile::new();
//! todo.archive_all_items(&mut done);
//! assert_eq!(todo.serialize(), "(A) Call mom +family\n");
//! assert_eq!(done.serialize(), "x 2023-02-01 Pay rent\n");
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod model;
pub mod parser;
pub mod store;

pub use document::TodoFile;
pub use error::{LineError, Result, TodoError};
pub use model::{Priority, Task, TaskKind};
