use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use todofile::config::SortKey;
use todofile::Priority;

#[derive(Parser)]
#[command(name = "todofile")]
#[command(about = "Parse, edit and archive todo.txt task lists")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to config file (default: ~/.config/todofile/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Todo file to operate on, overriding the config
    #[arg(short = 'f', long, global = true)]
    pub file: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse files (or stdin) and print them back out (default)
    Roundtrip {
        /// Files to parse; reads stdin when none are given
        files: Vec<PathBuf>,
    },

    /// List tasks, sorted
    List {
        /// List completed tasks instead of open ones
        #[arg(long)]
        done: bool,

        /// Sort order (default from config)
        #[arg(short, long, value_enum)]
        sort: Option<SortKey>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Add a task, started today
    Add {
        /// Task text
        #[arg(required = true)]
        text: Vec<String>,

        #[command(flatten)]
        fields: TaskFields,
    },

    /// Rewrite a task, keeping its start date
    Edit {
        /// Line number (1-based)
        line: usize,

        /// New task text
        #[arg(required = true)]
        text: Vec<String>,

        #[command(flatten)]
        fields: TaskFields,
    },

    /// Mark a task done today
    Do {
        /// Line number (1-based)
        line: usize,
    },

    /// Delete a line
    Rm {
        /// Line number (1-based)
        line: usize,
    },

    /// Move a task to the end of another todo file
    Mv {
        /// Line number (1-based)
        line: usize,

        /// Destination todo file
        dest: PathBuf,
    },

    /// Move completed tasks to the done file
    Archive {
        /// Line number (1-based); archives every completed task when omitted
        line: Option<usize>,
    },

    /// List every project in the file
    Projects,

    /// List every context in the file
    Contexts,

    /// Print the active config (resolved, with defaults)
    Config,

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
pub struct TaskFields {
    /// Priority letter A-Z
    #[arg(short, long)]
    pub priority: Option<Priority>,

    /// Project to tag the task with (repeatable)
    #[arg(long = "project")]
    pub projects: Vec<String>,

    /// Context to tag the task with (repeatable)
    #[arg(long = "context")]
    pub contexts: Vec<String>,
}
