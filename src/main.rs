use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing::info;

mod cli;

use cli::{Cli, Command};
use todofile::config::{Config, SortKey};
use todofile::store::TodoStore;
use todofile::{Result, Task, TodoError, TodoFile};

fn setup_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    info!("Starting todofile v{}", env!("CARGO_PKG_VERSION"));

    let config = match Config::load(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::from(1);
        }
    };

    let todo_path = cli.file.unwrap_or_else(|| config.files.todo_path());
    let command = cli.command.unwrap_or(Command::Roundtrip { files: Vec::new() });

    match run(command, config, todo_path) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn run(command: Command, config: Config, todo_path: PathBuf) -> Result<()> {
    let store = TodoStore::new(todo_path);

    match command {
        Command::Roundtrip { files } => roundtrip(&files)?,
        Command::List { done, sort, format } => {
            let file = store.load()?;
            let sort = sort.unwrap_or(config.list.sort);
            let tasks = if done {
                file.get_complete_items(|t| sort_key(t, sort))
            } else {
                file.get_incomplete_items(|t| sort_key(t, sort))
            };

            match format.as_str() {
                "json" => {
                    let json = serde_json::to_string_pretty(&tasks)?;
                    println!("{}", json);
                }
                _ => {
                    if tasks.is_empty() {
                        println!("No tasks found.");
                    } else {
                        for task in tasks {
                            println!("{:>3} {}", task.line() + 1, task);
                        }
                    }
                }
            }
        }
        Command::Add { text, fields } => {
            let mut file = store.load()?;
            let today = chrono::Local::now().date_naive();
            let line = file.add_item(
                &text.join(" "),
                fields.priority,
                Some(today),
                &fields.projects,
                &fields.contexts,
            );
            store.save(&file)?;
            if let Some(task) = file.get_item(line) {
                println!("✓ Added line {}: {}", line + 1, task);
            }
        }
        Command::Edit { line, text, fields } => {
            let mut file = store.load()?;
            let index = to_index(line, &file)?;
            if !file.edit_item(
                index,
                &text.join(" "),
                fields.priority,
                &fields.projects,
                &fields.contexts,
            ) {
                return Err(TodoError::NoTask {
                    line,
                    expected: "existing",
                });
            }
            store.save(&file)?;
            if let Some(task) = file.get_item(index) {
                println!("✓ Edited line {}: {}", line, task);
            }
        }
        Command::Do { line } => {
            let mut file = store.load()?;
            let index = to_index(line, &file)?;
            let today = chrono::Local::now().date_naive();
            if !file.complete_item(index, today) {
                return Err(TodoError::NoTask {
                    line,
                    expected: "incomplete",
                });
            }
            store.save(&file)?;
            if let Some(task) = file.get_item(index) {
                println!("✓ Completed line {}: {}", line, task);
            }
        }
        Command::Rm { line } => {
            let mut file = store.load()?;
            let index = to_index(line, &file)?;
            file.remove_line(index);
            store.save(&file)?;
            println!("✓ Removed line {}", line);
        }
        Command::Mv { line, dest } => {
            let dest_store = TodoStore::new(dest);
            store.ensure_distinct(&dest_store)?;
            let mut file = store.load()?;
            let index = to_index(line, &file)?;
            let mut dest_file = dest_store.load()?;
            if !file.move_item(index, &mut dest_file) {
                return Err(TodoError::NoTask {
                    line,
                    expected: "existing",
                });
            }
            dest_store.save(&dest_file)?;
            store.save(&file)?;
            println!("✓ Moved line {} to {}", line, dest_store.path().display());
        }
        Command::Archive { line } => {
            let done_store = TodoStore::new(config.files.done_path());
            store.ensure_distinct(&done_store)?;
            let mut file = store.load()?;
            let mut done_file = done_store.load()?;
            let archived = match line {
                Some(line) => {
                    let index = to_index(line, &file)?;
                    if !file.archive_item(index, &mut done_file) {
                        return Err(TodoError::NoTask {
                            line,
                            expected: "complete",
                        });
                    }
                    1
                }
                None => file.archive_all_items(&mut done_file),
            };
            if archived > 0 {
                done_store.save(&done_file)?;
                store.save(&file)?;
            }
            println!(
                "✓ Archived {} task(s) to {}",
                archived,
                done_store.path().display()
            );
        }
        Command::Projects => {
            for project in store.load()?.get_all_projects() {
                println!("{}", project);
            }
        }
        Command::Contexts => {
            for context in store.load()?.get_all_contexts() {
                println!("{}", context);
            }
        }
        Command::Config => {
            let config_toml = toml::to_string_pretty(&config).map_err(|e| {
                TodoError::Config(format!("Failed to serialize config: {}", e))
            })?;
            println!("{}", config_toml);
        }
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        }
    }

    Ok(())
}

/// Parse each input and print it back, as a check of the round trip.
fn roundtrip(files: &[PathBuf]) -> Result<()> {
    if files.is_empty() {
        if atty::is(atty::Stream::Stdin) {
            return Err(TodoError::Usage(
                "No input: pass one or more files or pipe a todo list on stdin".into(),
            ));
        }
        let mut data = String::new();
        std::io::stdin().read_to_string(&mut data)?;
        print_parse("<stdin>", &data)?;
        return Ok(());
    }

    for path in files {
        let data = std::fs::read_to_string(path)?;
        print_parse(&path.display().to_string(), &data)?;
    }
    Ok(())
}

fn print_parse(name: &str, data: &str) -> Result<()> {
    let file = TodoFile::parse(data)?;
    println!("Parse of {}:", name);
    println!("{}", file);
    Ok(())
}

// Ties fall back to line order, the sort being stable.
fn sort_key(task: &Task, sort: SortKey) -> (char, bool, Option<chrono::NaiveDate>, usize) {
    match sort {
        SortKey::Priority => (task.priority_sort_key(), false, None, 0),
        // Oldest first, undated last
        SortKey::Start => ('\0', task.start_date().is_none(), task.start_date(), 0),
        SortKey::Line => ('\0', false, None, task.line()),
    }
}

fn to_index(line: usize, file: &TodoFile) -> Result<usize> {
    if line == 0 || line > file.next_line() {
        return Err(TodoError::LineOutOfRange {
            line,
            len: file.next_line(),
        });
    }
    Ok(line - 1)
}
