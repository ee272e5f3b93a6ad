use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, TodoError};

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub files: FilesConfig,
    #[serde(default)]
    pub list: ListConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct FilesConfig {
    #[serde(default = "default_todo")]
    pub todo: String,
    /// Where `archive` sends completed tasks
    #[serde(default = "default_done")]
    pub done: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            todo: default_todo(),
            done: default_done(),
        }
    }
}

impl FilesConfig {
    pub fn todo_path(&self) -> PathBuf {
        expand(&self.todo)
    }

    pub fn done_path(&self) -> PathBuf {
        expand(&self.done)
    }
}

fn default_todo() -> String {
    "~/.todo/todo.txt".into()
}

fn default_done() -> String {
    "~/.todo/done.txt".into()
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Priority,
    Start,
    Line,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct ListConfig {
    #[serde(default)]
    pub sort: SortKey,
}

impl Config {
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::default_config_path()?,
        };

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| TodoError::Config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| TodoError::Config("Could not find config directory".into()))?;
        Ok(config_dir.join("todofile").join("config.toml"))
    }
}
