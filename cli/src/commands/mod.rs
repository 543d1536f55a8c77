use std::{fs, path::Path};

use anyhow::{Context, Result};
use pangatikan::Config;
use serde_json::Value;

pub mod legend;
pub mod merge;
pub mod summarize;

pub(crate) fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_json_file(path),
        None => Ok(Config::default()),
    }
}

/// Pretty-print JSON to `path`, or to stdout when there is none.
pub(crate) fn write_json(path: Option<&Path>, value: &Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    match path {
        Some(path) => fs::write(path, text).with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}
