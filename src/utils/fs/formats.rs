//! Text and JSON file helpers.
//!
//! Theme descriptors and the theme registry are JSON; content files are read
//! as text and parsed elsewhere. Writes go through [`super::atomic::safe_write`].

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

use super::atomic::safe_write;

/// Read a UTF-8 file, naming it in the error.
pub fn read_text_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))
}

/// Replace a file's content atomically.
pub fn write_text_file(path: &Path, content: &str) -> Result<()> {
    safe_write(path, content).with_context(|| format!("Cannot write {}", path.display()))
}

/// Read and deserialize a JSON file.
///
/// # Errors
///
/// Fails when the file is unreadable or is not valid JSON for `T`.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = read_text_file(path)?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Serialize `data` as JSON (pretty when `pretty`) and write it atomically.
pub fn write_json_file<T: Serialize>(path: &Path, data: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(data)
    } else {
        serde_json::to_string(data)
    }
    .with_context(|| format!("Cannot serialize JSON for {}", path.display()))?;

    write_text_file(path, &text)
}
