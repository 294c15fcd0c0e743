//! Crash-safe file replacement.
//!
//! The JSON theme registry is rewritten through [`atomic_write`], so a reader
//! sees either the previous registry or the new one, never a torn file. An
//! activation therefore lands in one step.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use super::dirs::ensure_parent_dir;

/// [`atomic_write`] for text.
///
/// ```rust,no_run
/// use stagehand_cli::utils::fs::safe_write;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// safe_write(Path::new(".stagehand/registry.json"), "{\"themes\":[]}")?;
/// # Ok(())
/// # }
/// ```
pub fn safe_write(path: &Path, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Replace `path` with `content`.
///
/// The bytes go to a uniquely named temp file in the target's directory, are
/// synced, and the temp file is renamed over `path`. Missing parent
/// directories are created.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    ensure_parent_dir(path)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("Cannot stage a write next to {}", path.display()))?;
    staged
        .write_all(content)
        .with_context(|| format!("Cannot write staged copy of {}", path.display()))?;
    staged
        .as_file()
        .sync_all()
        .with_context(|| format!("Cannot flush staged copy of {}", path.display()))?;
    staged
        .persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Cannot move staged copy into place at {}", path.display()))?;

    Ok(())
}
