//! Directory helpers behind asset publishing.
//!
//! Publishing is [`replace_dir`]: the published copy is deleted and copied
//! again from the theme's `assets/` folder, so files removed from a theme
//! disappear from the public directory too.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Create `path` (and its parents) unless it is already a directory.
///
/// # Errors
///
/// Fails when `path` exists as something other than a directory, or cannot be
/// created.
///
/// ```rust,no_run
/// use stagehand_cli::utils::fs::ensure_dir;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// ensure_dir(Path::new("public/themes/aurora"))?;
/// # Ok(())
/// # }
/// ```
pub fn ensure_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    if path.exists() {
        bail!("Expected a directory but found a file at {}", path.display());
    }
    fs::create_dir_all(path).with_context(|| format!("Cannot create directory {}", path.display()))
}

/// [`ensure_dir`] on the parent of a file path. Bare file names are a no-op.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

/// Copy the regular files under `src` into `dst`, keeping relative paths, and
/// return how many were copied.
///
/// Symlinks are neither followed nor copied, so nothing outside a theme's
/// asset tree can end up in the public directory.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<usize> {
    ensure_dir(dst)?;

    let mut copied = 0;
    for entry in WalkDir::new(src).follow_links(false).min_depth(1) {
        let entry = entry.with_context(|| format!("Cannot walk {}", src.display()))?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            ensure_dir(&target)?;
        } else if entry.file_type().is_file() {
            ensure_parent_dir(&target)?;
            fs::copy(entry.path(), &target).with_context(|| {
                format!("Cannot copy {} to {}", entry.path().display(), target.display())
            })?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Swap `dst` for a fresh copy of `src`, returning the number of files copied.
pub fn replace_dir(src: &Path, dst: &Path) -> Result<usize> {
    remove_dir_all(dst)?;
    copy_dir(src, dst)
}

/// Remove `path` recursively. A missing path is not an error.
pub fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Cannot remove {}", path.display())),
    }
}
