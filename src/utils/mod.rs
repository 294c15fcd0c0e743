//! Cross-platform utilities and helpers
//!
//! # Modules
//!
//! - [`fs`] - File system operations with atomic writes and wholesale directory replacement
//! - [`progress`] - Progress bars for batch theme operations

pub mod fs;
pub mod progress;

pub use fs::{atomic_write, copy_dir, ensure_dir, replace_dir, safe_write};
pub use progress::ProgressBar;

/// Expand `~` and `$VAR` references in a configured path.
///
/// Unknown variables are left untouched rather than failing, so a literal `$`
/// in a directory name still works.
pub fn expand_path(raw: &str) -> std::path::PathBuf {
    let expanded = shellexpand::full_with_context_no_errors(
        raw,
        || dirs::home_dir().map(|p| p.to_string_lossy().into_owned()),
        |var| std::env::var(var).ok(),
    );
    std::path::PathBuf::from(expanded.as_ref())
}
