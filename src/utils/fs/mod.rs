//! File system utilities for theme discovery, asset publishing, and registry storage.
//!
//! # Examples
//!
//! ```rust,no_run
//! use stagehand_cli::utils::fs::{ensure_dir, replace_dir, safe_write};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! ensure_dir(Path::new("public/themes"))?;
//! replace_dir(Path::new("themes/aurora/assets"), Path::new("public/themes/aurora"))?;
//! safe_write(Path::new(".stagehand/registry.json"), "{\"themes\":[]}")?;
//! # Ok(())
//! # }
//! ```

pub mod atomic;
pub mod dirs;
pub mod formats;

// Directory operations
pub use dirs::{copy_dir, ensure_dir, ensure_parent_dir, remove_dir_all, replace_dir};

// Atomic write operations
pub use atomic::{atomic_write, safe_write};

// Format-specific I/O
pub use formats::{read_json_file, read_text_file, write_json_file, write_text_file};
