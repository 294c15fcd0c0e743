//! Test utilities for Stagehand
//!
//! Helpers shared by unit tests and the integration suite (enable the
//! `test-utils` feature outside this crate):
//! - [`ThemeFixture`] writes complete theme folders into a temp directory
//! - [`init_test_logging`] routes `tracing` output through the test harness
//!
//! # Example
//!
//! ```rust,no_run
//! use stagehand_cli::test_utils::{ThemeFixture, init_test_logging};
//!
//! # fn example() -> anyhow::Result<()> {
//! init_test_logging(None);
//! let temp = tempfile::TempDir::new()?;
//! ThemeFixture::new("aurora").view("post", "{{ title }}").write(temp.path())?;
//! # Ok(())
//! # }
//! ```

pub mod fixtures;

pub use fixtures::ThemeFixture;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static LOGGING: Once = Once::new();

/// Route `tracing` output through the test harness, once per process.
///
/// `level` wins over `RUST_LOG`; with neither set nothing is installed and
/// tests run silently.
///
/// ```bash
/// RUST_LOG=stagehand_cli=debug cargo test -- --nocapture
/// ```
pub fn init_test_logging(level: Option<Level>) {
    LOGGING.call_once(|| {
        let filter = match level {
            Some(level) => EnvFilter::new(level.as_str()),
            None => match EnvFilter::try_from_default_env() {
                Ok(filter) => filter,
                Err(_) => return,
            },
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init();
    });
}
