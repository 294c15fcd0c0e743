//! Command-line interface for Stagehand.
//!
//! # Commands
//!
//! - `themes discover` - scan the themes directory
//! - `themes list` - installed themes, marking the active one
//! - `themes install <slug> | --all` - register discovered themes
//! - `themes activate <slug>` - make one theme the active theme
//! - `themes uninstall <slug>` - remove an inactive theme
//! - `themes publish <slug> | --all` - copy theme assets to the public directory
//! - `render <post|page|index> <file>` - render a content file with the active theme
//! - `config show | init | path` - inspect the engine configuration
//!
//! # Global options
//!
//! ```bash
//! stagehand --config ./site/stagehand.toml themes list
//! stagehand --verbose render page content/about.md
//! stagehand --quiet --no-progress themes publish --all
//! ```

pub mod common;
pub mod config;
pub mod render;
pub mod themes;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Environment variable that disables progress bars.
pub const NO_PROGRESS_ENV_VAR: &str = "STAGEHAND_NO_PROGRESS";

/// Settings derived from the global flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log level for the subscriber; `None` leaves `RUST_LOG` in charge
    pub log_level: Option<String>,
    /// Disable progress bars
    pub no_progress: bool,
    /// Explicit config file
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply process-wide settings. Call once, before any threads are spawned.
    pub fn apply_to_env(&self) {
        if self.no_progress {
            // SAFETY: called from main before the command starts any work
            unsafe {
                std::env::set_var(NO_PROGRESS_ENV_VAR, "1");
            }
        }
    }
}

/// Stagehand - theme registry and template resolution for content sites.
#[derive(Parser)]
#[command(name = "stagehand", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to stagehand.toml (defaults to $STAGEHAND_CONFIG, then ./stagehand.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable progress bars
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover, install, activate and publish themes
    Themes(themes::ThemesCommand),

    /// Render a content file with the active theme
    Render(render::RenderCommand),

    /// Inspect the engine configuration
    Config(config::ConfigCommand),
}

impl Cli {
    /// Execute the parsed command.
    ///
    /// # Errors
    ///
    /// Returns the command's error; `main` turns it into a user-facing message.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Translate the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            Some("error".to_string())
        } else {
            None
        };

        CliConfig {
            log_level,
            no_progress: self.no_progress || self.quiet,
            config_path: self.config.clone(),
        }
    }

    /// Execute with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns the command's error.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.apply_to_env();

        match self.command {
            Commands::Themes(cmd) => cmd.execute(config.config_path, self.quiet).await,
            Commands::Render(cmd) => cmd.execute(config.config_path).await,
            Commands::Config(cmd) => cmd.execute(config.config_path).await,
        }
    }
}
