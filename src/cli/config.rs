//! `stagehand config` - show or create the engine configuration.
//!
//! ```bash
//! stagehand config            # same as `config show`
//! stagehand config init       # write ./stagehand.toml with defaults
//! stagehand config path
//! ```

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{DEFAULT_CONFIG_FILE, EngineConfig};
use crate::utils::fs::safe_write;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: Option<ConfigSubcommands>,
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Print the effective configuration
    Show,

    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the config file location
    Path,
}

impl ConfigCommand {
    /// # Errors
    ///
    /// Fails when the config cannot be loaded or written.
    pub async fn execute(self, config_path: Option<PathBuf>) -> Result<()> {
        match self.command {
            Some(ConfigSubcommands::Show) | None => show(config_path).await,
            Some(ConfigSubcommands::Init {
                force,
            }) => init(config_path, force),
            Some(ConfigSubcommands::Path) => {
                println!("{}", config_path.unwrap_or_else(EngineConfig::default_path).display());
                Ok(())
            }
        }
    }
}

async fn show(config_path: Option<PathBuf>) -> Result<()> {
    let path = config_path.clone().unwrap_or_else(EngineConfig::default_path);
    let config = EngineConfig::load_with_optional(config_path).await?;

    println!("{}", "Stagehand Configuration".bold());
    if path.exists() {
        println!("Location: {}\n", path.display());
    } else {
        println!("Location: {} {}\n", path.display(), "(not found, using defaults)".dimmed());
    }
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn init(config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    if path.exists() && !force {
        println!("❌ Config already exists at: {}", path.display());
        println!("   Use --force to overwrite");
        return Ok(());
    }

    // Relative defaults, so the file stays valid wherever the site lives
    let config = EngineConfig::default();
    let content = toml::to_string_pretty(&config).context("Failed to serialize config")?;
    safe_write(&path, &content)?;

    println!("✅ Created config at: {}", path.display());
    Ok(())
}
