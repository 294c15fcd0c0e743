//! `stagehand themes` - theme lifecycle commands.
//!
//! ```bash
//! stagehand themes discover
//! stagehand themes install aurora --by alex
//! stagehand themes install --all
//! stagehand themes activate aurora
//! stagehand themes publish --all
//! stagehand themes uninstall minimal
//! stagehand themes list
//! ```
//!
//! `activate` and `uninstall` exit with status 1 when the action is refused
//! (unknown slug, theme not installed, theme files missing, theme active).

use anyhow::{Result, anyhow};
use clap::{Args, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use super::common::{explain, load_manager};
use crate::core::StagehandError;
use crate::theme::{BatchReport, PublishOutcome, ThemeManager};
use crate::utils::progress::ProgressBar;

#[derive(Args)]
pub struct ThemesCommand {
    #[command(subcommand)]
    command: ThemesSubcommands,
}

#[derive(Subcommand)]
enum ThemesSubcommands {
    /// Scan the themes directory for theme.json descriptors
    Discover,

    /// Show installed themes
    List,

    /// Register a discovered theme (or every discovered theme)
    Install {
        /// Theme slug as declared in theme.json
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        slug: Option<String>,

        /// Install every discovered theme
        #[arg(long)]
        all: bool,

        /// Who performed the install
        #[arg(long = "by", value_name = "INSTALLER")]
        installed_by: Option<String>,
    },

    /// Make a theme the active theme
    Activate {
        slug: String,
    },

    /// Remove an inactive theme and its published assets
    Uninstall {
        slug: String,
    },

    /// Copy theme assets to the public directory
    Publish {
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        slug: Option<String>,

        /// Publish every installed theme
        #[arg(long)]
        all: bool,
    },
}

impl ThemesCommand {
    /// # Errors
    ///
    /// Returns an error when the command fails; refused lifecycle actions are
    /// errors so the process exits non-zero.
    pub async fn execute(self, config_path: Option<PathBuf>, quiet: bool) -> Result<()> {
        let manager = load_manager(config_path).await?;

        match self.command {
            ThemesSubcommands::Discover => discover(&manager),
            ThemesSubcommands::List => list(&manager),
            ThemesSubcommands::Install {
                slug,
                all,
                installed_by,
            } => {
                if all {
                    install_all(&manager, installed_by.as_deref())
                } else {
                    let slug = slug.as_deref().unwrap_or_default();
                    install_one(&manager, slug, installed_by.as_deref())
                }
            }
            ThemesSubcommands::Activate {
                slug,
            } => activate(&manager, &slug),
            ThemesSubcommands::Uninstall {
                slug,
            } => uninstall(&manager, &slug),
            ThemesSubcommands::Publish {
                slug,
                all,
            } => {
                if all {
                    publish_all(&manager, quiet)
                } else {
                    publish_one(&manager, slug.as_deref().unwrap_or_default())
                }
            }
        }
    }
}

fn discover(manager: &ThemeManager) -> Result<()> {
    let report = manager.discover_themes()?;
    let themes_dir = &manager.config().paths.themes_dir;

    if report.themes.is_empty() && report.skipped.is_empty() {
        println!("No themes found in {}", themes_dir.display());
        return Ok(());
    }

    println!("{}", format!("Themes in {}", themes_dir.display()).bold());
    for theme in &report.themes {
        let version = theme.config.version.as_deref().unwrap_or("1.0.0");
        println!(
            "  {} {} {} {}",
            "✓".green(),
            theme.slug().bold(),
            format!("v{version}").dimmed(),
            format!("({})", theme.directory_name).dimmed()
        );
    }
    for skipped in &report.skipped {
        println!("  {} {} {}", "✗".red(), skipped.directory_name.yellow(), skipped.reason);
    }
    Ok(())
}

fn list(manager: &ThemeManager) -> Result<()> {
    let themes = manager.installed_themes()?;
    if themes.is_empty() {
        println!("No themes installed.");
        println!("\n{}", "Tip:".yellow());
        println!("  Run 'stagehand themes install --all' to install discovered themes");
        return Ok(());
    }

    for theme in &themes {
        let marker = if theme.is_active {
            "●".green().to_string()
        } else {
            " ".to_string()
        };
        let installed = theme
            .installed_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "{} {} {} {} {}",
            marker,
            theme.slug.bold(),
            format!("v{}", theme.version).dimmed(),
            theme.name,
            installed.dimmed()
        );
    }
    Ok(())
}

/// Slugs a mistyped slug could have meant: discovered and installed ones.
fn known_slugs(manager: &ThemeManager) -> Vec<String> {
    let mut slugs: Vec<String> = manager
        .discover_themes()
        .map(|report| report.slugs().into_iter().map(str::to_string).collect())
        .unwrap_or_default();
    if let Ok(themes) = manager.installed_themes() {
        slugs.extend(themes.into_iter().map(|t| t.slug));
    }
    slugs.sort();
    slugs.dedup();
    slugs
}

fn refuse(manager: &ThemeManager, error: StagehandError) -> anyhow::Error {
    anyhow!(explain(error, &known_slugs(manager)))
}

fn install_one(manager: &ThemeManager, slug: &str, installed_by: Option<&str>) -> Result<()> {
    let report = manager.discover_themes()?;
    let Some(discovered) = report.get(slug) else {
        return Err(refuse(
            manager,
            StagehandError::ThemeNotFound {
                slug: slug.to_string(),
            },
        ));
    };

    let theme = manager.install_theme(discovered, installed_by).map_err(|e| refuse(manager, e))?;
    println!(
        "✅ Installed {} v{} from '{}'",
        theme.slug.bold(),
        theme.version,
        theme.directory_path
    );
    Ok(())
}

fn install_all(manager: &ThemeManager, installed_by: Option<&str>) -> Result<()> {
    let report = manager.install_all_themes(installed_by)?;
    print_batch("Installed", &report, |theme| format!("v{}", theme.version));
    finish_batch(&report, "install")
}

fn activate(manager: &ThemeManager, slug: &str) -> Result<()> {
    let theme = manager.try_activate_theme(slug).map_err(|e| refuse(manager, e))?;
    println!("✅ Activated {} ({})", theme.slug.bold(), theme.name);
    Ok(())
}

fn uninstall(manager: &ThemeManager, slug: &str) -> Result<()> {
    let theme = manager.try_uninstall_theme(slug).map_err(|e| refuse(manager, e))?;
    println!("✅ Uninstalled {}", theme.slug.bold());
    Ok(())
}

fn describe_publish(outcome: &PublishOutcome) -> String {
    match outcome {
        PublishOutcome::Published(count) => format!("{count} files"),
        PublishOutcome::NothingToPublish => "no assets".to_string(),
    }
}

fn publish_one(manager: &ThemeManager, slug: &str) -> Result<()> {
    let theme = manager
        .find_theme(slug)?
        .ok_or_else(|| {
            refuse(
                manager,
                StagehandError::ThemeNotFound {
                    slug: slug.to_string(),
                },
            )
        })?;

    let outcome = manager.try_publish_assets(&theme).map_err(|e| refuse(manager, e))?;
    println!("✅ Published {} ({})", theme.slug.bold(), describe_publish(&outcome));
    Ok(())
}

fn publish_all(manager: &ThemeManager, quiet: bool) -> Result<()> {
    let count = manager.installed_themes()?.len() as u64;
    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(count)
    };

    let report = manager.publish_all_assets_report(&progress)?;
    progress.finish_and_clear();

    print_batch("Published", &report, describe_publish);
    finish_batch(&report, "publish")
}

fn print_batch<T>(verb: &str, report: &BatchReport<T>, describe: impl Fn(&T) -> String) {
    if report.is_empty() {
        println!("Nothing to do.");
        return;
    }
    for (slug, value) in &report.succeeded {
        println!("  {} {} {} {}", "✓".green(), verb, slug.bold(), describe(value).dimmed());
    }
    for (slug, error) in &report.failed {
        println!("  {} {} {}", "✗".red(), slug.bold(), error);
    }
}

fn finish_batch<T>(report: &BatchReport<T>, action: &str) -> Result<()> {
    if report.all_succeeded() {
        return Ok(());
    }
    Err(anyhow!(
        "{} of {} themes failed to {}",
        report.failed.len(),
        report.len(),
        action
    ))
}
