//! Engine configuration structure and loading.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

use crate::utils::expand_path;

/// Environment variable that points at an alternative config file.
pub const CONFIG_ENV_VAR: &str = "STAGEHAND_CONFIG";

/// Default config file name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "stagehand.toml";

/// Complete engine configuration.
///
/// Every section is optional in the file; missing sections take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EngineConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Filesystem locations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    /// Root directory scanned for theme folders
    pub themes_dir: PathBuf,
    /// Public directory that receives each theme's published assets
    pub public_dir: PathBuf,
    /// JSON registry of installed themes
    pub registry: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            themes_dir: PathBuf::from("themes"),
            public_dir: PathBuf::from("public/themes"),
            registry: PathBuf::from(".stagehand/registry.json"),
        }
    }
}

/// Site-wide values merged into every render context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    pub name: String,
    pub url: String,
    pub description: String,
    pub locale: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Stagehand".to_string(),
            url: "/".to_string(),
            description: String::new(),
            locale: "en".to_string(),
        }
    }
}

/// Asset publishing and URL settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetsConfig {
    /// URL prefix under which `public_dir` is served
    pub base_url: String,
    /// Publish a theme's assets right after installing it
    pub publish_on_install: bool,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            base_url: "/themes".to_string(),
            publish_on_install: true,
        }
    }
}

/// Lookup TTLs in seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    pub active_theme: u64,
    pub installed_themes: u64,
    pub menus: u64,
    pub post_types: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            active_theme: 3600,
            installed_themes: 3600,
            menus: 3600,
            post_types: 86400,
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub const fn active_theme_ttl(&self) -> Duration {
        Duration::from_secs(self.active_theme)
    }

    #[must_use]
    pub const fn installed_themes_ttl(&self) -> Duration {
        Duration::from_secs(self.installed_themes)
    }

    #[must_use]
    pub const fn menus_ttl(&self) -> Duration {
        Duration::from_secs(self.menus)
    }

    #[must_use]
    pub const fn post_types_ttl(&self) -> Duration {
        Duration::from_secs(self.post_types)
    }
}

impl EngineConfig {
    /// Defaults with every path placed under `root`.
    ///
    /// ```rust
    /// use stagehand_cli::config::EngineConfig;
    /// use std::path::Path;
    ///
    /// let config = EngineConfig::with_root(Path::new("/srv/site"));
    /// assert_eq!(config.paths.themes_dir, Path::new("/srv/site/themes"));
    /// ```
    #[must_use]
    pub fn with_root(root: &Path) -> Self {
        let mut config = Self::default();
        config.rebase(root);
        config
    }

    /// Load configuration following the lookup order described in [`crate::config`].
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or parsed.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = path.unwrap_or_else(Self::default_path);
        if path.exists() {
            Self::load_from(&path).await
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            let base = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            Ok(Self::with_root(&base))
        }
    }

    /// Load configuration from a specific file path.
    ///
    /// Relative paths in the file are resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read (permissions, not found, etc.)
    /// - The file contains invalid TOML syntax
    /// - The TOML structure doesn't match the expected schema
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        let base = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        config.rebase(&base);

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Config path from `STAGEHAND_CONFIG`, else `./stagehand.toml`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        std::env::var(CONFIG_ENV_VAR)
            .map(|raw| expand_path(&raw))
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Expand and anchor every configured path at `base`.
    fn rebase(&mut self, base: &Path) {
        let anchor = |path: &Path| -> PathBuf {
            let expanded = expand_path(&path.to_string_lossy());
            if expanded.is_absolute() {
                expanded
            } else {
                base.join(expanded)
            }
        };

        self.paths.themes_dir = anchor(&self.paths.themes_dir);
        self.paths.public_dir = anchor(&self.paths.public_dir);
        self.paths.registry = anchor(&self.paths.registry);
    }
}
