//! Theme lifecycle: discover, install, activate, publish, uninstall.
//!
//! ```text
//! Discovered ──install──▶ Installed ──activate──▶ Active
//!                             │  ▲                  │
//!                             │  └────activate(other)┘
//!                             └──uninstall──▶ (record removed)
//! ```
//!
//! Reads of the active theme and the installed list go through the shared
//! [`LookupCache`]; every mutation evicts those keys so the next read comes
//! from the store. Operations that admin surfaces call as yes/no actions
//! (`activate_theme`, `uninstall_theme`, `publish_assets`,
//! `publish_all_assets`) return `bool` and log the failure; their `try_*`
//! counterparts return the typed error.

use std::path::PathBuf;
use std::sync::Arc;

use super::assets::{AssetPublisher, PublishOutcome};
use super::discovery::{DiscoveredTheme, DiscoveryReport, discover};
use super::model::Theme;
use super::store::{JsonThemeStore, ThemeStore};
use crate::cache::{CacheKey, LookupCache};
use crate::config::EngineConfig;
use crate::core::StagehandError;
use crate::utils::progress::ProgressBar;

/// Fallback favicon when a theme ships none.
pub const DEFAULT_FAVICON_URL: &str = "/favicon.ico";

/// Per-item results of a batch operation.
#[derive(Debug, Clone)]
pub struct BatchReport<T> {
    pub succeeded: Vec<(String, T)>,
    pub failed: Vec<(String, StagehandError)>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<T> BatchReport<T> {
    fn record(&mut self, slug: &str, result: Result<T, StagehandError>) {
        match result {
            Ok(value) => self.succeeded.push((slug.to_string(), value)),
            Err(error) => self.failed.push((slug.to_string(), error)),
        }
    }

    /// True when no item failed (an empty batch counts as success).
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Owns the registry store, the asset publisher, and cached theme lookups.
#[derive(Clone)]
pub struct ThemeManager {
    store: Arc<dyn ThemeStore>,
    cache: LookupCache,
    publisher: AssetPublisher,
    config: EngineConfig,
}

impl std::fmt::Debug for ThemeManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeManager")
            .field("themes_dir", &self.config.paths.themes_dir)
            .field("public_dir", &self.config.paths.public_dir)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl ThemeManager {
    #[must_use]
    pub fn new(config: EngineConfig, store: Arc<dyn ThemeStore>, cache: LookupCache) -> Self {
        let publisher = AssetPublisher::new(&config.paths.themes_dir, &config.paths.public_dir);
        Self {
            store,
            cache,
            publisher,
            config,
        }
    }

    /// Manager backed by the JSON registry named in `config` and a fresh cache.
    #[must_use]
    pub fn from_config(config: EngineConfig) -> Self {
        let store = Arc::new(JsonThemeStore::new(&config.paths.registry));
        Self::new(config, store, LookupCache::new())
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub const fn cache(&self) -> &LookupCache {
        &self.cache
    }

    /// On-disk folder of an installed theme.
    #[must_use]
    pub fn theme_dir(&self, theme: &Theme) -> PathBuf {
        self.config.paths.themes_dir.join(&theme.directory_path)
    }

    /// The active theme, read through the cache.
    ///
    /// # Errors
    ///
    /// Propagates store failures; nothing is cached in that case.
    pub fn try_active_theme(&self) -> Result<Option<Theme>, StagehandError> {
        self.cache.get_or_compute(&CacheKey::ActiveTheme, self.config.cache.active_theme_ttl(), || {
            tracing::debug!("Loading active theme from registry");
            Ok(self.store.all()?.into_iter().find(|theme| theme.is_active && theme.is_installed))
        })
    }

    /// The active theme, or `None` when there is none or the registry is unreadable.
    #[must_use]
    pub fn active_theme(&self) -> Option<Theme> {
        self.try_active_theme().unwrap_or_else(|e| {
            tracing::warn!("Could not load the active theme: {}", e);
            None
        })
    }

    /// Installed themes ordered by slug, read through the cache.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn installed_themes(&self) -> Result<Vec<Theme>, StagehandError> {
        self.cache.get_or_compute(
            &CacheKey::InstalledThemes,
            self.config.cache.installed_themes_ttl(),
            || Ok(self.store.all()?.into_iter().filter(|theme| theme.is_installed).collect()),
        )
    }

    /// Registry record for `slug`, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn find_theme(&self, slug: &str) -> Result<Option<Theme>, StagehandError> {
        self.store.find(slug)
    }

    /// Scan the configured themes directory.
    ///
    /// # Errors
    ///
    /// Fails only if the themes directory exists but cannot be listed.
    pub fn discover_themes(&self) -> Result<DiscoveryReport, StagehandError> {
        discover(&self.config.paths.themes_dir)
    }

    /// Upsert the registry record for a discovered theme.
    ///
    /// Re-installing keeps the record's active flag. When the slug moves to a
    /// different directory, the old published assets are removed. Assets are
    /// published afterwards when `assets.publish_on_install` is set; a failed
    /// publish is logged and does not fail the install.
    ///
    /// # Errors
    ///
    /// Returns [`StagehandError::DirectoryConflict`] when another slug already
    /// owns the directory, or a store error.
    pub fn install_theme(
        &self,
        discovered: &DiscoveredTheme,
        installed_by: Option<&str>,
    ) -> Result<Theme, StagehandError> {
        let slug = discovered.slug();
        let records = self.store.all()?;

        if let Some(owner) = records
            .iter()
            .find(|t| t.directory_path == discovered.directory_name && t.slug != slug)
        {
            return Err(StagehandError::DirectoryConflict {
                directory: discovered.directory_name.clone(),
                existing: owner.slug.clone(),
                incoming: slug.to_string(),
            });
        }

        let previous = records.into_iter().find(|t| t.slug == slug);
        let mut theme = Theme::from_descriptor(
            discovered.config.clone(),
            &discovered.directory_name,
            installed_by,
        );
        theme.is_active = previous.as_ref().is_some_and(|p| p.is_active);

        self.store.upsert(theme.clone())?;
        self.invalidate();

        if let Some(previous) = &previous
            && previous.directory_path != theme.directory_path
        {
            tracing::info!(
                "Theme '{}' moved from directory '{}' to '{}'",
                slug,
                previous.directory_path,
                theme.directory_path
            );
            if let Err(e) = self.publisher.unpublish(slug, &previous.directory_path) {
                tracing::warn!("{}", e);
            }
        }

        tracing::info!(
            "Installed theme '{}' ({}) from '{}'",
            slug,
            theme.version,
            theme.directory_path
        );

        if self.config.assets.publish_on_install {
            self.publish_assets(&theme);
        }

        Ok(theme)
    }

    /// Discover and install every valid theme independently.
    ///
    /// # Errors
    ///
    /// Fails only if discovery itself fails; per-theme failures are in the report.
    pub fn install_all_themes(
        &self,
        installed_by: Option<&str>,
    ) -> Result<BatchReport<Theme>, StagehandError> {
        let discovery = self.discover_themes()?;
        let mut report = BatchReport::default();

        for discovered in &discovery.themes {
            let result = self.install_theme(discovered, installed_by);
            if let Err(e) = &result {
                tracing::warn!("Failed to install theme '{}': {}", discovered.slug(), e);
            }
            report.record(discovered.slug(), result);
        }

        Ok(report)
    }

    /// Make `slug` the only active theme.
    ///
    /// # Errors
    ///
    /// - [`StagehandError::ThemeNotFound`] when no record exists
    /// - [`StagehandError::ThemeNotInstalled`] when the record is not installed
    /// - [`StagehandError::ThemeFilesMissing`] when its directory is gone
    pub fn try_activate_theme(&self, slug: &str) -> Result<Theme, StagehandError> {
        let theme = self.store.find(slug)?.ok_or_else(|| StagehandError::ThemeNotFound {
            slug: slug.to_string(),
        })?;

        if !theme.is_installed {
            return Err(StagehandError::ThemeNotInstalled {
                slug: slug.to_string(),
            });
        }

        let dir = self.theme_dir(&theme);
        if !dir.is_dir() {
            return Err(StagehandError::ThemeFilesMissing {
                slug: slug.to_string(),
                path: dir.display().to_string(),
            });
        }

        let activated = self.store.activate_exclusive(slug);
        self.invalidate();
        let activated = activated?;

        tracing::info!("Activated theme '{}'", slug);
        Ok(activated)
    }

    /// [`Self::try_activate_theme`] as a yes/no action.
    pub fn activate_theme(&self, slug: &str) -> bool {
        match self.try_activate_theme(slug) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Cannot activate theme '{}': {}", slug, e);
                false
            }
        }
    }

    /// Remove an inactive theme's published assets and registry record.
    ///
    /// # Errors
    ///
    /// - [`StagehandError::ThemeNotFound`] when no record exists
    /// - [`StagehandError::ThemeIsActive`] for the active theme
    /// - [`StagehandError::AssetPublishFailed`] when the published folder cannot
    ///   be removed; the record is kept so the call can be retried
    pub fn try_uninstall_theme(&self, slug: &str) -> Result<Theme, StagehandError> {
        let theme = self.store.find(slug)?.ok_or_else(|| StagehandError::ThemeNotFound {
            slug: slug.to_string(),
        })?;

        if theme.is_active {
            return Err(StagehandError::ThemeIsActive {
                slug: slug.to_string(),
            });
        }

        self.publisher.unpublish(slug, &theme.directory_path)?;
        self.store.remove(slug)?;
        self.invalidate();

        tracing::info!("Uninstalled theme '{}'", slug);
        Ok(theme)
    }

    /// [`Self::try_uninstall_theme`] as a yes/no action.
    pub fn uninstall_theme(&self, slug: &str) -> bool {
        match self.try_uninstall_theme(slug) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Cannot uninstall theme '{}': {}", slug, e);
                false
            }
        }
    }

    /// Copy `theme`'s assets into the public directory.
    ///
    /// # Errors
    ///
    /// Returns [`StagehandError::AssetPublishFailed`] on I/O failure.
    pub fn try_publish_assets(&self, theme: &Theme) -> Result<PublishOutcome, StagehandError> {
        self.publisher.publish(theme)
    }

    /// [`Self::try_publish_assets`] as a yes/no action. A theme without
    /// assets publishes successfully.
    pub fn publish_assets(&self, theme: &Theme) -> bool {
        match self.try_publish_assets(theme) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("{}", e);
                false
            }
        }
    }

    /// Publish every installed theme, attempting all of them.
    ///
    /// # Errors
    ///
    /// Fails only if the installed list cannot be read.
    pub fn publish_all_assets_report(
        &self,
        progress: &ProgressBar,
    ) -> Result<BatchReport<PublishOutcome>, StagehandError> {
        let themes = self.installed_themes()?;
        let mut report = BatchReport::default();

        for theme in &themes {
            progress.set_message(theme.slug.clone());
            let result = self.try_publish_assets(theme);
            if let Err(e) = &result {
                tracing::warn!("{}", e);
            }
            report.record(&theme.slug, result);
            progress.inc(1);
        }

        Ok(report)
    }

    /// True only if every installed theme published successfully.
    pub fn publish_all_assets(&self) -> bool {
        match self.publish_all_assets_report(&ProgressBar::hidden()) {
            Ok(report) => report.all_succeeded(),
            Err(e) => {
                tracing::warn!("Cannot publish theme assets: {}", e);
                false
            }
        }
    }

    /// Public URL of `theme`'s published asset folder.
    #[must_use]
    pub fn asset_prefix(&self, theme: &Theme) -> String {
        format!("{}/{}", self.config.assets.base_url.trim_end_matches('/'), theme.directory_path)
    }

    /// Public URL of a file inside `theme`'s asset folder.
    #[must_use]
    pub fn asset_url(&self, theme: &Theme, relative: &str) -> String {
        format!("{}/{}", self.asset_prefix(theme), relative.trim_start_matches('/'))
    }

    /// Favicon URL from the theme's image assets, or [`DEFAULT_FAVICON_URL`].
    #[must_use]
    pub fn favicon_url(&self, theme: Option<&Theme>) -> String {
        theme
            .and_then(|t| t.assets.favicon().map(|icon| self.asset_url(t, icon)))
            .unwrap_or_else(|| DEFAULT_FAVICON_URL.to_string())
    }

    fn invalidate(&self) {
        self.cache.evict(&CacheKey::ActiveTheme);
        self.cache.evict(&CacheKey::InstalledThemes);
    }
}
