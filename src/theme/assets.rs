//! Publishing theme assets into the public directory.
//!
//! The source is `{themes_dir}/{directory_path}/assets`; the destination is
//! `{public_dir}/{directory_path}`. Both are keyed by directory, not slug.

use std::path::{Component, Path, PathBuf};

use super::model::Theme;
use crate::core::StagehandError;
use crate::utils::fs::{remove_dir_all, replace_dir};

/// Name of the asset folder inside a theme directory.
pub const ASSETS_DIR: &str = "assets";

/// Where a theme's assets are read from and published to.
#[derive(Debug, Clone)]
pub struct AssetPublisher {
    themes_dir: PathBuf,
    public_dir: PathBuf,
}

/// Result of one publish call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Number of files copied
    Published(usize),
    /// The theme has no `assets/` folder
    NothingToPublish,
}

impl AssetPublisher {
    #[must_use]
    pub fn new(themes_dir: impl Into<PathBuf>, public_dir: impl Into<PathBuf>) -> Self {
        Self {
            themes_dir: themes_dir.into(),
            public_dir: public_dir.into(),
        }
    }

    /// Source asset folder for a theme directory.
    #[must_use]
    pub fn source_dir(&self, directory_path: &str) -> PathBuf {
        self.themes_dir.join(directory_path).join(ASSETS_DIR)
    }

    /// Published folder for a theme directory.
    #[must_use]
    pub fn published_dir(&self, directory_path: &str) -> PathBuf {
        self.public_dir.join(directory_path)
    }

    /// Replace the published copy of `theme`'s assets.
    ///
    /// # Errors
    ///
    /// Returns [`StagehandError::AssetPublishFailed`] if the directory name is
    /// unsafe or the copy fails.
    pub fn publish(&self, theme: &Theme) -> Result<PublishOutcome, StagehandError> {
        ensure_plain_directory(theme)?;

        let source = self.source_dir(&theme.directory_path);
        if !source.is_dir() {
            tracing::debug!("Theme '{}' has no assets directory, nothing to publish", theme.slug);
            return Ok(PublishOutcome::NothingToPublish);
        }

        let destination = self.published_dir(&theme.directory_path);
        let copied =
            replace_dir(&source, &destination).map_err(|e| StagehandError::AssetPublishFailed {
                slug: theme.slug.clone(),
                reason: format!("{e:#}"),
            })?;

        tracing::info!(
            "Published {} asset file(s) for theme '{}' to {}",
            copied,
            theme.slug,
            destination.display()
        );
        Ok(PublishOutcome::Published(copied))
    }

    /// Remove the published folder for `directory_path` if present.
    ///
    /// # Errors
    ///
    /// Returns [`StagehandError::AssetPublishFailed`] when removal fails.
    pub fn unpublish(&self, slug: &str, directory_path: &str) -> Result<(), StagehandError> {
        if !is_plain_component(directory_path) {
            return Err(StagehandError::AssetPublishFailed {
                slug: slug.to_string(),
                reason: format!("refusing to remove unsafe directory '{directory_path}'"),
            });
        }

        let published = self.published_dir(directory_path);
        remove_dir_all(&published).map_err(|e| StagehandError::AssetPublishFailed {
            slug: slug.to_string(),
            reason: format!("{e:#}"),
        })?;
        tracing::debug!("Removed published assets at {}", published.display());
        Ok(())
    }
}

fn ensure_plain_directory(theme: &Theme) -> Result<(), StagehandError> {
    if is_plain_component(&theme.directory_path) {
        Ok(())
    } else {
        Err(StagehandError::AssetPublishFailed {
            slug: theme.slug.clone(),
            reason: format!("unsafe theme directory '{}'", theme.directory_path),
        })
    }
}

/// A single normal path component: no separators, `..`, or root.
fn is_plain_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(components.next(), Some(Component::Normal(_))) && components.next().is_none()
}
