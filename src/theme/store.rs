//! Theme registry storage.
//!
//! [`ThemeStore`] is the persistence seam of the lifecycle manager. Two
//! implementations ship with the crate:
//!
//! - [`MemoryThemeStore`]: a map behind one `RwLock`, for embedding and tests
//! - [`JsonThemeStore`]: a JSON file rewritten atomically on every change
//!
//! Both implement [`ThemeStore::activate_exclusive`] as a single update
//! (one write lock, or one file replacement), so no reader ever observes two
//! active themes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use super::model::Theme;
use crate::core::StagehandError;
use crate::utils::fs::{read_json_file, write_json_file};

/// Persistence for theme records, keyed by slug.
pub trait ThemeStore: Send + Sync {
    /// Every record, ordered by slug.
    fn all(&self) -> Result<Vec<Theme>, StagehandError>;

    fn find(&self, slug: &str) -> Result<Option<Theme>, StagehandError> {
        Ok(self.all()?.into_iter().find(|theme| theme.slug == slug))
    }

    /// Insert or replace the record for `theme.slug`, returning the previous one.
    fn upsert(&self, theme: Theme) -> Result<Option<Theme>, StagehandError>;

    /// Delete the record for `slug`, returning it.
    fn remove(&self, slug: &str) -> Result<Option<Theme>, StagehandError>;

    /// Mark `slug` active and every other record inactive in one update.
    ///
    /// Fails with [`StagehandError::ThemeNotFound`] without touching any record
    /// when `slug` is unknown.
    fn activate_exclusive(&self, slug: &str) -> Result<Theme, StagehandError>;
}

fn flip_active(themes: &mut BTreeMap<String, Theme>, slug: &str) -> Result<Theme, StagehandError> {
    if !themes.contains_key(slug) {
        return Err(StagehandError::ThemeNotFound {
            slug: slug.to_string(),
        });
    }
    for theme in themes.values_mut() {
        theme.is_active = theme.slug == slug;
    }
    themes.get(slug).cloned().ok_or_else(|| StagehandError::ThemeNotFound {
        slug: slug.to_string(),
    })
}

/// In-memory registry.
#[derive(Debug, Default)]
pub struct MemoryThemeStore {
    themes: RwLock<BTreeMap<String, Theme>>,
}

impl MemoryThemeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> StagehandError {
        StagehandError::RegistryError {
            path: "memory".to_string(),
            reason: "registry lock poisoned".to_string(),
        }
    }
}

impl ThemeStore for MemoryThemeStore {
    fn all(&self) -> Result<Vec<Theme>, StagehandError> {
        let themes = self.themes.read().map_err(|_| Self::poisoned())?;
        Ok(themes.values().cloned().collect())
    }

    fn find(&self, slug: &str) -> Result<Option<Theme>, StagehandError> {
        let themes = self.themes.read().map_err(|_| Self::poisoned())?;
        Ok(themes.get(slug).cloned())
    }

    fn upsert(&self, theme: Theme) -> Result<Option<Theme>, StagehandError> {
        let mut themes = self.themes.write().map_err(|_| Self::poisoned())?;
        Ok(themes.insert(theme.slug.clone(), theme))
    }

    fn remove(&self, slug: &str) -> Result<Option<Theme>, StagehandError> {
        let mut themes = self.themes.write().map_err(|_| Self::poisoned())?;
        Ok(themes.remove(slug))
    }

    fn activate_exclusive(&self, slug: &str) -> Result<Theme, StagehandError> {
        let mut themes = self.themes.write().map_err(|_| Self::poisoned())?;
        flip_active(&mut themes, slug)
    }
}

/// On-disk registry format.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryFile {
    #[serde(default = "registry_format_version")]
    version: u32,
    #[serde(default)]
    themes: Vec<Theme>,
}

const fn registry_format_version() -> u32 {
    1
}

/// Registry persisted as a pretty-printed JSON file.
///
/// Every mutation reads the file, applies the change, and replaces the file
/// through a temp-file rename. A process-local mutex serializes mutations from
/// the same process; separate processes rely on the rename being atomic.
#[derive(Debug)]
pub struct JsonThemeStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonThemeStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn registry_error(&self, reason: impl std::fmt::Display) -> StagehandError {
        StagehandError::RegistryError {
            path: self.path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    fn load(&self) -> Result<BTreeMap<String, Theme>, StagehandError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let file: RegistryFile =
            read_json_file(&self.path).map_err(|e| self.registry_error(format!("{e:#}")))?;
        Ok(file.themes.into_iter().map(|theme| (theme.slug.clone(), theme)).collect())
    }

    fn save(&self, themes: &BTreeMap<String, Theme>) -> Result<(), StagehandError> {
        let file = RegistryFile {
            version: registry_format_version(),
            themes: themes.values().cloned().collect(),
        };
        write_json_file(&self.path, &file, true).map_err(|e| self.registry_error(format!("{e:#}")))
    }

    fn mutate<R>(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, Theme>) -> Result<R, StagehandError>,
    ) -> Result<R, StagehandError> {
        let _guard = self.write_lock.lock().map_err(|_| self.registry_error("lock poisoned"))?;
        let mut themes = self.load()?;
        let result = change(&mut themes)?;
        self.save(&themes)?;
        Ok(result)
    }
}

impl ThemeStore for JsonThemeStore {
    fn all(&self) -> Result<Vec<Theme>, StagehandError> {
        Ok(self.load()?.into_values().collect())
    }

    fn find(&self, slug: &str) -> Result<Option<Theme>, StagehandError> {
        Ok(self.load()?.remove(slug))
    }

    fn upsert(&self, theme: Theme) -> Result<Option<Theme>, StagehandError> {
        self.mutate(|themes| Ok(themes.insert(theme.slug.clone(), theme)))
    }

    fn remove(&self, slug: &str) -> Result<Option<Theme>, StagehandError> {
        self.mutate(|themes| Ok(themes.remove(slug)))
    }

    fn activate_exclusive(&self, slug: &str) -> Result<Theme, StagehandError> {
        self.mutate(|themes| flip_active(themes, slug))
    }
}
