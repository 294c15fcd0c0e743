//! Post type registry with cached lookups.
//!
//! Lookups are cached under `posttype:all` and `posttype:slug:<slug>`.
//! Registering or removing a type evicts every `posttype:` key.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::cache::{CacheKey, LookupCache, POST_TYPE_PREFIX};
use crate::core::StagehandError;

/// A kind of post (`post`, `event`, `recipe`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostType {
    pub slug: String,
    /// Singular label, e.g. "Event"
    pub label: String,
    #[serde(default)]
    pub plural_label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub has_archive: bool,
}

const fn default_true() -> bool {
    true
}

impl PostType {
    #[must_use]
    pub fn new(slug: &str, label: &str) -> Self {
        Self {
            slug: slug.to_string(),
            label: label.to_string(),
            plural_label: None,
            description: None,
            has_archive: true,
        }
    }
}

/// Persistence for post types.
pub trait PostTypeStore: Send + Sync {
    fn all(&self) -> Result<Vec<PostType>, StagehandError>;

    fn find(&self, slug: &str) -> Result<Option<PostType>, StagehandError> {
        Ok(self.all()?.into_iter().find(|t| t.slug == slug))
    }

    fn upsert(&self, post_type: PostType) -> Result<(), StagehandError>;

    fn remove(&self, slug: &str) -> Result<bool, StagehandError>;
}

/// In-memory post type store.
#[derive(Debug, Default)]
pub struct MemoryPostTypeStore {
    types: RwLock<BTreeMap<String, PostType>>,
}

impl MemoryPostTypeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `types`.
    #[must_use]
    pub fn with_types(types: impl IntoIterator<Item = PostType>) -> Self {
        Self {
            types: RwLock::new(types.into_iter().map(|t| (t.slug.clone(), t)).collect()),
        }
    }

    fn poisoned() -> StagehandError {
        StagehandError::Other {
            message: "post type store lock poisoned".to_string(),
        }
    }
}

impl PostTypeStore for MemoryPostTypeStore {
    fn all(&self) -> Result<Vec<PostType>, StagehandError> {
        Ok(self.types.read().map_err(|_| Self::poisoned())?.values().cloned().collect())
    }

    fn find(&self, slug: &str) -> Result<Option<PostType>, StagehandError> {
        Ok(self.types.read().map_err(|_| Self::poisoned())?.get(slug).cloned())
    }

    fn upsert(&self, post_type: PostType) -> Result<(), StagehandError> {
        self.types
            .write()
            .map_err(|_| Self::poisoned())?
            .insert(post_type.slug.clone(), post_type);
        Ok(())
    }

    fn remove(&self, slug: &str) -> Result<bool, StagehandError> {
        Ok(self.types.write().map_err(|_| Self::poisoned())?.remove(slug).is_some())
    }
}

/// Cached post type lookups.
#[derive(Clone)]
pub struct PostTypeService {
    store: Arc<dyn PostTypeStore>,
    cache: LookupCache,
    ttl: Duration,
}

impl std::fmt::Debug for PostTypeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostTypeService").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl PostTypeService {
    #[must_use]
    pub fn new(store: Arc<dyn PostTypeStore>, cache: LookupCache, ttl: Duration) -> Self {
        Self {
            store,
            cache,
            ttl,
        }
    }

    /// All post types.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn all(&self) -> Result<Vec<PostType>, StagehandError> {
        self.cache.get_or_compute(&CacheKey::PostTypes, self.ttl, || self.store.all())
    }

    /// One post type by slug.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn by_slug(&self, slug: &str) -> Result<Option<PostType>, StagehandError> {
        self.cache.get_or_compute(&CacheKey::PostTypeBySlug(slug.to_string()), self.ttl, || {
            self.store.find(slug)
        })
    }

    /// Display label for `slug`, falling back to the slug itself.
    #[must_use]
    pub fn label(&self, slug: &str) -> String {
        match self.by_slug(slug) {
            Ok(Some(post_type)) => post_type.label,
            Ok(None) => slug.to_string(),
            Err(e) => {
                tracing::warn!("Could not load post type '{}': {}", slug, e);
                slug.to_string()
            }
        }
    }

    /// Add or replace a post type.
    ///
    /// # Errors
    ///
    /// Propagates store failures; the cache is evicted either way.
    pub fn register(&self, post_type: PostType) -> Result<(), StagehandError> {
        let result = self.store.upsert(post_type);
        self.invalidate();
        result
    }

    /// Remove a post type. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Propagates store failures; the cache is evicted either way.
    pub fn remove(&self, slug: &str) -> Result<bool, StagehandError> {
        let result = self.store.remove(slug);
        self.invalidate();
        result
    }

    fn invalidate(&self) {
        self.cache.evict_prefix(POST_TYPE_PREFIX);
    }
}
