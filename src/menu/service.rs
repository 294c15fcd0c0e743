//! Cached menu lookups.
//!
//! Reads go through the lookup cache under `menu:slug:<slug>` and
//! `menu:location:<location>`. Saving or deleting a menu evicts its slug key
//! and the location keys of both the stored and the new record, so moving a
//! menu between locations never leaves the old location pointing at it.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use super::model::Menu;
use crate::cache::{CacheKey, LookupCache};
use crate::core::StagehandError;

/// Persistence for menus.
pub trait MenuStore: Send + Sync {
    fn all(&self) -> Result<Vec<Menu>, StagehandError>;

    fn find_by_slug(&self, slug: &str) -> Result<Option<Menu>, StagehandError> {
        Ok(self.all()?.into_iter().find(|m| m.slug == slug))
    }

    fn find_by_location(&self, location: &str) -> Result<Option<Menu>, StagehandError> {
        Ok(self.all()?.into_iter().find(|m| m.location.as_deref() == Some(location)))
    }

    /// Insert or replace by slug, returning the previous record.
    fn save(&self, menu: Menu) -> Result<Option<Menu>, StagehandError>;

    /// Remove by slug, returning the removed record.
    fn delete(&self, slug: &str) -> Result<Option<Menu>, StagehandError>;
}

/// In-memory menu store.
#[derive(Debug, Default)]
pub struct MemoryMenuStore {
    menus: RwLock<BTreeMap<String, Menu>>,
}

impl MemoryMenuStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_menus(menus: impl IntoIterator<Item = Menu>) -> Self {
        Self {
            menus: RwLock::new(menus.into_iter().map(|m| (m.slug.clone(), m)).collect()),
        }
    }

    fn poisoned() -> StagehandError {
        StagehandError::Other {
            message: "menu store lock poisoned".to_string(),
        }
    }
}

impl MenuStore for MemoryMenuStore {
    fn all(&self) -> Result<Vec<Menu>, StagehandError> {
        Ok(self.menus.read().map_err(|_| Self::poisoned())?.values().cloned().collect())
    }

    fn find_by_slug(&self, slug: &str) -> Result<Option<Menu>, StagehandError> {
        Ok(self.menus.read().map_err(|_| Self::poisoned())?.get(slug).cloned())
    }

    fn save(&self, menu: Menu) -> Result<Option<Menu>, StagehandError> {
        Ok(self.menus.write().map_err(|_| Self::poisoned())?.insert(menu.slug.clone(), menu))
    }

    fn delete(&self, slug: &str) -> Result<Option<Menu>, StagehandError> {
        Ok(self.menus.write().map_err(|_| Self::poisoned())?.remove(slug))
    }
}

/// Menu lookups shared by the rendering pipeline and admin tooling.
#[derive(Clone)]
pub struct MenuService {
    store: Arc<dyn MenuStore>,
    cache: LookupCache,
    ttl: Duration,
}

impl std::fmt::Debug for MenuService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuService").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl MenuService {
    #[must_use]
    pub fn new(store: Arc<dyn MenuStore>, cache: LookupCache, ttl: Duration) -> Self {
        Self {
            store,
            cache,
            ttl,
        }
    }

    /// # Errors
    ///
    /// Propagates store failures.
    pub fn menu_by_slug(&self, slug: &str) -> Result<Option<Menu>, StagehandError> {
        self.cache.get_or_compute(&CacheKey::MenuBySlug(slug.to_string()), self.ttl, || {
            self.store.find_by_slug(slug)
        })
    }

    /// # Errors
    ///
    /// Propagates store failures.
    pub fn menu_by_location(&self, location: &str) -> Result<Option<Menu>, StagehandError> {
        self.cache.get_or_compute(&CacheKey::MenuByLocation(location.to_string()), self.ttl, || {
            self.store.find_by_location(location)
        })
    }

    /// Menu for `location`, with store failures logged and treated as absent.
    #[must_use]
    pub fn menu_for(&self, location: &str) -> Option<Menu> {
        self.menu_by_location(location).unwrap_or_else(|e| {
            tracing::warn!("Could not load menu for location '{}': {}", location, e);
            None
        })
    }

    /// # Errors
    ///
    /// Propagates store failures. Affected keys are evicted either way.
    pub fn save_menu(&self, menu: Menu) -> Result<(), StagehandError> {
        let slug = menu.slug.clone();
        let location = menu.location.clone();
        let result = self.store.save(menu);
        if let Ok(Some(previous)) = &result {
            self.evict_location(previous.location.as_deref());
        }
        self.evict_location(location.as_deref());
        self.cache.evict(&CacheKey::MenuBySlug(slug));
        result.map(|_| ())
    }

    /// Returns whether a menu was removed.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn delete_menu(&self, slug: &str) -> Result<bool, StagehandError> {
        let removed = self.store.delete(slug);
        if let Ok(Some(menu)) = &removed {
            self.evict_location(menu.location.as_deref());
        }
        self.cache.evict(&CacheKey::MenuBySlug(slug.to_string()));
        removed.map(|menu| menu.is_some())
    }

    fn evict_location(&self, location: Option<&str>) {
        if let Some(location) = location {
            self.cache.evict(&CacheKey::MenuByLocation(location.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::model::MenuNode;

    fn service() -> (MenuService, LookupCache) {
        let cache = LookupCache::new();
        let store = Arc::new(MemoryMenuStore::with_menus([Menu::new("main", "Main")
            .at("primary")
            .item(MenuNode::new(1, "Home").url("/"))]));
        (MenuService::new(store, cache.clone(), Duration::from_secs(60)), cache)
    }

    #[test]
    fn test_lookups_populate_cache() {
        let (service, cache) = service();
        assert_eq!(service.menu_by_slug("main").unwrap().unwrap().name, "Main");
        assert!(cache.contains(&CacheKey::MenuBySlug("main".into())));
        assert_eq!(service.menu_for("primary").unwrap().slug, "main");
        assert!(cache.contains(&CacheKey::MenuByLocation("primary".into())));
        assert!(service.menu_for("footer").is_none());
    }

    #[test]
    fn test_moving_menu_evicts_both_locations() {
        let (service, _) = service();
        assert!(service.menu_for("primary").is_some());
        assert!(service.menu_for("footer").is_none());

        service.save_menu(Menu::new("main", "Main").at("footer")).unwrap();

        assert!(service.menu_for("primary").is_none());
        assert_eq!(service.menu_for("footer").unwrap().slug, "main");
        assert_eq!(
            service.menu_by_slug("main").unwrap().unwrap().location.as_deref(),
            Some("footer")
        );
    }

    #[test]
    fn test_delete_evicts() {
        let (service, cache) = service();
        service.menu_for("primary");
        service.menu_by_slug("main").unwrap();

        assert!(service.delete_menu("main").unwrap());
        assert!(!cache.contains(&CacheKey::MenuByLocation("primary".into())));
        assert!(service.menu_for("primary").is_none());
        assert!(service.menu_by_slug("main").unwrap().is_none());
        assert!(!service.delete_menu("main").unwrap());
    }
}
