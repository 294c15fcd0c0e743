//! Cache key derivation shared by every reader and writer.
//!
//! Invalidation only works if the code that evicts after a mutation derives
//! exactly the same key string as the code that reads. All keys therefore come
//! from [`CacheKey`] and nowhere else.
//!
//! | Key | String form |
//! |-----|-------------|
//! | [`CacheKey::ActiveTheme`] | `theme:active` |
//! | [`CacheKey::InstalledThemes`] | `theme:installed` |
//! | [`CacheKey::MenuBySlug`] | `menu:slug:<slug>` |
//! | [`CacheKey::MenuByLocation`] | `menu:location:<location>` |
//! | [`CacheKey::PostTypes`] | `posttype:all` |
//! | [`CacheKey::PostTypeBySlug`] | `posttype:slug:<slug>` |

use std::fmt;

/// Prefix shared by every post-type key, used for bulk eviction.
pub const POST_TYPE_PREFIX: &str = "posttype:";

/// A cache key in the documented naming scheme.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The currently active theme (or its absence)
    ActiveTheme,
    /// Every installed theme record
    InstalledThemes,
    /// A menu looked up by slug
    MenuBySlug(String),
    /// The menu assigned to a theme location
    MenuByLocation(String),
    /// Every registered post type
    PostTypes,
    /// A post type looked up by slug
    PostTypeBySlug(String),
}

impl CacheKey {
    /// Derive the storage key string.
    #[must_use]
    pub fn as_key(&self) -> String {
        match self {
            Self::ActiveTheme => "theme:active".to_string(),
            Self::InstalledThemes => "theme:installed".to_string(),
            Self::MenuBySlug(slug) => format!("menu:slug:{slug}"),
            Self::MenuByLocation(location) => format!("menu:location:{location}"),
            Self::PostTypes => format!("{POST_TYPE_PREFIX}all"),
            Self::PostTypeBySlug(slug) => format!("{POST_TYPE_PREFIX}slug:{slug}"),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_key_names() {
        assert_eq!(CacheKey::ActiveTheme.as_key(), "theme:active");
        assert_eq!(CacheKey::InstalledThemes.as_key(), "theme:installed");
        assert_eq!(CacheKey::MenuBySlug("main".into()).as_key(), "menu:slug:main");
        assert_eq!(
            CacheKey::MenuByLocation("footer".into()).to_string(),
            "menu:location:footer"
        );
        assert_eq!(CacheKey::PostTypes.as_key(), "posttype:all");
        assert_eq!(CacheKey::PostTypeBySlug("event".into()).as_key(), "posttype:slug:event");
    }

    #[test]
    fn test_post_type_keys_share_prefix() {
        assert!(CacheKey::PostTypes.as_key().starts_with(POST_TYPE_PREFIX));
        assert!(CacheKey::PostTypeBySlug("x".into()).as_key().starts_with(POST_TYPE_PREFIX));
    }
}
