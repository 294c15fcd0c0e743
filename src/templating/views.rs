//! Namespaced view lookup.
//!
//! A theme's views live in `templates/` inside its folder. They are addressed
//! as `namespace::name`, where the namespace is either the theme slug or its
//! directory name:
//!
//! | Identifier | File |
//! |---|---|
//! | `aurora::pages/about` | `{themes_dir}/aurora/templates/pages/about.html` |
//! | `aurora-2024::pages/about` | `{themes_dir}/aurora-2024/templates/pages/about.html` |
//!
//! Both are probed, slug first, because older callers refer to a theme by
//! slug and newer ones by directory. When the two are equal only one probe is
//! made. The slug folder is only probed while it belongs to the theme: a
//! folder whose `theme.json` declares another slug (or cannot be read) is a
//! different theme's and is never used.

use std::fmt;
use std::path::{Path, PathBuf};

use super::utils::is_safe_logical_name;
use crate::theme::{DESCRIPTOR_FILE, Theme, load_descriptor};

/// Folder holding a theme's view files.
pub const TEMPLATES_DIR: &str = "templates";

/// File extension of view files.
pub const VIEW_EXTENSION: &str = "html";

/// One addressable view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRef {
    pub namespace: String,
    /// Logical name, e.g. `pages/about`
    pub name: String,
    /// Namespace root (`.../templates`)
    pub root: PathBuf,
}

impl ViewRef {
    /// `namespace::name`
    #[must_use]
    pub fn identifier(&self) -> String {
        format!("{}::{}", self.namespace, self.name)
    }

    /// Name of the view inside its root, as Tera knows it.
    #[must_use]
    pub fn template_name(&self) -> String {
        format!("{}.{}", self.name, VIEW_EXTENSION)
    }

    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.root.join(self.template_name())
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.path().is_file()
    }
}

impl fmt::Display for ViewRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.namespace, self.name)
    }
}

/// Maps themes and logical names to view files.
#[derive(Debug, Clone)]
pub struct ViewFinder {
    themes_dir: PathBuf,
}

impl ViewFinder {
    #[must_use]
    pub fn new(themes_dir: impl Into<PathBuf>) -> Self {
        Self {
            themes_dir: themes_dir.into(),
        }
    }

    #[must_use]
    pub fn themes_dir(&self) -> &Path {
        &self.themes_dir
    }

    /// Namespace roots for `theme`: slug first, then directory.
    #[must_use]
    pub fn namespaces(&self, theme: &Theme) -> Vec<(String, PathBuf)> {
        let mut namespaces = Vec::with_capacity(2);
        if theme.directory_path == theme.slug || self.slug_folder_is_own(theme) {
            namespaces.push((theme.slug.clone(), self.namespace_root(&theme.slug)));
        }
        if theme.directory_path != theme.slug {
            namespaces
                .push((theme.directory_path.clone(), self.namespace_root(&theme.directory_path)));
        }
        namespaces
    }

    /// Whether `{themes_dir}/{slug}` can serve views for `theme`, which lives
    /// in another folder.
    fn slug_folder_is_own(&self, theme: &Theme) -> bool {
        let descriptor = self.themes_dir.join(&theme.slug).join(DESCRIPTOR_FILE);
        if !descriptor.is_file() {
            return true;
        }

        match load_descriptor(&descriptor) {
            Ok(other) if other.slug == theme.slug => true,
            Ok(other) => {
                tracing::debug!(
                    "Folder '{}' belongs to theme '{}', not probing it for '{}'",
                    theme.slug,
                    other.slug,
                    theme.slug
                );
                false
            }
            Err(e) => {
                tracing::debug!("Not probing folder '{}' for views: {}", theme.slug, e);
                false
            }
        }
    }

    fn namespace_root(&self, namespace: &str) -> PathBuf {
        self.themes_dir.join(namespace).join(TEMPLATES_DIR)
    }

    /// View identifiers to probe for `logical_name`, in order.
    ///
    /// Unsafe names (`..`, absolute, backslashes) yield no candidates.
    #[must_use]
    pub fn candidates(&self, theme: &Theme, logical_name: &str) -> Vec<ViewRef> {
        if !is_safe_logical_name(logical_name) {
            tracing::debug!("Rejecting unsafe template name '{}'", logical_name);
            return Vec::new();
        }

        self.namespaces(theme)
            .into_iter()
            .map(|(namespace, root)| ViewRef {
                namespace,
                name: logical_name.to_string(),
                root,
            })
            .collect()
    }

    /// First candidate whose file exists.
    #[must_use]
    pub fn find(&self, theme: &Theme, logical_name: &str) -> Option<ViewRef> {
        self.candidates(theme, logical_name).into_iter().find(|view| {
            let exists = view.exists();
            tracing::debug!(view = %view, exists, "probing view");
            exists
        })
    }

    /// File named by the theme's template map for `logical_name`, when it is a
    /// native-engine component path that exists inside the theme folder.
    #[must_use]
    pub fn template_map_file(&self, theme: &Theme, logical_name: &str) -> Option<PathBuf> {
        let relative = theme.template_descriptor(logical_name)?.native_path()?;
        if !is_safe_logical_name(relative) {
            tracing::warn!(
                "Theme '{}' maps '{}' to unsafe path '{}'",
                theme.slug,
                logical_name,
                relative
            );
            return None;
        }

        let path = self.themes_dir.join(&theme.directory_path).join(relative);
        if path.is_file() {
            Some(path)
        } else {
            tracing::debug!("Template map file {} does not exist", path.display());
            None
        }
    }

    /// The theme's own view root, used to resolve `extends`/`include` from
    /// template-map files.
    #[must_use]
    pub fn directory_root(&self, theme: &Theme) -> PathBuf {
        self.namespace_root(&theme.directory_path)
    }
}
