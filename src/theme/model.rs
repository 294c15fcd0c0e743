//! Theme registry records and the typed shapes of a theme descriptor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Version recorded when a descriptor omits one.
pub const DEFAULT_THEME_VERSION: &str = "1.0.0";

/// Which engine renders a theme's templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EngineKind {
    /// Server-rendered Tera views
    #[default]
    NativeView,
    /// Client-side component bundles; never rendered by this engine
    Component,
    /// Any other engine tag; never rendered by this engine
    #[serde(other)]
    Other,
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NativeView => write!(f, "native-view"),
            Self::Component => write!(f, "component"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Structured template map entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    #[serde(default, alias = "engineKind")]
    pub engine: EngineKind,
    /// Path relative to the theme directory
    #[serde(alias = "componentPath")]
    pub component_path: String,
}

/// One value of a theme's `templates` map.
///
/// Descriptors written for older engines use a bare string; newer ones use an
/// object. Both shapes are accepted when the descriptor is read, so callers
/// only ever match on this enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplateEntry {
    Legacy(String),
    Component(ComponentDescriptor),
}

impl TemplateEntry {
    /// Theme-relative file path, when this entry is renderable by the native engine.
    ///
    /// Legacy references and component-engine entries yield `None`.
    #[must_use]
    pub fn native_path(&self) -> Option<&str> {
        match self {
            Self::Component(ComponentDescriptor {
                engine: EngineKind::NativeView,
                component_path,
            }) if !component_path.is_empty() => Some(component_path),
            _ => None,
        }
    }
}

/// Static files a theme ships, relative to its `assets/` directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetManifest {
    #[serde(default)]
    pub css: Vec<String>,
    #[serde(default)]
    pub js: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl AssetManifest {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.css.is_empty() && self.js.is_empty() && self.images.is_empty()
    }

    /// Image used as the favicon: a file named `favicon.*`, else the first `.ico`.
    #[must_use]
    pub fn favicon(&self) -> Option<&str> {
        let stem_is_favicon = |path: &&String| {
            std::path::Path::new(path.as_str())
                .file_stem()
                .is_some_and(|stem| stem.eq_ignore_ascii_case("favicon"))
        };
        let is_ico = |path: &&String| {
            std::path::Path::new(path.as_str())
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("ico"))
        };

        self.images
            .iter()
            .find(stem_is_favicon)
            .or_else(|| self.images.iter().find(is_ico))
            .map(String::as_str)
    }
}

/// Parsed contents of a `theme.json` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeDescriptor {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "templateEngine")]
    pub template_engine: EngineKind,
    #[serde(default)]
    pub templates: BTreeMap<String, TemplateEntry>,
    #[serde(default)]
    pub partials: BTreeMap<String, String>,
    #[serde(default)]
    pub assets: AssetManifest,
    #[serde(default)]
    pub customizer: BTreeMap<String, Value>,
    #[serde(default)]
    pub menus: BTreeMap<String, String>,
    #[serde(default, alias = "widgetAreas")]
    pub widget_areas: Vec<Value>,
    #[serde(default)]
    pub screenshot: Option<String>,
}

/// A theme as recorded in the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub slug: String,
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub template_engine: EngineKind,
    #[serde(default)]
    pub templates: BTreeMap<String, TemplateEntry>,
    #[serde(default)]
    pub partials: BTreeMap<String, String>,
    #[serde(default)]
    pub assets: AssetManifest,
    #[serde(default)]
    pub customizer: BTreeMap<String, Value>,
    #[serde(default)]
    pub menus: BTreeMap<String, String>,
    #[serde(default)]
    pub widget_areas: Vec<Value>,
    #[serde(default)]
    pub screenshot: Option<String>,
    /// Folder name under the themes root; may differ from `slug`
    pub directory_path: String,
    #[serde(default)]
    pub is_installed: bool,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub installed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub installed_by: Option<String>,
}

impl Theme {
    /// Build an installed, inactive record from a descriptor found in `directory_name`.
    #[must_use]
    pub fn from_descriptor(
        descriptor: ThemeDescriptor,
        directory_name: &str,
        installed_by: Option<&str>,
    ) -> Self {
        Self {
            slug: descriptor.slug,
            name: descriptor.name,
            version: descriptor.version.unwrap_or_else(|| DEFAULT_THEME_VERSION.to_string()),
            author: descriptor.author,
            description: descriptor.description,
            template_engine: descriptor.template_engine,
            templates: descriptor.templates,
            partials: descriptor.partials,
            assets: descriptor.assets,
            customizer: descriptor.customizer,
            menus: descriptor.menus,
            widget_areas: descriptor.widget_areas,
            screenshot: descriptor.screenshot,
            directory_path: directory_name.to_string(),
            is_installed: true,
            is_active: false,
            installed_at: Some(Utc::now()),
            installed_by: installed_by.map(str::to_string),
        }
    }

    /// Template map entry for a logical name.
    #[must_use]
    pub fn template_descriptor(&self, logical_name: &str) -> Option<&TemplateEntry> {
        self.templates.get(logical_name)
    }

    /// Customizer defaults as `{section: {setting: default}}`.
    ///
    /// A section may list its settings directly or under a `settings` key;
    /// settings without a `default` are left out.
    #[must_use]
    pub fn settings_defaults(&self) -> Value {
        let mut sections = Map::new();

        for (section_name, section) in &self.customizer {
            let settings = section.get("settings").filter(|s| s.is_object()).unwrap_or(section);
            let Some(settings) = settings.as_object() else {
                continue;
            };

            let defaults: Map<String, Value> = settings
                .iter()
                .filter_map(|(name, setting)| {
                    setting.get("default").map(|default| (name.clone(), default.clone()))
                })
                .collect();

            sections.insert(section_name.clone(), Value::Object(defaults));
        }

        Value::Object(sections)
    }

    /// Short summary exposed to templates as `theme`.
    #[must_use]
    pub fn summary(&self) -> Value {
        serde_json::json!({
            "slug": self.slug,
            "name": self.name,
            "version": self.version,
            "author": self.author,
        })
    }
}
