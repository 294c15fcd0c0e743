//! Test fixtures for creating theme directories on disk.

use anyhow::{Context, Result};
use serde_json::{Map, Value, json};
use std::fs;
use std::path::{Path, PathBuf};

/// Builder for a theme folder: descriptor, view templates, and assets.
///
/// Asset files are also listed in the descriptor's `assets` manifest, sorted
/// into `css`, `js` or `images` by extension.
///
/// ```rust,no_run
/// use stagehand_cli::test_utils::ThemeFixture;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// ThemeFixture::new("aurora")
///     .view("post", "<article>{{ title }}</article>")
///     .asset("css/app.css", "body {}")
///     .write(Path::new("/tmp/site/themes"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct ThemeFixture {
    slug: String,
    directory: Option<String>,
    descriptor: Map<String, Value>,
    templates: Map<String, Value>,
    views: Vec<(String, String)>,
    files: Vec<(String, String)>,
    assets: Vec<(String, String)>,
    raw_descriptor: Option<String>,
}

impl ThemeFixture {
    /// Theme with slug and display name set, stored in a folder named after the slug.
    pub fn new(slug: &str) -> Self {
        let mut descriptor = Map::new();
        descriptor.insert("slug".to_string(), json!(slug));
        descriptor.insert("name".to_string(), json!(title_case(slug)));
        Self {
            slug: slug.to_string(),
            directory: None,
            descriptor,
            templates: Map::new(),
            views: Vec::new(),
            files: Vec::new(),
            assets: Vec::new(),
            raw_descriptor: None,
        }
    }

    /// Store the theme in a folder other than its slug.
    pub fn directory(mut self, name: &str) -> Self {
        self.directory = Some(name.to_string());
        self
    }

    /// Set any top-level descriptor field.
    pub fn field(mut self, key: &str, value: Value) -> Self {
        self.descriptor.insert(key.to_string(), value);
        self
    }

    pub fn version(self, version: &str) -> Self {
        self.field("version", json!(version))
    }

    /// Add `templates/{name}.html`.
    pub fn view(mut self, name: &str, content: &str) -> Self {
        self.views.push((name.to_string(), content.to_string()));
        self
    }

    /// Add a `templates` map entry to the descriptor.
    pub fn template_entry(mut self, logical_name: &str, entry: Value) -> Self {
        self.templates.insert(logical_name.to_string(), entry);
        self
    }

    /// Add an arbitrary file relative to the theme folder.
    pub fn file(mut self, relative: &str, content: &str) -> Self {
        self.files.push((relative.to_string(), content.to_string()));
        self
    }

    /// Add `assets/{relative}` and list it in the descriptor.
    pub fn asset(mut self, relative: &str, content: &str) -> Self {
        self.assets.push((relative.to_string(), content.to_string()));
        self
    }

    /// Declare a menu location.
    pub fn menu_location(mut self, location: &str, label: &str) -> Self {
        let menus = self.descriptor.entry("menus").or_insert_with(|| json!({}));
        if let Some(menus) = menus.as_object_mut() {
            menus.insert(location.to_string(), json!(label));
        }
        self
    }

    /// Write this exact text as `theme.json` instead of the generated descriptor.
    pub fn raw_descriptor(mut self, content: &str) -> Self {
        self.raw_descriptor = Some(content.to_string());
        self
    }

    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Write the theme under `themes_root`, returning the theme folder.
    pub fn write(&self, themes_root: &Path) -> Result<PathBuf> {
        let dir = themes_root.join(self.directory.as_deref().unwrap_or(&self.slug));
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create theme fixture {}", dir.display()))?;

        for (name, content) in &self.views {
            write_file(&dir.join("templates").join(format!("{name}.html")), content)?;
        }
        for (relative, content) in &self.files {
            write_file(&dir.join(relative), content)?;
        }
        for (relative, content) in &self.assets {
            write_file(&dir.join("assets").join(relative), content)?;
        }

        let descriptor = match &self.raw_descriptor {
            Some(raw) => raw.clone(),
            None => serde_json::to_string_pretty(&self.descriptor_value())?,
        };
        write_file(&dir.join("theme.json"), &descriptor)?;

        Ok(dir)
    }

    fn descriptor_value(&self) -> Value {
        let mut descriptor = self.descriptor.clone();
        if !self.templates.is_empty() {
            descriptor.insert("templates".to_string(), Value::Object(self.templates.clone()));
        }

        if !self.assets.is_empty() {
            let (mut css, mut js, mut images) = (Vec::new(), Vec::new(), Vec::new());
            for (relative, _) in &self.assets {
                match Path::new(relative).extension().and_then(|e| e.to_str()) {
                    Some("css") => css.push(relative.clone()),
                    Some("js") => js.push(relative.clone()),
                    _ => images.push(relative.clone()),
                }
            }
            descriptor
                .insert("assets".to_string(), json!({ "css": css, "js": js, "images": images }));
        }

        Value::Object(descriptor)
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

fn title_case(slug: &str) -> String {
    let mut chars = slug.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}
