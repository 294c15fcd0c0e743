//! `stagehand render` - render a content file with the active theme.
//!
//! ```bash
//! stagehand render post content/rain.md
//! stagehand render page content/about.md --set site_name="Field Notes"
//! stagehand render index content/news.md --menus menus.json --authenticated
//! ```
//!
//! `--set` values are parsed as JSON when they parse (`--set featured=true`,
//! `--set tags='["a","b"]'`) and used as strings otherwise. Dotted keys build
//! nested objects: `--set site.name=Notes`.
//!
//! The menus file is a JSON array of menus:
//!
//! ```json
//! [{ "slug": "main", "name": "Main", "location": "primary",
//!    "items": [{ "id": 1, "label": "Home", "url": "/" }] }]
//! ```

use anyhow::{Context, Result, bail};
use clap::{Args, ValueEnum};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::common::load_manager;
use crate::content::{ContentItem, MemoryPostTypeStore, PostType, PostTypeService, loader};
use crate::menu::{MemoryMenuStore, Menu, MenuService};
use crate::templating::{RenderContext, RenderPipeline, TemplateResolver, Viewer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ContentKind {
    Post,
    Page,
    Index,
}

#[derive(Args)]
pub struct RenderCommand {
    /// Kind of content in the file
    #[arg(value_enum)]
    kind: ContentKind,

    /// Content file with YAML front matter
    file: PathBuf,

    /// Extra context value, `key=value` (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,

    /// Render for a signed-in viewer
    #[arg(long)]
    authenticated: bool,

    /// JSON file with menus to place in the theme's menu locations
    #[arg(long, value_name = "FILE")]
    menus: Option<PathBuf>,

    /// Path of the rendered page, used to mark the current menu item
    #[arg(long, value_name = "PATH")]
    url: Option<String>,

    /// Write the document to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

impl RenderCommand {
    /// # Errors
    ///
    /// Fails when the content, menus or config cannot be loaded, or a `--set`
    /// argument is malformed. Template problems never fail the command.
    pub async fn execute(self, config_path: Option<PathBuf>) -> Result<()> {
        let manager = load_manager(config_path).await?;
        let config = manager.config().clone();
        let cache = manager.cache().clone();

        let item = load_item(self.kind, &self.file)?;
        let extra = parse_overrides(&self.set)?;

        let post_types = PostTypeService::new(
            Arc::new(MemoryPostTypeStore::with_types([PostType::new("post", "Post")])),
            cache.clone(),
            config.cache.post_types_ttl(),
        );
        let mut pipeline =
            RenderPipeline::new(TemplateResolver::new(manager)).with_post_types(post_types);

        if let Some(path) = &self.menus {
            let menus = load_menus(path).await?;
            pipeline = pipeline.with_menus(MenuService::new(
                Arc::new(MemoryMenuStore::with_menus(menus)),
                cache,
                config.cache.menus_ttl(),
            ));
        }

        let viewer = Viewer {
            authenticated: self.authenticated,
            current_url: self.url,
        };
        let html = pipeline.render_content(&item, &extra, &viewer);

        match &self.output {
            Some(path) => {
                tokio::fs::write(path, &html)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                tracing::info!("Wrote {}", path.display());
            }
            None => println!("{html}"),
        }
        Ok(())
    }
}

fn load_item(kind: ContentKind, path: &Path) -> Result<ContentItem> {
    Ok(match kind {
        ContentKind::Post => ContentItem::Post(loader::load_post(path)?),
        ContentKind::Page => ContentItem::Page(loader::load_page(path)?),
        ContentKind::Index => ContentItem::Index(loader::load_listing(path)?),
    })
}

async fn load_menus(path: &Path) -> Result<Vec<Menu>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read menus from {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid menus file {}", path.display()))
}

/// Build a context from `key=value` pairs.
///
/// # Errors
///
/// Fails on a pair without `=` or with an empty key segment.
pub fn parse_overrides(pairs: &[String]) -> Result<RenderContext> {
    let mut context = RenderContext::new();
    for pair in pairs {
        let Some((key, raw)) = pair.split_once('=') else {
            bail!("Expected KEY=VALUE, got '{pair}'");
        };
        let segments: Vec<&str> = key.trim().split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            bail!("Invalid key in '{pair}'");
        }

        let value = serde_json::from_str::<Value>(raw)
            .unwrap_or_else(|_| Value::String(raw.to_string()));
        let nested = segments.iter().rev().fold(value, |inner, segment| {
            let mut map = Map::new();
            map.insert((*segment).to_string(), inner);
            Value::Object(map)
        });
        context = context.merged(&RenderContext::from_value(nested));
    }
    Ok(context)
}
