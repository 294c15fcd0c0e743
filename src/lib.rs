//! Stagehand - theme registry and template resolution engine for content sites
//!
//! Given a content item (post, page or listing) and the active theme,
//! Stagehand picks the view that renders it, wraps the result in the theme's
//! layout, and falls back to built-in markup wherever the theme is
//! incomplete. It also manages the themes themselves: discovery on disk,
//! installation into a registry, activation of exactly one theme, asset
//! publishing and removal.
//!
//! # Architecture Overview
//!
//! ```text
//! render request
//!   → RenderPipeline   candidate names per content kind, layout composition
//!   → TemplateResolver first existing view for one logical name
//!   → ThemeManager     active theme (cached)
//!   → fallback         built-in markup when nothing resolves
//! ```
//!
//! Every store lookup (active theme, installed themes, menus, post types) goes
//! through one shared [`cache::LookupCache`]; mutations evict the same
//! [`cache::CacheKey`]s the readers use.
//!
//! # Core Modules
//!
//! - [`cache`] - cache-aside lookups with TTLs and a single key scheme
//! - [`theme`] - descriptors, discovery, registry stores, lifecycle, asset publishing
//! - [`templating`] - view lookup, Tera rendering, the rendering pipeline and fallbacks
//! - [`menu`] - menu trees with visibility filtering, cached menu lookups
//! - [`content`] - posts, pages, listings, post types and the front-matter loader
//!
//! ## Supporting Modules
//!
//! - [`config`] - `stagehand.toml` loading
//! - [`core`] - error types and user-facing error context
//! - [`utils`] - file system helpers and progress bars
//! - [`cli`] - the `stagehand` command line
//!
//! # Theme Layout
//!
//! ```text
//! themes/aurora/
//! ├── theme.json            descriptor (slug, name, templates, assets, menus, ...)
//! ├── templates/
//! │   ├── layout.html
//! │   ├── header.html
//! │   ├── footer.html
//! │   ├── post.html
//! │   └── pages/about.html
//! └── assets/
//!     ├── css/app.css
//!     └── images/favicon.png
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use stagehand_cli::config::EngineConfig;
//! use stagehand_cli::content::Page;
//! use stagehand_cli::templating::{RenderContext, RenderPipeline, TemplateResolver, Viewer};
//! use stagehand_cli::theme::ThemeManager;
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let manager = ThemeManager::from_config(EngineConfig::with_root(Path::new("/srv/site")));
//! manager.install_all_themes(Some("admin"))?;
//! manager.activate_theme("aurora");
//!
//! let pipeline = RenderPipeline::new(TemplateResolver::new(manager));
//! let page = Page {
//!     title: "About".to_string(),
//!     slug: "about".to_string(),
//!     body: "<p>Hello</p>".to_string(),
//!     author: None,
//!     published_at: None,
//!     updated_at: None,
//!     meta_description: None,
//! };
//! let html = pipeline.render_page(&page, &RenderContext::new(), &Viewer::guest());
//! assert!(html.contains("About"));
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod content;
pub mod core;
pub mod menu;
pub mod templating;
pub mod theme;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
