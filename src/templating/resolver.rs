//! Template candidate resolution.
//!
//! For one logical name (`"post"`, `"pages/about"`, `"archives/news"`) and the
//! active theme, the resolver tries in order:
//!
//! 1. the namespaced view keyed by the theme slug
//! 2. the namespaced view keyed by the theme directory (skipped when equal)
//! 3. the file named by the theme's template map, if it is a native-engine entry
//!
//! The first one that exists is rendered and returned; later ones are never
//! looked at. No active theme, no existing view, or a render error all yield
//! `None`. Render errors are logged. Building the list of logical names for a
//! content item is the pipeline's job.

use std::path::PathBuf;

use super::context::RenderContext;
use super::error::TemplateError;
use super::renderer::ViewRenderer;
use super::views::{ViewFinder, ViewRef};
use crate::theme::{Theme, ThemeManager};

/// Where a logical name resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTemplate {
    View(ViewRef),
    File(PathBuf),
}

impl std::fmt::Display for ResolvedTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::View(view) => write!(f, "{view}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Resolves logical template names against the active theme.
#[derive(Debug, Clone)]
pub struct TemplateResolver {
    themes: ThemeManager,
    views: ViewFinder,
    renderer: ViewRenderer,
}

impl TemplateResolver {
    #[must_use]
    pub fn new(themes: ThemeManager) -> Self {
        let views = ViewFinder::new(&themes.config().paths.themes_dir);
        Self {
            themes,
            views,
            renderer: ViewRenderer::new(),
        }
    }

    #[must_use]
    pub const fn themes(&self) -> &ThemeManager {
        &self.themes
    }

    #[must_use]
    pub const fn views(&self) -> &ViewFinder {
        &self.views
    }

    /// Locate `logical_name` in `theme` without rendering.
    #[must_use]
    pub fn resolve_in(&self, theme: &Theme, logical_name: &str) -> Option<ResolvedTemplate> {
        if let Some(view) = self.views.find(theme, logical_name) {
            return Some(ResolvedTemplate::View(view));
        }
        self.views.template_map_file(theme, logical_name).map(ResolvedTemplate::File)
    }

    /// Locate `logical_name` in the active theme without rendering.
    #[must_use]
    pub fn resolve(&self, logical_name: &str) -> Option<ResolvedTemplate> {
        let theme = self.themes.active_theme()?;
        self.resolve_in(&theme, logical_name)
    }

    /// Resolve and render, keeping the render error.
    ///
    /// `Ok(None)` means nothing resolved.
    ///
    /// # Errors
    ///
    /// Returns the [`TemplateError`] of a template that was found but failed to render.
    pub fn try_resolve_and_render(
        &self,
        logical_name: &str,
        context: &RenderContext,
    ) -> Result<Option<String>, TemplateError> {
        let Some(theme) = self.themes.active_theme() else {
            tracing::debug!("No active theme; '{}' does not resolve", logical_name);
            return Ok(None);
        };

        let Some(resolved) = self.resolve_in(&theme, logical_name) else {
            tracing::debug!("No template for '{}' in theme '{}'", logical_name, theme.slug);
            return Ok(None);
        };

        tracing::debug!("Resolved '{}' to {}", logical_name, resolved);
        let prefix = self.themes.asset_prefix(&theme);
        let tera_context = context.to_tera();

        let html = match &resolved {
            ResolvedTemplate::View(view) => {
                self.renderer.render_view(view, &tera_context, &prefix)?
            }
            ResolvedTemplate::File(path) => {
                let siblings = self.views.directory_root(&theme);
                self.renderer.render_file(path, Some(&siblings), &tera_context, &prefix)?
            }
        };

        Ok(Some(html))
    }

    /// Render the first template found for `logical_name`, or `None`.
    ///
    /// A render error is logged and reported as `None`.
    #[must_use]
    pub fn resolve_and_render(
        &self,
        logical_name: &str,
        context: &RenderContext,
    ) -> Option<String> {
        match self.try_resolve_and_render(logical_name, context) {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Rendering '{}' failed: {}", logical_name, e);
                tracing::debug!("{}", e.format_with_context());
                None
            }
        }
    }

    /// Try each logical name in order and return the first rendered result
    /// together with the name that produced it.
    #[must_use]
    pub fn render_first<S: AsRef<str>>(
        &self,
        candidates: &[S],
        context: &RenderContext,
    ) -> Option<(String, String)> {
        candidates.iter().find_map(|name| {
            let name = name.as_ref();
            self.resolve_and_render(name, context).map(|html| (name.to_string(), html))
        })
    }
}
