//! Tera view rendering.
//!
//! A fresh [`Tera`] instance is built for every render from the view's
//! namespace root, so `{% extends %}` and `{% include %}` resolve against the
//! same theme and nothing is shared between themes or between renders. The
//! `asset` filter is registered with the rendering theme's URL prefix.
//!
//! Tera failures are turned into [`TemplateError`] values carrying the view
//! identifier, file, line, surrounding source lines and, for undefined
//! variables, close matches among the variables that were available.

use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use strsim::levenshtein;
use tera::{Context as TeraContext, Template, Tera};
use walkdir::WalkDir;

use super::error::{ErrorLocation, TemplateError};
use super::filters::AssetFilter;
use super::views::{VIEW_EXTENSION, ViewRef};

/// Maximum edit distance, as a percentage of the name length, for suggestions
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Name under which a template-map file is registered
const MAPPED_TEMPLATE_NAME: &str = "__mapped__.html";

/// Renders theme views with Tera.
#[derive(Debug, Clone, Default)]
pub struct ViewRenderer;

impl ViewRenderer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render a namespaced view.
    ///
    /// # Errors
    ///
    /// Returns a [`TemplateError`] when the view fails to parse or render.
    /// Other views in the namespace that fail to parse are skipped with a
    /// warning and only matter if this view extends or includes them.
    pub fn render_view(
        &self,
        view: &ViewRef,
        context: &TeraContext,
        asset_prefix: &str,
    ) -> Result<String, TemplateError> {
        let identifier = view.identifier();
        let name = view.template_name();
        let mut tera = self.build_tera(Some(&view.root), None, &name, asset_prefix, &identifier)?;

        tracing::debug!(view = %identifier, "rendering view");
        tera.render(&name, context)
            .map_err(|e| Self::parse_tera_error(&e, &identifier, &view.path(), context))
    }

    /// Render a single file named by a theme's template map. Views under
    /// `siblings_root` are loaded too so the file can extend or include them.
    ///
    /// # Errors
    ///
    /// See [`Self::render_view`].
    pub fn render_file(
        &self,
        path: &Path,
        siblings_root: Option<&Path>,
        context: &TeraContext,
        asset_prefix: &str,
    ) -> Result<String, TemplateError> {
        let identifier = path.display().to_string();
        let mut tera = self.build_tera(
            siblings_root,
            Some(path),
            MAPPED_TEMPLATE_NAME,
            asset_prefix,
            &identifier,
        )?;

        tracing::debug!(file = %identifier, "rendering template file");
        tera.render(MAPPED_TEMPLATE_NAME, context)
            .map_err(|e| Self::parse_tera_error(&e, &identifier, path, context))
    }

    fn build_tera(
        &self,
        root: Option<&Path>,
        extra_file: Option<&Path>,
        required: &str,
        asset_prefix: &str,
        identifier: &str,
    ) -> Result<Tera, TemplateError> {
        let mut sources: Vec<(String, String)> = Vec::new();

        if let Some(root) = root.filter(|root| root.is_dir()) {
            for (path, name) in view_files(root) {
                match std::fs::read_to_string(&path) {
                    Ok(source) => sources.push((name, source)),
                    Err(e) if name == required => {
                        return Err(TemplateError::LoadFailed {
                            path,
                            message: e.to_string(),
                        });
                    }
                    Err(e) => tracing::warn!("Skipping unreadable view {}: {}", path.display(), e),
                }
            }
        }

        if let Some(file) = extra_file {
            let source = std::fs::read_to_string(file).map_err(|e| TemplateError::LoadFailed {
                path: file.to_path_buf(),
                message: e.to_string(),
            })?;
            sources.push((MAPPED_TEMPLATE_NAME.to_string(), source));
        }

        let mut tera = Tera::default();
        tera.add_raw_templates(loadable_views(sources, required)).map_err(|e| {
            let path = extra_file
                .map(Path::to_path_buf)
                .or_else(|| root.map(|root| root.join(required)))
                .unwrap_or_default();
            TemplateError::SyntaxError {
                message: Self::format_tera_error(&e),
                location: Box::new(ErrorLocation {
                    view: identifier.to_string(),
                    file_path: Some(path),
                    line_number: error_line(&e),
                    context_lines: None,
                }),
            }
        })?;
        tera.register_filter("asset", AssetFilter::new(asset_prefix));

        Ok(tera)
    }

    /// Structured error for a failed render.
    fn parse_tera_error(
        error: &tera::Error,
        identifier: &str,
        path: &Path,
        context: &TeraContext,
    ) -> TemplateError {
        let line_number = error_line(error);
        let context_lines = line_number
            .and_then(|line| {
                let source = std::fs::read_to_string(path).ok()?;
                Some(source_excerpt(&source, line, 3))
            })
            .filter(|lines| !lines.is_empty());

        let location = ErrorLocation {
            view: identifier.to_string(),
            file_path: Some(path.to_path_buf()),
            line_number,
            context_lines,
        };

        let message = Self::format_tera_error(error);
        match undefined_variable(&message) {
            Some(variable) => {
                let available = context_paths(context);
                let suggestions = close_matches(&variable, &available);
                TemplateError::VariableNotFound {
                    variable,
                    available_variables: Box::new(available),
                    suggestions: Box::new(suggestions),
                    location: Box::new(location),
                }
            }
            None => TemplateError::SyntaxError {
                message,
                location: Box::new(location),
            },
        }
    }

    /// A Tera error and its sources as one message, one cause per line.
    #[must_use]
    pub fn format_tera_error(error: &tera::Error) -> String {
        let mut messages: Vec<String> = Vec::new();
        let mut next: Option<&dyn std::error::Error> = Some(error);
        while let Some(current) = next {
            let text = current.to_string().replace(MAPPED_TEMPLATE_NAME, "template");
            let text = text.trim();
            if !text.is_empty() && !messages.iter().any(|m| m == text) {
                messages.push(text.to_string());
            }
            next = current.source();
        }

        if messages.is_empty() {
            "Template error (no details from Tera)".to_string()
        } else {
            messages.join("\n  → ")
        }
    }
}

/// View files under `root` with their Tera names (`pages/about.html`).
fn view_files(root: &Path) -> Vec<(PathBuf, String)> {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| {
            entry.file_type().is_file()
                && entry.path().extension().is_some_and(|ext| ext == VIEW_EXTENSION)
        })
        .filter_map(|entry| {
            let relative = entry.path().strip_prefix(root).ok()?;
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            Some((entry.path().to_path_buf(), name))
        })
        .collect()
}

/// Views that can be registered together.
///
/// A view that does not parse is dropped, and so is any view extending or
/// importing macros from a dropped or missing view. `required` is always kept
/// so its own error is the one reported.
fn loadable_views(sources: Vec<(String, String)>, required: &str) -> Vec<(String, String)> {
    let mut views: Vec<(String, String, Option<Template>)> = Vec::new();
    for (name, source) in sources {
        match Template::new(&name, None, &source) {
            Ok(template) => views.push((name, source, Some(template))),
            Err(_) if name == required => views.push((name, source, None)),
            Err(e) => tracing::warn!(
                "Skipping view '{}' that does not parse: {}",
                name,
                ViewRenderer::format_tera_error(&e)
            ),
        }
    }

    loop {
        let names: HashSet<String> = views.iter().map(|(name, ..)| name.clone()).collect();
        let before = views.len();
        views.retain(|(name, _, template)| {
            let Some(template) = template.as_ref().filter(|_| name != required) else {
                return true;
            };
            let missing = template
                .parent
                .iter()
                .chain(template.imported_macro_files.iter().map(|(file, _)| file))
                .find(|dependency| !names.contains(*dependency));
            if let Some(dependency) = missing {
                tracing::warn!("Skipping view '{}': depends on unavailable '{}'", name, dependency);
                return false;
            }
            true
        });
        if views.len() == before {
            break;
        }
    }

    views.into_iter().map(|(name, source, _)| (name, source)).collect()
}

/// Name from Tera's "Variable `name` not found" message.
fn undefined_variable(message: &str) -> Option<String> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    let pattern =
        PATTERN.get_or_init(|| Regex::new(r"Variable `([^`]+)` not found").ok()).as_ref()?;
    pattern.captures(message).map(|caps| caps[1].to_string())
}

/// Line of the first `line:column` position in a Tera error.
fn error_line(error: &tera::Error) -> Option<usize> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| Regex::new(r"(\d+):\d+").ok()).as_ref()?;
    let debug = format!("{error:?}");
    pattern.captures(&debug)?[1].parse().ok()
}

/// Context keys, with one level of nesting spelled as `parent.child`.
fn context_paths(context: &TeraContext) -> Vec<String> {
    let serde_json::Value::Object(map) = context.clone().into_json() else {
        return Vec::new();
    };

    let mut paths: Vec<String> = map
        .into_iter()
        .flat_map(|(key, value)| match value {
            serde_json::Value::Object(nested) if !nested.is_empty() => {
                nested.keys().map(|child| format!("{key}.{child}")).collect::<Vec<_>>()
            }
            _ => vec![key],
        })
        .collect();
    paths.sort();
    paths
}

/// Up to three names within edit distance of `target`, closest first.
fn close_matches(target: &str, available: &[String]) -> Vec<String> {
    let limit = target.len() * SIMILARITY_THRESHOLD_PERCENT / 100;
    let mut scored: Vec<(usize, &String)> = available
        .iter()
        .map(|name| (levenshtein(target, name), name))
        .filter(|(distance, _)| *distance <= limit)
        .collect();
    scored.sort_by_key(|(distance, _)| *distance);
    scored.into_iter().take(3).map(|(_, name)| name.clone()).collect()
}

/// `radius` lines either side of 1-based `line`, numbered.
fn source_excerpt(source: &str, line: usize, radius: usize) -> Vec<(usize, String)> {
    let lines: Vec<&str> = source.lines().collect();
    if line == 0 || line > lines.len() {
        return Vec::new();
    }

    let first = line.saturating_sub(radius).max(1);
    let last = (line + radius).min(lines.len());
    (first..=last).map(|number| (number, lines[number - 1].to_string())).collect()
}
