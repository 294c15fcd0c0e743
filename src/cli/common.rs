//! Helpers shared by the command implementations.

use anyhow::Result;
use std::path::PathBuf;

use crate::config::EngineConfig;
use crate::core::{ErrorContext, StagehandError, user_friendly_error};
use crate::theme::ThemeManager;

/// Maximum edit distance for a "did you mean" suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Load the configuration and build a theme manager backed by the JSON registry.
///
/// # Errors
///
/// Fails when a config file exists but cannot be read or parsed.
pub async fn load_manager(config_path: Option<PathBuf>) -> Result<ThemeManager> {
    let config = EngineConfig::load_with_optional(config_path).await?;
    tracing::debug!(
        "Themes in {}, registry at {}",
        config.paths.themes_dir.display(),
        config.paths.registry.display()
    );
    Ok(ThemeManager::from_config(config))
}

/// Known names closest to `input`, best first.
#[must_use]
pub fn suggest<'a>(input: &str, known: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut scored: Vec<(usize, &str)> = known
        .into_iter()
        .map(|name| (strsim::levenshtein(input, name), name))
        .filter(|(distance, name)| {
            *distance <= MAX_SUGGESTION_DISTANCE.min(name.len().max(input.len()) / 2 + 1)
        })
        .collect();
    scored.sort();
    scored.into_iter().map(|(_, name)| name.to_string()).collect()
}

/// User-facing context for a lifecycle error, with slug suggestions when the
/// slug was not found.
#[must_use]
pub fn explain(error: StagehandError, known: &[String]) -> ErrorContext {
    let close = match &error {
        StagehandError::ThemeNotFound {
            slug,
        } => suggest(slug, known.iter().map(String::as_str)),
        _ => Vec::new(),
    };

    let context = user_friendly_error(error.into());
    if close.is_empty() {
        context
    } else {
        context.with_suggestion(format!("Did you mean: {}?", close.join(", ")))
    }
}
