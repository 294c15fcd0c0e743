//! Custom Tera filters available to theme templates.
//!
//! # `asset`
//!
//! Turns a path relative to the active theme's `assets/` folder into its
//! public URL:
//!
//! ```html
//! <link rel="stylesheet" href="{{ "css/app.css" | asset }}">
//! <!-- /themes/aurora/css/app.css -->
//! ```
//!
//! Absolute paths and `..` segments that climb out of the asset folder are
//! rejected with a render error.

use std::collections::HashMap;
use std::path::{Component, Path};

/// Validate an asset path and normalize it to forward slashes.
///
/// # Errors
///
/// Returns a message when the path is absolute, empty, or escapes the asset root.
pub fn normalize_asset_path(path_str: &str) -> Result<String, String> {
    let path = Path::new(path_str.trim_start_matches("./"));

    if path_str.starts_with('/') || path.is_absolute() {
        return Err(format!(
            "asset path '{path_str}' must be relative to the theme's assets folder"
        ));
    }

    let mut segments: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => segments.push(part.to_string_lossy().into_owned()),
            Component::ParentDir => {
                if segments.pop().is_none() {
                    return Err(format!(
                        "asset path '{path_str}' escapes the theme's assets folder"
                    ));
                }
            }
            Component::CurDir => {}
            _ => return Err(format!("invalid component in asset path '{path_str}'")),
        }
    }

    if segments.is_empty() {
        return Err("asset path must not be empty".to_string());
    }
    Ok(segments.join("/"))
}

/// The `asset` filter for one theme's public URL prefix (`{base_url}/{directory_path}`).
///
/// Output is marked safe so autoescaping in `.html` views leaves the URL intact.
#[derive(Debug, Clone)]
pub struct AssetFilter {
    prefix: String,
}

impl AssetFilter {
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.trim_end_matches('/').to_string(),
        }
    }
}

impl tera::Filter for AssetFilter {
    fn filter(
        &self,
        value: &tera::Value,
        _args: &HashMap<String, tera::Value>,
    ) -> tera::Result<tera::Value> {
        let path_str =
            value.as_str().ok_or_else(|| tera::Error::msg("asset filter requires a string path"))?;

        let relative = normalize_asset_path(path_str)
            .map_err(|e| tera::Error::msg(format!("asset filter error: {e}")))?;

        Ok(tera::Value::String(format!("{}/{}", self.prefix, relative)))
    }

    fn is_safe(&self) -> bool {
        true
    }
}
