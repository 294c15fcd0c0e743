//! Reading and validating `theme.json` descriptors.

use std::path::Path;

use super::model::ThemeDescriptor;
use crate::core::StagehandError;

/// File name of the descriptor inside each theme directory.
pub const DESCRIPTOR_FILE: &str = "theme.json";

/// Read and validate the descriptor at `path`.
///
/// # Errors
///
/// Returns [`StagehandError::DescriptorParse`] when the file cannot be read or
/// is not valid JSON, and [`StagehandError::DescriptorInvalid`] when it fails
/// validation.
pub fn load_descriptor(path: &Path) -> Result<ThemeDescriptor, StagehandError> {
    let content = std::fs::read_to_string(path).map_err(|e| StagehandError::DescriptorParse {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    parse_descriptor(&content, path)
}

/// Parse and validate descriptor JSON. `path` is only used in error messages.
///
/// # Errors
///
/// See [`load_descriptor`].
pub fn parse_descriptor(content: &str, path: &Path) -> Result<ThemeDescriptor, StagehandError> {
    let descriptor: ThemeDescriptor =
        serde_json::from_str(content).map_err(|e| StagehandError::DescriptorParse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    validate(&descriptor, path)?;
    Ok(descriptor)
}

fn validate(descriptor: &ThemeDescriptor, path: &Path) -> Result<(), StagehandError> {
    let invalid = |reason: String| StagehandError::DescriptorInvalid {
        path: path.display().to_string(),
        reason,
    };

    if !is_valid_slug(&descriptor.slug) {
        return Err(invalid(format!(
            "slug '{}' must start with a lowercase letter or digit and contain only a-z, 0-9, '-' or '_'",
            descriptor.slug
        )));
    }

    if descriptor.name.trim().is_empty() {
        return Err(invalid("name must not be empty".to_string()));
    }

    if let Some(version) = &descriptor.version
        && semver::Version::parse(version).is_err()
    {
        tracing::warn!(
            "Theme '{}' declares non-semver version '{}' in {}",
            descriptor.slug,
            version,
            path.display()
        );
    }

    Ok(())
}

/// Whether `slug` matches `[a-z0-9][a-z0-9_-]*`.
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    let mut chars = slug.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() || first.is_ascii_digit() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}
