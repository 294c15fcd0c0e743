//! Scanning the themes root for descriptor files.
//!
//! Every immediate subdirectory holding a `theme.json` is a candidate. A
//! descriptor that fails to parse or validate is logged and recorded as
//! skipped; it never stops the scan. Results are keyed by the slug each
//! descriptor declares, since a directory can be renamed independently.

use std::path::{Path, PathBuf};

use super::descriptor::{DESCRIPTOR_FILE, load_descriptor};
use super::model::ThemeDescriptor;
use crate::core::StagehandError;

/// A theme found on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredTheme {
    /// Folder name under the themes root
    pub directory_name: String,
    /// Parsed descriptor
    pub config: ThemeDescriptor,
    /// Absolute path of the theme folder
    pub path: PathBuf,
}

impl DiscoveredTheme {
    #[must_use]
    pub fn slug(&self) -> &str {
        &self.config.slug
    }
}

/// A directory that was not turned into a [`DiscoveredTheme`].
#[derive(Debug, Clone)]
pub struct SkippedTheme {
    pub directory_name: String,
    pub path: PathBuf,
    pub reason: StagehandError,
}

/// Outcome of one scan.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryReport {
    /// Valid themes, ordered by directory name
    pub themes: Vec<DiscoveredTheme>,
    pub skipped: Vec<SkippedTheme>,
}

impl DiscoveryReport {
    /// Look up a discovered theme by declared slug.
    #[must_use]
    pub fn get(&self, slug: &str) -> Option<&DiscoveredTheme> {
        self.themes.iter().find(|theme| theme.config.slug == slug)
    }

    #[must_use]
    pub fn slugs(&self) -> Vec<&str> {
        self.themes.iter().map(DiscoveredTheme::slug).collect()
    }
}

/// Scan `themes_dir`. A missing root yields an empty report.
///
/// # Errors
///
/// Returns an error only when the root exists but cannot be listed.
pub fn discover(themes_dir: &Path) -> Result<DiscoveryReport, StagehandError> {
    let mut report = DiscoveryReport::default();

    if !themes_dir.is_dir() {
        tracing::debug!("Themes directory {} does not exist", themes_dir.display());
        return Ok(report);
    }

    let entries = std::fs::read_dir(themes_dir).map_err(|e| StagehandError::FileSystemError {
        operation: format!("listing themes: {e}"),
        path: themes_dir.display().to_string(),
    })?;

    let mut directories: Vec<(String, PathBuf)> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            Some((name, entry.path()))
        })
        .collect();
    directories.sort_by(|a, b| a.0.cmp(&b.0));

    for (directory_name, path) in directories {
        let descriptor_path = path.join(DESCRIPTOR_FILE);
        if !descriptor_path.is_file() {
            tracing::debug!("Skipping {}: no {}", path.display(), DESCRIPTOR_FILE);
            continue;
        }

        let config = match load_descriptor(&descriptor_path) {
            Ok(config) => config,
            Err(reason) => {
                tracing::warn!("Skipping theme directory '{}': {}", directory_name, reason);
                report.skipped.push(SkippedTheme {
                    directory_name,
                    path,
                    reason,
                });
                continue;
            }
        };

        if let Some(existing) = report.get(&config.slug) {
            let reason = StagehandError::DescriptorInvalid {
                path: descriptor_path.display().to_string(),
                reason: format!(
                    "slug '{}' is already declared by directory '{}'",
                    config.slug, existing.directory_name
                ),
            };
            tracing::warn!("Skipping theme directory '{}': {}", directory_name, reason);
            report.skipped.push(SkippedTheme {
                directory_name,
                path,
                reason,
            });
            continue;
        }

        tracing::debug!("Discovered theme '{}' in '{}'", config.slug, directory_name);
        report.themes.push(DiscoveredTheme {
            directory_name,
            config,
            path,
        });
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_theme(root: &Path, dir: &str, json: &str) {
        let theme_dir = root.join(dir);
        std::fs::create_dir_all(&theme_dir).unwrap();
        std::fs::write(theme_dir.join(DESCRIPTOR_FILE), json).unwrap();
    }

    #[test]
    fn test_discover_skips_malformed() {
        let temp = TempDir::new().unwrap();
        write_theme(temp.path(), "aurora", r#"{"slug": "aurora", "name": "Aurora"}"#);
        write_theme(temp.path(), "broken", "{ nope");
        std::fs::create_dir_all(temp.path().join("not-a-theme")).unwrap();
        std::fs::write(temp.path().join("stray.txt"), "x").unwrap();

        let report = discover(temp.path()).unwrap();
        assert_eq!(report.slugs(), vec!["aurora"]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].directory_name, "broken");
    }

    #[test]
    fn test_discover_keys_by_declared_slug() {
        let temp = TempDir::new().unwrap();
        write_theme(temp.path(), "aurora-2024", r#"{"slug": "aurora", "name": "Aurora"}"#);

        let report = discover(temp.path()).unwrap();
        let theme = report.get("aurora").unwrap();
        assert_eq!(theme.directory_name, "aurora-2024");
        assert_eq!(theme.path, temp.path().join("aurora-2024"));
        assert!(report.get("aurora-2024").is_none());
    }

    #[test]
    fn test_duplicate_slug_skipped() {
        let temp = TempDir::new().unwrap();
        write_theme(temp.path(), "a", r#"{"slug": "aurora", "name": "Aurora"}"#);
        write_theme(temp.path(), "b", r#"{"slug": "aurora", "name": "Aurora copy"}"#);

        let report = discover(temp.path()).unwrap();
        assert_eq!(report.themes.len(), 1);
        assert_eq!(report.themes[0].directory_name, "a");
        assert_eq!(report.skipped[0].directory_name, "b");
    }

    #[test]
    fn test_unknown_engine_tags_are_kept() {
        let temp = TempDir::new().unwrap();
        write_theme(
            temp.path(),
            "blady",
            r#"{"slug": "blady", "name": "Blady", "templateEngine": "blade"}"#,
        );
        write_theme(
            temp.path(),
            "mixed",
            r#"{"slug": "mixed", "name": "Mixed", "templates": {
                "page": {"engineKind": "vue", "componentPath": "components/Page.vue"}
            }}"#,
        );

        let report = discover(temp.path()).unwrap();
        assert_eq!(report.slugs(), vec!["blady", "mixed"]);
        assert!(report.skipped.is_empty());

        let blady = report.get("blady").unwrap();
        assert_eq!(blady.config.template_engine, crate::theme::EngineKind::Other);
        let mixed = report.get("mixed").unwrap();
        assert_eq!(mixed.config.templates["page"].native_path(), None);
    }

    #[test]
    fn test_missing_root_is_empty() {
        let temp = TempDir::new().unwrap();
        let report = discover(&temp.path().join("absent")).unwrap();
        assert!(report.themes.is_empty());
        assert!(report.skipped.is_empty());
    }
}
