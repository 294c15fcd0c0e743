//! Shared helpers for Stagehand integration tests
//!
//! A [`TestSite`] is a temporary site root with a `stagehand.toml`, a
//! `themes/` folder and a JSON registry, so tests exercise the same on-disk
//! layout the CLI uses.

// Not every helper is used by every test module
#![allow(dead_code)]

use anyhow::{Context, Result};
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use stagehand_cli::config::EngineConfig;
use stagehand_cli::test_utils::ThemeFixture;
use stagehand_cli::theme::ThemeManager;

pub const CONFIG: &str = r#"
[paths]
themes_dir = "themes"
public_dir = "public/themes"
registry = ".stagehand/registry.json"

[site]
name = "Field Notes"
url = "/"
description = "Notes from the field"
"#;

pub struct TestSite {
    pub temp: TempDir,
}

impl TestSite {
    pub fn new() -> Result<Self> {
        let temp = TempDir::new().context("Failed to create temp dir")?;
        fs::write(temp.path().join("stagehand.toml"), CONFIG)?;
        fs::create_dir_all(temp.path().join("themes"))?;
        Ok(Self {
            temp,
        })
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.root().join("stagehand.toml")
    }

    pub fn themes_dir(&self) -> PathBuf {
        self.root().join("themes")
    }

    pub fn public_dir(&self) -> PathBuf {
        self.root().join("public/themes")
    }

    pub fn add_theme(&self, fixture: &ThemeFixture) -> Result<PathBuf> {
        fixture.write(&self.themes_dir())
    }

    /// A content file under `content/`.
    pub fn write_content(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.root().join("content").join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }

    pub async fn config(&self) -> Result<EngineConfig> {
        EngineConfig::load_from(&self.config_path()).await
    }

    /// A manager over the site's JSON registry, as the CLI builds it.
    pub async fn manager(&self) -> Result<ThemeManager> {
        Ok(ThemeManager::from_config(self.config().await?))
    }

    /// `stagehand --config <site>/stagehand.toml` run from the site root.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("stagehand").expect("stagehand binary");
        cmd.current_dir(self.root())
            .env("STAGEHAND_NO_PROGRESS", "1")
            .env("NO_COLOR", "1")
            .env_remove("STAGEHAND_CONFIG")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(self.config_path());
        cmd
    }
}

/// Theme with a full set of views and assets.
pub fn aurora() -> ThemeFixture {
    ThemeFixture::new("aurora")
        .version("2.1.0")
        .menu_location("primary", "Primary navigation")
        .view(
            "layout",
            concat!(
                "<!DOCTYPE html><html><head><title>{{ page_title }}</title></head>",
                "<body>{{ header | safe }}<main>{{ content | safe }}</main>{{ footer | safe }}",
                "</body></html>",
            ),
        )
        .view(
            "header",
            concat!(
                "<header>{{ site_name }}",
                "{% if menus.primary %}<nav>{{ menus.primary | safe }}</nav>{% endif %}",
                "</header>",
            ),
        )
        .view("footer", "<footer>aurora footer</footer>")
        .view(
            "post",
            "<article class=\"aurora-post\"><h1>{{ title }}</h1>{{ body | safe }}</article>",
        )
        .view(
            "page",
            "<article class=\"aurora-page\"><h1>{{ title }}</h1>{{ body | safe }}</article>",
        )
        .asset("css/app.css", "body { margin: 0 }")
        .asset("images/favicon.png", "png")
}

/// Theme without any views.
pub fn bare(slug: &str) -> ThemeFixture {
    ThemeFixture::new(slug)
}
