//! Configuration management for Stagehand
//!
//! A single TOML file (`stagehand.toml`) configures where themes live, where
//! their assets are published, where the registry is stored, site defaults
//! injected into every render context, and the TTLs of cached lookups.
//!
//! ```toml
//! [paths]
//! themes_dir = "themes"
//! public_dir = "public/themes"
//! registry = ".stagehand/registry.json"
//!
//! [site]
//! name = "Field Notes"
//! url = "https://notes.example.com"
//! description = "Writing about soil and weather"
//!
//! [assets]
//! base_url = "/themes"
//! publish_on_install = true
//!
//! [cache]
//! active_theme = 3600
//! installed_themes = 3600
//! menus = 3600
//! post_types = 86400
//! ```
//!
//! # Lookup Order
//!
//! 1. An explicit path (`--config`)
//! 2. The `STAGEHAND_CONFIG` environment variable
//! 3. `stagehand.toml` in the current directory
//!
//! A missing file yields the defaults. Relative paths inside the file are
//! resolved against the directory containing it.

mod engine;

pub use engine::{
    AssetsConfig, CONFIG_ENV_VAR, CacheConfig, DEFAULT_CONFIG_FILE, EngineConfig, PathsConfig,
    SiteConfig,
};
