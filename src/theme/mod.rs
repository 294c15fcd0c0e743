//! Theme registry and lifecycle management.
//!
//! A theme is a folder under the themes root with a `theme.json` descriptor,
//! view templates under `templates/`, and static files under `assets/`:
//!
//! ```text
//! themes/
//! └── aurora/
//!     ├── theme.json
//!     ├── templates/
//!     │   ├── layout.html
//!     │   ├── header.html
//!     │   ├── post.html
//!     │   └── pages/about.html
//!     └── assets/
//!         ├── css/app.css
//!         └── img/favicon.png
//! ```
//!
//! - [`discovery`] scans the root and parses descriptors
//! - [`store`] persists registry records
//! - [`assets`] publishes `assets/` into the public directory
//! - [`manager`] ties them together and enforces the single-active-theme rule

pub mod assets;
pub mod descriptor;
pub mod discovery;
pub mod manager;
pub mod model;
pub mod store;

pub use assets::{AssetPublisher, PublishOutcome};
pub use descriptor::{DESCRIPTOR_FILE, load_descriptor, parse_descriptor};
pub use discovery::{DiscoveredTheme, DiscoveryReport, SkippedTheme};
pub use manager::{BatchReport, ThemeManager};
pub use model::{
    AssetManifest, ComponentDescriptor, EngineKind, TemplateEntry, Theme, ThemeDescriptor,
};
pub use store::{JsonThemeStore, MemoryThemeStore, ThemeStore};
