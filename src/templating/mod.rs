//! Template resolution and rendering.
//!
//! Themes ship [Tera](https://keats.github.io/tera/) views under
//! `templates/`. A logical name such as `pages/about` resolves, for the active
//! theme, to the first of:
//!
//! 1. `{slug}::pages/about` (the view namespace keyed by the theme slug)
//! 2. `{directory}::pages/about` (keyed by the theme's directory, when different)
//! 3. the native-engine file named by `templates["pages/about"]` in `theme.json`
//!
//! # Modules
//!
//! - [`views`] - view namespaces and existence checks
//! - [`renderer`] - Tera setup and error translation
//! - [`resolver`] - one logical name to rendered output or `None`
//! - [`pipeline`] - content items to complete documents, layout composition
//! - [`fallback`] - built-in markup for themes that lack a template
//! - [`context`] - layered render data
//! - [`filters`] - the `asset` filter
//!
//! # Template syntax
//!
//! Views see the render context directly:
//!
//! ```text
//! <link rel="stylesheet" href="{{ "css/app.css" | asset }}">
//! <h1>{{ title }}</h1>
//! <p class="byline">{{ author.name }} · {{ read_time }} min</p>
//! {{ body | safe }}
//! ```
//!
//! Views in the same theme can `{% extends %}` and `{% include %}` each other
//! by their path under `templates/`.

pub mod context;
pub mod error;
pub mod fallback;
pub mod filters;
pub mod pipeline;
pub mod renderer;
pub mod resolver;
pub mod utils;
pub mod views;

pub use context::RenderContext;
pub use error::{ErrorLocation, TemplateError};
pub use pipeline::{Partial, RenderPipeline, Viewer, candidates_for, is_full_document};
pub use renderer::ViewRenderer;
pub use resolver::{ResolvedTemplate, TemplateResolver};
pub use utils::deep_merge_json;
pub use views::{ViewFinder, ViewRef};
