//! Content consumed by the rendering pipeline.
//!
//! The engine does not own content storage. [`model`] defines the shapes it
//! renders, [`post_types`] caches the post type registry, and [`loader`]
//! reads content files for the command line.

pub mod loader;
pub mod model;
pub mod post_types;

pub use loader::{load_listing, load_page, load_post};
pub use model::{Author, ContentItem, Listing, ListingPreference, Page, Post, read_time};
pub use post_types::{MemoryPostTypeStore, PostType, PostTypeService, PostTypeStore};
