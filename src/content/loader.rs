//! Loading content files with YAML front matter.
//!
//! ```text
//! ---
//! title: Rain all week
//! slug: rain
//! author: Sam
//! published_at: 2024-05-01T09:00:00Z
//! ---
//! <p>It rained all week.</p>
//! ```
//!
//! The text after the front matter is the HTML body. A listing file has a
//! `posts:` list of post files, resolved relative to the listing file.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use gray_matter::Matter;
use gray_matter::engine::YAML;
use serde::Deserialize;
use std::path::Path;

use super::model::{Author, DEFAULT_POST_TYPE, Listing, ListingPreference, Page, Post};
use crate::utils::fs::read_text_file;

/// Front matter accepted by every content kind.
#[derive(Debug, Default, Deserialize)]
struct FrontMatter {
    title: Option<String>,
    slug: Option<String>,
    author: Option<AuthorField>,
    published_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    excerpt: Option<String>,
    meta_description: Option<String>,
    post_type: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    route_prefix: Option<String>,
    preference: Option<ListingPreference>,
    #[serde(default)]
    posts: Vec<String>,
}

/// `author: Sam` or `author: {name: Sam, email: ...}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AuthorField {
    Name(String),
    Full(Author),
}

impl From<AuthorField> for Author {
    fn from(field: AuthorField) -> Self {
        match field {
            AuthorField::Name(name) => Self {
                name,
                ..Default::default()
            },
            AuthorField::Full(author) => author,
        }
    }
}

fn parse(path: &Path) -> Result<(FrontMatter, String)> {
    let content = read_text_file(path)?;
    let matter: Matter<YAML> = Matter::new();
    let parsed = matter
        .parse::<serde_yaml::Value>(&content)
        .with_context(|| format!("Failed to extract front matter from '{}'", path.display()))?;

    let front_matter = parsed
        .data
        .map(|yaml| {
            serde_yaml::from_value::<FrontMatter>(yaml)
                .with_context(|| format!("Invalid front matter in '{}'", path.display()))
        })
        .transpose()?
        .unwrap_or_default();

    Ok((front_matter, parsed.content.trim().to_string()))
}

/// Slug from front matter, else the file stem.
fn slug_for(front_matter: &FrontMatter, path: &Path) -> Result<String> {
    if let Some(slug) = &front_matter.slug {
        return Ok(slug.clone());
    }
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .with_context(|| format!("Cannot derive a slug from '{}'", path.display()))
}

fn title_for(front_matter: &FrontMatter, slug: &str) -> String {
    front_matter.title.clone().unwrap_or_else(|| slug.replace(['-', '_'], " "))
}

/// Load a post file.
///
/// # Errors
///
/// Fails when the file cannot be read or its front matter is invalid.
pub fn load_post(path: &Path) -> Result<Post> {
    let (front_matter, body) = parse(path)?;
    let slug = slug_for(&front_matter, path)?;
    Ok(Post {
        title: title_for(&front_matter, &slug),
        slug,
        body,
        excerpt: front_matter.excerpt,
        author: front_matter.author.map(Author::from),
        published_at: front_matter.published_at,
        updated_at: front_matter.updated_at,
        post_type: front_matter.post_type.unwrap_or_else(|| DEFAULT_POST_TYPE.to_string()),
        meta_description: front_matter.meta_description,
        tags: front_matter.tags,
    })
}

/// Load a page file.
///
/// # Errors
///
/// Fails when the file cannot be read or its front matter is invalid.
pub fn load_page(path: &Path) -> Result<Page> {
    let (front_matter, body) = parse(path)?;
    let slug = slug_for(&front_matter, path)?;
    Ok(Page {
        title: title_for(&front_matter, &slug),
        slug,
        body,
        author: front_matter.author.map(Author::from),
        published_at: front_matter.published_at,
        updated_at: front_matter.updated_at,
        meta_description: front_matter.meta_description,
    })
}

/// Load a listing file and every post it names.
///
/// # Errors
///
/// Fails when the listing or any listed post cannot be loaded.
pub fn load_listing(path: &Path) -> Result<Listing> {
    let (front_matter, _) = parse(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));

    let mut posts = Vec::with_capacity(front_matter.posts.len());
    for entry in &front_matter.posts {
        if Path::new(entry).is_absolute() {
            bail!("Listing '{}' names absolute post path '{}'", path.display(), entry);
        }
        posts.push(load_post(&base.join(entry))?);
    }

    // Newest first; undated posts last
    posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));

    Ok(Listing {
        title: front_matter.title,
        route_prefix: front_matter.route_prefix,
        preference: front_matter.preference.unwrap_or_default(),
        posts,
    })
}
