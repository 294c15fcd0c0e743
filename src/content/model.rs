//! Typed content items handed to the rendering pipeline.
//!
//! Bodies are HTML; producing that HTML (from Markdown or a rich-text
//! editor) happens before content reaches the engine.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::templating::RenderContext;

/// Default post type slug.
pub const DEFAULT_POST_TYPE: &str = "post";

/// Words read per minute for `read_time`.
const WORDS_PER_MINUTE: usize = 200;

/// Length of generated excerpts, in characters.
const EXCERPT_CHARS: usize = 160;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A single post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default = "default_post_type")]
    pub post_type: String,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_post_type() -> String {
    DEFAULT_POST_TYPE.to_string()
}

/// A standalone page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub meta_description: Option<String>,
}

/// Which generic template a listing tries first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListingPreference {
    /// Home page: `index` before `posts`
    #[default]
    PreferIndex,
    /// Listing page: `posts` before `index`
    PreferPosts,
}

/// A list of posts, optionally bound to a route prefix such as `news`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub route_prefix: Option<String>,
    #[serde(default)]
    pub preference: ListingPreference,
    #[serde(default)]
    pub posts: Vec<Post>,
}

/// Anything the pipeline can render.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentItem {
    Post(Post),
    Page(Page),
    Index(Listing),
}

impl ContentItem {
    /// Short kind name: `post`, `page` or `index`.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Post(_) => "post",
            Self::Page(_) => "page",
            Self::Index(_) => "index",
        }
    }
}

/// Plain text of an HTML fragment, whitespace-collapsed.
#[must_use]
pub fn strip_tags(html: &str) -> String {
    let text = Regex::new(r"<[^>]*>")
        .map(|re| re.replace_all(html, " ").into_owned())
        .unwrap_or_else(|_| html.to_string());
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Estimated minutes to read `html`, never less than one.
#[must_use]
pub fn read_time(html: &str) -> usize {
    let words = strip_tags(html).split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1)
}

fn summarize(html: &str) -> String {
    let text = strip_tags(html);
    if text.chars().count() <= EXCERPT_CHARS {
        return text;
    }
    let cut: String = text.chars().take(EXCERPT_CHARS).collect();
    let trimmed = cut.rsplit_once(' ').map_or(cut.as_str(), |(head, _)| head);
    format!("{trimmed}…")
}

fn timestamp(value: Option<&DateTime<Utc>>) -> Value {
    value.map_or(Value::Null, |t| Value::String(t.to_rfc3339()))
}

impl Post {
    /// Given excerpt, or the start of the body as plain text.
    #[must_use]
    pub fn summary(&self) -> String {
        self.excerpt.clone().unwrap_or_else(|| summarize(&self.body))
    }

    /// Public path: `/posts/{slug}`, or `/{post_type}/{slug}` for custom types.
    #[must_use]
    pub fn url(&self) -> String {
        if self.post_type == DEFAULT_POST_TYPE {
            format!("/posts/{}", self.slug)
        } else {
            format!("/{}/{}", self.post_type, self.slug)
        }
    }

    /// Content-derived context fields.
    #[must_use]
    pub fn to_context(&self) -> RenderContext {
        RenderContext::from_value(json!({
            "title": self.title,
            "slug": self.slug,
            "url": self.url(),
            "body": self.body,
            "excerpt": self.summary(),
            "author": self.author,
            "published_at": timestamp(self.published_at.as_ref()),
            "updated_at": timestamp(self.updated_at.as_ref()),
            "post_type": self.post_type,
            "tags": self.tags,
            "read_time": read_time(&self.body),
            "meta_description": self.meta_description.clone().unwrap_or_else(|| self.summary()),
        }))
    }
}

impl Page {
    #[must_use]
    pub fn url(&self) -> String {
        format!("/{}", self.slug)
    }

    /// Content-derived context fields.
    #[must_use]
    pub fn to_context(&self) -> RenderContext {
        RenderContext::from_value(json!({
            "title": self.title,
            "slug": self.slug,
            "url": self.url(),
            "body": self.body,
            "author": self.author,
            "published_at": timestamp(self.published_at.as_ref()),
            "updated_at": timestamp(self.updated_at.as_ref()),
            "read_time": read_time(&self.body),
            "meta_description": self
                .meta_description
                .clone()
                .unwrap_or_else(|| summarize(&self.body)),
        }))
    }
}

impl Listing {
    /// Content-derived context fields; each post appears in `posts` with its
    /// own fields (without the full body).
    #[must_use]
    pub fn to_context(&self) -> RenderContext {
        let posts: Vec<Value> = self
            .posts
            .iter()
            .map(|post| {
                let mut value = post.to_context().into_value();
                if let Some(map) = value.as_object_mut() {
                    map.remove("body");
                }
                value
            })
            .collect();

        let mut context = RenderContext::new().with("posts", posts);
        if let Some(title) = &self.title {
            context.insert("title", title.as_str());
        }
        if let Some(prefix) = &self.route_prefix {
            context.insert("route_prefix", prefix.as_str());
        }
        context
    }
}
