//! Content rendering and layout composition.
//!
//! [`RenderPipeline::render_content`] always returns a complete HTML document:
//!
//! 1. Build the context: content fields, then common site/theme fields, then
//!    menus, then caller values (later layers win).
//! 2. Try the logical names for the content kind through the resolver,
//!    most specific first.
//! 3. A result that already is a document (doctype or `<html` near the top)
//!    is returned as-is. A fragment is wrapped in `layout`, with `header` and
//!    `footer` rendered into it.
//! 4. When no content template resolves, the built-in document for the
//!    content kind is returned.
//!
//! Candidate names:
//!
//! | Content | Candidates |
//! |---------|------------|
//! | page `about` | `pages/about`, `about`, `page` |
//! | post `rain` of type `event` | `posts/rain`, `single-event`, `post`, `single` |
//! | listing with prefix `news` | `archives/news`, `news`, then `index`/`posts` by preference |

use serde_json::{Value, json};
use std::sync::{Arc, OnceLock};

use regex::Regex;

use super::context::RenderContext;
use super::fallback;
use super::resolver::TemplateResolver;
use crate::content::{
    ContentItem, Listing, ListingPreference, Page, Post, PostTypeService,
    model::DEFAULT_POST_TYPE,
};
use crate::menu::{
    MenuHtmlOptions, MenuService, NoRoutes, RouteResolver, menu_tree_as_array, menu_tree_as_html,
};
use crate::theme::Theme;

/// How far into a rendered result to look for a document marker.
const DOCUMENT_SNIFF_CHARS: usize = 500;

fn document_marker() -> &'static Option<Regex> {
    static MARKER: OnceLock<Option<Regex>> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"(?i)<!doctype\s+html|<html[\s>]").ok())
}

/// Whether `html` is a complete document rather than a fragment.
#[must_use]
pub fn is_full_document(html: &str) -> bool {
    let head: String = html.chars().take(DOCUMENT_SNIFF_CHARS).collect();
    match document_marker() {
        Some(re) => re.is_match(&head),
        None => head.to_ascii_lowercase().contains("<!doctype html"),
    }
}

/// The person a page is rendered for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewer {
    pub authenticated: bool,
    /// Path of the page being rendered, used to mark the current menu item
    pub current_url: Option<String>,
}

impl Viewer {
    #[must_use]
    pub fn guest() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn authenticated() -> Self {
        Self {
            authenticated: true,
            current_url: None,
        }
    }
}

/// Layout partials rendered around a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partial {
    Layout,
    Header,
    Footer,
}

impl Partial {
    #[must_use]
    pub const fn logical_name(self) -> &'static str {
        match self {
            Self::Layout => "layout",
            Self::Header => "header",
            Self::Footer => "footer",
        }
    }

    fn fallback(self, context: &RenderContext) -> String {
        match self {
            Self::Layout => fallback::layout(context),
            Self::Header => fallback::header(context),
            Self::Footer => fallback::footer(context),
        }
    }
}

/// Logical names tried for a page.
#[must_use]
pub fn page_candidates(page: &Page) -> Vec<String> {
    vec![format!("pages/{}", page.slug), page.slug.clone(), "page".to_string()]
}

/// Logical names tried for a post.
#[must_use]
pub fn post_candidates(post: &Post) -> Vec<String> {
    let mut names = vec![format!("posts/{}", post.slug)];
    if post.post_type != DEFAULT_POST_TYPE {
        names.push(format!("single-{}", post.post_type));
    }
    names.push("post".to_string());
    names.push("single".to_string());
    names
}

/// Logical names tried for a listing.
#[must_use]
pub fn index_candidates(listing: &Listing) -> Vec<String> {
    let mut names = Vec::new();
    if let Some(prefix) = listing.route_prefix.as_deref().filter(|p| !p.is_empty()) {
        names.push(format!("archives/{prefix}"));
        names.push(prefix.to_string());
    }
    match listing.preference {
        ListingPreference::PreferIndex => names.extend(["index".to_string(), "posts".to_string()]),
        ListingPreference::PreferPosts => names.extend(["posts".to_string(), "index".to_string()]),
    }
    names
}

/// Logical names tried for any content item.
#[must_use]
pub fn candidates_for(item: &ContentItem) -> Vec<String> {
    match item {
        ContentItem::Post(post) => post_candidates(post),
        ContentItem::Page(page) => page_candidates(page),
        ContentItem::Index(listing) => index_candidates(listing),
    }
}

/// Renders content items into complete documents with the active theme.
#[derive(Clone)]
pub struct RenderPipeline {
    resolver: TemplateResolver,
    menus: Option<MenuService>,
    post_types: Option<PostTypeService>,
    routes: Arc<dyn RouteResolver + Send + Sync>,
}

impl std::fmt::Debug for RenderPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderPipeline")
            .field("resolver", &self.resolver)
            .field("menus", &self.menus)
            .field("post_types", &self.post_types)
            .finish_non_exhaustive()
    }
}

impl RenderPipeline {
    #[must_use]
    pub fn new(resolver: TemplateResolver) -> Self {
        Self {
            resolver,
            menus: None,
            post_types: None,
            routes: Arc::new(NoRoutes),
        }
    }

    /// Inject menus for the theme's declared locations.
    #[must_use]
    pub fn with_menus(mut self, menus: MenuService) -> Self {
        self.menus = Some(menus);
        self
    }

    /// Add post type labels to single-post contexts.
    #[must_use]
    pub fn with_post_types(mut self, post_types: PostTypeService) -> Self {
        self.post_types = Some(post_types);
        self
    }

    /// Resolve named routes in menu items.
    #[must_use]
    pub fn with_routes(mut self, routes: Arc<dyn RouteResolver + Send + Sync>) -> Self {
        self.routes = routes;
        self
    }

    #[must_use]
    pub const fn resolver(&self) -> &TemplateResolver {
        &self.resolver
    }

    /// Render a post into a complete document.
    #[must_use]
    pub fn render_post(&self, post: &Post, extra: &RenderContext, viewer: &Viewer) -> String {
        self.render_content(&ContentItem::Post(post.clone()), extra, viewer)
    }

    /// Render a page into a complete document.
    #[must_use]
    pub fn render_page(&self, page: &Page, extra: &RenderContext, viewer: &Viewer) -> String {
        self.render_content(&ContentItem::Page(page.clone()), extra, viewer)
    }

    /// Render a listing into a complete document.
    #[must_use]
    pub fn render_index(
        &self,
        listing: &Listing,
        extra: &RenderContext,
        viewer: &Viewer,
    ) -> String {
        self.render_content(&ContentItem::Index(listing.clone()), extra, viewer)
    }

    /// Render any content item into a complete document. Never fails.
    #[must_use]
    pub fn render_content(
        &self,
        item: &ContentItem,
        extra: &RenderContext,
        viewer: &Viewer,
    ) -> String {
        let theme = self.resolver.themes().active_theme();
        let context = self.build_context(item, theme.as_ref(), extra, viewer);
        let candidates = candidates_for(item);

        match self.resolver.render_first(&candidates, &context) {
            Some((name, html)) if is_full_document(&html) => {
                tracing::debug!("'{}' rendered a complete document", name);
                html
            }
            Some((name, html)) => {
                tracing::debug!("'{}' rendered a fragment; composing layout", name);
                self.compose_layout(&html, &context)
            }
            None => {
                tracing::debug!(
                    "No {} template among {:?}; using built-in markup",
                    item.kind(),
                    candidates
                );
                match item {
                    ContentItem::Post(_) => fallback::post(&context),
                    ContentItem::Page(_) => fallback::page(&context),
                    ContentItem::Index(_) => fallback::index(&context),
                }
            }
        }
    }

    /// Render one layout partial, falling back to the built-in markup.
    #[must_use]
    pub fn render_partial(&self, partial: Partial, context: &RenderContext) -> String {
        self.resolver
            .resolve_and_render(partial.logical_name(), context)
            .unwrap_or_else(|| partial.fallback(context))
    }

    /// Wrap `fragment` in the layout.
    ///
    /// Computed values (`content`, `page_title`, `header`, `footer`) only fill
    /// keys the context does not already have.
    #[must_use]
    pub fn compose_layout(&self, fragment: &str, context: &RenderContext) -> String {
        let mut layout_context = context.clone();
        layout_context.insert_default("content", fragment);
        layout_context.insert_default("page_title", page_title(context));

        if !layout_context.contains_key("header") {
            let header = self.render_partial(Partial::Header, &layout_context);
            layout_context.insert("header", header);
        }
        if !layout_context.contains_key("footer") {
            let footer = self.render_partial(Partial::Footer, &layout_context);
            layout_context.insert("footer", footer);
        }

        self.render_partial(Partial::Layout, &layout_context)
    }

    /// Full render context for `item`.
    #[must_use]
    pub fn build_context(
        &self,
        item: &ContentItem,
        theme: Option<&Theme>,
        extra: &RenderContext,
        viewer: &Viewer,
    ) -> RenderContext {
        let mut content = match item {
            ContentItem::Post(post) => {
                let mut ctx = post.to_context();
                if let Some(post_types) = &self.post_types {
                    ctx.insert("post_type_label", post_types.label(&post.post_type));
                }
                ctx
            }
            ContentItem::Page(page) => page.to_context(),
            ContentItem::Index(listing) => listing.to_context(),
        };
        content.insert("content_kind", item.kind());

        let mut context = content
            .merged(&self.common_context(theme))
            .merged(&self.menu_context(theme, viewer))
            .merged(extra);

        let description = self.resolver.themes().config().site.description.clone();
        if !description.is_empty() {
            context.insert_default("meta_description", description);
        }
        let title = page_title(&context);
        context.insert_default("page_title", title);
        context
    }

    /// Site and theme values shared by every render.
    #[must_use]
    pub fn common_context(&self, theme: Option<&Theme>) -> RenderContext {
        let themes = self.resolver.themes();
        let site = &themes.config().site;

        let mut context = RenderContext::new()
            .with(
                "site",
                json!({
                    "name": site.name,
                    "url": site.url,
                    "description": site.description,
                    "locale": site.locale,
                }),
            )
            .with("site_name", site.name.as_str())
            .with("favicon_url", themes.favicon_url(theme));

        match theme {
            Some(theme) => {
                let urls = |files: &[String]| -> Vec<Value> {
                    files.iter().map(|file| Value::String(themes.asset_url(theme, file))).collect()
                };
                context.insert("theme", theme.summary());
                context.insert("theme_settings", theme.settings_defaults());
                context.insert(
                    "assets",
                    json!({ "css": urls(&theme.assets.css), "js": urls(&theme.assets.js) }),
                );
            }
            None => {
                context.insert("assets", json!({ "css": [], "js": [] }));
            }
        }
        context
    }

    /// `menus.<location>` (markup) and `menu_items.<location>` (arrays) for
    /// every location the theme declares. Both objects are always present.
    #[must_use]
    pub fn menu_context(&self, theme: Option<&Theme>, viewer: &Viewer) -> RenderContext {
        let (Some(theme), Some(menus)) = (theme, &self.menus) else {
            return RenderContext::new().with("menus", json!({})).with("menu_items", json!({}));
        };

        let options = MenuHtmlOptions {
            authenticated: viewer.authenticated,
            current_url: viewer.current_url.clone(),
            ..Default::default()
        };

        let mut html = serde_json::Map::new();
        let mut items = serde_json::Map::new();
        for location in theme.menus.keys() {
            let Some(menu) = menus.menu_for(location) else {
                continue;
            };
            html.insert(
                location.clone(),
                Value::String(menu_tree_as_html(&menu, self.routes.as_ref(), &options)),
            );
            let tree = menu_tree_as_array(&menu, self.routes.as_ref(), viewer.authenticated);
            items.insert(location.clone(), serde_json::to_value(tree).unwrap_or(Value::Null));
        }

        RenderContext::new().with("menus", html).with("menu_items", items)
    }
}

/// `"{title} | {site}"`, or just the site name when there is no title.
fn page_title(context: &RenderContext) -> String {
    let site = context.get_str("site_name").unwrap_or_default();
    match context.get_str("title").filter(|t| !t.is_empty()) {
        Some(title) if !site.is_empty() => format!("{title} | {site}"),
        Some(title) => title.to_string(),
        None => site.to_string(),
    }
}
