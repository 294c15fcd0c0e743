//! Built-in HTML used when the active theme provides no template.
//!
//! Each generator reads what it needs from a [`RenderContext`] and always
//! produces well-formed markup. Text values are HTML-escaped; `body`,
//! `content`, `header`, `footer` and `menus.*` are already HTML and are
//! inserted as-is.
//!
//! The content-kind generators ([`post`], [`page`], [`index`]) return complete
//! documents; the pipeline returns them directly without layout composition.

use serde_json::Value;
use tera::escape_html;

use super::context::RenderContext;
use super::utils::escape_attr as attr;

fn text(ctx: &RenderContext, path: &str) -> Option<String> {
    ctx.get_str(path).filter(|s| !s.is_empty()).map(escape_html)
}

fn url(ctx: &RenderContext, path: &str) -> Option<String> {
    ctx.get_str(path).filter(|s| !s.is_empty()).map(attr)
}

fn raw<'a>(ctx: &'a RenderContext, path: &str) -> &'a str {
    ctx.get_str(path).unwrap_or_default()
}

fn urls(ctx: &RenderContext, kind: &str) -> Vec<String> {
    ctx.get("assets")
        .and_then(|assets| assets.get(kind))
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(Value::as_str).map(attr).collect())
        .unwrap_or_default()
}

fn site_name(ctx: &RenderContext) -> String {
    text(ctx, "site_name").or_else(|| text(ctx, "site.name")).unwrap_or_default()
}

/// The first rendered menu in `menus`, if any.
fn primary_menu(ctx: &RenderContext) -> Option<&str> {
    let menus = ctx.get("menus")?.as_object()?;
    menus.get("primary").or_else(|| menus.values().next()).and_then(Value::as_str)
}

/// `<header>` with the site name and the primary menu.
#[must_use]
pub fn header(ctx: &RenderContext) -> String {
    let home = url(ctx, "site.url").unwrap_or_else(|| "/".to_string());
    let mut html = format!(
        "<header class=\"site-header\">\n  <a class=\"site-title\" href=\"{}\">{}</a>\n",
        home,
        site_name(ctx)
    );
    if let Some(menu) = primary_menu(ctx) {
        html.push_str(&format!("  <nav>{menu}</nav>\n"));
    }
    html.push_str("</header>");
    html
}

/// `<footer>` with a copyright line.
#[must_use]
pub fn footer(ctx: &RenderContext) -> String {
    let year = chrono::Utc::now().format("%Y");
    format!(
        "<footer class=\"site-footer\">\n  <p>&copy; {} {}</p>\n</footer>",
        year,
        site_name(ctx)
    )
}

/// Complete document around `content`, using `header`/`footer` from the
/// context when present and the built-in ones otherwise.
#[must_use]
pub fn layout(ctx: &RenderContext) -> String {
    let title = text(ctx, "page_title")
        .or_else(|| text(ctx, "title"))
        .unwrap_or_else(|| site_name(ctx));
    let lang = text(ctx, "site.locale").unwrap_or_else(|| "en".to_string());

    let mut head = format!("  <meta charset=\"utf-8\">\n  <title>{title}</title>\n");
    if let Some(description) = text(ctx, "meta_description") {
        head.push_str(&format!("  <meta name=\"description\" content=\"{description}\">\n"));
    }
    if let Some(favicon) = url(ctx, "favicon_url") {
        head.push_str(&format!("  <link rel=\"icon\" href=\"{favicon}\">\n"));
    }
    for href in urls(ctx, "css") {
        head.push_str(&format!("  <link rel=\"stylesheet\" href=\"{href}\">\n"));
    }

    let header_html =
        ctx.get_str("header").map_or_else(|| header(ctx), std::string::ToString::to_string);
    let footer_html =
        ctx.get_str("footer").map_or_else(|| footer(ctx), std::string::ToString::to_string);

    let mut scripts = String::new();
    for src in urls(ctx, "js") {
        scripts.push_str(&format!("<script src=\"{src}\"></script>\n"));
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"{lang}\">\n<head>\n{head}</head>\n<body>\n{header_html}\n<main>\n{content}\n</main>\n{footer_html}\n{scripts}</body>\n</html>\n",
        content = raw(ctx, "content"),
    )
}

fn byline(ctx: &RenderContext) -> String {
    let mut parts = Vec::new();
    if let Some(author) = text(ctx, "author.name") {
        parts.push(format!("By {author}"));
    }
    if let Some(date) = text(ctx, "published_at") {
        parts.push(format!("<time>{date}</time>"));
    }
    if let Some(minutes) = ctx.get("read_time").and_then(Value::as_u64) {
        parts.push(format!("{minutes} min read"));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!("  <p class=\"byline\">{}</p>\n", parts.join(" &middot; "))
    }
}

fn in_layout(ctx: &RenderContext, content: String) -> String {
    layout(&ctx.merged(&RenderContext::new().with("content", content)))
}

/// Complete document for a single post.
#[must_use]
pub fn post(ctx: &RenderContext) -> String {
    let title = text(ctx, "title").unwrap_or_default();
    let content = format!(
        "<article class=\"post\">\n  <h1>{}</h1>\n{}  <div class=\"post-body\">{}</div>\n</article>",
        title,
        byline(ctx),
        raw(ctx, "body")
    );
    in_layout(ctx, content)
}

/// Complete document for a single page.
#[must_use]
pub fn page(ctx: &RenderContext) -> String {
    let title = text(ctx, "title").unwrap_or_default();
    let content = format!(
        "<article class=\"page\">\n  <h1>{}</h1>\n  <div class=\"page-body\">{}</div>\n</article>",
        title,
        raw(ctx, "body")
    );
    in_layout(ctx, content)
}

/// Complete document for a listing of posts.
#[must_use]
pub fn index(ctx: &RenderContext) -> String {
    let title = text(ctx, "title").unwrap_or_else(|| site_name(ctx));
    let mut content = format!("<section class=\"listing\">\n  <h1>{title}</h1>\n");

    let posts = ctx.get("posts").and_then(Value::as_array).cloned().unwrap_or_default();
    if posts.is_empty() {
        content.push_str("  <p>Nothing has been published yet.</p>\n");
    } else {
        content.push_str("  <ul class=\"posts\">\n");
        for item in &posts {
            let item = RenderContext::from_value(item.clone());
            let item_title = text(&item, "title").unwrap_or_default();
            let href = url(&item, "url").unwrap_or_else(|| "#".to_string());
            content.push_str(&format!("    <li><a href=\"{href}\">{item_title}</a>"));
            if let Some(excerpt) = text(&item, "excerpt") {
                content.push_str(&format!("<p>{excerpt}</p>"));
            }
            content.push_str("</li>\n");
        }
        content.push_str("  </ul>\n");
    }
    content.push_str("</section>");

    in_layout(ctx, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> RenderContext {
        RenderContext::new()
            .with("site", json!({ "name": "Field Notes", "url": "/", "locale": "en" }))
            .with("assets", json!({ "css": ["/themes/a/app.css"], "js": ["/themes/a/app.js"] }))
            .with("favicon_url", "/favicon.ico")
    }

    #[test]
    fn test_post_fallback_is_complete_document() {
        let html = post(
            &ctx()
                .with("title", "Rain <today>")
                .with("body", "<p>Wet.</p>")
                .with("author", json!({ "name": "Sam" }))
                .with("read_time", 1),
        );

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1>Rain &lt;today&gt;</h1>"));
        assert!(html.contains("<p>Wet.</p>"));
        assert!(html.contains("By Sam"));
        assert!(html.contains("1 min read"));
        assert!(html.contains("<title>Rain &lt;today&gt;</title>"));
        assert!(html.contains("<link rel=\"stylesheet\" href=\"/themes/a/app.css\">"));
        assert!(html.contains("<script src=\"/themes/a/app.js\"></script>"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_layout_uses_supplied_header() {
        let html =
            layout(&ctx().with("content", "<p>x</p>").with("header", "<header>custom</header>"));
        assert!(html.contains("<header>custom</header>"));
        assert!(html.contains("site-footer"));
        assert!(html.contains("<main>\n<p>x</p>\n</main>"));
    }

    #[test]
    fn test_index_fallback() {
        let html = index(&ctx().with(
            "posts",
            json!([{ "title": "First", "url": "/posts/first", "excerpt": "Hi" }]),
        ));
        assert!(html.contains("<h1>Field Notes</h1>"));
        assert!(html.contains("First</a><p>Hi</p>"));

        let empty = index(&ctx().with("title", "News"));
        assert!(empty.contains("Nothing has been published yet."));
    }

    #[test]
    fn test_header_includes_primary_menu() {
        let html = header(&ctx().with("menus", json!({ "primary": "<ul><li>Home</li></ul>" })));
        assert!(html.contains("<nav><ul><li>Home</li></ul></nav>"));
    }

    #[test]
    fn test_page_with_empty_context() {
        let html = page(&RenderContext::new());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<article class=\"page\">"));
    }
}
