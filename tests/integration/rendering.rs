use std::fs;

use stagehand_cli::content::{ContentItem, load_listing, load_page, load_post};
use stagehand_cli::templating::{RenderContext, RenderPipeline, TemplateResolver, Viewer};
use stagehand_cli::test_utils::ThemeFixture;

use crate::common::{TestSite, aurora, bare};

async fn pipeline_for(site: &TestSite, active: &str) -> RenderPipeline {
    let manager = site.manager().await.unwrap();
    assert!(manager.install_all_themes(Some("tests")).unwrap().all_succeeded());
    assert!(manager.activate_theme(active));
    RenderPipeline::new(TemplateResolver::new(manager))
}

fn about_page(site: &TestSite) -> ContentItem {
    let path = site
        .write_content("about.md", "---\ntitle: About us\n---\n<p>We write about weather.</p>\n")
        .unwrap();
    ContentItem::Page(load_page(&path).unwrap())
}

#[tokio::test]
async fn test_page_resolution_order() {
    let site = TestSite::new().unwrap();
    let dir = site
        .add_theme(
            &bare("tiers")
                .view("pages/about", "specific:{{ title }}")
                .view("about", "slug:{{ title }}")
                .view("page", "generic:{{ title }}"),
        )
        .unwrap();
    let pipeline = pipeline_for(&site, "tiers").await;
    let page = about_page(&site);
    let render = || pipeline.render_content(&page, &RenderContext::new(), &Viewer::guest());

    assert!(render().contains("specific:About us"));

    fs::remove_file(dir.join("templates/pages/about.html")).unwrap();
    let html = render();
    assert!(html.contains("slug:About us"));
    assert!(!html.contains("specific:"));

    fs::remove_file(dir.join("templates/about.html")).unwrap();
    assert!(render().contains("generic:About us"));

    fs::remove_file(dir.join("templates/page.html")).unwrap();
    let html = render();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<article class=\"page\">"));
    assert!(html.contains("<p>We write about weather.</p>"));
}

#[tokio::test]
async fn test_theme_without_views_renders_every_kind() {
    let site = TestSite::new().unwrap();
    site.add_theme(&bare("empty")).unwrap();
    let pipeline = pipeline_for(&site, "empty").await;

    site.write_content(
        "posts/rain.md",
        "---\ntitle: Rain all week\nauthor: Sam\npublished_at: 2024-05-01T09:00:00Z\n---\n<p>It rained.</p>\n",
    )
    .unwrap();
    site.write_content(
        "posts/sun.md",
        "---\ntitle: Sun at last\npublished_at: 2024-05-08T09:00:00Z\n---\n<p>Finally.</p>\n",
    )
    .unwrap();
    let listing_path = site
        .write_content(
            "journal.md",
            "---\ntitle: Journal\nposts:\n  - posts/rain.md\n  - posts/sun.md\n---\n",
        )
        .unwrap();

    let post = ContentItem::Post(load_post(&site.root().join("content/posts/rain.md")).unwrap());
    let listing = ContentItem::Index(load_listing(&listing_path).unwrap());
    let page = about_page(&site);

    for item in [&post, &page, &listing] {
        let html = pipeline.render_content(item, &RenderContext::new(), &Viewer::guest());
        assert!(html.starts_with("<!DOCTYPE html>"), "{} was not a document", item.kind());
        assert!(html.contains("Field Notes"));
    }

    let html = pipeline.render_content(&post, &RenderContext::new(), &Viewer::guest());
    assert!(html.contains("By Sam"));
    assert!(html.contains("<p>It rained.</p>"));

    let html = pipeline.render_content(&page, &RenderContext::new(), &Viewer::guest());
    assert!(html.contains("<title>About us | Field Notes</title>"));
    assert!(html.contains("<meta name=\"description\" content=\"We write about weather.\">"));

    let html = pipeline.render_content(&listing, &RenderContext::new(), &Viewer::guest());
    assert!(html.contains("<meta name=\"description\" content=\"Notes from the field\">"));
    let sun = html.find("Sun at last").unwrap();
    let rain = html.find("Rain all week").unwrap();
    assert!(sun < rain, "newest post should be listed first");
    assert!(html.contains("href=\"/posts/rain\""));
}

#[tokio::test]
async fn test_no_active_theme_still_renders() {
    let site = TestSite::new().unwrap();
    let manager = site.manager().await.unwrap();
    let pipeline = RenderPipeline::new(TemplateResolver::new(manager));

    let html = pipeline.render_content(&about_page(&site), &RenderContext::new(), &Viewer::guest());
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>About us | Field Notes</title>"));
    assert!(html.contains("<link rel=\"icon\" href=\"/favicon.ico\">"));
}

#[tokio::test]
async fn test_theme_layout_wraps_fragment() {
    let site = TestSite::new().unwrap();
    site.add_theme(&aurora()).unwrap();
    let pipeline = pipeline_for(&site, "aurora").await;

    let html = pipeline.render_content(&about_page(&site), &RenderContext::new(), &Viewer::guest());

    assert!(html.starts_with("<!DOCTYPE html><html>"));
    assert!(html.contains("<title>About us | Field Notes</title>"));
    assert!(html.contains("<header>Field Notes</header>"));
    assert!(html.contains(concat!(
        "<main><article class=\"aurora-page\"><h1>About us</h1>",
        "<p>We write about weather.</p></article></main>"
    )));
    assert!(html.contains("<footer>aurora footer</footer>"));
    assert_eq!(html.matches("<html").count(), 1);
}

#[tokio::test]
async fn test_complete_document_is_not_wrapped() {
    let site = TestSite::new().unwrap();
    let document = "<!doctype html>\n<html><body>standalone {{ title }}</body></html>";
    site.add_theme(&aurora().view("pages/about", document)).unwrap();
    let pipeline = pipeline_for(&site, "aurora").await;

    let html = pipeline.render_content(&about_page(&site), &RenderContext::new(), &Viewer::guest());

    assert_eq!(html, "<!doctype html>\n<html><body>standalone About us</body></html>");
    assert!(!html.contains("aurora footer"));
}

#[tokio::test]
async fn test_custom_post_type_and_archive_views() {
    let site = TestSite::new().unwrap();
    site.add_theme(
        &bare("events")
            .view("single-event", "event:{{ title }}")
            .view("post", "post:{{ title }}")
            .view("archives/news", "{% for post in posts %}[{{ post.title }}]{% endfor %}"),
    )
    .unwrap();
    let pipeline = pipeline_for(&site, "events").await;

    let event = site
        .write_content(
            "launch.md",
            "---\ntitle: Launch party\npost_type: event\n---\n<p>Cake.</p>\n",
        )
        .unwrap();
    let plain = site.write_content("notes.md", "---\ntitle: Notes\n---\n").unwrap();
    let news = site
        .write_content(
            "news.md",
            "---\ntitle: News\nroute_prefix: news\npreference: prefer-posts\nposts:\n  - notes.md\n---\n",
        )
        .unwrap();

    let render =
        |item: ContentItem| pipeline.render_content(&item, &RenderContext::new(), &Viewer::guest());

    assert!(render(ContentItem::Post(load_post(&event).unwrap())).contains("event:Launch party"));
    assert!(render(ContentItem::Post(load_post(&plain).unwrap())).contains("post:Notes"));
    assert!(render(ContentItem::Index(load_listing(&news).unwrap())).contains("[Notes]"));
}

#[tokio::test]
async fn test_caller_values_and_asset_urls() {
    let site = TestSite::new().unwrap();
    site.add_theme(
        &ThemeFixture::new("assets")
            .directory("assets-theme")
            .asset("css/site.css", "body{}")
            .asset("js/site.js", "")
            .view(
                "page",
                "{% for href in assets.css %}<link href=\"{{ href }}\">{% endfor %}<h1>{{ title }}</h1><p>{{ theme.name }}</p>",
            ),
    )
    .unwrap();
    let pipeline = pipeline_for(&site, "assets").await;

    let extra = RenderContext::new()
        .with("title", "Overridden")
        .with("page_title", "Custom title");
    let html = pipeline.render_content(&about_page(&site), &extra, &Viewer::guest());

    assert!(html.contains("<link href=\"/themes/assets-theme/css/site.css\">"));
    assert!(html.contains("<h1>Overridden</h1>"));
    assert!(html.contains("<p>Assets</p>"));
    assert!(html.contains("<title>Custom title</title>"));
    assert!(html.contains("<script src=\"/themes/assets-theme/js/site.js\"></script>"));
}

#[tokio::test]
async fn test_broken_view_falls_back() {
    let site = TestSite::new().unwrap();
    site.add_theme(&bare("broken-views").view("page", "{% if %}")).unwrap();
    let pipeline = pipeline_for(&site, "broken-views").await;

    let html = pipeline.render_content(&about_page(&site), &RenderContext::new(), &Viewer::guest());
    assert!(html.contains("<article class=\"page\">"));
    assert!(html.contains("About us"));
}

#[tokio::test]
async fn test_broken_unrelated_view_leaves_theme_working() {
    let site = TestSite::new().unwrap();
    site.add_theme(
        &bare("patchy")
            .view("page", "patchy:{{ title }}")
            .view("posts/old", "{% if %}"),
    )
    .unwrap();
    let pipeline = pipeline_for(&site, "patchy").await;

    let html = pipeline.render_content(&about_page(&site), &RenderContext::new(), &Viewer::guest());
    assert!(html.contains("patchy:About us"));
}

#[tokio::test]
async fn test_folder_named_after_slug_from_another_theme_is_ignored() {
    let site = TestSite::new().unwrap();
    site.add_theme(&bare("aurora").directory("aurora-2024")).unwrap();
    site.add_theme(
        &bare("borealis")
            .directory("aurora")
            .view("page", "<!DOCTYPE html><html>BOREALIS PAGE</html>"),
    )
    .unwrap();
    let pipeline = pipeline_for(&site, "aurora").await;

    let html = pipeline.render_content(&about_page(&site), &RenderContext::new(), &Viewer::guest());
    assert!(!html.contains("BOREALIS"));
    assert!(html.contains("<article class=\"page\">"));
}
