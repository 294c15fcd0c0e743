use std::sync::Arc;
use std::time::Duration;

use stagehand_cli::content::{ContentItem, load_page};
use stagehand_cli::menu::{MemoryMenuStore, Menu, MenuNode, MenuService, RouteTable, Visibility};
use stagehand_cli::templating::{RenderContext, RenderPipeline, TemplateResolver, Viewer};

use crate::common::{TestSite, aurora, bare};

fn primary_menu() -> Menu {
    Menu::new("main", "Main navigation")
        .at("primary")
        .item(MenuNode::new(1, "Home").url("/"))
        .item(MenuNode::new(2, "About").page("about"))
        .item(
            MenuNode::new(3, "Members")
                .visibility(Visibility::Auth)
                .child(MenuNode::new(4, "Dashboard").route("dashboard"))
                .child(MenuNode::new(5, "Everyone inside").visibility(Visibility::All)),
        )
        .item(MenuNode::new(6, "Sign in").route("login").visibility(Visibility::Guest))
        .item(MenuNode::new(7, "Lost").route("nowhere"))
}

async fn setup(site: &TestSite) -> (RenderPipeline, MenuService, ContentItem) {
    site.add_theme(&aurora()).unwrap();
    let manager = site.manager().await.unwrap();
    manager.install_all_themes(None).unwrap();
    assert!(manager.activate_theme("aurora"));

    let menus = MenuService::new(
        Arc::new(MemoryMenuStore::with_menus([primary_menu()])),
        manager.cache().clone(),
        Duration::from_secs(60),
    );
    let routes = RouteTable::new().with("dashboard", "/members").with("login", "/login");
    let pipeline = RenderPipeline::new(TemplateResolver::new(manager))
        .with_menus(menus.clone())
        .with_routes(Arc::new(routes));

    let page = site.write_content("about.md", "---\ntitle: About\n---\n<p>Hi</p>").unwrap();
    (pipeline, menus, ContentItem::Page(load_page(&page).unwrap()))
}

#[tokio::test]
async fn test_guest_sees_guest_items_only() {
    let site = TestSite::new().unwrap();
    let (pipeline, _, page) = setup(&site).await;

    let html = pipeline.render_content(&page, &RenderContext::new(), &Viewer::guest());

    assert!(html.contains("<nav><ul class=\"menu\">"));
    assert!(html.contains("<a href=\"/\">Home</a>"));
    assert!(html.contains("<a href=\"/about\">About</a>"));
    assert!(html.contains("<a href=\"/login\">Sign in</a>"));
    assert!(html.contains("<a href=\"#\">Lost</a>"));
    // The hidden parent takes its whole subtree with it
    assert!(!html.contains("Members"));
    assert!(!html.contains("Dashboard"));
    assert!(!html.contains("Everyone inside"));
}

#[tokio::test]
async fn test_authenticated_viewer_sees_member_subtree() {
    let site = TestSite::new().unwrap();
    let (pipeline, _, page) = setup(&site).await;

    let viewer = Viewer {
        authenticated: true,
        current_url: Some("/about".to_string()),
    };
    let html = pipeline.render_content(&page, &RenderContext::new(), &viewer);

    assert!(html.contains(concat!(
        "<li class=\"menu-item has-children\"><a href=\"#\">Members</a>",
        "<ul class=\"sub-menu\">"
    )));
    assert!(html.contains("<a href=\"/members\">Dashboard</a>"));
    assert!(html.contains("Everyone inside"));
    assert!(html.contains("<li class=\"menu-item current\"><a href=\"/about\">About</a></li>"));
    assert!(!html.contains("Sign in"));
}

#[tokio::test]
async fn test_menu_arrays_in_context() {
    let site = TestSite::new().unwrap();
    let (pipeline, _, page) = setup(&site).await;

    let theme = pipeline.resolver().themes().active_theme();
    let context = pipeline.build_context(
        &page,
        theme.as_ref(),
        &RenderContext::new(),
        &Viewer::authenticated(),
    );

    let items = context.get("menu_items").and_then(|m| m.get("primary")).unwrap();
    let labels: Vec<&str> = items
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["Home", "About", "Members", "Lost"]);
    assert_eq!(items[2]["children"][0]["url"], "/members");
}

#[tokio::test]
async fn test_saved_menu_shows_on_next_render() {
    let site = TestSite::new().unwrap();
    let (pipeline, menus, page) = setup(&site).await;

    let before = pipeline.render_content(&page, &RenderContext::new(), &Viewer::guest());
    assert!(before.contains("Sign in"));

    let blog_only = Menu::new("main", "Main navigation")
        .at("primary")
        .item(MenuNode::new(1, "Blog").url("/blog"));
    menus.save_menu(blog_only).unwrap();

    let after = pipeline.render_content(&page, &RenderContext::new(), &Viewer::guest());
    assert!(after.contains("<a href=\"/blog\">Blog</a>"));
    assert!(!after.contains("Sign in"));

    assert!(menus.delete_menu("main").unwrap());
    let without = pipeline.render_content(&page, &RenderContext::new(), &Viewer::guest());
    assert!(without.contains("<header>Field Notes</header>"));
}

#[tokio::test]
async fn test_locations_not_declared_by_theme_are_ignored() {
    let site = TestSite::new().unwrap();
    site.add_theme(&bare("plain").view("page", "{{ menus | json_encode() }}")).unwrap();
    let manager = site.manager().await.unwrap();
    manager.install_all_themes(None).unwrap();
    assert!(manager.activate_theme("plain"));

    let menus = MenuService::new(
        Arc::new(MemoryMenuStore::with_menus([primary_menu()])),
        manager.cache().clone(),
        Duration::from_secs(60),
    );
    let pipeline = RenderPipeline::new(TemplateResolver::new(manager)).with_menus(menus);
    let page = site.write_content("about.md", "---\ntitle: About\n---\n").unwrap();

    let html = pipeline.render_content(
        &ContentItem::Page(load_page(&page).unwrap()),
        &RenderContext::new(),
        &Viewer::guest(),
    );
    assert!(html.contains("{}"));
    assert!(!html.contains("Home"));
}
