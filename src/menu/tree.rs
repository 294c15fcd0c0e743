//! Menu tree serialization.
//!
//! [`fold_visible`] is the one walk over a menu forest. It skips items the
//! viewer may not see (never descending into them), resolves each visible
//! item's URL, and hands the item, its URL and its already-folded children
//! to a caller-supplied function. [`menu_tree_as_html`] and
//! [`menu_tree_as_array`] are two such functions, so both forms always agree
//! on ordering and filtering.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tera::escape_html;

use super::model::{Menu, MenuNode};
use crate::templating::utils::escape_attr;

/// URL used when an item has no resolvable link.
pub const PLACEHOLDER_URL: &str = "#";

/// Turns a named route into a path.
pub trait RouteResolver {
    /// `None` when the route is unknown.
    fn resolve(&self, name: &str) -> Option<String>;
}

/// Resolves no routes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRoutes;

impl RouteResolver for NoRoutes {
    fn resolve(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Fixed route table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteTable(pub HashMap<String, String>);

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: &str, path: &str) -> Self {
        self.0.insert(name.to_string(), path.to_string());
        self
    }
}

impl RouteResolver for RouteTable {
    fn resolve(&self, name: &str) -> Option<String> {
        self.0.get(name).cloned()
    }
}

/// Effective link for a node: explicit URL, page link, named route, placeholder.
#[must_use]
pub fn resolve_url(node: &MenuNode, routes: &dyn RouteResolver) -> String {
    if let Some(url) = node.url.as_deref().filter(|u| !u.is_empty()) {
        return url.to_string();
    }
    if let Some(slug) = node.page_slug.as_deref().filter(|s| !s.is_empty()) {
        return format!("/{}", slug.trim_start_matches('/'));
    }
    if let Some(route) = node.route.as_deref().filter(|r| !r.is_empty()) {
        if let Some(path) = routes.resolve(route) {
            return path;
        }
        tracing::debug!("Menu route '{}' did not resolve", route);
    }
    PLACEHOLDER_URL.to_string()
}

/// Fold the visible part of a menu forest bottom-up.
///
/// `visit` receives a visible node, its resolved URL, and the folded results
/// of its visible children.
pub fn fold_visible<T, F>(
    nodes: &[MenuNode],
    authenticated: bool,
    routes: &dyn RouteResolver,
    visit: &mut F,
) -> Vec<T>
where
    F: FnMut(&MenuNode, String, Vec<T>) -> T,
{
    nodes
        .iter()
        .filter(|node| node.visibility.allows(authenticated))
        .map(|node| {
            let children = fold_visible(&node.children, authenticated, routes, visit);
            visit(node, resolve_url(node, routes), children)
        })
        .collect()
}

/// Options for [`menu_tree_as_html`].
#[derive(Debug, Clone)]
pub struct MenuHtmlOptions {
    pub authenticated: bool,
    /// Class of the outer `<ul>`
    pub menu_class: String,
    /// Class of nested `<ul>` elements
    pub submenu_class: String,
    /// Items linking here get the `current` class
    pub current_url: Option<String>,
}

impl Default for MenuHtmlOptions {
    fn default() -> Self {
        Self {
            authenticated: false,
            menu_class: "menu".to_string(),
            submenu_class: "sub-menu".to_string(),
            current_url: None,
        }
    }
}

/// A menu item in array form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuTreeItem {
    pub id: u64,
    pub label: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub children: Vec<MenuTreeItem>,
}

/// Render a menu as nested `<ul>`/`<li>` markup.
///
/// An empty string is returned when no item is visible.
#[must_use]
pub fn menu_tree_as_html(
    menu: &Menu,
    routes: &dyn RouteResolver,
    options: &MenuHtmlOptions,
) -> String {
    let mut render_item = |node: &MenuNode, url: String, children: Vec<String>| {
        let mut classes = vec!["menu-item"];
        if !children.is_empty() {
            classes.push("has-children");
        }
        if options.current_url.as_deref() == Some(url.as_str()) {
            classes.push("current");
        }

        let target = node
            .target
            .as_deref()
            .map(|t| format!(" target=\"{}\"", escape_attr(t)))
            .unwrap_or_default();
        let mut li = format!(
            "<li class=\"{}\"><a href=\"{}\"{}>{}</a>",
            classes.join(" "),
            escape_attr(&url),
            target,
            escape_html(&node.label)
        );
        if !children.is_empty() {
            li.push_str(&format!(
                "<ul class=\"{}\">{}</ul>",
                escape_attr(&options.submenu_class),
                children.concat()
            ));
        }
        li.push_str("</li>");
        li
    };
    let items = fold_visible(&menu.items, options.authenticated, routes, &mut render_item);

    if items.is_empty() {
        return String::new();
    }
    format!("<ul class=\"{}\">{}</ul>", escape_attr(&options.menu_class), items.concat())
}

/// Render a menu as a nested array of items.
#[must_use]
pub fn menu_tree_as_array(
    menu: &Menu,
    routes: &dyn RouteResolver,
    authenticated: bool,
) -> Vec<MenuTreeItem> {
    fold_visible(&menu.items, authenticated, routes, &mut |node, url, children| MenuTreeItem {
        id: node.id,
        label: node.label.clone(),
        url,
        target: node.target.clone(),
        children,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::model::Visibility;

    fn menu() -> Menu {
        Menu::new("main", "Main")
            .item(MenuNode::new(1, "Home").url("/"))
            .item(MenuNode::new(2, "About").page("about"))
            .item(
                MenuNode::new(3, "Account")
                    .visibility(Visibility::Auth)
                    .child(MenuNode::new(4, "Profile").route("profile"))
                    .child(MenuNode::new(5, "Everyone").visibility(Visibility::All)),
            )
            .item(MenuNode::new(6, "Sign in").route("login").visibility(Visibility::Guest))
            .item(MenuNode::new(7, "Broken").route("missing"))
    }

    fn routes() -> RouteTable {
        RouteTable::new().with("profile", "/me").with("login", "/login")
    }

    #[test]
    fn test_url_priority() {
        let routes = routes();
        let both = MenuNode::new(1, "x").url("/explicit").page("page").route("login");
        assert_eq!(resolve_url(&both, &routes), "/explicit");
        let page = MenuNode::new(1, "x").page("page").route("login");
        assert_eq!(resolve_url(&page, &routes), "/page");
        assert_eq!(resolve_url(&MenuNode::new(1, "x").route("login"), &routes), "/login");
        assert_eq!(resolve_url(&MenuNode::new(1, "x").route("nope"), &routes), "#");
        assert_eq!(resolve_url(&MenuNode::new(1, "x"), &NoRoutes), "#");
    }

    #[test]
    fn test_auth_subtree_hidden_from_guests() {
        let html = menu_tree_as_html(&menu(), &routes(), &MenuHtmlOptions::default());
        assert!(!html.contains("Account"));
        assert!(!html.contains("Profile"));
        assert!(!html.contains("Everyone"));
        assert!(html.contains("<a href=\"/login\">Sign in</a>"));
        assert!(html.contains("<a href=\"#\">Broken</a>"));

        let array = menu_tree_as_array(&menu(), &routes(), false);
        assert!(array.iter().all(|item| item.id != 3));
    }

    #[test]
    fn test_authenticated_viewer() {
        let options = MenuHtmlOptions {
            authenticated: true,
            current_url: Some("/me".to_string()),
            ..Default::default()
        };
        let html = menu_tree_as_html(&menu(), &routes(), &options);
        assert!(html.contains(
            "<li class=\"menu-item has-children\"><a href=\"#\">Account</a><ul class=\"sub-menu\">"
        ));
        assert!(html.contains("<li class=\"menu-item current\"><a href=\"/me\">Profile</a></li>"));
        assert!(!html.contains("Sign in"));
    }

    #[test]
    fn test_html_and_array_agree() {
        for authenticated in [false, true] {
            let array = menu_tree_as_array(&menu(), &routes(), authenticated);
            let html = menu_tree_as_html(
                &menu(),
                &routes(),
                &MenuHtmlOptions {
                    authenticated,
                    ..Default::default()
                },
            );

            fn labels(items: &[MenuTreeItem], out: &mut Vec<String>) {
                for item in items {
                    out.push(item.label.clone());
                    labels(&item.children, out);
                }
            }
            let mut expected = Vec::new();
            labels(&array, &mut expected);

            let positions: Vec<usize> = expected
                .iter()
                .map(|label| html.find(&format!(">{label}</a>")).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
            assert_eq!(html.matches("<li").count(), expected.len());
        }
    }

    #[test]
    fn test_empty_menu_is_empty_string() {
        let only_auth =
            Menu::new("m", "M").item(MenuNode::new(1, "Secret").visibility(Visibility::Auth));
        assert_eq!(menu_tree_as_html(&only_auth, &NoRoutes, &MenuHtmlOptions::default()), "");
        assert!(menu_tree_as_array(&only_auth, &NoRoutes, false).is_empty());
    }

    #[test]
    fn test_labels_are_escaped() {
        let menu = Menu::new("m", "M").item(MenuNode::new(1, "Q&A <b>").url("/q?a=1&b=2"));
        let html = menu_tree_as_html(&menu, &NoRoutes, &MenuHtmlOptions::default());
        assert!(html.contains("<a href=\"/q?a=1&amp;b=2\">Q&amp;A &lt;b&gt;</a>"));
    }
}
