//! Navigation menus.
//!
//! A [`Menu`] owns an ordered forest of [`MenuNode`]s. [`tree`] turns a menu
//! into markup or a plain array for a given viewer, and [`MenuService`] caches
//! menu lookups by slug and by theme location.
//!
//! ```rust
//! use stagehand_cli::menu::{Menu, MenuHtmlOptions, MenuNode, NoRoutes, Visibility, menu_tree_as_html};
//!
//! let menu = Menu::new("main", "Main")
//!     .item(MenuNode::new(1, "Home").url("/"))
//!     .item(MenuNode::new(2, "Account").visibility(Visibility::Auth));
//!
//! let html = menu_tree_as_html(&menu, &NoRoutes, &MenuHtmlOptions::default());
//! assert_eq!(html, "<ul class=\"menu\"><li class=\"menu-item\"><a href=\"/\">Home</a></li></ul>");
//! ```

pub mod model;
pub mod service;
pub mod tree;

pub use model::{Menu, MenuNode, Visibility};
pub use service::{MemoryMenuStore, MenuService, MenuStore};
pub use tree::{
    MenuHtmlOptions, MenuTreeItem, NoRoutes, PLACEHOLDER_URL, RouteResolver, RouteTable,
    fold_visible, menu_tree_as_array, menu_tree_as_html, resolve_url,
};
