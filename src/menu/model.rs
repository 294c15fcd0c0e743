//! Menu records.

use serde::{Deserialize, Serialize};

/// Who may see a menu item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    All,
    /// Anonymous visitors only
    Guest,
    /// Signed-in visitors only
    Auth,
}

impl Visibility {
    /// Whether a viewer with the given authentication state sees the item.
    #[must_use]
    pub const fn allows(self, authenticated: bool) -> bool {
        match self {
            Self::All => true,
            Self::Guest => !authenticated,
            Self::Auth => authenticated,
        }
    }
}

/// One item in a menu tree. Children are owned, so a tree cannot contain cycles.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MenuNode {
    #[serde(default)]
    pub id: u64,
    pub label: String,
    /// Explicit link, highest priority
    #[serde(default)]
    pub url: Option<String>,
    /// Linked page, rendered as `/{page_slug}`
    #[serde(default)]
    pub page_slug: Option<String>,
    /// Named route handed to a [`RouteResolver`](super::RouteResolver)
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    #[must_use]
    pub fn new(id: u64, label: &str) -> Self {
        Self {
            id,
            label: label.to_string(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    #[must_use]
    pub fn page(mut self, slug: &str) -> Self {
        self.page_slug = Some(slug.to_string());
        self
    }

    #[must_use]
    pub fn route(mut self, name: &str) -> Self {
        self.route = Some(name.to_string());
        self
    }

    #[must_use]
    pub const fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub fn child(mut self, node: Self) -> Self {
        self.children.push(node);
        self
    }
}

/// A named menu, optionally assigned to a theme location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub items: Vec<MenuNode>,
}

impl Menu {
    #[must_use]
    pub fn new(slug: &str, name: &str) -> Self {
        Self {
            slug: slug.to_string(),
            name: name.to_string(),
            location: None,
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn at(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    #[must_use]
    pub fn item(mut self, node: MenuNode) -> Self {
        self.items.push(node);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility() {
        assert!(Visibility::All.allows(true));
        assert!(Visibility::All.allows(false));
        assert!(Visibility::Guest.allows(false));
        assert!(!Visibility::Guest.allows(true));
        assert!(Visibility::Auth.allows(true));
        assert!(!Visibility::Auth.allows(false));
    }

    #[test]
    fn test_deserialize_menu() {
        let menu: Menu = serde_json::from_str(
            r#"{"slug":"main","name":"Main","location":"primary","items":[
                {"id":1,"label":"Home","url":"/"},
                {"id":2,"label":"Account","visibility":"auth","children":[{"id":3,"label":"Profile","route":"profile"}]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(menu.location.as_deref(), Some("primary"));
        assert_eq!(menu.items[1].visibility, Visibility::Auth);
        assert_eq!(menu.items[1].children[0].route.as_deref(), Some("profile"));
        assert_eq!(menu.items[0].visibility, Visibility::All);
    }
}
