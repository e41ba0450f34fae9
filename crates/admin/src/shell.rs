//! Navigation shell shared by every page.

use serde::Serialize;

/// A sidebar destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub name: &'static str,
    pub path: &'static str,
}

pub const NAV_LINKS: [NavLink; 5] = [
    NavLink {
        name: "Dashboard",
        path: "/",
    },
    NavLink {
        name: "Products",
        path: "/products",
    },
    NavLink {
        name: "Categories",
        path: "/categories",
    },
    NavLink {
        name: "Orders",
        path: "/orders",
    },
    NavLink {
        name: "Users",
        path: "/users",
    },
];

/// Sidebar state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sidebar {
    collapsed: bool,
}

impl Default for Sidebar {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Rendered navigation for one request path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub collapsed: bool,
    pub items: Vec<NavItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub name: &'static str,
    pub path: &'static str,
    pub active: bool,
}

impl Sidebar {
    #[must_use]
    pub const fn new(collapsed: bool) -> Self {
        Self { collapsed }
    }

    #[must_use]
    pub const fn is_collapsed(self) -> bool {
        self.collapsed
    }

    #[must_use]
    pub const fn toggle(self) -> Self {
        Self {
            collapsed: !self.collapsed,
        }
    }

    /// Navigation with the link for `current_path` marked active.
    #[must_use]
    pub fn navigation(self, current_path: &str) -> Navigation {
        let active = active_link(current_path);
        Navigation {
            collapsed: self.collapsed,
            items: NAV_LINKS
                .iter()
                .map(|link| NavItem {
                    name: link.name,
                    path: link.path,
                    active: active.is_some_and(|a| a.path == link.path),
                })
                .collect(),
        }
    }
}

/// Link whose path equals `path`, ignoring any query, fragment or trailing
/// slash.
#[must_use]
pub fn active_link(path: &str) -> Option<&'static NavLink> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };
    NAV_LINKS.iter().find(|link| link.path == path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_link() {
        assert_eq!(active_link("/").map(|l| l.name), Some("Dashboard"));
        assert_eq!(active_link("/orders").map(|l| l.name), Some("Orders"));
        assert_eq!(active_link("/orders/").map(|l| l.name), Some("Orders"));
        assert_eq!(active_link("/products?sort=asc").map(|l| l.name), Some("Products"));
        assert_eq!(active_link("/products/42"), None);
        assert_eq!(active_link("/productsx"), None);
        assert_eq!(active_link("/settings"), None);
    }

    #[test]
    fn test_exactly_one_active_item() {
        let nav = Sidebar::default().navigation("/users");
        let active: Vec<_> = nav.items.iter().filter(|i| i.active).map(|i| i.name).collect();
        assert_eq!(active, ["Users"]);
        assert_eq!(nav.items.len(), NAV_LINKS.len());
    }

    #[test]
    fn test_toggle() {
        let sidebar = Sidebar::default();
        assert!(!sidebar.is_collapsed());
        assert!(sidebar.toggle().is_collapsed());
        assert_eq!(sidebar.toggle().toggle(), sidebar);
    }
}
