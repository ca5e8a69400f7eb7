//! Route table declarations.
//!
//! A route table is a small, static, nested list of [`RouteNode`]s. It is the
//! single source the menu, breadcrumbs, keep-alive names and tab
//! rehydration are derived from.
//!
//! Nodes serialize with camelCase keys (`isHideInMenu`, `keepAlive`,
//! `externalUrl`, ...) so a menu payload fetched from the backend can be
//! deserialized straight into a table.
//!
//! # Example
//!
//! ```
//! use console_navigator::route::{sort_routes, RouteNode};
//!
//! let mut routes = vec![
//!     RouteNode::new("/b", "B"),
//!     RouteNode::new("/a", "A").order(1),
//! ];
//! sort_routes(&mut routes);
//! assert_eq!(routes[0].path, "/a");
//! ```

use crate::tree::{self, TreeNode};
use serde::{Deserialize, Serialize};

/// A query pair appended to the URL when the route is opened from a menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryPair {
    pub key: String,
    pub value: String,
}

/// Route metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteMeta {
    /// Menu, tab and document title.
    pub title: String,
    /// Menu icon name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Hide this route (and its subtree) from the menu.
    #[serde(rename = "isHideInMenu")]
    pub hide_in_menu: bool,
    /// Menu order, smaller first. Missing values sort last.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    /// Keep the rendered page alive across navigation.
    pub keep_alive: bool,
    /// Open this URL in a new window instead of navigating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    /// Render this URL inside an iframe page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iframe_url: Option<String>,
    /// Menu key to highlight while this (usually hidden) route is active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_menu: Option<String>,
    /// Query appended when opening the route from the menu.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<Vec<QueryPair>>,
    /// Pin the route's tab at this position.
    #[serde(rename = "fixedIndexInTab", skip_serializing_if = "Option::is_none")]
    pub fixed_index_in_tab: Option<u32>,
    /// Open one tab per full path instead of one per path.
    pub multi_tab: bool,
    /// Roles allowed to see the route; `None` means everyone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authority: Option<Vec<String>>,
    /// Reachable without a login token.
    pub ignore_access: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_badge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_badge: Option<String>,
}

/// A navigable path with metadata and nested children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteNode {
    /// Absolute path, unique among siblings.
    pub path: String,
    /// Route name, used for keep-alive and core-route checks.
    #[serde(default)]
    pub name: String,
    /// Component key the host resolves to a page; `None` for pure groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    /// Path to redirect to when this route is hit directly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(default)]
    pub meta: RouteMeta,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteNode>,
}

impl RouteNode {
    /// Create a route whose title defaults to its name.
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: path.into(),
            meta: RouteMeta {
                title: name.clone(),
                ..RouteMeta::default()
            },
            name,
            ..Self::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.meta.title = title.into();
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.meta.icon = Some(icon.into());
        self
    }

    pub fn component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn redirect(mut self, to: impl Into<String>) -> Self {
        self.redirect = Some(to.into());
        self
    }

    pub fn order(mut self, order: u32) -> Self {
        self.meta.order = Some(order);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.meta.hide_in_menu = true;
        self
    }

    pub fn keep_alive(mut self) -> Self {
        self.meta.keep_alive = true;
        self
    }

    pub fn external(mut self, url: impl Into<String>) -> Self {
        self.meta.external_url = Some(url.into());
        self
    }

    pub fn iframe(mut self, url: impl Into<String>) -> Self {
        self.meta.iframe_url = Some(url.into());
        self
    }

    pub fn active_menu(mut self, key: impl Into<String>) -> Self {
        self.meta.active_menu = Some(key.into());
        self
    }

    pub fn fixed_in_tab(mut self, index: u32) -> Self {
        self.meta.fixed_index_in_tab = Some(index);
        self
    }

    pub fn authority<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.meta.authority = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    pub fn ignore_access(mut self) -> Self {
        self.meta.ignore_access = true;
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.query.get_or_insert_with(Vec::new).push(QueryPair {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Append a child route.
    pub fn child(mut self, child: RouteNode) -> Self {
        self.children.push(child);
        self
    }

    /// Replace the children.
    pub fn children(mut self, children: Vec<RouteNode>) -> Self {
        self.children = children;
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// The path plus the menu query, e.g. `/list?tab=all`.
    pub fn menu_full_path(&self) -> String {
        match &self.meta.query {
            Some(pairs) if !pairs.is_empty() => {
                let mut query = crate::params::QueryParams::new();
                for pair in pairs {
                    query.insert(pair.key.clone(), pair.value.clone());
                }
                format!("{}?{}", self.path, query.to_query_string())
            }
            _ => self.path.clone(),
        }
    }
}

impl TreeNode for RouteNode {
    fn key(&self) -> &str {
        &self.path
    }

    fn children(&self) -> &[Self] {
        &self.children
    }
}

/// Stable-sort routes by `meta.order` (missing last), recursively.
///
/// Levels below [`tree::MAX_TREE_DEPTH`] keep their declared order.
pub fn sort_routes(routes: &mut [RouteNode]) {
    sort_routes_at(routes, 1);
}

fn sort_routes_at(routes: &mut [RouteNode], depth: usize) {
    routes.sort_by_key(|r| r.meta.order.unwrap_or(u32::MAX));
    if depth >= tree::MAX_TREE_DEPTH {
        return;
    }
    for route in routes.iter_mut() {
        sort_routes_at(&mut route.children, depth + 1);
    }
}

/// Find a route by path anywhere in the table.
pub fn find_route_by_path<'a>(routes: &'a [RouteNode], path: &str) -> Option<&'a RouteNode> {
    tree::find_node(path, routes)
}

/// Find a route by name anywhere in the table.
pub fn find_route_by_name<'a>(routes: &'a [RouteNode], name: &str) -> Option<&'a RouteNode> {
    let mut found = None;
    tree::walk(routes, &mut |node, _| {
        if found.is_none() && node.name == name {
            found = Some(node);
        }
    });
    found
}

/// Parse a route table from its JSON payload.
pub fn routes_from_json(json: &str) -> Result<Vec<RouteNode>, crate::NavigationError> {
    let mut routes: Vec<RouteNode> = serde_json::from_str(json)?;
    sort_routes(&mut routes);
    Ok(routes)
}
