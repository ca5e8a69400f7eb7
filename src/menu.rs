//! Menu derivation.
//!
//! [`build_menu`] turns the route table into the display menu: hidden routes
//! (and everything below them) are dropped, and a node whose children all
//! disappear reports `children: None` so leaf detection is unambiguous.
//!
//! [`MenuStore`] is the context object the shell hands to the sidebar,
//! breadcrumb bar and search box. It owns one route-table snapshot and
//! every projection derived from it, recomputes them on explicit triggers
//! ([`set_routes`](MenuStore::set_routes), [`refresh`](MenuStore::refresh))
//! and notifies subscribers afterwards.
//!
//! # Example
//!
//! ```
//! use console_navigator::menu::build_menu;
//! use console_navigator::route::RouteNode;
//!
//! let routes = vec![
//!     RouteNode::new("/dashboard", "Dashboard"),
//!     RouteNode::new("/detail", "Detail").hidden(),
//! ];
//! let menu = build_menu(&routes);
//! assert_eq!(menu.len(), 1);
//! assert!(menu[0].children.is_none());
//! ```

use crate::breadcrumb::{breadcrumbs_for, Breadcrumb};
use crate::keep_alive::KeepAlive;
use crate::notify::{SubscriptionId, Subscribers};
use crate::route::{sort_routes, RouteMeta, RouteNode};
use crate::tree::{self, TreeNode};
use crate::{debug_log, trace_log};
use serde::{Deserialize, Serialize};

/// A display-oriented projection of a [`RouteNode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub path: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    pub meta: RouteMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<MenuItem>>,
}

impl MenuItem {
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

impl TreeNode for MenuItem {
    fn key(&self) -> &str {
        &self.path
    }

    fn children(&self) -> &[Self] {
        self.children.as_deref().unwrap_or(&[])
    }
}

/// Build the menu tree, dropping routes marked hidden.
pub fn build_menu(routes: &[RouteNode]) -> Vec<MenuItem> {
    build_menu_at(routes, 1)
}

fn build_menu_at(routes: &[RouteNode], depth: usize) -> Vec<MenuItem> {
    routes
        .iter()
        .filter(|route| !route.meta.hide_in_menu)
        .map(|route| {
            let children = if route.children.is_empty() || depth >= tree::MAX_TREE_DEPTH {
                None
            } else {
                Some(build_menu_at(&route.children, depth + 1)).filter(|c| !c.is_empty())
            };

            MenuItem {
                path: route.path.clone(),
                name: route.name.clone(),
                component: route.component.clone(),
                redirect: route.redirect.clone(),
                meta: route.meta.clone(),
                children,
            }
        })
        .collect()
}

/// Event emitted by [`MenuStore`] after its projections change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEvent {
    /// Menu and cache names were recomputed.
    Rebuilt { menu_items: usize, cache_names: usize },
}

/// Owner of the route table snapshot and its derived menu.
#[derive(Debug)]
pub struct MenuStore {
    routes: Vec<RouteNode>,
    menus: Vec<MenuItem>,
    keep_alive: KeepAlive,
    subscribers: Subscribers<MenuEvent>,
}

impl MenuStore {
    /// Sort `routes` by menu order and derive every projection.
    pub fn new(routes: Vec<RouteNode>) -> Self {
        let mut store = Self {
            routes: Vec::new(),
            menus: Vec::new(),
            keep_alive: KeepAlive::default(),
            subscribers: Subscribers::new(),
        };
        store.replace(routes);
        store
    }

    /// Swap in a new route table and recompute.
    pub fn set_routes(&mut self, routes: Vec<RouteNode>) {
        self.replace(routes);
        self.notify();
    }

    /// Recompute projections from the current table (e.g. after a locale
    /// change rewrote titles through [`routes_mut`](Self::routes_mut)).
    pub fn refresh(&mut self) {
        let routes = std::mem::take(&mut self.routes);
        self.replace(routes);
        self.notify();
    }

    fn replace(&mut self, mut routes: Vec<RouteNode>) {
        sort_routes(&mut routes);
        self.menus = build_menu(&routes);
        self.keep_alive.set_names(crate::keep_alive::cache_route_names(&routes));
        self.routes = routes;
        debug_log!(
            "Menu rebuilt: {} top-level items, {} cached pages",
            self.menus.len(),
            self.keep_alive.names().len()
        );
    }

    fn notify(&mut self) {
        let event = MenuEvent::Rebuilt {
            menu_items: self.menus.len(),
            cache_names: self.keep_alive.names().len(),
        };
        self.subscribers.emit(&event);
    }

    pub fn routes(&self) -> &[RouteNode] {
        &self.routes
    }

    /// Mutable access to the table. Call [`refresh`](Self::refresh)
    /// afterwards; projections are stale until then.
    pub fn routes_mut(&mut self) -> &mut Vec<RouteNode> {
        &mut self.routes
    }

    pub fn menus(&self) -> &[MenuItem] {
        &self.menus
    }

    pub fn keep_alive(&self) -> &KeepAlive {
        &self.keep_alive
    }

    pub fn keep_alive_mut(&mut self) -> &mut KeepAlive {
        &mut self.keep_alive
    }

    /// Menu keys from the root to `selected_key`; empty if not in the menu.
    pub fn selected_key_path(&self, selected_key: &str) -> Vec<String> {
        tree::find_path(selected_key, &self.menus).unwrap_or_default()
    }

    /// The menu key to highlight for `route`: its `active_menu` alias when
    /// set, otherwise its own path.
    pub fn active_menu_key<'r>(&self, route: &'r RouteNode) -> &'r str {
        route.meta.active_menu.as_deref().unwrap_or(&route.path)
    }

    pub fn breadcrumbs(&self, current_path: &str) -> Vec<Breadcrumb> {
        breadcrumbs_for(current_path, &self.menus)
    }

    /// Whether `path` exists in the route table, hidden routes included.
    pub fn is_authorized(&self, path: &str) -> bool {
        tree::contains_key(path, &self.routes)
    }

    /// Leaf menu items whose title contains `keyword`, case-insensitively.
    ///
    /// An empty keyword matches nothing.
    pub fn search(&self, keyword: &str) -> Vec<&MenuItem> {
        let keyword = keyword.trim().to_lowercase();
        let mut hits = Vec::new();
        if keyword.is_empty() {
            return hits;
        }

        tree::walk(&self.menus, &mut |item, _| {
            if item.is_leaf() && item.meta.title.to_lowercase().contains(&keyword) {
                hits.push(item);
            }
        });
        trace_log!("Menu search '{}' matched {} items", keyword, hits.len());
        hits
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&MenuEvent) + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn no_hidden(items: &[MenuItem]) -> bool {
        items
            .iter()
            .all(|i| !i.meta.hide_in_menu && i.children.as_deref().map_or(true, no_hidden))
    }

    #[test]
    fn test_hidden_routes_are_dropped_at_every_level() {
        let routes = vec![
            RouteNode::new("/a", "A").children(vec![
                RouteNode::new("/a/1", "A1"),
                RouteNode::new("/a/2", "A2").hidden(),
            ]),
            RouteNode::new("/h", "H")
                .hidden()
                .child(RouteNode::new("/h/1", "H1")),
        ];
        let menu = build_menu(&routes);

        assert!(no_hidden(&menu));
        assert_eq!(menu.len(), 1);
        assert_eq!(menu[0].children.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_empty_children_become_none() {
        let routes = vec![RouteNode::new("/a", "A").child(RouteNode::new("/a/x", "X").hidden())];
        let menu = build_menu(&routes);
        assert!(menu[0].children.is_none());
        assert!(menu[0].is_leaf());
    }

    #[test]
    fn test_store_sorts_by_order() {
        let store = MenuStore::new(vec![
            RouteNode::new("/b", "B"),
            RouteNode::new("/a", "A").order(1),
        ]);
        assert_eq!(store.menus()[0].path, "/a");
        assert_eq!(store.menus()[1].path, "/b");
    }

    #[test]
    fn test_selected_key_path() {
        let store = MenuStore::new(vec![
            RouteNode::new("/a", "A").child(RouteNode::new("/a/1", "A1"))
        ]);
        assert_eq!(store.selected_key_path("/a/1"), vec!["/a", "/a/1"]);
        assert!(store.selected_key_path("/zzz").is_empty());
    }

    #[test]
    fn test_active_menu_alias() {
        let store = MenuStore::new(vec![]);
        let detail = RouteNode::new("/users/detail", "UserDetail")
            .hidden()
            .active_menu("/users");
        assert_eq!(store.active_menu_key(&detail), "/users");

        let plain = RouteNode::new("/users", "Users");
        assert_eq!(store.active_menu_key(&plain), "/users");
    }

    #[test]
    fn test_hidden_route_is_still_authorized() {
        let store = MenuStore::new(vec![RouteNode::new("/detail", "Detail").hidden()]);
        assert!(store.menus().is_empty());
        assert!(store.is_authorized("/detail"));
        assert!(!store.is_authorized("/other"));
    }

    #[test]
    fn test_search_matches_leaf_titles() {
        let store = MenuStore::new(vec![
            RouteNode::new("/sys", "System").child(RouteNode::new("/sys/users", "Users").title("User List")),
            RouteNode::new("/about", "About").title("About us"),
        ]);
        let hits: Vec<_> = store.search("us").iter().map(|i| i.path.clone()).collect();
        assert_eq!(hits, vec!["/sys/users", "/about"]);
        assert!(store.search("  ").is_empty());
    }

    #[test]
    fn test_set_routes_notifies() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut store = MenuStore::new(vec![]);
        let sink = Rc::clone(&events);
        store.subscribe(move |e| sink.borrow_mut().push(e.clone()));

        store.set_routes(vec![RouteNode::new("/a", "A")
            .child(RouteNode::new("/a/1", "A1").component("a1").keep_alive())]);

        assert_eq!(
            *events.borrow(),
            vec![MenuEvent::Rebuilt {
                menu_items: 1,
                cache_names: 1
            }]
        );
    }

    #[test]
    fn test_refresh_picks_up_edits() {
        let mut store = MenuStore::new(vec![RouteNode::new("/a", "A")]);
        store.routes_mut()[0].meta.title = "Accounts".to_string();
        assert_eq!(store.menus()[0].meta.title, "A");

        store.refresh();
        assert_eq!(store.menus()[0].meta.title, "Accounts");
    }
}
