//! Keep-alive page cache names.
//!
//! The host keeps rendered page instances alive for every route name in
//! [`KeepAlive::names`] minus [`KeepAlive::exclude`]. Resetting one page is
//! a two-step affair: [`reset`](KeepAlive::reset) excludes its name so the
//! host drops the instance, and [`settle`](KeepAlive::settle) (called on the
//! next tick, or once the reload delay elapsed) lets it be cached again.

use crate::route::RouteNode;
use crate::tree;
use crate::{debug_log, trace_log};

/// Names of routes that render a component and opt into keep-alive.
pub fn cache_route_names(routes: &[RouteNode]) -> Vec<String> {
    let mut names = Vec::new();
    tree::walk(routes, &mut |route, _| {
        if route.meta.keep_alive && route.component.is_some() && !route.name.is_empty() {
            names.push(route.name.clone());
        }
    });
    names
}

/// Derived cache-name set plus the transient exclude list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeepAlive {
    names: Vec<String>,
    exclude: Vec<String>,
    reloading: bool,
}

impl KeepAlive {
    pub fn from_routes(routes: &[RouteNode]) -> Self {
        let mut keep_alive = Self::default();
        keep_alive.set_names(cache_route_names(routes));
        keep_alive
    }

    pub(crate) fn set_names(&mut self, names: Vec<String>) {
        self.names = names;
        self.exclude.retain(|name| self.names.contains(name));
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }

    /// Whether the page for `name` should currently be kept alive.
    pub fn is_cached(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name) && !self.exclude.iter().any(|n| n == name)
    }

    /// Drop the cached instance of `name` until the next [`settle`](Self::settle).
    pub fn reset(&mut self, name: &str) {
        if !self.exclude.iter().any(|n| n == name) {
            trace_log!("Excluding '{}' from keep-alive", name);
            self.exclude.push(name.to_string());
        }
    }

    pub fn settle(&mut self) {
        self.exclude.clear();
        self.reloading = false;
    }

    /// Start a page reload: the content area unmounts until [`settle`](Self::settle).
    ///
    /// With `reset_cache`, the current page's cached instance is dropped too.
    pub fn begin_reload(&mut self, current_name: Option<&str>, reset_cache: bool) {
        debug_log!("Reloading page {:?} (reset cache: {})", current_name, reset_cache);
        self.reloading = true;
        if let (true, Some(name)) = (reset_cache, current_name) {
            self.reset(name);
        }
    }

    /// Whether the content area should render (false during a reload).
    pub fn content_visible(&self) -> bool {
        !self.reloading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routes() -> Vec<RouteNode> {
        vec![
            RouteNode::new("/a", "A").component("a").keep_alive(),
            RouteNode::new("/b", "B").children(vec![
                RouteNode::new("/b/1", "B1").component("b1").keep_alive(),
                RouteNode::new("/b/2", "B2").component("b2"),
                RouteNode::new("/b/3", "B3").keep_alive(),
            ]),
        ]
    }

    #[test]
    fn test_names_require_component_and_flag() {
        assert_eq!(cache_route_names(&routes()), vec!["A", "B1"]);
    }

    #[test]
    fn test_reset_then_settle() {
        let mut keep_alive = KeepAlive::from_routes(&routes());
        assert!(keep_alive.is_cached("B1"));

        keep_alive.reset("B1");
        keep_alive.reset("B1");
        assert_eq!(keep_alive.exclude(), ["B1"]);
        assert!(!keep_alive.is_cached("B1"));

        keep_alive.settle();
        assert!(keep_alive.is_cached("B1"));
    }

    #[test]
    fn test_reload_hides_content() {
        let mut keep_alive = KeepAlive::from_routes(&routes());
        keep_alive.begin_reload(Some("A"), true);
        assert!(!keep_alive.content_visible());
        assert!(!keep_alive.is_cached("A"));

        keep_alive.settle();
        assert!(keep_alive.content_visible());
        assert!(keep_alive.is_cached("A"));
    }

    #[test]
    fn test_reload_without_reset_keeps_cache() {
        let mut keep_alive = KeepAlive::from_routes(&routes());
        keep_alive.begin_reload(Some("A"), false);
        assert!(keep_alive.is_cached("A"));
    }
}
