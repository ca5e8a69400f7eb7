//! Resolving concrete paths against the route table.
//!
//! The route table is flattened once into [`FlatRoute`]s and every path is
//! inserted into a [`matchit`] router. Route paths use `:param` for dynamic
//! segments and `*name` for a trailing catch-all; both are rewritten to
//! matchit's `{param}` / `{*name}` syntax on insertion.
//!
//! Paths that match nothing resolve to the route registered under the
//! configured not-found name, when there is one. That route is never
//! inserted into the router itself.

use crate::error::NavigationError;
use crate::params::RouteParams;
use crate::route::RouteNode;
use crate::{trace_log, tree, warn_log};
use std::borrow::Cow;

/// A route with its children stripped, plus the paths of its ancestors.
#[derive(Debug, Clone)]
pub struct FlatRoute {
    pub route: RouteNode,
    /// Paths from the root down to and including this route.
    pub chain: Vec<String>,
}

/// Result of resolving one path.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// Index into [`RouteMatcher::routes`].
    pub index: usize,
    pub params: RouteParams,
    /// The path only matched through the not-found fallback.
    pub fallback: bool,
}

/// Path matcher over a flattened route table.
pub struct RouteMatcher {
    router: matchit::Router<usize>,
    routes: Vec<FlatRoute>,
    not_found: Option<usize>,
}

impl RouteMatcher {
    /// Flatten `tables` (in order) and build the matcher.
    ///
    /// Fails when two routes claim conflicting paths.
    pub fn build(tables: &[&[RouteNode]], not_found_name: &str) -> Result<Self, NavigationError> {
        let mut matcher = Self::empty();
        for table in tables {
            matcher.insert_table(table, not_found_name, true)?;
        }
        trace_log!("Built route matcher with {} routes", matcher.routes.len());
        Ok(matcher)
    }

    /// Build from a validated `base` table plus session routes.
    ///
    /// A session route that conflicts with an already inserted path is
    /// skipped with a warning instead of failing the whole table.
    pub fn build_merged(
        base: &[RouteNode],
        extra: &[RouteNode],
        not_found_name: &str,
    ) -> Result<Self, NavigationError> {
        let mut matcher = Self::empty();
        matcher.insert_table(base, not_found_name, true)?;
        matcher.insert_table(extra, not_found_name, false)?;
        trace_log!("Built merged route matcher with {} routes", matcher.routes.len());
        Ok(matcher)
    }

    fn empty() -> Self {
        Self {
            router: matchit::Router::new(),
            routes: Vec::new(),
            not_found: None,
        }
    }

    fn insert_table(
        &mut self,
        table: &[RouteNode],
        not_found_name: &str,
        strict: bool,
    ) -> Result<(), NavigationError> {
        for flat in flatten(table) {
            // Only serves misses.
            if flat.route.name == not_found_name {
                self.not_found = Some(self.routes.len());
                self.routes.push(flat);
                continue;
            }
            let pattern = to_matchit_pattern(&flat.route.path);
            match self.router.insert(pattern.as_ref(), self.routes.len()) {
                Ok(()) => self.routes.push(flat),
                Err(err) if strict => {
                    return Err(NavigationError::InvalidRoute {
                        path: flat.route.path.clone(),
                        message: err.to_string(),
                    });
                }
                Err(err) => {
                    warn_log!("Skipping route '{}': {}", flat.route.path, err);
                }
            }
        }
        Ok(())
    }

    /// Resolve `path` (no query) to a route.
    pub fn resolve(&self, path: &str) -> Option<Resolved> {
        let path = normalize_path(path);
        match self.router.at(path.as_ref()) {
            Ok(matched) => Some(Resolved {
                index: *matched.value,
                params: matched.params.into(),
                fallback: false,
            }),
            Err(_) => self.not_found.map(|index| Resolved {
                index,
                params: RouteParams::new(),
                fallback: true,
            }),
        }
    }

    pub fn route(&self, index: usize) -> Option<&FlatRoute> {
        self.routes.get(index)
    }

    pub fn routes(&self) -> &[FlatRoute] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl std::fmt::Debug for RouteMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteMatcher")
            .field("routes", &self.routes.len())
            .field("not_found", &self.not_found)
            .finish_non_exhaustive()
    }
}

/// Flatten a table in pre-order, recording each route's ancestry.
pub fn flatten(routes: &[RouteNode]) -> Vec<FlatRoute> {
    let mut out = Vec::new();
    let mut chain: Vec<String> = Vec::new();

    tree::walk(routes, &mut |route, depth| {
        chain.truncate(depth - 1);
        chain.push(route.path.clone());
        out.push(FlatRoute {
            route: RouteNode {
                children: Vec::new(),
                ..route.clone()
            },
            chain: chain.clone(),
        });
    });
    out
}

/// Ensure a leading slash and no trailing slash (except for the root).
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if path.is_empty() {
        return Cow::Borrowed("/");
    }
    if path == "/" || (path.starts_with('/') && !path.ends_with('/')) {
        return Cow::Borrowed(path);
    }

    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{trimmed}"))
    }
}

/// Rewrite `:param` and `*rest` segments into matchit syntax.
fn to_matchit_pattern(path: &str) -> Cow<'_, str> {
    let path = normalize_path(path);
    if !path.contains(':') && !path.contains('*') {
        return path;
    }

    let segments: Vec<String> = path
        .split('/')
        .map(|segment| {
            if let Some(name) = segment.strip_prefix(':') {
                format!("{{{name}}}")
            } else if let Some(name) = segment.strip_prefix('*') {
                let name = if name.is_empty() { "path" } else { name };
                format!("{{*{name}}}")
            } else {
                segment.to_string()
            }
        })
        .collect();
    Cow::Owned(segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Vec<RouteNode> {
        vec![
            RouteNode::new("/login", "login"),
            RouteNode::new("/system", "System").children(vec![
                RouteNode::new("/system/users", "Users"),
                RouteNode::new("/system/users/:id", "UserDetail").hidden(),
            ]),
            RouteNode::new("/*", "not-found"),
        ]
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("//"), "/");
        assert_eq!(normalize_path("users/"), "/users");
        assert_eq!(normalize_path("/users"), "/users");
    }

    #[test]
    fn test_pattern_rewrite() {
        assert_eq!(to_matchit_pattern("/users/:id"), "/users/{id}");
        assert_eq!(to_matchit_pattern("/*"), "/{*path}");
        assert_eq!(to_matchit_pattern("/files/*rest"), "/files/{*rest}");
        assert_eq!(to_matchit_pattern("/plain"), "/plain");
    }

    #[test]
    fn test_flatten_records_chain() {
        let flat = flatten(&table());
        let detail = flat.iter().find(|f| f.route.name == "UserDetail").unwrap();
        assert_eq!(detail.chain, vec!["/system", "/system/users/:id"]);
        assert!(flat.iter().all(|f| f.route.children.is_empty()));
    }

    #[test]
    fn test_resolve_static_and_param() {
        let routes = table();
        let matcher = RouteMatcher::build(&[routes.as_slice()], "not-found").unwrap();

        let users = matcher.resolve("/system/users/").unwrap();
        assert_eq!(matcher.route(users.index).unwrap().route.name, "Users");

        let detail = matcher.resolve("/system/users/42").unwrap();
        assert_eq!(detail.params.get_as::<u32>("id"), Some(42));
        assert!(!detail.fallback);
    }

    #[test]
    fn test_unmatched_uses_catch_all() {
        let routes = table();
        let matcher = RouteMatcher::build(&[routes.as_slice()], "not-found").unwrap();
        let miss = matcher.resolve("/nowhere/at/all").unwrap();
        assert_eq!(matcher.route(miss.index).unwrap().route.name, "not-found");
        assert!(miss.fallback);
    }

    #[test]
    fn test_no_catch_all_means_none() {
        let routes = vec![RouteNode::new("/a", "A")];
        let matcher = RouteMatcher::build(&[routes.as_slice()], "not-found").unwrap();
        assert!(matcher.resolve("/b").is_none());
    }

    #[test]
    fn test_duplicate_paths_are_rejected() {
        let routes = vec![RouteNode::new("/a", "A"), RouteNode::new("/a", "B")];
        let err = RouteMatcher::build(&[routes.as_slice()], "not-found").unwrap_err();
        assert!(matches!(err, NavigationError::InvalidRoute { .. }));
    }

    #[test]
    fn test_merged_build_skips_conflicting_session_routes() {
        let base = table();
        let extra = vec![
            RouteNode::new("/login", "RemoteLogin"),
            RouteNode::new("/reports", "Reports"),
        ];
        let matcher = RouteMatcher::build_merged(&base, &extra, "not-found").unwrap();

        let login = matcher.resolve("/login").unwrap();
        assert_eq!(matcher.route(login.index).unwrap().route.name, "login");
        let reports = matcher.resolve("/reports").unwrap();
        assert_eq!(matcher.route(reports.index).unwrap().route.name, "Reports");
        assert!(matcher.routes().iter().all(|f| f.route.name != "RemoteLogin"));
    }
}
