//! The navigation shell.
//!
//! This module holds the explicit context objects the rest of the crate
//! passes around instead of globals:
//!
//! - [`Shell`]: owns the [`RouterState`], the route table and its matcher,
//!   and runs the navigation pipeline (middleware before → guards → history
//!   → middleware after).
//! - [`ShellContext`]: the state guards and middleware may read and
//!   update: preferences, the session's [`AccessStore`], the document title.
//! - [`NavigationRequest`]: what guards and middleware see of one
//!   navigation.
//! - [`Navigate`]: the narrow router interface the
//!   [`TabStore`](crate::tab::TabStore) drives.
//!
//! # Example
//!
//! ```
//! use console_navigator::config::ShellConfig;
//! use console_navigator::context::Shell;
//! use console_navigator::route::RouteNode;
//!
//! let routes = vec![
//!     RouteNode::new("/", "Root").redirect("/home"),
//!     RouteNode::new("/home", "Home"),
//!     RouteNode::new("/*", "not-found"),
//! ];
//! let mut shell = Shell::new(ShellConfig::default(), routes).unwrap();
//!
//! assert_eq!(shell.push("/").path(), Some("/home"));
//! assert_eq!(shell.current_route().unwrap().name, "Home");
//! ```

use crate::access::AccessStore;
#[cfg(feature = "cache")]
use crate::cache::{CacheStats, RouteCache};
use crate::config::ShellConfig;
use crate::error::{NavigationError, NavigationResult};
#[cfg(feature = "guard")]
use crate::guards::{GuardResult, NavigationAction, RouteGuard};
use crate::keep_alive::KeepAlive;
use crate::matching::{FlatRoute, Resolved, RouteMatcher};
#[cfg(feature = "middleware")]
use crate::middleware::RouteMiddleware;
use crate::notify::{SubscriptionId, Subscribers};
use crate::params::{Location, QueryParams, RouteParams};
use crate::route::{find_route_by_path, sort_routes, RouteMeta, RouteNode};
use crate::state::{RouteChangeEvent, RouterState};
use crate::{debug_log, error_log, info_log, trace_log, warn_log};

/// Maximum redirect depth to prevent infinite redirect loops.
pub const MAX_REDIRECT_DEPTH: usize = 5;

// ============================================================================
// NavigationRequest
// ============================================================================

/// Request for navigation.
///
/// Built by the [`Shell`] once the target path is resolved, then passed to
/// middleware and guards.
///
/// # Example
///
/// ```
/// use console_navigator::context::NavigationRequest;
///
/// let request = NavigationRequest::new("/users?page=2");
/// assert_eq!(request.to.path, "/users");
/// assert_eq!(request.to.query.get("page"), Some("2"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct NavigationRequest {
    /// Where the navigation starts; `None` for the very first one.
    pub from: Option<Location>,
    pub to: Location,
    /// Name of the resolved route.
    pub route_name: Option<String>,
    /// Metadata of the resolved route.
    pub meta: RouteMeta,
    /// Route paths from the root down to the resolved route.
    pub matched: Vec<String>,
    /// Route parameters extracted from the path
    pub params: RouteParams,
    /// Whether the target path was shown before in this session.
    pub loaded: bool,
    /// The path only matched the not-found route.
    pub fallback: bool,
}

impl NavigationRequest {
    /// A request for `to` with no resolved route.
    pub fn new(to: &str) -> Self {
        Self {
            to: Location::parse(to),
            ..Self::default()
        }
    }

    /// A request from `from` to `to`.
    pub fn with_from(to: &str, from: &str) -> Self {
        Self {
            from: Some(Location::parse(from)),
            ..Self::new(to)
        }
    }

    fn for_route(to: Location, from: Location, flat: &FlatRoute, resolved: &Resolved) -> Self {
        Self {
            from: Some(from),
            to,
            route_name: Some(flat.route.name.clone()),
            meta: flat.route.meta.clone(),
            matched: flat.chain.clone(),
            params: resolved.params.clone(),
            loaded: false,
            fallback: resolved.fallback,
        }
    }
}

// ============================================================================
// ShellContext
// ============================================================================

/// Shared state handed to guards and middleware.
#[derive(Debug, Clone, Default)]
pub struct ShellContext {
    pub config: ShellConfig,
    pub access: AccessStore,
    /// Title the host should show, set by
    /// [`DocumentTitle`](crate::middleware::DocumentTitle).
    pub document_title: Option<String>,
}

impl ShellContext {
    pub fn new(config: ShellConfig) -> Self {
        Self {
            config,
            access: AccessStore::new(),
            document_title: None,
        }
    }
}

// ============================================================================
// Navigate
// ============================================================================

/// The router operations stores need.
pub trait Navigate {
    /// Navigate to `full_path`, running the full pipeline.
    fn push(&mut self, full_path: &str) -> NavigationResult;

    /// Full path of the current location.
    fn current_path(&self) -> String;
}

// ============================================================================
// Shell
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NavigateOp {
    Push,
    Replace,
    Back,
    Forward,
}

/// Router state, route table and navigation pipeline.
pub struct Shell {
    state: RouterState,
    static_routes: Vec<RouteNode>,
    /// Static routes followed by the session's access routes.
    routes: Vec<RouteNode>,
    matcher: RouteMatcher,
    /// Resolution of the current location.
    current: Option<Resolved>,
    access_generation: u64,
    #[cfg(feature = "cache")]
    cache: RouteCache,
    #[cfg(feature = "guard")]
    guards: Vec<Box<dyn RouteGuard>>,
    #[cfg(feature = "middleware")]
    middleware: Vec<Box<dyn RouteMiddleware>>,
    context: ShellContext,
    listeners: Subscribers<RouteChangeEvent>,
}

impl Shell {
    /// Create a shell at `/` over the static `routes`.
    ///
    /// Fails when two routes claim conflicting paths.
    pub fn new(config: ShellConfig, mut routes: Vec<RouteNode>) -> Result<Self, NavigationError> {
        sort_routes(&mut routes);
        let matcher = RouteMatcher::build(&[routes.as_slice()], &config.not_found_name)?;
        let state = RouterState::default();
        let current = matcher.resolve(state.current_location().path.as_str());
        debug_log!("Shell created with {} routes", matcher.len());

        Ok(Self {
            state,
            routes: routes.clone(),
            static_routes: routes,
            matcher,
            current,
            access_generation: 0,
            #[cfg(feature = "cache")]
            cache: RouteCache::with_capacity(config.cache_capacity),
            #[cfg(feature = "guard")]
            guards: Vec::new(),
            #[cfg(feature = "middleware")]
            middleware: Vec::new(),
            context: ShellContext::new(config),
            listeners: Subscribers::new(),
        })
    }

    /// Register a guard. Guards run by descending priority.
    #[cfg(feature = "guard")]
    #[must_use]
    pub fn with_guard<G: RouteGuard>(mut self, guard: G) -> Self {
        self.add_guard(guard);
        self
    }

    #[cfg(feature = "guard")]
    pub fn add_guard<G: RouteGuard>(&mut self, guard: G) {
        debug_log!("Adding guard '{}' (priority {})", guard.name(), guard.priority());
        self.guards.push(Box::new(guard));
        crate::guards::sort_by_priority(&mut self.guards);
    }

    /// Register middleware. `before` hooks run by descending priority,
    /// `after` hooks in reverse.
    #[cfg(feature = "middleware")]
    #[must_use]
    pub fn with_middleware<M: RouteMiddleware>(mut self, middleware: M) -> Self {
        self.add_middleware(middleware);
        self
    }

    #[cfg(feature = "middleware")]
    pub fn add_middleware<M: RouteMiddleware>(&mut self, middleware: M) {
        debug_log!(
            "Adding middleware '{}' (priority {})",
            middleware.name(),
            middleware.priority()
        );
        self.middleware.push(Box::new(middleware));
        crate::middleware::sort_by_priority(&mut self.middleware);
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Navigate to `full_path`, adding a history entry.
    pub fn push(&mut self, full_path: &str) -> NavigationResult {
        self.navigate(full_path.to_string(), NavigateOp::Push, 0)
    }

    /// Navigate to `full_path`, replacing the current history entry.
    pub fn replace(&mut self, full_path: &str) -> NavigationResult {
        self.navigate(full_path.to_string(), NavigateOp::Replace, 0)
    }

    /// Go back in history, running the pipeline on the target.
    pub fn back(&mut self) -> Option<NavigationResult> {
        let target = self.state.peek_back_path()?.to_string();
        Some(self.navigate(target, NavigateOp::Back, 0))
    }

    /// Go forward in history, running the pipeline on the target.
    pub fn forward(&mut self) -> Option<NavigationResult> {
        let target = self.state.peek_forward_path()?.to_string();
        Some(self.navigate(target, NavigateOp::Forward, 0))
    }

    /// Open the menu entry at `path`.
    ///
    /// External links are handed back as [`NavigationResult::External`]
    /// without touching history. The route's menu query is appended.
    pub fn open_menu(&mut self, path: &str) -> NavigationResult {
        let Some(route) = find_route_by_path(&self.routes, path) else {
            warn_log!("No menu route for '{}'", path);
            return NavigationResult::NotFound {
                path: path.to_string(),
            };
        };

        if let Some(url) = &route.meta.external_url {
            info_log!("Opening external link '{}'", url);
            return NavigationResult::External { url: url.clone() };
        }

        let target = route.menu_full_path();
        if target == self.state.current_full_path() {
            trace_log!("Already at '{}'", target);
            return NavigationResult::Success { path: target };
        }
        self.push(&target)
    }

    /// Sign out: forget the session and go to the login page.
    ///
    /// With `keep_target`, the current location is kept in the `redirect`
    /// query so signing back in returns to it.
    pub fn sign_out(&mut self, keep_target: bool) -> NavigationResult {
        let current = self.state.current_full_path().to_string();
        self.context.access.reset();

        let mut query = QueryParams::new();
        if keep_target && current != self.context.config.login_path {
            query.insert("redirect".to_string(), current);
        }
        let login = Location {
            path: self.context.config.login_path.clone(),
            query,
        };
        info_log!("Signing out");
        self.replace(&login.full_path())
    }

    /// Restart the current page: the content area unmounts until
    /// [`KeepAlive::settle`] is called after
    /// [`ShellConfig::reload_delay`].
    pub fn reload_page(&self, keep_alive: &mut KeepAlive) {
        let name = self.current_route().map(|route| route.name.as_str());
        keep_alive.begin_reload(name, self.context.config.reset_cache_on_reload);
    }

    /// Core navigation method that runs the full pipeline.
    fn navigate(&mut self, full_path: String, op: NavigateOp, redirect_depth: usize) -> NavigationResult {
        if redirect_depth >= MAX_REDIRECT_DEPTH {
            error_log!(
                "Redirect loop detected (depth {}) navigating to '{}'",
                redirect_depth,
                full_path
            );
            return NavigationResult::Error(NavigationError::RedirectLoop {
                path: full_path,
                depth: redirect_depth,
            });
        }

        if let Err(err) = self.sync_access_routes() {
            return NavigationResult::Error(err);
        }

        let from = self.state.current_location();
        let to = Location::parse(&full_path);
        info_log!("Navigation {:?}: '{}' → '{}'", op, from.full_path(), full_path);

        let Some(mut resolved) = self.resolve_cached(&to.path) else {
            warn_log!("No route matches '{}'", to.path);
            return NavigationResult::NotFound { path: to.path };
        };
        let Some(flat) = self.matcher.route(resolved.index) else {
            return NavigationResult::Error(NavigationError::RouteNotFound { path: to.path });
        };

        if let (Some(redirect), false) = (flat.route.redirect.clone(), resolved.fallback) {
            debug_log!("Route '{}' redirects to '{}'", flat.route.path, redirect);
            return self.navigate(redirect, op.after_redirect(), redirect_depth + 1);
        }

        let mut request = NavigationRequest::for_route(to, from, flat, &resolved);

        // Step 1: before middleware
        #[cfg(feature = "middleware")]
        self.run_middleware_before(&mut request);

        // Step 2: guards
        #[cfg(feature = "guard")]
        {
            let verdict = Self::run_guards(&mut self.guards, &mut self.context, &request);
            match verdict {
                Ok(NavigationAction::Continue) => {}
                Ok(NavigationAction::Deny { reason }) => {
                    warn_log!("Navigation to '{}' blocked: {}", full_path, reason);
                    #[cfg(feature = "middleware")]
                    self.run_middleware_cancelled(&request);
                    return NavigationResult::Blocked {
                        reason,
                        redirect: None,
                    };
                }
                Ok(NavigationAction::Redirect { to, reason }) => {
                    debug_log!("Guard redirecting from '{}' to '{}': {:?}", full_path, to, reason);
                    #[cfg(feature = "middleware")]
                    self.run_middleware_cancelled(&request);
                    return self.navigate(to, op.after_redirect(), redirect_depth + 1);
                }
                Err(err) => {
                    error_log!("Guard failed for '{}': {}", full_path, err);
                    #[cfg(feature = "middleware")]
                    self.run_middleware_cancelled(&request);
                    return NavigationResult::Error(err);
                }
            }
        }

        // A guard may have generated access routes for this very target.
        let generation = self.access_generation;
        if let Err(err) = self.sync_access_routes() {
            #[cfg(feature = "middleware")]
            self.run_middleware_cancelled(&request);
            return NavigationResult::Error(err);
        }
        if self.access_generation != generation {
            // Indices from the old matcher are stale.
            let Some(fresh) = self.resolve_cached(&request.to.path) else {
                warn_log!("'{}' no longer matches after access change", request.to.path);
                #[cfg(feature = "middleware")]
                self.run_middleware_cancelled(&request);
                return NavigationResult::NotFound {
                    path: request.to.path,
                };
            };
            resolved = fresh;
        }

        // Step 3: commit to history
        let stored = request.to.full_path();
        let event = match op {
            NavigateOp::Push => Some(self.state.push(stored)),
            NavigateOp::Replace => Some(self.state.replace(stored)),
            NavigateOp::Back => self.state.back(),
            NavigateOp::Forward => self.state.forward(),
        };
        let Some(event) = event else {
            return NavigationResult::Error(NavigationError::Custom {
                message: format!("History has no entry for {op:?}"),
            });
        };
        self.current = Some(resolved);

        // Step 4: after middleware
        #[cfg(feature = "middleware")]
        self.run_middleware_after(&request);

        self.listeners.emit(&event);
        info_log!("Navigation complete: '{}'", event.to);
        NavigationResult::Success { path: event.to }
    }

    #[cfg(feature = "guard")]
    fn run_guards(
        guards: &mut [Box<dyn RouteGuard>],
        cx: &mut ShellContext,
        request: &NavigationRequest,
    ) -> GuardResult {
        debug_log!("Checking {} guards for '{}'", guards.len(), request.to.path);
        for guard in guards.iter_mut() {
            let result = guard.check(cx, request)?;
            trace_log!(
                "Guard '{}' (priority {}) → {:?}",
                guard.name(),
                guard.priority(),
                result
            );
            if !result.is_continue() {
                return Ok(result);
            }
        }
        Ok(NavigationAction::Continue)
    }

    #[cfg(feature = "middleware")]
    fn run_middleware_before(&mut self, request: &mut NavigationRequest) {
        for mw in &mut self.middleware {
            trace_log!("Middleware '{}' before_navigation for '{}'", mw.name(), request.to.path);
            mw.before_navigation(&mut self.context, request);
        }
    }

    #[cfg(feature = "middleware")]
    fn run_middleware_after(&mut self, request: &NavigationRequest) {
        for mw in self.middleware.iter_mut().rev() {
            trace_log!("Middleware '{}' after_navigation for '{}'", mw.name(), request.to.path);
            mw.after_navigation(&mut self.context, request);
        }
    }

    #[cfg(feature = "middleware")]
    fn run_middleware_cancelled(&mut self, request: &NavigationRequest) {
        for mw in self.middleware.iter_mut().rev() {
            mw.navigation_cancelled(&mut self.context, request);
        }
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Rebuild the matcher when the session's access routes changed.
    fn sync_access_routes(&mut self) -> Result<(), NavigationError> {
        let generation = self.context.access.generation();
        if generation == self.access_generation {
            return Ok(());
        }

        let access_routes = self.context.access.access_routes();
        self.matcher = RouteMatcher::build_merged(
            &self.static_routes,
            access_routes,
            &self.context.config.not_found_name,
        )?;
        self.routes = self.static_routes.iter().chain(access_routes).cloned().collect();
        self.access_generation = generation;

        #[cfg(feature = "cache")]
        self.cache.clear();

        let current_path = self.state.current_location().path;
        self.current = self.matcher.resolve(&current_path);
        debug_log!(
            "Route matcher rebuilt with {} routes (access generation {})",
            self.matcher.len(),
            generation
        );
        Ok(())
    }

    fn resolve_cached(&mut self, path: &str) -> Option<Resolved> {
        #[cfg(feature = "cache")]
        if let Some(hit) = self.cache.get(path) {
            return hit;
        }

        let resolved = self.matcher.resolve(path);
        #[cfg(feature = "cache")]
        self.cache.insert(path.to_string(), resolved.clone());
        resolved
    }

    /// Resolve `path` against the current route table without navigating.
    pub fn resolve(&mut self, path: &str) -> Option<&FlatRoute> {
        if self.sync_access_routes().is_err() {
            return None;
        }
        let resolved = self.resolve_cached(Location::parse(path).path.as_str())?;
        self.matcher.route(resolved.index)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The route of the current location.
    pub fn current_route(&self) -> Option<&RouteNode> {
        let resolved = self.current.as_ref()?;
        self.matcher.route(resolved.index).map(|flat| &flat.route)
    }

    pub fn current_params(&self) -> Option<&RouteParams> {
        self.current.as_ref().map(|resolved| &resolved.params)
    }

    pub fn current_full_path(&self) -> &str {
        self.state.current_full_path()
    }

    pub fn current_location(&self) -> Location {
        self.state.current_location()
    }

    /// Static routes followed by the session's access routes.
    pub fn routes(&self) -> &[RouteNode] {
        &self.routes
    }

    pub fn state(&self) -> &RouterState {
        &self.state
    }

    pub fn context(&self) -> &ShellContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut ShellContext {
        &mut self.context
    }

    pub fn config(&self) -> &ShellConfig {
        &self.context.config
    }

    pub fn access(&self) -> &AccessStore {
        &self.context.access
    }

    pub fn access_mut(&mut self) -> &mut AccessStore {
        &mut self.context.access
    }

    pub fn can_go_back(&self) -> bool {
        self.state.can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.state.can_go_forward()
    }

    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> &CacheStats {
        self.cache.stats()
    }

    /// Be told about every committed navigation.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&RouteChangeEvent) + 'static,
    {
        self.listeners.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

impl NavigateOp {
    /// History can only be replayed for push and replace; a redirected
    /// back/forward becomes a push.
    const fn after_redirect(self) -> Self {
        match self {
            Self::Replace => Self::Replace,
            Self::Push | Self::Back | Self::Forward => Self::Push,
        }
    }
}

impl Navigate for Shell {
    fn push(&mut self, full_path: &str) -> NavigationResult {
        Shell::push(self, full_path)
    }

    fn current_path(&self) -> String {
        self.current_full_path().to_string()
    }
}

impl std::fmt::Debug for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("Shell");
        s.field("current", &self.state.current_full_path())
            .field("routes", &self.matcher.len())
            .field("access_generation", &self.access_generation);
        #[cfg(feature = "guard")]
        s.field("guards", &self.guards.len());
        #[cfg(feature = "middleware")]
        s.field("middleware", &self.middleware.len());
        s.finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
