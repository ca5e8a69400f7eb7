//! Route middleware for cross-cutting navigation concerns.
//!
//! Middleware runs **before** and **after** navigation. Unlike guards (which
//! decide *if* navigation happens), middleware handles side effects: the
//! loading indicator, visited-page bookkeeping, the document title.
//!
//! All methods are **synchronous**; the shell is single-threaded.
//!
//! # Execution order
//!
//! Middleware executes in **priority order** (higher
//! [`priority`](RouteMiddleware::priority) first) for `before_navigation`,
//! ahead of every guard, and in reverse order for `after_navigation`
//! (onion model). When a guard denies, redirects or fails,
//! [`navigation_cancelled`](RouteMiddleware::navigation_cancelled) runs
//! instead of `after_navigation`.
//!
//! # Creating middleware
//!
//! | Approach | When to use |
//! |----------|-------------|
//! | Implement [`RouteMiddleware`] | Full control, named, with custom priority |
//! | [`middleware_fn`] | Quick one-off from two closures |
//!
//! # Example
//!
//! ```
//! use console_navigator::context::{NavigationRequest, ShellContext};
//! use console_navigator::middleware::RouteMiddleware;
//!
//! struct PageViews(Vec<String>);
//!
//! impl RouteMiddleware for PageViews {
//!     fn before_navigation(&mut self, _cx: &mut ShellContext, _request: &mut NavigationRequest) {}
//!
//!     fn after_navigation(&mut self, _cx: &mut ShellContext, request: &NavigationRequest) {
//!         self.0.push(request.to.path.clone());
//!     }
//! }
//! ```

use crate::context::{NavigationRequest, ShellContext};
use crate::trace_log;
use std::collections::HashSet;

// ============================================================================
// RouteMiddleware trait
// ============================================================================

/// Middleware that processes navigation requests.
///
/// `before_navigation` may annotate the request (e.g. set
/// [`NavigationRequest::loaded`]) before guards see it.
pub trait RouteMiddleware: 'static {
    /// Called before guards run.
    fn before_navigation(&mut self, cx: &mut ShellContext, request: &mut NavigationRequest);

    /// Called after navigation completes successfully.
    fn after_navigation(&mut self, cx: &mut ShellContext, request: &NavigationRequest);

    /// Called when a guard stopped a navigation this middleware saw in
    /// `before_navigation`.
    fn navigation_cancelled(&mut self, _cx: &mut ShellContext, _request: &NavigationRequest) {}

    /// Middleware name for debugging.
    fn name(&self) -> &'static str {
        "RouteMiddleware"
    }

    /// Priority for execution order. Higher runs first. Default is 0.
    fn priority(&self) -> i32 {
        0
    }
}

// ============================================================================
// middleware_fn helper
// ============================================================================

/// Create middleware from two closures (before and after).
///
/// # Example
///
/// ```
/// use console_navigator::middleware::middleware_fn;
///
/// let mw = middleware_fn(
///     |_cx, request| {
///         println!("Before: {}", request.to.path);
///     },
///     |_cx, request| {
///         println!("After: {}", request.to.path);
///     },
/// );
/// # let _ = mw;
/// ```
pub const fn middleware_fn<B, A>(before: B, after: A) -> FnMiddleware<B, A>
where
    B: FnMut(&mut ShellContext, &mut NavigationRequest) + 'static,
    A: FnMut(&mut ShellContext, &NavigationRequest) + 'static,
{
    FnMiddleware { before, after }
}

/// Middleware created from two closures via [`middleware_fn`].
pub struct FnMiddleware<B, A> {
    before: B,
    after: A,
}

impl<B, A> RouteMiddleware for FnMiddleware<B, A>
where
    B: FnMut(&mut ShellContext, &mut NavigationRequest) + 'static,
    A: FnMut(&mut ShellContext, &NavigationRequest) + 'static,
{
    fn before_navigation(&mut self, cx: &mut ShellContext, request: &mut NavigationRequest) {
        (self.before)(cx, request);
    }

    fn after_navigation(&mut self, cx: &mut ShellContext, request: &NavigationRequest) {
        (self.after)(cx, request);
    }
}

/// Stable sort, higher priority first.
pub(crate) fn sort_by_priority(middleware: &mut [Box<dyn RouteMiddleware>]) {
    middleware.sort_by_key(|m| std::cmp::Reverse(m.priority()));
}

// ============================================================================
// Progress indicator
// ============================================================================

/// The page-loading bar shown while navigating.
pub trait ProgressIndicator: 'static {
    fn start(&mut self);
    fn stop(&mut self);
}

/// Progress indicator that draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressIndicator for NoProgress {
    fn start(&mut self) {}
    fn stop(&mut self) {}
}

// ============================================================================
// CommonGuard
// ============================================================================

/// Visited-page tracking and the loading indicator.
///
/// Before navigating, `request.loaded` tells whether the target path was
/// shown before (the host skips the enter transition for those). The
/// indicator starts for first visits when `config.progress` is on and stops
/// once the navigation completes or is cancelled.
pub struct CommonGuard<P = NoProgress> {
    loaded_paths: HashSet<String>,
    progress: P,
    running: bool,
}

impl<P: ProgressIndicator> CommonGuard<P> {
    pub fn new(progress: P) -> Self {
        Self {
            loaded_paths: HashSet::new(),
            progress,
            running: false,
        }
    }

    pub fn is_loaded(&self, path: &str) -> bool {
        self.loaded_paths.contains(path)
    }

    pub fn progress(&self) -> &P {
        &self.progress
    }

    fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.progress.stop();
        }
    }
}

impl Default for CommonGuard<NoProgress> {
    fn default() -> Self {
        Self::new(NoProgress)
    }
}

impl<P: ProgressIndicator> RouteMiddleware for CommonGuard<P> {
    fn before_navigation(&mut self, cx: &mut ShellContext, request: &mut NavigationRequest) {
        request.loaded = self.loaded_paths.contains(&request.to.path);
        if !request.loaded && cx.config.progress && !self.running {
            self.running = true;
            self.progress.start();
        }
    }

    fn after_navigation(&mut self, _cx: &mut ShellContext, request: &NavigationRequest) {
        self.loaded_paths.insert(request.to.path.clone());
        self.stop();
    }

    fn navigation_cancelled(&mut self, _cx: &mut ShellContext, _request: &NavigationRequest) {
        self.stop();
    }

    fn name(&self) -> &'static str {
        "CommonGuard"
    }

    fn priority(&self) -> i32 {
        100
    }
}

// ============================================================================
// DocumentTitle
// ============================================================================

/// Sets [`ShellContext::document_title`] from the reached route's title.
#[derive(Debug, Clone, Default)]
pub struct DocumentTitle {
    app_name: Option<String>,
}

impl DocumentTitle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append ` - {app_name}` to every title.
    #[must_use]
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }
}

impl RouteMiddleware for DocumentTitle {
    fn before_navigation(&mut self, _cx: &mut ShellContext, _request: &mut NavigationRequest) {}

    fn after_navigation(&mut self, cx: &mut ShellContext, request: &NavigationRequest) {
        let title = request.meta.title.as_str();
        let document_title = match (&self.app_name, title.is_empty()) {
            (Some(app), false) => format!("{title} - {app}"),
            (Some(app), true) => app.clone(),
            (None, _) => title.to_string(),
        };
        trace_log!("Document title: '{}'", document_title);
        cx.document_title = Some(document_title);
    }

    fn name(&self) -> &'static str {
        "DocumentTitle"
    }
}

// ============================================================================
// Tests
// ============================================================================
