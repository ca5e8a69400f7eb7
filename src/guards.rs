//! Route guards.
//!
//! Guards are checked **before** navigation is committed. They decide
//! whether a navigation should continue, be denied, or be redirected
//! elsewhere, and may fail outright when a collaborator they depend on
//! (e.g. the user-info fetch of the [`AccessGuard`](crate::access::AccessGuard))
//! fails. Failures are returned to the caller of the navigation, never
//! swallowed.
//!
//! All guard methods are **synchronous**: the shell runs single-threaded and
//! every guard runs to completion within one navigation.
//!
//! # Execution order
//!
//! Guards run in **priority order** (higher value first, insertion order
//! among equals). The first non-[`Continue`](NavigationAction::Continue)
//! result short-circuits evaluation. The access guard uses priority 100.
//!
//! # Example
//!
//! ```
//! use console_navigator::guards::{guard_fn, NavigationAction};
//!
//! let maintenance = guard_fn(|_cx, request| {
//!     if request.to.path.starts_with("/billing") {
//!         Ok(NavigationAction::redirect("/maintenance"))
//!     } else {
//!         Ok(NavigationAction::Continue)
//!     }
//! });
//! # let _ = maintenance;
//! ```

use crate::context::{NavigationRequest, ShellContext};
use crate::error::NavigationError;

// ============================================================================
// NavigationAction
// ============================================================================

/// Verdict of a guard.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationAction {
    /// Allow navigation to proceed.
    Continue,

    /// Deny navigation with a reason.
    Deny {
        /// Human-readable reason for denying navigation.
        reason: String,
    },

    /// Redirect to a different full path.
    Redirect {
        /// Full path (query included) to redirect to.
        to: String,
        /// Optional human-readable reason for redirecting.
        reason: Option<String>,
    },
}

impl NavigationAction {
    /// Create a result that blocks navigation with a human-readable reason.
    pub fn deny(reason: impl Into<String>) -> Self {
        Self::Deny {
            reason: reason.into(),
        }
    }

    /// Create a result that redirects navigation to a different path.
    pub fn redirect(to: impl Into<String>) -> Self {
        Self::Redirect {
            to: to.into(),
            reason: None,
        }
    }

    /// Create a redirect result with a human-readable reason.
    pub fn redirect_with_reason(to: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Redirect {
            to: to.into(),
            reason: Some(reason.into()),
        }
    }

    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }

    pub fn is_deny(&self) -> bool {
        matches!(self, Self::Deny { .. })
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect { .. })
    }

    /// Get the redirect path, if this is a redirect action.
    pub fn redirect_path(&self) -> Option<&str> {
        match self {
            Self::Redirect { to, .. } => Some(to.as_str()),
            _ => None,
        }
    }
}

/// Result type of [`RouteGuard::check`].
pub type GuardResult = Result<NavigationAction, NavigationError>;

// ============================================================================
// RouteGuard trait
// ============================================================================

/// Trait for guards that control access to routes.
///
/// `cx` is the shell's shared context (preferences, access state); guards
/// may update it, e.g. to cache permissions for the session.
pub trait RouteGuard: 'static {
    /// Check if navigation should be allowed.
    fn check(&mut self, cx: &mut ShellContext, request: &NavigationRequest) -> GuardResult;

    /// Guard name for debugging and error messages.
    fn name(&self) -> &'static str {
        "RouteGuard"
    }

    /// Priority for execution order. Higher runs first. Default is 0.
    fn priority(&self) -> i32 {
        0
    }
}

// ============================================================================
// guard_fn helper
// ============================================================================

/// Create a guard from a closure.
pub const fn guard_fn<F>(f: F) -> FnGuard<F>
where
    F: FnMut(&mut ShellContext, &NavigationRequest) -> GuardResult + 'static,
{
    FnGuard { f }
}

/// Guard created from a closure via [`guard_fn`].
pub struct FnGuard<F> {
    f: F,
}

impl<F> RouteGuard for FnGuard<F>
where
    F: FnMut(&mut ShellContext, &NavigationRequest) -> GuardResult + 'static,
{
    fn check(&mut self, cx: &mut ShellContext, request: &NavigationRequest) -> GuardResult {
        (self.f)(cx, request)
    }
}

// ============================================================================
// Guard Composition
// ============================================================================

/// Combines multiple guards with AND logic.
///
/// Guards run in priority order; the first non-continue verdict (or the
/// first error) is returned.
pub struct Guards {
    guards: Vec<Box<dyn RouteGuard>>,
}

impl Guards {
    pub fn new(mut guards: Vec<Box<dyn RouteGuard>>) -> Self {
        sort_by_priority(&mut guards);
        Self { guards }
    }

    pub fn builder() -> GuardBuilder {
        GuardBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

impl RouteGuard for Guards {
    fn check(&mut self, cx: &mut ShellContext, request: &NavigationRequest) -> GuardResult {
        for guard in &mut self.guards {
            let result = guard.check(cx, request)?;
            if !result.is_continue() {
                return Ok(result);
            }
        }
        Ok(NavigationAction::Continue)
    }

    fn name(&self) -> &'static str {
        "Guards"
    }

    fn priority(&self) -> i32 {
        self.guards.iter().map(|g| g.priority()).max().unwrap_or(0)
    }
}

/// Builder for [`Guards`].
#[must_use]
pub struct GuardBuilder {
    guards: Vec<Box<dyn RouteGuard>>,
}

impl GuardBuilder {
    pub fn new() -> Self {
        Self { guards: Vec::new() }
    }

    pub fn guard<G: RouteGuard>(mut self, guard: G) -> Self {
        self.guards.push(Box::new(guard));
        self
    }

    pub fn build(self) -> Guards {
        Guards::new(self.guards)
    }
}

impl Default for GuardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Stable sort, higher priority first.
pub(crate) fn sort_by_priority(guards: &mut [Box<dyn RouteGuard>]) {
    guards.sort_by_key(|g| std::cmp::Reverse(g.priority()));
}

// ============================================================================
// Tests
// ============================================================================
