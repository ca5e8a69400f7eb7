//! Error handling for the navigation core.
//!
//! - [`NavigationResult`]: the top-level outcome of any navigation run by
//!   the [`Shell`](crate::context::Shell) (`Success`, `NotFound`,
//!   `Blocked`, `External`, `Error`).
//! - [`NavigationError`]: a detailed error variant (route not found,
//!   permission fetch failure, storage failure, etc.).
//!
//! Lookups over route and menu trees never produce errors: absence is an
//! ordinary outcome and is reported as `None` or an empty `Vec`.
//!
//! # Examples
//!
//! ```
//! use console_navigator::error::NavigationResult;
//!
//! let result = NavigationResult::Success { path: "/home".into() };
//! assert!(result.is_success());
//!
//! let blocked = NavigationResult::Blocked {
//!     reason: "Not authenticated".into(),
//!     redirect: Some("/login".into()),
//! };
//! assert_eq!(blocked.redirect_path(), Some("/login"));
//! ```

use std::fmt;

// ============================================================================
// Navigation Result Types
// ============================================================================

/// Outcome of a navigation attempt through the guard/middleware pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationResult {
    /// Navigation succeeded; `path` is the location finally reached.
    Success { path: String },
    /// No route (and no catch-all route) matched the path.
    NotFound { path: String },
    /// Navigation blocked by a guard.
    Blocked {
        reason: String,
        redirect: Option<String>,
    },
    /// The target is an external link; history was left untouched.
    External { url: String },
    /// Navigation error surfaced by a guard or collaborator.
    Error(NavigationError),
}

/// Detailed error variants that can occur during navigation.
///
/// Implements [`std::error::Error`] and [`Display`](std::fmt::Display).
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationError {
    /// Route not found
    RouteNotFound { path: String },

    /// Guard blocked navigation
    GuardBlocked { reason: String },

    /// Guards kept redirecting past the allowed depth
    RedirectLoop { path: String, depth: usize },

    /// Fetching user info or menus failed while deriving access
    AccessFetch { message: String },

    /// Reading or writing persisted state failed
    Storage { message: String },

    /// The route table could not be turned into a matcher
    InvalidRoute { path: String, message: String },

    /// Custom error
    Custom { message: String },
}

impl NavigationError {
    /// Shorthand for an [`AccessFetch`](Self::AccessFetch) error.
    pub fn access_fetch(message: impl Into<String>) -> Self {
        Self::AccessFetch {
            message: message.into(),
        }
    }

    /// Shorthand for a [`Storage`](Self::Storage) error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::RouteNotFound { path } => {
                write!(f, "Route not found: {}", path)
            }
            NavigationError::GuardBlocked { reason } => {
                write!(f, "Navigation blocked: {}", reason)
            }
            NavigationError::RedirectLoop { path, depth } => {
                write!(f, "Redirect loop detected (depth {}): target '{}'", depth, path)
            }
            NavigationError::AccessFetch { message } => {
                write!(f, "Failed to load access data: {}", message)
            }
            NavigationError::Storage { message } => {
                write!(f, "Storage error: {}", message)
            }
            NavigationError::InvalidRoute { path, message } => {
                write!(f, "Invalid route '{}': {}", path, message)
            }
            NavigationError::Custom { message } => {
                write!(f, "{}", message)
            }
        }
    }
}

impl std::error::Error for NavigationError {}

impl From<serde_json::Error> for NavigationError {
    fn from(err: serde_json::Error) -> Self {
        NavigationError::Storage {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for NavigationError {
    fn from(err: std::io::Error) -> Self {
        NavigationError::Storage {
            message: err.to_string(),
        }
    }
}

impl NavigationResult {
    /// Check if navigation was successful
    pub fn is_success(&self) -> bool {
        matches!(self, NavigationResult::Success { .. })
    }

    /// Check if route was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, NavigationResult::NotFound { .. })
    }

    /// Check if navigation was blocked
    pub fn is_blocked(&self) -> bool {
        matches!(self, NavigationResult::Blocked { .. })
    }

    /// Check if the target was an external link
    pub fn is_external(&self) -> bool {
        matches!(self, NavigationResult::External { .. })
    }

    /// Check if navigation errored
    pub fn is_error(&self) -> bool {
        matches!(self, NavigationResult::Error(_))
    }

    /// Get redirect path if blocked with redirect
    pub fn redirect_path(&self) -> Option<&str> {
        match self {
            NavigationResult::Blocked {
                redirect: Some(path),
                ..
            } => Some(path),
            _ => None,
        }
    }

    /// The path reached on success.
    pub fn path(&self) -> Option<&str> {
        match self {
            NavigationResult::Success { path } => Some(path),
            _ => None,
        }
    }

    /// Convert into a `Result`, keeping only hard errors as `Err`.
    ///
    /// Blocked and not-found outcomes are ordinary results and stay `Ok`.
    pub fn into_result(self) -> Result<NavigationResult, NavigationError> {
        match self {
            NavigationResult::Error(err) => Err(err),
            other => Ok(other),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
