//! Shell preferences.
//!
//! [`ShellConfig`] collects the paths and switches the navigation core
//! needs from the host application. It builds fluently in code and also
//! deserializes from the preferences JSON the host already keeps, with every
//! field optional.
//!
//! ```
//! use console_navigator::config::{AccessMode, ShellConfig};
//!
//! let config = ShellConfig::new()
//!     .home_path("/dashboard")
//!     .access_mode(AccessMode::Backend)
//!     .cache_tabs(true);
//! assert_eq!(config.home_path, "/dashboard");
//!
//! let parsed = ShellConfig::from_json(r#"{"loginPath": "/auth/login"}"#).unwrap();
//! assert_eq!(parsed.login_path, "/auth/login");
//! assert_eq!(parsed.home_path, "/home");
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where accessible menus and routes come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessMode {
    /// Filter the local route table by each route's `authority` roles.
    #[default]
    Frontend,
    /// Use the menu payload returned by the backend.
    Backend,
}

/// Navigation core preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShellConfig {
    /// Path of the always-present home tab.
    pub home_path: String,
    pub login_path: String,
    /// Landing page when a user has no personal home path.
    pub default_home_path: String,
    /// Name of the catch-all route unmatched paths resolve to.
    pub not_found_name: String,
    /// Routes the access guard never intercepts. Must not contain the
    /// not-found route: unmatched paths go through the access guard, which
    /// generates the accessible routes and retries them.
    pub core_route_names: Vec<String>,
    /// Persist open tabs across sessions.
    pub cache_tabs: bool,
    /// Drive the progress indicator during navigation.
    pub progress: bool,
    pub access_mode: AccessMode,
    /// Drop the current page's keep-alive instance on reload.
    pub reset_cache_on_reload: bool,
    /// Delay between unmounting and remounting content on reload, in ms.
    pub reload_delay_ms: u64,
    /// Capacity of the route resolution cache.
    pub cache_capacity: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            home_path: "/home".to_string(),
            login_path: "/login".to_string(),
            default_home_path: "/home".to_string(),
            not_found_name: "not-found".to_string(),
            core_route_names: vec![
                "login".to_string(),
                "forbidden".to_string(),
                "internal-error".to_string(),
            ],
            cache_tabs: true,
            progress: true,
            access_mode: AccessMode::Frontend,
            reset_cache_on_reload: true,
            reload_delay_ms: 300,
            cache_capacity: 256,
        }
    }
}

impl ShellConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse preferences JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, crate::NavigationError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn home_path(mut self, path: impl Into<String>) -> Self {
        self.home_path = path.into();
        self
    }

    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    pub fn default_home_path(mut self, path: impl Into<String>) -> Self {
        self.default_home_path = path.into();
        self
    }

    pub fn core_route_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.core_route_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn cache_tabs(mut self, enabled: bool) -> Self {
        self.cache_tabs = enabled;
        self
    }

    pub fn progress(mut self, enabled: bool) -> Self {
        self.progress = enabled;
        self
    }

    pub fn access_mode(mut self, mode: AccessMode) -> Self {
        self.access_mode = mode;
        self
    }

    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn is_core_route(&self, name: &str) -> bool {
        self.core_route_names.iter().any(|n| n == name)
    }

    pub fn reload_delay(&self) -> Duration {
        Duration::from_millis(self.reload_delay_ms)
    }
}
