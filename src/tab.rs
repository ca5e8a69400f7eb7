//! Tab strip state.
//!
//! [`TabStore`] tracks the pages the user has open. The home tab is always
//! present and never stored in the removable list; tabs with a
//! `fixed_index` are pinned and survive every clear operation.
//!
//! Operations that may close the active tab switch the router first through
//! a [`Navigate`] collaborator and only drop tabs once that navigation
//! succeeded, so [`TabStore::active_path`] always names a tab that exists.
//!
//! # Example
//!
//! ```
//! use console_navigator::context::Navigate;
//! use console_navigator::error::NavigationResult;
//! use console_navigator::route::RouteNode;
//! use console_navigator::tab::{Tab, TabStore};
//!
//! struct Recorder(Vec<String>);
//!
//! impl Navigate for Recorder {
//!     fn push(&mut self, full_path: &str) -> NavigationResult {
//!         self.0.push(full_path.to_string());
//!         NavigationResult::Success { path: full_path.to_string() }
//!     }
//!
//!     fn current_path(&self) -> String {
//!         self.0.last().cloned().unwrap_or_default()
//!     }
//! }
//!
//! let mut tabs = TabStore::new(Tab::new("/home", "Home"));
//! tabs.add_tab(&RouteNode::new("/x", "X"), "/x", true);
//! tabs.add_tab(&RouteNode::new("/y", "Y"), "/y", true);
//!
//! let mut router = Recorder(Vec::new());
//! tabs.remove_tab("/y", &mut router);
//!
//! assert_eq!(router.0, vec!["/x"]);
//! assert_eq!(tabs.active_path(), "/x");
//! ```

use crate::config::ShellConfig;
use crate::context::Navigate;
use crate::error::{NavigationError, NavigationResult};
use crate::notify::{SubscriptionId, Subscribers};
use crate::params::Location;
use crate::route::{find_route_by_name, find_route_by_path, RouteNode};
use crate::storage::{LocalStorage, Storage, StorageKey};
use crate::{debug_log, trace_log, warn_log};
use serde::{Deserialize, Serialize};

// ============================================================================
// Tab
// ============================================================================

/// One open page in the tab strip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    /// Identity of the tab; unique within a [`TabStore`].
    pub path: String,
    pub label: String,
    /// Path plus query, pushed when the tab is clicked.
    pub full_path: String,
    /// Temporary label set through [`TabStore::set_tab_label`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_label: Option<String>,
    /// Pinned position; pinned tabs are never cleared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_name: Option<String>,
}

impl Tab {
    pub fn new(path: impl Into<String>, label: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            full_path: path.clone(),
            path,
            label: label.into(),
            ..Self::default()
        }
    }

    /// Build the tab for `route` reached at `full_path`.
    ///
    /// Tabs are keyed by the concrete path, so `/users/1` and `/users/2`
    /// get separate tabs. Routes flagged `multi_tab` are keyed by the full
    /// path so each query variant gets its own tab too.
    pub fn from_route(route: &RouteNode, full_path: &str) -> Self {
        let path = if route.meta.multi_tab {
            full_path.to_string()
        } else {
            Location::parse(full_path).path
        };
        Self {
            path,
            label: route.meta.title.clone(),
            full_path: full_path.to_string(),
            new_label: None,
            old_label: None,
            fixed_index: route.meta.fixed_index_in_tab,
            icon: route.meta.icon.clone(),
            route_name: Some(route.name.clone()).filter(|name| !name.is_empty()),
        }
    }

    /// The label to render: the temporary label when one is set.
    pub fn display_label(&self) -> &str {
        self.new_label.as_deref().unwrap_or(&self.label)
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed_index.is_some()
    }
}

/// Change notification sent to [`TabStore`] subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabEvent {
    Added { path: String },
    Removed { paths: Vec<String> },
    Activated { path: String },
    Relabeled { path: String },
    Restored { count: usize },
}

// ============================================================================
// TabStore
// ============================================================================

/// Ordered collection of open tabs plus the active tab path.
pub struct TabStore {
    home: Tab,
    tabs: Vec<Tab>,
    active_path: String,
    cache_enabled: bool,
    max_tabs: Option<usize>,
    subscribers: Subscribers<TabEvent>,
}

impl TabStore {
    /// Create a store with only the home tab, which starts active.
    pub fn new(home: Tab) -> Self {
        Self {
            active_path: home.path.clone(),
            home,
            tabs: Vec::new(),
            cache_enabled: true,
            max_tabs: None,
            subscribers: Subscribers::new(),
        }
    }

    /// Create a store whose persistence follows the `cache_tabs`
    /// preference of [`ShellConfig`].
    pub fn from_config(home: Tab, config: &ShellConfig) -> Self {
        Self::new(home).with_cache(config.cache_tabs)
    }

    /// Whether [`cache_tabs`](Self::cache_tabs) persists anything.
    #[must_use]
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Cap the number of removable tabs; the oldest unpinned inactive tab
    /// is dropped when a new one would exceed it.
    #[must_use]
    pub fn with_max_tabs(mut self, max: usize) -> Self {
        self.max_tabs = Some(max.max(1));
        self
    }

    pub fn home(&self) -> &Tab {
        &self.home
    }

    pub fn active_path(&self) -> &str {
        &self.active_path
    }

    /// Every tab for display: home, pinned tabs by `fixed_index`, then the
    /// rest in the order they were opened.
    pub fn tabs(&self) -> Vec<&Tab> {
        let mut fixed: Vec<&Tab> = self.tabs.iter().filter(|tab| tab.is_fixed()).collect();
        fixed.sort_by_key(|tab| tab.fixed_index);

        std::iter::once(&self.home)
            .chain(fixed)
            .chain(self.tabs.iter().filter(|tab| !tab.is_fixed()))
            .collect()
    }

    /// Removable tabs in the order they were opened.
    pub fn stored_tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn find(&self, path: &str) -> Option<&Tab> {
        if path == self.home.path {
            return Some(&self.home);
        }
        self.tabs.iter().find(|tab| tab.path == path)
    }

    pub fn len(&self) -> usize {
        self.tabs.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Restore persisted tabs, drop those whose route no longer exists, then
    /// open the tab for the current route.
    pub fn init<S: Storage>(
        &mut self,
        current_route: &RouteNode,
        current_full_path: &str,
        routes: &[RouteNode],
        storage: &LocalStorage<S>,
    ) -> Result<(), NavigationError> {
        if self.cache_enabled {
            if let Some(stored) = storage.get::<Vec<Tab>>(StorageKey::GlobalTabs)? {
                let total = stored.len();
                self.tabs = stored
                    .into_iter()
                    .filter(|tab| tab.path != self.home.path && route_exists(tab, routes))
                    .collect();
                debug_log!(
                    "Restored {} of {} cached tabs",
                    self.tabs.len(),
                    total
                );
                self.emit(TabEvent::Restored {
                    count: self.tabs.len(),
                });
            }
        }

        self.add_tab(current_route, current_full_path, true);
        Ok(())
    }

    /// Persist the tab list; called when the page unloads.
    pub fn cache_tabs<S: Storage>(&self, storage: &mut LocalStorage<S>) -> Result<(), NavigationError> {
        if !self.cache_enabled {
            return Ok(());
        }
        trace_log!("Caching {} tabs", self.tabs.len());
        storage.set(StorageKey::GlobalTabs, &self.tabs)
    }

    // ------------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------------

    /// Open the tab for `route`; re-adding an open tab only activates it.
    pub fn add_tab(&mut self, route: &RouteNode, full_path: &str, active: bool) {
        let tab = Tab::from_route(route, full_path);
        let path = tab.path.clone();

        if path != self.home.path && self.find(&path).is_none() {
            trace_log!("Opening tab '{}'", path);
            self.tabs.push(tab);
            self.emit(TabEvent::Added { path: path.clone() });
        }

        if active {
            self.set_active(path.clone());
        }
        self.evict_overflow(&path);
    }

    /// Close the tab at `path`.
    ///
    /// Closing the active tab first navigates to the last remaining tab (or
    /// home). If that navigation does not succeed the tabs are left as they
    /// were and the navigation outcome is returned.
    pub fn remove_tab(&mut self, path: &str, nav: &mut dyn Navigate) -> Option<NavigationResult> {
        if self.find(path).is_none() || path == self.home.path {
            return None;
        }

        let remaining: Vec<Tab> = self.tabs.iter().filter(|tab| tab.path != path).cloned().collect();

        if self.active_path != path {
            self.replace_tabs(remaining);
            return None;
        }

        let fallback = remaining.last().cloned().unwrap_or_else(|| self.home.clone());
        let result = self.switch_route_by_tab(&fallback, nav);
        if result.is_success() {
            self.replace_tabs(remaining);
        } else {
            warn_log!("Keeping tab '{}' open: switching away failed", path);
        }
        Some(result)
    }

    pub fn remove_active_tab(&mut self, nav: &mut dyn Navigate) -> Option<NavigationResult> {
        let active = self.active_path.clone();
        self.remove_tab(&active, nav)
    }

    pub fn remove_tab_by_route_name(
        &mut self,
        route_name: &str,
        nav: &mut dyn Navigate,
    ) -> Option<NavigationResult> {
        let path = self
            .tabs
            .iter()
            .find(|tab| tab.route_name.as_deref() == Some(route_name))?
            .path
            .clone();
        self.remove_tab(&path, nav)
    }

    /// Close every tab that is neither pinned nor listed in `excludes`.
    pub fn clear_tabs(&mut self, excludes: &[String], nav: &mut dyn Navigate) -> Option<NavigationResult> {
        let remaining: Vec<Tab> = self
            .tabs
            .iter()
            .filter(|tab| tab.is_fixed() || excludes.contains(&tab.path))
            .cloned()
            .collect();

        if remaining.len() == self.tabs.len() {
            return None;
        }

        let removes_active = self.active_path != self.home.path
            && !remaining.iter().any(|tab| tab.path == self.active_path);

        if !removes_active {
            self.replace_tabs(remaining);
            return None;
        }

        let fallback = remaining.last().cloned().unwrap_or_else(|| self.home.clone());
        let result = self.switch_route_by_tab(&fallback, nav);
        if result.is_success() {
            self.replace_tabs(remaining);
        }
        Some(result)
    }

    /// Close the tabs opened before `path`.
    pub fn clear_left_tabs(&mut self, path: &str, nav: &mut dyn Navigate) -> Option<NavigationResult> {
        let index = self.position(path)?;
        let excludes: Vec<String> = self.tabs[index..].iter().map(|tab| tab.path.clone()).collect();
        self.clear_tabs(&excludes, nav)
    }

    /// Close the tabs opened after `path`; from the home tab this closes all.
    pub fn clear_right_tabs(&mut self, path: &str, nav: &mut dyn Navigate) -> Option<NavigationResult> {
        if path == self.home.path {
            return self.clear_tabs(&[], nav);
        }
        let index = self.position(path)?;
        let excludes: Vec<String> = self.tabs[..=index].iter().map(|tab| tab.path.clone()).collect();
        self.clear_tabs(&excludes, nav)
    }

    /// Navigate to `tab`; it becomes active only if the navigation succeeded.
    pub fn switch_route_by_tab(&mut self, tab: &Tab, nav: &mut dyn Navigate) -> NavigationResult {
        let result = nav.push(&tab.full_path);
        if result.is_success() {
            self.set_active(tab.path.clone());
        } else {
            debug_log!("Tab switch to '{}' did not complete: {:?}", tab.full_path, result);
        }
        result
    }

    /// Show `label` on the tab at `path` (the active tab when `None`).
    pub fn set_tab_label(&mut self, label: impl Into<String>, path: Option<&str>) {
        let path = path.unwrap_or(self.active_path.as_str()).to_string();
        let Some(tab) = self.tabs.iter_mut().find(|tab| tab.path == path) else {
            return;
        };
        tab.old_label = Some(tab.label.clone());
        tab.new_label = Some(label.into());
        self.emit(TabEvent::Relabeled { path });
    }

    /// Drop the temporary label of the tab at `path` (the active tab when `None`).
    pub fn reset_tab_label(&mut self, path: Option<&str>) {
        let path = path.unwrap_or(self.active_path.as_str()).to_string();
        let Some(tab) = self.tabs.iter_mut().find(|tab| tab.path == path) else {
            return;
        };
        tab.new_label = None;
        self.emit(TabEvent::Relabeled { path });
    }

    /// Whether the tab at `path` survives clearing (home or pinned).
    pub fn is_tab_retain(&self, path: &str) -> bool {
        path == self.home.path || self.tabs.iter().any(|tab| tab.path == path && tab.is_fixed())
    }

    // ------------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------------

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&TabEvent) + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn position(&self, path: &str) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.path == path)
    }

    fn set_active(&mut self, path: String) {
        if self.active_path != path {
            self.active_path = path.clone();
            self.emit(TabEvent::Activated { path });
        }
    }

    fn replace_tabs(&mut self, remaining: Vec<Tab>) {
        let removed: Vec<String> = self
            .tabs
            .iter()
            .filter(|tab| !remaining.iter().any(|kept| kept.path == tab.path))
            .map(|tab| tab.path.clone())
            .collect();
        self.tabs = remaining;
        if !removed.is_empty() {
            debug_log!("Closed tabs {:?}", removed);
            self.emit(TabEvent::Removed { paths: removed });
        }
    }

    fn evict_overflow(&mut self, just_added: &str) {
        let Some(max) = self.max_tabs else {
            return;
        };
        while self.tabs.len() > max {
            let victim = self.tabs.iter().position(|tab| {
                !tab.is_fixed() && tab.path != self.active_path && tab.path != just_added
            });
            let Some(index) = victim else {
                break;
            };
            let evicted = self.tabs.remove(index);
            trace_log!("Evicting tab '{}' over the limit of {}", evicted.path, max);
            self.emit(TabEvent::Removed {
                paths: vec![evicted.path],
            });
        }
    }

    fn emit(&mut self, event: TabEvent) {
        self.subscribers.emit(&event);
    }
}

impl std::fmt::Debug for TabStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabStore")
            .field("home", &self.home.path)
            .field("tabs", &self.tabs.len())
            .field("active_path", &self.active_path)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

fn route_exists(tab: &Tab, routes: &[RouteNode]) -> bool {
    match &tab.route_name {
        Some(name) => find_route_by_name(routes, name).is_some(),
        None => find_route_by_path(routes, &tab.path).is_some(),
    }
}

// ============================================================================
// Tests
// ============================================================================
