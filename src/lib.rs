//! # console-navigator
//!
//! Headless navigation core for admin-console shells: a nested route table,
//! the menu derived from it, breadcrumbs, keep-alive page names, a tab strip
//! with persistence, and a guarded navigation pipeline.
//!
//! Rendering, theming and HTTP are left to the host application. The crate
//! reaches them through small traits: [`Navigate`], [`AccessProvider`],
//! [`ProgressIndicator`](middleware::ProgressIndicator) and
//! [`Storage`](storage::Storage).
//!
//! ## Overview
//!
//! | Piece | Type |
//! |-------|------|
//! | Route table | [`RouteNode`], [`RouteMeta`] |
//! | Menu | [`MenuStore`], [`build_menu`](menu::build_menu) |
//! | Lookups | [`tree::find_path`], [`breadcrumbs_for`](breadcrumb::breadcrumbs_for) |
//! | Tab strip | [`TabStore`], [`Tab`] |
//! | Navigation | [`Shell`], guards, middleware |
//! | Session | [`AccessStore`], [`AccessGuard`](access::AccessGuard) |
//!
//! ## Example
//!
//! ```
//! use console_navigator::{MenuStore, RouteNode, Shell, ShellConfig};
//!
//! let routes = vec![
//!     RouteNode::new("/home", "Home").order(1),
//!     RouteNode::new("/system", "System").order(2).children(vec![
//!         RouteNode::new("/system/users", "Users"),
//!         RouteNode::new("/system/users/:id", "UserDetail").hidden(),
//!     ]),
//!     RouteNode::new("/*", "not-found").hidden(),
//! ];
//!
//! let menu = MenuStore::new(routes.clone());
//! assert_eq!(menu.selected_key_path("/system/users"), vec!["/system", "/system/users"]);
//!
//! let mut shell = Shell::new(ShellConfig::default(), routes).unwrap();
//! assert!(shell.push("/system/users/3").is_success());
//! assert_eq!(shell.current_route().unwrap().name, "UserDetail");
//! ```
//!
//! ## Features
//!
//! - `log` (default): log through the [`log`](https://docs.rs/log) crate
//! - `tracing`: log through [`tracing`](https://docs.rs/tracing) instead
//! - `guard` (default): guards and the access guard
//! - `middleware` (default): middleware, the common guard and document title
//! - `cache` (default): LRU cache for path resolution

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod logging;

pub mod access;
pub mod breadcrumb;
#[cfg(feature = "cache")]
pub mod cache;
pub mod config;
pub mod context;
pub mod error;
#[cfg(feature = "guard")]
pub mod guards;
pub mod keep_alive;
pub mod matching;
pub mod menu;
#[cfg(feature = "middleware")]
pub mod middleware;
pub mod notify;
pub mod params;
pub mod route;
pub mod state;
pub mod storage;
pub mod tab;
pub mod tree;

pub use access::{AccessProvider, AccessStore, UserInfo};
pub use breadcrumb::Breadcrumb;
pub use config::{AccessMode, ShellConfig};
pub use context::{Navigate, NavigationRequest, Shell, ShellContext};
pub use error::{NavigationError, NavigationResult};
#[cfg(feature = "guard")]
pub use guards::{guard_fn, NavigationAction, RouteGuard};
pub use keep_alive::KeepAlive;
pub use menu::{MenuItem, MenuStore};
#[cfg(feature = "middleware")]
pub use middleware::{middleware_fn, CommonGuard, DocumentTitle, RouteMiddleware};
pub use params::{Location, QueryParams, RouteParams};
pub use route::{RouteMeta, RouteNode};
pub use state::RouterState;
pub use storage::{LocalStorage, StorageKey};
pub use tab::{Tab, TabStore};
pub use tree::TreeNode;
