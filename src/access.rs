//! Session access state and the access guard.
//!
//! [`AccessStore`] holds what the session knows about the signed-in user:
//! the token, the fetched [`UserInfo`], and the routes and menus the user
//! may reach. [`AccessGuard`] fills it in lazily on the first navigation
//! after sign-in and keeps unauthenticated users on the login page.
//!
//! Accessible routes come from one of two places, chosen by
//! [`AccessMode`]:
//!
//! - **Frontend**: the locally declared access routes, filtered by each
//!   route's `meta.authority` against the user's roles.
//! - **Backend**: the route payload returned by
//!   [`AccessProvider::fetch_all_menus`].

use crate::config::AccessMode;
use crate::error::NavigationError;
use crate::menu::{build_menu, MenuItem};
use crate::route::{sort_routes, RouteNode};
use crate::tree::MAX_TREE_DEPTH;
use crate::{debug_log, info_log};
use serde::{Deserialize, Serialize};

#[cfg(feature = "guard")]
use crate::context::{NavigationRequest, ShellContext};
#[cfg(feature = "guard")]
use crate::guards::{GuardResult, NavigationAction, RouteGuard};
#[cfg(feature = "guard")]
use crate::params::{Location, QueryParams};
#[cfg(feature = "guard")]
use crate::trace_log;

/// The signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserInfo {
    pub user_id: String,
    pub username: String,
    pub real_name: String,
    pub roles: Vec<String>,
    /// Personal landing page, overriding the default home path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_path: Option<String>,
}

/// Remote calls the access guard depends on.
pub trait AccessProvider: 'static {
    fn fetch_user_info(&mut self) -> Result<UserInfo, NavigationError>;

    /// Route payload for [`AccessMode::Backend`].
    fn fetch_all_menus(&mut self) -> Result<Vec<RouteNode>, NavigationError>;
}

// ============================================================================
// AccessStore
// ============================================================================

/// Per-session access state.
#[derive(Debug, Clone, Default)]
pub struct AccessStore {
    access_token: Option<String>,
    refresh_token: Option<String>,
    user_info: Option<UserInfo>,
    access_routes: Vec<RouteNode>,
    access_menus: Vec<MenuItem>,
    access_checked: bool,
    generation: u64,
}

impl AccessStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn set_access_token(&mut self, token: Option<String>) {
        self.access_token = token;
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn set_refresh_token(&mut self, token: Option<String>) {
        self.refresh_token = token;
    }

    pub fn user_info(&self) -> Option<&UserInfo> {
        self.user_info.as_ref()
    }

    pub fn set_user_info(&mut self, info: Option<UserInfo>) {
        self.user_info = info;
    }

    pub fn access_routes(&self) -> &[RouteNode] {
        &self.access_routes
    }

    /// Replace the accessible routes. Bumps [`generation`](Self::generation)
    /// so the shell rebuilds its matcher.
    pub fn set_access_routes(&mut self, routes: Vec<RouteNode>) {
        self.access_routes = routes;
        self.generation += 1;
    }

    pub fn access_menus(&self) -> &[MenuItem] {
        &self.access_menus
    }

    pub fn set_access_menus(&mut self, menus: Vec<MenuItem>) {
        self.access_menus = menus;
    }

    pub fn is_access_checked(&self) -> bool {
        self.access_checked
    }

    pub fn set_access_checked(&mut self, checked: bool) {
        self.access_checked = checked;
    }

    /// Incremented each time the accessible route set changes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Forget everything about the session (sign-out).
    pub fn reset(&mut self) {
        let generation = self.generation + 1;
        *self = Self {
            generation,
            ..Self::default()
        };
        debug_log!("Access state reset");
    }
}

// ============================================================================
// Route derivation
// ============================================================================

/// Accessible routes and the menu derived from them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Accessible {
    pub routes: Vec<RouteNode>,
    pub menus: Vec<MenuItem>,
}

/// Keep the routes `roles` may reach.
///
/// A route without `authority` is open to everyone; otherwise one shared
/// role is enough. A rejected route takes its whole subtree with it.
/// Routes nested deeper than [`MAX_TREE_DEPTH`] are dropped.
pub fn filter_by_authority(routes: &[RouteNode], roles: &[String]) -> Vec<RouteNode> {
    filter_by_authority_at(routes, roles, 1)
}

fn filter_by_authority_at(routes: &[RouteNode], roles: &[String], depth: usize) -> Vec<RouteNode> {
    routes
        .iter()
        .filter(|route| has_authority(route, roles))
        .map(|route| RouteNode {
            path: route.path.clone(),
            name: route.name.clone(),
            component: route.component.clone(),
            redirect: route.redirect.clone(),
            meta: route.meta.clone(),
            children: if depth >= MAX_TREE_DEPTH {
                Vec::new()
            } else {
                filter_by_authority_at(&route.children, roles, depth + 1)
            },
        })
        .collect()
}

fn has_authority(route: &RouteNode, roles: &[String]) -> bool {
    match &route.meta.authority {
        None => true,
        Some(required) => required.iter().any(|role| roles.contains(role)),
    }
}

/// Derive the routes and menus available to a user with `roles`.
pub fn generate_accessible(
    mode: AccessMode,
    roles: &[String],
    access_routes: &[RouteNode],
    provider: &mut dyn AccessProvider,
) -> Result<Accessible, NavigationError> {
    let mut routes = match mode {
        AccessMode::Frontend => filter_by_authority(access_routes, roles),
        AccessMode::Backend => provider.fetch_all_menus()?,
    };
    sort_routes(&mut routes);
    let menus = build_menu(&routes);
    info_log!(
        "Generated {} accessible routes ({:?} mode, roles {:?})",
        routes.len(),
        mode,
        roles
    );
    Ok(Accessible { routes, menus })
}

// ============================================================================
// AccessGuard
// ============================================================================

/// Authentication and permission guard.
///
/// - Core routes (login, error pages) always pass; a signed-in user opening
///   the login page is sent on to the `redirect` query target or their home.
/// - Without a token only `ignore_access` routes pass; everything else is
///   redirected to the login page with the original target in `redirect`.
/// - The first navigation with a token fetches the user, derives the
///   accessible routes, stores them in [`AccessStore`] and replays the
///   original target so it resolves against the new routes.
#[cfg(feature = "guard")]
pub struct AccessGuard<P> {
    provider: P,
    access_routes: Vec<RouteNode>,
}

#[cfg(feature = "guard")]
impl<P: AccessProvider> AccessGuard<P> {
    /// `access_routes` are the permission-checked routes used in
    /// [`AccessMode::Frontend`].
    pub fn new(provider: P, access_routes: Vec<RouteNode>) -> Self {
        Self {
            provider,
            access_routes,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn login_redirect(cx: &ShellContext, request: &NavigationRequest) -> NavigationAction {
        let target = request.to.full_path();
        let mut query = QueryParams::new();
        if target != cx.config.default_home_path {
            query.insert("redirect".to_string(), target);
        }
        let login = Location {
            path: cx.config.login_path.clone(),
            query,
        };
        NavigationAction::redirect_with_reason(login.full_path(), "Not authenticated")
    }
}

#[cfg(feature = "guard")]
impl<P: AccessProvider> RouteGuard for AccessGuard<P> {
    fn check(&mut self, cx: &mut ShellContext, request: &NavigationRequest) -> GuardResult {
        let signed_in = cx.access.access_token().is_some();

        let is_core = request
            .route_name
            .as_deref()
            .is_some_and(|name| cx.config.is_core_route(name));
        if is_core {
            if signed_in && request.to.path == cx.config.login_path {
                let target = request
                    .to
                    .query
                    .get("redirect")
                    .map(str::to_string)
                    .or_else(|| cx.access.user_info().and_then(|u| u.home_path.clone()))
                    .unwrap_or_else(|| cx.config.default_home_path.clone());
                trace_log!("Signed-in user left the login page for '{}'", target);
                return Ok(NavigationAction::redirect(target));
            }
            return Ok(NavigationAction::Continue);
        }

        if !signed_in {
            if request.meta.ignore_access || request.to.full_path() == cx.config.login_path {
                return Ok(NavigationAction::Continue);
            }
            debug_log!("No access token, sending '{}' to login", request.to.full_path());
            return Ok(Self::login_redirect(cx, request));
        }

        if cx.access.is_access_checked() {
            return Ok(NavigationAction::Continue);
        }

        let user_info = match cx.access.user_info() {
            Some(info) => info.clone(),
            None => {
                let info = self.provider.fetch_user_info()?;
                cx.access.set_user_info(Some(info.clone()));
                info
            }
        };

        let accessible = generate_accessible(
            cx.config.access_mode,
            &user_info.roles,
            &self.access_routes,
            &mut self.provider,
        )?;
        cx.access.set_access_menus(accessible.menus);
        cx.access.set_access_routes(accessible.routes);
        cx.access.set_access_checked(true);

        let from_redirect = request
            .from
            .as_ref()
            .and_then(|from| from.query.get("redirect"))
            .map(str::to_string);
        let target = from_redirect.unwrap_or_else(|| {
            if request.to.path == cx.config.default_home_path {
                user_info
                    .home_path
                    .clone()
                    .unwrap_or_else(|| cx.config.default_home_path.clone())
            } else {
                request.to.full_path()
            }
        });

        info_log!("Access checked for '{}', continuing to '{}'", user_info.username, target);
        Ok(NavigationAction::redirect_with_reason(target, "Access routes generated"))
    }

    fn name(&self) -> &'static str {
        "AccessGuard"
    }

    fn priority(&self) -> i32 {
        100
    }
}

#[cfg(feature = "guard")]
impl<P> std::fmt::Debug for AccessGuard<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGuard")
            .field("access_routes", &self.access_routes.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
