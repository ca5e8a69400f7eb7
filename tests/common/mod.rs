//! Test utilities for the integration tests
//!
//! Provides route fixtures shaped like a small blog console, a scripted
//! access provider, and logger setup.

#![allow(dead_code)]

use console_navigator::*;
use std::cell::Cell;
use std::rc::Rc;

/// Route the logger through `env_logger` once per test binary.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Routes every session sees: root redirect, login, error pages.
pub fn core_routes() -> Vec<RouteNode> {
    vec![
        RouteNode::new("/", "Root").redirect("/home").hidden(),
        RouteNode::new("/login", "login").title("Login").hidden(),
        RouteNode::new("/forbidden", "forbidden").hidden(),
        RouteNode::new("/about", "About").title("About").ignore_access().order(99),
        RouteNode::new("/*", "not-found").title("Not Found").hidden(),
    ]
}

/// Routes derived per user.
pub fn blog_routes() -> Vec<RouteNode> {
    vec![
        RouteNode::new("/home", "Home")
            .title("Home")
            .component("home")
            .fixed_in_tab(0)
            .order(0),
        RouteNode::new("/blog/aaa", "Aaa")
            .title("aaa")
            .icon("blog-menu-vue")
            .component("aaa"),
        RouteNode::new("/blog/bbb", "Bbb").title("bbb").children(vec![
            RouteNode::new("/blog/bbb/bbb1", "Bbb1")
                .title("bbb1")
                .component("bbb1")
                .keep_alive(),
            RouteNode::new("/blog/bbb/bbb2", "Bbb2")
                .title("bbb2")
                .component("bbb2"),
            RouteNode::new("/blog/bbb/bbb2/:id", "Bbb2Detail")
                .title("bbb2 detail")
                .component("bbb2-detail")
                .active_menu("/blog/bbb/bbb2")
                .hidden(),
        ]),
        RouteNode::new("/blog/ddd", "Ddd")
            .title("embedded")
            .iframe("https://element-plus.org/zh-CN/component/menu.html")
            .order(1),
        RouteNode::new("/blog/docs", "Docs")
            .title("docs")
            .external("https://vuejs.org"),
        RouteNode::new("/admin", "Admin")
            .title("admin")
            .authority(["admin"])
            .children(vec![RouteNode::new("/admin/users", "AdminUsers")
                .title("users")
                .component("admin-users")]),
    ]
}

/// Access provider that returns a fixed user and counts its calls.
#[derive(Clone)]
pub struct ScriptedProvider {
    pub roles: Vec<String>,
    pub home_path: Option<String>,
    pub fail: bool,
    pub user_calls: Rc<Cell<usize>>,
}

impl ScriptedProvider {
    pub fn new(roles: &[&str]) -> Self {
        Self {
            roles: roles.iter().map(|r| (*r).to_string()).collect(),
            home_path: None,
            fail: false,
            user_calls: Rc::new(Cell::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(&[])
        }
    }
}

impl AccessProvider for ScriptedProvider {
    fn fetch_user_info(&mut self) -> Result<UserInfo, NavigationError> {
        self.user_calls.set(self.user_calls.get() + 1);
        if self.fail {
            return Err(NavigationError::access_fetch("user service unavailable"));
        }
        Ok(UserInfo {
            user_id: "1".into(),
            username: "vben".into(),
            real_name: "Vben".into(),
            roles: self.roles.clone(),
            home_path: self.home_path.clone(),
        })
    }

    fn fetch_all_menus(&mut self) -> Result<Vec<RouteNode>, NavigationError> {
        Ok(blog_routes())
    }
}

/// A shell over [`core_routes`] with the access guard, common guard and
/// title middleware installed.
pub fn console_shell(provider: ScriptedProvider) -> Shell {
    Shell::new(ShellConfig::default(), core_routes())
        .expect("core routes are valid")
        .with_guard(access::AccessGuard::new(provider, blog_routes()))
        .with_middleware(CommonGuard::default())
        .with_middleware(DocumentTitle::new().app_name("Console"))
}

/// Sign in and land on the home page.
pub fn signed_in_shell(roles: &[&str]) -> Shell {
    let mut shell = console_shell(ScriptedProvider::new(roles));
    shell.access_mut().set_access_token(Some("token".into()));
    let result = shell.push("/home");
    assert!(result.is_success(), "sign-in navigation failed: {result:?}");
    shell
}

pub fn tab_paths(tabs: &TabStore) -> Vec<String> {
    tabs.tabs().iter().map(|tab| tab.path.clone()).collect()
}
