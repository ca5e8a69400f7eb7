//! Integration tests for the navigation pipeline with the access guard,
//! common guard and document title installed.

mod common;

use common::*;
use console_navigator::*;

#[test]
fn test_unauthenticated_user_is_sent_to_login() {
    init_logger();
    let mut shell = console_shell(ScriptedProvider::new(&[]));

    let result = shell.push("/blog/aaa?from=mail");

    assert_eq!(
        result.path(),
        Some("/login?redirect=%2Fblog%2Faaa%3Ffrom%3Dmail")
    );
    assert_eq!(shell.current_route().unwrap().name, "login");
    assert_eq!(shell.context().document_title.as_deref(), Some("Login - Console"));
}

#[test]
fn test_default_home_redirects_to_bare_login() {
    let mut shell = console_shell(ScriptedProvider::new(&[]));
    assert_eq!(shell.push("/").path(), Some("/login"));
}

#[test]
fn test_ignore_access_route_without_token() {
    let mut shell = console_shell(ScriptedProvider::new(&[]));
    assert_eq!(shell.push("/about").path(), Some("/about"));
}

#[test]
fn test_sign_in_generates_access_and_replays_target() {
    init_logger();
    let provider = ScriptedProvider::new(&["admin"]);
    let calls = provider.user_calls.clone();
    let mut shell = console_shell(provider);
    shell.access_mut().set_access_token(Some("token".into()));

    let result = shell.push("/admin/users");

    assert_eq!(result.path(), Some("/admin/users"));
    assert_eq!(shell.current_route().unwrap().name, "AdminUsers");
    assert!(shell.access().is_access_checked());
    assert_eq!(calls.get(), 1);

    // Later navigations use the cached access state.
    assert!(shell.push("/blog/aaa").is_success());
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_roles_limit_accessible_routes() {
    let mut shell = signed_in_shell(&["editor"]);

    shell.push("/admin/users");

    assert_eq!(shell.current_route().unwrap().name, "not-found");
    let menus = shell.access().access_menus();
    assert!(menus.iter().all(|menu| menu.path != "/admin"));
}

#[test]
fn test_login_redirect_round_trip() {
    let mut shell = console_shell(ScriptedProvider::new(&[]));
    shell.push("/blog/bbb/bbb1");
    assert_eq!(shell.current_location().path, "/login");

    // The host signs the user in and re-opens the login route.
    shell.access_mut().set_access_token(Some("token".into()));
    let target = shell.current_full_path().to_string();
    let result = shell.replace(&target);

    assert_eq!(result.path(), Some("/blog/bbb/bbb1"));
    assert_eq!(shell.current_route().unwrap().name, "Bbb1");
}

#[test]
fn test_user_home_path_wins_over_default_home() {
    let mut provider = ScriptedProvider::new(&[]);
    provider.home_path = Some("/blog/aaa".into());
    let mut shell = console_shell(provider);
    shell.access_mut().set_access_token(Some("token".into()));

    assert_eq!(shell.push("/home").path(), Some("/blog/aaa"));
}

#[test]
fn test_fetch_failure_surfaces_to_caller() {
    let mut shell = console_shell(ScriptedProvider::failing());
    shell.access_mut().set_access_token(Some("token".into()));

    let result = shell.push("/blog/aaa");

    assert_eq!(
        result,
        NavigationResult::Error(NavigationError::access_fetch("user service unavailable"))
    );
    assert_eq!(shell.current_full_path(), "/");
    assert!(!shell.access().is_access_checked());
}

#[test]
fn test_signed_in_user_skips_login_page() {
    let mut shell = signed_in_shell(&[]);
    assert_eq!(shell.push("/login").path(), Some("/home"));
    assert_eq!(
        shell.push("/login?redirect=%2Fblog%2Faaa").path(),
        Some("/blog/aaa")
    );
}

#[test]
fn test_sign_out_keeps_target() {
    let mut shell = signed_in_shell(&[]);
    shell.push("/blog/aaa");

    let result = shell.sign_out(true);

    assert_eq!(result.path(), Some("/login?redirect=%2Fblog%2Faaa"));
    assert!(shell.access().access_token().is_none());
    assert!(shell.access().access_routes().is_empty());
    assert!(shell.routes().iter().all(|route| route.name != "Aaa"));
}

#[test]
fn test_open_menu_handles_links_and_queries() {
    let mut shell = signed_in_shell(&[]);

    assert_eq!(
        shell.open_menu("/blog/docs"),
        NavigationResult::External {
            url: "https://vuejs.org".into()
        }
    );
    assert_eq!(shell.current_full_path(), "/home");

    assert_eq!(shell.open_menu("/blog/ddd").path(), Some("/blog/ddd"));
    assert!(shell.open_menu("/not/in/menu").is_not_found());
}

#[test]
fn test_document_title_follows_route() {
    let mut shell = signed_in_shell(&[]);
    shell.push("/blog/bbb/bbb2/9");
    assert_eq!(
        shell.context().document_title.as_deref(),
        Some("bbb2 detail - Console")
    );
    assert_eq!(shell.current_params().unwrap().get("id").map(String::as_str), Some("9"));
}

#[test]
fn test_history_after_redirects() {
    let mut shell = signed_in_shell(&[]);
    shell.push("/blog/aaa");
    shell.push("/blog/bbb/bbb1");

    assert_eq!(shell.back().unwrap().path(), Some("/blog/aaa"));
    assert!(shell.can_go_forward());
    assert_eq!(shell.forward().unwrap().path(), Some("/blog/bbb/bbb1"));
}
