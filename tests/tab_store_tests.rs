//! Integration tests for the tab strip driven by a real shell.

mod common;

use common::*;
use console_navigator::storage::{FileStorage, MemoryStorage};
use console_navigator::*;

fn home_tab() -> Tab {
    Tab::new("/home", "Home")
}

/// Navigate and open the tab for wherever the shell ended up.
fn visit(shell: &mut Shell, tabs: &mut TabStore, path: &str) {
    let result = shell.push(path);
    assert!(result.is_success(), "navigation to {path} failed: {result:?}");
    let route = shell.current_route().cloned().expect("resolved route");
    let full_path = shell.current_full_path().to_string();
    tabs.add_tab(&route, &full_path, true);
}

#[test]
fn test_closing_active_tab_switches_to_last_tab() {
    init_logger();
    let mut shell = signed_in_shell(&[]);
    let mut tabs = TabStore::new(home_tab());
    visit(&mut shell, &mut tabs, "/blog/aaa");
    visit(&mut shell, &mut tabs, "/blog/bbb/bbb1");

    let result = tabs.remove_tab("/blog/bbb/bbb1", &mut shell).unwrap();

    assert!(result.is_success());
    assert_eq!(shell.current_full_path(), "/blog/aaa");
    assert_eq!(tab_paths(&tabs), vec!["/home", "/blog/aaa"]);
    assert_eq!(tabs.active_path(), "/blog/aaa");
}

#[test]
fn test_active_tab_always_exists_after_removal() {
    let mut shell = signed_in_shell(&[]);
    let mut tabs = TabStore::new(home_tab());
    for path in ["/blog/aaa", "/blog/bbb/bbb1", "/blog/bbb/bbb2"] {
        visit(&mut shell, &mut tabs, path);
    }

    while tabs.len() > 1 {
        tabs.remove_active_tab(&mut shell);
        assert!(tabs.find(tabs.active_path()).is_some());
    }
    assert_eq!(tabs.active_path(), "/home");
    assert_eq!(shell.current_full_path(), "/home");
}

#[test]
fn test_detail_pages_get_one_tab_per_id() {
    let mut shell = signed_in_shell(&[]);
    let mut tabs = TabStore::new(home_tab());
    visit(&mut shell, &mut tabs, "/blog/bbb/bbb2/1?view=full");
    visit(&mut shell, &mut tabs, "/blog/bbb/bbb2/2");
    visit(&mut shell, &mut tabs, "/blog/bbb/bbb2/1");

    assert_eq!(
        tab_paths(&tabs),
        vec!["/home", "/blog/bbb/bbb2/1", "/blog/bbb/bbb2/2"]
    );
    let tab = tabs.find("/blog/bbb/bbb2/1").unwrap();
    assert_eq!(tab.full_path, "/blog/bbb/bbb2/1?view=full");
    assert_eq!(tab.route_name.as_deref(), Some("Bbb2Detail"));
    assert_eq!(tabs.active_path(), "/blog/bbb/bbb2/1");
}

#[test]
fn test_clear_keeps_pinned_tabs() {
    let mut shell = signed_in_shell(&[]);
    let mut tabs = TabStore::new(Tab::new("/dashboard", "Dashboard"));
    visit(&mut shell, &mut tabs, "/home");
    visit(&mut shell, &mut tabs, "/blog/aaa");
    visit(&mut shell, &mut tabs, "/blog/ddd");

    tabs.clear_tabs(&[], &mut shell);

    assert_eq!(tab_paths(&tabs), vec!["/dashboard", "/home"]);
    assert_eq!(tabs.active_path(), "/home");
    assert_eq!(shell.current_full_path(), "/home");
    assert!(tabs.is_tab_retain("/home"));
}

#[test]
fn test_clear_right_of_middle_tab() {
    let mut shell = signed_in_shell(&[]);
    let mut tabs = TabStore::new(home_tab());
    for path in ["/blog/aaa", "/blog/bbb/bbb1", "/blog/bbb/bbb2"] {
        visit(&mut shell, &mut tabs, path);
    }

    tabs.clear_right_tabs("/blog/aaa", &mut shell);

    assert_eq!(tab_paths(&tabs), vec!["/home", "/blog/aaa"]);
    assert_eq!(shell.current_full_path(), "/blog/aaa");
}

#[test]
fn test_switch_redirected_by_guard_still_closes_tab() {
    let mut shell = console_shell(ScriptedProvider::new(&[]));
    let mut tabs = TabStore::new(home_tab());
    // Signed out: anything but login and public pages bounces to login.
    tabs.add_tab(&RouteNode::new("/blog/aaa", "Aaa"), "/blog/aaa", false);
    visit(&mut shell, &mut tabs, "/about");

    let result = tabs.remove_tab("/about", &mut shell).unwrap();

    // The fallback navigation was redirected to login; that still counts
    // as a completed switch.
    assert_eq!(result.path(), Some("/login?redirect=%2Fblog%2Faaa"));
    assert_eq!(tabs.active_path(), "/blog/aaa");
    assert_eq!(tab_paths(&tabs), vec!["/home", "/blog/aaa"]);
}

#[test]
fn test_tabs_survive_a_reload() {
    let routes = blog_routes();
    let mut storage = LocalStorage::new(MemoryStorage::new());

    let mut shell = signed_in_shell(&[]);
    let mut tabs = TabStore::new(home_tab());
    visit(&mut shell, &mut tabs, "/blog/aaa");
    visit(&mut shell, &mut tabs, "/blog/bbb/bbb1");
    tabs.set_tab_label("Draft", Some("/blog/aaa"));
    tabs.cache_tabs(&mut storage).unwrap();

    // Next session: one route was removed from the table meanwhile.
    let remaining: Vec<RouteNode> = routes.into_iter().filter(|r| r.name != "Aaa").collect();
    let bbb2 = RouteNode::new("/blog/bbb/bbb2", "Bbb2").title("bbb2");
    let mut restored = TabStore::new(home_tab());
    restored
        .init(&bbb2, "/blog/bbb/bbb2", &remaining, &storage)
        .unwrap();

    assert_eq!(
        tab_paths(&restored),
        vec!["/home", "/blog/bbb/bbb1", "/blog/bbb/bbb2"]
    );
    assert_eq!(restored.active_path(), "/blog/bbb/bbb2");
}

#[test]
fn test_tabs_persist_to_file() {
    let path = std::env::temp_dir().join(format!(
        "console-navigator-tabs-{}.json",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    {
        let mut storage = LocalStorage::new(FileStorage::open(&path).unwrap());
        let mut tabs = TabStore::new(home_tab());
        tabs.add_tab(&RouteNode::new("/blog/aaa", "Aaa"), "/blog/aaa?x=1", true);
        tabs.cache_tabs(&mut storage).unwrap();
    }

    let storage = LocalStorage::new(FileStorage::open(&path).unwrap());
    let stored: Vec<Tab> = storage.get(StorageKey::GlobalTabs).unwrap().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].full_path, "/blog/aaa?x=1");

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_config_switches_tab_persistence() {
    let route = RouteNode::new("/blog/aaa", "Aaa");
    let mut storage = LocalStorage::new(MemoryStorage::new());

    let config = ShellConfig::default().cache_tabs(false);
    let mut tabs = TabStore::from_config(home_tab(), &config);
    tabs.add_tab(&route, "/blog/aaa", true);
    tabs.cache_tabs(&mut storage).unwrap();
    assert!(storage.get::<Vec<Tab>>(StorageKey::GlobalTabs).unwrap().is_none());

    let mut tabs = TabStore::from_config(home_tab(), &ShellConfig::default());
    tabs.add_tab(&route, "/blog/aaa", true);
    tabs.cache_tabs(&mut storage).unwrap();
    let stored: Vec<Tab> = storage.get(StorageKey::GlobalTabs).unwrap().unwrap();
    assert_eq!(stored.len(), 1);
}
