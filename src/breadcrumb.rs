//! Breadcrumb projection of the menu tree.

use crate::menu::MenuItem;
use crate::route::RouteMeta;
use crate::tree;
use serde::{Deserialize, Serialize};

/// A menu item without children, plus the children as sibling `options`
/// (rendered as a drop-down on the crumb).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breadcrumb {
    pub path: String,
    pub name: String,
    pub meta: RouteMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<Breadcrumb>>,
}

impl From<&MenuItem> for Breadcrumb {
    fn from(menu: &MenuItem) -> Self {
        let options = menu
            .children
            .as_ref()
            .filter(|children| !children.is_empty())
            .map(|children| children.iter().map(Breadcrumb::from).collect());

        Self {
            path: menu.path.clone(),
            name: menu.name.clone(),
            meta: menu.meta.clone(),
            options,
        }
    }
}

/// Root-to-leaf breadcrumbs for `current_path`; empty when no menu item
/// has that path.
pub fn breadcrumbs_for(current_path: &str, menus: &[MenuItem]) -> Vec<Breadcrumb> {
    tree::find_chain(current_path, menus)
        .map(|chain| chain.into_iter().map(Breadcrumb::from).collect())
        .unwrap_or_default()
}
