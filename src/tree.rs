//! Generic lookups over route and menu trees.
//!
//! Every tree in this crate (the [`RouteNode`](crate::route::RouteNode)
//! table, the derived [`MenuItem`](crate::menu::MenuItem) menu) implements
//! [`TreeNode`], so one depth-first search serves menu highlighting,
//! breadcrumb ancestry and "is this path authorized" checks.
//!
//! The search is iterative with an explicit frame stack. Nodes nested deeper
//! than [`MAX_TREE_DEPTH`] are never visited, so a pathological table cannot
//! exhaust the stack or loop for long.
//!
//! # Example
//!
//! ```
//! use console_navigator::route::RouteNode;
//! use console_navigator::tree::find_path;
//!
//! let tree = vec![RouteNode::new("/a", "A").child(RouteNode::new("/a/1", "A1"))];
//! assert_eq!(
//!     find_path("/a/1", &tree),
//!     Some(vec!["/a".to_string(), "/a/1".to_string()])
//! );
//! assert_eq!(find_path("/missing", &tree), None);
//! ```

/// Maximum depth explored by the tree walkers (root level is depth 1).
pub const MAX_TREE_DEPTH: usize = 32;

/// A node in a keyed tree.
pub trait TreeNode: Sized {
    /// Key compared against lookup targets (the route path).
    fn key(&self) -> &str;

    /// Child nodes, empty for leaves.
    fn children(&self) -> &[Self];
}

/// Find the chain of nodes from a root sibling down to the first node whose
/// key equals `target` (pre-order).
pub fn find_chain<'a, T: TreeNode>(target: &str, tree: &'a [T]) -> Option<Vec<&'a T>> {
    // frames.len() == chain.len() + 1 at the top of every iteration
    let mut frames: Vec<(&'a [T], usize)> = vec![(tree, 0)];
    let mut chain: Vec<&'a T> = Vec::new();

    loop {
        let frame = frames.last_mut()?;
        let siblings = frame.0;

        if frame.1 >= siblings.len() {
            frames.pop();
            chain.pop();
            continue;
        }

        let node = &siblings[frame.1];
        frame.1 += 1;

        if node.key() == target {
            chain.push(node);
            return Some(chain);
        }

        let children = node.children();
        if !children.is_empty() && chain.len() + 1 < MAX_TREE_DEPTH {
            chain.push(node);
            frames.push((children, 0));
        }
    }
}

/// Keys from a root sibling down to the node matching `target`, or `None`.
///
/// The last element always equals `target`.
pub fn find_path<T: TreeNode>(target: &str, tree: &[T]) -> Option<Vec<String>> {
    find_chain(target, tree).map(|chain| chain.iter().map(|n| n.key().to_string()).collect())
}

/// First node (pre-order) whose key equals `target`.
pub fn find_node<'a, T: TreeNode>(target: &str, tree: &'a [T]) -> Option<&'a T> {
    find_chain(target, tree).and_then(|chain| chain.last().copied())
}

/// Whether any node in the tree has key `target`.
pub fn contains_key<T: TreeNode>(target: &str, tree: &[T]) -> bool {
    find_chain(target, tree).is_some()
}

/// Key of the parent of the node matching `target`.
///
/// Top-level nodes report their own key. `"/"` and absent targets yield
/// `None`.
pub fn find_parent_key<T: TreeNode>(target: &str, tree: &[T]) -> Option<String> {
    if target == "/" {
        return None;
    }
    let chain = find_chain(target, tree)?;
    let parent = if chain.len() >= 2 {
        chain[chain.len() - 2]
    } else {
        chain[0]
    };
    Some(parent.key().to_string())
}

/// Visit every node in pre-order together with its depth (roots are 1).
pub fn walk<'a, T: TreeNode>(tree: &'a [T], visitor: &mut dyn FnMut(&'a T, usize)) {
    let mut stack: Vec<(&'a T, usize)> = tree.iter().rev().map(|n| (n, 1)).collect();

    while let Some((node, depth)) = stack.pop() {
        visitor(node, depth);
        if depth < MAX_TREE_DEPTH {
            stack.extend(node.children().iter().rev().map(|c| (c, depth + 1)));
        }
    }
}
