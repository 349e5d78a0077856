//! Read-only invariant validation for diagnostics and tests.
//!
//! Nothing here mutates the tree or returns an error: each validator
//! reports the first violation it finds through `diagnostics` and
//! answers `false`. The transactional API never calls into this
//! module on its own.

use diagnostics::log_error;

use crate::flavor::Flavor;
use crate::node::NodeRef;
use crate::path::TreePath;

/// Whether `node` is internally consistent: its path re-parses to
/// itself, its parent (when present) addresses the immediate
/// ancestor, and it owns no children if it is a file.
pub fn node_is_valid(node: &NodeRef) -> bool {
    match TreePath::parse(node.path().as_str()) {
        Ok(reparsed) if reparsed == *node.path() => {}
        _ => {
            log_error!("node path does not re-parse: {path}", path: node.path().as_str());
            return false;
        }
    }
    if let Some(parent) = node.parent() {
        if !parent.path().is_parent_of(node.path()) {
            log_error!(
                "parent {parent} is not the immediate ancestor of {path}",
                parent: parent.path().as_str(),
                path: node.path().as_str()
            );
            return false;
        }
    }
    if node.is_file() && node.child_count() > 0 {
        log_error!("file node {path} owns children", path: node.path().as_str());
        return false;
    }
    true
}

/// Whether the whole structure is in a valid state, given the
/// caller's view of the initialized flag, root, and node count.
///
/// An uninitialized tree must have no root. An initialized tree may
/// be empty; when a root exists it must be parentless, every
/// reachable node must satisfy [`node_is_valid`], every child
/// collection must respect the flavor's arity bound and sibling
/// order with no duplicate paths, and the reachable total must equal
/// `count`.
pub fn tree_is_valid(
    flavor: Flavor,
    initialized: bool,
    root: Option<&NodeRef>,
    count: usize,
) -> bool {
    if !initialized {
        if root.is_some() {
            log_error!("uninitialized tree holds a root");
            return false;
        }
        return true;
    }
    let Some(root) = root else {
        if count != 0 {
            log_error!("empty tree reports {count} nodes");
            return false;
        }
        return true;
    };
    if root.parent().is_some() {
        log_error!("root {path} has a parent", path: root.path().as_str());
        return false;
    }
    let mut reachable = 0;
    if !subtree_is_valid(flavor, root, &mut reachable) {
        return false;
    }
    if reachable != count {
        log_error!("tree reports {count} nodes but {reachable} are reachable");
        return false;
    }
    true
}

fn subtree_is_valid(flavor: Flavor, node: &NodeRef, reachable: &mut usize) -> bool {
    if !node_is_valid(node) {
        return false;
    }
    if node.is_file() && !flavor.allows_files() {
        log_error!("file node {path} in a directories-only flavor", path: node.path().as_str());
        return false;
    }
    *reachable += 1;

    let children = node.children();
    if let Some(max) = flavor.max_children() {
        if children.len() > max {
            log_error!(
                "node {path} exceeds the arity bound with {found} children",
                path: node.path().as_str(),
                found: children.len()
            );
            return false;
        }
    }
    for pair in children.windows(2) {
        // duplicate sibling paths are illegal in every flavor; sorted
        // flavors additionally require strictly increasing order
        if pair[0].path() == pair[1].path() {
            log_error!("duplicate sibling path {path}", path: pair[0].path().as_str());
            return false;
        }
        if flavor.keeps_sorted() && sibling_key(&pair[0]) >= sibling_key(&pair[1]) {
            log_error!(
                "children of {path} out of order: {left} before {right}",
                path: node.path().as_str(),
                left: pair[0].path().as_str(),
                right: pair[1].path().as_str()
            );
            return false;
        }
    }
    for child in &children {
        match child.parent() {
            Some(parent) if parent.same_node(node) => {}
            _ => {
                log_error!(
                    "child {path} does not point back at its owner",
                    path: child.path().as_str()
                );
                return false;
            }
        }
        if !subtree_is_valid(flavor, child, reachable) {
            return false;
        }
    }
    true
}

/// Sibling sort key: files rank before directories, lexicographic
/// within a kind. For the directories-only flavor this degenerates to
/// plain path order.
fn sibling_key(node: &NodeRef) -> (u8, &str) {
    (node.kind().rank(), node.path().as_str())
}
