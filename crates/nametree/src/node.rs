use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::{Error, Result};
use crate::flavor::Flavor;
use crate::path::TreePath;

/// The two node kinds of the filesystem flavor. Trees of the other
/// flavors hold directories only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Directory,
    File,
}

impl NodeKind {
    /// Sort rank within one level: files come before directories.
    pub(crate) fn rank(self) -> u8 {
        match self {
            NodeKind::File => 0,
            NodeKind::Directory => 1,
        }
    }
}

/// One entry in the tree. The path and kind are fixed at creation;
/// the child collection and file contents are the mutable parts.
struct Node {
    path: TreePath,
    kind: NodeKind,
    parent: Weak<Node>,
    children: RefCell<Vec<NodeRef>>,
    contents: RefCell<Option<Vec<u8>>>,
}

/// A refcounted handle to a node.
///
/// The tree owns its root through one of these and every node owns
/// its children the same way; parent links are weak, so the ownership
/// graph is acyclic and destroying a subtree's handle frees the whole
/// subtree. Nodes order by path.
#[derive(Clone)]
pub struct NodeRef(Rc<Node>);

impl NodeRef {
    /// Creates the node addressed by `path` under `parent`, linking it
    /// into the parent's child collection at the slot the flavor's
    /// sibling order dictates. A missing parent is only legal for a
    /// depth-1 path, which the caller installs as the root.
    ///
    /// Fails with:
    /// * `ConflictingPath` if `parent` is not an ancestor of `path` at
    ///   all, or already holds the flavor's maximum children
    /// * `NoSuchPath` if `parent` is an ancestor but not the immediate
    ///   one, or is absent while `path` is deeper than one level
    /// * `NotADirectory` if `parent` is a file
    /// * `AlreadyInTree` if `parent` already holds a child with an
    ///   equal path
    pub fn new(
        path: TreePath,
        parent: Option<&NodeRef>,
        kind: NodeKind,
        contents: Option<Vec<u8>>,
        flavor: Flavor,
    ) -> Result<NodeRef> {
        match parent {
            None => {
                if path.depth() != 1 {
                    return Err(Error::no_such_path(path.as_str()));
                }
            }
            Some(parent) => {
                let shared = parent.path().shared_prefix_depth(&path);
                if shared < parent.path().depth() {
                    return Err(Error::conflicting_path(path.as_str()));
                }
                if !parent.path().is_parent_of(&path) {
                    return Err(Error::no_such_path(path.as_str()));
                }
                if parent.is_file() {
                    return Err(Error::not_a_directory(parent.path().as_str()));
                }
                if parent.find_child(&path).is_some() {
                    return Err(Error::already_in_tree(path.as_str()));
                }
                if let Some(max) = flavor.max_children() {
                    if parent.child_count() >= max {
                        return Err(Error::conflicting_path(path.as_str()));
                    }
                }
            }
        }

        let node = NodeRef(Rc::new(Node {
            path,
            kind,
            parent: parent.map_or_else(Weak::new, |p| Rc::downgrade(&p.0)),
            children: RefCell::new(Vec::new()),
            contents: RefCell::new(contents),
        }));
        if let Some(parent) = parent {
            let (_, slot) = parent.locate_child(node.path(), kind, flavor);
            parent.0.children.borrow_mut().insert(slot, node.clone());
        }
        Ok(node)
    }

    /// The node's absolute path.
    pub fn path(&self) -> &TreePath {
        &self.0.path
    }

    pub fn kind(&self) -> NodeKind {
        self.0.kind
    }

    pub fn is_file(&self) -> bool {
        self.0.kind == NodeKind::File
    }

    /// The parent node, or `None` for a root. The link is weak: it
    /// never keeps a detached ancestor alive.
    pub fn parent(&self) -> Option<NodeRef> {
        self.0.parent.upgrade().map(NodeRef)
    }

    pub fn child_count(&self) -> usize {
        self.0.children.borrow().len()
    }

    /// The child at `slot`, or `NoSuchPath` if the slot is out of
    /// range.
    pub fn child(&self, slot: usize) -> Result<NodeRef> {
        self.0
            .children
            .borrow()
            .get(slot)
            .cloned()
            .ok_or_else(|| Error::no_such_path(self.path().as_str()))
    }

    /// A snapshot of the children in sibling order.
    pub fn children(&self) -> Vec<NodeRef> {
        self.0.children.borrow().clone()
    }

    /// Locates the child slot for `path` under the flavor's sibling
    /// order: a linear scan over at most two slots for the binary
    /// flavor, binary search otherwise. When no child matches, the
    /// returned slot is the insertion point that keeps the order.
    pub fn locate_child(&self, path: &TreePath, kind: NodeKind, flavor: Flavor) -> (bool, usize) {
        let children = self.0.children.borrow();
        match flavor {
            Flavor::Binary => {
                for (slot, child) in children.iter().enumerate() {
                    if child.path() == path {
                        return (true, slot);
                    }
                }
                (false, children.len())
            }
            Flavor::Directory => match children.binary_search_by(|child| child.path().cmp(path)) {
                Ok(slot) => (true, slot),
                Err(slot) => (false, slot),
            },
            Flavor::Filesystem => {
                let key = (kind.rank(), path.as_str());
                match children
                    .binary_search_by(|child| (child.kind().rank(), child.path().as_str()).cmp(&key))
                {
                    Ok(slot) => (true, slot),
                    Err(slot) => (false, slot),
                }
            }
        }
    }

    /// Membership probe by path alone, regardless of kind. A file and
    /// a directory may never share a path, so at most one child can
    /// match.
    pub fn find_child(&self, path: &TreePath) -> Option<NodeRef> {
        self.0
            .children
            .borrow()
            .iter()
            .find(|child| child.path() == path)
            .cloned()
    }

    /// Unlinks and returns the child at `slot`. Later siblings shift
    /// down one slot, which is exactly the binary flavor's promotion
    /// rule. Dropping the returned handle frees the subtree.
    pub fn detach_child(&self, slot: usize) -> Result<NodeRef> {
        let mut children = self.0.children.borrow_mut();
        if slot >= children.len() {
            return Err(Error::no_such_path(self.path().as_str()));
        }
        Ok(children.remove(slot))
    }

    /// Number of nodes in this subtree, itself included.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .0
            .children
            .borrow()
            .iter()
            .map(NodeRef::subtree_len)
            .sum::<usize>()
    }

    /// The file payload, cloned, or `None` when absent.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.0.contents.borrow().clone()
    }

    /// Byte length of the file payload; an absent payload has length
    /// zero.
    pub fn contents_len(&self) -> usize {
        self.0.contents.borrow().as_ref().map_or(0, Vec::len)
    }

    /// Swaps in a new payload, returning the previous one.
    pub fn replace_contents(&self, contents: Option<Vec<u8>>) -> Option<Vec<u8>> {
        self.0.contents.replace(contents)
    }

    /// Whether two handles address the same node.
    pub fn same_node(&self, other: &NodeRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.path() == other.path()
    }
}

impl Eq for NodeRef {}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> Ordering {
        self.path().cmp(other.path())
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.kind {
            NodeKind::Directory => write!(f, "{} (directory)", self.path()),
            NodeKind::File => write!(f, "{} (file)", self.path()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(text: &str) -> TreePath {
        TreePath::parse(text).unwrap()
    }

    fn dir(text: &str, parent: Option<&NodeRef>, flavor: Flavor) -> Result<NodeRef> {
        NodeRef::new(path(text), parent, NodeKind::Directory, None, flavor)
    }

    #[test]
    fn test_rootless_node_must_be_depth_one() {
        assert!(dir("a", None, Flavor::Directory).is_ok());
        assert_eq!(
            dir("a/b", None, Flavor::Directory),
            Err(Error::no_such_path("a/b"))
        );
    }

    #[test]
    fn test_parent_must_be_immediate_ancestor() {
        let root = dir("a", None, Flavor::Directory).unwrap();
        // not an ancestor at all
        assert_eq!(
            dir("x/y", Some(&root), Flavor::Directory),
            Err(Error::conflicting_path("x/y"))
        );
        // an ancestor, but not the immediate one
        assert_eq!(
            dir("a/b/c", Some(&root), Flavor::Directory),
            Err(Error::no_such_path("a/b/c"))
        );
        assert!(dir("a/b", Some(&root), Flavor::Directory).is_ok());
    }

    #[test]
    fn test_duplicate_child_rejected() {
        let root = dir("a", None, Flavor::Directory).unwrap();
        let _b = dir("a/b", Some(&root), Flavor::Directory).unwrap();
        assert_eq!(
            dir("a/b", Some(&root), Flavor::Directory),
            Err(Error::already_in_tree("a/b"))
        );
    }

    #[test]
    fn test_binary_arity_bound() {
        let root = dir("a", None, Flavor::Binary).unwrap();
        dir("a/one", Some(&root), Flavor::Binary).unwrap();
        dir("a/two", Some(&root), Flavor::Binary).unwrap();
        assert_eq!(
            dir("a/three", Some(&root), Flavor::Binary),
            Err(Error::conflicting_path("a/three"))
        );
        assert_eq!(root.child_count(), 2);
    }

    #[test]
    fn test_file_parent_rejected() {
        let root = dir("a", None, Flavor::Filesystem).unwrap();
        let file = NodeRef::new(
            path("a/f"),
            Some(&root),
            NodeKind::File,
            Some(b"data".to_vec()),
            Flavor::Filesystem,
        )
        .unwrap();
        assert_eq!(
            dir("a/f/under", Some(&file), Flavor::Filesystem),
            Err(Error::not_a_directory("a/f"))
        );
    }

    #[test]
    fn test_sorted_insertion_order() {
        let root = dir("a", None, Flavor::Directory).unwrap();
        dir("a/y", Some(&root), Flavor::Directory).unwrap();
        dir("a/x", Some(&root), Flavor::Directory).unwrap();
        dir("a/z", Some(&root), Flavor::Directory).unwrap();
        let names: Vec<String> = root
            .children()
            .iter()
            .map(|child| child.path().as_str().to_string())
            .collect();
        assert_eq!(names, ["a/x", "a/y", "a/z"]);
    }

    #[test]
    fn test_files_sort_before_directories() {
        let root = dir("a", None, Flavor::Filesystem).unwrap();
        dir("a/b", Some(&root), Flavor::Filesystem).unwrap();
        NodeRef::new(
            path("a/z"),
            Some(&root),
            NodeKind::File,
            None,
            Flavor::Filesystem,
        )
        .unwrap();
        let names: Vec<String> = root
            .children()
            .iter()
            .map(|child| child.path().as_str().to_string())
            .collect();
        // the file "a/z" outranks the directory "a/b"
        assert_eq!(names, ["a/z", "a/b"]);
    }

    #[test]
    fn test_binary_children_keep_insertion_order() {
        let root = dir("a", None, Flavor::Binary).unwrap();
        dir("a/y", Some(&root), Flavor::Binary).unwrap();
        dir("a/x", Some(&root), Flavor::Binary).unwrap();
        let names: Vec<String> = root
            .children()
            .iter()
            .map(|child| child.path().as_str().to_string())
            .collect();
        assert_eq!(names, ["a/y", "a/x"]);

        // removal promotes the second child into the first slot
        root.detach_child(0).unwrap();
        assert_eq!(root.child(0).unwrap().path().as_str(), "a/x");
    }

    #[test]
    fn test_locate_child_reports_insertion_point() {
        let root = dir("a", None, Flavor::Directory).unwrap();
        dir("a/b", Some(&root), Flavor::Directory).unwrap();
        dir("a/d", Some(&root), Flavor::Directory).unwrap();
        let (found, slot) = root.locate_child(&path("a/c"), NodeKind::Directory, Flavor::Directory);
        assert!(!found);
        assert_eq!(slot, 1);
        let (found, slot) = root.locate_child(&path("a/d"), NodeKind::Directory, Flavor::Directory);
        assert!(found);
        assert_eq!(slot, 1);
    }

    #[test]
    fn test_parent_link_and_subtree_len() {
        let root = dir("a", None, Flavor::Directory).unwrap();
        let child = dir("a/b", Some(&root), Flavor::Directory).unwrap();
        let _gkid = dir("a/b/c", Some(&child), Flavor::Directory).unwrap();
        assert!(root.parent().is_none());
        assert!(child.parent().unwrap().same_node(&root));
        assert_eq!(root.subtree_len(), 3);
        assert_eq!(child.subtree_len(), 2);
    }

    #[test]
    fn test_child_slot_out_of_range() {
        let root = dir("a", None, Flavor::Directory).unwrap();
        assert_eq!(root.child(0), Err(Error::no_such_path("a")));
    }
}
