use diagnostics::{log_debug, log_info};

use crate::check;
use crate::error::{Error, Result};
use crate::flavor::Flavor;
use crate::node::{NodeKind, NodeRef};
use crate::path::TreePath;

/// Result of a successful `Tree::stat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stat {
    pub is_file: bool,
    /// Payload length for files; `None` for directories.
    pub size: Option<usize>,
}

/// A hierarchical namespace of slash-delimited absolute paths.
///
/// A `Tree` is an explicit handle: callers construct as many
/// independent trees as they like and pick a [`Flavor`] per tree. Each
/// tree starts uninitialized; [`Tree::init`] makes it an empty
/// initialized tree and [`Tree::destroy`] tears the node graph back
/// down. Both reject being called twice in a row, and every other
/// operation fails with [`Error::Initialization`] while the tree is
/// uninitialized (`contains*` report `false` instead).
///
/// The tree is single-threaded and synchronous: no operation blocks,
/// and every call runs to completion before returning.
pub struct Tree {
    flavor: Flavor,
    state: Option<State>,
}

struct State {
    root: Option<NodeRef>,
    count: usize,
}

impl Tree {
    /// A new, uninitialized tree of the given flavor.
    pub fn new(flavor: Flavor) -> Self {
        Tree {
            flavor,
            state: None,
        }
    }

    /// A tree capped at two children per node, in insertion order.
    pub fn binary() -> Self {
        Tree::new(Flavor::Binary)
    }

    /// A tree of directories in lexicographic sibling order.
    pub fn directory() -> Self {
        Tree::new(Flavor::Directory)
    }

    /// A tree of directories and leaf files.
    pub fn filesystem() -> Self {
        Tree::new(Flavor::Filesystem)
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Number of live nodes; zero while uninitialized.
    pub fn count(&self) -> usize {
        self.state.as_ref().map_or(0, |state| state.count)
    }

    /// Transitions Uninitialized -> Initialized with an empty
    /// namespace. Double initialization is an error, not a no-op.
    pub fn init(&mut self) -> Result<()> {
        if self.state.is_some() {
            return Err(Error::Initialization);
        }
        self.state = Some(State {
            root: None,
            count: 0,
        });
        log_info!("tree initialized");
        Ok(())
    }

    /// Frees the whole node graph and returns to Uninitialized.
    /// Destroying an uninitialized tree is an error, not a no-op.
    pub fn destroy(&mut self) -> Result<()> {
        let state = self.state.take().ok_or(Error::Initialization)?;
        let freed = state.count;
        // dropping the root handle frees the entire subtree
        drop(state);
        log_info!("tree destroyed, freed {freed} nodes");
        Ok(())
    }

    /// Inserts a directory at `path`, creating any missing ancestors
    /// along the way.
    pub fn insert_dir(&mut self, path: &str) -> Result<()> {
        self.insert(path, NodeKind::Directory, None)
    }

    /// Inserts a file at `path` with the given payload, creating any
    /// missing ancestor directories. Only the filesystem flavor holds
    /// files, and a file may not be the tree's root; either violation
    /// is a `ConflictingPath`.
    pub fn insert_file(&mut self, path: &str, contents: Option<Vec<u8>>) -> Result<()> {
        self.insert(path, NodeKind::File, contents)
    }

    fn insert(&mut self, text: &str, kind: NodeKind, contents: Option<Vec<u8>>) -> Result<()> {
        if self.state.is_none() {
            return Err(Error::Initialization);
        }
        let path = TreePath::parse(text)?;
        if kind == NodeKind::File && (!self.flavor.allows_files() || path.depth() == 1) {
            // files exist only in the filesystem flavor, and a file
            // cannot be the root
            return Err(Error::conflicting_path(text));
        }

        // Every failure is detected before the first node is created,
        // so a rejected insert leaves the tree untouched.
        let anchor = self.descend(&path)?;
        if let Some(anchor) = &anchor {
            if anchor.path().depth() == path.depth() {
                return Err(Error::already_in_tree(text));
            }
            if anchor.is_file() {
                return Err(Error::not_a_directory(anchor.path().as_str()));
            }
            if let Some(max) = self.flavor.max_children() {
                if anchor.child_count() >= max {
                    return Err(Error::conflicting_path(text));
                }
            }
        }

        let start = anchor.as_ref().map_or(1, |node| node.path().depth() + 1);
        let mut contents = contents;
        let mut parent = anchor;
        let mut new_root = None;
        let mut created = 0;
        for level in start..=path.depth() {
            let (node_kind, node_contents) = if level == path.depth() {
                (kind, contents.take())
            } else {
                (NodeKind::Directory, None)
            };
            let node = NodeRef::new(
                path.prefix(level)?,
                parent.as_ref(),
                node_kind,
                node_contents,
                self.flavor,
            )?;
            if level == 1 {
                new_root = Some(node.clone());
            }
            created += 1;
            parent = Some(node);
        }

        let state = self.state.as_mut().ok_or(Error::Initialization)?;
        if let Some(root) = new_root {
            state.root = Some(root);
        }
        state.count += created;
        log_debug!("inserted {path}, {created} new nodes", path: text);
        Ok(())
    }

    /// Removes the directory at `path` along with its whole subtree.
    /// Removing the root leaves the tree initialized but empty.
    pub fn remove_dir(&mut self, path: &str) -> Result<()> {
        self.remove(path, NodeKind::Directory)
    }

    /// Removes the file at `path`.
    pub fn remove_file(&mut self, path: &str) -> Result<()> {
        self.remove(path, NodeKind::File)
    }

    fn remove(&mut self, text: &str, kind: NodeKind) -> Result<()> {
        if self.state.is_none() {
            return Err(Error::Initialization);
        }
        let path = TreePath::parse(text)?;
        if kind == NodeKind::File && !self.flavor.allows_files() {
            return Err(Error::conflicting_path(text));
        }
        let node = self.resolve(&path)?;
        if node.kind() != kind {
            return Err(match kind {
                NodeKind::Directory => Error::not_a_directory(text),
                NodeKind::File => Error::not_a_file(text),
            });
        }

        let removed = node.subtree_len();
        match node.parent() {
            Some(parent) => {
                let (found, slot) = parent.locate_child(node.path(), node.kind(), self.flavor);
                debug_assert!(found);
                parent.detach_child(slot)?;
            }
            None => {
                // removing the root empties the tree but does not
                // uninitialize it
                let state = self.state.as_mut().ok_or(Error::Initialization)?;
                state.root = None;
            }
        }
        drop(node);

        let state = self.state.as_mut().ok_or(Error::Initialization)?;
        state.count -= removed;
        log_debug!("removed {path}, {removed} nodes", path: text);
        Ok(())
    }

    /// True only if a node with exactly `path` exists, of either kind.
    /// Never errors: malformed paths, an uninitialized tree, or a
    /// mismatched root all report `false`.
    pub fn contains(&self, path: &str) -> bool {
        self.probe(path).is_some()
    }

    /// True only if `path` names an existing directory.
    pub fn contains_dir(&self, path: &str) -> bool {
        self.probe(path).is_some_and(|node| !node.is_file())
    }

    /// True only if `path` names an existing file.
    pub fn contains_file(&self, path: &str) -> bool {
        self.probe(path).is_some_and(|node| node.is_file())
    }

    /// Contents of the file at `path`. `None` uniformly covers "no
    /// such file" and "the file's payload is absent"; existence is a
    /// `stat` question, not a contents question.
    pub fn file_contents(&self, path: &str) -> Option<Vec<u8>> {
        let node = self.probe(path)?;
        if !node.is_file() {
            return None;
        }
        node.contents()
    }

    /// Swaps in a new payload for the file at `path`, returning the
    /// previous one. As with [`Tree::file_contents`], `None` covers
    /// both failure and a previously absent payload.
    pub fn replace_file_contents(
        &mut self,
        path: &str,
        contents: Option<Vec<u8>>,
    ) -> Option<Vec<u8>> {
        let node = self.probe(path)?;
        if !node.is_file() {
            return None;
        }
        node.replace_contents(contents)
    }

    /// Resolves `path` to its kind and, for files, payload length.
    pub fn stat(&self, text: &str) -> Result<Stat> {
        if self.state.is_none() {
            return Err(Error::Initialization);
        }
        let path = TreePath::parse(text)?;
        let node = self.resolve(&path)?;
        Ok(if node.is_file() {
            Stat {
                is_file: true,
                size: Some(node.contents_len()),
            }
        } else {
            Stat {
                is_file: false,
                size: None,
            }
        })
    }

    /// Serializes the namespace: a depth-first preorder listing, one
    /// absolute path per line, siblings in the flavor's order. Returns
    /// `None` while uninitialized and the empty string for an empty
    /// initialized tree.
    pub fn dump(&self) -> Option<String> {
        let state = self.state.as_ref()?;
        let mut out = String::new();
        if let Some(root) = &state.root {
            dump_subtree(root, &mut out);
        }
        Some(out)
    }

    /// Runs the invariant checker over the whole structure, reporting
    /// any violation through diagnostics. An assertion aid for tests
    /// and debugging, not part of the transactional API.
    pub fn check(&self) -> bool {
        match &self.state {
            None => check::tree_is_valid(self.flavor, false, None, 0),
            Some(state) => {
                check::tree_is_valid(self.flavor, true, state.root.as_ref(), state.count)
            }
        }
    }

    /// Walks from the root toward `path`, returning the deepest
    /// existing node whose path is a component prefix of `path`
    /// (possibly the exact node), or `None` when the tree has no
    /// root. A root that does not share the path's first component is
    /// a `ConflictingPath`.
    fn descend(&self, path: &TreePath) -> Result<Option<NodeRef>> {
        let state = self.state.as_ref().ok_or(Error::Initialization)?;
        let Some(root) = &state.root else {
            return Ok(None);
        };
        if path.shared_prefix_depth(root.path()) < root.path().depth() {
            return Err(Error::conflicting_path(path.as_str()));
        }
        let mut cur = root.clone();
        for level in root.path().depth() + 1..=path.depth() {
            match cur.find_child(&path.prefix(level)?) {
                Some(child) => cur = child,
                None => break,
            }
        }
        Ok(Some(cur))
    }

    /// Finds the node with exactly `path`, with the remove/stat error
    /// taxonomy: `ConflictingPath` for a mismatched root, `NoSuchPath`
    /// when the path is absent.
    fn resolve(&self, path: &TreePath) -> Result<NodeRef> {
        match self.descend(path)? {
            Some(node) if node.path().depth() == path.depth() => Ok(node),
            _ => Err(Error::no_such_path(path.as_str())),
        }
    }

    fn probe(&self, text: &str) -> Option<NodeRef> {
        let path = TreePath::parse(text).ok()?;
        self.resolve(&path).ok()
    }

    pub(crate) fn root(&self) -> Option<NodeRef> {
        self.state.as_ref().and_then(|state| state.root.clone())
    }
}

fn dump_subtree(node: &NodeRef, out: &mut String) {
    out.push_str(node.path().as_str());
    out.push('\n');
    for child in node.children() {
        dump_subtree(&child, out);
    }
}
