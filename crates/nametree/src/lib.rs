//! An in-memory hierarchical namespace engine.
//!
//! `nametree` maintains a tree of named nodes addressed by
//! slash-delimited absolute paths ("a/b/c"), with whole-subtree
//! insertion and removal, membership queries, and a deterministic
//! preorder serialization of the namespace. One engine serves three
//! tree shapes, selected per [`Tree`] by a [`Flavor`]:
//!
//! * [`Flavor::Binary`] - at most two children per node, kept in
//!   insertion order; removing a first child promotes the second.
//! * [`Flavor::Directory`] - unbounded directories in lexicographic
//!   sibling order.
//! * [`Flavor::Filesystem`] - directories plus leaf files carrying
//!   byte payloads; files sort before directories at each level.
//!
//! ```
//! use nametree::Tree;
//!
//! let mut tree = Tree::directory();
//! tree.init().unwrap();
//! tree.insert_dir("plants/ferns").unwrap();
//! assert!(tree.contains("plants"));
//! assert_eq!(tree.dump().unwrap(), "plants\nplants/ferns\n");
//! ```
//!
//! Everything is synchronous and single-threaded; errors are status
//! values ([`Error`]), never panics. The [`check`] module holds a
//! read-only invariant validator for diagnostics and tests.

pub mod check;
mod error;
mod flavor;
mod node;
mod path;
mod tree;

pub use error::{Error, Result};
pub use flavor::Flavor;
pub use node::{NodeKind, NodeRef};
pub use path::TreePath;
pub use tree::{Stat, Tree};
