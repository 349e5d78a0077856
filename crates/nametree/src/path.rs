use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// An absolute path: one or more non-empty components joined by '/'.
///
/// The string form never starts or ends with '/', never contains two
/// consecutive '/' delimiters, and is never empty, so every path has
/// depth >= 1. Paths order lexicographically on their full string
/// form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreePath {
    text: String,
    components: Vec<String>,
}

impl TreePath {
    /// Parses `text` into a path, copying each component.
    pub fn parse(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Err(Error::bad_path(text));
        }
        let mut components = Vec::new();
        for component in text.split('/') {
            // an empty component means a leading, trailing, or
            // doubled delimiter
            if component.is_empty() {
                return Err(Error::bad_path(text));
            }
            components.push(component.to_string());
        }
        Ok(TreePath {
            text: text.to_string(),
            components,
        })
    }

    /// The canonical string form.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length of the string form.
    pub fn str_len(&self) -> usize {
        self.text.len()
    }

    /// Number of components. "someRoot" has depth 1,
    /// "someRoot/aChild/aGrandChild" has depth 3.
    pub fn depth(&self) -> usize {
        self.components.len()
    }

    /// The component at `level`, counted from 0, or `None` if `level`
    /// is at or beyond this path's depth.
    pub fn component(&self, level: usize) -> Option<&str> {
        self.components.get(level).map(String::as_str)
    }

    /// A new path holding the first `depth` components of this one.
    /// Asking for depth 0 or more components than exist fails with
    /// `NoSuchPath`.
    pub fn prefix(&self, depth: usize) -> Result<Self> {
        if depth == 0 || depth > self.depth() {
            return Err(Error::no_such_path(&self.text));
        }
        let components = self.components[..depth].to_vec();
        let text = components.join("/");
        Ok(TreePath { text, components })
    }

    /// Length, in components, of the longest prefix shared with
    /// `other`: "a/b/c" and "a/b/d" share 2, "a/b/c" and "x" share 0.
    pub fn shared_prefix_depth(&self, other: &TreePath) -> usize {
        self.components
            .iter()
            .zip(other.components.iter())
            .take_while(|(mine, theirs)| mine == theirs)
            .count()
    }

    /// Compares the string form against a raw string, with the same
    /// ordering `Ord` gives two paths.
    pub fn cmp_str(&self, text: &str) -> Ordering {
        self.text.as_str().cmp(text)
    }

    /// True when `other` names a direct child of `self`: one level
    /// deeper, with `self` as a strict component prefix.
    pub fn is_parent_of(&self, other: &TreePath) -> bool {
        self.depth() + 1 == other.depth() && self.shared_prefix_depth(other) == self.depth()
    }
}

impl FromStr for TreePath {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        TreePath::parse(text)
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl PartialOrd for TreePath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TreePath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.text.cmp(&other.text)
    }
}
