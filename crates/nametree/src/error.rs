pub type Result<T> = std::result::Result<T, Error>;

/// Status taxonomy for namespace operations.
///
/// Every failure is a synchronous return value; nothing in the crate
/// panics on bad input. `Tree::contains*` are the one deliberate
/// exception to strict surfacing: they collapse every failure mode to
/// `false` so they can be used as existence probes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The operation requires the opposite initialization state.
    #[error("tree is in the wrong initialization state")]
    Initialization,

    /// The path string is empty, starts or ends with '/', or contains
    /// consecutive '/' delimiters.
    #[error("malformed path: {0:?}")]
    BadPath(String),

    /// The path's root does not match the tree's existing root, or a
    /// structural arity/type constraint was violated.
    #[error("conflicting path: {0}")]
    ConflictingPath(String),

    /// No node carries this exact path, or a depth request was out of
    /// range.
    #[error("no such path: {0}")]
    NoSuchPath(String),

    /// A node with this exact path is already present.
    #[error("path already in tree: {0}")]
    AlreadyInTree(String),

    /// The path resolves to a file where a directory is required.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// The path resolves to a directory where a file is required.
    #[error("not a file: {0}")]
    NotAFile(String),
}

impl Error {
    pub fn bad_path<S: AsRef<str>>(path: S) -> Self {
        Error::BadPath(path.as_ref().to_string())
    }

    pub fn conflicting_path<S: AsRef<str>>(path: S) -> Self {
        Error::ConflictingPath(path.as_ref().to_string())
    }

    pub fn no_such_path<S: AsRef<str>>(path: S) -> Self {
        Error::NoSuchPath(path.as_ref().to_string())
    }

    pub fn already_in_tree<S: AsRef<str>>(path: S) -> Self {
        Error::AlreadyInTree(path.as_ref().to_string())
    }

    pub fn not_a_directory<S: AsRef<str>>(path: S) -> Self {
        Error::NotADirectory(path.as_ref().to_string())
    }

    pub fn not_a_file<S: AsRef<str>>(path: S) -> Self {
        Error::NotAFile(path.as_ref().to_string())
    }
}
