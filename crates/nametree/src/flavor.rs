/// Selects the child-ordering/arity policy and whether leaf payloads
/// (files) exist. One engine serves all three tree shapes; the flavor
/// is fixed when the `Tree` is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    /// Each node holds at most two children, kept in insertion order.
    /// Removing the first child promotes the second into its slot.
    Binary,
    /// Unbounded children, ordered lexicographically by path.
    Directory,
    /// Directories plus leaf files carrying byte payloads. Files sort
    /// before directories at the same level, lexicographic within
    /// each kind.
    Filesystem,
}

impl Flavor {
    /// The arity bound, if this flavor caps children per node.
    pub fn max_children(self) -> Option<usize> {
        match self {
            Flavor::Binary => Some(2),
            Flavor::Directory | Flavor::Filesystem => None,
        }
    }

    /// Whether file nodes may appear at all.
    pub fn allows_files(self) -> bool {
        matches!(self, Flavor::Filesystem)
    }

    /// Whether siblings are kept in sorted order, as opposed to the
    /// binary flavor's insertion order.
    pub fn keeps_sorted(self) -> bool {
        !matches!(self, Flavor::Binary)
    }
}
