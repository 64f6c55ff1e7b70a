use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

/// Process-wide interner backing [`NodeId`].
///
/// The interner only deduplicates strings. Uniqueness of ids within a tree is
/// the job of [`IdAllocator`], which is scoped to a single load.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Interned mind map node identifier. Compares and hashes as a `Spur`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Spur);

impl NodeId {
    /// Intern a string as a NodeId, or return the existing one.
    pub fn intern(s: &str) -> Self {
        NodeId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(NodeId::intern(&s))
    }
}

/// Synthesizes ids for nodes that arrive without one.
///
/// The counter starts at zero for every allocator, so two loads of the same
/// tree produce the same ids. Ids listed in `reserved` are never handed out.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u64,
    reserved: HashSet<String>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an allocator that skips every id in `reserved`.
    pub fn with_reserved(reserved: HashSet<String>) -> Self {
        Self { next: 0, reserved }
    }

    /// Hand out the next free `node_<n>` id.
    pub fn allocate(&mut self) -> NodeId {
        loop {
            let candidate = format!("node_{}", self.next);
            self.next += 1;
            if !self.reserved.contains(&candidate) {
                return NodeId::intern(&candidate);
            }
        }
    }
}
