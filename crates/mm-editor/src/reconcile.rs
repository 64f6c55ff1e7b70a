//! Three-way reconciliation of rendered elements against a new layout.

use std::collections::HashSet;
use std::hash::Hash;

/// Work lists for one render pass. The three lists are disjoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation<K> {
    /// In `next` only, in `next` order.
    pub entering: Vec<K>,
    /// In both, in `next` order.
    pub updating: Vec<K>,
    /// In `previous` only, in `previous` order.
    pub exiting: Vec<K>,
}

impl<K> Reconciliation<K> {
    pub fn is_noop(&self) -> bool {
        self.entering.is_empty() && self.exiting.is_empty()
    }
}

pub fn reconcile<K: Copy + Eq + Hash>(previous: &[K], next: &[K]) -> Reconciliation<K> {
    let prev: HashSet<K> = previous.iter().copied().collect();
    let next_set: HashSet<K> = next.iter().copied().collect();

    let (updating, entering): (Vec<K>, Vec<K>) = next.iter().partition(|k| prev.contains(*k));
    let exiting = previous
        .iter()
        .copied()
        .filter(|k| !next_set.contains(k))
        .collect();

    Reconciliation {
        entering,
        updating,
        exiting,
    }
}
