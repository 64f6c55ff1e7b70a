//! Per-node view state layered over an immutable [`MindTree`].
//!
//! The expanded flag and the cached layout positions are kept in a map keyed
//! by `NodeId` rather than on the tree nodes, so the loaded tree is never
//! mutated after construction. Collapsing a node only flips its own flag:
//! descendants keep theirs, which is what makes re-expansion restore the
//! previous shape exactly.

use crate::config::CollapsePolicy;
use crate::id::NodeId;
use crate::layout::Layout;
use crate::model::Point;
use crate::tree::MindTree;
use petgraph::graph::NodeIndex;
use std::collections::HashMap;

/// Mutable view state for one node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewState {
    /// Whether the node's data-children take part in layout.
    pub expanded: bool,
    /// Position from the most recent layout pass.
    pub position: Option<Point>,
    /// Position before the most recent layout pass.
    pub previous_position: Option<Point>,
}

/// Result of [`VisibilityState::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Expanded,
    Collapsed,
    /// The node has no children; nothing changed.
    Leaf,
    /// The node sits under a collapsed ancestor; nothing changed.
    Hidden,
    /// No node has this id; nothing changed.
    Unknown,
}

impl ToggleOutcome {
    /// Whether the visible set changed (and a layout pass is due).
    pub fn changed(self) -> bool {
        matches!(self, ToggleOutcome::Expanded | ToggleOutcome::Collapsed)
    }
}

#[derive(Debug, Clone, Default)]
pub struct VisibilityState {
    states: HashMap<NodeId, ViewState>,
}

impl VisibilityState {
    /// Seed view state for every node of `tree` according to `policy`.
    pub fn initialize(tree: &MindTree, policy: CollapsePolicy) -> Self {
        let states = tree
            .graph
            .node_indices()
            .map(|idx| {
                let node = tree.node(idx);
                let expanded = node.depth < policy.visible_depth && tree.has_children(idx);
                (
                    node.id,
                    ViewState {
                        expanded,
                        ..ViewState::default()
                    },
                )
            })
            .collect();
        Self { states }
    }

    pub fn state(&self, id: NodeId) -> Option<&ViewState> {
        self.states.get(&id)
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.states.get(&id).is_some_and(|s| s.expanded)
    }

    /// Position recorded by the most recent [`record_positions`](Self::record_positions).
    pub fn position(&self, id: NodeId) -> Option<Point> {
        self.states.get(&id).and_then(|s| s.position)
    }

    pub fn previous_position(&self, id: NodeId) -> Option<Point> {
        self.states.get(&id).and_then(|s| s.previous_position)
    }

    /// Whether every ancestor of `idx` is expanded.
    pub fn is_visible(&self, tree: &MindTree, idx: NodeIndex) -> bool {
        let mut current = idx;
        while let Some(parent) = tree.parent(current) {
            if !self.is_expanded(tree.node(parent).id) {
                return false;
            }
            current = parent;
        }
        true
    }

    /// The visible set in preorder.
    pub fn visible_indices(&self, tree: &MindTree) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        let mut stack = vec![tree.root];
        while let Some(idx) = stack.pop() {
            out.push(idx);
            if self.is_expanded(tree.node(idx).id) {
                stack.extend(tree.children(idx).into_iter().rev());
            }
        }
        out
    }

    pub fn visible_ids(&self, tree: &MindTree) -> Vec<NodeId> {
        self.visible_indices(tree)
            .into_iter()
            .map(|idx| tree.node(idx).id)
            .collect()
    }

    /// Flip a node between expanded and collapsed.
    ///
    /// Unknown, hidden and leaf nodes are left alone: stale ids show up
    /// naturally when a click lands on a node that is already animating out.
    pub fn toggle(&mut self, tree: &MindTree, id: NodeId) -> ToggleOutcome {
        let Some(idx) = tree.index_of(id) else {
            log::debug!("toggle ignored: unknown node {id:?}");
            return ToggleOutcome::Unknown;
        };
        if !tree.has_children(idx) {
            return ToggleOutcome::Leaf;
        }
        if !self.is_visible(tree, idx) {
            log::debug!("toggle ignored: {id:?} is under a collapsed ancestor");
            return ToggleOutcome::Hidden;
        }
        let state = self.states.entry(id).or_default();
        state.expanded = !state.expanded;
        if state.expanded {
            ToggleOutcome::Expanded
        } else {
            ToggleOutcome::Collapsed
        }
    }

    /// Cache the positions of a finished layout pass.
    pub fn record_positions(&mut self, layout: &Layout) {
        for laid in &layout.nodes {
            let state = self.states.entry(laid.id).or_default();
            state.previous_position = state.position;
            state.position = Some(laid.position);
        }
    }

    /// Snapshot of every expanded flag, for comparing states in tests and
    /// diagnostics.
    pub fn expanded_flags(&self) -> HashMap<NodeId, bool> {
        self.states.iter().map(|(id, s)| (*id, s.expanded)).collect()
    }
}
