//! Property-based invariant tests for visibility and layout.
//!
//! 1. Initialization shows exactly the nodes of depth <= 1.
//! 2. Expand then collapse restores the visible set and every flag.
//! 3. Siblings keep their order and at least the sibling gap.
//! 4. Neighbours on the same level never come closer than the sibling gap.
//! 5. Every parent sits at the midpoint of its first and last child.
//! 6. Boxes on the same level are disjoint on the sibling axis, in either
//!    orientation.

use mm_core::config::{CollapsePolicy, LayoutConfig, Orientation};
use mm_core::id::NodeId;
use mm_core::layout::{EstimatingMeasurer, Layout, compute_layout};
use mm_core::model::DataNode;
use mm_core::tree::{MindTree, assign_identities};
use mm_core::visibility::VisibilityState;
use proptest::prelude::*;
use proptest::sample::Index;
use std::collections::{BTreeMap, HashSet};

const EPS: f32 = 1e-2;

// ── Helpers ─────────────────────────────────────────────────────────────

fn tree_strategy() -> impl Strategy<Value = DataNode> {
    let leaf = "[a-z]{1,10}".prop_map(DataNode::leaf);
    leaf.prop_recursive(5, 48, 4, |inner| {
        ("[a-z]{1,10}", prop::collection::vec(inner, 0..5))
            .prop_map(|(name, children)| DataNode::branch(name, children))
    })
}

fn load(data: &DataNode) -> MindTree {
    assign_identities(data).unwrap()
}

fn full_layout(tree: &MindTree, cfg: &LayoutConfig) -> Layout {
    let vis = VisibilityState::initialize(tree, CollapsePolicy {
        visible_depth: usize::MAX,
    });
    compute_layout(tree, &vis, &EstimatingMeasurer, cfg)
}

fn across(layout: &Layout, id: NodeId) -> f32 {
    layout.node(id).map(|n| n.tree_position.across).unwrap_or(f32::NAN)
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Initial visibility
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn initial_visible_set_is_depth_one(data in tree_strategy()) {
        let tree = load(&data);
        let vis = VisibilityState::initialize(&tree, CollapsePolicy::default());
        let expected: Vec<NodeId> = tree
            .iter_preorder()
            .into_iter()
            .filter(|&idx| tree.node(idx).depth <= 1)
            .map(|idx| tree.node(idx).id)
            .collect();
        prop_assert_eq!(vis.visible_ids(&tree), expected);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Toggle round-trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn expand_then_collapse_restores_state(
        data in tree_strategy(),
        depth in 0usize..4,
        pick in any::<Index>(),
    ) {
        let tree = load(&data);
        let mut vis = VisibilityState::initialize(&tree, CollapsePolicy { visible_depth: depth });
        let visible = vis.visible_indices(&tree);
        let target = tree.node(visible[pick.index(visible.len())]).id;

        let flags = vis.expanded_flags();
        let ids = vis.visible_ids(&tree);
        vis.toggle(&tree, target);
        vis.toggle(&tree, target);
        prop_assert_eq!(vis.expanded_flags(), flags);
        prop_assert_eq!(vis.visible_ids(&tree), ids);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3 + 5. Sibling spacing and parent centering
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn siblings_are_spaced_and_parents_centered(data in tree_strategy()) {
        let tree = load(&data);
        let cfg = LayoutConfig::default();
        let layout = full_layout(&tree, &cfg);
        let gap = cfg.sibling_separation * 1.2;

        for node in &layout.nodes {
            let children = layout.children_of(node.id);
            if children.is_empty() {
                continue;
            }
            for pair in children.windows(2) {
                let d = across(&layout, pair[1].id) - across(&layout, pair[0].id);
                prop_assert!(d >= gap - EPS, "siblings {:?}/{:?} only {} apart", pair[0].id, pair[1].id, d);
            }
            let first = across(&layout, children[0].id);
            let last = across(&layout, children[children.len() - 1].id);
            let mid = (first + last) / 2.0;
            prop_assert!(
                (node.tree_position.across - mid).abs() < EPS,
                "parent {:?} at {} but children span midpoint is {}",
                node.id, node.tree_position.across, mid
            );
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. No overlap on a level
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn level_neighbours_do_not_overlap(data in tree_strategy()) {
        let tree = load(&data);
        let cfg = LayoutConfig::default();
        let layout = full_layout(&tree, &cfg);

        // Preorder restricted to one level is left-to-right order.
        let mut levels: BTreeMap<usize, Vec<(Option<NodeId>, f32)>> = BTreeMap::new();
        for node in &layout.nodes {
            levels
                .entry(node.depth)
                .or_default()
                .push((node.parent, node.tree_position.across));
        }
        for row in levels.values() {
            for pair in row.windows(2) {
                let (pa, a) = pair[0];
                let (pb, b) = pair[1];
                let min = if pa == pb {
                    cfg.sibling_separation * 1.2
                } else {
                    cfg.sibling_separation * 1.5
                };
                prop_assert!(b - a >= min - EPS, "neighbours {} and {} closer than {}", a, b, min);
            }
        }
    }
}

proptest! {
    #[test]
    fn layout_ids_and_edge_targets_are_unique(data in tree_strategy()) {
        let tree = load(&data);
        let layout = full_layout(&tree, &LayoutConfig::default());
        let ids: HashSet<NodeId> = layout.nodes.iter().map(|n| n.id).collect();
        let targets: HashSet<NodeId> = layout.edges.iter().map(|e| e.target).collect();
        prop_assert_eq!(ids.len(), layout.nodes.len());
        prop_assert_eq!(targets.len(), layout.edges.len());
        prop_assert_eq!(layout.edges.len(), layout.nodes.len() - 1);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Disjoint boxes on the sibling axis
// ═════════════════════════════════════════════════════════════════════════

fn orientation_strategy() -> impl Strategy<Value = Orientation> {
    prop_oneof![Just(Orientation::LeftToRight), Just(Orientation::TopToBottom)]
}

proptest! {
    #[test]
    fn level_boxes_are_disjoint(data in tree_strategy(), orientation in orientation_strategy()) {
        let tree = load(&data);
        let cfg = LayoutConfig { orientation, ..LayoutConfig::default() };
        let layout = full_layout(&tree, &cfg);

        let mut levels: BTreeMap<usize, Vec<(f32, f32)>> = BTreeMap::new();
        for node in &layout.nodes {
            let b = node.bounds();
            let span = match orientation {
                Orientation::LeftToRight => (b.y, b.y + b.height),
                Orientation::TopToBottom => (b.x, b.x + b.width),
            };
            levels.entry(node.depth).or_default().push(span);
        }
        for row in levels.values() {
            for pair in row.windows(2) {
                let ((_, a_end), (b_start, _)) = (pair[0], pair[1]);
                prop_assert!(
                    b_start >= a_end - EPS,
                    "{:?}: box ending at {} overlaps box starting at {}",
                    orientation, a_end, b_start
                );
            }
        }
    }
}
