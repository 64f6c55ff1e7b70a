//! Property tests for the rendered scene under arbitrary toggle sequences.
//!
//! Invariants:
//! 1. Rendered node ids are unique, and so are rendered edge targets.
//! 2. The non-exiting nodes of a frame are exactly the layout's nodes.
//! 3. Once transitions settle, nothing exiting remains and the export holds
//!    one element per visible node and per visible edge.

use mm_core::config::MindMapConfig;
use mm_core::id::NodeId;
use mm_core::layout::EstimatingMeasurer;
use mm_editor::session::MindMapSession;
use mm_editor::viewport::CanvasSize;
use proptest::prelude::*;
use std::collections::HashSet;

fn session() -> MindMapSession {
    MindMapSession::from_json(
        include_str!("fixtures/future_of_ai.json"),
        MindMapConfig::default(),
        Box::new(EstimatingMeasurer),
        CanvasSize::new(800.0, 600.0),
        0.0,
    )
    .unwrap()
}

fn all_ids(session: &MindMapSession) -> Vec<NodeId> {
    session
        .tree()
        .iter_preorder()
        .into_iter()
        .map(|idx| session.tree().graph[idx].id)
        .collect()
}

proptest! {
    #[test]
    fn toggles_keep_rendering_consistent(
        picks in prop::collection::vec((0usize..16, 0u32..400), 1..24),
    ) {
        let mut s = session();
        let ids = all_ids(&s);
        let mut now = 0.0;

        for (pick, gap) in picks {
            now += f64::from(gap);
            s.toggle(ids[pick % ids.len()], now);
            s.tick(now);
            let frame = s.frame(now);

            let mut seen = HashSet::new();
            prop_assert!(frame.nodes.iter().all(|n| seen.insert(n.id)));
            let mut targets = HashSet::new();
            prop_assert!(frame.edges.iter().all(|e| targets.insert(e.target)));

            let shown: HashSet<NodeId> = frame.visible_nodes().map(|n| n.id).collect();
            let laid_out: HashSet<NodeId> = s.layout().ids().into_iter().collect();
            prop_assert_eq!(shown, laid_out);
        }

        now += 1000.0;
        prop_assert!(!s.tick(now));
        let frame = s.frame(now);
        prop_assert!(frame.nodes.iter().all(|n| !n.exiting));
        prop_assert!(frame.edges.iter().all(|e| !e.exiting));

        let doc = s.export_svg(now).unwrap();
        prop_assert_eq!(doc.content.matches(r#"<g class="node "#).count(), s.layout().len());
        prop_assert_eq!(
            doc.content.matches(r#"<path class="link""#).count(),
            s.layout().edges.len()
        );
    }
}
