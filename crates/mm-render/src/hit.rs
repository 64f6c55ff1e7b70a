//! Hit testing: point → node lookup.
//!
//! Walks the frame's nodes back-to-front (last painted = topmost) and
//! returns the first visible node whose box contains the point. Nodes that
//! are animating out, or still mostly transparent while fading in over
//! their anchor, do not catch the pointer.

use mm_core::frame::Frame;
use mm_core::id::NodeId;
use mm_core::model::Point;

/// Nodes fainter than this are passed through.
const MIN_HIT_OPACITY: f32 = 0.5;

/// Find the topmost node under a screen-space point.
/// Returns `None` over the background.
pub fn hit_test(frame: &Frame, sx: f32, sy: f32) -> Option<NodeId> {
    let p = frame.viewport.screen_to_canvas(Point::new(sx, sy));
    frame
        .nodes
        .iter()
        .rev()
        .filter(|n| !n.exiting && n.opacity >= MIN_HIT_OPACITY)
        .find(|n| n.bounds().contains(p.x, p.y))
        .map(|n| n.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm_core::frame::{FrameNode, ViewportTransform};
    use mm_core::model::{Color, Tier};

    fn node(id: &str, x: f32, y: f32, exiting: bool) -> FrameNode {
        faded(id, x, y, exiting, 1.0)
    }

    fn faded(id: &str, x: f32, y: f32, exiting: bool, opacity: f32) -> FrameNode {
        FrameNode {
            id: NodeId::intern(id),
            label: id.into(),
            tier: Tier::First,
            position: Point::new(x, y),
            width: 80.0,
            height: 32.0,
            opacity,
            fill: Color::rgb(0, 0, 0),
            stroke: Color::rgb(0, 0, 0),
            text: Color::rgb(255, 255, 255),
            collapsed: false,
            highlighted: false,
            exiting,
        }
    }

    fn frame(nodes: Vec<FrameNode>) -> Frame {
        Frame {
            nodes,
            ..Frame::empty(800.0, 600.0)
        }
    }

    #[test]
    fn hit_inside_box() {
        let f = frame(vec![node("a", 0.0, 0.0, false), node("b", 200.0, 0.0, false)]);
        assert_eq!(hit_test(&f, 10.0, 5.0), Some(NodeId::intern("a")));
        assert_eq!(hit_test(&f, 230.0, -10.0), Some(NodeId::intern("b")));
        assert_eq!(hit_test(&f, 100.0, 0.0), None);
    }

    #[test]
    fn hit_goes_through_viewport() {
        let mut f = frame(vec![node("vp", 0.0, 0.0, false)]);
        f.viewport = ViewportTransform {
            translate_x: 400.0,
            translate_y: 300.0,
            scale: 2.0,
        };
        assert_eq!(hit_test(&f, 470.0, 300.0), Some(NodeId::intern("vp")));
        assert_eq!(hit_test(&f, 10.0, 10.0), None);
    }

    #[test]
    fn exiting_nodes_are_not_hit() {
        let f = frame(vec![node("gone", 0.0, 0.0, true)]);
        assert_eq!(hit_test(&f, 0.0, 0.0), None);
    }

    #[test]
    fn transparent_entering_node_passes_through() {
        let f = frame(vec![
            node("anchor", 0.0, 0.0, false),
            faded("child", 0.0, 0.0, false, 0.01),
        ]);
        assert_eq!(hit_test(&f, 0.0, 0.0), Some(NodeId::intern("anchor")));
    }

    #[test]
    fn topmost_node_wins() {
        let f = frame(vec![node("under", 0.0, 0.0, false), node("over", 10.0, 0.0, false)]);
        assert_eq!(hit_test(&f, 5.0, 0.0), Some(NodeId::intern("over")));
    }
}
