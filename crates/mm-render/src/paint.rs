//! Frame → Vello drawing commands.
//!
//! Emits links, node boxes, collapsed indicators and the tooltip backdrop.
//! Links and nodes are drawn under the viewport transform; the tooltip is
//! already in screen space.

use kurbo::{Affine, BezPath, Circle, Rect, RoundedRect, Stroke};
use mm_core::frame::{Frame, FrameEdge, FrameNode, INDICATOR_RADIUS, NODE_CORNER_RADIUS};
use mm_core::layout::estimate_text_width;
use mm_core::model::{Color, Point};
use peniko::{Color as PenikoColor, Fill};
use vello::Scene;

const LINK_WIDTH: f64 = 1.5;
const TOOLTIP_PADDING: f64 = 6.0;
const TOOLTIP_OFFSET: f64 = 12.0;

/// Paint `frame` into `scene`.
///
/// Call once per frame with a freshly-cleared `Scene`.
/// The caller presents the scene through its own surface.
pub fn paint_frame(scene: &mut Scene, frame: &Frame) {
    let canvas = Rect::new(0.0, 0.0, frame.canvas_width as f64, frame.canvas_height as f64);
    scene.fill(
        Fill::NonZero,
        Affine::IDENTITY,
        to_peniko(frame.background, 1.0),
        None,
        &canvas,
    );

    let vt = frame.viewport;
    let view = Affine::translate((vt.translate_x as f64, vt.translate_y as f64))
        * Affine::scale(vt.scale as f64);

    for edge in &frame.edges {
        paint_edge(scene, view, frame, edge);
    }
    for node in &frame.nodes {
        paint_node(scene, view, frame, node);
    }
    paint_tooltip(scene, frame);
}

fn paint_edge(scene: &mut Scene, view: Affine, frame: &Frame, edge: &FrameEdge) {
    let [a, c1, c2, b] = edge.curve(frame.orientation);
    let mut path = BezPath::new();
    path.move_to(kp(a));
    path.curve_to(kp(c1), kp(c2), kp(b));
    let width = if edge.highlighted {
        LINK_WIDTH * 2.0
    } else {
        LINK_WIDTH
    };
    scene.stroke(
        &Stroke::new(width),
        view,
        to_peniko(edge.color, edge.opacity),
        None,
        &path,
    );
}

fn paint_node(scene: &mut Scene, view: Affine, frame: &Frame, node: &FrameNode) {
    let b = node.bounds();
    let shape = RoundedRect::new(
        b.x as f64,
        b.y as f64,
        (b.x + b.width) as f64,
        (b.y + b.height) as f64,
        NODE_CORNER_RADIUS as f64,
    );
    scene.fill(
        Fill::NonZero,
        view,
        to_peniko(node.fill, node.opacity),
        None,
        &shape,
    );
    let stroke_width = if node.highlighted { 2.0 } else { 1.0 };
    scene.stroke(
        &Stroke::new(stroke_width),
        view,
        to_peniko(node.stroke, node.opacity),
        None,
        &shape,
    );

    if node.collapsed {
        let dot = Circle::new(
            kp(node.indicator_center(frame.orientation)),
            INDICATOR_RADIUS as f64,
        );
        scene.fill(
            Fill::NonZero,
            view,
            to_peniko(frame.indicator, node.opacity),
            None,
            &dot,
        );
    }

    // Glyph shaping needs a font context the host owns.
    log::trace!(
        "label {} {:?} at ({}, {})",
        node.id,
        node.label,
        node.position.x,
        node.position.y
    );
}

fn paint_tooltip(scene: &mut Scene, frame: &Frame) {
    let Some(tip) = &frame.tooltip else {
        return;
    };
    let text_w = estimate_text_width(&tip.text, &frame.font) as f64;
    let text_h = frame.font.size as f64;
    let x = tip.x as f64 + TOOLTIP_OFFSET;
    let y = tip.y as f64 + TOOLTIP_OFFSET;
    let backdrop = RoundedRect::new(
        x,
        y,
        x + text_w + 2.0 * TOOLTIP_PADDING,
        y + text_h + 2.0 * TOOLTIP_PADDING,
        4.0,
    );
    scene.fill(
        Fill::NonZero,
        Affine::IDENTITY,
        to_peniko(frame.tooltip_fill, 0.9),
        None,
        &backdrop,
    );
    log::trace!("tooltip {:?} at ({x}, {y})", tip.text);
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn kp(p: Point) -> kurbo::Point {
    kurbo::Point::new(p.x as f64, p.y as f64)
}

fn to_peniko(c: Color, opacity: f32) -> PenikoColor {
    let alpha = (c.a * opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    PenikoColor::from_rgba8(c.r, c.g, c.b, alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm_core::frame::Tooltip;
    use mm_core::id::NodeId;
    use mm_core::model::Tier;

    fn sample_frame() -> Frame {
        let node = FrameNode {
            id: NodeId::intern("paint_root"),
            label: "Root".into(),
            tier: Tier::Root,
            position: Point::new(0.0, 0.0),
            width: 80.0,
            height: 32.0,
            opacity: 1.0,
            fill: Color::rgb(0x4F, 0x46, 0xE5),
            stroke: Color::rgb(0x37, 0x30, 0xA3),
            text: Color::rgb(255, 255, 255),
            collapsed: true,
            highlighted: false,
            exiting: false,
        };
        Frame {
            nodes: vec![node],
            tooltip: Some(Tooltip {
                text: "Root".into(),
                x: 10.0,
                y: 10.0,
            }),
            ..Frame::empty(400.0, 300.0)
        }
    }

    #[test]
    fn opacity_scales_alpha() {
        let half = to_peniko(Color::rgb(10, 20, 30), 0.5);
        assert!((half.components[3] - 128.0 / 255.0).abs() < 1e-3);
        let clamped = to_peniko(Color::rgb(10, 20, 30), 2.0);
        assert!((clamped.components[3] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn paints_without_panicking() {
        let mut scene = Scene::new();
        paint_frame(&mut scene, &sample_frame());
        paint_frame(&mut scene, &Frame::empty(0.0, 0.0));
    }
}
