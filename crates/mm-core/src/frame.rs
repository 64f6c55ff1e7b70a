//! Render frames: an interpolated snapshot of the scene at one instant.
//!
//! Frames are the only thing painters, hit testing and export see. They hold
//! resolved colors and canvas-space geometry plus the viewport transform
//! that maps canvas space onto the screen.

use crate::config::{Orientation, Palette};
use crate::id::NodeId;
use crate::model::{Bounds, Color, FontSpec, Point, Tier};
use serde::{Deserialize, Serialize};

/// Radius of the collapsed-children indicator.
pub const INDICATOR_RADIUS: f32 = 4.0;
/// Corner radius of node boxes.
pub const NODE_CORNER_RADIUS: f32 = 6.0;

/// `screen = canvas * scale + translate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportTransform {
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale: f32,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewportTransform {
    pub const IDENTITY: Self = Self {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
    };

    pub fn canvas_to_screen(&self, p: Point) -> Point {
        Point::new(
            p.x * self.scale + self.translate_x,
            p.y * self.scale + self.translate_y,
        )
    }

    pub fn screen_to_canvas(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.translate_x) / self.scale,
            (p.y - self.translate_y) / self.scale,
        )
    }

    pub fn lerp(&self, to: &ViewportTransform, t: f32) -> ViewportTransform {
        ViewportTransform {
            translate_x: self.translate_x + (to.translate_x - self.translate_x) * t,
            translate_y: self.translate_y + (to.translate_y - self.translate_y) * t,
            scale: self.scale + (to.scale - self.scale) * t,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameNode {
    pub id: NodeId,
    pub label: String,
    pub tier: Tier,
    /// Box center in canvas space.
    pub position: Point,
    pub width: f32,
    pub height: f32,
    pub opacity: f32,
    pub fill: Color,
    pub stroke: Color,
    pub text: Color,
    /// Has hidden children.
    pub collapsed: bool,
    pub highlighted: bool,
    /// Animating out; not part of the visible set.
    pub exiting: bool,
}

impl FrameNode {
    pub fn bounds(&self) -> Bounds {
        Bounds::centered(self.position, self.width, self.height)
    }

    /// Indicator sits on the far edge along the depth axis.
    pub fn indicator_center(&self, orientation: Orientation) -> Point {
        match orientation {
            Orientation::LeftToRight => {
                Point::new(self.position.x + self.width / 2.0, self.position.y)
            }
            Orientation::TopToBottom => {
                Point::new(self.position.x, self.position.y + self.height / 2.0)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub from: Point,
    pub to: Point,
    pub opacity: f32,
    pub color: Color,
    pub highlighted: bool,
    pub exiting: bool,
}

impl FrameEdge {
    /// Start, two controls and end of the cubic link, bending along the
    /// depth axis.
    pub fn curve(&self, orientation: Orientation) -> [Point; 4] {
        let (a, b) = (self.from, self.to);
        match orientation {
            Orientation::LeftToRight => {
                let mid = (a.x + b.x) / 2.0;
                [a, Point::new(mid, a.y), Point::new(mid, b.y), b]
            }
            Orientation::TopToBottom => {
                let mid = (a.y + b.y) / 2.0;
                [a, Point::new(a.x, mid), Point::new(b.x, mid), b]
            }
        }
    }
}

/// Hover tooltip in screen space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tooltip {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub nodes: Vec<FrameNode>,
    pub edges: Vec<FrameEdge>,
    pub viewport: ViewportTransform,
    pub tooltip: Option<Tooltip>,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub orientation: Orientation,
    pub font: FontSpec,
    pub background: Color,
    pub indicator: Color,
    pub tooltip_fill: Color,
    pub tooltip_text: Color,
    pub root_label: String,
}

impl Frame {
    /// A frame with nothing rendered yet.
    pub fn empty(canvas_width: f32, canvas_height: f32) -> Self {
        let palette = Palette::default();
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            viewport: ViewportTransform::IDENTITY,
            tooltip: None,
            canvas_width,
            canvas_height,
            orientation: Orientation::default(),
            font: FontSpec::default(),
            background: palette.background,
            indicator: palette.indicator,
            tooltip_fill: palette.tooltip_bg,
            tooltip_text: palette.tooltip_text,
            root_label: String::new(),
        }
    }

    pub fn visible_nodes(&self) -> impl Iterator<Item = &FrameNode> {
        self.nodes.iter().filter(|n| !n.exiting)
    }

    pub fn visible_edges(&self) -> impl Iterator<Item = &FrameEdge> {
        self.edges.iter().filter(|e| !e.exiting)
    }

    pub fn node(&self, id: NodeId) -> Option<&FrameNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// No visible nodes.
    pub fn is_empty(&self) -> bool {
        self.visible_nodes().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_roundtrip() {
        let vt = ViewportTransform {
            translate_x: 40.0,
            translate_y: -10.0,
            scale: 2.0,
        };
        let p = Point::new(3.0, 7.0);
        let screen = vt.canvas_to_screen(p);
        assert_eq!(screen, Point::new(46.0, 4.0));
        assert_eq!(vt.screen_to_canvas(screen), p);
    }

    #[test]
    fn viewport_lerp_midpoint() {
        let to = ViewportTransform {
            translate_x: 100.0,
            translate_y: 50.0,
            scale: 2.0,
        };
        let mid = ViewportTransform::IDENTITY.lerp(&to, 0.5);
        assert_eq!(mid.translate_x, 50.0);
        assert_eq!(mid.scale, 1.5);
    }

    #[test]
    fn curve_bends_along_depth_axis() {
        let edge = FrameEdge {
            source: NodeId::intern("s"),
            target: NodeId::intern("t"),
            from: Point::new(0.0, 0.0),
            to: Point::new(200.0, 40.0),
            opacity: 1.0,
            color: Color::rgb(0, 0, 0),
            highlighted: false,
            exiting: false,
        };
        let [_, c1, c2, _] = edge.curve(Orientation::LeftToRight);
        assert_eq!(c1, Point::new(100.0, 0.0));
        assert_eq!(c2, Point::new(100.0, 40.0));
    }

    #[test]
    fn empty_frame_has_no_visible_nodes() {
        assert!(Frame::empty(800.0, 600.0).is_empty());
    }

    #[test]
    fn empty_frame_uses_default_palette() {
        let f = Frame::empty(800.0, 600.0);
        let palette = Palette::default();
        assert_eq!(f.background, palette.background);
        assert_eq!(f.indicator, palette.indicator);
        assert_eq!(f.tooltip_fill, palette.tooltip_bg);
        assert_eq!(f.tooltip_text, palette.tooltip_text);
    }
}
