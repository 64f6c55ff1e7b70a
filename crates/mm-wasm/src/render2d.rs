//! Canvas2D renderer.
//!
//! Draws a [`Frame`] to an HTML `<canvas>` via `CanvasRenderingContext2d`.
//! Unlike the Vello painter this one shapes text, so it is what the browser
//! host uses.

use mm_core::frame::{Frame, FrameEdge, FrameNode, INDICATOR_RADIUS, NODE_CORNER_RADIUS};
use mm_core::layout::{TextMeasurer, estimate_text_width};
use mm_core::model::FontSpec;
use web_sys::CanvasRenderingContext2d;

const LINK_WIDTH: f64 = 1.5;
const TOOLTIP_PADDING: f64 = 6.0;
const TOOLTIP_OFFSET: f64 = 12.0;
const TOOLTIP_RADIUS: f64 = 4.0;

/// Measures labels with the context's `measureText`.
///
/// Falls back to the character estimate when no context is attached or the
/// browser reports nothing usable.
pub struct CanvasTextMeasurer {
    ctx: Option<CanvasRenderingContext2d>,
}

impl CanvasTextMeasurer {
    pub fn new(ctx: Option<CanvasRenderingContext2d>) -> Self {
        Self { ctx }
    }
}

impl TextMeasurer for CanvasTextMeasurer {
    fn measure(&self, text: &str, font: &FontSpec) -> Option<f32> {
        let ctx = self.ctx.as_ref()?;
        ctx.save();
        ctx.set_font(&font.css());
        let width = ctx.measure_text(text).ok().map(|m| m.width() as f32);
        ctx.restore();
        width.filter(|w| w.is_finite() && *w > 0.0)
    }
}

/// Render `frame`. Clears the whole canvas first.
pub fn render_frame(ctx: &CanvasRenderingContext2d, frame: &Frame) {
    let _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
    let _ = ctx.set_line_dash(&js_sys::Array::new());
    ctx.set_global_alpha(1.0);
    ctx.set_fill_style_str(&frame.background.to_css());
    ctx.fill_rect(
        0.0,
        0.0,
        frame.canvas_width as f64,
        frame.canvas_height as f64,
    );

    let vt = frame.viewport;
    ctx.save();
    let _ = ctx.translate(vt.translate_x as f64, vt.translate_y as f64);
    let _ = ctx.scale(vt.scale as f64, vt.scale as f64);

    for edge in &frame.edges {
        draw_edge(ctx, frame, edge);
    }
    ctx.set_font(&frame.font.css());
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    for node in &frame.nodes {
        draw_node(ctx, frame, node);
    }
    ctx.restore();

    draw_tooltip(ctx, frame);
}

fn draw_edge(ctx: &CanvasRenderingContext2d, frame: &Frame, edge: &FrameEdge) {
    let [a, c1, c2, b] = edge.curve(frame.orientation);
    ctx.set_global_alpha(edge.opacity as f64);
    ctx.set_stroke_style_str(&edge.color.to_css());
    ctx.set_line_width(if edge.highlighted {
        LINK_WIDTH * 2.0
    } else {
        LINK_WIDTH
    });
    ctx.begin_path();
    ctx.move_to(a.x as f64, a.y as f64);
    ctx.bezier_curve_to(
        c1.x as f64,
        c1.y as f64,
        c2.x as f64,
        c2.y as f64,
        b.x as f64,
        b.y as f64,
    );
    ctx.stroke();
}

fn draw_node(ctx: &CanvasRenderingContext2d, frame: &Frame, node: &FrameNode) {
    let b = node.bounds();
    let (x, y, w, h) = (b.x as f64, b.y as f64, b.width as f64, b.height as f64);
    ctx.set_global_alpha(node.opacity as f64);

    rounded_rect_path(ctx, x, y, w, h, NODE_CORNER_RADIUS as f64);
    ctx.set_fill_style_str(&node.fill.to_css());
    ctx.fill();
    ctx.set_stroke_style_str(&node.stroke.to_css());
    ctx.set_line_width(if node.highlighted { 2.0 } else { 1.0 });
    ctx.stroke();

    ctx.set_fill_style_str(&node.text.to_css());
    let _ = ctx.fill_text(&node.label, node.position.x as f64, node.position.y as f64);

    if node.collapsed {
        let c = node.indicator_center(frame.orientation);
        ctx.begin_path();
        let _ = ctx.arc(
            c.x as f64,
            c.y as f64,
            INDICATOR_RADIUS as f64,
            0.0,
            std::f64::consts::TAU,
        );
        ctx.set_fill_style_str(&frame.indicator.to_css());
        ctx.fill();
    }
}

/// Tooltip is in screen space, drawn after the viewport transform is undone.
fn draw_tooltip(ctx: &CanvasRenderingContext2d, frame: &Frame) {
    let Some(tip) = &frame.tooltip else {
        return;
    };
    ctx.set_global_alpha(1.0);
    ctx.set_font(&frame.font.css());
    let text_w = ctx
        .measure_text(&tip.text)
        .map(|m| m.width())
        .unwrap_or_else(|_| estimate_text_width(&tip.text, &frame.font) as f64);
    let text_h = frame.font.size as f64;
    let x = tip.x as f64 + TOOLTIP_OFFSET;
    let y = tip.y as f64 + TOOLTIP_OFFSET;

    rounded_rect_path(
        ctx,
        x,
        y,
        text_w + 2.0 * TOOLTIP_PADDING,
        text_h + 2.0 * TOOLTIP_PADDING,
        TOOLTIP_RADIUS,
    );
    ctx.set_fill_style_str(&frame.tooltip_fill.with_alpha(0.9).to_css());
    ctx.fill();

    ctx.set_fill_style_str(&frame.tooltip_text.to_css());
    ctx.set_text_align("left");
    ctx.set_text_baseline("top");
    let _ = ctx.fill_text(&tip.text, x + TOOLTIP_PADDING, y + TOOLTIP_PADDING);
}

fn rounded_rect_path(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
    let r = r.min(w / 2.0).min(h / 2.0).max(0.0);
    ctx.begin_path();
    ctx.move_to(x + r, y);
    ctx.line_to(x + w - r, y);
    ctx.arc_to(x + w, y, x + w, y + r, r).unwrap_or(());
    ctx.line_to(x + w, y + h - r);
    ctx.arc_to(x + w, y + h, x + w - r, y + h, r).unwrap_or(());
    ctx.line_to(x + r, y + h);
    ctx.arc_to(x, y + h, x, y + h - r, r).unwrap_or(());
    ctx.line_to(x, y + r);
    ctx.arc_to(x, y, x + r, y, r).unwrap_or(());
    ctx.close_path();
}
