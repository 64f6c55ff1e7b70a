//! Frame → standalone SVG document.
//!
//! The document is the canvas at export time: same size, the viewport baked
//! in as a group transform, resolved colors on every element. Nodes that are
//! animating out are not part of the visible set and are skipped, as is the
//! hover tooltip.

use mm_core::frame::{Frame, FrameEdge, FrameNode, INDICATOR_RADIUS, NODE_CORNER_RADIUS};
use std::fmt::Write;

const FALLBACK_FILENAME: &str = "mindmap.svg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgDocument {
    pub filename: String,
    pub content: String,
}

/// Serialize the visible part of `frame`. `None` when nothing is rendered.
pub fn export_svg(frame: &Frame) -> Option<SvgDocument> {
    if frame.is_empty() {
        log::debug!("svg export skipped: nothing rendered");
        return None;
    }

    let w = num(frame.canvas_width);
    let h = num(frame.canvas_height);
    let vt = frame.viewport;
    let mut out = String::with_capacity(4096);

    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    let _ = writeln!(
        out,
        r#"  <rect class="background" width="{w}" height="{h}" fill="{}"/>"#,
        frame.background.to_css()
    );
    let _ = writeln!(
        out,
        r#"  <g class="viewport" transform="translate({} {}) scale({})">"#,
        num(vt.translate_x),
        num(vt.translate_y),
        num(vt.scale)
    );

    out.push_str("    <g class=\"links\">\n");
    for edge in frame.visible_edges() {
        emit_edge(&mut out, frame, edge);
    }
    out.push_str("    </g>\n");

    out.push_str("    <g class=\"nodes\">\n");
    for node in frame.visible_nodes() {
        emit_node(&mut out, frame, node);
    }
    out.push_str("    </g>\n");

    out.push_str("  </g>\n</svg>\n");

    let filename = export_filename(&frame.root_label);
    log::debug!("svg export: {filename} ({} bytes)", out.len());
    Some(SvgDocument {
        filename,
        content: out,
    })
}

fn emit_edge(out: &mut String, frame: &Frame, edge: &FrameEdge) {
    let [a, c1, c2, b] = edge.curve(frame.orientation);
    let _ = writeln!(
        out,
        r#"      <path class="link" data-source="{}" data-target="{}" d="M{},{} C{},{} {},{} {},{}" fill="none" stroke="{}" stroke-width="{}"{}/>"#,
        escape(edge.source.as_str()),
        escape(edge.target.as_str()),
        num(a.x),
        num(a.y),
        num(c1.x),
        num(c1.y),
        num(c2.x),
        num(c2.y),
        num(b.x),
        num(b.y),
        edge.color.to_css(),
        if edge.highlighted { "3" } else { "1.5" },
        opacity_attr(edge.opacity),
    );
}

fn emit_node(out: &mut String, frame: &Frame, node: &FrameNode) {
    let b = node.bounds();
    let _ = writeln!(
        out,
        r#"      <g class="node {}" data-id="{}" transform="translate({} {})"{}>"#,
        node.tier.class_name(),
        escape(node.id.as_str()),
        num(node.position.x),
        num(node.position.y),
        opacity_attr(node.opacity),
    );
    let _ = writeln!(
        out,
        r#"        <rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
        num(-b.width / 2.0),
        num(-b.height / 2.0),
        num(b.width),
        num(b.height),
        num(NODE_CORNER_RADIUS),
        node.fill.to_css(),
        node.stroke.to_css(),
        if node.highlighted { "2" } else { "1" },
    );
    let font = &frame.font;
    let _ = writeln!(
        out,
        r#"        <text text-anchor="middle" dominant-baseline="central" font-family="{}" font-size="{}" font-weight="{}" fill="{}">{}</text>"#,
        escape(&font.family),
        num(font.size),
        font.weight,
        node.text.to_css(),
        escape(&node.label),
    );
    if node.collapsed {
        let c = node.indicator_center(frame.orientation);
        let _ = writeln!(
            out,
            r#"        <circle class="indicator" cx="{}" cy="{}" r="{}" fill="{}"/>"#,
            num(c.x - node.position.x),
            num(c.y - node.position.y),
            num(INDICATOR_RADIUS),
            frame.indicator.to_css(),
        );
    }
    out.push_str("      </g>\n");
}

/// `<slug of label>.svg`, or `mindmap.svg` when the label has no ASCII
/// letters or digits. Every other run of characters becomes one dash.
pub fn export_filename(root_label: &str) -> String {
    let mut slug = String::with_capacity(root_label.len());
    let mut pending_dash = false;
    for ch in root_label.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        format!("{slug}.svg")
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────

fn opacity_attr(opacity: f32) -> String {
    if opacity >= 1.0 {
        String::new()
    } else {
        format!(r#" opacity="{}""#, num(opacity.max(0.0)))
    }
}

/// Compact number: at most two decimals, no trailing zeros.
fn num(v: f32) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".into() } else { s.into() }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn filename_from_root_label() {
        assert_eq!(export_filename("Future of AI"), "future-of-ai.svg");
        assert_eq!(export_filename("  Rust: ownership & traits! "), "rust-ownership-traits.svg");
        assert_eq!(export_filename("???"), "mindmap.svg");
        assert_eq!(export_filename(""), "mindmap.svg");
    }

    #[test]
    fn filename_slug_is_ascii() {
        assert_eq!(export_filename("Café Société"), "caf-soci-t.svg");
        assert_eq!(export_filename("日本語"), "mindmap.svg");
        assert!(export_filename("Ünïcode 2030").is_ascii());
    }

    #[test]
    fn numbers_are_compact() {
        assert_eq!(num(200.0), "200");
        assert_eq!(num(1.5), "1.5");
        assert_eq!(num(0.333), "0.33");
        assert_eq!(num(-0.001), "0");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape(r#"a<b & "c""#), "a&lt;b &amp; &quot;c&quot;");
    }

    #[test]
    fn empty_frame_exports_nothing() {
        assert_eq!(export_svg(&Frame::empty(800.0, 600.0)), None);
    }
}
