//! WASM bridge for the mind map engine.
//!
//! Compiled via `wasm-pack build --target web`. The host page owns the
//! animation loop: it forwards pointer events and `performance.now()`
//! timestamps, calls `tick` and `render` each frame while `tick` reports
//! activity, and reads exports back as strings.

mod render2d;

pub use render2d::CanvasTextMeasurer;

use mm_core::config::MindMapConfig;
use mm_core::id::NodeId;
use mm_core::visibility::ToggleOutcome;
use mm_editor::input::InputEvent;
use mm_editor::session::MindMapSession;
use mm_editor::viewport::CanvasSize;
use mm_render::svg::export_filename;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

/// The WASM-facing mind map controller.
///
/// Empty until `load_json` succeeds; every other call is a no-op before
/// that.
#[wasm_bindgen]
pub struct MindMapCanvas {
    session: Option<MindMapSession>,
    config: MindMapConfig,
    width: f32,
    height: f32,
    /// Context used for text measurement on the next load.
    measure_ctx: Option<CanvasRenderingContext2d>,
}

/// Per-node geometry handed to the host (accessibility overlays, tests).
#[derive(Serialize)]
struct NodeInfo<'a> {
    id: &'a str,
    label: &'a str,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    depth: usize,
    collapsed: bool,
}

#[wasm_bindgen]
impl MindMapCanvas {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> Self {
        console_error_panic_hook_setup();
        Self {
            session: None,
            config: MindMapConfig::default(),
            width,
            height,
            measure_ctx: None,
        }
    }

    /// Measure labels with this context from the next load on.
    pub fn attach_context(&mut self, ctx: CanvasRenderingContext2d) {
        self.measure_ctx = Some(ctx);
    }

    /// Replace the configuration. Takes effect on the next load.
    /// Returns `false` if the JSON does not parse.
    pub fn set_config_json(&mut self, json: &str) -> bool {
        match MindMapConfig::from_json(json) {
            Ok(config) => {
                self.config = config;
                true
            }
            Err(e) => {
                log::warn!("rejected config: {e}");
                false
            }
        }
    }

    /// Load a mind map, replacing any previous one.
    /// Returns JSON: `{"ok":true,"nodes":N}` or `{"ok":false,"error":"..."}`.
    pub fn load_json(&mut self, json: &str, now: f64) -> String {
        let measurer = Box::new(CanvasTextMeasurer::new(self.measure_ctx.clone()));
        match MindMapSession::from_json(
            json,
            self.config.clone(),
            measurer,
            CanvasSize::new(self.width, self.height),
            now,
        ) {
            Ok(session) => {
                let nodes = session.tree().len();
                self.session = Some(session);
                serde_json::json!({ "ok": true, "nodes": nodes }).to_string()
            }
            Err(e) => {
                // A failed load leaves nothing rendered.
                self.session = None;
                error_json(&e.to_string())
            }
        }
    }

    pub fn clear(&mut self) {
        self.session = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.session.is_some()
    }

    /// Expand or collapse a node by id. Returns the outcome name:
    /// `expanded`, `collapsed`, `leaf`, `hidden` or `unknown`.
    pub fn toggle(&mut self, id: &str, now: f64) -> String {
        let outcome = match self.session.as_mut() {
            Some(session) => session.toggle(NodeId::intern(id), now),
            None => ToggleOutcome::Unknown,
        };
        outcome_name(outcome).to_string()
    }

    /// Returns `true` if the frame needs repainting.
    pub fn handle_pointer_down(&mut self, x: f32, y: f32, now: f64) -> bool {
        self.input(InputEvent::PointerDown { x, y }, now)
    }

    pub fn handle_pointer_move(&mut self, x: f32, y: f32, now: f64) -> bool {
        self.input(InputEvent::PointerMove { x, y }, now)
    }

    pub fn handle_pointer_up(&mut self, x: f32, y: f32, now: f64) -> bool {
        self.input(InputEvent::PointerUp { x, y }, now)
    }

    pub fn handle_pointer_leave(&mut self, now: f64) -> bool {
        self.input(InputEvent::PointerLeave, now)
    }

    pub fn handle_wheel(&mut self, x: f32, y: f32, delta_y: f32, now: f64) -> bool {
        self.input(InputEvent::Wheel { x, y, delta_y }, now)
    }

    /// Advance animations. Returns `true` while anything is still moving.
    pub fn tick(&mut self, now: f64) -> bool {
        self.session.as_mut().is_some_and(|s| s.tick(now))
    }

    /// Render the frame at `now`. Clears to the background when nothing is
    /// loaded.
    pub fn render(&self, ctx: &CanvasRenderingContext2d, now: f64) {
        let frame = match &self.session {
            Some(session) => session.frame(now),
            None => mm_core::frame::Frame::empty(self.width, self.height),
        };
        render2d::render_frame(ctx, &frame);
    }

    pub fn resize(&mut self, width: f32, height: f32, now: f64) {
        self.width = width;
        self.height = height;
        if let Some(session) = self.session.as_mut() {
            session.resize(width, height, now);
        }
    }

    /// Resize to the backing canvas of `ctx`.
    pub fn fit_to_canvas(&mut self, ctx: &CanvasRenderingContext2d, now: f64) {
        if let Some(canvas) = ctx.canvas() {
            self.resize(canvas.width() as f32, canvas.height() as f32, now);
        }
    }

    /// Standalone SVG of the visible map, or an empty string when there is
    /// nothing to export.
    pub fn export_svg(&self, now: f64) -> String {
        self.session
            .as_ref()
            .and_then(|s| s.export_svg(now))
            .map(|doc| doc.content)
            .unwrap_or_default()
    }

    /// Suggested download name for `export_svg`.
    pub fn export_filename(&self) -> String {
        export_filename(self.session.as_ref().map_or("", |s| s.tree().root_label()))
    }

    /// Current tooltip as JSON `{"text","x","y"}`, or `null`.
    pub fn tooltip_json(&self, now: f64) -> String {
        let tooltip = self.session.as_ref().and_then(|s| s.frame(now).tooltip);
        serde_json::to_string(&tooltip).unwrap_or_else(|_| "null".to_string())
    }

    /// Target geometry of every visible node as a JSON array.
    pub fn layout_json(&self) -> String {
        let Some(session) = &self.session else {
            return "[]".to_string();
        };
        let nodes: Vec<NodeInfo<'_>> = session
            .layout()
            .nodes
            .iter()
            .map(|n| NodeInfo {
                id: n.id.as_str(),
                label: &n.label,
                x: n.position.x,
                y: n.position.y,
                width: n.width,
                height: n.height,
                depth: n.depth,
                collapsed: n.is_collapsed(),
            })
            .collect();
        serde_json::to_string(&nodes).unwrap_or_else(|_| "[]".to_string())
    }

    /// Id of the node under a screen point, or an empty string.
    pub fn node_at(&self, x: f32, y: f32, now: f64) -> String {
        self.session
            .as_ref()
            .and_then(|s| s.node_at(x, y, now))
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }
}

impl MindMapCanvas {
    fn input(&mut self, event: InputEvent, now: f64) -> bool {
        match self.session.as_mut() {
            Some(session) => !session.handle_input(event, now).is_empty(),
            None => false,
        }
    }
}

fn outcome_name(outcome: ToggleOutcome) -> &'static str {
    match outcome {
        ToggleOutcome::Expanded => "expanded",
        ToggleOutcome::Collapsed => "collapsed",
        ToggleOutcome::Leaf => "leaf",
        ToggleOutcome::Hidden => "hidden",
        ToggleOutcome::Unknown => "unknown",
    }
}

fn error_json(message: &str) -> String {
    serde_json::json!({ "ok": false, "error": message }).to_string()
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("mind map WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone validation (no canvas needed) ────────────────────────────

/// Validate mind map JSON. Returns `{"ok":true,"nodes":N}` or
/// `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate(json: &str) -> String {
    match mm_core::tree::MindTree::from_json(json) {
        Ok(tree) => serde_json::json!({ "ok": true, "nodes": tree.len() }).to_string(),
        Err(e) => error_json(&e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FUTURE_OF_AI: &str = r#"{
        "name": "Future of AI",
        "children": [
            {"name": "Healthcare", "children": [{"name": "Diagnostics"}]},
            {"name": "Work"}
        ]
    }"#;

    #[test]
    fn validate_reports_node_count() {
        assert_eq!(validate(FUTURE_OF_AI), r#"{"nodes":4,"ok":true}"#);
    }

    #[test]
    fn validate_reports_errors() {
        let out: serde_json::Value = serde_json::from_str(&validate("{not json")).unwrap();
        assert_eq!(out["ok"], false);
        assert!(out["error"].as_str().unwrap().contains("invalid mind map JSON"));
    }

    #[test]
    fn load_then_toggle_by_id() {
        let mut canvas = MindMapCanvas::new(800.0, 600.0);
        let out: serde_json::Value =
            serde_json::from_str(&canvas.load_json(FUTURE_OF_AI, 0.0)).unwrap();
        assert_eq!(out["ok"], true);

        let layout: Vec<serde_json::Value> =
            serde_json::from_str(&canvas.layout_json()).unwrap();
        assert_eq!(layout.len(), 3);
        let health = layout
            .iter()
            .find(|n| n["label"] == "Healthcare")
            .unwrap();
        assert_eq!(health["collapsed"], true);

        let id = health["id"].as_str().unwrap().to_string();
        assert_eq!(canvas.toggle(&id, 0.0), "expanded");
        assert_eq!(canvas.toggle("missing", 0.0), "unknown");
        assert_eq!(canvas.export_filename(), "future-of-ai.svg");
    }

    #[test]
    fn failed_load_clears_previous_map() {
        let mut canvas = MindMapCanvas::new(800.0, 600.0);
        canvas.load_json(FUTURE_OF_AI, 0.0);
        assert!(canvas.is_loaded());
        canvas.load_json(r#"{"children": []}"#, 0.0);
        assert!(!canvas.is_loaded());
        assert_eq!(canvas.export_svg(0.0), "");
        assert_eq!(canvas.tooltip_json(0.0), "null");
    }
}
