//! One loaded mind map and everything needed to explore it.
//!
//! The session drives the cycle every effective toggle triggers:
//! visibility → layout → render (anchored at the toggled node) →
//! record positions → auto-fit. The host feeds it input events and
//! timestamps and reads frames back.

use crate::input::InputEvent;
use crate::interaction::{Action, Interaction};
use crate::scene::RenderScene;
use crate::viewport::{CanvasSize, ViewportController};
use mm_core::config::MindMapConfig;
use mm_core::error::LoadError;
use mm_core::frame::Frame;
use mm_core::id::NodeId;
use mm_core::layout::{Layout, TextMeasurer, compute_layout};
use mm_core::model::{DataNode, Point};
use mm_core::tree::{MindTree, assign_identities};
use mm_core::visibility::{ToggleOutcome, VisibilityState};
use mm_render::hit::hit_test;
use mm_render::svg::{SvgDocument, export_svg};
use smallvec::SmallVec;

pub struct MindMapSession {
    config: MindMapConfig,
    tree: MindTree,
    visibility: VisibilityState,
    measurer: Box<dyn TextMeasurer>,
    layout: Layout,
    scene: RenderScene,
    viewport: ViewportController,
    interaction: Interaction,
    canvas: CanvasSize,
}

impl MindMapSession {
    /// Load `data` and run the first layout cycle anchored at the root.
    pub fn new(
        data: &DataNode,
        config: MindMapConfig,
        measurer: Box<dyn TextMeasurer>,
        canvas: CanvasSize,
        now: f64,
    ) -> Result<Self, LoadError> {
        let tree = assign_identities(data)?;
        Ok(Self::with_tree(tree, config, measurer, canvas, now))
    }

    pub fn from_json(
        json: &str,
        config: MindMapConfig,
        measurer: Box<dyn TextMeasurer>,
        canvas: CanvasSize,
        now: f64,
    ) -> Result<Self, LoadError> {
        let tree = MindTree::from_json(json)?;
        Ok(Self::with_tree(tree, config, measurer, canvas, now))
    }

    fn with_tree(
        tree: MindTree,
        config: MindMapConfig,
        measurer: Box<dyn TextMeasurer>,
        canvas: CanvasSize,
        now: f64,
    ) -> Self {
        let visibility = VisibilityState::initialize(&tree, config.collapse);
        let scene = RenderScene::new(&config);
        let viewport = ViewportController::new(config.viewport, config.transition);

        let mut session = Self {
            config,
            tree,
            visibility,
            measurer,
            layout: Layout::default(),
            scene,
            viewport,
            interaction: Interaction::new(),
            canvas,
        };
        let root = session.tree.root_id();
        session.relayout(root, now);
        session
    }

    fn relayout(&mut self, anchor: NodeId, now: f64) {
        let anchor_previous = self.visibility.position(anchor).unwrap_or_default();
        self.layout = compute_layout(
            &self.tree,
            &self.visibility,
            self.measurer.as_ref(),
            &self.config.layout,
        );
        self.scene.render(&self.layout, anchor, anchor_previous, now);
        self.visibility.record_positions(&self.layout);
        self.viewport.fit(&self.layout, self.canvas, now);
    }

    /// Expand or collapse `id`. No-ops (leaf, unknown, hidden) leave the
    /// scene and viewport untouched.
    pub fn toggle(&mut self, id: NodeId, now: f64) -> ToggleOutcome {
        let outcome = self.visibility.toggle(&self.tree, id);
        log::debug!("toggle {id:?}: {outcome:?}");
        if outcome.changed() {
            self.relayout(id, now);
        }
        outcome
    }

    /// Feed one input event; returns the actions it produced after applying
    /// them.
    pub fn handle_input(&mut self, event: InputEvent, now: f64) -> SmallVec<[Action; 2]> {
        let hit = event
            .position()
            .and_then(|(x, y)| self.node_at(x, y, now));
        let actions = self.interaction.handle(&event, hit);
        for action in &actions {
            match *action {
                Action::Toggle(id) => {
                    self.toggle(id, now);
                }
                Action::Pan { dx, dy } => self.pan(dx, dy, now),
                Action::Zoom { factor, x, y } => self.zoom_around(factor, x, y, now),
                Action::Hover { id, x, y } => self.scene.set_hover(id, Point::new(x, y)),
            }
        }
        actions
    }

    /// Node under a screen-space point, if any.
    pub fn node_at(&self, x: f32, y: f32, now: f64) -> Option<NodeId> {
        hit_test(&self.frame(now), x, y)
    }

    /// Hover whatever is under the pointer and return it.
    pub fn hover_at(&mut self, x: f32, y: f32, now: f64) -> Option<NodeId> {
        let hit = self.node_at(x, y, now);
        self.scene.set_hover(hit, Point::new(x, y));
        self.scene.hovered()
    }

    pub fn clear_hover(&mut self) {
        self.scene.set_hover(None, Point::default());
    }

    pub fn pan(&mut self, dx: f32, dy: f32, now: f64) {
        self.viewport.pan(dx, dy, now);
    }

    pub fn zoom_around(&mut self, factor: f32, x: f32, y: f32, now: f64) {
        self.viewport.zoom_around(factor, Point::new(x, y), now);
    }

    /// Resize the canvas. Refits unless the user has taken over the view.
    pub fn resize(&mut self, width: f32, height: f32, now: f64) {
        self.canvas = CanvasSize::new(width, height);
        if !self.viewport.is_user_controlled() {
            self.viewport.fit(&self.layout, self.canvas, now);
        }
    }

    /// Advance time: drops finished exits. Returns whether anything is still
    /// animating.
    pub fn tick(&mut self, now: f64) -> bool {
        self.scene.tick(now);
        self.is_animating(now)
    }

    pub fn is_animating(&self, now: f64) -> bool {
        self.scene.is_animating(now) || self.viewport.is_animating(now)
    }

    pub fn frame(&self, now: f64) -> Frame {
        self.scene.frame(
            now,
            self.viewport.current(now),
            self.canvas.width,
            self.canvas.height,
        )
    }

    pub fn export_svg(&self, now: f64) -> Option<SvgDocument> {
        export_svg(&self.frame(now))
    }

    pub fn tree(&self) -> &MindTree {
        &self.tree
    }

    pub fn visibility(&self) -> &VisibilityState {
        &self.visibility
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn scene(&self) -> &RenderScene {
        &self.scene
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    pub fn config(&self) -> &MindMapConfig {
        &self.config
    }
}
