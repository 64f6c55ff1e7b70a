//! Retained render scene with enter / update / exit transitions.
//!
//! Every rendered node and link is a visual keyed by node id (links by their
//! child's id). A render pass reconciles the visuals against a new layout and
//! starts one transition per visual; sampling the scene at a timestamp yields
//! a [`Frame`]. Colors are resolved per frame from the tier, the node's own
//! color hint and the hover state, so nothing has to be restored on un-hover.

use crate::reconcile::reconcile;
use crate::transition::{Interpolate, Transition};
use indexmap::IndexMap;
use mm_core::config::{MindMapConfig, Orientation, Palette, TransitionConfig};
use mm_core::frame::{Frame, FrameEdge, FrameNode, Tooltip, ViewportTransform};
use mm_core::id::NodeId;
use mm_core::layout::Layout;
use mm_core::model::{Color, FontSpec, Point, Tier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Entering,
    Updating,
    Exiting,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct NodePose {
    position: Point,
    opacity: f32,
}

impl Interpolate for NodePose {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        NodePose {
            position: self.position.lerp(to.position, t),
            opacity: self.opacity.interpolate(&to.opacity, t),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct EdgePose {
    from: Point,
    to: Point,
    opacity: f32,
}

impl Interpolate for EdgePose {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        EdgePose {
            from: self.from.lerp(to.from, t),
            to: self.to.lerp(to.to, t),
            opacity: self.opacity.interpolate(&to.opacity, t),
        }
    }
}

#[derive(Debug, Clone)]
struct NodeVisual {
    label: String,
    tier: Tier,
    color: Option<Color>,
    width: f32,
    height: f32,
    collapsed: bool,
    phase: Phase,
    motion: Transition<NodePose>,
}

#[derive(Debug, Clone)]
struct EdgeVisual {
    source: NodeId,
    phase: Phase,
    motion: Transition<EdgePose>,
}

#[derive(Debug, Clone)]
struct Hover {
    id: NodeId,
    /// Screen space.
    pointer: Point,
}

#[derive(Debug, Clone)]
pub struct RenderScene {
    nodes: IndexMap<NodeId, NodeVisual>,
    /// Keyed by target node.
    edges: IndexMap<NodeId, EdgeVisual>,
    hover: Option<Hover>,
    root_label: String,
    orientation: Orientation,
    transition: TransitionConfig,
    palette: Palette,
    font: FontSpec,
}

impl RenderScene {
    pub fn new(config: &MindMapConfig) -> Self {
        Self {
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
            hover: None,
            root_label: String::new(),
            orientation: config.layout.orientation,
            transition: config.transition,
            palette: config.palette.clone(),
            font: config.layout.font.clone(),
        }
    }

    /// Reconcile against `layout`, anchoring entering and exiting visuals at
    /// `anchor` (previous position for entering, new position for exiting).
    pub fn render(&mut self, layout: &Layout, anchor: NodeId, anchor_previous: Point, now: f64) {
        let anchor_next = layout
            .node(anchor)
            .map(|n| n.position)
            .unwrap_or(anchor_previous);
        let cfg = self.transition;
        self.orientation = layout.orientation;
        if let Some(root) = layout.root() {
            self.root_label = root.label.clone();
        }

        // ── Nodes ──
        let previous: Vec<NodeId> = self.nodes.keys().copied().collect();
        let plan = reconcile(&previous, &layout.ids());
        log::trace!(
            "reconcile nodes: +{} ~{} -{}",
            plan.entering.len(),
            plan.updating.len(),
            plan.exiting.len()
        );

        let mut old = std::mem::take(&mut self.nodes);
        let mut next = IndexMap::with_capacity(old.len().max(layout.len()));

        for id in &plan.exiting {
            let Some(mut visual) = old.swap_remove(id) else {
                continue;
            };
            let target = NodePose {
                position: anchor_next,
                opacity: 0.0,
            };
            visual.motion = visual.motion.retarget(target, now, &cfg);
            visual.phase = Phase::Exiting;
            next.insert(*id, visual);
        }

        for laid in &layout.nodes {
            let target = NodePose {
                position: laid.position,
                opacity: 1.0,
            };
            let (motion, phase) = match old.swap_remove(&laid.id) {
                Some(existing) => (existing.motion.retarget(target, now, &cfg), Phase::Updating),
                None => {
                    let start = NodePose {
                        position: anchor_previous,
                        opacity: 0.0,
                    };
                    (Transition::new(start, target, now, &cfg), Phase::Entering)
                }
            };
            next.insert(
                laid.id,
                NodeVisual {
                    label: laid.label.clone(),
                    tier: laid.tier,
                    color: laid.color,
                    width: laid.width,
                    height: laid.height,
                    collapsed: laid.is_collapsed(),
                    phase,
                    motion,
                },
            );
        }
        self.nodes = next;

        // ── Edges ──
        let previous: Vec<NodeId> = self.edges.keys().copied().collect();
        let targets: Vec<NodeId> = layout.edges.iter().map(|e| e.target).collect();
        let plan = reconcile(&previous, &targets);
        log::trace!(
            "reconcile links: +{} ~{} -{}",
            plan.entering.len(),
            plan.updating.len(),
            plan.exiting.len()
        );

        let mut old = std::mem::take(&mut self.edges);
        let mut next = IndexMap::with_capacity(old.len().max(layout.edges.len()));

        for id in &plan.exiting {
            let Some(mut visual) = old.swap_remove(id) else {
                continue;
            };
            let target = EdgePose {
                from: anchor_next,
                to: anchor_next,
                opacity: 0.0,
            };
            visual.motion = visual.motion.retarget(target, now, &cfg);
            visual.phase = Phase::Exiting;
            next.insert(*id, visual);
        }

        for edge in &layout.edges {
            let Some((from, to)) = layout.edge_points(edge) else {
                continue;
            };
            let target = EdgePose {
                from,
                to,
                opacity: 1.0,
            };
            let (motion, phase) = match old.swap_remove(&edge.target) {
                Some(existing) => (existing.motion.retarget(target, now, &cfg), Phase::Updating),
                None => {
                    let start = EdgePose {
                        from: anchor_previous,
                        to: anchor_previous,
                        opacity: 0.0,
                    };
                    (Transition::new(start, target, now, &cfg), Phase::Entering)
                }
            };
            next.insert(
                edge.target,
                EdgeVisual {
                    source: edge.source,
                    phase,
                    motion,
                },
            );
        }
        self.edges = next;

        if self.hover.as_ref().is_some_and(|h| !self.is_shown(h.id)) {
            self.hover = None;
        }
    }

    /// Drop exiting visuals whose transition has finished and settle the
    /// rest. Returns whether anything was removed.
    pub fn tick(&mut self, now: f64) -> bool {
        let before = self.nodes.len() + self.edges.len();
        self.nodes
            .retain(|_, v| !(v.phase == Phase::Exiting && v.motion.is_finished(now)));
        self.edges
            .retain(|_, v| !(v.phase == Phase::Exiting && v.motion.is_finished(now)));
        for v in self.nodes.values_mut() {
            if v.phase == Phase::Entering && v.motion.is_finished(now) {
                v.phase = Phase::Updating;
            }
        }
        for v in self.edges.values_mut() {
            if v.phase == Phase::Entering && v.motion.is_finished(now) {
                v.phase = Phase::Updating;
            }
        }
        let removed = before - (self.nodes.len() + self.edges.len());
        if removed > 0 {
            log::trace!("tick: removed {removed} exited visuals");
        }
        removed > 0
    }

    pub fn is_animating(&self, now: f64) -> bool {
        self.nodes.values().any(|v| !v.motion.is_finished(now))
            || self.edges.values().any(|v| !v.motion.is_finished(now))
    }

    /// Highlight `id` and show its tooltip at `pointer` (screen space).
    /// `None`, or an id that is not currently shown, clears the hover.
    pub fn set_hover(&mut self, id: Option<NodeId>, pointer: Point) {
        self.hover = id
            .filter(|id| self.is_shown(*id))
            .map(|id| Hover { id, pointer });
    }

    /// Rendered and not animating out.
    fn is_shown(&self, id: NodeId) -> bool {
        matches!(self.phase_of(id), Some(Phase::Entering | Phase::Updating))
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hover.as_ref().map(|h| h.id)
    }

    pub fn phase_of(&self, id: NodeId) -> Option<Phase> {
        self.nodes.get(&id).map(|v| v.phase)
    }

    /// Number of node visuals, including those still animating out.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.hover = None;
        self.root_label.clear();
    }

    /// Sample the scene at `now`.
    pub fn frame(
        &self,
        now: f64,
        viewport: ViewportTransform,
        canvas_width: f32,
        canvas_height: f32,
    ) -> Frame {
        let hovered = self.hovered();
        let highlight = self.palette.highlight;

        let nodes = self
            .nodes
            .iter()
            .map(|(id, v)| {
                let pose = v.motion.value(now);
                let style = self.palette.tier(v.tier);
                let lit = hovered == Some(*id);
                FrameNode {
                    id: *id,
                    label: v.label.clone(),
                    tier: v.tier,
                    position: pose.position,
                    width: v.width,
                    height: v.height,
                    opacity: pose.opacity,
                    fill: if lit {
                        highlight
                    } else {
                        v.color.unwrap_or(style.fill)
                    },
                    stroke: if lit { highlight } else { style.stroke },
                    text: style.text,
                    collapsed: v.collapsed,
                    highlighted: lit,
                    exiting: v.phase == Phase::Exiting,
                }
            })
            .collect();

        let edges = self
            .edges
            .iter()
            .map(|(target, v)| {
                let pose = v.motion.value(now);
                let lit = hovered.is_some_and(|h| h == *target || h == v.source);
                FrameEdge {
                    source: v.source,
                    target: *target,
                    from: pose.from,
                    to: pose.to,
                    opacity: pose.opacity,
                    color: if lit { highlight } else { self.palette.link },
                    highlighted: lit,
                    exiting: v.phase == Phase::Exiting,
                }
            })
            .collect();

        let tooltip = self.hover.as_ref().and_then(|h| {
            self.nodes.get(&h.id).map(|v| Tooltip {
                text: v.label.clone(),
                x: h.pointer.x,
                y: h.pointer.y,
            })
        });

        Frame {
            nodes,
            edges,
            viewport,
            tooltip,
            canvas_width,
            canvas_height,
            orientation: self.orientation,
            font: self.font.clone(),
            background: self.palette.background,
            indicator: self.palette.indicator,
            tooltip_fill: self.palette.tooltip_bg,
            tooltip_text: self.palette.tooltip_text,
            root_label: self.root_label.clone(),
        }
    }
}
