//! Pointer gestures → mind map actions.
//!
//! | Gesture | Action |
//! |---------|--------|
//! | press + release on the same node, little movement | toggle that node |
//! | press + drag (anywhere) | pan the viewport |
//! | move without a press | hover the node under the pointer |
//! | wheel | zoom around the pointer |

use crate::input::InputEvent;
use mm_core::id::NodeId;
use smallvec::{SmallVec, smallvec};

/// Movement (screen px) beyond which a press becomes a drag.
const CLICK_SLOP: f32 = 4.0;
/// Wheel delta → zoom exponent.
const WHEEL_ZOOM_RATE: f32 = 0.002;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Toggle(NodeId),
    Pan { dx: f32, dy: f32 },
    Zoom { factor: f32, x: f32, y: f32 },
    Hover { id: Option<NodeId>, x: f32, y: f32 },
}

#[derive(Debug, Clone, Copy)]
struct Press {
    start_x: f32,
    start_y: f32,
    last_x: f32,
    last_y: f32,
    node: Option<NodeId>,
    dragging: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Interaction {
    press: Option<Press>,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.press.is_some_and(|p| p.dragging)
    }

    /// Translate one event. `hit` is the node under the event's position.
    pub fn handle(&mut self, event: &InputEvent, hit: Option<NodeId>) -> SmallVec<[Action; 2]> {
        match *event {
            InputEvent::PointerDown { x, y } => {
                self.press = Some(Press {
                    start_x: x,
                    start_y: y,
                    last_x: x,
                    last_y: y,
                    node: hit,
                    dragging: false,
                });
                SmallVec::new()
            }

            InputEvent::PointerMove { x, y } => match self.press.as_mut() {
                Some(press) => {
                    if !press.dragging {
                        let moved = (x - press.start_x).hypot(y - press.start_y);
                        if moved <= CLICK_SLOP {
                            return SmallVec::new();
                        }
                        press.dragging = true;
                    }
                    let (dx, dy) = (x - press.last_x, y - press.last_y);
                    press.last_x = x;
                    press.last_y = y;
                    smallvec![Action::Pan { dx, dy }]
                }
                None => smallvec![Action::Hover { id: hit, x, y }],
            },

            InputEvent::PointerUp { x, y } => {
                let mut actions = SmallVec::new();
                if let Some(press) = self.press.take()
                    && !press.dragging
                    && let Some(id) = press.node
                    && hit == Some(id)
                {
                    actions.push(Action::Toggle(id));
                }
                actions.push(Action::Hover { id: hit, x, y });
                actions
            }

            InputEvent::PointerLeave => {
                self.press = None;
                smallvec![Action::Hover {
                    id: None,
                    x: 0.0,
                    y: 0.0
                }]
            }

            InputEvent::Wheel { x, y, delta_y } => {
                let factor = (-delta_y * WHEEL_ZOOM_RATE).exp();
                smallvec![Action::Zoom { factor, x, y }]
            }
        }
    }
}
