//! Input abstraction layer.
//!
//! Normalizes mouse, touch and wheel events from the host into a unified
//! `InputEvent` consumed by [`Interaction`](crate::interaction::Interaction).
//! Coordinates are in screen space (canvas element pixels).

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed (mouse down, touch start).
    PointerDown { x: f32, y: f32 },

    PointerMove { x: f32, y: f32 },

    PointerUp { x: f32, y: f32 },

    /// Pointer left the canvas; cancels any press and hover.
    PointerLeave,

    /// Wheel or pinch. Positive `delta_y` zooms out.
    Wheel { x: f32, y: f32, delta_y: f32 },
}

impl InputEvent {
    /// Extract position if this event carries one.
    pub fn position(&self) -> Option<(f32, f32)> {
        match *self {
            Self::PointerDown { x, y }
            | Self::PointerMove { x, y }
            | Self::PointerUp { x, y }
            | Self::Wheel { x, y, .. } => Some((x, y)),
            Self::PointerLeave => None,
        }
    }
}
