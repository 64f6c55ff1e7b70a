//! Viewport control: auto-fit after layout changes, direct pan and zoom.
//!
//! The controller owns a [`Transition`] over [`ViewportTransform`], so a fit
//! animates from wherever the view currently is. User gestures bypass the
//! transition and hold until the next fit.

use crate::transition::Transition;
use mm_core::config::{TransitionConfig, ViewportConfig};
use mm_core::frame::ViewportTransform;
use mm_core::layout::Layout;
use mm_core::model::{Bounds, Point};

/// Extents below this are treated as zero.
const DEGENERATE_EXTENT: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl CanvasSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Transform that centers `bounds` in `canvas` at the largest scale that
/// fits, capped at `max_scale`. Zero-extent boxes get scale 1.
pub fn auto_fit(
    bounds: Bounds,
    canvas: CanvasSize,
    max_scale: f32,
    padding: f32,
) -> ViewportTransform {
    let avail_w = (canvas.width - 2.0 * padding).max(0.0);
    let avail_h = (canvas.height - 2.0 * padding).max(0.0);

    let degenerate = bounds.width <= DEGENERATE_EXTENT || bounds.height <= DEGENERATE_EXTENT;
    let scale = if degenerate {
        1.0
    } else {
        (avail_w / bounds.width)
            .min(avail_h / bounds.height)
            .min(max_scale)
    };
    // A zero-sized canvas would otherwise collapse the view to nothing.
    let scale = if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    };

    let center = bounds.center();
    ViewportTransform {
        translate_x: canvas.width / 2.0 - center.x * scale,
        translate_y: canvas.height / 2.0 - center.y * scale,
        scale,
    }
}

/// Fit the target positions of `layout`. A lone node is fitted as a point,
/// which keeps it at scale 1. `None` for an empty layout.
pub fn fit_layout(
    layout: &Layout,
    canvas: CanvasSize,
    config: &ViewportConfig,
) -> Option<ViewportTransform> {
    let bounds = match layout.nodes.as_slice() {
        [] => return None,
        [only] => Bounds::centered(only.position, 0.0, 0.0),
        _ => layout.bounds()?,
    };
    Some(auto_fit(
        bounds,
        canvas,
        config.max_fit_scale,
        config.fit_padding,
    ))
}

#[derive(Debug, Clone)]
pub struct ViewportController {
    config: ViewportConfig,
    transition: TransitionConfig,
    current: Transition<ViewportTransform>,
    user_override: bool,
}

impl ViewportController {
    pub fn new(config: ViewportConfig, transition: TransitionConfig) -> Self {
        Self {
            config,
            transition,
            current: Transition::settled(ViewportTransform::IDENTITY),
            user_override: false,
        }
    }

    /// Animate toward `target` from the current interpolated transform.
    /// Ends any user override.
    pub fn animate_to(&mut self, target: ViewportTransform, now: f64) {
        self.current = self.current.retarget(target, now, &self.transition);
        self.user_override = false;
    }

    /// Fit `layout` into `canvas` and animate there.
    pub fn fit(&mut self, layout: &Layout, canvas: CanvasSize, now: f64) -> Option<ViewportTransform> {
        let target = fit_layout(layout, canvas, &self.config)?;
        log::debug!(
            "auto-fit: scale {:.3} translate ({:.1}, {:.1})",
            target.scale,
            target.translate_x,
            target.translate_y
        );
        self.animate_to(target, now);
        Some(target)
    }

    /// Jump without animation.
    pub fn set(&mut self, vt: ViewportTransform) {
        self.current = Transition::settled(vt);
    }

    pub fn current(&self, now: f64) -> ViewportTransform {
        self.current.value(now)
    }

    /// Where the current animation ends.
    pub fn target(&self) -> ViewportTransform {
        self.current.to
    }

    pub fn is_animating(&self, now: f64) -> bool {
        !self.current.is_finished(now)
    }

    /// Whether a user gesture has taken over since the last fit.
    pub fn is_user_controlled(&self) -> bool {
        self.user_override
    }

    /// Pan by a screen-space delta.
    pub fn pan(&mut self, dx: f32, dy: f32, now: f64) {
        let mut vt = self.current(now);
        vt.translate_x += dx;
        vt.translate_y += dy;
        self.set(vt);
        self.user_override = true;
    }

    /// Zoom by `factor`, keeping the canvas point under `screen` fixed.
    pub fn zoom_around(&mut self, factor: f32, screen: Point, now: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let vt = self.current(now);
        let anchor = vt.screen_to_canvas(screen);
        let scale = (vt.scale * factor).clamp(self.config.min_zoom, self.config.max_zoom);
        self.set(ViewportTransform {
            translate_x: screen.x - anchor.x * scale,
            translate_y: screen.y - anchor.y * scale,
            scale,
        });
        self.user_override = true;
    }

    pub fn screen_to_canvas(&self, screen: Point, now: f64) -> Point {
        self.current(now).screen_to_canvas(screen)
    }

    pub fn canvas_to_screen(&self, canvas: Point, now: f64) -> Point {
        self.current(now).canvas_to_screen(canvas)
    }
}
