//! Time-sliced value transitions.
//!
//! A transition is a pure function of a caller-supplied clock (milliseconds),
//! so sampling it never mutates anything and retargeting is just building a
//! new transition from the currently sampled value.

use mm_core::config::{Easing, TransitionConfig};
use mm_core::frame::ViewportTransform;
use mm_core::model::Point;

/// Values that can be blended linearly.
pub trait Interpolate: Copy {
    /// `t = 0` yields `self`, `t = 1` yields `to`.
    fn interpolate(&self, to: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Interpolate for Point {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        self.lerp(*to, t)
    }
}

impl Interpolate for ViewportTransform {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        self.lerp(to, t)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition<T> {
    pub from: T,
    pub to: T,
    start_ms: f64,
    duration_ms: f64,
    easing: Easing,
}

impl<T: Interpolate> Transition<T> {
    pub fn new(from: T, to: T, start_ms: f64, config: &TransitionConfig) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms: config.duration_ms.max(0.0),
            easing: config.easing,
        }
    }

    /// A transition that is already at rest on `value`.
    pub fn settled(value: T) -> Self {
        Self {
            from: value,
            to: value,
            start_ms: 0.0,
            duration_ms: 0.0,
            easing: Easing::Linear,
        }
    }

    /// Linear progress in [0, 1].
    pub fn progress(&self, now_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }

    pub fn value(&self, now_ms: f64) -> T {
        let p = self.progress(now_ms);
        if p >= 1.0 {
            return self.to;
        }
        self.from.interpolate(&self.to, self.easing.apply(p))
    }

    /// Restart toward `to` from wherever this transition is at `now_ms`.
    pub fn retarget(&self, to: T, now_ms: f64, config: &TransitionConfig) -> Self {
        Self::new(self.value(now_ms), to, now_ms, config)
    }
}
