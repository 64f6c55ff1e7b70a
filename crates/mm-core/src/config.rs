//! Engine configuration.
//!
//! Every struct is `#[serde(default)]`, so a host can pass a partial JSON
//! object and keep the defaults for everything it leaves out.

use crate::model::{Color, FontSpec, Tier};
use serde::{Deserialize, Serialize};

// ─── Top level ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MindMapConfig {
    pub layout: LayoutConfig,
    pub collapse: CollapsePolicy,
    pub transition: TransitionConfig,
    pub viewport: ViewportConfig,
    pub palette: Palette,
}

impl MindMapConfig {
    /// Parse a (possibly partial) JSON config object.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ─── Layout ──────────────────────────────────────────────────────────────

/// Which canvas axis the tree grows along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Depth on x, siblings stacked on y.
    #[default]
    LeftToRight,
    /// Depth on y, siblings spread on x.
    TopToBottom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub orientation: Orientation,
    /// Distance between tiers along the depth axis.
    pub depth_separation: f32,
    /// Base sibling spacing; scaled by 1.2 (same parent) or 1.5 (cousins).
    pub sibling_separation: f32,
    pub node_height: f32,
    /// Horizontal padding on each side of a label.
    pub padding_x: f32,
    pub min_width: f32,
    pub font: FontSpec,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::LeftToRight,
            depth_separation: 200.0,
            sibling_separation: 40.0,
            node_height: 32.0,
            padding_x: 12.0,
            min_width: 60.0,
            font: FontSpec::default(),
        }
    }
}

/// How much of a freshly loaded tree is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollapsePolicy {
    /// Nodes at depth `<= visible_depth` start visible; everything at depth
    /// `>= visible_depth` starts collapsed.
    pub visible_depth: usize,
}

impl Default for CollapsePolicy {
    fn default() -> Self {
        Self { visible_depth: 1 }
    }
}

// ─── Animation ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    #[default]
    CubicInOut,
}

impl Easing {
    /// Map linear progress `t` in [0, 1] to eased progress.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// Shared by node, edge and viewport transitions.
    pub duration_ms: f64,
    pub easing: Easing,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration_ms: 750.0,
            easing: Easing::CubicInOut,
        }
    }
}

// ─── Viewport ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Auto-fit never zooms in past this.
    pub max_fit_scale: f32,
    /// Space kept free on each canvas side when fitting.
    pub fit_padding: f32,
    /// Zoom range for user gestures.
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            max_fit_scale: 1.5,
            fit_padding: 0.0,
            min_zoom: 0.1,
            max_zoom: 4.0,
        }
    }
}

// ─── Palette ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierStyle {
    pub fill: Color,
    pub stroke: Color,
    pub text: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub root: TierStyle,
    pub first: TierStyle,
    pub second: TierStyle,
    pub default: TierStyle,
    pub link: Color,
    pub highlight: Color,
    pub indicator: Color,
    pub background: Color,
    pub tooltip_bg: Color,
    pub tooltip_text: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            root: TierStyle {
                fill: Color::rgb(0x4F, 0x46, 0xE5),
                stroke: Color::rgb(0x37, 0x30, 0xA3),
                text: Color::rgb(0xFF, 0xFF, 0xFF),
            },
            first: TierStyle {
                fill: Color::rgb(0x0E, 0xA5, 0xE9),
                stroke: Color::rgb(0x03, 0x69, 0xA1),
                text: Color::rgb(0xFF, 0xFF, 0xFF),
            },
            second: TierStyle {
                fill: Color::rgb(0x10, 0xB9, 0x81),
                stroke: Color::rgb(0x04, 0x78, 0x57),
                text: Color::rgb(0xFF, 0xFF, 0xFF),
            },
            default: TierStyle {
                fill: Color::rgb(0xF8, 0xFA, 0xFC),
                stroke: Color::rgb(0x94, 0xA3, 0xB8),
                text: Color::rgb(0x1E, 0x29, 0x3B),
            },
            link: Color::rgb(0x94, 0xA3, 0xB8),
            highlight: Color::rgb(0xF4, 0x3F, 0x5E),
            indicator: Color::rgb(0xF5, 0x9E, 0x0B),
            background: Color::rgb(0xFF, 0xFF, 0xFF),
            tooltip_bg: Color::rgb(0x1E, 0x29, 0x3B),
            tooltip_text: Color::rgb(0xFF, 0xFF, 0xFF),
        }
    }
}

impl Palette {
    pub fn tier(&self, tier: Tier) -> &TierStyle {
        match tier {
            Tier::Root => &self.root,
            Tier::First => &self.first,
            Tier::Second => &self.second,
            Tier::Default => &self.default,
        }
    }
}
