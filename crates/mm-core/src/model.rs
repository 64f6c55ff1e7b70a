//! Core data model for mind maps.
//!
//! `DataNode` is the externally supplied, read-only description of a tree
//! (deserialized from the generator's JSON). Everything the engine derives
//! from it (ids, visibility, positions) lives in separate structures keyed
//! by [`NodeId`](crate::id::NodeId).

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ─── Input tree ──────────────────────────────────────────────────────────

/// One node of the externally supplied tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataNode {
    /// Display label.
    pub name: String,

    /// Pre-supplied identifier. Nodes without one get a synthesized id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Ordered children. Absent or `null` means leaf.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DataNode>>,

    /// Optional fill override (`#RRGGBB`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl DataNode {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            children: None,
            color: None,
        }
    }

    pub fn branch(name: impl Into<String>, children: Vec<DataNode>) -> Self {
        Self {
            name: name.into(),
            id: None,
            children: Some(children),
            color: None,
        }
    }

    /// Builder-style explicit id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn children(&self) -> &[DataNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Total node count of this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children().iter().map(DataNode::count).sum::<usize>()
    }
}

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Channels are 0..=255, alpha is 0.0..=1.0.
///
/// Serializes as an opaque `#RRGGBB` string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse `#RGB` or `#RRGGBB` (the `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            3 => {
                let mut out = [0u8; 3];
                for (slot, i) in out.iter_mut().zip(0..3) {
                    *slot = channel(&digits[i..=i])? * 17;
                }
                Some(Self::rgb(out[0], out[1], out[2]))
            }
            6 => Some(Self::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => None,
        }
    }

    /// `#RRGGBB`, alpha dropped.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// CSS color string; `rgba(..)` when translucent.
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            self.to_hex()
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color `{s}`")))
    }
}

// ─── Font / Text ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSpec {
    pub family: String,
    pub weight: u16,
    pub size: f32,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "system-ui, sans-serif".into(),
            weight: 500,
            size: 14.0,
        }
    }
}

impl FontSpec {
    /// CSS `font` shorthand, e.g. `500 14px system-ui, sans-serif`.
    pub fn css(&self) -> String {
        format!("{} {}px {}", self.weight, self.size, self.family)
    }
}

// ─── Geometry ────────────────────────────────────────────────────────────

/// A point in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Linear interpolation; `t = 0` yields `self`.
    pub fn lerp(self, to: Point, t: f32) -> Point {
        Point::new(self.x + (to.x - self.x) * t, self.y + (to.y - self.y) * t)
    }
}

/// Axis-aligned box in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    /// Box of the given size centered on `center`.
    pub fn centered(center: Point, width: f32, height: f32) -> Self {
        Self {
            x: center.x - width / 2.0,
            y: center.y - height / 2.0,
            width,
            height,
        }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max_x = (self.x + self.width).max(other.x + other.width);
        let max_y = (self.y + self.height).max(other.y + other.height);
        Bounds {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }

    /// Smallest box covering every item, `None` for an empty iterator.
    pub fn union_all(items: impl IntoIterator<Item = Bounds>) -> Option<Bounds> {
        items.into_iter().reduce(|acc, b| acc.union(&b))
    }
}

// ─── Classification ──────────────────────────────────────────────────────

/// Color classification of a node by depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Root,
    First,
    Second,
    Default,
}

impl Tier {
    pub fn for_depth(depth: usize) -> Self {
        match depth {
            0 => Tier::Root,
            1 => Tier::First,
            2 => Tier::Second,
            _ => Tier::Default,
        }
    }

    /// Class name used by SVG export.
    pub fn class_name(self) -> &'static str {
        match self {
            Tier::Root => "root",
            Tier::First => "tier-1",
            Tier::Second => "tier-2",
            Tier::Default => "tier-n",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_hex_roundtrip() {
        let c = Color::from_hex("#4F46E5").unwrap();
        assert_eq!(c, Color::rgb(0x4F, 0x46, 0xE5));
        assert_eq!(c.to_hex(), "#4F46E5");
        assert_eq!(Color::from_hex("fff"), Some(Color::rgb(255, 255, 255)));
        assert_eq!(Color::from_hex("#12"), None);
        assert_eq!(Color::from_hex("#zzzzzz"), None);
    }

    #[test]
    fn translucent_color_uses_rgba() {
        let c = Color::rgb(10, 20, 30).with_alpha(0.5);
        assert_eq!(c.to_css(), "rgba(10, 20, 30, 0.5)");
    }

    #[test]
    fn data_node_children_accept_null_and_absent() {
        let n: DataNode = serde_json::from_str(r#"{"name":"a","children":null}"#).unwrap();
        assert!(n.children().is_empty());
        let n: DataNode = serde_json::from_str(r#"{"name":"a"}"#).unwrap();
        assert!(n.children().is_empty());
    }

    #[test]
    fn data_node_rejects_non_array_children() {
        let err = serde_json::from_str::<DataNode>(r#"{"name":"a","children":"b"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn bounds_union() {
        let a = Bounds::centered(Point::new(0.0, 0.0), 10.0, 10.0);
        let b = Bounds::centered(Point::new(20.0, 0.0), 10.0, 4.0);
        let u = a.union(&b);
        assert_eq!(u.x, -5.0);
        assert_eq!(u.width, 30.0);
        assert_eq!(u.height, 10.0);
        assert!(Bounds::union_all(Vec::new()).is_none());
    }

    #[test]
    fn tier_by_depth() {
        assert_eq!(Tier::for_depth(0), Tier::Root);
        assert_eq!(Tier::for_depth(2), Tier::Second);
        assert_eq!(Tier::for_depth(7), Tier::Default);
    }
}
