pub mod config;
pub mod error;
pub mod frame;
pub mod id;
pub mod layout;
pub mod model;
pub mod tree;
pub mod visibility;

pub use config::{
    CollapsePolicy, Easing, LayoutConfig, MindMapConfig, Orientation, Palette, TierStyle,
    TransitionConfig, ViewportConfig,
};
pub use error::LoadError;
pub use frame::{Frame, FrameEdge, FrameNode, Tooltip, ViewportTransform};
pub use id::{IdAllocator, NodeId};
pub use layout::{
    EstimatingMeasurer, LaidOutNode, Layout, LayoutEdge, TextMeasurer, TreePosition,
    compute_layout, estimate_text_width,
};
pub use model::*;
pub use tree::{MindTree, TreeNode, assign_identities};
pub use visibility::{ToggleOutcome, ViewState, VisibilityState};

// Re-export petgraph types so downstream crates don't need a direct dependency
pub use petgraph::graph::NodeIndex;
