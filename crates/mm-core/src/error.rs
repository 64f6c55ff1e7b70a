//! Errors raised while turning external input into a [`MindTree`](crate::tree::MindTree).

use thiserror::Error;

/// A tree that cannot be loaded. Raised before any layout or render.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Malformed JSON, a missing `name`, or `children` that is not an array.
    #[error("invalid mind map JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("the root node has no label")]
    MissingRootLabel,

    /// The same explicit id was supplied on two nodes.
    #[error("duplicate node id `{0}`")]
    DuplicateId(String),
}
