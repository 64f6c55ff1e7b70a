pub mod input;
pub mod interaction;
pub mod reconcile;
pub mod scene;
pub mod session;
pub mod transition;
pub mod viewport;

pub use input::InputEvent;
pub use interaction::{Action, Interaction};
pub use reconcile::{Reconciliation, reconcile};
pub use scene::RenderScene;
pub use session::MindMapSession;
pub use transition::{Interpolate, Transition};
pub use viewport::{CanvasSize, ViewportController, auto_fit, fit_layout};
