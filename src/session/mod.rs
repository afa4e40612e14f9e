pub mod checkpoint;
pub mod drag;
pub mod engine;

pub use checkpoint::Checkpoint;
pub use drag::{ActivePreview, DragSession, DragState};
pub use engine::{Engine, EngineEvent, InvalidTree};
