//! Hierarchical drag-reorder engine.
//!
//! A tree of processes, nested subprocesses and leaf activities is
//! rearranged by a stream of drag lifecycle events. Cross-container moves
//! apply live while hovering; same-container reorders apply on drop. Every
//! change lands in a working snapshot that can be confirmed or rolled back
//! to the last checkpoint as a whole.

pub mod cli;
pub mod io;
pub mod model;
pub mod ops;
pub mod parse;
pub mod session;

pub use model::{EngineConfig, ItemKind, Tree};
pub use session::{ActivePreview, DragState, Engine, EngineEvent};
