pub mod config;
pub mod tree;

pub use config::*;
pub use tree::*;
