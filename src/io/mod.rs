pub mod config_io;
pub mod tree_io;
