pub mod check;
pub mod move_ops;
pub mod resolve;
