pub mod script_parser;

pub use script_parser::{ScriptError, parse_script};
