//! Engine module: command-line surface and run dispatch

pub mod arg_parser;
pub mod cli;

pub use arg_parser::Cli;
pub use cli::{emit_records, handle_run, setup_opts};
