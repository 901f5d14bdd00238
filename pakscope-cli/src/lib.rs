//! CLI interface for pakscope
//!
//! Argument parsing and the stdout command sink used by the `pakscope`
//! binary.

pub mod args;
pub mod sink;

pub use args::{Cli, Commands};
pub use sink::WriterCommandSink;
