//! Command-line interface.

pub mod args;
pub mod status;

pub use args::{Cli, Commands, McpArgs, StatusArgs};
