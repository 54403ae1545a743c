//! Output rendering: plain-text table and JSON envelope.

pub mod json;
pub mod table;

pub use json::{render_json, render_json_pretty};
pub use table::render_table;
