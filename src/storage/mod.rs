//! Configuration file loading and application paths.

pub mod config;
pub mod paths;

pub use config::{FileConfig, ResolvedConfig};
pub use paths::AppPaths;
