//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};

/// Agent Quota Status - check AI coding assistant rate limits.
#[derive(Parser, Debug)]
#[command(name = "aqs")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    // === Global flags ===
    /// Output JSON instead of the table
    #[arg(long, global = true)]
    pub json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Disable colored output (NO_COLOR is also honored)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log level
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show quota status for providers (default command)
    Status(StatusArgs),

    /// Serve the quota_status tool over MCP on stdio
    Mcp(McpArgs),
}

/// Arguments for the `status` command.
#[derive(Parser, Debug, Default)]
pub struct StatusArgs {
    /// Providers to query (comma-separated names, or "all")
    #[arg(long, value_name = "LIST")]
    pub providers: Option<String>,

    /// Per-provider timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

/// Arguments for the `mcp` command.
#[derive(Parser, Debug, Default)]
pub struct McpArgs {
    /// Per-provider timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}
