//! CLI module for opencti-mcp - command-line interface and subcommands.
//!
//! With no subcommand the binary serves MCP on stdio; the other
//! subcommands run a single tool and print its text.

pub mod commands;

pub use commands::Cli;
