//! CLI command definitions using clap.
//!
//! Subcommands:
//! - serve: MCP server on stdio (default)
//! - search / observable / entity: run one tool and print the result
//! - tools: list the tool definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use opencti_mcp::tools::DEFAULT_SEARCH_LIMIT;

/// OpenCTI knowledge-base tools for AI agents, served over MCP
#[derive(Parser, Debug)]
#[command(name = "opencti-mcp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// The subcommand to run, `serve` when none was given
    pub fn subcommand(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Serve the tools over MCP on stdin/stdout
    Serve,

    /// Search entities and observables by keyword
    Search {
        /// Term to search for (name, IP, hash, ...)
        keyword: String,

        /// Maximum number of results
        #[arg(short, long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: u32,
    },

    /// Show details for an observable (IP, domain, hash)
    Observable {
        /// Exact observable value
        value: String,
    },

    /// Show a threat actor, malware or intrusion set
    Entity {
        /// Exact entity name
        name: String,
    },

    /// List the tools exposed to agents
    Tools,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_no_args() {
        // No args means serve
        let cli = Cli::try_parse_from(["opencti-mcp"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.subcommand(), Commands::Serve);
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::try_parse_from(["opencti-mcp", "-v"]).unwrap();
        assert!(cli.is_verbose());
    }

    #[test]
    fn test_cli_config_option() {
        let cli = Cli::try_parse_from(["opencti-mcp", "-c", "/etc/opencti-mcp.yml"]).unwrap();
        assert_eq!(cli.config.as_ref(), Some(&PathBuf::from("/etc/opencti-mcp.yml")));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["opencti-mcp", "entity", "APT28", "-v", "--config", "x.yml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("x.yml")));
    }

    #[test]
    fn test_serve() {
        let cli = Cli::try_parse_from(["opencti-mcp", "serve"]).unwrap();
        assert_eq!(cli.subcommand(), Commands::Serve);
    }

    #[test]
    fn test_search_default_limit() {
        let cli = Cli::try_parse_from(["opencti-mcp", "search", "APT28"]).unwrap();
        assert_eq!(
            cli.subcommand(),
            Commands::Search {
                keyword: "APT28".to_string(),
                limit: 10,
            }
        );
    }

    #[test]
    fn test_search_with_limit() {
        let cli = Cli::try_parse_from(["opencti-mcp", "search", "emotet", "--limit", "3"]).unwrap();
        match cli.subcommand() {
            Commands::Search { keyword, limit } => {
                assert_eq!(keyword, "emotet");
                assert_eq!(limit, 3);
            }
            other => panic!("Expected search command, got {:?}", other),
        }
    }

    #[test]
    fn test_search_requires_keyword() {
        assert!(Cli::try_parse_from(["opencti-mcp", "search"]).is_err());
    }

    #[test]
    fn test_observable() {
        let cli = Cli::try_parse_from(["opencti-mcp", "observable", "8.8.8.8"]).unwrap();
        assert_eq!(
            cli.subcommand(),
            Commands::Observable {
                value: "8.8.8.8".to_string()
            }
        );
    }

    #[test]
    fn test_entity_with_spaces() {
        let cli = Cli::try_parse_from(["opencti-mcp", "entity", "Lazarus Group"]).unwrap();
        assert_eq!(
            cli.subcommand(),
            Commands::Entity {
                name: "Lazarus Group".to_string()
            }
        );
    }

    #[test]
    fn test_tools() {
        let cli = Cli::try_parse_from(["opencti-mcp", "tools"]).unwrap();
        assert_eq!(cli.subcommand(), Commands::Tools);
    }

    #[test]
    fn test_unknown_subcommand() {
        assert!(Cli::try_parse_from(["opencti-mcp", "delete"]).is_err());
    }

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }
}
