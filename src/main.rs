use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::{LevelFilter, error, info};
use std::fs;
use std::path::Path;
use std::sync::Arc;

mod cli;

use cli::Cli;
use cli::commands::Commands;
use opencti_mcp::config::Config;
use opencti_mcp::graphql::OpenCtiClient;
use opencti_mcp::mcp::{McpServer, StdioTransport};
use opencti_mcp::tools::{self, ToolContext, ToolRegistry};

/// Logs never touch stdout: it carries the MCP stream
fn setup_logging(config: &Config, verbose: bool) -> Result<()> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        config.log_filter()?
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);

    match &config.log_file {
        Some(path) => {
            builder.target(env_logger::Target::Pipe(open_log_file(path)?));
        }
        None => {
            builder.target(env_logger::Target::Stderr);
        }
    }

    builder.try_init().context("Failed to initialize logger")?;
    Ok(())
}

fn open_log_file(path: &Path) -> Result<Box<fs::File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("Failed to create log directory")?;
    }

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    Ok(Box::new(file))
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    let command = cli.subcommand();

    if command == Commands::Tools {
        print_tools(&ToolRegistry::standard());
        return Ok(());
    }

    let service = config.service_config().context("Incomplete OpenCTI configuration")?;
    info!("Using OpenCTI endpoint {}", service.endpoint());
    let client = OpenCtiClient::new(&service).context("Failed to build OpenCTI client")?;

    match command {
        Commands::Serve => serve(Arc::new(client)).await,
        Commands::Search { keyword, limit } => {
            let text = tools::search_knowledge_base(&client, &keyword, Some(limit)).await?;
            print_result(&format!("Search: {}", keyword), &text);
            Ok(())
        }
        Commands::Observable { value } => {
            let text = tools::get_observable_details(&client, &value).await?;
            print_result(&format!("Observable: {}", value), &text);
            Ok(())
        }
        Commands::Entity { name } => {
            let text = tools::get_threat_entity(&client, &name).await?;
            print_result(&format!("Entity: {}", name), &text);
            Ok(())
        }
        Commands::Tools => Ok(()),
    }
}

async fn serve(client: Arc<OpenCtiClient>) -> Result<()> {
    let ctx = ToolContext::new(client);
    let mut server = McpServer::new(ToolRegistry::standard(), ctx);
    let mut transport = StdioTransport::new();

    server.run(&mut transport).await.context("MCP server failed")?;
    Ok(())
}

fn print_result(title: &str, text: &str) {
    println!("{}", title.cyan().bold());
    println!("{}", text);
}

fn print_tools(registry: &ToolRegistry) {
    for def in registry.definitions() {
        println!("{}", def.name.green().bold());
        println!("  {}", def.description);
        let params = def.input_schema["properties"]
            .as_object()
            .map(|props| props.keys().cloned().collect::<Vec<_>>().join(", "))
            .unwrap_or_default();
        println!("  {} {}", "params:".dimmed(), params);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // .env first so its values take part in the env layer
    dotenvy::dotenv().ok();

    let config = Config::load(cli.config.as_ref())
        .context("Failed to load configuration")?
        .with_env();

    setup_logging(&config, cli.is_verbose()).context("Failed to setup logging")?;
    info!("Starting with config from: {:?}", config.source);

    if let Err(e) = run_application(&cli, &config).await {
        error!("{:#}", e);
        return Err(e.wrap_err("Application failed"));
    }

    Ok(())
}
