//! Polymarket MCP Server CLI
//!
//! Runs the MCP server over stdio, or inspects the tool surface and
//! configuration without starting it.

use clap::{Parser, Subcommand};
use polymarket_mcp::{Config, Registry, Result, Server};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "polymarket-mcp")]
#[command(about = "MCP server for Polymarket prediction markets", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the MCP server on stdio (default)
    Serve,

    /// List the registered tools and exit
    Tools,

    /// Show the effective configuration (secrets redacted)
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // stdout carries the protocol, so logs must go to stderr
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = Config::from_env();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            if config.dry_run {
                tracing::info!("dry-run mode: trading tools will simulate instead of executing");
            }
            let registry = Registry::new(&config);
            let server = Server::new(registry);
            server
                .serve()
                .await
                .map_err(|e| polymarket_mcp::Error::Config(e.to_string()))?;
        }
        Commands::Tools => {
            let registry = Registry::new(&config);
            for entry in registry.list() {
                println!(
                    "{}  {}",
                    entry["name"].as_str().unwrap_or_default(),
                    entry["description"].as_str().unwrap_or_default()
                );
            }
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config.redacted())?);
        }
    }

    Ok(())
}
