//! Binary entry point for plainmcp.
//!
//! Loads configuration from the environment, constructs the Plain client
//! once, and hands it to the MCP server for the lifetime of the process.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for startup failures
#![allow(clippy::print_stderr)]

use clap::{Parser, Subcommand};
use plainmcp::mcp::{McpServer, ToolRegistry};
use plainmcp::{PlainClient, PlainConfig, observability};
use std::process::ExitCode;
use std::sync::Arc;

/// Plainmcp - MCP server for Plain customer-support operations.
#[derive(Parser)]
#[command(name = "plainmcp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server on stdio.
    Serve,
}

#[tokio::main]
async fn main() -> ExitCode {
    // .env is optional; a missing file is not an error.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    observability::init(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve => serve().await,
    }
}

async fn serve() -> anyhow::Result<()> {
    let config = PlainConfig::from_env()?;
    let client = Arc::new(PlainClient::new(&config)?);

    let registry = ToolRegistry::new(Arc::clone(&client));
    let server = McpServer::new(registry);

    let result = server.run_stdio().await;

    // Release the shared connection on every exit path.
    client.close();
    result?;
    Ok(())
}
