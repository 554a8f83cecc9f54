use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use graphmind::config::GraphMindConfig;
use graphmind::{cli, server};

#[derive(Parser)]
#[command(name = "graphmind", version, about = "Graph memory MCP server backed by Neo4j and an LLM")]
struct Cli {
    /// Config file (defaults to ~/.graphmind/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the MCP server (HTTP transport)
    Serve {
        /// Port to listen on (overrides config and PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Check connectivity to the graph store and language model
    Doctor,
    /// Print the tool catalogue as JSON
    Tools,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let mut config = match &args.config {
        Some(path) => GraphMindConfig::load_from(path)?,
        None => GraphMindConfig::load()?,
    };

    // Log to stderr so stdout stays clean for `tools` output.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            server::serve(config).await?;
        }
        Command::Doctor => cli::doctor(&config).await?,
        Command::Tools => cli::print_tools()?,
    }

    Ok(())
}
