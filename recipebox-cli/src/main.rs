//! recipebox CLI - recipe CRUD service
//!
//! - `serve`: provision the database and run the HTTP API
//! - `provision`: run only the database/table existence check
//! - `config`: inspect configuration
//! - `completions`: shell completion scripts

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing::{debug, warn};

mod commands;
mod tracing_setup;

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "recipebox",
    author,
    version,
    about = "HTTP service for storing and serving recipes",
    long_about = "Serve add/view/list/edit/delete routes over a single recipe collection \
                  kept in Postgres. The database and table are created on startup if missing."
)]
struct Cli {
    /// Config file (default: ~/.recipebox/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Debug logging (unless RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP (requires the telemetry feature)
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server (provisions the database first)
    Serve(commands::serve::ServeArgs),
    /// Ensure the database and table exist, then exit
    Provision(commands::provision::ProvisionArgs),
    /// Inspect recipebox configuration (path, show)
    Config(commands::config::ConfigArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: clap_complete::Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing so `env = "DATABASE_URL"` flags see .env values
    let dotenv = recipebox_core::config::load_dotenv();
    let cli = Cli::parse();

    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    })
    .ok();

    for path in &dotenv.loaded {
        debug!("Loaded .env from {}", path.display());
    }
    for (path, err) in &dotenv.failed {
        warn!("Failed to load {}: {}", path.display(), err);
    }

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Serve(args) => commands::run_serve(args, config_path).await,
        Commands::Provision(args) => commands::run_provision(args, config_path).await,
        Commands::Config(args) => commands::run_config(args, config_path),
        Commands::Completions(args) => run_completions(args),
    };

    tracing_setup::shutdown_otel();
    result
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    clap_complete::generate(args.shell, &mut cmd, bin_name, &mut std::io::stdout());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["recipebox", "serve", "--debug", "--in-memory"]).unwrap();
        assert!(cli.debug);
        assert!(matches!(cli.command, Commands::Serve(ref args) if args.in_memory));
    }
}
