//! HTTP server command
//!
//! Loads configuration, runs the provisioning check, then serves the
//! recipe routes until Ctrl+C / SIGTERM.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use recipebox_core::RecipeboxConfig;
use recipebox_server::db::provision;
use recipebox_server::{run_server, MemoryRecipeStore, PgRecipeStore, RecipeStore, ServerConfig};

use super::DatabaseArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 0.0.0.0:8082)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Keep recipes in process memory instead of Postgres (no provisioning)
    #[arg(long)]
    pub in_memory: bool,
}

impl ServeArgs {
    fn apply(&self, config: &mut RecipeboxConfig) {
        if let Some(bind) = self.bind {
            config.server.bind = bind.to_string();
        }
        if self.cors_permissive {
            config.server.cors_permissive = true;
        }
        self.database.apply(config);
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = RecipeboxConfig::load(config_path).context("Failed to load configuration")?;
    args.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    let server_config = ServerConfig::from_config(&config)?;

    let store: Arc<dyn RecipeStore> = if args.in_memory {
        warn!("Using in-memory store; recipes are lost on shutdown");
        Arc::new(MemoryRecipeStore::new())
    } else {
        let (pool, report) = provision(&config.database)
            .await
            .context("Provisioning check failed")?;
        info!(
            database_created = report.database_created,
            table_created = report.table_created,
            "Provisioning check complete"
        );
        Arc::new(PgRecipeStore::new(pool, &config.database.table))
    };

    info!("Starting recipebox server on {}", server_config.bind_addr);

    // Blocks until shutdown
    run_server(store, server_config)
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_server_section() {
        let args = ServeArgs {
            bind: Some("127.0.0.1:3000".parse().unwrap()),
            database: DatabaseArgs::default(),
            cors_permissive: true,
            in_memory: false,
        };
        let mut config = RecipeboxConfig::default();

        args.apply(&mut config);

        assert_eq!(config.server.bind, "127.0.0.1:3000");
        assert!(config.server.cors_permissive);
    }

    #[test]
    fn bind_flag_repairs_bad_file_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nbind = \"nowhere\"\n").unwrap();

        let mut config = RecipeboxConfig::load(Some(path.as_path())).unwrap();
        let args = ServeArgs {
            bind: Some("127.0.0.1:3000".parse().unwrap()),
            database: DatabaseArgs::default(),
            cors_permissive: false,
            in_memory: true,
        };

        args.apply(&mut config);

        assert!(config.validate().is_ok());
    }
}
