//! Run the provisioning check on its own

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use recipebox_core::RecipeboxConfig;
use recipebox_server::db::provision;

use super::DatabaseArgs;

#[derive(Parser, Debug)]
pub struct ProvisionArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,
}

pub async fn run_provision(args: ProvisionArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = RecipeboxConfig::load(config_path).context("Failed to load configuration")?;
    args.database.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    let (pool, report) = provision(&config.database)
        .await
        .context("Provisioning check failed")?;
    pool.close().await;

    let db = &config.database;
    println!(
        "database {}: {}",
        db.name,
        if report.database_created { "created" } else { "already exists" }
    );
    println!(
        "table {}: {}",
        db.table,
        if report.table_created { "created" } else { "already exists" }
    );

    Ok(())
}
