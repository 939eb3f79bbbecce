use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use recipebox_core::RecipeboxConfig;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show config file path
    Path,
    /// Print the effective config (file + environment) as TOML
    Show,
}

pub fn run_config(args: ConfigArgs, config_path: Option<&Path>) -> Result<()> {
    match args.command {
        ConfigCommands::Path => run_path(config_path),
        ConfigCommands::Show => run_show(config_path),
    }
}

fn run_path(config_path: Option<&Path>) -> Result<()> {
    match config_path {
        Some(path) => println!("{}", path.display()),
        None => println!("{}", RecipeboxConfig::config_path().display()),
    }
    Ok(())
}

fn run_show(config_path: Option<&Path>) -> Result<()> {
    let config = RecipeboxConfig::load(config_path).context("Failed to load configuration")?;

    let toml_str =
        toml::to_string_pretty(&config).context("Failed to serialize config to TOML")?;
    println!("{}", toml_str);

    Ok(())
}
