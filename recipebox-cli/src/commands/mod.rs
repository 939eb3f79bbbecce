pub mod config;
pub mod provision;
pub mod serve;

pub use config::run_config;
pub use provision::run_provision;
pub use serve::run_serve;

use clap::Args;
use recipebox_core::RecipeboxConfig;

/// Database flags shared by `serve` and `provision`
#[derive(Args, Debug, Clone, Default)]
pub struct DatabaseArgs {
    /// Postgres server URL (overrides config/environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Database to provision and use
    #[arg(long)]
    pub db_name: Option<String>,

    /// Table holding recipe documents
    #[arg(long)]
    pub table: Option<String>,
}

impl DatabaseArgs {
    /// Apply flags on top of the loaded config
    pub fn apply(&self, config: &mut RecipeboxConfig) {
        if let Some(url) = &self.database_url {
            config.database.url = url.clone();
        }
        if let Some(name) = &self.db_name {
            config.database.name = name.clone();
        }
        if let Some(table) = &self.table {
            config.database.table = table.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let mut config = RecipeboxConfig::default();
        let args = DatabaseArgs {
            database_url: None,
            db_name: Some("cookbook".into()),
            table: Some("dishes".into()),
        };

        args.apply(&mut config);

        assert_eq!(config.database.url, "postgres://localhost:5432");
        assert_eq!(config.database.name, "cookbook");
        assert_eq!(config.database.table, "dishes");
    }
}
