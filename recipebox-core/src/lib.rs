//! recipebox-core: shared types for the recipebox service
//!
//! - `recipe`: the `Recipe` document and the `RecipeDraft` request body
//! - `config`: layered configuration (defaults, TOML file, environment)
//! - `error`: structured errors for configuration loading

pub mod config;
pub mod error;
pub mod recipe;

pub use config::{DatabaseSection, RecipeboxConfig, ServerSection};
pub use error::{ConfigError, Result};
pub use recipe::{Recipe, RecipeDraft};
