//! Database layer - connection pool, provisioning and recipe stores
//!
//! - `pool`: sqlx PgPool construction with explicit connection limits
//! - `provision`: startup existence check plus conditional creation
//! - `store`: the `RecipeStore` trait the HTTP layer talks to
//! - `postgres` / `memory`: the two store implementations

pub mod error;
pub mod memory;
pub mod pool;
pub mod postgres;
pub mod provision;
pub mod store;

pub use error::StoreError;
pub use memory::MemoryRecipeStore;
pub use pool::{connect_options, create_pool};
pub use postgres::PgRecipeStore;
pub use provision::{provision, quote_ident, ProvisionReport};
pub use store::RecipeStore;
