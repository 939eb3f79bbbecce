//! recipebox-server: HTTP CRUD over a single recipe collection
//!
//! Five routes map directly onto five store calls. The only startup work
//! is the provisioning check in [`db::provision`], which creates the
//! database and table when they are missing.

pub mod db;
pub mod http;

pub use db::{MemoryRecipeStore, PgRecipeStore, RecipeStore, StoreError};
pub use http::{run_server, ServerConfig};
