//! Recipe store trait
//!
//! The HTTP layer only sees this trait, so routes can be exercised
//! against the in-memory store without a database.

use async_trait::async_trait;

use recipebox_core::{Recipe, RecipeDraft};

use super::error::StoreError;

/// Pass-through CRUD over the recipe collection
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Store a new document and return its generated id.
    async fn insert(&self, draft: RecipeDraft) -> Result<String, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<Recipe>, StoreError>;

    /// All recipes, oldest first.
    async fn list(&self) -> Result<Vec<Recipe>, StoreError>;

    /// Overwrite an existing document. `None` when `id` is unknown.
    async fn replace(&self, id: &str, draft: RecipeDraft) -> Result<Option<Recipe>, StoreError>;

    /// Delete by id and return the number of documents removed.
    async fn delete(&self, id: &str) -> Result<u64, StoreError>;

    /// Short backend name for health output
    fn backend(&self) -> &'static str;
}

/// Generate a fresh document id
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
