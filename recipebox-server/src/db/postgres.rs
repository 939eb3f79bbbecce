//! Postgres-backed recipe store
//!
//! One row per recipe: `id TEXT` plus the draft fields as a JSONB `doc`.
//! The table name is fixed at construction and quoted once.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::debug;

use recipebox_core::{Recipe, RecipeDraft};

use super::error::StoreError;
use super::provision::quote_ident;
use super::store::{new_id, RecipeStore};

/// SQL statements for one table
struct Statements {
    insert: String,
    get: String,
    list: String,
    replace: String,
    delete: String,
}

impl Statements {
    fn for_table(table: &str) -> Self {
        let t = quote_ident(table);
        Self {
            insert: format!("INSERT INTO {t} (id, doc) VALUES ($1, $2)"),
            get: format!("SELECT id, doc FROM {t} WHERE id = $1"),
            list: format!("SELECT id, doc FROM {t} ORDER BY created_at, id"),
            replace: format!("UPDATE {t} SET doc = $2 WHERE id = $1 RETURNING id, doc"),
            delete: format!("DELETE FROM {t} WHERE id = $1"),
        }
    }
}

type DocRow = (String, Json<RecipeDraft>);

fn into_recipe((id, Json(draft)): DocRow) -> Recipe {
    Recipe::from_draft(id, draft)
}

pub struct PgRecipeStore {
    pool: PgPool,
    sql: Statements,
}

impl PgRecipeStore {
    pub fn new(pool: PgPool, table: &str) -> Self {
        Self {
            pool,
            sql: Statements::for_table(table),
        }
    }
}

#[async_trait]
impl RecipeStore for PgRecipeStore {
    async fn insert(&self, draft: RecipeDraft) -> Result<String, StoreError> {
        let id = new_id();
        sqlx::query(&self.sql.insert)
            .bind(&id)
            .bind(Json(&draft))
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<Option<Recipe>, StoreError> {
        let row: Option<DocRow> = sqlx::query_as(&self.sql.get)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(into_recipe))
    }

    async fn list(&self) -> Result<Vec<Recipe>, StoreError> {
        let rows: Vec<DocRow> = sqlx::query_as(&self.sql.list)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(into_recipe).collect())
    }

    async fn replace(&self, id: &str, draft: RecipeDraft) -> Result<Option<Recipe>, StoreError> {
        let row: Option<DocRow> = sqlx::query_as(&self.sql.replace)
            .bind(id)
            .bind(Json(&draft))
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(into_recipe))
    }

    async fn delete(&self, id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query(&self.sql.delete)
            .bind(id)
            .execute(&self.pool)
            .await?;
        let deleted = result.rows_affected();
        debug!(recipe_id = %id, deleted, "Delete executed");
        Ok(deleted)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
