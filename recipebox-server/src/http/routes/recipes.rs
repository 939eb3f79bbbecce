//! Recipe endpoints
//!
//! Bodies are parsed as JSON whatever the request's content type, so
//! clients posting without `Content-Type: application/json` still work.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;
use tracing::{debug, info};

use recipebox_core::{Recipe, RecipeDraft};

use crate::http::error::ApiError;
use crate::http::server::AppState;

/// Delete response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: u64,
}

fn parse_draft(body: &Bytes) -> Result<RecipeDraft, ApiError> {
    let draft: RecipeDraft = serde_json::from_slice(body)?;
    Ok(draft)
}

fn not_found(id: String) -> ApiError {
    ApiError::NotFound {
        resource: "recipe",
        id,
    }
}

/// POST /add - store a recipe, respond with its id as plain text
async fn add_recipe(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, String), ApiError> {
    let draft = parse_draft(&body)?;
    debug!(name = %draft.name, ingredients = draft.ingredients.len(), "Adding recipe");

    let id = state.store.insert(draft).await?;
    info!(recipe_id = %id, "Recipe added");

    Ok((StatusCode::CREATED, id))
}

/// GET /view/{recipe_id}
async fn view_recipe(
    State(state): State<Arc<AppState>>,
    Path(recipe_id): Path<String>,
) -> Result<Json<Recipe>, ApiError> {
    debug!(%recipe_id, "Viewing recipe");

    match state.store.get(&recipe_id).await? {
        Some(recipe) => Ok(Json(recipe)),
        None => {
            info!(%recipe_id, "Could not find recipe");
            Err(not_found(recipe_id))
        }
    }
}

/// GET /list - every recipe, oldest first
async fn list_recipes(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Recipe>>, ApiError> {
    let recipes = state.store.list().await?;
    debug!(count = recipes.len(), "Listing recipes");
    Ok(Json(recipes))
}

/// PUT|POST /edit/{recipe_id} - replace a recipe's fields
async fn edit_recipe(
    State(state): State<Arc<AppState>>,
    Path(recipe_id): Path<String>,
    body: Bytes,
) -> Result<Json<Recipe>, ApiError> {
    let draft = parse_draft(&body)?;

    match state.store.replace(&recipe_id, draft).await? {
        Some(recipe) => {
            info!(%recipe_id, "Recipe updated");
            Ok(Json(recipe))
        }
        None => Err(not_found(recipe_id)),
    }
}

/// DELETE|POST /delete/{recipe_id}
///
/// Deleting an unknown id is not an error; `deleted` is 0.
async fn delete_recipe(
    State(state): State<Arc<AppState>>,
    Path(recipe_id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let deleted = state.store.delete(&recipe_id).await?;
    info!(%recipe_id, deleted, "{} row deleted", deleted);
    Ok(Json(DeleteResponse { deleted }))
}

/// Recipe routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/add", post(add_recipe))
        .route("/view/{recipe_id}", get(view_recipe))
        .route("/list", get(list_recipes))
        .route("/edit/{recipe_id}", put(edit_recipe).post(edit_recipe))
        .route("/delete/{recipe_id}", delete(delete_recipe).post(delete_recipe))
}
