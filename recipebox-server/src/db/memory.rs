//! In-process recipe store
//!
//! Keeps insertion order so `list` matches the Postgres store's
//! oldest-first ordering.

use async_trait::async_trait;
use tokio::sync::RwLock;

use recipebox_core::{Recipe, RecipeDraft};

use super::error::StoreError;
use super::store::{new_id, RecipeStore};

#[derive(Default)]
pub struct MemoryRecipeStore {
    recipes: RwLock<Vec<Recipe>>,
}

impl MemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecipeStore for MemoryRecipeStore {
    async fn insert(&self, draft: RecipeDraft) -> Result<String, StoreError> {
        let id = new_id();
        self.recipes
            .write()
            .await
            .push(Recipe::from_draft(id.clone(), draft));
        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<Option<Recipe>, StoreError> {
        let recipes = self.recipes.read().await;
        Ok(recipes.iter().find(|r| r.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Recipe>, StoreError> {
        Ok(self.recipes.read().await.clone())
    }

    async fn replace(&self, id: &str, draft: RecipeDraft) -> Result<Option<Recipe>, StoreError> {
        let mut recipes = self.recipes.write().await;
        let Some(slot) = recipes.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        *slot = Recipe::from_draft(id, draft);
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: &str) -> Result<u64, StoreError> {
        let mut recipes = self.recipes.write().await;
        let before = recipes.len();
        recipes.retain(|r| r.id != id);
        Ok((before - recipes.len()) as u64)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str) -> RecipeDraft {
        RecipeDraft {
            name: name.into(),
            time: "10 minutes".into(),
            method: "Mix.".into(),
            ingredients: vec!["salt".into(), "pepper".into()],
        }
    }

    #[tokio::test]
    async fn insert_then_get() {
        let store = MemoryRecipeStore::new();
        let id = store.insert(draft("Salad")).await.unwrap();

        let recipe = store.get(&id).await.unwrap().expect("recipe missing");
        assert_eq!(recipe.id, id);
        assert_eq!(recipe.name, "Salad");
        assert_eq!(recipe.ingredients, vec!["salt", "pepper"]);
    }

    #[tokio::test]
    async fn ids_are_unique() {
        let store = MemoryRecipeStore::new();
        let a = store.insert(draft("A")).await.unwrap();
        let b = store.insert(draft("B")).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn list_keeps_insertion_order() {
        let store = MemoryRecipeStore::new();
        for name in ["first", "second", "third"] {
            store.insert(draft(name)).await.unwrap();
        }

        let names: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn replace_unknown_is_none() {
        let store = MemoryRecipeStore::new();
        assert!(store.replace("missing", draft("x")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn replace_keeps_id() {
        let store = MemoryRecipeStore::new();
        let id = store.insert(draft("Old")).await.unwrap();

        let updated = store.replace(&id, draft("New")).await.unwrap().unwrap();
        assert_eq!(updated.id, id);
        assert_eq!(store.get(&id).await.unwrap().unwrap().name, "New");
    }

    #[tokio::test]
    async fn delete_counts_rows() {
        let store = MemoryRecipeStore::new();
        let id = store.insert(draft("Gone")).await.unwrap();

        assert_eq!(store.delete(&id).await.unwrap(), 1);
        assert_eq!(store.delete(&id).await.unwrap(), 0);
        assert!(store.get(&id).await.unwrap().is_none());
    }
}
