use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::models::Recipe;

#[derive(Debug)]
struct Inner {
    recipes_by_city: HashMap<String, Vec<Recipe>>,
    next_id: u64,
}

/// In-memory recipe collection keyed by city identifier.
///
/// Cloning yields another handle to the same collection. Every operation runs
/// under a single lock, so check-then-mutate sequences are atomic.
#[derive(Debug, Clone)]
pub struct RecipeStore {
    inner: Arc<Mutex<Inner>>,
}

impl Default for RecipeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecipeStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                recipes_by_city: HashMap::new(),
                next_id: 1,
            })),
        }
    }

    // A panic while holding the lock cannot leave the map half-written.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Recipes for a city in insertion order, empty if it has none.
    #[must_use]
    pub fn list(&self, city_id: &str) -> Vec<Recipe> {
        self.lock()
            .recipes_by_city
            .get(city_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Appends a recipe under the city and returns it with its new identifier.
    #[tracing::instrument(level = "info", skip(self, content))]
    pub fn add(&self, city_id: &str, content: String) -> Recipe {
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;

        let recipe = Recipe { id, content };
        inner
            .recipes_by_city
            .entry(city_id.to_string())
            .or_default()
            .push(recipe.clone());

        tracing::info!(recipe_id = id, "Recipe added");
        recipe
    }

    /// Removes the recipe with the given identifier. Returns whether one was removed.
    #[tracing::instrument(level = "info", skip(self))]
    pub fn remove(&self, city_id: &str, recipe_id: u64) -> bool {
        let mut inner = self.lock();
        let Some(recipes) = inner.recipes_by_city.get_mut(city_id) else {
            return false;
        };

        let before = recipes.len();
        recipes.retain(|r| r.id != recipe_id);
        let removed = recipes.len() != before;
        if removed {
            tracing::info!("Recipe removed");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_list_unknown_city_is_empty() {
        let store = RecipeStore::new();
        assert!(store.list("nowhere").is_empty());
    }

    #[test]
    fn test_ids_increase_across_cities() {
        let store = RecipeStore::new();
        let a = store.add("paris", "Bake a tart for 20 minutes".to_string());
        let b = store.add("lyon", "Simmer the quenelles slowly".to_string());
        let c = store.add("paris", "Whisk eggs with butter".to_string());

        assert_eq!((a.id, b.id, c.id), (1, 2, 3));
        assert_eq!(store.list("paris"), vec![a, c]);
        assert_eq!(store.list("lyon"), vec![b]);
    }

    #[test]
    fn test_remove_leaves_other_recipes() {
        let store = RecipeStore::new();
        let first = store.add("paris", "First recipe text".to_string());
        let second = store.add("paris", "Second recipe text".to_string());

        assert!(store.remove("paris", first.id));
        assert_eq!(store.list("paris"), vec![second]);
        assert!(!store.remove("paris", first.id));
    }

    #[test]
    fn test_remove_is_scoped_to_city() {
        let store = RecipeStore::new();
        let recipe = store.add("paris", "Only in Paris please".to_string());

        assert!(!store.remove("lyon", recipe.id));
        assert_eq!(store.list("paris").len(), 1);
    }

    #[test]
    fn test_ids_never_reused_after_delete() {
        let store = RecipeStore::new();
        let first = store.add("paris", "Soon to be deleted".to_string());
        store.remove("paris", first.id);
        let next = store.add("paris", "Added after delete".to_string());

        assert!(next.id > first.id);
        // an emptied city looks like one that never had recipes
        store.remove("paris", next.id);
        assert!(store.list("paris").is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let store = RecipeStore::new();
        let handle = store.clone();
        handle.add("paris", "Shared between handles".to_string());
        assert_eq!(store.list("paris").len(), 1);
    }

    #[test]
    fn test_concurrent_adds_get_unique_increasing_ids() {
        let store = RecipeStore::new();
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                thread::spawn(move || {
                    (0..50)
                        .map(|n| store.add("paris", format!("thread {t} recipe {n}")).id)
                        .collect::<Vec<u64>>()
                })
            })
            .collect();

        let mut all_ids = Vec::new();
        for handle in handles {
            let ids = handle.join().unwrap();
            // each thread sees its own ids strictly increasing
            assert!(ids.windows(2).all(|w| w[0] < w[1]));
            all_ids.extend(ids);
        }

        all_ids.sort_unstable();
        assert_eq!(all_ids, (1..=400).collect::<Vec<u64>>());
        assert_eq!(store.list("paris").len(), 400);
    }

    #[test]
    fn test_concurrent_removes_succeed_once() {
        let store = RecipeStore::new();
        let target_id = store.add("paris", "Contended recipe".to_string()).id;
        store.add("paris", "Bystander recipe".to_string());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || store.remove("paris", target_id))
            })
            .collect();

        let removed = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|removed| *removed)
            .count();
        assert_eq!(removed, 1);
        assert_eq!(store.list("paris").len(), 1);
    }
}
