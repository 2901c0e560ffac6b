//! The seam between the application and the external recipe database.
//!
//! Everything above this module (views, the suggestion fetcher, the REST and CLI front ends)
//! depends only on [`RecipeSource`]. Production code plugs in
//! [`MealDbClient`](crate::mealdb::MealDbClient); tests plug in in-memory fakes.

use crate::model::{Category, Meal, MealSummary};
use crate::RecipeResult;
use async_trait::async_trait;
use recipe_types::{CategoryName, MealId};
use std::sync::Arc;

/// Read-only access to a recipe database.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Full records whose name contains `name`. No matches is an empty list, not an error.
    async fn search_by_name(&self, name: &str) -> RecipeResult<Vec<Meal>>;

    /// Every category, with thumbnail and description.
    async fn list_categories(&self) -> RecipeResult<Vec<Category>>;

    /// Abbreviated records in the given category.
    async fn filter_by_category(&self, category: &CategoryName) -> RecipeResult<Vec<MealSummary>>;

    /// The single record with this identifier, if any.
    async fn lookup_by_id(&self, id: &MealId) -> RecipeResult<Option<Meal>>;
}

/// Shared, type-erased source handed to views and front ends.
pub type SharedSource = Arc<dyn RecipeSource>;
