//! One-shot views: fetch once, then render.
//!
//! Each view issues a single request when it becomes active (or when its key parameter
//! changes) and resolves to a [`ViewState`]. Transport and decode failures are logged here
//! and turned into a generic message; they never propagate to the caller. "Nothing found" is
//! a normal, displayable state rather than an error.

use crate::client::{RecipeSource, SharedSource};
use crate::constants::FEATURED_RECIPE_NAMES;
use crate::featured::featured_recipes;
use crate::model::{Category, Meal, MealSummary};
use recipe_types::{CategoryName, MealId, NonEmptyText};
use serde::Serialize;
use utoipa::ToSchema;

pub const SEARCH_FAILED: &str = "Failed to fetch search results.";
pub const CATEGORY_FAILED: &str = "Failed to fetch recipes for this category.";
pub const RECIPE_FAILED: &str = "Failed to fetch recipe details.";
pub const RECIPE_NOT_FOUND: &str = "Recipe not found.";
pub const CATEGORIES_FAILED: &str = "Failed to fetch categories.";
pub const HOME_PROMPT: &str = "Start by searching for a recipe or an ingredient above!";

/// Outcome of a one-shot fetch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
#[aliases(
    SearchView = ViewState<Vec<Meal>>,
    CategoryView = ViewState<Vec<MealSummary>>,
    RecipeView = ViewState<Meal>,
    CategoryIndexView = ViewState<Vec<Category>>
)]
pub enum ViewState<T> {
    Ready { data: T },
    /// Valid request, nothing to show.
    Empty { message: String },
    Failed { message: String },
}

impl<T> ViewState<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Ready { data } => Some(data),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ViewState::Ready { .. } => None,
            ViewState::Empty { message } | ViewState::Failed { message } => Some(message),
        }
    }

    fn empty(message: impl Into<String>) -> Self {
        ViewState::Empty {
            message: message.into(),
        }
    }

    fn failed(message: &str) -> Self {
        ViewState::Failed {
            message: message.to_string(),
        }
    }
}

/// A list view: empty lists become `Empty` with the given message.
fn list_view<T>(items: Vec<T>, empty_message: impl FnOnce() -> String) -> ViewState<Vec<T>> {
    if items.is_empty() {
        ViewState::empty(empty_message())
    } else {
        ViewState::Ready { data: items }
    }
}

/// Full records matching a search query.
pub async fn search_results(
    source: &dyn RecipeSource,
    query: &NonEmptyText,
) -> ViewState<Vec<Meal>> {
    match source.search_by_name(query.as_str()).await {
        Ok(meals) => list_view(meals, || {
            format!("Sorry, no recipes found for \"{query}\". Please try another search.")
        }),
        Err(e) => {
            tracing::warn!(%query, "search failed: {e}");
            ViewState::failed(SEARCH_FAILED)
        }
    }
}

/// Abbreviated records in one category.
pub async fn category_listing(
    source: &dyn RecipeSource,
    category: &CategoryName,
) -> ViewState<Vec<MealSummary>> {
    match source.filter_by_category(category).await {
        Ok(meals) => list_view(meals, || format!("No recipes found in {category}.")),
        Err(e) => {
            tracing::warn!(%category, "category listing failed: {e}");
            ViewState::failed(CATEGORY_FAILED)
        }
    }
}

/// One recipe, by identifier.
pub async fn recipe_detail(source: &dyn RecipeSource, id: &MealId) -> ViewState<Meal> {
    match source.lookup_by_id(id).await {
        Ok(Some(meal)) => ViewState::Ready { data: meal },
        Ok(None) => ViewState::empty(RECIPE_NOT_FOUND),
        Err(e) => {
            tracing::warn!(%id, "recipe lookup failed: {e}");
            ViewState::failed(RECIPE_FAILED)
        }
    }
}

/// Every category.
pub async fn category_index(source: &dyn RecipeSource) -> ViewState<Vec<Category>> {
    match source.list_categories().await {
        Ok(categories) => list_view(categories, || "No categories available.".to_string()),
        Err(e) => {
            tracing::warn!("category index failed: {e}");
            ViewState::failed(CATEGORIES_FAILED)
        }
    }
}

/// Landing page content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct HomeView {
    /// Featured carousel; empty when nothing could be fetched.
    pub featured: Vec<Meal>,
    pub categories: CategoryIndexView,
    pub prompt: String,
}

/// Fetch the featured selection and the category index concurrently.
pub async fn home(source: &SharedSource) -> HomeView {
    let (featured, categories) = tokio::join!(
        featured_recipes(source.clone(), &FEATURED_RECIPE_NAMES),
        category_index(source.as_ref()),
    );

    HomeView {
        featured,
        categories,
        prompt: HOME_PROMPT.to_string(),
    }
}
