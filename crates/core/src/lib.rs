//! # Recipe Core
//!
//! Core logic for the recipe discovery app.
//!
//! This crate owns everything that does not depend on a particular front end:
//! - The recipe data model and its decoding from the public recipe API
//! - [`RecipeSource`], the seam between the app and the remote catalogue, and its HTTP
//!   implementation [`MealDbClient`]
//! - The debounced suggestion fetcher and the suggestion panel state machine
//! - One-shot views (search results, category listings, recipe details, home)
//!
//! **No transport concerns**: HTTP routing and terminal I/O belong in `api-rest` and
//! `recipe-cli`.

pub mod client;
pub mod config;
pub mod constants;
pub mod debounce;
pub mod error;
pub mod featured;
pub mod highlight;
pub mod mealdb;
pub mod model;
pub mod suggest;
pub mod views;

pub use client::{RecipeSource, SharedSource};
pub use config::{resolve_core_config, CoreConfig, SuggestConfig};
pub use error::{RecipeError, RecipeResult};
pub use mealdb::MealDbClient;
pub use model::{Category, Ingredient, Meal, MealSummary};
pub use recipe_types::{CategoryName, MealId, NonEmptyText, TextError};
