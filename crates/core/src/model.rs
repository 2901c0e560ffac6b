//! Recipe records as returned by the external recipe database.
//!
//! The database speaks in flat JSON objects with `str`-prefixed keys and twenty numbered
//! ingredient/measure slots. This module decodes those into typed records once, at the client
//! boundary, so the rest of the workspace never deals with the raw key layout.
//!
//! Missing string fields decode to empty strings rather than failing: the upstream shape is
//! not validated beyond "is a JSON object".

use crate::constants::INGREDIENT_SLOTS;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

/// One ingredient line of a recipe.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Ingredient {
    pub name: String,
    /// Free-text quantity, e.g. `1 tbsp`. Empty when the record gives none.
    pub measure: String,
}

/// A full recipe record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(from = "RawMeal")]
pub struct Meal {
    pub id: String,
    pub name: String,
    pub category: String,
    pub area: String,
    pub instructions: String,
    pub thumbnail: String,
    pub video_url: Option<String>,
    pub source_url: Option<String>,
    pub tags: Vec<String>,
    pub ingredients: Vec<Ingredient>,
}

/// Abbreviated record returned when filtering by category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MealSummary {
    #[serde(rename(deserialize = "idMeal"), default)]
    pub id: String,
    #[serde(rename(deserialize = "strMeal"), default)]
    pub name: String,
    #[serde(rename(deserialize = "strMealThumb"), default)]
    pub thumbnail: String,
}

impl From<&Meal> for MealSummary {
    fn from(meal: &Meal) -> Self {
        Self {
            id: meal.id.clone(),
            name: meal.name.clone(),
            thumbnail: meal.thumbnail.clone(),
        }
    }
}

/// A recipe category with its artwork and blurb.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    #[serde(rename(deserialize = "idCategory"), default)]
    pub id: String,
    #[serde(rename(deserialize = "strCategory"), default)]
    pub name: String,
    #[serde(rename(deserialize = "strCategoryThumb"), default)]
    pub thumbnail: String,
    #[serde(rename(deserialize = "strCategoryDescription"), default)]
    pub description: String,
}

/// `{"meals": [...]}` envelope. The database sends `null` instead of `[]` for no matches.
#[derive(Debug, Deserialize)]
pub(crate) struct MealsEnvelope<T> {
    meals: Option<Vec<T>>,
}

impl<T> MealsEnvelope<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        self.meals.unwrap_or_default()
    }
}

/// `{"categories": [...]}` envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct CategoriesEnvelope {
    #[serde(default)]
    categories: Option<Vec<Category>>,
}

impl CategoriesEnvelope {
    pub(crate) fn into_vec(self) -> Vec<Category> {
        self.categories.unwrap_or_default()
    }
}

/// Wire layout of a full meal record.
#[derive(Debug, Deserialize)]
struct RawMeal {
    #[serde(rename = "idMeal", default)]
    id: Option<String>,
    #[serde(rename = "strMeal", default)]
    name: Option<String>,
    #[serde(rename = "strCategory", default)]
    category: Option<String>,
    #[serde(rename = "strArea", default)]
    area: Option<String>,
    #[serde(rename = "strInstructions", default)]
    instructions: Option<String>,
    #[serde(rename = "strMealThumb", default)]
    thumbnail: Option<String>,
    #[serde(rename = "strYoutube", default)]
    youtube: Option<String>,
    #[serde(rename = "strSource", default)]
    source: Option<String>,
    #[serde(rename = "strTags", default)]
    tags: Option<String>,
    /// Numbered ingredient/measure slots and any fields we do not model.
    #[serde(flatten)]
    rest: HashMap<String, serde_json::Value>,
}

impl From<RawMeal> for Meal {
    fn from(raw: RawMeal) -> Self {
        let ingredients = collect_ingredients(&raw.rest);
        Self {
            id: raw.id.unwrap_or_default(),
            name: raw.name.unwrap_or_default(),
            category: raw.category.unwrap_or_default(),
            area: raw.area.unwrap_or_default(),
            instructions: raw.instructions.unwrap_or_default(),
            thumbnail: raw.thumbnail.unwrap_or_default(),
            video_url: non_empty(raw.youtube),
            source_url: non_empty(raw.source),
            tags: split_tags(raw.tags.as_deref().unwrap_or_default()),
            ingredients,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn slot_text<'a>(rest: &'a HashMap<String, serde_json::Value>, key: &str) -> &'a str {
    rest.get(key)
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .unwrap_or_default()
}

/// Walk slots 1..=20 in order, keeping those with a non-blank ingredient name.
fn collect_ingredients(rest: &HashMap<String, serde_json::Value>) -> Vec<Ingredient> {
    (1..=INGREDIENT_SLOTS)
        .filter_map(|slot| {
            let name = slot_text(rest, &format!("strIngredient{slot}"));
            if name.is_empty() {
                return None;
            }
            Some(Ingredient {
                name: name.to_string(),
                measure: slot_text(rest, &format!("strMeasure{slot}")).to_string(),
            })
        })
        .collect()
}

/// Split the comma-separated tag list, dropping blanks.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
