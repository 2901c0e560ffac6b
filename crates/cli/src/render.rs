//! Plain-text rendering of views and the suggestion panel.

use recipe_core::highlight::Segment;
use recipe_core::suggest::{PanelState, SuggestionPanel};
use recipe_core::views::{HomeView, ViewState};
use recipe_core::{Category, Meal, MealSummary};
use std::fmt::Write;

/// Render a view state, delegating the ready case to `ready`.
pub fn view<T>(state: &ViewState<T>, ready: impl FnOnce(&T) -> String) -> String {
    match state {
        ViewState::Ready { data } => ready(data),
        ViewState::Empty { message } => message.clone(),
        ViewState::Failed { message } => format!("Error: {message}"),
    }
}

pub fn meal_list(meals: &[Meal]) -> String {
    meals
        .iter()
        .map(|m| {
            format!(
                "ID: {}, Name: {}, Category: {}, Area: {}",
                m.id, m.name, m.category, m.area
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn summaries(meals: &[MealSummary]) -> String {
    meals
        .iter()
        .map(|m| format!("ID: {}, Name: {}", m.id, m.name))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn categories(categories: &[Category]) -> String {
    categories
        .iter()
        .map(|c| c.name.clone())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full recipe: header, ingredients, instructions and links.
pub fn meal(meal: &Meal) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", meal.name);
    let _ = writeln!(out, "{} | {}", meal.category, meal.area);
    if !meal.tags.is_empty() {
        let _ = writeln!(out, "Tags: {}", meal.tags.join(", "));
    }

    let _ = writeln!(out, "\nIngredients:");
    for ingredient in &meal.ingredients {
        if ingredient.measure.is_empty() {
            let _ = writeln!(out, "- {}", ingredient.name);
        } else {
            let _ = writeln!(out, "- {} {}", ingredient.measure, ingredient.name);
        }
    }

    let _ = writeln!(out, "\nInstructions:\n{}", meal.instructions.trim());
    if let Some(video) = &meal.video_url {
        let _ = writeln!(out, "\nVideo: {video}");
    }
    if let Some(source) = &meal.source_url {
        let _ = writeln!(out, "Source: {source}");
    }
    out.trim_end().to_string()
}

pub fn home(home: &HomeView) -> String {
    let featured = if home.featured.is_empty() {
        "No featured recipes available.".to_string()
    } else {
        meal_list(&home.featured)
    };
    format!(
        "Featured:\n{featured}\n\nCategories:\n{}\n\n{}",
        view(&home.categories, |c| categories(c)),
        home.prompt
    )
}

/// Matched segments are wrapped in square brackets.
pub fn highlighted(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| {
            if s.matched {
                format!("[{}]", s.text)
            } else {
                s.text.clone()
            }
        })
        .collect()
}

/// The dropdown as it would appear under the input. The selected row is marked with `>`.
pub fn panel(panel: &SuggestionPanel) -> String {
    match panel.state() {
        PanelState::Closed => "(suggestions closed)".to_string(),
        PanelState::OpenLoading => "Loading...".to_string(),
        PanelState::OpenEmpty => "No recipes found".to_string(),
        PanelState::OpenResults => panel
            .suggestions()
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let marker = if panel.selected() == Some(i) { '>' } else { ' ' };
                format!("{marker} {} ({}, {})", highlighted(&s.highlighted), s.area, s.category)
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}
