//! Featured recipes for the home view.

use crate::client::SharedSource;
use crate::model::Meal;
use tokio::task::JoinSet;

/// Search each name concurrently and flatten the matches in the order the names were given.
///
/// The selection is all or nothing: if any lookup fails the result is empty, so the home view
/// falls back to its "no featured recipes" display instead of showing a partial carousel.
pub async fn featured_recipes(source: SharedSource, names: &[&str]) -> Vec<Meal> {
    let mut lookups = JoinSet::new();
    for (position, name) in names.iter().enumerate() {
        let source = source.clone();
        let name = name.to_string();
        lookups.spawn(async move {
            let result = source.search_by_name(&name).await;
            (position, name, result)
        });
    }

    let mut found: Vec<(usize, Vec<Meal>)> = Vec::with_capacity(names.len());
    while let Some(joined) = lookups.join_next().await {
        match joined {
            Ok((position, _, Ok(meals))) => found.push((position, meals)),
            Ok((_, name, Err(e))) => {
                tracing::warn!(%name, "failed to fetch featured recipes: {e}");
                lookups.abort_all();
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!("featured recipe lookup did not complete: {e}");
                lookups.abort_all();
                return Vec::new();
            }
        }
    }

    found.sort_by_key(|(position, _)| *position);
    found.into_iter().flat_map(|(_, meals)| meals).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::FakeSource;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_results_keep_name_order_regardless_of_latency() {
        let mut source =
            FakeSource::with_meals(&["Tiramisu", "Corba", "Lasagne Sandwiches", "Lasagne"]);
        source.delays.insert("Corba".into(), Duration::from_millis(200));
        let source: SharedSource = Arc::new(source);

        let meals = featured_recipes(source, &["Corba", "Lasagne", "Tiramisu"]).await;
        let names: Vec<_> = meals.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Corba", "Lasagne Sandwiches", "Lasagne", "Tiramisu"]);
    }

    #[tokio::test]
    async fn test_names_without_matches_contribute_nothing() {
        let source: SharedSource = Arc::new(FakeSource::with_meals(&["Kumpir"]));

        let meals = featured_recipes(source, &["Kumpir", "Pancakes"]).await;
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].name, "Kumpir");
    }

    #[tokio::test]
    async fn test_any_failure_empties_selection() {
        let mut source = FakeSource::with_meals(&["Kumpir", "Pancakes"]);
        source.failing.push("Pancakes".into());
        let source: SharedSource = Arc::new(source);

        assert!(featured_recipes(source, &["Kumpir", "Pancakes"]).await.is_empty());
    }
}
