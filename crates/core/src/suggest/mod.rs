//! Type-ahead suggestions for the recipe search box.
//!
//! - [`panel`]: what the suggestion dropdown shows and how it reacts to keys.
//! - [`fetcher`]: the long-lived debounced task for interactive front ends.
//! - [`suggest_once`]: a single, undebounced lookup for request/response front ends that
//!   debounce on their own side.

pub mod fetcher;
pub mod panel;

pub use fetcher::{spawn, SuggestHandle};
pub use panel::{Key, PanelAction, PanelState, Suggestion, SuggestionPanel};

use crate::client::RecipeSource;
use crate::config::SuggestConfig;
use serde::Serialize;
use utoipa::ToSchema;

/// Result of a one-shot suggestion lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct SuggestionList {
    pub query: String,
    pub state: PanelState,
    pub suggestions: Vec<Suggestion>,
}

impl From<&SuggestionPanel> for SuggestionList {
    fn from(panel: &SuggestionPanel) -> Self {
        Self {
            query: panel.query().unwrap_or_default().to_string(),
            state: panel.state(),
            suggestions: panel.suggestions().to_vec(),
        }
    }
}

/// Look up suggestions for `input` once, applying the same rules as the fetcher task:
/// input below the minimum length closes the list without a request, failures read as
/// "no results", and matches are capped at the display limit.
pub async fn suggest_once(
    source: &dyn RecipeSource,
    cfg: &SuggestConfig,
    input: &str,
) -> SuggestionList {
    let mut panel = SuggestionPanel::new();
    panel.set_input(input);

    let Some(query) = cfg.lookup_query(input) else {
        panel.clear();
        return SuggestionList::from(&panel);
    };
    let query = query.as_str();

    panel.begin_lookup(query);
    match source.search_by_name(query).await {
        Ok(meals) => panel.finish_lookup(query, &meals, cfg.max_suggestions),
        Err(e) => {
            tracing::warn!(%query, "failed to fetch suggestions: {e}");
            panel.fail_lookup();
        }
    }
    SuggestionList::from(&panel)
}
