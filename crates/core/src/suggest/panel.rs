//! Suggestion panel state and keyboard handling.
//!
//! The panel is a passive value: the fetcher task mutates it as lookups start and finish, and
//! front ends read snapshots of it. Keyboard handling returns a [`PanelAction`] telling the
//! front end what to do next (commit a suggestion, run a full search, release focus).

use crate::highlight::{highlight, Segment};
use crate::model::Meal;
use serde::Serialize;
use utoipa::ToSchema;

/// One entry in the suggestion list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct Suggestion {
    pub id: String,
    pub name: String,
    pub area: String,
    pub category: String,
    pub thumbnail: String,
    /// `name` split around occurrences of the query.
    pub highlighted: Vec<Segment>,
}

impl Suggestion {
    pub fn from_meal(meal: &Meal, query: &str) -> Self {
        Self {
            id: meal.id.clone(),
            name: meal.name.clone(),
            area: meal.area.clone(),
            category: meal.category.clone(),
            thumbnail: meal.thumbnail.clone(),
            highlighted: highlight(&meal.name, query),
        }
    }
}

/// What the panel currently displays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PanelState {
    Closed,
    /// Open with an explicit "no recipes found" message.
    OpenEmpty,
    OpenLoading,
    OpenResults,
}

/// Keys the panel reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
}

/// Follow-up the front end should perform after a key press.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PanelAction {
    /// Nothing beyond re-rendering.
    Stay,
    /// The highlighted suggestion was chosen.
    Commit(Suggestion),
    /// Run a full search for the current input.
    Search(String),
    /// Panel dismissed with Escape; the input should give up focus.
    ReleaseFocus,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SuggestionPanel {
    input: String,
    query: Option<String>,
    suggestions: Vec<Suggestion>,
    open: bool,
    loading: bool,
    selected: Option<usize>,
}

impl SuggestionPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PanelState {
        if !self.open {
            PanelState::Closed
        } else if self.loading {
            PanelState::OpenLoading
        } else if self.suggestions.is_empty() {
            PanelState::OpenEmpty
        } else {
            PanelState::OpenResults
        }
    }

    /// Raw text currently in the input.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Query the current suggestions (or the in-flight lookup) belong to.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_suggestion(&self) -> Option<&Suggestion> {
        self.selected.and_then(|i| self.suggestions.get(i))
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Close the panel and forget results, e.g. when the input becomes too short.
    pub fn clear(&mut self) {
        self.query = None;
        self.suggestions.clear();
        self.open = false;
        self.loading = false;
        self.selected = None;
    }

    /// Rows from the previous query stay hidden behind the loading state and cannot be
    /// selected until the new lookup finishes.
    pub fn begin_lookup(&mut self, query: &str) {
        self.query = Some(query.to_string());
        self.loading = true;
        self.open = true;
        self.selected = None;
    }

    /// Show up to `cap` of `meals`. An empty list leaves the panel open in the "no results"
    /// state.
    pub fn finish_lookup(&mut self, query: &str, meals: &[Meal], cap: usize) {
        self.query = Some(query.to_string());
        self.suggestions = meals
            .iter()
            .take(cap)
            .map(|meal| Suggestion::from_meal(meal, query))
            .collect();
        self.loading = false;
        self.open = true;
        self.selected = None;
    }

    /// A failed lookup is displayed exactly like one with no matches.
    pub fn fail_lookup(&mut self) {
        self.suggestions.clear();
        self.loading = false;
        self.selected = None;
    }

    /// The in-flight lookup will never be applied; stop showing it as loading.
    pub fn cancel_lookup(&mut self) {
        self.loading = false;
    }

    /// Input regained focus: re-open if there is something to show.
    pub fn focus(&mut self) {
        if !self.input.trim().is_empty() && !self.suggestions.is_empty() {
            self.open = true;
        }
    }

    /// Click outside the panel.
    pub fn dismiss(&mut self) {
        self.open = false;
        self.selected = None;
    }

    pub fn handle_key(&mut self, key: Key) -> PanelAction {
        if key == Key::Escape {
            self.dismiss();
            return PanelAction::ReleaseFocus;
        }

        if !self.open || self.loading || self.suggestions.is_empty() {
            return match key {
                Key::Enter => self.search_current_input(),
                _ => PanelAction::Stay,
            };
        }

        let last = self.suggestions.len() - 1;
        match key {
            Key::ArrowDown => {
                self.selected = Some(match self.selected {
                    None => 0,
                    Some(i) => (i + 1).min(last),
                });
                PanelAction::Stay
            }
            Key::ArrowUp => {
                self.selected = match self.selected {
                    Some(i) if i > 0 => Some(i - 1),
                    _ => None,
                };
                PanelAction::Stay
            }
            Key::Enter => match self.selected_suggestion().cloned() {
                Some(chosen) => {
                    self.input = chosen.name.clone();
                    self.dismiss();
                    PanelAction::Commit(chosen)
                }
                None => self.search_current_input(),
            },
            Key::Escape => PanelAction::ReleaseFocus,
        }
    }

    fn search_current_input(&mut self) -> PanelAction {
        self.dismiss();
        let query = self.input.trim();
        if query.is_empty() {
            PanelAction::Stay
        } else {
            PanelAction::Search(query.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures;

    fn meals(n: usize) -> Vec<Meal> {
        (0..n)
            .map(|i| fixtures::meal(&format!("{i}"), &format!("Chicken dish {i}")))
            .collect()
    }

    fn panel_with(n: usize) -> SuggestionPanel {
        let mut panel = SuggestionPanel::new();
        panel.set_input("chick");
        panel.begin_lookup("chick");
        panel.finish_lookup("chick", &meals(n), 6);
        panel
    }

    #[test]
    fn test_state_transitions_through_lookup() {
        let mut panel = SuggestionPanel::new();
        assert_eq!(panel.state(), PanelState::Closed);

        panel.begin_lookup("chick");
        assert_eq!(panel.state(), PanelState::OpenLoading);

        panel.finish_lookup("chick", &meals(3), 6);
        assert_eq!(panel.state(), PanelState::OpenResults);
        assert_eq!(panel.suggestions().len(), 3);
        assert_eq!(panel.query(), Some("chick"));
    }

    #[test]
    fn test_no_matches_opens_empty_state() {
        let mut panel = SuggestionPanel::new();
        panel.begin_lookup("zzz");
        panel.finish_lookup("zzz", &[], 6);
        assert_eq!(panel.state(), PanelState::OpenEmpty);
    }

    #[test]
    fn test_failure_looks_like_no_results() {
        let mut panel = panel_with(3);
        panel.begin_lookup("chicke");
        panel.fail_lookup();
        assert_eq!(panel.state(), PanelState::OpenEmpty);
        assert!(!panel.is_loading());
    }

    #[test]
    fn test_results_truncated_to_cap() {
        let panel = panel_with(10);
        assert_eq!(panel.suggestions().len(), 6);
        assert_eq!(panel.suggestions()[5].name, "Chicken dish 5");
    }

    #[test]
    fn test_suggestions_carry_highlighted_name() {
        let panel = panel_with(1);
        let first = &panel.suggestions()[0];
        assert!(first.highlighted[0].matched);
        assert_eq!(first.highlighted[0].text, "Chick");
    }

    #[test]
    fn test_arrow_down_is_bounded() {
        let mut panel = panel_with(3);
        assert_eq!(panel.selected(), None);

        panel.handle_key(Key::ArrowDown);
        assert_eq!(panel.selected(), Some(0));

        for _ in 0..5 {
            panel.handle_key(Key::ArrowDown);
        }
        assert_eq!(panel.selected(), Some(2));
    }

    #[test]
    fn test_arrow_up_returns_to_no_selection() {
        let mut panel = panel_with(3);
        panel.handle_key(Key::ArrowUp);
        assert_eq!(panel.selected(), None);

        panel.handle_key(Key::ArrowDown);
        panel.handle_key(Key::ArrowDown);
        panel.handle_key(Key::ArrowUp);
        assert_eq!(panel.selected(), Some(0));
        panel.handle_key(Key::ArrowUp);
        assert_eq!(panel.selected(), None);
    }

    #[test]
    fn test_enter_commits_selected_suggestion() {
        let mut panel = panel_with(3);
        panel.handle_key(Key::ArrowDown);
        panel.handle_key(Key::ArrowDown);

        match panel.handle_key(Key::Enter) {
            PanelAction::Commit(chosen) => assert_eq!(chosen.name, "Chicken dish 1"),
            other => panic!("expected commit, got {other:?}"),
        }
        assert_eq!(panel.state(), PanelState::Closed);
        assert_eq!(panel.input(), "Chicken dish 1");
    }

    #[test]
    fn test_enter_without_selection_searches() {
        let mut panel = panel_with(3);
        assert_eq!(
            panel.handle_key(Key::Enter),
            PanelAction::Search("chick".into())
        );
        assert_eq!(panel.state(), PanelState::Closed);
    }

    #[test]
    fn test_enter_while_closed_searches_unless_blank() {
        let mut panel = SuggestionPanel::new();
        panel.set_input("  pasta ");
        assert_eq!(
            panel.handle_key(Key::Enter),
            PanelAction::Search("pasta".into())
        );

        panel.set_input("   ");
        assert_eq!(panel.handle_key(Key::Enter), PanelAction::Stay);
    }

    #[test]
    fn test_arrows_ignored_while_closed() {
        let mut panel = panel_with(3);
        panel.dismiss();
        assert_eq!(panel.handle_key(Key::ArrowDown), PanelAction::Stay);
        assert_eq!(panel.selected(), None);
    }

    #[test]
    fn test_keys_ignore_hidden_rows_while_loading() {
        let mut panel = panel_with(3);
        panel.handle_key(Key::ArrowDown);
        panel.set_input("beef");
        panel.begin_lookup("beef");
        assert_eq!(panel.selected(), None);

        assert_eq!(panel.handle_key(Key::ArrowDown), PanelAction::Stay);
        assert_eq!(panel.selected(), None);
        assert_eq!(
            panel.handle_key(Key::Enter),
            PanelAction::Search("beef".into())
        );
        assert_eq!(panel.state(), PanelState::Closed);
    }

    #[test]
    fn test_escape_always_closes() {
        let mut panel = panel_with(3);
        panel.handle_key(Key::ArrowDown);
        assert_eq!(panel.handle_key(Key::Escape), PanelAction::ReleaseFocus);
        assert_eq!(panel.state(), PanelState::Closed);
        assert_eq!(panel.selected(), None);

        let mut closed = SuggestionPanel::new();
        assert_eq!(closed.handle_key(Key::Escape), PanelAction::ReleaseFocus);
        assert_eq!(closed.state(), PanelState::Closed);

        let mut loading = SuggestionPanel::new();
        loading.begin_lookup("chick");
        loading.handle_key(Key::Escape);
        assert_eq!(loading.state(), PanelState::Closed);
    }

    #[test]
    fn test_focus_reopens_only_with_results() {
        let mut panel = panel_with(2);
        panel.dismiss();
        panel.focus();
        assert_eq!(panel.state(), PanelState::OpenResults);

        let mut empty = SuggestionPanel::new();
        empty.set_input("chick");
        empty.focus();
        assert_eq!(empty.state(), PanelState::Closed);
    }

    #[test]
    fn test_clear_closes_and_forgets() {
        let mut panel = panel_with(3);
        panel.handle_key(Key::ArrowDown);
        panel.clear();
        assert_eq!(panel.state(), PanelState::Closed);
        assert!(panel.suggestions().is_empty());
        assert_eq!(panel.selected(), None);
        assert_eq!(panel.query(), None);
    }
}
