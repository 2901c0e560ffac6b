//! The debounced suggestion fetcher task.
//!
//! One task owns the [`SuggestionPanel`], the [`Debouncer`] and the request generation
//! counter, so none of them need locking. Front ends hold a cloneable [`SuggestHandle`]:
//! keystrokes and key presses go in over a channel, panel snapshots come out over a watch
//! channel.
//!
//! Lookups run as separate tasks and report back to the owner. Each one is stamped with the
//! generation current when it was issued, and only a result carrying the latest generation is
//! applied. A slow lookup for an older query can therefore never overwrite the results of a
//! newer one.

use super::panel::{Key, PanelAction, SuggestionPanel};
use crate::client::SharedSource;
use crate::config::SuggestConfig;
use crate::debounce::Debouncer;
use crate::model::Meal;
use crate::{RecipeError, RecipeResult};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::Instant;

enum Command {
    Input(String),
    Key(Key, oneshot::Sender<PanelAction>),
    Focus,
    Dismiss,
}

struct Resolved {
    generation: u64,
    query: String,
    result: RecipeResult<Vec<Meal>>,
}

/// Front-end side of a running suggestion fetcher.
///
/// The fetcher task stops once every clone of the handle has been dropped.
#[derive(Clone)]
pub struct SuggestHandle {
    commands: mpsc::UnboundedSender<Command>,
    panel: watch::Receiver<SuggestionPanel>,
}

impl SuggestHandle {
    /// Replace the input text. Call once per keystroke.
    pub fn type_text(&self, text: impl Into<String>) -> RecipeResult<()> {
        self.send(Command::Input(text.into()))
    }

    /// Apply a key press and report what the front end should do next.
    pub async fn press(&self, key: Key) -> RecipeResult<PanelAction> {
        let (reply, action) = oneshot::channel();
        self.send(Command::Key(key, reply))?;
        action.await.map_err(|_| RecipeError::FetcherClosed)
    }

    pub fn focus(&self) -> RecipeResult<()> {
        self.send(Command::Focus)
    }

    pub fn dismiss(&self) -> RecipeResult<()> {
        self.send(Command::Dismiss)
    }

    /// Snapshot of the panel as last published.
    pub fn panel(&self) -> SuggestionPanel {
        self.panel.borrow().clone()
    }

    /// Wait for the next published change and return it.
    pub async fn changed(&mut self) -> RecipeResult<SuggestionPanel> {
        self.panel
            .changed()
            .await
            .map_err(|_| RecipeError::FetcherClosed)?;
        Ok(self.panel.borrow_and_update().clone())
    }

    fn send(&self, command: Command) -> RecipeResult<()> {
        self.commands
            .send(command)
            .map_err(|_| RecipeError::FetcherClosed)
    }
}

/// Start a suggestion fetcher on the current tokio runtime.
pub fn spawn(source: SharedSource, cfg: SuggestConfig) -> SuggestHandle {
    let (commands_tx, commands) = mpsc::unbounded_channel();
    let (resolved_tx, resolved) = mpsc::unbounded_channel();
    let (publish, panel) = watch::channel(SuggestionPanel::new());

    let task = FetcherTask {
        source,
        cfg,
        panel: SuggestionPanel::new(),
        debouncer: Debouncer::new(cfg.debounce),
        generation: 0,
        commands,
        resolved_tx,
        resolved,
        publish,
    };
    tokio::spawn(task.run());

    SuggestHandle {
        commands: commands_tx,
        panel,
    }
}

struct FetcherTask {
    source: SharedSource,
    cfg: SuggestConfig,
    panel: SuggestionPanel,
    debouncer: Debouncer<String>,
    generation: u64,
    commands: mpsc::UnboundedReceiver<Command>,
    resolved_tx: mpsc::UnboundedSender<Resolved>,
    resolved: mpsc::UnboundedReceiver<Resolved>,
    publish: watch::Sender<SuggestionPanel>,
}

impl FetcherTask {
    async fn run(mut self) {
        loop {
            let deadline = self.debouncer.deadline();
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some(resolved) = self.resolved.recv() => self.apply(resolved),
                _ = sleep_until(deadline) => {
                    if let Some(text) = self.debouncer.take_ready(Instant::now()) {
                        self.stabilized(text);
                    }
                }
            }
            self.publish();
        }
        tracing::debug!("suggestion fetcher stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Input(text) => {
                self.panel.set_input(text.clone());
                self.debouncer.push(text, Instant::now());
            }
            Command::Key(key, reply) => {
                let action = self.panel.handle_key(key);
                if !matches!(action, PanelAction::Stay) {
                    // The input has been acted on; nothing pending should reopen the panel.
                    self.debouncer.cancel();
                    self.invalidate_in_flight();
                }
                let _ = reply.send(action);
            }
            Command::Focus => self.panel.focus(),
            Command::Dismiss => self.panel.dismiss(),
        }
    }

    fn stabilized(&mut self, text: String) {
        let Some(query) = self.cfg.lookup_query(&text) else {
            self.invalidate_in_flight();
            self.panel.clear();
            return;
        };

        self.generation += 1;
        let generation = self.generation;
        let query = query.as_str().to_string();
        self.panel.begin_lookup(&query);
        tracing::debug!(%query, generation, "issuing suggestion lookup");

        let source = self.source.clone();
        let report = self.resolved_tx.clone();
        tokio::spawn(async move {
            let result = source.search_by_name(&query).await;
            let _ = report.send(Resolved {
                generation,
                query,
                result,
            });
        });
    }

    fn apply(&mut self, resolved: Resolved) {
        if resolved.generation != self.generation {
            tracing::debug!(
                query = %resolved.query,
                generation = resolved.generation,
                latest = self.generation,
                "dropping stale suggestion lookup"
            );
            return;
        }

        match resolved.result {
            Ok(meals) => {
                self.panel
                    .finish_lookup(&resolved.query, &meals, self.cfg.max_suggestions);
            }
            Err(e) => {
                tracing::warn!(query = %resolved.query, "failed to fetch suggestions: {e}");
                self.panel.fail_lookup();
            }
        }
    }

    fn invalidate_in_flight(&mut self) {
        self.generation += 1;
        self.panel.cancel_lookup();
    }

    fn publish(&self) {
        let panel = &self.panel;
        self.publish.send_if_modified(|current| {
            if current == panel {
                false
            } else {
                *current = panel.clone();
                true
            }
        });
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::FakeSource;
    use crate::suggest::PanelState;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::sleep;

    const DEBOUNCE: Duration = Duration::from_millis(300);
    const KEYSTROKE_GAP: Duration = Duration::from_millis(50);

    fn cfg() -> SuggestConfig {
        SuggestConfig {
            debounce: DEBOUNCE,
            min_query_chars: 2,
            max_suggestions: 6,
        }
    }

    fn chicken_source() -> Arc<FakeSource> {
        Arc::new(FakeSource::with_meals(&[
            "Chicken Handi",
            "Chick-Fil-A Sandwich",
            "Chicken Couscous",
            "Beef Wellington",
        ]))
    }

    async fn type_slowly(handle: &SuggestHandle, keystrokes: &[&str]) {
        for text in keystrokes {
            handle.type_text(*text).unwrap();
            sleep(KEYSTROKE_GAP).await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_chick_opens_panel_with_three_matches() {
        let source = chicken_source();
        let handle = spawn(source.clone(), cfg());

        type_slowly(&handle, &["c", "ch", "chi", "chic"]).await;
        handle.type_text("chick").unwrap();
        let last_keystroke = Instant::now();

        sleep(DEBOUNCE + Duration::from_millis(1)).await;
        assert!(Instant::now() - last_keystroke <= DEBOUNCE + Duration::from_millis(1));

        let panel = handle.panel();
        assert_eq!(panel.state(), PanelState::OpenResults);
        let names: Vec<_> = panel.suggestions().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Chicken Handi", "Chick-Fil-A Sandwich", "Chicken Couscous"]
        );
        assert_eq!(source.search_count(), 1);
        assert_eq!(source.searched(), vec!["chick"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_issued_before_input_stabilizes() {
        let source = chicken_source();
        let handle = spawn(source.clone(), cfg());

        type_slowly(&handle, &["ch", "chi", "chic", "chick"]).await;
        sleep(DEBOUNCE - KEYSTROKE_GAP - Duration::from_millis(1)).await;

        assert_eq!(source.search_count(), 0);
        assert_eq!(handle.panel().state(), PanelState::Closed);

        sleep(Duration::from_millis(10)).await;
        assert_eq!(source.search_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_input_issues_no_lookup() {
        let source = chicken_source();
        let handle = spawn(source.clone(), cfg());

        handle.type_text("c").unwrap();
        sleep(DEBOUNCE * 3).await;

        assert_eq!(source.search_count(), 0);
        assert_eq!(handle.panel().state(), PanelState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_input_closes_panel_without_lookup() {
        let source = chicken_source();
        let handle = spawn(source.clone(), cfg());

        handle.type_text("chick").unwrap();
        sleep(DEBOUNCE * 2).await;
        assert_eq!(handle.panel().state(), PanelState::OpenResults);

        handle.type_text("   ").unwrap();
        sleep(DEBOUNCE * 2).await;

        let panel = handle.panel();
        assert_eq!(panel.state(), PanelState::Closed);
        assert!(panel.suggestions().is_empty());
        assert_eq!(source.search_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_capped_at_display_limit() {
        let names: Vec<String> = (0..10).map(|i| format!("Pie {i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let source = Arc::new(FakeSource::with_meals(&refs));
        let handle = spawn(source, cfg());

        handle.type_text("pie").unwrap();
        sleep(DEBOUNCE * 2).await;

        let panel = handle.panel();
        assert_eq!(panel.suggestions().len(), 6);
        assert_eq!(panel.suggestions()[0].name, "Pie 0");
        assert_eq!(panel.suggestions()[5].name, "Pie 5");
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_matches_shows_empty_panel() {
        let handle = spawn(chicken_source(), cfg());

        handle.type_text("lasagne").unwrap();
        sleep(DEBOUNCE * 2).await;

        assert_eq!(handle.panel().state(), PanelState::OpenEmpty);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_lookup_is_shown_as_no_results() {
        let mut source = FakeSource::with_meals(&["Chicken Handi"]);
        source.fail_all = true;
        let source = Arc::new(source);
        let handle = spawn(source.clone(), cfg());

        handle.type_text("chick").unwrap();
        sleep(DEBOUNCE * 2).await;

        let panel = handle.panel();
        assert_eq!(panel.state(), PanelState::OpenEmpty);
        assert!(!panel.is_loading());
        assert_eq!(source.search_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_panel_is_loading_while_lookup_in_flight() {
        let mut source = FakeSource::with_meals(&["Chicken Handi"]);
        source
            .delays
            .insert("chick".into(), Duration::from_millis(500));
        let handle = spawn(Arc::new(source), cfg());

        handle.type_text("chick").unwrap();
        sleep(DEBOUNCE + Duration::from_millis(10)).await;
        assert_eq!(handle.panel().state(), PanelState::OpenLoading);

        sleep(Duration::from_millis(500)).await;
        assert_eq!(handle.panel().state(), PanelState::OpenResults);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_lookup_does_not_overwrite_newer_results() {
        let mut source = FakeSource::with_meals(&["Chicken Handi", "Chilli Prawn Linguine"]);
        source.delays.insert("chi".into(), Duration::from_millis(1_000));
        let source = Arc::new(source);
        let handle = spawn(source.clone(), cfg());

        handle.type_text("chi").unwrap();
        sleep(DEBOUNCE + Duration::from_millis(10)).await;
        handle.type_text("chicken").unwrap();
        sleep(DEBOUNCE + Duration::from_millis(10)).await;

        let panel = handle.panel();
        assert_eq!(panel.query(), Some("chicken"));
        assert_eq!(panel.suggestions().len(), 1);

        // The slow "chi" lookup resolves now and must be ignored.
        sleep(Duration::from_millis(1_000)).await;
        let panel = handle.panel();
        assert_eq!(source.searched(), vec!["chi", "chicken"]);
        assert_eq!(panel.query(), Some("chicken"));
        assert_eq!(panel.suggestions().len(), 1);
        assert_eq!(panel.suggestions()[0].name, "Chicken Handi");
    }

    #[tokio::test(start_paused = true)]
    async fn test_keyboard_navigation_and_commit() {
        let handle = spawn(chicken_source(), cfg());
        handle.type_text("chick").unwrap();
        sleep(DEBOUNCE * 2).await;

        assert_eq!(handle.press(Key::ArrowDown).await.unwrap(), PanelAction::Stay);
        assert_eq!(handle.panel().selected(), Some(0));
        for _ in 0..4 {
            handle.press(Key::ArrowDown).await.unwrap();
        }
        assert_eq!(handle.panel().selected(), Some(2));

        match handle.press(Key::Enter).await.unwrap() {
            PanelAction::Commit(chosen) => assert_eq!(chosen.name, "Chicken Couscous"),
            other => panic!("expected commit, got {other:?}"),
        }
        assert_eq!(handle.panel().state(), PanelState::Closed);
        assert_eq!(handle.panel().input(), "Chicken Couscous");
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_without_selection_requests_full_search() {
        let handle = spawn(chicken_source(), cfg());
        handle.type_text("chick").unwrap();
        sleep(DEBOUNCE * 2).await;

        assert_eq!(
            handle.press(Key::Enter).await.unwrap(),
            PanelAction::Search("chick".into())
        );
        assert_eq!(handle.panel().state(), PanelState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_while_loading_searches_new_input() {
        let mut source = FakeSource::with_meals(&["Chicken Handi", "Beef Wellington"]);
        source.delays.insert("beef".into(), Duration::from_secs(2));
        let source = Arc::new(source);
        let handle = spawn(source.clone(), cfg());

        handle.type_text("chick").unwrap();
        sleep(DEBOUNCE * 2).await;
        handle.press(Key::ArrowDown).await.unwrap();
        assert_eq!(handle.panel().selected(), Some(0));

        handle.type_text("beef").unwrap();
        sleep(DEBOUNCE + Duration::from_millis(100)).await;
        assert_eq!(handle.panel().state(), PanelState::OpenLoading);
        assert_eq!(handle.panel().selected(), None);

        assert_eq!(handle.press(Key::ArrowDown).await.unwrap(), PanelAction::Stay);
        assert_eq!(
            handle.press(Key::Enter).await.unwrap(),
            PanelAction::Search("beef".into())
        );

        sleep(Duration::from_secs(3)).await;
        assert_eq!(handle.panel().state(), PanelState::Closed);
        assert_eq!(handle.panel().input(), "beef");
    }

    #[tokio::test(start_paused = true)]
    async fn test_escape_closes_and_discards_pending_input() {
        let source = chicken_source();
        let handle = spawn(source.clone(), cfg());
        handle.type_text("chick").unwrap();
        sleep(DEBOUNCE * 2).await;

        handle.type_text("chicken").unwrap();
        assert_eq!(
            handle.press(Key::Escape).await.unwrap(),
            PanelAction::ReleaseFocus
        );
        sleep(DEBOUNCE * 2).await;

        assert_eq!(handle.panel().state(), PanelState::Closed);
        assert_eq!(source.search_count(), 1);

        handle.focus().unwrap();
        sleep(Duration::from_millis(1)).await;
        assert_eq!(handle.panel().state(), PanelState::OpenResults);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_closes_panel() {
        let handle = spawn(chicken_source(), cfg());
        handle.type_text("chick").unwrap();
        sleep(DEBOUNCE * 2).await;

        handle.dismiss().unwrap();
        sleep(Duration::from_millis(1)).await;
        assert_eq!(handle.panel().state(), PanelState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_changed_reports_published_panels() {
        let mut handle = spawn(chicken_source(), cfg());
        handle.type_text("chick").unwrap();

        let panel = loop {
            let panel = handle.changed().await.unwrap();
            if panel.state() == PanelState::OpenResults {
                break panel;
            }
        };
        assert_eq!(panel.suggestions().len(), 3);
    }
}
