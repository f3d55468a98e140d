// Debounced incremental team search

use std::sync::Arc;
use std::time::Duration;

use matchvision_models::Team;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::client::TeamSearch;

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(400);
pub const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Debouncing,
    Searching,
    Results,
    Empty,
    Selected,
}

#[derive(Debug, Clone, Default)]
pub struct SelectorView {
    pub phase: SearchPhase,
    pub query: String,
    pub results: Vec<Team>,
    pub dropdown_open: bool,
    pub loading: bool,
    pub selected: Option<Team>,
}

impl SelectorView {
    pub fn shows_dropdown(&self) -> bool {
        self.dropdown_open && !self.results.is_empty()
    }
}

pub struct TeamSelector<S> {
    search: Arc<S>,
    state: Arc<Mutex<SelectorView>>,
    pending: Option<JoinHandle<()>>,
    debounce: Duration,
}

impl<S> TeamSelector<S>
where
    S: TeamSearch + 'static,
{
    pub fn new(search: Arc<S>) -> Self {
        Self::with_debounce(search, SEARCH_DEBOUNCE)
    }

    pub fn with_debounce(search: Arc<S>, debounce: Duration) -> Self {
        Self {
            search,
            state: Arc::new(Mutex::new(SelectorView::default())),
            pending: None,
            debounce,
        }
    }

    pub async fn view(&self) -> SelectorView {
        let state = self.state.lock().await;
        let mut view = state.clone();
        if view.selected.is_some() {
            view.phase = SearchPhase::Selected;
        }
        view
    }

    // Short queries reset to idle without searching
    pub async fn input(&mut self, value: &str) {
        self.cancel_pending();

        let mut state = self.state.lock().await;
        if state.selected.is_some() {
            return;
        }
        state.query = value.to_string();

        if value.chars().count() < MIN_QUERY_CHARS {
            state.results.clear();
            state.dropdown_open = false;
            state.phase = SearchPhase::Idle;
            return;
        }
        state.phase = SearchPhase::Debouncing;
        drop(state);

        let search = Arc::clone(&self.search);
        let state = Arc::clone(&self.state);
        let query = value.to_string();
        let debounce = self.debounce;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            // The request itself is detached: later keystrokes only cancel the timer
            tokio::spawn(run_search(search, state, query));
        }));
    }

    pub async fn select(&mut self, team: Team) -> Team {
        self.cancel_pending();

        let mut state = self.state.lock().await;
        state.query.clear();
        state.results.clear();
        state.dropdown_open = false;
        state.phase = SearchPhase::Idle;
        state.selected = Some(team.clone());
        team
    }

    pub async fn set_selected(&mut self, team: Option<Team>) {
        self.cancel_pending();

        let mut state = self.state.lock().await;
        if team.is_none() {
            state.query.clear();
            state.results.clear();
            state.dropdown_open = false;
            state.phase = SearchPhase::Idle;
        }
        state.selected = team;
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<S> Drop for TeamSelector<S> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

async fn run_search<S: TeamSearch>(search: Arc<S>, state: Arc<Mutex<SelectorView>>, query: String) {
    {
        let mut state = state.lock().await;
        if state.query != query {
            return;
        }
        state.phase = SearchPhase::Searching;
        state.loading = true;
    }

    let outcome = search.search_teams(&query).await;

    let mut state = state.lock().await;
    state.loading = false;
    if state.query != query || state.selected.is_some() {
        debug!("Discarding stale search results for {:?}", query);
        return;
    }

    match outcome {
        Ok(teams) => {
            state.phase = if teams.is_empty() { SearchPhase::Empty } else { SearchPhase::Results };
            state.results = teams;
            state.dropdown_open = true;
        }
        Err(e) => {
            debug!("Team search failed for {:?}: {}", query, e);
            state.results.clear();
            state.phase = SearchPhase::Empty;
        }
    }
}
