//! Search box state: query, result dropdown, keyboard selection and the
//! favorites dropdown next to it.

use tracing::{debug, warn};

use crate::catalog::Movie;
use crate::dismiss::RegionId;
use crate::route::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKey {
    ArrowUp,
    ArrowDown,
    Enter,
}

#[derive(Debug, Clone)]
pub enum SearchMessage {
    QueryChanged(String),
    ResultsLoaded { generation: u64, results: Vec<Movie> },
    SearchFailed { generation: u64, error: String },
    Key(SearchKey),
    ResultClicked(i64),
    RouteChanged,
    ToggleFavoritesMenu,
    Dismissed(RegionId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchAction {
    Search { generation: u64, query: String },
    Navigate(Route),
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    query: String,
    results: Vec<Movie>,
    selected_index: Option<usize>,
    show_results: bool,
    no_results: bool,
    show_favorites: bool,
    generation: u64,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[Movie] {
        &self.results
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn show_results(&self) -> bool {
        self.show_results
    }

    pub fn no_results(&self) -> bool {
        self.no_results
    }

    pub fn show_favorites(&self) -> bool {
        self.show_favorites
    }

    pub fn update(&mut self, message: SearchMessage) -> Option<SearchAction> {
        match message {
            SearchMessage::QueryChanged(query) => self.handle_query_changed(query),

            SearchMessage::ResultsLoaded {
                generation,
                results,
            } => {
                if generation != self.generation {
                    debug!("Dropping stale search results (generation {})", generation);
                    return None;
                }
                self.no_results = results.is_empty();
                self.results = results;
                self.show_results = true;
                None
            }

            SearchMessage::SearchFailed { generation, error } => {
                if generation == self.generation {
                    warn!("Search for {:?} failed: {}", self.query, error);
                }
                None
            }

            SearchMessage::Key(key) => self.handle_key(key),

            SearchMessage::ResultClicked(id) => Some(self.open_movie(id)),

            SearchMessage::RouteChanged => {
                self.clear_query();
                self.show_results = false;
                None
            }

            SearchMessage::ToggleFavoritesMenu => {
                self.show_favorites = !self.show_favorites;
                self.show_results = false;
                None
            }

            SearchMessage::Dismissed(region) => {
                match region {
                    RegionId::SearchResults => self.show_results = false,
                    RegionId::Favorites => self.show_favorites = false,
                }
                None
            }
        }
    }

    fn handle_query_changed(&mut self, query: String) -> Option<SearchAction> {
        self.query = query;
        self.selected_index = None;
        self.generation += 1;

        if self.query.trim().is_empty() {
            self.results.clear();
            self.show_results = false;
            self.no_results = false;
            return None;
        }

        Some(SearchAction::Search {
            generation: self.generation,
            query: self.query.clone(),
        })
    }

    fn handle_key(&mut self, key: SearchKey) -> Option<SearchAction> {
        let len = self.results.len();
        match key {
            SearchKey::ArrowDown => {
                if len > 0 {
                    self.selected_index = Some(match self.selected_index {
                        None => 0,
                        Some(i) => (i + 1).min(len - 1),
                    });
                }
                None
            }
            SearchKey::ArrowUp => {
                if len > 0 {
                    self.selected_index = Some(match self.selected_index {
                        None => len - 1,
                        Some(i) => i.saturating_sub(1),
                    });
                }
                None
            }
            SearchKey::Enter => {
                if let Some(movie) = self.selected_index.and_then(|i| self.results.get(i)) {
                    let id = movie.id;
                    return Some(self.open_movie(id));
                }
                self.submit()
            }
        }
    }

    fn open_movie(&mut self, id: i64) -> SearchAction {
        self.show_results = false;
        self.show_favorites = false;
        SearchAction::Navigate(Route::Movie(id))
    }

    fn submit(&mut self) -> Option<SearchAction> {
        if self.query.trim().is_empty() {
            return None;
        }
        let query = std::mem::take(&mut self.query);
        self.clear_query();
        self.show_results = false;
        self.show_favorites = false;
        Some(SearchAction::Navigate(Route::Search(query)))
    }

    fn clear_query(&mut self) {
        self.query.clear();
        self.selected_index = None;
        self.results.clear();
        self.no_results = false;
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_results(query: &str, ids: &[i64]) -> SearchState {
        let mut state = SearchState::new();
        let action = state.update(SearchMessage::QueryChanged(query.to_string()));
        let Some(SearchAction::Search { generation, .. }) = action else {
            panic!("expected a search action");
        };
        state.update(SearchMessage::ResultsLoaded {
            generation,
            results: ids.iter().map(|id| Movie::new(*id, "m")).collect(),
        });
        state
    }

    #[test]
    fn test_blank_query_never_searches() {
        let mut state = with_results("alien", &[1, 2]);
        assert!(state.show_results());

        assert_eq!(state.update(SearchMessage::QueryChanged("   ".to_string())), None);
        assert!(state.results().is_empty());
        assert!(!state.show_results());
        assert_eq!(state.update(SearchMessage::QueryChanged(String::new())), None);
    }

    #[test]
    fn test_query_emits_search() {
        let mut state = SearchState::new();
        let action = state.update(SearchMessage::QueryChanged("Inception".to_string()));
        assert_eq!(
            action,
            Some(SearchAction::Search {
                generation: 1,
                query: "Inception".to_string()
            })
        );
    }

    #[test]
    fn test_enter_without_selection_submits_query() {
        let mut state = with_results("Inception", &[27205]);
        let action = state.update(SearchMessage::Key(SearchKey::Enter));
        assert_eq!(
            action,
            Some(SearchAction::Navigate(Route::Search("Inception".to_string())))
        );
        assert_eq!(state.query(), "");
        assert!(!state.show_results());
    }

    #[test]
    fn test_enter_with_selection_opens_movie() {
        let mut state = with_results("Inception", &[27205, 64956]);
        state.update(SearchMessage::Key(SearchKey::ArrowDown));
        state.update(SearchMessage::Key(SearchKey::ArrowDown));
        let action = state.update(SearchMessage::Key(SearchKey::Enter));
        assert_eq!(action, Some(SearchAction::Navigate(Route::Movie(64956))));
        assert!(!state.show_results());
    }

    #[test]
    fn test_arrow_keys_clamp() {
        let mut state = with_results("a", &[1, 2, 3]);
        state.update(SearchMessage::Key(SearchKey::ArrowUp));
        assert_eq!(state.selected_index(), Some(2));
        for _ in 0..5 {
            state.update(SearchMessage::Key(SearchKey::ArrowDown));
        }
        assert_eq!(state.selected_index(), Some(2));
        for _ in 0..5 {
            state.update(SearchMessage::Key(SearchKey::ArrowUp));
        }
        assert_eq!(state.selected_index(), Some(0));

        let mut empty = with_results("zzz", &[]);
        assert!(empty.no_results());
        empty.update(SearchMessage::Key(SearchKey::ArrowDown));
        assert_eq!(empty.selected_index(), None);
    }

    #[test]
    fn test_stale_results_are_dropped() {
        let mut state = SearchState::new();
        let first = state.update(SearchMessage::QueryChanged("inc".to_string()));
        state.update(SearchMessage::QueryChanged("incep".to_string()));
        let Some(SearchAction::Search { generation, .. }) = first else {
            panic!("expected a search action");
        };
        state.update(SearchMessage::ResultsLoaded {
            generation,
            results: vec![Movie::new(1, "old")],
        });
        assert!(state.results().is_empty());
        assert!(!state.show_results());
    }

    #[test]
    fn test_route_change_clears_query() {
        let mut state = with_results("alien", &[1]);
        state.update(SearchMessage::RouteChanged);
        assert_eq!(state.query(), "");
        assert!(!state.show_results());
        assert!(state.results().is_empty());
    }

    #[test]
    fn test_favorites_menu_and_dismissal() {
        let mut state = with_results("alien", &[1]);
        state.update(SearchMessage::ToggleFavoritesMenu);
        assert!(state.show_favorites());
        assert!(!state.show_results());

        state.update(SearchMessage::Dismissed(RegionId::Favorites));
        assert!(!state.show_favorites());
    }

    #[test]
    fn test_outside_click_closes_dropdowns() {
        use crate::dismiss::{DismissDispatcher, Point, Rect, Region};

        let search_region = || {
            Region::new(vec![
                Rect::new(100.0, 10.0, 300.0, 30.0),
                Rect::new(100.0, 48.0, 300.0, 300.0),
            ])
        };
        let mut dispatcher = DismissDispatcher::new();
        let mut state = with_results("alien", &[1, 2]);
        dispatcher.open(RegionId::SearchResults, search_region());

        // A click on the result list keeps it open.
        for id in dispatcher.pointer_down(Point { x: 200.0, y: 100.0 }) {
            state.update(SearchMessage::Dismissed(id));
        }
        assert!(state.show_results());

        state.update(SearchMessage::ToggleFavoritesMenu);
        dispatcher.close(RegionId::SearchResults);
        dispatcher.open(
            RegionId::Favorites,
            Region::new(vec![Rect::new(600.0, 48.0, 288.0, 300.0)]),
        );
        assert!(state.show_favorites());

        let closed = dispatcher.pointer_down(Point { x: 5.0, y: 500.0 });
        assert_eq!(closed, vec![RegionId::Favorites]);
        for id in closed {
            state.update(SearchMessage::Dismissed(id));
        }
        assert!(!state.show_favorites());
        assert!(!dispatcher.is_open(RegionId::Favorites));

        // Results reopen on the next search and close on an outside click.
        let action = state.update(SearchMessage::QueryChanged("alien 2".to_string()));
        let Some(SearchAction::Search { generation, .. }) = action else {
            panic!("expected a search action");
        };
        state.update(SearchMessage::ResultsLoaded {
            generation,
            results: vec![Movie::new(3, "m")],
        });
        dispatcher.open(RegionId::SearchResults, search_region());
        for id in dispatcher.pointer_down(Point { x: 700.0, y: 100.0 }) {
            state.update(SearchMessage::Dismissed(id));
        }
        assert!(!state.show_results());
        assert_eq!(state.query(), "alien 2");
    }

    #[test]
    fn test_result_click_opens_movie() {
        let mut state = with_results("alien", &[348]);
        assert_eq!(
            state.update(SearchMessage::ResultClicked(348)),
            Some(SearchAction::Navigate(Route::Movie(348)))
        );
    }
}
