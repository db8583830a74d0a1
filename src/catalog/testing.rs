//! In-memory catalog used by the unit tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::client::{CatalogError, CatalogResult, CatalogService};
use super::query::DiscoverQuery;
use super::types::{CastMember, Credits, DiscoveryPage, Movie};

/// Serves `total_pages` discover pages of `per_page` movies each.
/// Movie ids are `genre * 10_000 + page * 100 + index`, so results of
/// different filters never collide.
pub struct FakeCatalog {
    total_pages: u32,
    per_page: usize,
    search_results: Mutex<HashMap<String, Vec<Movie>>>,
    discover_delays: Mutex<HashMap<i64, Duration>>,
    discover_calls: Mutex<Vec<(DiscoverQuery, u32)>>,
    search_calls: AtomicUsize,
    detail_calls: AtomicUsize,
    fail_discover: AtomicBool,
    fail_details: AtomicBool,
}

impl FakeCatalog {
    pub fn new(total_pages: u32, per_page: usize) -> Self {
        Self {
            total_pages,
            per_page,
            search_results: Mutex::new(HashMap::new()),
            discover_delays: Mutex::new(HashMap::new()),
            discover_calls: Mutex::new(Vec::new()),
            search_calls: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
            fail_discover: AtomicBool::new(false),
            fail_details: AtomicBool::new(false),
        }
    }

    pub fn with_search(self, query: &str, results: Vec<Movie>) -> Self {
        self.search_results
            .lock()
            .unwrap()
            .insert(query.to_string(), results);
        self
    }

    /// Delays discover responses for one genre (0 = no genre).
    pub fn delay_genre(&self, genre: i64, delay: Duration) {
        self.discover_delays.lock().unwrap().insert(genre, delay);
    }

    pub fn fail_discover(&self, fail: bool) {
        self.fail_discover.store(fail, Ordering::SeqCst);
    }

    pub fn fail_details(&self, fail: bool) {
        self.fail_details.store(fail, Ordering::SeqCst);
    }

    pub fn discover_calls(&self) -> Vec<(DiscoverQuery, u32)> {
        self.discover_calls.lock().unwrap().clone()
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    fn unavailable(endpoint: &str) -> CatalogError {
        CatalogError::Status(503, endpoint.to_string())
    }
}

#[async_trait]
impl CatalogService for FakeCatalog {
    async fn search(&self, query: &str) -> CatalogResult<Vec<Movie>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        let results = self.search_results.lock().unwrap().get(query).cloned();
        Ok(results.unwrap_or_default())
    }

    async fn discover(&self, query: &DiscoverQuery, page: u32) -> CatalogResult<DiscoveryPage> {
        self.discover_calls.lock().unwrap().push((query.clone(), page));

        let genre = query.genre_id.unwrap_or(0);
        let delay = self.discover_delays.lock().unwrap().get(&genre).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_discover.load(Ordering::SeqCst) {
            return Err(Self::unavailable("discover/movie"));
        }

        let results = (0..self.per_page)
            .map(|i| {
                let id = genre * 10_000 + page as i64 * 100 + i as i64;
                Movie::new(id, format!("Movie {}", id))
            })
            .collect();

        Ok(DiscoveryPage {
            results,
            page,
            total_pages: self.total_pages,
        })
    }

    async fn movie_details(&self, id: i64) -> CatalogResult<Movie> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_details.load(Ordering::SeqCst) {
            return Err(Self::unavailable("movie"));
        }

        let mut movie = Movie::new(id, format!("Movie {}", id));
        movie.runtime_minutes = Some(120);
        movie.credits = Some(Credits {
            cast: vec![CastMember {
                name: "Actor".to_string(),
                character: "Lead".to_string(),
                profile_path: None,
            }],
        });
        Ok(movie)
    }

    async fn now_playing(&self) -> CatalogResult<Vec<Movie>> {
        Ok(vec![Movie::new(1, "Now 1"), Movie::new(2, "Now 2")])
    }
}
