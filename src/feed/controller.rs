use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

use super::message::{FeedAction, FeedMessage};
use super::state::FeedState;
use crate::catalog::{prefetch_details, CatalogService, DetailCache, DiscoverQuery, FilterTuple};

/// Runs a `FeedState` against the catalog. Page fetches run as tasks and
/// post their outcome back through the queue, so every state change happens
/// in `dispatch`, one message at a time.
pub struct FeedController {
    state: FeedState,
    catalog: Arc<dyn CatalogService>,
    details: Option<DetailCache>,
    tx: mpsc::UnboundedSender<FeedMessage>,
    rx: mpsc::UnboundedReceiver<FeedMessage>,
}

impl FeedController {
    pub fn new(catalog: Arc<dyn CatalogService>, details: DetailCache) -> Self {
        Self::build(catalog, Some(details))
    }

    /// A feed whose pages are not followed by detail prefetches.
    pub fn without_prefetch(catalog: Arc<dyn CatalogService>) -> Self {
        Self::build(catalog, None)
    }

    fn build(catalog: Arc<dyn CatalogService>, details: Option<DetailCache>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state: FeedState::default(),
            catalog,
            details,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn start(&mut self) {
        self.dispatch(FeedMessage::Start);
    }

    pub fn set_filter(&mut self, filter: FilterTuple) {
        self.dispatch(FeedMessage::FilterChanged(filter));
    }

    pub fn load_more(&mut self) {
        self.dispatch(FeedMessage::LoadMoreRequested);
    }

    pub fn dispatch(&mut self, message: FeedMessage) {
        if let Some(action) = self.state.update(message) {
            self.execute(action);
        }
    }

    fn execute(&self, action: FeedAction) {
        match action {
            FeedAction::FetchPage {
                generation,
                filter,
                page,
            } => {
                let catalog = Arc::clone(&self.catalog);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let query = DiscoverQuery::most_watched(&filter);
                    let result = catalog
                        .discover(&query, page)
                        .await
                        .map_err(|e| e.to_string());
                    // The receiver lives as long as the controller.
                    let _ = tx.send(FeedMessage::PageLoaded {
                        generation,
                        page,
                        result,
                    });
                });
            }
            FeedAction::PrefetchDetails(ids) => {
                if let Some(ref details) = self.details {
                    debug!("Prefetching details for {} movies", ids.len());
                    prefetch_details(Arc::clone(&self.catalog), details.clone(), ids);
                }
            }
        }
    }

    /// Waits for and handles the next queued message.
    pub async fn next_event(&mut self) {
        if let Some(message) = self.rx.recv().await {
            self.dispatch(message);
        }
    }

    /// Handles messages until no page fetch is in flight.
    pub async fn settle(&mut self) {
        while self.state.is_fetching() {
            self.next_event().await;
        }
    }

    /// Handles whatever is already queued without waiting.
    pub fn drain(&mut self) {
        while let Ok(message) = self.rx.try_recv() {
            self.dispatch(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::FakeCatalog;
    use crate::feed::FeedStatus;
    use std::time::Duration;

    fn controller(catalog: &Arc<FakeCatalog>) -> FeedController {
        FeedController::new(catalog.clone(), DetailCache::new())
    }

    #[tokio::test]
    async fn test_fetches_every_page_exactly_once() {
        let catalog = Arc::new(FakeCatalog::new(3, 4));
        let mut feed = controller(&catalog);

        feed.start();
        feed.settle().await;
        while feed.state().has_next_page() {
            feed.load_more();
            feed.load_more();
            feed.settle().await;
        }

        assert!(feed.state().is_exhausted());
        let pages: Vec<u32> = catalog.discover_calls().iter().map(|(_, p)| *p).collect();
        assert_eq!(pages, vec![1, 2, 3]);

        let ids: Vec<i64> = feed.state().movies().map(|m| m.id).collect();
        assert_eq!(ids.len(), 12);
        assert_eq!(&ids[..5], &[100, 101, 102, 103, 200]);
        assert_eq!(ids.last(), Some(&303));
    }

    #[tokio::test]
    async fn test_request_carries_only_set_filters() {
        let catalog = Arc::new(FakeCatalog::new(1, 1));
        let mut feed = controller(&catalog);

        feed.set_filter(FilterTuple::new(None, Some(35), None));
        feed.settle().await;

        let (query, page) = catalog.discover_calls().remove(0);
        assert_eq!(page, 1);
        let keys: Vec<&str> = query.to_params(page).iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["sort_by", "with_genres", "page"]);
    }

    #[tokio::test]
    async fn test_superseded_response_is_discarded() {
        let catalog = Arc::new(FakeCatalog::new(2, 2));
        catalog.delay_genre(0, Duration::from_millis(50));
        let mut feed = controller(&catalog);

        feed.start();
        feed.set_filter(FilterTuple::new(None, Some(18), None));
        feed.settle().await;

        // Let the slow response for the old filter arrive, then handle it.
        tokio::time::sleep(Duration::from_millis(100)).await;
        feed.drain();

        assert_eq!(catalog.discover_calls().len(), 2);
        assert!(feed.state().movies().all(|m| m.id / 10_000 == 18));
        assert_eq!(feed.state().movies().count(), 2);
        assert_eq!(feed.state().status(), &FeedStatus::HasMore { next_page: 2 });
    }

    #[tokio::test]
    async fn test_failure_sets_error_without_retry() {
        let catalog = Arc::new(FakeCatalog::new(3, 2));
        let mut feed = controller(&catalog);

        feed.start();
        feed.settle().await;
        catalog.fail_discover(true);
        feed.load_more();
        feed.settle().await;

        assert!(feed.state().is_error());
        assert_eq!(feed.state().movies().count(), 2);
        feed.load_more();
        assert!(!feed.state().is_fetching());
        assert_eq!(catalog.discover_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_successful_pages_are_prefetched() {
        let catalog = Arc::new(FakeCatalog::new(1, 3));
        let details = DetailCache::new();
        let mut feed = FeedController::new(catalog.clone(), details.clone());

        feed.start();
        feed.settle().await;
        for _ in 0..100 {
            if details.len().await == 3 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        assert_eq!(details.len().await, 3);
        assert!(details.get(100).await.unwrap().is_complete());
    }

    #[tokio::test]
    async fn test_feed_without_prefetch_fetches_no_details() {
        let catalog = Arc::new(FakeCatalog::new(2, 3));
        let mut feed = FeedController::without_prefetch(catalog.clone());

        feed.start();
        feed.settle().await;
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(feed.state().movies().count(), 3);
        assert_eq!(catalog.detail_calls(), 0);
    }

    #[tokio::test]
    async fn test_prefetch_failure_leaves_feed_alone() {
        let catalog = Arc::new(FakeCatalog::new(2, 2));
        catalog.fail_details(true);
        let mut feed = controller(&catalog);

        feed.start();
        feed.settle().await;
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(feed.state().status(), &FeedStatus::HasMore { next_page: 2 });
        assert_eq!(feed.state().movies().count(), 2);
    }
}
