use crate::catalog::{DiscoveryPage, FilterTuple};

/// Events that drive the discovery feed.
#[derive(Debug, Clone)]
pub enum FeedMessage {
    /// First subscription; fetches page 1 if nothing was fetched yet.
    Start,
    FilterChanged(FilterTuple),
    /// The sentinel scrolled into view.
    LoadMoreRequested,
    PageLoaded {
        generation: u64,
        page: u32,
        result: Result<DiscoveryPage, String>,
    },
}

/// Work the driver must carry out after an update.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedAction {
    FetchPage {
        generation: u64,
        filter: FilterTuple,
        page: u32,
    },
    PrefetchDetails(Vec<i64>),
}
