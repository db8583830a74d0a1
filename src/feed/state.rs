use tracing::{debug, warn};

use super::message::{FeedAction, FeedMessage};
use crate::catalog::{DiscoveryPage, FilterTuple, Movie};

#[derive(Debug, Clone, PartialEq)]
pub enum FeedStatus {
    Idle,
    Fetching { page: u32 },
    HasMore { next_page: u32 },
    Exhausted,
    Error { message: String },
}

/// Accumulated pages of one filter tuple.
///
/// The generation is bumped on every filter change; a response carrying an
/// older generation belongs to a superseded stream and is dropped.
#[derive(Debug, Clone)]
pub struct FeedState {
    filter: FilterTuple,
    generation: u64,
    pages: Vec<DiscoveryPage>,
    status: FeedStatus,
}

impl Default for FeedState {
    fn default() -> Self {
        Self::new(FilterTuple::default())
    }
}

impl FeedState {
    pub fn new(filter: FilterTuple) -> Self {
        Self {
            filter,
            generation: 0,
            pages: Vec::new(),
            status: FeedStatus::Idle,
        }
    }

    pub fn filter(&self) -> &FilterTuple {
        &self.filter
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn status(&self) -> &FeedStatus {
        &self.status
    }

    pub fn pages(&self) -> &[DiscoveryPage] {
        &self.pages
    }

    /// All results fetched so far, in page order.
    pub fn movies(&self) -> impl Iterator<Item = &Movie> {
        self.pages.iter().flat_map(|p| p.results.iter())
    }

    pub fn is_fetching(&self) -> bool {
        matches!(self.status, FeedStatus::Fetching { .. })
    }

    pub fn has_next_page(&self) -> bool {
        matches!(self.status, FeedStatus::HasMore { .. })
    }

    pub fn is_exhausted(&self) -> bool {
        self.status == FeedStatus::Exhausted
    }

    pub fn is_error(&self) -> bool {
        matches!(self.status, FeedStatus::Error { .. })
    }

    /// Line shown under the list, where the sentinel sits.
    pub fn footer(&self) -> &'static str {
        match self.status {
            FeedStatus::Idle | FeedStatus::Fetching { .. } => "Loading more...",
            FeedStatus::HasMore { .. } => "Scroll down to load more",
            FeedStatus::Exhausted => "No more movies to load",
            FeedStatus::Error { .. } => "Error loading movies. Please try again later.",
        }
    }

    pub fn update(&mut self, message: FeedMessage) -> Option<FeedAction> {
        match message {
            FeedMessage::Start => {
                if self.status == FeedStatus::Idle {
                    self.begin_fetch(1)
                } else {
                    None
                }
            }

            FeedMessage::FilterChanged(filter) => {
                if filter == self.filter && self.status != FeedStatus::Idle {
                    return None;
                }
                debug!(
                    "Feed filter changed to {:?}, discarding {} pages",
                    filter,
                    self.pages.len()
                );
                self.filter = filter;
                self.generation += 1;
                self.pages.clear();
                self.begin_fetch(1)
            }

            FeedMessage::LoadMoreRequested => match self.status {
                FeedStatus::HasMore { next_page } => self.begin_fetch(next_page),
                _ => None,
            },

            FeedMessage::PageLoaded {
                generation,
                page,
                result,
            } => self.handle_page_loaded(generation, page, result),
        }
    }

    fn begin_fetch(&mut self, page: u32) -> Option<FeedAction> {
        self.status = FeedStatus::Fetching { page };
        Some(FeedAction::FetchPage {
            generation: self.generation,
            filter: self.filter,
            page,
        })
    }

    fn handle_page_loaded(
        &mut self,
        generation: u64,
        page: u32,
        result: Result<DiscoveryPage, String>,
    ) -> Option<FeedAction> {
        if generation != self.generation {
            debug!(
                "Dropping page {} of superseded feed generation {}",
                page, generation
            );
            return None;
        }
        if self.status != (FeedStatus::Fetching { page }) {
            debug!("Dropping unexpected page {} in state {:?}", page, self.status);
            return None;
        }

        match result {
            Ok(loaded) => {
                self.status = if loaded.page < loaded.total_pages {
                    FeedStatus::HasMore {
                        next_page: loaded.page + 1,
                    }
                } else {
                    FeedStatus::Exhausted
                };
                let ids = loaded.ids();
                self.pages.push(loaded);
                if ids.is_empty() {
                    None
                } else {
                    Some(FeedAction::PrefetchDetails(ids))
                }
            }
            Err(message) => {
                warn!("Feed page {} failed: {}", page, message);
                self.status = FeedStatus::Error { message };
                None
            }
        }
    }
}
