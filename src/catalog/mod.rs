pub mod cache;
pub mod client;
pub mod query;
pub mod types;

#[cfg(test)]
pub mod testing;

pub use cache::{prefetch_details, DetailCache};
pub use client::{CatalogError, CatalogResult, CatalogService, TmdbClient};
pub use query::{DiscoverQuery, FilterTuple, SortKey};
pub use types::*;
