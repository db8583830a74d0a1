use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::catalog::Movie;
use crate::storage::{KeyValueStore, StoreError};

pub const FAVORITES_KEY: &str = "favorites";

/// Bookmarked movies, persisted as one JSON array under a single key.
///
/// Every toggle rewrites the whole array. Toggles through the same store
/// are serialized; two stores sharing a backing key are last-write-wins.
pub struct FavoritesStore {
    storage: Arc<dyn KeyValueStore>,
    key: String,
    write_lock: Mutex<()>,
}

impl FavoritesStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(storage, FAVORITES_KEY)
    }

    pub fn with_key(storage: Arc<dyn KeyValueStore>, key: &str) -> Self {
        Self {
            storage,
            key: key.to_string(),
            write_lock: Mutex::new(()),
        }
    }

    pub async fn is_favorite(&self, movie_id: i64) -> bool {
        self.list_favorites().await.iter().any(|m| m.id == movie_id)
    }

    /// Never fails: a missing, corrupt or unreadable blob is an empty list.
    pub async fn list_favorites(&self) -> Vec<Movie> {
        match self.storage.get(&self.key).await {
            Ok(raw) => decode(raw.as_deref()),
            Err(e) => {
                warn!("Failed to read favorites: {}", e);
                Vec::new()
            }
        }
    }

    /// Adds the record as given, or removes it if its id is already present.
    /// Returns the new membership state once the updated set is persisted.
    pub async fn toggle_favorite(&self, movie: &Movie) -> Result<bool, FavoritesError> {
        let _guard = self.write_lock.lock().await;

        let raw = self.storage.get(&self.key).await?;
        let mut favorites = decode(raw.as_deref());

        let is_favorite = if favorites.iter().any(|m| m.id == movie.id) {
            info!("Removing movie {} from favorites", movie.id);
            favorites.retain(|m| m.id != movie.id);
            false
        } else {
            info!("Adding movie {} ({}) to favorites", movie.id, movie.title);
            favorites.push(movie.clone());
            true
        };

        let encoded = serde_json::to_string(&favorites)?;
        self.storage.set(&self.key, &encoded).await?;
        debug!("Persisted {} favorites", favorites.len());

        Ok(is_favorite)
    }
}

fn decode(raw: Option<&str>) -> Vec<Movie> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<Movie>>(raw) {
        Ok(favorites) => favorites,
        Err(e) => {
            warn!("Ignoring corrupt favorites data: {}", e);
            Vec::new()
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FavoritesError {
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
    #[error("Failed to encode favorites: {0}")]
    Encode(#[from] serde_json::Error),
}
