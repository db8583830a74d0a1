//! Terminal front-end over the same controllers the web app uses.

use tracing::info;

use crate::catalog::{query, FilterTuple, ImageSize, Movie};
use crate::config::Config;
use crate::favorites::FavoritesStore;
use crate::feed::FeedController;
use crate::search::{SearchAction, SearchKey, SearchMessage, SearchState};
use crate::{open_catalog, open_storage, ServerError};

/// Runs one search and prints the results dropdown, then the route Enter
/// would navigate to.
pub async fn search(config: &Config, query: &str) -> Result<(), ServerError> {
    let catalog = open_catalog(config)?;
    let mut state = SearchState::new();

    if let Some(SearchAction::Search { generation, query }) =
        state.update(SearchMessage::QueryChanged(query.to_string()))
    {
        let message = match catalog.search(&query).await {
            Ok(results) => SearchMessage::ResultsLoaded {
                generation,
                results,
            },
            Err(e) => SearchMessage::SearchFailed {
                generation,
                error: e.to_string(),
            },
        };
        state.update(message);
    }

    if state.no_results() {
        println!("No results found");
    }
    for movie in state.results() {
        println!("{}", movie_line(movie, &format!("/movie/{}", movie.id)));
    }

    if let Some(SearchAction::Navigate(route)) = state.update(SearchMessage::Key(SearchKey::Enter)) {
        println!("-> {}", route);
    }
    Ok(())
}

/// Builds the feed filter from command line values. The genre may be a
/// name or an id.
pub fn browse_filter(
    year: Option<i32>,
    genre: Option<&str>,
    score: Option<f64>,
) -> Result<FilterTuple, ServerError> {
    let genre_id = match genre {
        Some(g) => Some(
            query::genre_id(g).ok_or_else(|| ServerError::Server(format!("Unknown genre: {}", g)))?,
        ),
        None => None,
    };
    FilterTuple::validated(year, genre_id, score).map_err(ServerError::Server)
}

/// Walks the most-watched feed for a filter, `pages` pages deep at most.
/// Nothing reads details after the listing, so none are prefetched.
pub async fn browse(config: &Config, filter: FilterTuple, pages: u32) -> Result<(), ServerError> {
    let catalog = open_catalog(config)?;
    let mut feed = FeedController::without_prefetch(catalog);

    feed.set_filter(filter);
    feed.settle().await;
    let mut fetched = 1;
    while fetched < pages && feed.state().has_next_page() {
        feed.load_more();
        feed.settle().await;
        fetched += 1;
    }

    for movie in feed.state().movies() {
        println!("{}", movie_line(movie, &format!("/movie/{}", movie.id)));
    }
    println!("{}", feed.state().footer());

    if feed.state().is_error() {
        return Err(ServerError::Server("Error loading movies".to_string()));
    }
    Ok(())
}

pub async fn list_favorites(config: &Config) -> Result<(), ServerError> {
    let favorites = FavoritesStore::new(open_storage(config).await?);
    let list = favorites.list_favorites().await;
    if list.is_empty() {
        println!("No favorites yet");
    }
    for movie in &list {
        let thumb = movie
            .poster_url(&config.tmdb.image_base_url, ImageSize::Thumb)
            .unwrap_or_default();
        println!("{}", movie_line(movie, &thumb));
    }
    Ok(())
}

/// Toggles a favorite by id. The stored record is the complete detail
/// record fetched from the catalog.
pub async fn toggle_favorite(config: &Config, id: i64) -> Result<(), ServerError> {
    let catalog = open_catalog(config)?;
    let favorites = FavoritesStore::new(open_storage(config).await?);

    let stored = favorites.list_favorites().await.into_iter().find(|m| m.id == id);
    let movie = match stored {
        Some(movie) => movie,
        None => catalog.movie_details(id).await?,
    };

    let now_favorite = favorites.toggle_favorite(&movie).await?;
    info!("Movie {} favorite: {}", id, now_favorite);
    println!(
        "{} {}",
        if now_favorite { "Added" } else { "Removed" },
        movie_line(&movie, "")
    );
    Ok(())
}

fn movie_line(movie: &Movie, extra: &str) -> String {
    let mut line = format!("{:>8}  {}", movie.id, movie.title);
    if movie.vote_average > 0.0 {
        line.push_str(&format!(" ({:.1})", movie.vote_average));
    }
    if !extra.is_empty() {
        line.push_str("  ");
        line.push_str(extra);
    }
    line
}
