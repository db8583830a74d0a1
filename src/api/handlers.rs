use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::types::*;
use crate::catalog::query::{self, DEFAULT_GENRE, DEFAULT_PLATFORM};
use crate::catalog::{prefetch_details, DiscoverQuery, DiscoveryPage, FilterTuple, Movie};
use crate::server::AppState;
use crate::slider::Slider;
use crate::util::QueryParams;

const TOP_BY_PLATFORM: usize = 3;

pub async fn search_movies(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Json<SearchResponse> {
    let query = params.get("query").unwrap_or_default().to_string();
    if query.trim().is_empty() {
        return Json(SearchResponse {
            query,
            results: Vec::new(),
        });
    }

    info!("Searching movies for {:?}", query);
    let results = match state.catalog.search(&query).await {
        Ok(results) => results,
        Err(e) => {
            error!("Search for {:?} failed: {}", query, e);
            Vec::new()
        }
    };

    Json(SearchResponse { query, results })
}

pub async fn discover_movies(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<DiscoveryPage>, ApiError> {
    let filter = FilterTuple::validated(
        params.parse("year").map_err(ApiError::BadRequest)?,
        params.parse("genre").map_err(ApiError::BadRequest)?,
        params.parse("score").map_err(ApiError::BadRequest)?,
    )
    .map_err(ApiError::BadRequest)?;
    let page = params
        .parse::<u32>("page")
        .map_err(ApiError::BadRequest)?
        .unwrap_or(1)
        .max(1);

    let page = state
        .catalog
        .discover(&DiscoverQuery::most_watched(&filter), page)
        .await
        .map_err(|e| {
            error!("Discover {:?} page {} failed: {}", filter, page, e);
            ApiError::Upstream("Error loading movies. Please try again later.".to_string())
        })?;

    prefetch_details(Arc::clone(&state.catalog), state.details.clone(), page.ids());

    Ok(Json(page))
}

pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Movie>, ApiError> {
    if let Some(movie) = state.details.get(id).await {
        return Ok(Json(movie));
    }

    match state.catalog.movie_details(id).await {
        Ok(movie) => {
            state.details.insert(movie.clone()).await;
            Ok(Json(movie))
        }
        Err(e) => {
            error!("Fetching details for movie {} failed: {}", id, e);
            Err(ApiError::NoDetails)
        }
    }
}

pub async fn get_home(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Json<HomeResponse> {
    let platform = params
        .get("platform")
        .and_then(query::platform_id)
        .unwrap_or(DEFAULT_PLATFORM)
        .to_string();
    let genre = params
        .get("genre")
        .and_then(query::genre_id)
        .unwrap_or(DEFAULT_GENRE);

    let platform_query = DiscoverQuery::top_by_platform(&platform);
    let genre_query = DiscoverQuery::popular_by_genre(genre);
    let (newest, by_platform, by_genre) = tokio::join!(
        state.catalog.now_playing(),
        state.catalog.discover(&platform_query, 1),
        state.catalog.discover(&genre_query, 1),
    );

    let newest = newest.unwrap_or_else(|e| {
        warn!("Loading newest movies failed: {}", e);
        Vec::new()
    });
    prefetch_details(
        Arc::clone(&state.catalog),
        state.details.clone(),
        newest.iter().map(|m| m.id).collect(),
    );

    let mut top_by_platform = by_platform.map(|p| p.results).unwrap_or_else(|e| {
        warn!("Loading top movies for platform {} failed: {}", platform, e);
        Vec::new()
    });
    top_by_platform.truncate(TOP_BY_PLATFORM);

    let popular = by_genre.map(|p| p.results).unwrap_or_else(|e| {
        warn!("Loading popular movies for genre {} failed: {}", genre, e);
        Vec::new()
    });

    Json(HomeResponse {
        newest: slider_section(newest),
        platform,
        top_by_platform,
        genre,
        popular_by_genre: slider_section(popular),
    })
}

fn slider_section(movies: Vec<Movie>) -> SliderSection {
    let items_to_show = Slider::for_home(movies.len()).items_to_show();
    SliderSection {
        movies,
        items_to_show,
    }
}

pub async fn list_favorites(State(state): State<AppState>) -> Json<Vec<Movie>> {
    Json(state.favorites.list_favorites().await)
}

pub async fn get_favorite(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Json<FavoriteStatus> {
    let favorite = state.favorites.is_favorite(id).await;
    Json(FavoriteStatus { id, favorite })
}

pub async fn toggle_favorite(
    State(state): State<AppState>,
    Json(movie): Json<Movie>,
) -> Result<Json<FavoriteStatus>, ApiError> {
    let favorite = state.favorites.toggle_favorite(&movie).await.map_err(|e| {
        error!("Toggling favorite {} failed: {}", movie.id, e);
        ApiError::Internal(e.to_string())
    })?;

    Ok(Json(FavoriteStatus {
        id: movie.id,
        favorite,
    }))
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Upstream(String),
    NoDetails,
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::NoDetails => (
                StatusCode::NOT_FOUND,
                "No movie details available.".to_string(),
            ),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}
