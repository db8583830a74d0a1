use axum::{
    extract::Request,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::catalog::{CatalogService, DetailCache};
use crate::config::Config;
use crate::favorites::FavoritesStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<dyn CatalogService>,
    pub details: DetailCache,
    pub favorites: Arc<FavoritesStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        catalog: Arc<dyn CatalogService>,
        details: DetailCache,
        favorites: Arc<FavoritesStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            catalog,
            details,
            favorites,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/search", get(crate::api::search_movies))
        .route("/api/discover", get(crate::api::discover_movies))
        .route("/api/movie/:id", get(crate::api::get_movie))
        .route("/api/home", get(crate::api::get_home))
        .route(
            "/api/favorites",
            get(crate::api::list_favorites).post(crate::api::toggle_favorite),
        )
        .route("/api/favorites/:id", get(crate::api::get_favorite));

    let mut router = Router::new()
        .route("/robots.txt", get(robots_txt_handler))
        .merge(api_routes)
        .fallback(fallback_handler);

    if let Some(ref appdir) = state.config.appdir {
        router = router.fallback_service(ServeDir::new(appdir));
    }

    let app = router
        .layer(axum::middleware::from_fn(crate::middleware::log_request))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Path normalization has to run before routing, so it wraps the whole app.
    Router::new()
        .fallback_service(app)
        .layer(axum::middleware::from_fn(crate::middleware::normalize_path))
}

async fn robots_txt_handler() -> &'static str {
    "User-agent: *\nDisallow: /\n"
}

async fn fallback_handler(req: Request) -> impl IntoResponse {
    if req.method() == axum::http::Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}
