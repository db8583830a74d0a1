pub mod api;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod dismiss;
pub mod favorites;
pub mod feed;
pub mod middleware;
pub mod route;
pub mod search;
pub mod server;
pub mod slider;
pub mod storage;
pub mod util;

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use catalog::{CatalogService, DetailCache, TmdbClient};
use favorites::FavoritesStore;
use storage::{KeyValueStore, MemoryStore, SqliteStore};

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Storage error: {0}")]
    Storage(#[from] storage::StoreError),
    #[error("Catalog error: {0}")]
    Catalog(#[from] catalog::CatalogError),
    #[error("Favorites error: {0}")]
    Favorites(#[from] favorites::FavoritesError),
    #[error("Server error: {0}")]
    Server(String),
}

/// Opens the configured favorites storage: sqlite when a database path is
/// configured, process memory otherwise.
pub async fn open_storage(config: &config::Config) -> Result<Arc<dyn KeyValueStore>, ServerError> {
    match config.get_database_path() {
        Some(db_path) => {
            info!("Opening favorites database at {}", db_path);
            Ok(Arc::new(SqliteStore::new(&db_path).await?))
        }
        None => {
            info!("No database configured, favorites are kept in memory");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

pub fn open_catalog(config: &config::Config) -> Result<Arc<dyn CatalogService>, ServerError> {
    let api_key = config.api_key()?;
    Ok(Arc::new(TmdbClient::new(&config.tmdb, api_key)?))
}

pub async fn run(config_path: &str, debug_logs: bool) -> Result<(), ServerError> {
    let config = config::Config::load(config_path)?;

    info!("Using config file: {}", config_path);
    if debug_logs {
        info!("Debug logging enabled");
    }

    let catalog = open_catalog(&config)?;
    let favorites = Arc::new(FavoritesStore::new(open_storage(&config).await?));

    let address = config.listen.address.as_deref().unwrap_or("[::]");
    let port = &config.listen.port;
    let addr: SocketAddr = format!("{}:{}", address, port)
        .parse()
        .map_err(|e| ServerError::Server(format!("Invalid address: {}", e)))?;

    let tls = match (&config.listen.tlscert, &config.listen.tlskey) {
        (Some(cert), Some(key)) => Some((cert.clone(), key.clone())),
        _ => None,
    };

    let state = server::AppState::new(config, catalog, DetailCache::new(), favorites);
    let app = server::build_router(state);

    if let Some((cert_path, key_path)) = tls {
        info!("Loading TLS certificate from {}", cert_path);
        info!("Loading TLS key from {}", key_path);

        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(&cert_path, &key_path)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to load TLS config: {}", e)))?;

        info!("Serving HTTPS on {}", addr);

        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    } else {
        info!("Serving HTTP on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    }

    Ok(())
}
