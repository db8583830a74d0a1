use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::query::DiscoverQuery;
use super::types::{DiscoveryPage, Movie, MovieList};
use crate::config::TmdbConfig;

/// The read-only movie metadata service everything else is built on.
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn search(&self, query: &str) -> CatalogResult<Vec<Movie>>;
    async fn discover(&self, query: &DiscoverQuery, page: u32) -> CatalogResult<DiscoveryPage>;
    /// Full record with credits embedded.
    async fn movie_details(&self, id: i64) -> CatalogResult<Movie>;
    async fn now_playing(&self) -> CatalogResult<Vec<Movie>>;
}

pub struct TmdbClient {
    base_url: String,
    api_key: String,
    language: String,
    http_client: Client,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig, api_key: &str) -> CatalogResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            language: config.language.clone(),
            http_client,
        })
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> CatalogResult<T> {
        let url = self.endpoint_url(endpoint);
        debug!(endpoint = endpoint, params = ?params, "Catalog request");

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", self.language.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16(), endpoint.to_string()));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl CatalogService for TmdbClient {
    async fn search(&self, query: &str) -> CatalogResult<Vec<Movie>> {
        let params = [
            ("query", query.to_string()),
            ("include_adult", "false".to_string()),
            ("page", "1".to_string()),
        ];
        let list: MovieList = self.get("search/movie", &params).await?;
        Ok(list.results)
    }

    async fn discover(&self, query: &DiscoverQuery, page: u32) -> CatalogResult<DiscoveryPage> {
        self.get("discover/movie", &query.to_params(page)).await
    }

    async fn movie_details(&self, id: i64) -> CatalogResult<Movie> {
        let params = [("append_to_response", "credits".to_string())];
        self.get(&format!("movie/{}", id), &params).await
    }

    async fn now_playing(&self) -> CatalogResult<Vec<Movie>> {
        let list: MovieList = self.get("movie/now_playing", &[]).await?;
        Ok(list.results)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Catalog returned status {0} for {1}")]
    Status(u16, String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
