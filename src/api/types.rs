use serde::{Deserialize, Serialize};

use crate::catalog::Movie;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<Movie>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteStatus {
    pub id: i64,
    pub favorite: bool,
}

/// A list rendered through the slider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SliderSection {
    pub movies: Vec<Movie>,
    #[serde(rename = "itemsToShow")]
    pub items_to_show: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeResponse {
    pub newest: SliderSection,
    pub platform: String,
    #[serde(rename = "topByPlatform")]
    pub top_by_platform: Vec<Movie>,
    pub genre: i64,
    #[serde(rename = "popularByGenre")]
    pub popular_by_genre: SliderSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
