use serde::{Deserialize, Serialize};

pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// A movie record as returned by TMDB.
///
/// List and search responses are sparse (no runtime, genres or credits),
/// detail responses are complete. Missing fields fall back to their defaults
/// and empty ones are not serialized again, so a sparse record stays sparse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_path: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub overview: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<Named>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genre_ids: Vec<i64>,
    #[serde(rename = "runtime")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub production_countries: Vec<Named>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<Credits>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Named {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub name: String,
    #[serde(default)]
    pub character: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_path: Option<String>,
}

/// Poster and profile sizes used by the different views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Thumb,
    Profile,
    DetailPoster,
    Poster,
    Original,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Thumb => "w92",
            ImageSize::Profile => "w154",
            ImageSize::DetailPoster => "w342",
            ImageSize::Poster => "w500",
            ImageSize::Original => "original",
        }
    }
}

pub fn image_url(base: &str, size: ImageSize, path: &str) -> String {
    format!("{}/{}{}", base.trim_end_matches('/'), size.as_str(), path)
}

impl Movie {
    /// A bare record carrying only an id and a title.
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            poster_path: None,
            backdrop_path: None,
            overview: String::new(),
            vote_average: 0.0,
            release_date: None,
            genres: Vec::new(),
            genre_ids: Vec::new(),
            runtime_minutes: None,
            production_countries: Vec::new(),
            credits: None,
        }
    }

    pub fn cast(&self) -> &[CastMember] {
        self.credits.as_ref().map(|c| c.cast.as_slice()).unwrap_or(&[])
    }

    /// True if this record came from a detail fetch.
    pub fn is_complete(&self) -> bool {
        self.credits.is_some()
    }

    pub fn poster_url(&self, base: &str, size: ImageSize) -> Option<String> {
        self.poster_path.as_deref().map(|p| image_url(base, size, p))
    }

    pub fn backdrop_url(&self, base: &str) -> Option<String> {
        self.backdrop_path
            .as_deref()
            .map(|p| image_url(base, ImageSize::Original, p))
    }

    pub fn genre_names(&self) -> String {
        join_names(&self.genres)
    }

    pub fn country_names(&self) -> String {
        join_names(&self.production_countries)
    }
}

fn join_names(names: &[Named]) -> String {
    names
        .iter()
        .map(|n| n.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// `{results}` envelope of search and list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieList {
    #[serde(default)]
    pub results: Vec<Movie>,
}

/// One page of a discover query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryPage {
    #[serde(default)]
    pub results: Vec<Movie>,
    pub page: u32,
    pub total_pages: u32,
}

impl DiscoveryPage {
    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn ids(&self) -> Vec<i64> {
        self.results.iter().map(|m| m.id).collect()
    }
}
