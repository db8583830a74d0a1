use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    WatchCount,
    Popularity,
    VoteAverage,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::WatchCount => "watch_count.desc",
            SortKey::Popularity => "popularity.desc",
            SortKey::VoteAverage => "vote_average.desc",
        }
    }
}

/// The `(year, genre, minimum score)` combination that identifies one
/// discovery stream.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FilterTuple {
    pub year: Option<i32>,
    pub genre_id: Option<i64>,
    pub min_score: Option<f64>,
}

impl FilterTuple {
    pub fn new(year: Option<i32>, genre_id: Option<i64>, min_score: Option<f64>) -> Self {
        Self {
            year,
            genre_id,
            min_score,
        }
    }

    /// Like `new`, but rejects values that cannot be sent upstream: years
    /// outside `1..=9999` and scores that are not finite or not in `0..=10`.
    pub fn validated(
        year: Option<i32>,
        genre_id: Option<i64>,
        min_score: Option<f64>,
    ) -> Result<Self, String> {
        if let Some(year) = year {
            if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
                return Err(format!("invalid year: {}", year));
            }
        }
        if let Some(score) = min_score {
            if !score.is_finite() || !(0.0..=10.0).contains(&score) {
                return Err(format!("invalid score: {}", score));
            }
        }
        Ok(Self::new(year, genre_id, min_score))
    }
}

const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

/// Parameters of a `discover/movie` request. Unset filters are never sent.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverQuery {
    pub sort_by: SortKey,
    pub release_year: Option<i32>,
    pub genre_id: Option<i64>,
    pub min_score: Option<f64>,
    pub watch_provider: Option<String>,
    pub watch_region: Option<String>,
}

impl DiscoverQuery {
    pub fn new(sort_by: SortKey) -> Self {
        Self {
            sort_by,
            release_year: None,
            genre_id: None,
            min_score: None,
            watch_provider: None,
            watch_region: None,
        }
    }

    /// The most-watched feed for one filter tuple.
    pub fn most_watched(filter: &FilterTuple) -> Self {
        Self {
            release_year: filter.year,
            genre_id: filter.genre_id,
            min_score: filter.min_score,
            ..Self::new(SortKey::WatchCount)
        }
    }

    pub fn top_by_platform(provider_id: &str) -> Self {
        Self {
            watch_provider: Some(provider_id.to_string()),
            watch_region: Some("US".to_string()),
            ..Self::new(SortKey::VoteAverage)
        }
    }

    pub fn popular_by_genre(genre_id: i64) -> Self {
        Self {
            genre_id: Some(genre_id),
            ..Self::new(SortKey::Popularity)
        }
    }

    pub fn to_params(&self, page: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![("sort_by", self.sort_by.as_str().to_string())];

        if let Some(date) = self.release_year.and_then(first_day_of_year) {
            params.push(("release_date.gte", date));
        }
        if let Some(genre) = self.genre_id {
            params.push(("with_genres", genre.to_string()));
        }
        if let Some(score) = self.min_score {
            params.push(("vote_average.gte", score.to_string()));
        }
        if let Some(ref provider) = self.watch_provider {
            params.push(("with_watch_providers", provider.clone()));
        }
        if let Some(ref region) = self.watch_region {
            params.push(("watch_region", region.clone()));
        }

        params.push(("page", page.to_string()));
        params
    }
}

fn first_day_of_year(year: i32) -> Option<String> {
    NaiveDate::from_ymd_opt(year, 1, 1).map(|d| d.format("%Y-%m-%d").to_string())
}

pub const STREAMING_PLATFORMS: &[(&str, &str)] = &[
    ("Netflix", "8"),
    ("Hulu", "15"),
    ("Amazon", "9"),
    ("Disney", "337"),
    ("AppleTV", "350"),
];

pub const POPULAR_GENRES: &[(&str, i64)] = &[
    ("Action", 28),
    ("Comedy", 35),
    ("Drama", 18),
    ("Horror", 27),
    ("Romance", 10749),
    ("Science Fiction", 878),
    ("Thriller", 53),
    ("Animation", 16),
];

pub const DEFAULT_PLATFORM: &str = "8";
pub const DEFAULT_GENRE: i64 = 28;

pub const SCORE_OPTIONS: &[u8] = &[9, 8, 7, 6, 5];
pub const FIRST_YEAR: i32 = 1980;
pub const LAST_YEAR: i32 = 2024;

/// Release years offered by the most-watched filter, newest first.
pub fn year_options() -> Vec<i32> {
    (FIRST_YEAR..=LAST_YEAR).rev().collect()
}

/// Looks up a genre by id or by (case-insensitive) name.
pub fn genre_id(s: &str) -> Option<i64> {
    if let Ok(id) = s.parse::<i64>() {
        return Some(id);
    }
    POPULAR_GENRES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(s))
        .map(|(_, id)| *id)
}

/// Looks up a streaming provider id by id or by (case-insensitive) name.
pub fn platform_id(s: &str) -> Option<&'static str> {
    STREAMING_PLATFORMS
        .iter()
        .find(|(name, id)| name.eq_ignore_ascii_case(s) || *id == s)
        .map(|(_, id)| *id)
}
