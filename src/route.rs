use std::fmt;

/// Navigation destinations of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    MostWatched,
    Movie(i64),
    Search(String),
}

impl Route {
    pub fn to_path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::MostWatched => "/most-watched".to_string(),
            Route::Movie(id) => format!("/movie/{}", id),
            Route::Search(query) => format!("/search?query={}", urlencoding::encode(query)),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path())
    }
}
