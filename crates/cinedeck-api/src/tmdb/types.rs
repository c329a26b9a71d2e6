//! TMDB API response types and request parameters.

use serde::Deserialize;

// --- Movie lists ---

/// Paged movie list response.
///
/// Shared by `trending/movie/{window}`, `movie/popular`, `movie/top_rated`,
/// `discover/movie`, and `search/movie` (all five return the same page
/// envelope).
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieListResponse {
    /// Current page number.
    pub page: u32,
    /// Movies on this page.
    pub results: Vec<TmdbMovieSummary>,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of results.
    pub total_results: u32,
}

/// A single movie entry within a list response.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieSummary {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Original title.
    pub original_title: String,
    /// Original language (ISO 639-1).
    pub original_language: String,
    /// Release date (YYYY-MM-DD or null).
    pub release_date: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Popularity score.
    pub popularity: f64,
    /// Vote average (0-10).
    pub vote_average: f64,
    /// Vote count.
    pub vote_count: u32,
    /// Genre IDs.
    pub genre_ids: Vec<u32>,
    /// Adult flag.
    pub adult: bool,
    /// Video flag.
    #[serde(default)]
    pub video: bool,
    /// Media type discriminator (`"movie"`; trending payloads only).
    #[serde(default)]
    pub media_type: Option<String>,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
}

// --- Genres ---

/// Response from the `genre/movie/list` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenreListResponse {
    /// All movie genres.
    pub genres: Vec<TmdbGenre>,
}

/// Genre entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TmdbGenre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

// --- Movie details ---

/// Response from the `movie/{movie_id}` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Original title.
    pub original_title: String,
    /// Original language (ISO 639-1).
    pub original_language: String,
    /// Release date (YYYY-MM-DD or null).
    pub release_date: Option<String>,
    /// Runtime in minutes.
    pub runtime: Option<u32>,
    /// Production budget in USD (0 when unknown).
    pub budget: u64,
    /// Box-office revenue in USD (0 when unknown).
    pub revenue: u64,
    /// Genres (full entries, not IDs).
    pub genres: Vec<TmdbGenre>,
    /// Production companies.
    pub production_companies: Vec<TmdbProductionCompany>,
    /// Production countries.
    pub production_countries: Vec<TmdbProductionCountry>,
    /// Spoken languages.
    pub spoken_languages: Vec<TmdbSpokenLanguage>,
    /// Official website URL.
    pub homepage: Option<String>,
    /// IMDB title ID (e.g. `tt1375666`).
    pub imdb_id: Option<String>,
    /// Marketing tagline.
    pub tagline: Option<String>,
    /// Overview text.
    pub overview: Option<String>,
    /// Release status (e.g. "Released").
    pub status: Option<String>,
    /// Popularity score.
    pub popularity: f64,
    /// Vote average (0-10).
    pub vote_average: f64,
    /// Vote count.
    pub vote_count: u32,
    /// Adult flag.
    pub adult: bool,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
}

/// Production company entry within movie details.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbProductionCompany {
    /// TMDB company ID.
    pub id: u64,
    /// Company name.
    pub name: String,
    /// Company origin country (ISO 3166-1).
    pub origin_country: Option<String>,
    /// Logo image path.
    pub logo_path: Option<String>,
}

/// Production country entry within movie details.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbProductionCountry {
    /// Country code (ISO 3166-1).
    pub iso_3166_1: String,
    /// Country name.
    pub name: String,
}

/// Spoken language entry within movie details.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSpokenLanguage {
    /// Language code (ISO 639-1).
    pub iso_639_1: String,
    /// English name of the language.
    pub english_name: String,
    /// Native name of the language.
    pub name: String,
}

// --- Error response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[allow(dead_code)]
    pub success: bool,
}

// --- Request parameters ---

/// Time window for the `trending/movie/{window}` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendingWindow {
    /// Trending over the last 24 hours.
    Day,
    /// Trending over the last 7 days.
    #[default]
    Week,
}

impl TrendingWindow {
    /// Returns the URL path segment for this window.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
        }
    }
}

/// Parameters for the `search/movie` endpoint.
#[derive(Debug, Clone)]
pub struct SearchMovieParams {
    /// Search query (required).
    pub query: String,
    /// Response language (default: "en-US").
    pub language: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
    /// Filter by primary release year.
    pub primary_release_year: Option<u32>,
    /// Filter by year.
    pub year: Option<u32>,
    /// Region filter (ISO 3166-1).
    pub region: Option<String>,
    /// Include adult content.
    pub include_adult: bool,
}

impl SearchMovieParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language: String::from("en-US"),
            page: 1,
            primary_release_year: None,
            year: None,
            region: None,
            include_adult: false,
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Sets the year filter.
    #[must_use]
    pub const fn year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }

    /// Sets the primary release year filter.
    #[must_use]
    pub const fn primary_release_year(mut self, year: u32) -> Self {
        self.primary_release_year = Some(year);
        self
    }
}

/// Parameters for the `discover/movie` endpoint.
#[derive(Debug, Clone)]
pub struct DiscoverMovieParams {
    /// Genre ID to filter by (required).
    pub with_genres: u32,
    /// Response language (default: "en-US").
    pub language: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
    /// Sort order (e.g. "popularity.desc").
    pub sort_by: Option<String>,
}

impl DiscoverMovieParams {
    /// Creates new discover params for the given genre.
    #[must_use]
    pub fn new(genre_id: u32) -> Self {
        Self {
            with_genres: genre_id,
            language: String::from("en-US"),
            page: 1,
            sort_by: None,
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Sets the sort order.
    #[must_use]
    pub fn sort_by(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = Some(sort_by.into());
        self
    }
}
