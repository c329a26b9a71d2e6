//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{
    DiscoverMovieParams, SearchMovieParams, TmdbGenreListResponse, TmdbMovieDetails,
    TmdbMovieListResponse, TrendingWindow,
};

/// TMDB API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Fetches movies trending over the given window.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn trending_movies(
        &self,
        window: TrendingWindow,
        language: &str,
    ) -> Result<TmdbMovieListResponse>;

    /// Fetches the current popular movie list.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn popular_movies(&self, language: &str, page: u32) -> Result<TmdbMovieListResponse>;

    /// Fetches the all-time top-rated movie list.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn top_rated_movies(&self, language: &str, page: u32) -> Result<TmdbMovieListResponse>;

    /// Fetches the movie genre catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_genres(&self, language: &str) -> Result<TmdbGenreListResponse>;

    /// Fetches movies for a genre via the discover endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn discover_by_genre(
        &self,
        params: &DiscoverMovieParams,
    ) -> Result<TmdbMovieListResponse>;

    /// Searches for movies by title.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn search_movies(&self, params: &SearchMovieParams) -> Result<TmdbMovieListResponse>;

    /// Fetches extended details for a single movie.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_details(&self, movie_id: u64, language: &str) -> Result<TmdbMovieDetails>;
}
