//! API client library for cinedeck.
//!
//! Provides an async client for the TMDB v3 API (movie lists, genres,
//! search, and movie details).

/// TMDB API client.
pub mod tmdb;
