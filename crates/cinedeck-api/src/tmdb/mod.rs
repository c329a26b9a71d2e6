//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 endpoints and retrieves
//! trending/popular/top-rated movie lists, the genre catalog, search
//! results, and per-movie details.

mod api;
mod client;
mod pacer;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use types::{
    DiscoverMovieParams, SearchMovieParams, TmdbGenre, TmdbGenreListResponse, TmdbMovieDetails,
    TmdbMovieListResponse, TmdbMovieSummary, TrendingWindow,
};

/// Public TMDB website base URL (movie pages, not the API).
pub const TMDB_BASE_URL: &str = "https://www.themoviedb.org";

/// Base URL for poster/backdrop image assets.
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";

/// Supported image size segments for the TMDB image CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    /// Tiny poster thumbnail (search dropdown scale).
    W92,
    /// Card-sized poster.
    W500,
    /// Full-resolution backdrop.
    Original,
}

impl ImageSize {
    /// Returns the URL path segment for this size.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::W92 => "w92",
            Self::W500 => "w500",
            Self::Original => "original",
        }
    }
}

/// Builds the full CDN URL for an image path from an API response.
///
/// Returns `None` when the movie has no image at this slot; callers
/// render their own placeholder.
#[must_use]
pub fn image_url(path: Option<&str>, size: ImageSize) -> Option<String> {
    let path = path?;
    if path.is_empty() {
        return None;
    }
    Some(format!("{IMAGE_BASE_URL}{}{path}", size.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url_with_path() {
        // Arrange & Act
        let url = image_url(Some("/8ZTVqvKDQ8emSGUEMjsS4yHAwrp.jpg"), ImageSize::W500);

        // Assert
        assert_eq!(
            url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/8ZTVqvKDQ8emSGUEMjsS4yHAwrp.jpg")
        );
    }

    #[test]
    fn test_image_url_original() {
        // Arrange & Act
        let url = image_url(Some("/s3TBrRGB1iav7gFOCNx3H31MoES.jpg"), ImageSize::Original);

        // Assert
        assert_eq!(
            url.as_deref(),
            Some("https://image.tmdb.org/t/p/original/s3TBrRGB1iav7gFOCNx3H31MoES.jpg")
        );
    }

    #[test]
    fn test_image_url_missing_path() {
        // Arrange & Act & Assert
        assert!(image_url(None, ImageSize::W92).is_none());
        assert!(image_url(Some(""), ImageSize::W92).is_none());
    }
}
