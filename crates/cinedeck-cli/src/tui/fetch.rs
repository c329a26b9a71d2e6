//! Fetch pipeline between the browser event loop and the TMDB client.
//!
//! The TUI event loop is synchronous; API calls run on a dedicated worker
//! thread that owns a current-thread tokio runtime. Requests and result
//! messages cross over a pair of std mpsc channels.

use std::sync::mpsc::{Receiver, Sender};
use std::thread::JoinHandle;

use anyhow::{Context, Result};
use cinedeck_api::tmdb::{
    DiscoverMovieParams, LocalTmdbApi, SearchMovieParams, TmdbClient, TmdbGenre,
    TmdbMovieDetails, TmdbMovieListResponse, TrendingWindow,
};

use super::state::MovieEntry;

/// A fetch to run on the worker thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    /// Trending-this-week list.
    Trending,
    /// Popular list (page 1).
    Popular,
    /// Top-rated list (page 1).
    TopRated,
    /// Genre catalog.
    Genres,
    /// Movies for one genre tab.
    GenreMovies {
        /// Genre to discover movies for.
        genre_id: u32,
    },
    /// Debounced title search.
    Search {
        /// The query as typed (trimmed).
        query: String,
    },
    /// Detail overlay payload.
    Details {
        /// Movie to fetch details for.
        movie_id: u64,
    },
}

/// A completed fetch, posted back to the event loop.
///
/// Errors are carried as display strings; the state layer turns them into
/// per-section error flags.
#[derive(Debug)]
pub enum CatalogMessage {
    /// Trending list result.
    Trending(Result<Vec<MovieEntry>, String>),
    /// Popular list result.
    Popular(Result<Vec<MovieEntry>, String>),
    /// Top-rated list result.
    TopRated(Result<Vec<MovieEntry>, String>),
    /// Genre catalog result.
    Genres(Result<Vec<TmdbGenre>, String>),
    /// Genre-movies result, echoing the genre for staleness checks.
    GenreMovies {
        /// Genre the movies belong to.
        genre_id: u32,
        /// Fetch result.
        result: Result<Vec<MovieEntry>, String>,
    },
    /// Search result, echoing the query for staleness checks.
    Search {
        /// The query this result answers.
        query: String,
        /// Fetch result.
        result: Result<Vec<MovieEntry>, String>,
    },
    /// Movie details result, echoing the id for staleness checks.
    Details {
        /// Movie the details belong to.
        movie_id: u64,
        /// Fetch result.
        result: Result<Box<TmdbMovieDetails>, String>,
    },
}

/// Spawns the fetch worker thread.
///
/// Requests drain sequentially (the API is paced anyway); the worker
/// exits when the request channel closes or the message receiver is gone.
///
/// # Errors
///
/// Returns an error if the tokio runtime or the thread fails to start.
pub fn spawn_fetch_worker(
    client: TmdbClient,
    language: String,
    include_adult: bool,
    requests: Receiver<FetchRequest>,
    messages: Sender<CatalogMessage>,
) -> Result<JoinHandle<()>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build fetch worker runtime")?;

    std::thread::Builder::new()
        .name(String::from("cinedeck-fetch"))
        .spawn(move || {
            while let Ok(request) = requests.recv() {
                tracing::debug!(?request, "fetch worker request");
                let message =
                    runtime.block_on(handle_request(&client, &language, include_adult, request));
                if messages.send(message).is_err() {
                    break;
                }
            }
        })
        .context("failed to spawn fetch worker thread")
}

/// Runs one request against the client and wraps the outcome.
async fn handle_request(
    client: &TmdbClient,
    language: &str,
    include_adult: bool,
    request: FetchRequest,
) -> CatalogMessage {
    match request {
        FetchRequest::Trending => CatalogMessage::Trending(
            client
                .trending_movies(TrendingWindow::Week, language)
                .await
                .map(into_entries)
                .map_err(format_error),
        ),
        FetchRequest::Popular => CatalogMessage::Popular(
            client
                .popular_movies(language, 1)
                .await
                .map(into_entries)
                .map_err(format_error),
        ),
        FetchRequest::TopRated => CatalogMessage::TopRated(
            client
                .top_rated_movies(language, 1)
                .await
                .map(into_entries)
                .map_err(format_error),
        ),
        FetchRequest::Genres => CatalogMessage::Genres(
            client
                .movie_genres(language)
                .await
                .map(|r| r.genres)
                .map_err(format_error),
        ),
        FetchRequest::GenreMovies { genre_id } => {
            let params = DiscoverMovieParams::new(genre_id).language(language);
            let result = client
                .discover_by_genre(&params)
                .await
                .map(into_entries)
                .map_err(format_error);
            CatalogMessage::GenreMovies { genre_id, result }
        }
        FetchRequest::Search { query } => {
            let mut params = SearchMovieParams::new(&query).language(language);
            params.include_adult = include_adult;
            let result = client
                .search_movies(&params)
                .await
                .map(into_entries)
                .map_err(format_error);
            CatalogMessage::Search { query, result }
        }
        FetchRequest::Details { movie_id } => {
            let result = client
                .movie_details(movie_id, language)
                .await
                .map(Box::new)
                .map_err(format_error);
            CatalogMessage::Details { movie_id, result }
        }
    }
}

/// Converts a list response into display rows.
fn into_entries(response: TmdbMovieListResponse) -> Vec<MovieEntry> {
    response.results.into_iter().map(MovieEntry::from).collect()
}

/// Renders the full error chain as one line.
fn format_error(err: anyhow::Error) -> String {
    format!("{err:#}")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::mpsc;

    use super::*;

    #[test]
    fn test_worker_exits_when_request_channel_closes() {
        // Arrange
        let client = TmdbClient::builder()
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();
        let (request_tx, request_rx) = mpsc::channel();
        let (message_tx, _message_rx) = mpsc::channel();
        let handle =
            spawn_fetch_worker(client, String::from("en-US"), false, request_rx, message_tx)
                .unwrap();

        // Act
        drop(request_tx);

        // Assert
        handle.join().unwrap();
    }

    #[test]
    fn test_format_error_renders_context_chain() {
        // Arrange
        let err = anyhow::anyhow!("root cause").context("outer context");

        // Act
        let rendered = format_error(err);

        // Assert
        assert!(rendered.contains("outer context"));
        assert!(rendered.contains("root cause"));
    }
}
