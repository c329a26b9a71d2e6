//! Catalog browser TUI main loop.

use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Instant;

use anyhow::{Context, Result};
use cinedeck_api::tmdb::{ImageSize, TMDB_BASE_URL, TmdbClient, image_url};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use super::fetch::{CatalogMessage, FetchRequest, spawn_fetch_worker};
use super::state::{CatalogState, DetailOverlay, InputMode, Section};
use super::ui;

/// Runs the catalog browser TUI until the user quits.
///
/// # Errors
///
/// Returns an error if the fetch worker, terminal setup, or event
/// handling fails.
pub fn run_browser(client: TmdbClient, language: String, include_adult: bool) -> Result<()> {
    let (request_tx, request_rx) = mpsc::channel();
    let (message_tx, message_rx) = mpsc::channel();
    let worker = spawn_fetch_worker(client, language, include_adult, request_rx, message_tx)?;

    queue_initial_fetches(&request_tx)?;

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let mut state = CatalogState::new(Instant::now());

    let result = run_event_loop(&mut terminal, &mut state, &request_tx, &message_rx);

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    // Closing the request channel lets the worker thread exit.
    drop(request_tx);
    drop(message_rx);
    if worker.join().is_err() {
        tracing::warn!("fetch worker thread panicked");
    }

    result
}

/// Queues the once-on-startup catalog fetches.
fn queue_initial_fetches(request_tx: &Sender<FetchRequest>) -> Result<()> {
    send_request(request_tx, FetchRequest::Trending)?;
    send_request(request_tx, FetchRequest::Popular)?;
    send_request(request_tx, FetchRequest::TopRated)?;
    send_request(request_tx, FetchRequest::Genres)
}

/// Sends one request to the fetch worker.
fn send_request(request_tx: &Sender<FetchRequest>, request: FetchRequest) -> Result<()> {
    request_tx
        .send(request)
        .map_err(|_| anyhow::anyhow!("fetch worker is not running"))
}

/// Main event loop.
fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut CatalogState,
    request_tx: &Sender<FetchRequest>,
    message_rx: &Receiver<CatalogMessage>,
) -> Result<()> {
    loop {
        while let Ok(message) = message_rx.try_recv() {
            apply_message(state, request_tx, message)?;
        }

        let now = Instant::now();
        state.hero_tick(now);
        if let Some(query) = state.debounced_query(now) {
            send_request(request_tx, FetchRequest::Search { query })?;
        }

        terminal
            .draw(|frame| ui::draw(frame, state))
            .context("failed to draw TUI")?;

        if event::poll(std::time::Duration::from_millis(100)).context("failed to poll events")?
            && let Event::Key(key) = event::read().context("failed to read event")?
            && key.kind == KeyEventKind::Press
        {
            let quit = if state.overlay.is_some() {
                handle_overlay_input(state, key.code)
            } else {
                match state.input_mode {
                    InputMode::Search => handle_search_input(state, request_tx, key.code)?,
                    InputMode::Normal => {
                        handle_normal_input(state, request_tx, key.code, key.modifiers)?
                    }
                }
            };
            if quit {
                return Ok(());
            }
        }
    }
}

/// Applies one fetch result to the state, queueing follow-up fetches.
fn apply_message(
    state: &mut CatalogState,
    request_tx: &Sender<FetchRequest>,
    message: CatalogMessage,
) -> Result<()> {
    match message {
        CatalogMessage::Trending(result) => state.apply_trending(result),
        CatalogMessage::Popular(result) => state.apply_popular(result),
        CatalogMessage::TopRated(result) => state.apply_top_rated(result),
        CatalogMessage::Genres(result) => {
            // The first tab auto-selects once the genre list arrives.
            if let Some(genre_id) = state.apply_genres(result) {
                send_request(request_tx, FetchRequest::GenreMovies { genre_id })?;
            }
        }
        CatalogMessage::GenreMovies { genre_id, result } => {
            state.apply_genre_movies(genre_id, result);
        }
        CatalogMessage::Search { query, result } => state.apply_search(&query, result),
        CatalogMessage::Details { movie_id, result } => state.apply_details(movie_id, result),
    }
    Ok(())
}

/// Handles key input in normal mode. Returns `true` to exit.
fn handle_normal_input(
    state: &mut CatalogState,
    request_tx: &Sender<FetchRequest>,
    key: KeyCode,
    modifiers: KeyModifiers,
) -> Result<bool> {
    if state.error.is_some() {
        match key {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
            KeyCode::Char('r') => {
                state.begin_reload();
                queue_initial_fetches(request_tx)?;
            }
            _ => {}
        }
        return Ok(false);
    }

    match key {
        KeyCode::Char('q') => return Ok(true),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
        KeyCode::Up | KeyCode::Char('k') => state.focus_prev(),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => state.focus_next(),
        KeyCode::Left | KeyCode::Char('h') => state.move_left(Instant::now()),
        KeyCode::Right | KeyCode::Char('l') => state.move_right(Instant::now()),
        KeyCode::Char('[') if state.focus == Section::Genres => {
            if let Some(genre_id) = state.genre_tab_prev() {
                send_request(request_tx, FetchRequest::GenreMovies { genre_id })?;
            }
        }
        KeyCode::Char(']') if state.focus == Section::Genres => {
            if let Some(genre_id) = state.genre_tab_next() {
                send_request(request_tx, FetchRequest::GenreMovies { genre_id })?;
            }
        }
        KeyCode::Char(c @ '1'..='5') if state.focus == Section::Hero => {
            if let Some(slide) = c.to_digit(10) {
                state.hero_jump(usize::try_from(slide).unwrap_or(1).saturating_sub(1), Instant::now());
            }
        }
        KeyCode::Enter => {
            if let Some(movie_id) = state.selected_movie().map(|m| m.id) {
                state.open_details(movie_id);
                send_request(request_tx, FetchRequest::Details { movie_id })?;
            }
        }
        KeyCode::Char('/') => state.enter_search(),
        KeyCode::Char('o') => open_selected_movie_page(state),
        _ => {}
    }
    Ok(false)
}

/// Handles key input in search mode. Returns `true` to exit.
fn handle_search_input(
    state: &mut CatalogState,
    request_tx: &Sender<FetchRequest>,
    key: KeyCode,
) -> Result<bool> {
    match key {
        KeyCode::Esc => state.cancel_search(),
        KeyCode::Enter => {
            if let Some(movie_id) = state.pick_search_result() {
                send_request(request_tx, FetchRequest::Details { movie_id })?;
            }
        }
        KeyCode::Up => state.search_cursor_up(),
        KeyCode::Down => state.search_cursor_down(),
        KeyCode::Backspace => state.search_pop(Instant::now()),
        KeyCode::Char(c) => state.search_push(c, Instant::now()),
        _ => {}
    }
    Ok(false)
}

/// Handles key input while the detail overlay is open. Never exits the app.
fn handle_overlay_input(state: &mut CatalogState, key: KeyCode) -> bool {
    match key {
        KeyCode::Esc | KeyCode::Char('q') => state.close_details(),
        KeyCode::Up | KeyCode::Char('k') => {
            if let Some(overlay) = state.overlay.as_mut() {
                overlay.scroll = overlay.scroll.saturating_sub(1);
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if let Some(overlay) = state.overlay.as_mut() {
                overlay.scroll = overlay.scroll.saturating_add(1);
            }
        }
        KeyCode::Char('o' | 'i' | 'b') => {
            if let Some(url) = state.overlay.as_ref().and_then(|o| overlay_url(o, key)) {
                let _ = open::that(&url);
            }
        }
        _ => {}
    }
    false
}

/// Opens the TMDB page for the movie under the cursor.
fn open_selected_movie_page(state: &CatalogState) {
    let Some(movie) = state.selected_movie() else {
        return;
    };
    let url = format!("{TMDB_BASE_URL}/movie/{}", movie.id);
    let _ = open::that(&url);
}

/// Resolves the external link for an overlay key.
fn overlay_url(overlay: &DetailOverlay, key: KeyCode) -> Option<String> {
    let details = overlay.details.as_deref()?;
    match key {
        KeyCode::Char('o') => details.homepage.clone().filter(|h| !h.is_empty()),
        KeyCode::Char('i') => details
            .imdb_id
            .as_deref()
            .map(|id| format!("https://www.imdb.com/title/{id}")),
        KeyCode::Char('b') => image_url(details.backdrop_path.as_deref(), ImageSize::Original)
            .or_else(|| image_url(details.poster_path.as_deref(), ImageSize::W500)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use cinedeck_api::tmdb::TmdbMovieDetails;

    use super::*;

    fn overlay_with_details() -> DetailOverlay {
        let json = include_str!("../../../../fixtures/tmdb/movie_details_27205.json");
        let details: TmdbMovieDetails = serde_json::from_str(json).unwrap();
        DetailOverlay {
            movie_id: details.id,
            loading: false,
            error: None,
            details: Some(Box::new(details)),
            scroll: 0,
        }
    }

    #[test]
    fn test_overlay_url_homepage() {
        // Arrange
        let overlay = overlay_with_details();

        // Act
        let url = overlay_url(&overlay, KeyCode::Char('o'));

        // Assert
        assert_eq!(
            url.as_deref(),
            Some("https://www.warnerbros.com/movies/inception")
        );
    }

    #[test]
    fn test_overlay_url_imdb() {
        // Arrange
        let overlay = overlay_with_details();

        // Act
        let url = overlay_url(&overlay, KeyCode::Char('i'));

        // Assert
        assert_eq!(url.as_deref(), Some("https://www.imdb.com/title/tt1375666"));
    }

    #[test]
    fn test_overlay_url_backdrop_falls_back_to_poster() {
        // Arrange
        let mut overlay = overlay_with_details();

        // Act & Assert: backdrop preferred
        let url = overlay_url(&overlay, KeyCode::Char('b')).unwrap();
        assert!(url.contains("/original/"));

        // Act & Assert: poster fallback when no backdrop
        overlay.details.as_mut().unwrap().backdrop_path = None;
        let url = overlay_url(&overlay, KeyCode::Char('b')).unwrap();
        assert!(url.contains("/w500/"));
    }

    #[test]
    fn test_overlay_url_none_while_loading() {
        // Arrange
        let overlay = DetailOverlay {
            movie_id: 1,
            loading: true,
            error: None,
            details: None,
            scroll: 0,
        };

        // Act & Assert
        assert!(overlay_url(&overlay, KeyCode::Char('o')).is_none());
    }
}
