//! Catalog browser state management.
//!
//! One `CatalogState` value holds everything the browser renders: the
//! trending/popular/top-rated strips, the genre tabs, the hero carousel,
//! the debounced search box, and the detail overlay. All mutation goes
//! through methods here so the behavior is unit-testable without a
//! terminal or a network.

use std::time::{Duration, Instant};

use cinedeck_api::tmdb::{TmdbGenre, TmdbMovieDetails, TmdbMovieSummary};

/// Delay between the last keystroke and the search request.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Minimum trimmed query length before a search fires.
pub const MIN_QUERY_LEN: usize = 3;

/// Maximum number of search results shown in the dropdown.
pub const MAX_SEARCH_RESULTS: usize = 4;

/// Number of trending movies featured in the hero carousel.
pub const HERO_SLIDES: usize = 5;

/// Hero carousel auto-rotation interval.
pub const HERO_ROTATION: Duration = Duration::from_secs(8);

/// Maximum number of genre tabs.
pub const MAX_GENRE_TABS: usize = 10;

/// Maximum number of movies shown in the genre grid.
pub const MAX_GENRE_MOVIES: usize = 8;

/// A movie row for display in strips, the grid, and search results.
#[derive(Debug, Clone)]
pub struct MovieEntry {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Release date (YYYY-MM-DD) when known.
    pub release_date: Option<String>,
    /// Overview text (hero panel).
    pub overview: Option<String>,
    /// Vote average (0-10).
    pub vote_average: f64,
    /// Adult flag.
    pub adult: bool,
    /// Poster image path.
    pub poster_path: Option<String>,
    /// Backdrop image path.
    pub backdrop_path: Option<String>,
}

impl MovieEntry {
    /// Returns the four-digit release year when the date is known.
    #[must_use]
    pub fn release_year(&self) -> Option<&str> {
        self.release_date.as_deref().and_then(|d| d.get(..4))
    }
}

impl From<TmdbMovieSummary> for MovieEntry {
    fn from(m: TmdbMovieSummary) -> Self {
        Self {
            id: m.id,
            title: m.title,
            release_date: m.release_date,
            overview: m.overview,
            vote_average: m.vote_average,
            adult: m.adult,
            poster_path: m.poster_path,
            backdrop_path: m.backdrop_path,
        }
    }
}

/// Sections of the browse view, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Featured carousel at the top.
    Hero,
    /// Trending-this-week strip.
    Trending,
    /// Popular strip.
    Popular,
    /// Genre tabs + grid.
    Genres,
    /// Top-rated strip.
    TopRated,
}

impl Section {
    /// Sections in page order.
    pub const ORDER: [Self; 5] = [
        Self::Hero,
        Self::Trending,
        Self::Popular,
        Self::Genres,
        Self::TopRated,
    ];

    /// Returns the next section in page order (wrapping).
    #[must_use]
    pub fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|s| *s == self).unwrap_or(0);
        let next = idx.saturating_add(1).checked_rem(Self::ORDER.len());
        next.and_then(|i| Self::ORDER.get(i).copied())
            .unwrap_or(Self::Hero)
    }

    /// Returns the previous section in page order (wrapping).
    #[must_use]
    pub fn prev(self) -> Self {
        let idx = Self::ORDER.iter().position(|s| *s == self).unwrap_or(0);
        let prev = idx
            .checked_sub(1)
            .unwrap_or(Self::ORDER.len().saturating_sub(1));
        Self::ORDER.get(prev).copied().unwrap_or(Self::Hero)
    }
}

/// Input mode for the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode.
    Normal,
    /// Search text input mode.
    Search,
}

/// A horizontally scrolled movie list with its own fetch flags.
#[derive(Debug)]
pub struct MovieStrip {
    /// Loaded movies.
    pub movies: Vec<MovieEntry>,
    /// Cursor position within the strip.
    pub cursor: usize,
    /// True while the fetch is in flight.
    pub loading: bool,
    /// Fetch error, if the last fetch failed.
    pub error: Option<String>,
}

impl MovieStrip {
    /// Creates an empty strip in the loading state.
    const fn new() -> Self {
        Self {
            movies: Vec::new(),
            cursor: 0,
            loading: true,
            error: None,
        }
    }

    /// Returns the movie under the cursor.
    #[must_use]
    pub fn selected(&self) -> Option<&MovieEntry> {
        self.movies.get(self.cursor)
    }

    /// Moves the cursor left.
    #[allow(clippy::arithmetic_side_effects)]
    pub const fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Moves the cursor right.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn move_right(&mut self) {
        if self.cursor + 1 < self.movies.len() {
            self.cursor += 1;
        }
    }

    /// Resets to the loading state ahead of a (re-)fetch.
    fn begin(&mut self) {
        self.movies.clear();
        self.cursor = 0;
        self.loading = true;
        self.error = None;
    }

    /// Applies a fetch result; errors clear the list.
    fn finish(&mut self, result: Result<Vec<MovieEntry>, String>) {
        self.loading = false;
        self.cursor = 0;
        match result {
            Ok(movies) => {
                self.movies = movies;
                self.error = None;
            }
            Err(message) => {
                self.movies.clear();
                self.error = Some(message);
            }
        }
    }
}

/// Search box state (debounced search-as-you-type).
#[derive(Debug)]
pub struct SearchState {
    /// Current input buffer.
    pub input: String,
    /// Results shown in the dropdown (capped at `MAX_SEARCH_RESULTS`).
    pub results: Vec<MovieEntry>,
    /// True while a search request is in flight.
    pub searching: bool,
    /// Dropdown visibility.
    pub open: bool,
    /// Highlighted result index.
    pub cursor: usize,
    /// Instant of the last keystroke still awaiting the debounce.
    pending_since: Option<Instant>,
}

impl SearchState {
    const fn new() -> Self {
        Self {
            input: String::new(),
            results: Vec::new(),
            searching: false,
            open: false,
            cursor: 0,
            pending_since: None,
        }
    }

    /// Trimmed query, when long enough to search for.
    fn effective_query(&self) -> Option<&str> {
        let trimmed = self.input.trim();
        (trimmed.len() >= MIN_QUERY_LEN).then_some(trimmed)
    }
}

/// Detail overlay state: the open movie id plus its own fetch flags.
#[derive(Debug)]
pub struct DetailOverlay {
    /// TMDB id of the movie being shown.
    pub movie_id: u64,
    /// True while the details fetch is in flight.
    pub loading: bool,
    /// Fetch error, if the fetch failed.
    pub error: Option<String>,
    /// Loaded details.
    pub details: Option<Box<TmdbMovieDetails>>,
    /// Vertical scroll offset.
    pub scroll: u16,
}

/// State for the catalog browser TUI.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogState {
    /// Trending-this-week strip.
    pub trending: MovieStrip,
    /// Popular strip.
    pub popular: MovieStrip,
    /// Top-rated strip.
    pub top_rated: MovieStrip,
    /// Genre tabs (capped at `MAX_GENRE_TABS`).
    pub genres: Vec<TmdbGenre>,
    /// True while the genre list fetch is in flight.
    pub genres_loading: bool,
    /// Selected genre tab index.
    pub genre_cursor: usize,
    /// Movies for the selected genre (capped at `MAX_GENRE_MOVIES`).
    pub genre_movies: MovieStrip,
    /// Hero carousel slide index.
    pub hero_slide: usize,
    /// Search box state.
    pub search: SearchState,
    /// Detail overlay (`Some` = the currently open movie).
    pub overlay: Option<DetailOverlay>,
    /// Focused section.
    pub focus: Section,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Fatal catalog error (initial fetch failure).
    pub error: Option<String>,
    /// Last hero rotation instant.
    hero_rotated_at: Instant,
}

impl CatalogState {
    /// Creates the initial state; every catalog section starts loading.
    #[must_use]
    pub const fn new(now: Instant) -> Self {
        Self {
            trending: MovieStrip::new(),
            popular: MovieStrip::new(),
            top_rated: MovieStrip::new(),
            genres: Vec::new(),
            genres_loading: true,
            genre_cursor: 0,
            genre_movies: MovieStrip::new(),
            hero_slide: 0,
            search: SearchState::new(),
            overlay: None,
            focus: Section::Hero,
            input_mode: InputMode::Normal,
            error: None,
            hero_rotated_at: now,
        }
    }

    // --- Catalog sections -------------------------------------------------

    /// Applies the trending fetch result.
    pub fn apply_trending(&mut self, result: Result<Vec<MovieEntry>, String>) {
        self.note_fatal(&result);
        self.trending.finish(result);
        self.hero_slide = 0;
    }

    /// Applies the popular fetch result.
    pub fn apply_popular(&mut self, result: Result<Vec<MovieEntry>, String>) {
        self.note_fatal(&result);
        self.popular.finish(result);
    }

    /// Applies the top-rated fetch result.
    pub fn apply_top_rated(&mut self, result: Result<Vec<MovieEntry>, String>) {
        self.note_fatal(&result);
        self.top_rated.finish(result);
    }

    /// Applies the genre list result. Returns the genre id to fetch movies
    /// for (the first tab auto-selects once genres arrive).
    pub fn apply_genres(&mut self, result: Result<Vec<TmdbGenre>, String>) -> Option<u32> {
        self.genres_loading = false;
        match result {
            Ok(mut genres) => {
                genres.truncate(MAX_GENRE_TABS);
                self.genres = genres;
                self.genre_cursor = 0;
                let first = self.genres.first().map(|g| g.id);
                if first.is_some() {
                    self.genre_movies.begin();
                }
                first
            }
            Err(message) => {
                if self.error.is_none() {
                    self.error = Some(message);
                }
                None
            }
        }
    }

    /// Applies a genre-movies result; responses for a tab that is no
    /// longer selected are dropped.
    pub fn apply_genre_movies(&mut self, genre_id: u32, result: Result<Vec<MovieEntry>, String>) {
        if self.selected_genre().map(|g| g.id) != Some(genre_id) {
            return;
        }
        self.genre_movies
            .finish(result.map(|mut movies| {
                movies.truncate(MAX_GENRE_MOVIES);
                movies
            }));
    }

    /// Returns the selected genre tab.
    #[must_use]
    pub fn selected_genre(&self) -> Option<&TmdbGenre> {
        self.genres.get(self.genre_cursor)
    }

    /// Selects the next genre tab (saturating). Returns the genre id to
    /// fetch when the selection changed.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn genre_tab_next(&mut self) -> Option<u32> {
        if self.genre_cursor + 1 < self.genres.len() {
            self.genre_cursor += 1;
            self.genre_movies.begin();
            self.selected_genre().map(|g| g.id)
        } else {
            None
        }
    }

    /// Selects the previous genre tab (saturating). Returns the genre id
    /// to fetch when the selection changed.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn genre_tab_prev(&mut self) -> Option<u32> {
        if self.genre_cursor > 0 {
            self.genre_cursor -= 1;
            self.genre_movies.begin();
            self.selected_genre().map(|g| g.id)
        } else {
            None
        }
    }

    /// Records the first fatal (initial-load) error.
    fn note_fatal(&mut self, result: &Result<Vec<MovieEntry>, String>) {
        if let Err(message) = result
            && self.error.is_none()
        {
            self.error = Some(message.clone());
        }
    }

    /// Resets every catalog section to the loading state for a retry.
    pub fn begin_reload(&mut self) {
        self.error = None;
        self.trending.begin();
        self.popular.begin();
        self.top_rated.begin();
        self.genres.clear();
        self.genres_loading = true;
        self.genre_cursor = 0;
        self.genre_movies.begin();
        self.hero_slide = 0;
    }

    // --- Hero carousel ----------------------------------------------------

    /// Movies featured in the hero carousel (first slice of trending).
    #[must_use]
    pub fn featured(&self) -> &[MovieEntry] {
        let n = self.trending.movies.len().min(HERO_SLIDES);
        self.trending.movies.get(..n).unwrap_or(&[])
    }

    /// Advances the carousel when the rotation interval elapsed.
    /// Returns true when the slide changed.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn hero_tick(&mut self, now: Instant) -> bool {
        let count = self.featured().len();
        if self.trending.loading || count == 0 {
            return false;
        }
        if now.duration_since(self.hero_rotated_at) < HERO_ROTATION {
            return false;
        }
        self.hero_slide = (self.hero_slide + 1) % count;
        self.hero_rotated_at = now;
        true
    }

    /// Advances to the next slide manually, resetting the timer.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn hero_next(&mut self, now: Instant) {
        let count = self.featured().len();
        if count > 0 {
            self.hero_slide = (self.hero_slide + 1) % count;
            self.hero_rotated_at = now;
        }
    }

    /// Goes back to the previous slide manually, resetting the timer.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn hero_prev(&mut self, now: Instant) {
        let count = self.featured().len();
        if count > 0 {
            self.hero_slide = (self.hero_slide + count - 1) % count;
            self.hero_rotated_at = now;
        }
    }

    /// Jumps to a slide (pagination dots), resetting the timer.
    pub fn hero_jump(&mut self, index: usize, now: Instant) {
        if index < self.featured().len() {
            self.hero_slide = index;
            self.hero_rotated_at = now;
        }
    }

    // --- Search -----------------------------------------------------------

    /// Appends a character to the search input.
    pub fn search_push(&mut self, ch: char, now: Instant) {
        self.search.input.push(ch);
        self.search_input_changed(now);
    }

    /// Removes the last character from the search input.
    pub fn search_pop(&mut self, now: Instant) {
        self.search.input.pop();
        self.search_input_changed(now);
    }

    /// Restarts the debounce window; short queries clear the dropdown.
    fn search_input_changed(&mut self, now: Instant) {
        if self.search.effective_query().is_some() {
            self.search.pending_since = Some(now);
        } else {
            self.search.pending_since = None;
            self.search.searching = false;
            self.search.results.clear();
            self.search.open = false;
            self.search.cursor = 0;
        }
    }

    /// Returns the query to fire once the debounce window elapsed.
    pub fn debounced_query(&mut self, now: Instant) -> Option<String> {
        let since = self.search.pending_since?;
        if now.duration_since(since) < SEARCH_DEBOUNCE {
            return None;
        }
        self.search.pending_since = None;
        let query = self.search.effective_query()?.to_owned();
        self.search.searching = true;
        Some(query)
    }

    /// Applies a search result; responses for a superseded query are
    /// dropped. An error shows as an empty dropdown.
    pub fn apply_search(&mut self, query: &str, result: Result<Vec<MovieEntry>, String>) {
        if self.search.effective_query() != Some(query) {
            return;
        }
        self.search.searching = false;
        self.search.cursor = 0;
        self.search.results = match result {
            Ok(mut movies) => {
                movies.truncate(MAX_SEARCH_RESULTS);
                movies
            }
            Err(message) => {
                tracing::warn!(%message, "search request failed");
                Vec::new()
            }
        };
        self.search.open = true;
    }

    /// Enters search mode.
    pub const fn enter_search(&mut self) {
        self.input_mode = InputMode::Search;
    }

    /// Leaves search mode, clearing the input and dropdown.
    pub fn cancel_search(&mut self) {
        self.input_mode = InputMode::Normal;
        self.search.input.clear();
        self.search.pending_since = None;
        self.search.searching = false;
        self.search.results.clear();
        self.search.open = false;
        self.search.cursor = 0;
    }

    /// Moves the dropdown cursor up.
    #[allow(clippy::arithmetic_side_effects)]
    pub const fn search_cursor_up(&mut self) {
        if self.search.cursor > 0 {
            self.search.cursor -= 1;
        }
    }

    /// Moves the dropdown cursor down.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn search_cursor_down(&mut self) {
        if self.search.cursor + 1 < self.search.results.len() {
            self.search.cursor += 1;
        }
    }

    /// Picks the highlighted search result: opens its detail overlay and
    /// clears the search box. Returns the movie id to fetch.
    pub fn pick_search_result(&mut self) -> Option<u64> {
        let id = self.search.results.get(self.search.cursor).map(|m| m.id)?;
        self.cancel_search();
        self.open_details(id);
        Some(id)
    }

    // --- Detail overlay ---------------------------------------------------

    /// Opens the detail overlay for a movie (loading state).
    pub fn open_details(&mut self, movie_id: u64) {
        self.overlay = Some(DetailOverlay {
            movie_id,
            loading: true,
            error: None,
            details: None,
            scroll: 0,
        });
    }

    /// Closes the detail overlay.
    pub fn close_details(&mut self) {
        self.overlay = None;
    }

    /// Applies a details result; responses for a movie that is no longer
    /// open are dropped.
    pub fn apply_details(&mut self, movie_id: u64, result: Result<Box<TmdbMovieDetails>, String>) {
        let Some(overlay) = self.overlay.as_mut() else {
            return;
        };
        if overlay.movie_id != movie_id {
            return;
        }
        overlay.loading = false;
        match result {
            Ok(details) => overlay.details = Some(details),
            Err(message) => overlay.error = Some(message),
        }
    }

    // --- Focus & selection ------------------------------------------------

    /// Moves focus to the next section in page order.
    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    /// Moves focus to the previous section in page order.
    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Returns the movie currently under the cursor in the focused section.
    #[must_use]
    pub fn selected_movie(&self) -> Option<&MovieEntry> {
        match self.focus {
            Section::Hero => self.featured().get(self.hero_slide),
            Section::Trending => self.trending.selected(),
            Section::Popular => self.popular.selected(),
            Section::Genres => self.genre_movies.selected(),
            Section::TopRated => self.top_rated.selected(),
        }
    }

    /// Moves the cursor left within the focused section.
    pub fn move_left(&mut self, now: Instant) {
        match self.focus {
            Section::Hero => self.hero_prev(now),
            Section::Trending => self.trending.move_left(),
            Section::Popular => self.popular.move_left(),
            Section::Genres => self.genre_movies.move_left(),
            Section::TopRated => self.top_rated.move_left(),
        }
    }

    /// Moves the cursor right within the focused section.
    pub fn move_right(&mut self, now: Instant) {
        match self.focus {
            Section::Hero => self.hero_next(now),
            Section::Trending => self.trending.move_right(),
            Section::Popular => self.popular.move_right(),
            Section::Genres => self.genre_movies.move_right(),
            Section::TopRated => self.top_rated.move_right(),
        }
    }
}
