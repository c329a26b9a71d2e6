//! TUI rendering logic for the catalog browser.

use chrono::NaiveDate;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Tabs, Wrap};

use super::state::{CatalogState, InputMode, MovieEntry, MovieStrip, Section};

/// Width of one movie card in a strip.
const CARD_WIDTH: u16 = 24;

/// Formats a vote average with one decimal (e.g. 8.368 -> "8.4").
fn fmt_rating(rating: f64) -> String {
    format!("{rating:.1}")
}

/// Formats a runtime in minutes as "2h 28m".
#[allow(clippy::arithmetic_side_effects)]
fn fmt_runtime(minutes: Option<u32>) -> String {
    minutes.filter(|m| *m > 0).map_or_else(
        || String::from("N/A"),
        |m| format!("{}h {}m", m / 60, m % 60),
    )
}

/// Formats a USD amount in compact notation ("$160.0M", "$1.2B").
#[allow(clippy::cast_precision_loss)]
fn fmt_money(amount: u64) -> String {
    const BILLION: f64 = 1_000_000_000.0;
    const MILLION: f64 = 1_000_000.0;
    const THOUSAND: f64 = 1_000.0;

    if amount == 0 {
        return String::from("N/A");
    }
    let value = amount as f64;
    if value >= BILLION {
        format!("${:.1}B", value / BILLION)
    } else if value >= MILLION {
        format!("${:.1}M", value / MILLION)
    } else if value >= THOUSAND {
        format!("${:.1}K", value / THOUSAND)
    } else {
        format!("${amount}")
    }
}

/// Formats a vote count with thousands separators (e.g. 37211 -> "37,211").
fn fmt_votes(n: u32) -> String {
    let mut s = n.to_string();
    let mut i = s.len();
    while i > 3 {
        i = i.saturating_sub(3);
        s.insert(i, ',');
    }
    s
}

/// Formats a release date for the detail overlay ("15 Jul 2010").
/// Falls back to the raw string when the date does not parse.
fn fmt_release_date(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_or_else(|_| String::from(date), |d| d.format("%d %b %Y").to_string())
}

/// Computes a centered popup rect as a percentage of the outer area.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(100_u16.saturating_sub(percent_y).saturating_div(2)),
            Constraint::Percentage(percent_y),
            Constraint::Percentage(100_u16.saturating_sub(percent_y).saturating_div(2)),
        ])
        .split(area);
    let middle = vertical.get(1).copied().unwrap_or(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(100_u16.saturating_sub(percent_x).saturating_div(2)),
            Constraint::Percentage(percent_x),
            Constraint::Percentage(100_u16.saturating_sub(percent_x).saturating_div(2)),
        ])
        .split(middle);
    horizontal.get(1).copied().unwrap_or(middle)
}

/// Draws the catalog browser UI.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &CatalogState) {
    if state.error.is_some() {
        draw_error_view(frame, state);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(8), // hero
            Constraint::Length(5), // trending
            Constraint::Length(5), // popular
            Constraint::Length(9), // genre browser
            Constraint::Length(5), // top rated
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], state);
    draw_hero(frame, chunks[1], state);
    draw_strip(
        frame,
        chunks[2],
        "Trending This Week",
        &state.trending,
        state.focus == Section::Trending,
    );
    draw_strip(
        frame,
        chunks[3],
        "Popular Movies",
        &state.popular,
        state.focus == Section::Popular,
    );
    draw_genre_section(frame, chunks[4], state);
    draw_strip(
        frame,
        chunks[5],
        "Top Rated Movies",
        &state.top_rated,
        state.focus == Section::TopRated,
    );
    draw_footer(frame, chunks[6], state);

    if state.input_mode == InputMode::Search || state.search.open {
        draw_search_dropdown(frame, chunks[0], state);
    }

    if state.overlay.is_some() {
        draw_detail_overlay(frame, state);
    }
}

/// Draws the full-screen error view (initial fetch failure).
fn draw_error_view(frame: &mut Frame, state: &CatalogState) {
    let area = centered_rect(70, 40, frame.area());
    let message = state.error.as_deref().unwrap_or("unknown error");
    let lines = vec![
        Line::from(Span::styled(
            "Error loading movies",
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(message),
        Line::default(),
        Line::from("r: retry  q: quit"),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" CineDeck "));
    frame.render_widget(paragraph, area);
}

/// Draws the header with brand and the search box.
#[allow(clippy::indexing_slicing)]
fn draw_header(frame: &mut Frame, area: Rect, state: &CatalogState) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let brand = Paragraph::new(Line::from(vec![
        Span::styled(
            "Cine",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("Deck", Style::default().add_modifier(Modifier::BOLD)),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(brand, header_chunks[0]);

    let search_style = if state.input_mode == InputMode::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let search_text = if state.input_mode == InputMode::Normal && state.search.input.is_empty() {
        Line::from(Span::styled(
            "Search Movies...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(state.search.input.as_str())
    };
    let search = Paragraph::new(search_text).style(search_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search: / "),
    );
    frame.render_widget(search, header_chunks[1]);
}

/// Draws the search dropdown under the header's search half.
#[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)]
fn draw_search_dropdown(frame: &mut Frame, header_area: Rect, state: &CatalogState) {
    if !state.search.open && !state.search.searching {
        return;
    }

    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(header_area);
    let anchor = header_chunks[1];

    let rows = state.search.results.len().max(1);
    let height = u16::try_from(rows).unwrap_or(1).saturating_add(2);
    let area = Rect {
        x: anchor.x,
        y: anchor.y.saturating_add(anchor.height),
        width: anchor.width,
        height,
    }
    .intersection(frame.area());
    if area.is_empty() {
        return;
    }

    let items: Vec<ListItem> = if state.search.searching {
        vec![ListItem::new(Span::styled(
            "Searching...",
            Style::default().fg(Color::DarkGray),
        ))]
    } else if state.search.results.is_empty() {
        vec![ListItem::new(Span::styled(
            "No movies found matching ...",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        state
            .search
            .results
            .iter()
            .enumerate()
            .map(|(i, movie)| {
                let style = if i == state.search.cursor {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(Span::styled(
                    format!(
                        "{}  ({})",
                        movie.title,
                        movie.release_year().unwrap_or("N/A")
                    ),
                    style,
                )))
            })
            .collect()
    };

    frame.render_widget(Clear, area);
    let list = List::new(items).block(Block::default().borders(Borders::ALL));
    frame.render_widget(list, area);
}

/// Draws the hero carousel.
fn draw_hero(frame: &mut Frame, area: Rect, state: &CatalogState) {
    let focused = state.focus == Section::Hero;
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Featured ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.trending.loading {
        let loading = Paragraph::new("Loading movies...")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(loading, inner);
        return;
    }

    let featured = state.featured();
    let Some(movie) = featured.get(state.hero_slide) else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(inner);

    let mut meta = vec![Span::styled(
        "FEATURED",
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    )];
    if movie.vote_average > 0.0 {
        meta.push(Span::raw("  "));
        meta.push(Span::styled(
            format!("\u{2605} {}", fmt_rating(movie.vote_average)),
            Style::default().fg(Color::Yellow),
        ));
    }
    meta.push(Span::raw("  "));
    meta.push(Span::styled(
        movie.release_year().unwrap_or("N/A").to_owned(),
        Style::default().fg(Color::DarkGray),
    ));
    if movie.adult {
        meta.push(Span::raw("  "));
        meta.push(Span::styled("18+", Style::default().fg(Color::Red)));
    }

    let mut lines = vec![
        Line::from(meta),
        Line::from(Span::styled(
            movie.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    if let Some(overview) = movie.overview.as_deref() {
        lines.push(Line::from(overview));
    }
    let content = Paragraph::new(lines).wrap(Wrap { trim: true });
    frame.render_widget(content, chunks.first().copied().unwrap_or(inner));

    let dots: Vec<Span> = (0..featured.len())
        .map(|i| {
            if i == state.hero_slide {
                Span::styled("\u{25cf} ", Style::default().fg(Color::Magenta))
            } else {
                Span::styled("\u{25cb} ", Style::default().fg(Color::DarkGray))
            }
        })
        .collect();
    let dots_line = Paragraph::new(Line::from(dots)).alignment(Alignment::Center);
    frame.render_widget(dots_line, chunks.get(1).copied().unwrap_or(inner));
}

/// Draws one horizontal movie strip.
fn draw_strip(frame: &mut Frame, area: Rect, title: &str, strip: &MovieStrip, focused: bool) {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block_title = if strip.movies.is_empty() {
        format!(" {title} ")
    } else {
        format!(
            " {title} ({}/{}) ",
            strip.cursor.saturating_add(1),
            strip.movies.len()
        )
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(block_title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if strip.loading {
        let loading = Paragraph::new("Loading movies...")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(loading, inner);
        return;
    }
    if let Some(error) = strip.error.as_deref() {
        let message = Paragraph::new(error)
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true });
        frame.render_widget(message, inner);
        return;
    }
    if strip.movies.is_empty() {
        return;
    }

    render_cards(frame, inner, &strip.movies, strip.cursor, focused);
}

/// Renders a window of fixed-width movie cards with the cursor visible.
fn render_cards(frame: &mut Frame, area: Rect, movies: &[MovieEntry], cursor: usize, focused: bool) {
    let visible = usize::from(area.width.saturating_div(CARD_WIDTH)).max(1);
    let offset = cursor.saturating_add(1).saturating_sub(visible);

    let constraints: Vec<Constraint> = (0..visible.min(movies.len().saturating_sub(offset)))
        .map(|_| Constraint::Length(CARD_WIDTH))
        .collect();
    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (slot, (idx, movie)) in slots
        .iter()
        .zip(movies.iter().enumerate().skip(offset))
    {
        let selected = idx == cursor && focused;
        let title_style = if selected {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let card = Paragraph::new(vec![
            Line::from(Span::styled(movie.title.clone(), title_style)),
            Line::from(vec![
                Span::styled(
                    format!("\u{2605} {}", fmt_rating(movie.vote_average)),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(
                    format!("  {}", movie.release_year().unwrap_or("N/A")),
                    Style::default().fg(Color::DarkGray),
                ),
            ]),
        ]);
        frame.render_widget(card, *slot);
    }
}

/// Draws the genre browser (tabs + grid).
#[allow(clippy::indexing_slicing)]
fn draw_genre_section(frame: &mut Frame, area: Rect, state: &CatalogState) {
    let focused = state.focus == Section::Genres;
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Browse by Genre ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.genres_loading {
        let loading = Paragraph::new("Loading genres...")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(loading, inner);
        return;
    }
    if state.genres.is_empty() {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(2)])
        .split(inner);

    let titles: Vec<Line> = state
        .genres
        .iter()
        .map(|g| Line::from(g.name.clone()))
        .collect();
    let tabs = Tabs::new(titles)
        .select(Some(state.genre_cursor))
        .highlight_style(
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, chunks[0]);

    let grid_area = chunks[1];
    if state.genre_movies.loading {
        let loading = Paragraph::new("Loading movies...")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(loading, grid_area);
        return;
    }
    if let Some(error) = state.genre_movies.error.as_deref() {
        let message = Paragraph::new(error)
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true });
        frame.render_widget(message, grid_area);
        return;
    }

    render_cards(
        frame,
        grid_area,
        &state.genre_movies.movies,
        state.genre_movies.cursor,
        focused,
    );
}

/// Draws the centered detail overlay.
fn draw_detail_overlay(frame: &mut Frame, state: &CatalogState) {
    let Some(overlay) = state.overlay.as_ref() else {
        return;
    };

    let area = centered_rect(80, 80, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(" Movie Details ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if overlay.loading {
        let loading = Paragraph::new("Loading details...")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(loading, inner);
        return;
    }
    if let Some(error) = overlay.error.as_deref() {
        let lines = vec![
            Line::from(Span::styled(
                "Failed to load movie details",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(error),
            Line::default(),
            Line::from("Esc: close"),
        ];
        let message = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(message, inner);
        return;
    }
    let Some(details) = overlay.details.as_deref() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(inner);

    let mut lines = Vec::new();

    let mut title_spans = vec![Span::styled(
        details.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(year) = details.release_date.as_deref().and_then(|d| d.get(..4)) {
        title_spans.push(Span::styled(
            format!(" ({year})"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    lines.push(Line::from(title_spans));

    let mut meta = Vec::new();
    if details.vote_average > 0.0 {
        meta.push(Span::styled(
            format!("\u{2605} {}", fmt_rating(details.vote_average)),
            Style::default().fg(Color::Yellow),
        ));
        meta.push(Span::raw("  "));
    }
    meta.push(Span::raw(fmt_runtime(details.runtime)));
    if let Some(date) = details.release_date.as_deref() {
        meta.push(Span::raw("  "));
        meta.push(Span::styled(
            fmt_release_date(date),
            Style::default().fg(Color::Blue),
        ));
    }
    if details.adult {
        meta.push(Span::raw("  "));
        meta.push(Span::styled("18+", Style::default().fg(Color::Red)));
    }
    lines.push(Line::from(meta));

    if !details.genres.is_empty() {
        let names: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
        lines.push(Line::from(Span::styled(
            names.join(" \u{00b7} "),
            Style::default().fg(Color::Magenta),
        )));
    }
    if let Some(tagline) = details.tagline.as_deref().filter(|t| !t.is_empty()) {
        lines.push(Line::from(Span::styled(
            format!("\"{tagline}\""),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Overview",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(
        details
            .overview
            .clone()
            .filter(|o| !o.is_empty())
            .unwrap_or_else(|| String::from("No overview available")),
    ));
    lines.push(Line::default());

    if !details.production_companies.is_empty() {
        let names: Vec<&str> = details
            .production_companies
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        lines.push(detail_row("Production", &names.join(", ")));
    }
    if !details.production_countries.is_empty() {
        let names: Vec<&str> = details
            .production_countries
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        lines.push(detail_row("Countries", &names.join(", ")));
    }
    if !details.spoken_languages.is_empty() {
        let names: Vec<&str> = details
            .spoken_languages
            .iter()
            .map(|l| l.english_name.as_str())
            .collect();
        lines.push(detail_row("Languages", &names.join(", ")));
    }
    lines.push(detail_row("Budget", &fmt_money(details.budget)));
    lines.push(detail_row("Revenue", &fmt_money(details.revenue)));
    if let Some(status) = details.status.as_deref() {
        lines.push(detail_row("Status", status));
    }
    lines.push(detail_row(
        "Original language",
        &details.original_language.to_uppercase(),
    ));
    if details.homepage.is_some() {
        lines.push(detail_row("Homepage", "press o"));
    }
    if details.imdb_id.is_some() {
        lines.push(detail_row("IMDB", "press i"));
    }

    let content = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((overlay.scroll, 0));
    frame.render_widget(content, chunks.first().copied().unwrap_or(inner));

    if details.vote_average > 0.0 {
        let gauge = Gauge::default()
            .ratio((details.vote_average / 10.0).clamp(0.0, 1.0))
            .gauge_style(Style::default().fg(Color::Magenta))
            .label(format!(
                "{} \u{00b7} {} votes",
                fmt_rating(details.vote_average),
                fmt_votes(details.vote_count)
            ));
        frame.render_widget(gauge, chunks.get(1).copied().unwrap_or(inner));
    }
}

/// Builds a "label: value" detail line.
fn detail_row(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{label}: "),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(value.to_owned()),
    ])
}

/// Draws the footer with key hints.
fn draw_footer(frame: &mut Frame, area: Rect, state: &CatalogState) {
    let help_text = if state.overlay.is_some() {
        "\u{2191}\u{2193}: scroll  o: homepage  i: IMDB  b: backdrop  Esc: close"
    } else {
        match state.input_mode {
            InputMode::Search => "Type to search | \u{2191}\u{2193}: results  Enter: open  Esc: cancel",
            InputMode::Normal => {
                "\u{2191}\u{2193}/Tab: section  \u{2190}\u{2192}/h/l: move  [ ]: genre  1-5: slide  Enter: details  /: search  o: open TMDB  q: quit"
            }
        }
    };

    let footer = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
