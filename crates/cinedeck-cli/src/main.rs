//! cinedeck - terminal movie discovery app backed by the TMDB API.

/// Application configuration (TOML).
mod config;
/// Terminal UI components.
mod tui;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, resolve_config_path};
use crate::tui::run_browser;
use cinedeck_api::tmdb::{
    DiscoverMovieParams, LocalTmdbApi, SearchMovieParams, TmdbClient, TmdbMovieListResponse,
    TrendingWindow,
};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive catalog browser TUI.
    Browse,
    /// Query the TMDB API directly.
    Tmdb(TmdbCommand),
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

/// Arguments for the `tmdb` subcommand.
#[derive(clap::Args)]
struct TmdbCommand {
    /// TMDB subcommand to run.
    #[command(subcommand)]
    command: TmdbSubcommands,
}

/// Available TMDB subcommands.
#[derive(Subcommand)]
enum TmdbSubcommands {
    /// List trending movies.
    Trending(TrendingArgs),
    /// List popular movies.
    Popular(ListArgs),
    /// List top-rated movies.
    TopRated(ListArgs),
    /// List the movie genre catalog.
    Genres(GenresArgs),
    /// Discover movies for a genre.
    Discover(DiscoverArgs),
    /// Search for movies by title.
    Search(SearchArgs),
    /// Show extended details for a movie.
    Details(DetailsArgs),
}

/// Trending window CLI value.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum WindowArg {
    /// Trending over the last 24 hours.
    Day,
    /// Trending over the last 7 days.
    Week,
}

impl From<WindowArg> for TrendingWindow {
    fn from(w: WindowArg) -> Self {
        match w {
            WindowArg::Day => Self::Day,
            WindowArg::Week => Self::Week,
        }
    }
}

/// Arguments for the `tmdb trending` subcommand.
#[derive(clap::Args)]
struct TrendingArgs {
    /// Trending window (default: week).
    #[arg(long, value_enum, default_value = "week")]
    window: WindowArg,
    /// Response language (default: "en-US").
    #[arg(long, default_value = "en-US")]
    language: String,
}

/// Arguments for paged list subcommands (`popular`, `top-rated`).
#[derive(clap::Args)]
struct ListArgs {
    /// Response language (default: "en-US").
    #[arg(long, default_value = "en-US")]
    language: String,
    /// Result page (default: 1).
    #[arg(long, default_value_t = 1)]
    page: u32,
}

/// Arguments for the `tmdb genres` subcommand.
#[derive(clap::Args)]
struct GenresArgs {
    /// Response language (default: "en-US").
    #[arg(long, default_value = "en-US")]
    language: String,
}

/// Arguments for the `tmdb discover` subcommand.
#[derive(clap::Args)]
struct DiscoverArgs {
    /// Genre ID to filter by (e.g. 28 for Action).
    #[arg(long, required = true)]
    genre_id: u32,
    /// Response language (default: "en-US").
    #[arg(long, default_value = "en-US")]
    language: String,
    /// Result page (default: 1).
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// Sort order (e.g. "popularity.desc").
    #[arg(long)]
    sort_by: Option<String>,
}

/// Arguments for the `tmdb search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query (e.g. "Inception").
    #[arg(long, required = true)]
    query: String,
    /// Response language (default: "en-US").
    #[arg(long, default_value = "en-US")]
    language: String,
    /// Result page (default: 1).
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// Filter by year.
    #[arg(long)]
    year: Option<u32>,
}

/// Arguments for the `tmdb details` subcommand.
#[derive(clap::Args)]
struct DetailsArgs {
    /// TMDB movie ID.
    #[arg(long, required = true)]
    id: u64,
    /// Response language (default: "en-US").
    #[arg(long, default_value = "en-US")]
    language: String,
}

/// Arguments for the `completions` subcommand.
#[derive(clap::Args)]
struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    shell: clap_complete::Shell,
}

/// Builds a `TmdbClient` from the `TMDB_API_TOKEN` environment variable.
///
/// # Errors
///
/// Returns an error if `TMDB_API_TOKEN` is not set or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client() -> Result<TmdbClient> {
    let api_token = std::env::var("TMDB_API_TOKEN")
        .context("TMDB_API_TOKEN environment variable is required")?;

    TmdbClient::builder()
        .api_token(api_token)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .context("failed to build TMDB client")
}

/// Logs a movie list as a table.
fn print_movie_list(response: &TmdbMovieListResponse) {
    tracing::info!("Total results: {}", response.total_results);
    tracing::info!("ID\tRating\tReleaseDate\tTitle");
    for movie in &response.results {
        tracing::info!(
            "{}\t{:.1}\t{}\t{}",
            movie.id,
            movie.vote_average,
            movie.release_date.as_deref().unwrap_or("-"),
            movie.title,
        );
    }
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the config, client, or TUI fails.
#[instrument(skip_all)]
fn run_browse(dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;

    let client = build_tmdb_client()?;

    tracing::info!(
        language = %config.catalog.language,
        "Launching catalog browser..."
    );
    run_browser(client, config.catalog.language, config.catalog.include_adult)
        .context("catalog browser TUI failed")
}

/// Runs the `tmdb trending` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_tmdb_trending(args: &TrendingArgs) -> Result<()> {
    let client = build_tmdb_client()?;

    let response = client
        .trending_movies(args.window.into(), &args.language)
        .await
        .context("TMDB trending request failed")?;

    print_movie_list(&response);
    Ok(())
}

/// Runs the `tmdb popular` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_tmdb_popular(args: &ListArgs) -> Result<()> {
    let client = build_tmdb_client()?;

    let response = client
        .popular_movies(&args.language, args.page)
        .await
        .context("TMDB movie/popular request failed")?;

    print_movie_list(&response);
    Ok(())
}

/// Runs the `tmdb top-rated` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_tmdb_top_rated(args: &ListArgs) -> Result<()> {
    let client = build_tmdb_client()?;

    let response = client
        .top_rated_movies(&args.language, args.page)
        .await
        .context("TMDB movie/top_rated request failed")?;

    print_movie_list(&response);
    Ok(())
}

/// Runs the `tmdb genres` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_tmdb_genres(args: &GenresArgs) -> Result<()> {
    let client = build_tmdb_client()?;

    let response = client
        .movie_genres(&args.language)
        .await
        .context("TMDB genre list request failed")?;

    tracing::info!("ID\tName");
    for genre in &response.genres {
        tracing::info!("{}\t{}", genre.id, genre.name);
    }
    tracing::info!("Total: {} genres", response.genres.len());

    Ok(())
}

/// Runs the `tmdb discover` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_tmdb_discover(args: &DiscoverArgs) -> Result<()> {
    let client = build_tmdb_client()?;

    let mut params = DiscoverMovieParams::new(args.genre_id)
        .language(&args.language)
        .page(args.page);
    if let Some(ref sort_by) = args.sort_by {
        params = params.sort_by(sort_by);
    }

    let response = client
        .discover_by_genre(&params)
        .await
        .context("TMDB discover request failed")?;

    print_movie_list(&response);
    Ok(())
}

/// Runs the `tmdb search` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_tmdb_search(args: &SearchArgs) -> Result<()> {
    let client = build_tmdb_client()?;

    let mut params = SearchMovieParams::new(&args.query)
        .language(&args.language)
        .page(args.page);
    if let Some(year) = args.year {
        params = params.year(year);
    }

    let response = client
        .search_movies(&params)
        .await
        .context("TMDB search/movie request failed")?;

    print_movie_list(&response);
    Ok(())
}

/// Runs the `tmdb details` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_tmdb_details(args: &DetailsArgs) -> Result<()> {
    let client = build_tmdb_client()?;

    let details = client
        .movie_details(args.id, &args.language)
        .await
        .context("TMDB movie details request failed")?;

    tracing::info!("ID: {}", details.id);
    tracing::info!("Title: {}", details.title);
    tracing::info!("Original Title: {}", details.original_title);
    tracing::info!(
        "Release Date: {}",
        details.release_date.as_deref().unwrap_or("-")
    );
    tracing::info!(
        "Runtime: {}",
        details
            .runtime
            .map_or_else(|| String::from("-"), |r| format!("{r} min"))
    );
    tracing::info!("Status: {}", details.status.as_deref().unwrap_or("-"));
    tracing::info!(
        "Genres: {}",
        details
            .genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    tracing::info!("Rating: {:.1} ({} votes)", details.vote_average, details.vote_count);
    tracing::info!("Budget: {}", details.budget);
    tracing::info!("Revenue: {}", details.revenue);
    tracing::info!(
        "Tagline: {}",
        details.tagline.as_deref().unwrap_or("-")
    );
    tracing::info!(
        "Homepage: {}",
        details.homepage.as_deref().unwrap_or("-")
    );
    tracing::info!("IMDB: {}", details.imdb_id.as_deref().unwrap_or("-"));

    Ok(())
}

/// Runs the `completions` subcommand.
fn run_completions(args: &CompletionsArgs) {
    let mut command = Cli::command();
    clap_complete::generate(args.shell, &mut command, "cinedeck", &mut io::stdout());
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    match cli.command {
        Commands::Browse => run_browse(cli.dir.as_ref()),
        Commands::Tmdb(tmdb) => match tmdb.command {
            TmdbSubcommands::Trending(args) => run_tmdb_trending(&args).await,
            TmdbSubcommands::Popular(args) => run_tmdb_popular(&args).await,
            TmdbSubcommands::TopRated(args) => run_tmdb_top_rated(&args).await,
            TmdbSubcommands::Genres(args) => run_tmdb_genres(&args).await,
            TmdbSubcommands::Discover(args) => run_tmdb_discover(&args).await,
            TmdbSubcommands::Search(args) => run_tmdb_search(&args).await,
            TmdbSubcommands::Details(args) => run_tmdb_details(&args).await,
        },
        Commands::Completions(args) => {
            run_completions(&args);
            Ok(())
        }
    }
}
