//! moviex - movie catalog browser and favorites CLI.

/// Application configuration (TOML).
mod config;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{API_URL_ENV, AppConfig};
use moviex_api::catalog::{
    Actor, CatalogClient, Director, FilmographyEntry, LocalCatalogApi, MovieDetail, MovieSummary,
    MAX_PAGE_SIZE, PageRequest, PaginationMeta,
};
use moviex_core::{
    EntityHydrator, FavoriteSet, FavoritesStore, FetchResult, FilterState,
    PaginatedFetchController,
};
use moviex_db::{SqliteKvStore, StorageLayout};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Browse movies.
    Movies(MoviesCommand),
    /// Browse actors.
    Actors(PeopleCommand),
    /// Browse directors.
    Directors(PeopleCommand),
    /// Browse genres.
    Genres(GenresCommand),
    /// Manage favorite movies.
    Favorites(FavoritesCommand),
}

/// Arguments for the `movies` subcommand.
#[derive(clap::Args)]
struct MoviesCommand {
    /// Movies subcommand to run.
    #[command(subcommand)]
    command: MoviesSubcommands,
}

/// Available movies subcommands.
#[derive(Subcommand)]
enum MoviesSubcommands {
    /// List movies matching the given filters.
    List(MoviesListArgs),
    /// Show one movie with director, cast and genres.
    Show(IdArgs),
}

/// Arguments for the `movies list` subcommand.
#[derive(clap::Args)]
struct MoviesListArgs {
    /// Page number (1-based).
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// Items per page, 1-100 (default: `pagination.page_size` from config).
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_PAGE_SIZE)))]
    page_size: Option<u32>,
    /// Genre name (e.g. "Drama").
    #[arg(long)]
    genre: Option<String>,
    /// Director name.
    #[arg(long)]
    director: Option<String>,
    /// Actor name.
    #[arg(long)]
    actor: Option<String>,
    /// Release year.
    #[arg(long)]
    year: Option<i32>,
    /// Title search text.
    #[arg(long)]
    search: Option<String>,
    /// Minimum rating (0-10).
    #[arg(long)]
    min_rating: Option<f64>,
    /// Maximum rating (0-10).
    #[arg(long)]
    max_rating: Option<f64>,
}

/// Arguments addressing a single entity.
#[derive(clap::Args)]
struct IdArgs {
    /// Entity ID.
    #[arg(long, required = true)]
    id: u64,
}

/// Arguments for the `actors` / `directors` subcommands.
#[derive(clap::Args)]
struct PeopleCommand {
    /// People subcommand to run.
    #[command(subcommand)]
    command: PeopleSubcommands,
}

/// Available actor/director subcommands.
#[derive(Subcommand)]
enum PeopleSubcommands {
    /// List one page.
    List(PeopleListArgs),
    /// Show one person.
    Show(ShowArgs),
}

/// Arguments for `actors list` / `directors list`.
#[derive(clap::Args)]
struct PeopleListArgs {
    /// Page number (1-based).
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// Items per page, 1-100 (default: `pagination.page_size` from config).
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_PAGE_SIZE)))]
    page_size: Option<u32>,
    /// Include each person's movies.
    #[arg(long)]
    include_movies: bool,
}

/// Arguments for the `show` subcommands that can expand movies.
#[derive(clap::Args)]
struct ShowArgs {
    /// Entity ID.
    #[arg(long, required = true)]
    id: u64,
    /// Include the related movies.
    #[arg(long)]
    include_movies: bool,
}

/// Arguments for the `genres` subcommand.
#[derive(clap::Args)]
struct GenresCommand {
    /// Genres subcommand to run.
    #[command(subcommand)]
    command: GenresSubcommands,
}

/// Available genres subcommands.
#[derive(Subcommand)]
enum GenresSubcommands {
    /// List all genres.
    List(GenresListArgs),
    /// Show one genre.
    Show(ShowArgs),
}

/// Arguments for `genres list`.
#[derive(clap::Args)]
struct GenresListArgs {
    /// Include each genre's movies.
    #[arg(long)]
    include_movies: bool,
}

/// Arguments for the `favorites` subcommand.
#[derive(clap::Args)]
struct FavoritesCommand {
    /// Favorites subcommand to run.
    #[command(subcommand)]
    command: FavoritesSubcommands,
}

/// Available favorites subcommands.
#[derive(Subcommand)]
enum FavoritesSubcommands {
    /// Add a movie to favorites.
    Add(IdArgs),
    /// Remove a movie from favorites.
    Remove(IdArgs),
    /// Add the movie if absent, remove it otherwise.
    Toggle(IdArgs),
    /// List favorite movie IDs.
    List,
    /// Remove all favorites.
    Clear,
    /// Fetch and show every favorite movie.
    Show,
}

/// Loads `config.toml` from the layout's config directory.
fn load_config(layout: &StorageLayout) -> Result<AppConfig> {
    AppConfig::load_from(layout).context("failed to load config")
}

/// Builds the catalog client from config, honoring `MOVIEX_API_URL`.
///
/// # Errors
///
/// Returns an error if the base URL is invalid or the client fails to build.
#[instrument(skip_all)]
fn build_catalog_client(config: &AppConfig) -> Result<CatalogClient> {
    let env_url = std::env::var(API_URL_ENV).ok();
    let base_url = config.base_url(env_url.as_deref())?;

    CatalogClient::builder()
        .base_url(base_url)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .timeout(Duration::from_secs(config.api.timeout_secs))
        .build()
        .context("failed to build catalog client")
}

/// Opens the favorites store in the data directory.
fn open_favorites(layout: &StorageLayout) -> Result<FavoritesStore<SqliteKvStore>> {
    let store = SqliteKvStore::open(layout).context("failed to open favorites database")?;
    Ok(FavoritesStore::new(store))
}

/// Formats an optional value, `-` when absent.
fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| String::from("-"), |v| v.to_string())
}

fn log_pagination(meta: Option<&PaginationMeta>, count: usize, noun: &str) {
    match meta {
        Some(m) => tracing::info!(
            "Page {}/{} ({} {noun} total)",
            m.page,
            m.total_pages,
            m.total_items
        ),
        None => tracing::info!("Total: {count} {noun}"),
    }
}

fn log_movie_rows(movies: &[MovieSummary]) {
    tracing::info!("ID\tYear\tRating\tTitle\t\t\tDirector\tGenres");
    for m in movies {
        tracing::info!(
            "{}\t{}\t{}\t{}\t\t{}\t{}",
            m.id,
            m.release_year,
            m.rating,
            m.title,
            m.director.as_ref().map_or("-", |d| d.name.as_str()),
            m.genres.join(", "),
        );
    }
}

fn log_filmography(movies: Option<&[FilmographyEntry]>) {
    let Some(movies) = movies else {
        return;
    };
    tracing::info!("Movies ({}):", movies.len());
    for m in movies {
        tracing::info!("  {:>5}  {}  {}  {}", m.id, m.release_year, m.rating, m.title);
    }
}

fn log_movie_detail(movie: &MovieDetail) {
    tracing::info!("{} ({})", movie.title, movie.release_year);
    tracing::info!("ID:        {}", movie.id);
    tracing::info!("Rating:    {}", movie.rating);
    tracing::info!("Duration:  {}", or_dash(movie.duration_minutes.map(|d| format!("{d} min"))));
    tracing::info!(
        "Director:  {}",
        movie.director.as_ref().map_or("-", |d| d.name.as_str())
    );
    let genres: Vec<&str> = movie.genres.iter().map(|g| g.name.as_str()).collect();
    tracing::info!("Genres:    {}", genres.join(", "));
    let actors: Vec<&str> = movie.actors.iter().map(|a| a.name.as_str()).collect();
    tracing::info!("Cast:      {}", actors.join(", "));
    if let Some(description) = &movie.description {
        tracing::info!("{description}");
    }
}

/// Runs the `movies list` subcommand.
///
/// # Errors
///
/// Returns an error if the filters are invalid or the fetch fails.
#[instrument(skip_all)]
async fn run_movies_list(args: &MoviesListArgs, layout: &StorageLayout) -> Result<()> {
    let config = load_config(layout)?;

    let filters = FilterState::new()
        .with_page_size(args.page_size.unwrap_or(config.pagination.page_size))
        .with_genre(args.genre.as_deref())
        .with_director(args.director.as_deref())
        .with_actor(args.actor.as_deref())
        .with_year(args.year)
        .with_search(args.search.as_deref())
        .with_min_rating(args.min_rating)
        .with_max_rating(args.max_rating)
        .with_page(args.page);

    let client = build_catalog_client(&config)?;
    let controller = PaginatedFetchController::new(Arc::new(client));
    controller.apply(filters).await.context("invalid filters")?;

    match controller.result() {
        Some(FetchResult::Success { data, meta }) => {
            if data.is_empty() {
                tracing::info!("No movies match the given filters.");
                return Ok(());
            }
            log_movie_rows(&data);
            log_pagination(meta.as_ref(), data.len(), "movies");
            Ok(())
        }
        Some(FetchResult::Error { message, .. }) => bail!("failed to fetch movies: {message}"),
        Some(FetchResult::Loading) | None => bail!("movie list fetch did not complete"),
    }
}

/// Runs the `movies show` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_movies_show(args: &IdArgs, layout: &StorageLayout) -> Result<()> {
    let client = build_catalog_client(&load_config(layout)?)?;
    let movie = client
        .get_movie(args.id)
        .await
        .with_context(|| format!("failed to fetch movie {}", args.id))?;
    log_movie_detail(&movie);
    Ok(())
}

fn page_request(args: &PeopleListArgs, config: &AppConfig) -> PageRequest {
    PageRequest::new(
        args.page,
        args.page_size.unwrap_or(config.pagination.page_size),
    )
    .include_movies(args.include_movies)
}

fn log_actor(actor: &Actor) {
    tracing::info!("{} (ID {})", actor.name, actor.id);
    tracing::info!("Born:        {}", or_dash(actor.birth_date));
    tracing::info!("Nationality: {}", actor.nationality.as_deref().unwrap_or("-"));
    if let Some(genres) = &actor.genres {
        tracing::info!("Genres:      {}", genres.join(", "));
    }
    if let Some(bio) = &actor.bio {
        tracing::info!("{bio}");
    }
    log_filmography(actor.movies.as_deref());
}

fn log_director(director: &Director) {
    tracing::info!("{} (ID {})", director.name, director.id);
    tracing::info!("Born:        {}", or_dash(director.birth_date));
    tracing::info!(
        "Nationality: {}",
        director.nationality.as_deref().unwrap_or("-")
    );
    if let Some(bio) = &director.bio {
        tracing::info!("{bio}");
    }
    log_filmography(director.movies.as_deref());
}

/// Runs the `actors` subcommands.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_actors(command: &PeopleSubcommands, layout: &StorageLayout) -> Result<()> {
    let config = load_config(layout)?;
    let client = build_catalog_client(&config)?;

    match command {
        PeopleSubcommands::List(args) => {
            let page = client
                .list_actors(&page_request(args, &config))
                .await
                .context("failed to fetch actors")?;
            tracing::info!("ID\tMovies\tNationality\tName");
            for a in &page.items {
                tracing::info!(
                    "{}\t{}\t{}\t{}",
                    a.id,
                    or_dash(a.movie_count),
                    a.nationality.as_deref().unwrap_or("-"),
                    a.name,
                );
            }
            log_pagination(page.meta.as_ref(), page.items.len(), "actors");
        }
        PeopleSubcommands::Show(args) => {
            let actor = client
                .get_actor(args.id, args.include_movies)
                .await
                .with_context(|| format!("failed to fetch actor {}", args.id))?;
            log_actor(&actor);
        }
    }
    Ok(())
}

/// Runs the `directors` subcommands.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_directors(command: &PeopleSubcommands, layout: &StorageLayout) -> Result<()> {
    let config = load_config(layout)?;
    let client = build_catalog_client(&config)?;

    match command {
        PeopleSubcommands::List(args) => {
            let page = client
                .list_directors(&page_request(args, &config))
                .await
                .context("failed to fetch directors")?;
            tracing::info!("ID\tMovies\tNationality\tName");
            for d in &page.items {
                tracing::info!(
                    "{}\t{}\t{}\t{}",
                    d.id,
                    or_dash(d.movie_count),
                    d.nationality.as_deref().unwrap_or("-"),
                    d.name,
                );
            }
            log_pagination(page.meta.as_ref(), page.items.len(), "directors");
        }
        PeopleSubcommands::Show(args) => {
            let director = client
                .get_director(args.id, args.include_movies)
                .await
                .with_context(|| format!("failed to fetch director {}", args.id))?;
            log_director(&director);
        }
    }
    Ok(())
}

/// Runs the `genres` subcommands.
///
/// # Errors
///
/// Returns an error if the client fails to build or the request fails.
#[instrument(skip_all)]
async fn run_genres(command: &GenresSubcommands, layout: &StorageLayout) -> Result<()> {
    let client = build_catalog_client(&load_config(layout)?)?;

    match command {
        GenresSubcommands::List(args) => {
            let genres = client
                .list_genres(args.include_movies)
                .await
                .context("failed to fetch genres")?;
            tracing::info!("ID\tMovies\tName\t\tDescription");
            for g in &genres {
                tracing::info!(
                    "{}\t{}\t{}\t\t{}",
                    g.id,
                    or_dash(g.movies.as_ref().map(Vec::len)),
                    g.name,
                    g.description.as_deref().unwrap_or("-"),
                );
            }
            tracing::info!("Total: {} genres", genres.len());
        }
        GenresSubcommands::Show(args) => {
            let genre = client
                .get_genre(args.id, args.include_movies)
                .await
                .with_context(|| format!("failed to fetch genre {}", args.id))?;
            tracing::info!("{} (ID {})", genre.name, genre.id);
            if let Some(description) = &genre.description {
                tracing::info!("{description}");
            }
            if let Some(movies) = &genre.movies {
                log_movie_rows(movies);
                tracing::info!("Total: {} movies", movies.len());
            }
        }
    }
    Ok(())
}

fn log_favorites(set: &FavoriteSet) {
    if set.is_empty() {
        tracing::info!("No favorites yet.");
        return;
    }
    let ids: Vec<String> = set.iter().map(|id| id.to_string()).collect();
    tracing::info!("Favorites ({}): {}", set.len(), ids.join(", "));
}

/// Reports a membership change using the set the store actually holds.
///
/// # Errors
///
/// Returns an error if the durable set does not reflect the requested change.
fn report_membership(id: u64, want_member: bool, set: &FavoriteSet) -> Result<()> {
    let is_member = set.contains(id);
    if is_member != want_member {
        log_favorites(set);
        if want_member {
            bail!("failed to add movie {id} to favorites");
        }
        bail!("failed to remove movie {id} from favorites");
    }

    if is_member {
        tracing::info!("Added movie {id} to favorites.");
    } else {
        tracing::info!("Removed movie {id} from favorites.");
    }
    log_favorites(set);
    Ok(())
}

/// Runs the `favorites` subcommands.
///
/// # Errors
///
/// Returns an error if the database cannot be opened, or (for `show`) the
/// client fails to build or any movie fails to load.
#[instrument(skip_all)]
async fn run_favorites(command: &FavoritesSubcommands, layout: &StorageLayout) -> Result<()> {
    let favorites = open_favorites(layout)?;

    match command {
        FavoritesSubcommands::Add(args) => {
            let set = favorites.add(args.id);
            report_membership(args.id, true, &set)?;
        }
        FavoritesSubcommands::Remove(args) => {
            let set = favorites.remove(args.id);
            report_membership(args.id, false, &set)?;
        }
        FavoritesSubcommands::Toggle(args) => {
            let want_member = !favorites.is_member(args.id);
            let set = favorites.toggle(args.id);
            report_membership(args.id, want_member, &set)?;
        }
        FavoritesSubcommands::List => log_favorites(&favorites.load()),
        FavoritesSubcommands::Clear => {
            let set = favorites.clear();
            if !set.is_empty() {
                log_favorites(&set);
                bail!("failed to clear favorites");
            }
            tracing::info!("Cleared all favorites.");
        }
        FavoritesSubcommands::Show => {
            let set = favorites.load();
            if set.is_empty() {
                tracing::info!("No favorites yet.");
                return Ok(());
            }
            let client = build_catalog_client(&load_config(layout)?)?;
            let hydrator = EntityHydrator::new(Arc::new(client));
            let movies = hydrator
                .hydrate_favorites(&set)
                .await
                .context("failed to load favorite movies")?;
            for movie in &movies {
                log_movie_detail(movie);
            }
            tracing::info!("Total: {} favorites", movies.len());
        }
    }
    Ok(())
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
    let layout =
        StorageLayout::resolve(cli.dir.as_deref()).context("failed to resolve storage directories")?;
    let layout = &layout;
    match cli.command {
        Commands::Movies(cmd) => match cmd.command {
            MoviesSubcommands::List(args) => run_movies_list(&args, layout).await,
            MoviesSubcommands::Show(args) => run_movies_show(&args, layout).await,
        },
        Commands::Actors(cmd) => run_actors(&cmd.command, layout).await,
        Commands::Directors(cmd) => run_directors(&cmd.command, layout).await,
        Commands::Genres(cmd) => run_genres(&cmd.command, layout).await,
        Commands::Favorites(cmd) => run_favorites(&cmd.command, layout).await,
    }
}
