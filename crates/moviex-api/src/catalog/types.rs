//! Catalog API response types.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Rating the server assigns to movies created without one.
pub const DEFAULT_RATING: f64 = 0.0;

/// Deserializes a `null` rating as [`DEFAULT_RATING`].
///
/// The rating column is nullable and an update may store an explicit null,
/// so one unrated movie must not fail a whole page.
fn deserialize_null_rating<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(DEFAULT_RATING))
}

// --- Pagination ---

/// Pagination metadata returned alongside list responses.
///
/// Computed by the server; treated as read-only truth for rendering page controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    /// Current page (1-based).
    pub page: u32,
    /// Items per page.
    pub page_size: u32,
    /// Total items across all pages.
    pub total_items: u64,
    /// Total number of pages.
    pub total_pages: u32,
    /// Whether a next page exists.
    pub has_next: bool,
    /// Whether a previous page exists.
    pub has_prev: bool,
}

/// One normalized page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Pagination metadata (absent for unpaginated lists).
    pub meta: Option<PaginationMeta>,
}

impl<T> Page<T> {
    /// Creates a page without pagination metadata.
    #[must_use]
    pub const fn unpaginated(items: Vec<T>) -> Self {
        Self { items, meta: None }
    }
}

// --- References ---

/// Compact reference to a person (actor or director).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRef {
    /// Person ID.
    pub id: u64,
    /// Display name.
    pub name: String,
}

/// Compact reference to a genre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreRef {
    /// Genre ID.
    pub id: u64,
    /// Genre name.
    pub name: String,
}

// --- Movies ---

/// Movie as returned by `GET movies` (list view).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    /// Movie ID.
    pub id: u64,
    /// Title.
    pub title: String,
    /// Release year.
    pub release_year: i32,
    /// Rating (0-10); `null` or missing reads as [`DEFAULT_RATING`].
    #[serde(default, deserialize_with = "deserialize_null_rating")]
    pub rating: f64,
    /// Poster image URL.
    #[serde(default)]
    pub poster_url: Option<String>,
    /// Director, if assigned.
    #[serde(default)]
    pub director: Option<PersonRef>,
    /// Genre names.
    #[serde(default)]
    pub genres: Vec<String>,
}

/// Movie as returned by `GET movies/{id}` (detail view).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    /// Movie ID.
    pub id: u64,
    /// Title.
    pub title: String,
    /// Plot synopsis.
    #[serde(default)]
    pub description: Option<String>,
    /// Release year.
    pub release_year: i32,
    /// Running time in minutes.
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    /// Rating (0-10); `null` or missing reads as [`DEFAULT_RATING`].
    #[serde(default, deserialize_with = "deserialize_null_rating")]
    pub rating: f64,
    /// Poster image URL.
    #[serde(default)]
    pub poster_url: Option<String>,
    /// Director, if assigned.
    #[serde(default)]
    pub director: Option<PersonRef>,
    /// Cast.
    #[serde(default)]
    pub actors: Vec<PersonRef>,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<GenreRef>,
}

/// Movie entry embedded in actor/director responses (`include_movies=true`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmographyEntry {
    /// Movie ID.
    pub id: u64,
    /// Title.
    pub title: String,
    /// Release year.
    pub release_year: i32,
    /// Rating (0-10); `null` or missing reads as [`DEFAULT_RATING`].
    #[serde(default, deserialize_with = "deserialize_null_rating")]
    pub rating: f64,
    /// Poster image URL (director detail only).
    #[serde(default)]
    pub poster_url: Option<String>,
    /// Genre names (director detail only).
    #[serde(default)]
    pub genres: Vec<String>,
}

// --- People ---

/// Actor record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Actor ID.
    pub id: u64,
    /// Full name.
    pub name: String,
    /// Biography.
    #[serde(default)]
    pub bio: Option<String>,
    /// Date of birth.
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    /// Nationality.
    #[serde(default)]
    pub nationality: Option<String>,
    /// Filmography (only with `include_movies=true`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movies: Option<Vec<FilmographyEntry>>,
    /// Number of movies (only with `include_movies=true`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie_count: Option<u32>,
    /// Genres worked in, sorted (only with `include_movies=true`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
}

/// Director record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Director {
    /// Director ID.
    pub id: u64,
    /// Full name.
    pub name: String,
    /// Biography.
    #[serde(default)]
    pub bio: Option<String>,
    /// Date of birth.
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    /// Nationality.
    #[serde(default)]
    pub nationality: Option<String>,
    /// Filmography (only with `include_movies=true`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movies: Option<Vec<FilmographyEntry>>,
    /// Number of movies (only with `include_movies=true`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie_count: Option<u32>,
}

// --- Genres ---

/// Genre record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    /// Genre ID.
    pub id: u64,
    /// Genre name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Movies in this genre (only with `include_movies=true`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movies: Option<Vec<MovieSummary>>,
}
