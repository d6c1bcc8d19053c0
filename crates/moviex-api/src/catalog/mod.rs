//! Movie catalog API client module.
//!
//! Handles HTTP requests to the catalog REST endpoints (`movies`, `actors`,
//! `directors`, `genres`) and normalizes their response envelopes.

mod api;
mod client;
mod envelope;
mod error;
mod params;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{CatalogApi, LocalCatalogApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{CatalogClient, CatalogClientBuilder};
pub use envelope::{normalize_item, normalize_page};
pub use error::{ApiError, ErrorKind};
pub use params::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PageRequest, QueryParams};
pub use types::{
    Actor, DEFAULT_RATING, Director, FilmographyEntry, Genre, GenreRef, MovieDetail, MovieSummary, Page,
    PaginationMeta, PersonRef,
};
