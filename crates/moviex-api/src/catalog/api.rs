//! `CatalogApi` trait definition.
#![allow(clippy::future_not_send)]

use super::error::ApiError;
use super::params::{PageRequest, QueryParams};
use super::types::{Actor, Director, Genre, MovieDetail, MovieSummary, Page};

/// Movie catalog API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(CatalogApi: Send)]
pub trait LocalCatalogApi {
    /// Lists movies matching the given filter parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the response cannot be normalized.
    async fn list_movies(&self, query: &QueryParams) -> Result<Page<MovieSummary>, ApiError>;

    /// Fetches a single movie with director, cast, and genres expanded.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if no movie has this ID, or another
    /// error if the request or decoding fails.
    async fn get_movie(&self, id: u64) -> Result<MovieDetail, ApiError>;

    /// Lists actors.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the response cannot be normalized.
    async fn list_actors(&self, request: &PageRequest) -> Result<Page<Actor>, ApiError>;

    /// Fetches a single actor, optionally with filmography.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if no actor has this ID, or another
    /// error if the request or decoding fails.
    async fn get_actor(&self, id: u64, include_movies: bool) -> Result<Actor, ApiError>;

    /// Lists directors.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the response cannot be normalized.
    async fn list_directors(&self, request: &PageRequest) -> Result<Page<Director>, ApiError>;

    /// Fetches a single director, optionally with filmography.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if no director has this ID, or another
    /// error if the request or decoding fails.
    async fn get_director(&self, id: u64, include_movies: bool) -> Result<Director, ApiError>;

    /// Lists all genres (unpaginated).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the response cannot be normalized.
    async fn list_genres(&self, include_movies: bool) -> Result<Vec<Genre>, ApiError>;

    /// Fetches a single genre, optionally with its movies.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if no genre has this ID, or another
    /// error if the request or decoding fails.
    async fn get_genre(&self, id: u64, include_movies: bool) -> Result<Genre, ApiError>;
}
