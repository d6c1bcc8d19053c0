//! Test doubles shared by the unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use moviex_api::catalog::{
    Actor, ApiError, Director, Genre, LocalCatalogApi, MovieDetail, MovieSummary, Page,
    PageRequest, PaginationMeta, PersonRef, QueryParams,
};

/// Builds a movie summary tagged with one genre.
pub fn make_summary(id: u64, genre: &str) -> MovieSummary {
    MovieSummary {
        id,
        title: format!("Movie {id}"),
        release_year: 2000,
        rating: 7.5,
        poster_url: None,
        director: Some(PersonRef {
            id: 1,
            name: String::from("Christopher Nolan"),
        }),
        genres: vec![String::from(genre)],
    }
}

/// Builds a movie detail record.
pub fn make_detail(id: u64) -> MovieDetail {
    MovieDetail {
        id,
        title: format!("Movie {id}"),
        description: None,
        release_year: 2000,
        duration_minutes: Some(120),
        rating: 7.5,
        poster_url: None,
        director: None,
        actors: vec![],
        genres: vec![],
    }
}

/// Scriptable in-memory catalog that records list queries.
#[derive(Default)]
pub struct MockCatalogApi {
    list_items: Option<Vec<MovieSummary>>,
    list_failures: Mutex<Vec<ApiError>>,
    genre_errors: HashMap<String, ApiError>,
    movies: HashMap<u64, MovieDetail>,
    movie_errors: HashMap<u64, ApiError>,
    list_calls: Mutex<Vec<QueryParams>>,
    movie_calls: AtomicU32,
}

impl MockCatalogApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every list request returns `items`.
    pub fn with_list_page(mut self, items: Vec<MovieSummary>) -> Self {
        self.list_items = Some(items);
        self
    }

    /// The next `count` list requests fail with `error`.
    pub fn with_list_failures(self, count: usize, error: ApiError) -> Self {
        *self.list_failures.lock().unwrap() = vec![error; count];
        self
    }

    /// List requests filtered by `genre` fail with `error`.
    pub fn with_list_error_for_genre(mut self, genre: &str, error: ApiError) -> Self {
        self.genre_errors.insert(String::from(genre), error);
        self
    }

    /// Makes `ids` resolvable through `get_movie`.
    pub fn with_movies(mut self, ids: &[u64]) -> Self {
        self.movies
            .extend(ids.iter().map(|&id| (id, make_detail(id))));
        self
    }

    /// `get_movie(id)` fails with `error`.
    pub fn with_movie_error(mut self, id: u64, error: ApiError) -> Self {
        self.movie_errors.insert(id, error);
        self
    }

    /// Queries received by `list_movies`, in order.
    pub fn list_calls(&self) -> Vec<QueryParams> {
        self.list_calls.lock().unwrap().clone()
    }

    /// Number of `get_movie` calls.
    pub fn movie_calls(&self) -> u32 {
        self.movie_calls.load(Ordering::SeqCst)
    }
}

impl LocalCatalogApi for MockCatalogApi {
    async fn list_movies(&self, query: &QueryParams) -> Result<Page<MovieSummary>, ApiError> {
        self.list_calls.lock().unwrap().push(query.clone());

        if let Some(error) = self.list_failures.lock().unwrap().pop() {
            return Err(error);
        }
        let genre = query.get("genre").unwrap_or("Drama");
        if let Some(error) = self.genre_errors.get(genre) {
            return Err(error.clone());
        }

        let items = self
            .list_items
            .clone()
            .unwrap_or_else(|| vec![make_summary(1, genre)]);
        let page = query.get("page").map_or(1, |p| p.parse().unwrap());
        let page_size = query.get("page_size").map_or(20, |p| p.parse().unwrap());
        let meta = PaginationMeta {
            page,
            page_size,
            total_items: u64::try_from(items.len()).unwrap(),
            total_pages: 1,
            has_next: false,
            has_prev: page > 1,
        };
        Ok(Page {
            items,
            meta: Some(meta),
        })
    }

    async fn get_movie(&self, id: u64) -> Result<MovieDetail, ApiError> {
        self.movie_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.movie_errors.get(&id) {
            return Err(error.clone());
        }
        self.movies
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("Movie with ID {id} not found")))
    }

    async fn list_actors(&self, _request: &PageRequest) -> Result<Page<Actor>, ApiError> {
        Ok(Page::unpaginated(vec![]))
    }

    async fn get_actor(&self, id: u64, _include_movies: bool) -> Result<Actor, ApiError> {
        Err(ApiError::NotFound(format!("Actor with ID {id} not found")))
    }

    async fn list_directors(&self, _request: &PageRequest) -> Result<Page<Director>, ApiError> {
        Ok(Page::unpaginated(vec![]))
    }

    async fn get_director(&self, id: u64, _include_movies: bool) -> Result<Director, ApiError> {
        Err(ApiError::NotFound(format!("Director with ID {id} not found")))
    }

    async fn list_genres(&self, _include_movies: bool) -> Result<Vec<Genre>, ApiError> {
        Ok(vec![])
    }

    async fn get_genre(&self, id: u64, _include_movies: bool) -> Result<Genre, ApiError> {
        Err(ApiError::NotFound(format!("Genre with ID {id} not found")))
    }
}
