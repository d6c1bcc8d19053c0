//! Paginated movie list fetching with last-request-wins ordering.
//!
//! Each accepted filter change gets a fresh generation number. A completed
//! request is published only if its generation is still the current one;
//! completions for superseded filters are dropped, so the visible result
//! always belongs to the most recently issued filter regardless of the
//! order in which responses arrive.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use moviex_api::catalog::{
    ApiError, ErrorKind, LocalCatalogApi, MovieSummary, Page, PaginationMeta, QueryParams,
};
use serde::{Deserialize, Serialize};

use crate::filter::{FilterError, FilterState};
use crate::query::serialize;

/// Observable outcome of a fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchResult<T> {
    /// A request is in flight.
    Loading,
    /// The request succeeded.
    Success {
        /// Fetched payload.
        data: T,
        /// Pagination metadata, for list endpoints that report it.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        meta: Option<PaginationMeta>,
    },
    /// The request failed; the caller may retry.
    Error {
        /// Human-readable failure description.
        message: String,
        /// Failure category.
        kind: ErrorKind,
    },
}

impl<T> FetchResult<T> {
    /// Builds the `Error` variant from an API error.
    #[must_use]
    pub fn from_error(error: &ApiError) -> Self {
        Self::Error {
            message: error.to_string(),
            kind: error.kind(),
        }
    }

    /// Returns whether a request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns whether this is an error result.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Payload of a successful result.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Pagination metadata of a successful result.
    #[must_use]
    pub const fn meta(&self) -> Option<&PaginationMeta> {
        match self {
            Self::Success { meta, .. } => meta.as_ref(),
            _ => None,
        }
    }

    /// Failure message of an error result.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { message, .. } => Some(message),
            _ => None,
        }
    }
}

impl<T> From<Result<Page<T>, ApiError>> for FetchResult<Vec<T>> {
    fn from(result: Result<Page<T>, ApiError>) -> Self {
        match result {
            Ok(page) => Self::Success {
                data: page.items,
                meta: page.meta,
            },
            Err(e) => Self::from_error(&e),
        }
    }
}

/// Lifecycle phase of a [`PaginatedFetchController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchPhase {
    /// Nothing requested yet.
    Idle,
    /// A request for the current filters is in flight.
    Loading,
    /// The current filters' request succeeded.
    Success,
    /// The current filters' request failed.
    Error,
}

/// A request issued by the controller and not yet completed.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFetch {
    generation: u64,
    filters: FilterState,
    query: QueryParams,
}

impl PendingFetch {
    /// Generation this request was issued under.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Filters this request was issued for.
    #[must_use]
    pub const fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Query that will be sent.
    #[must_use]
    pub const fn query(&self) -> &QueryParams {
        &self.query
    }
}

#[derive(Debug)]
struct ControllerState {
    filters: Option<FilterState>,
    generation: u64,
    phase: FetchPhase,
    result: Option<FetchResult<Vec<MovieSummary>>>,
}

/// Runs `GET movies` once per accepted filter change.
///
/// Issuing ([`begin`](Self::begin)) is synchronous and immediately moves the
/// controller to `Loading`; the network call happens in
/// [`complete`](Self::complete). Failed requests are never retried
/// automatically, only through [`retry`](Self::retry).
#[derive(Debug)]
pub struct PaginatedFetchController<A> {
    api: Arc<A>,
    state: Mutex<ControllerState>,
}

impl<A: LocalCatalogApi> PaginatedFetchController<A> {
    /// Creates an idle controller.
    pub const fn new(api: Arc<A>) -> Self {
        Self {
            api,
            state: Mutex::new(ControllerState {
                filters: None,
                generation: 0,
                phase: FetchPhase::Idle,
                result: None,
            }),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> FetchPhase {
        self.lock().phase
    }

    /// Published result; `None` while idle.
    pub fn result(&self) -> Option<FetchResult<Vec<MovieSummary>>> {
        self.lock().result.clone()
    }

    /// Filters of the most recently issued request.
    pub fn current_filters(&self) -> Option<FilterState> {
        self.lock().filters.clone()
    }

    /// Generation of the most recently issued request (0 before the first).
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Issues a request for `filters` if they differ from the current ones.
    ///
    /// Returns `Ok(None)` when `filters` equal the current filters; nothing
    /// changes and no request is needed.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] if `filters` are invalid; the controller
    /// state is left untouched.
    pub fn begin(&self, filters: FilterState) -> Result<Option<PendingFetch>, FilterError> {
        filters.validate()?;

        let mut state = self.lock();
        if state.filters.as_ref() == Some(&filters) {
            return Ok(None);
        }
        Ok(Some(Self::issue(&mut state, filters)))
    }

    /// Re-issues the current filters after a failure.
    ///
    /// Returns `None` unless the controller is in the `Error` phase.
    pub fn begin_retry(&self) -> Option<PendingFetch> {
        let mut state = self.lock();
        if state.phase != FetchPhase::Error {
            return None;
        }
        let filters = state.filters.clone()?;
        Some(Self::issue(&mut state, filters))
    }

    /// Performs the network call for `pending` and publishes its outcome if
    /// no newer request was issued meanwhile.
    ///
    /// Returns whether the outcome was published.
    pub async fn complete(&self, pending: PendingFetch) -> bool {
        let outcome = self.api.list_movies(&pending.query).await;
        let result = FetchResult::from(outcome);

        let mut state = self.lock();
        if pending.generation != state.generation {
            tracing::debug!(
                generation = pending.generation,
                current = state.generation,
                "Discarding stale movie list response"
            );
            return false;
        }

        state.phase = match &result {
            FetchResult::Loading => FetchPhase::Loading,
            FetchResult::Success { .. } => FetchPhase::Success,
            FetchResult::Error { message, .. } => {
                tracing::debug!(generation = pending.generation, %message, "Movie list fetch failed");
                FetchPhase::Error
            }
        };
        state.result = Some(result);
        true
    }

    /// Applies `filters` and waits for the resulting fetch.
    ///
    /// Returns whether a fetch was published.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] if `filters` are invalid.
    pub async fn apply(&self, filters: FilterState) -> Result<bool, FilterError> {
        match self.begin(filters)? {
            Some(pending) => Ok(self.complete(pending).await),
            None => Ok(false),
        }
    }

    /// Retries the current filters after a failure and waits for the fetch.
    ///
    /// Returns whether a fetch was published; `false` when not in `Error`.
    pub async fn retry(&self) -> bool {
        match self.begin_retry() {
            Some(pending) => self.complete(pending).await,
            None => false,
        }
    }

    fn issue(state: &mut ControllerState, filters: FilterState) -> PendingFetch {
        state.generation = state.generation.wrapping_add(1);
        state.phase = FetchPhase::Loading;
        state.result = Some(FetchResult::Loading);
        state.filters = Some(filters.clone());

        tracing::debug!(generation = state.generation, "Issuing movie list fetch");

        PendingFetch {
            generation: state.generation,
            query: serialize(&filters),
            filters,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::collections::HashMap;

    use moviex_api::catalog::{Actor, Director, Genre, MovieDetail, PageRequest};
    use tokio::sync::Notify;

    use super::*;
    use crate::testing::{MockCatalogApi, make_summary};

    /// API whose list responses wait until released, keyed by genre.
    struct GatedApi {
        gates: HashMap<&'static str, Arc<Notify>>,
    }

    impl GatedApi {
        fn new(genres: &[&'static str]) -> Self {
            Self {
                gates: genres
                    .iter()
                    .map(|g| (*g, Arc::new(Notify::new())))
                    .collect(),
            }
        }

        fn release(&self, genre: &str) {
            self.gates[genre].notify_one();
        }
    }

    impl LocalCatalogApi for GatedApi {
        async fn list_movies(&self, query: &QueryParams) -> Result<Page<MovieSummary>, ApiError> {
            let genre = query.get("genre").unwrap_or_default().to_owned();
            self.gates[genre.as_str()].notified().await;
            Ok(Page::unpaginated(vec![make_summary(1, &genre)]))
        }

        async fn get_movie(&self, id: u64) -> Result<MovieDetail, ApiError> {
            Err(ApiError::NotFound(format!("movie {id}")))
        }

        async fn list_actors(
            &self,
            _request: &PageRequest,
        ) -> Result<Page<Actor>, ApiError> {
            Ok(Page::unpaginated(vec![]))
        }

        async fn get_actor(
            &self,
            id: u64,
            _include_movies: bool,
        ) -> Result<Actor, ApiError> {
            Err(ApiError::NotFound(format!("actor {id}")))
        }

        async fn list_directors(
            &self,
            _request: &PageRequest,
        ) -> Result<Page<Director>, ApiError> {
            Ok(Page::unpaginated(vec![]))
        }

        async fn get_director(
            &self,
            id: u64,
            _include_movies: bool,
        ) -> Result<Director, ApiError> {
            Err(ApiError::NotFound(format!("director {id}")))
        }

        async fn list_genres(
            &self,
            _include_movies: bool,
        ) -> Result<Vec<Genre>, ApiError> {
            Ok(vec![])
        }

        async fn get_genre(
            &self,
            id: u64,
            _include_movies: bool,
        ) -> Result<Genre, ApiError> {
            Err(ApiError::NotFound(format!("genre {id}")))
        }
    }

    fn drama() -> FilterState {
        FilterState::new().with_genre(Some("Drama"))
    }

    fn comedy() -> FilterState {
        FilterState::new().with_genre(Some("Comedy"))
    }

    #[test]
    fn test_new_controller_is_idle() {
        // Arrange & Act
        let controller = PaginatedFetchController::new(Arc::new(MockCatalogApi::new()));

        // Assert
        assert_eq!(controller.phase(), FetchPhase::Idle);
        assert!(controller.result().is_none());
        assert_eq!(controller.generation(), 0);
    }

    #[test]
    fn test_begin_enters_loading() {
        // Arrange
        let controller = PaginatedFetchController::new(Arc::new(MockCatalogApi::new()));

        // Act
        let pending = controller.begin(drama()).unwrap().unwrap();

        // Assert
        assert_eq!(controller.phase(), FetchPhase::Loading);
        assert_eq!(controller.result(), Some(FetchResult::Loading));
        assert_eq!(pending.generation(), 1);
        assert_eq!(pending.query().get("genre"), Some("Drama"));
        assert_eq!(controller.current_filters(), Some(drama()));
    }

    #[test]
    fn test_begin_rejects_invalid_filters() {
        // Arrange
        let controller = PaginatedFetchController::new(Arc::new(MockCatalogApi::new()));
        let invalid = FilterState::new()
            .with_min_rating(Some(9.0))
            .with_max_rating(Some(2.0));

        // Act
        let result = controller.begin(invalid);

        // Assert
        assert!(result.is_err());
        assert_eq!(controller.phase(), FetchPhase::Idle);
        assert_eq!(controller.generation(), 0);
    }

    #[tokio::test]
    async fn test_apply_publishes_success() {
        // Arrange
        let api = Arc::new(MockCatalogApi::new().with_list_page(vec![
            make_summary(1, "Drama"),
            make_summary(2, "Drama"),
        ]));
        let controller = PaginatedFetchController::new(Arc::clone(&api));

        // Act
        let published = controller.apply(drama()).await.unwrap();

        // Assert
        assert!(published);
        assert_eq!(controller.phase(), FetchPhase::Success);
        let result = controller.result().unwrap();
        assert_eq!(result.data().unwrap().len(), 2);
        assert_eq!(result.meta().unwrap().page, 1);
        assert_eq!(api.list_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_equal_filters_issue_no_request() {
        // Arrange
        let api = Arc::new(MockCatalogApi::new());
        let controller = PaginatedFetchController::new(Arc::clone(&api));
        controller.apply(drama()).await.unwrap();

        // Act
        let second = controller.begin(drama()).unwrap();
        let third = controller.apply(FilterState::new().with_genre(Some(" Drama "))).await;

        // Assert
        assert!(second.is_none());
        assert!(!third.unwrap());
        assert_eq!(api.list_calls().len(), 1);
        assert_eq!(controller.generation(), 1);
    }

    #[tokio::test]
    async fn test_stale_completion_is_discarded() {
        // Arrange
        let api = Arc::new(MockCatalogApi::new());
        let controller = PaginatedFetchController::new(Arc::clone(&api));
        let first = controller.begin(drama()).unwrap().unwrap();
        let second = controller.begin(comedy()).unwrap().unwrap();

        // Act
        let second_published = controller.complete(second).await;
        let first_published = controller.complete(first).await;

        // Assert
        assert!(second_published);
        assert!(!first_published);
        let result = controller.result().unwrap();
        assert_eq!(result.data().unwrap()[0].genres, vec!["Comedy"]);
        assert_eq!(controller.current_filters(), Some(comedy()));
    }

    #[tokio::test]
    async fn test_out_of_order_responses_publish_latest_only() {
        // Arrange
        let api = Arc::new(GatedApi::new(&["Drama", "Comedy"]));
        let controller = PaginatedFetchController::new(Arc::clone(&api));
        let first = controller.begin(drama()).unwrap().unwrap();
        let second = controller.begin(comedy()).unwrap().unwrap();

        // Act: B resolves first, A afterwards
        let (first_published, second_published, ()) = tokio::join!(
            controller.complete(first),
            controller.complete(second),
            async {
                tokio::task::yield_now().await;
                api.release("Comedy");
                tokio::task::yield_now().await;
                api.release("Drama");
            }
        );

        // Assert
        assert!(!first_published);
        assert!(second_published);
        assert_eq!(controller.phase(), FetchPhase::Success);
        let result = controller.result().unwrap();
        assert_eq!(result.data().unwrap()[0].genres, vec!["Comedy"]);
    }

    #[tokio::test]
    async fn test_stale_error_does_not_override_success() {
        // Arrange
        let api = Arc::new(MockCatalogApi::new().with_list_error_for_genre(
            "Drama",
            ApiError::Network(String::from("timed out")),
        ));
        let controller = PaginatedFetchController::new(Arc::clone(&api));
        let first = controller.begin(drama()).unwrap().unwrap();
        let second = controller.begin(comedy()).unwrap().unwrap();

        // Act
        controller.complete(second).await;
        controller.complete(first).await;

        // Assert
        assert_eq!(controller.phase(), FetchPhase::Success);
    }

    #[tokio::test]
    async fn test_error_then_retry_reissues_identical_query() {
        // Arrange
        let api = Arc::new(
            MockCatalogApi::new()
                .with_list_failures(1, ApiError::Network(String::from("connection refused"))),
        );
        let controller = PaginatedFetchController::new(Arc::clone(&api));
        let filters = drama().with_min_rating(Some(7.0));

        // Act
        controller.apply(filters).await.unwrap();
        let phase_after_error = controller.phase();
        let error_result = controller.result().unwrap();
        let retried = controller.retry().await;

        // Assert
        assert_eq!(phase_after_error, FetchPhase::Error);
        assert_eq!(
            error_result,
            FetchResult::Error {
                message: String::from("network error: connection refused"),
                kind: ErrorKind::Network,
            }
        );
        assert!(retried);
        assert_eq!(controller.phase(), FetchPhase::Success);
        let calls = api.list_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], calls[1]);
    }

    #[tokio::test]
    async fn test_retry_outside_error_phase_is_noop() {
        // Arrange
        let api = Arc::new(MockCatalogApi::new());
        let controller = PaginatedFetchController::new(Arc::clone(&api));

        // Act
        let idle_retry = controller.retry().await;
        controller.apply(drama()).await.unwrap();
        let success_retry = controller.retry().await;

        // Assert
        assert!(!idle_retry);
        assert!(!success_retry);
        assert_eq!(api.list_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_retry_uses_current_filters_not_failed_ones() {
        // Arrange
        let api = Arc::new(
            MockCatalogApi::new()
                .with_list_failures(2, ApiError::Network(String::from("offline"))),
        );
        let controller = PaginatedFetchController::new(Arc::clone(&api));
        controller.apply(drama()).await.unwrap();
        controller.apply(comedy()).await.unwrap();

        // Act
        controller.retry().await;

        // Assert
        let calls = api.list_calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[2].get("genre"), Some("Comedy"));
        assert_eq!(controller.phase(), FetchPhase::Success);
    }

    #[test]
    fn test_fetch_result_serializes_tagged() {
        // Arrange
        let loading: FetchResult<Vec<u64>> = FetchResult::Loading;
        let success: FetchResult<Vec<u64>> = FetchResult::Success {
            data: vec![1],
            meta: None,
        };
        let error: FetchResult<Vec<u64>> =
            FetchResult::from_error(&ApiError::NotFound(String::from("gone")));

        // Act
        let loading_json = serde_json::to_value(&loading).unwrap();
        let success_json = serde_json::to_value(&success).unwrap();
        let error_json = serde_json::to_value(&error).unwrap();

        // Assert
        assert_eq!(loading_json, serde_json::json!({"status": "loading"}));
        assert_eq!(
            success_json,
            serde_json::json!({"status": "success", "data": [1]})
        );
        assert_eq!(
            error_json,
            serde_json::json!({"status": "error", "message": "not found: gone", "kind": "not_found"})
        );
    }
}
