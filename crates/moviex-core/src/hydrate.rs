//! Resolves favorite ids into full movie records.

use std::sync::Arc;

use futures::future::try_join_all;
use moviex_api::catalog::{ApiError, LocalCatalogApi, MovieDetail};
use tracing::instrument;

use crate::favorites::FavoriteSet;
use crate::fetch::FetchResult;

/// Fetches one movie per id, all concurrently, all-or-nothing.
#[derive(Debug)]
pub struct EntityHydrator<A> {
    api: Arc<A>,
}

impl<A: LocalCatalogApi> EntityHydrator<A> {
    /// Creates a hydrator over `api`.
    pub const fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Fetches every id in `ids`, returning records in input order.
    ///
    /// An empty input returns immediately without any request.
    ///
    /// # Errors
    ///
    /// Returns the first [`ApiError`] if any single fetch fails; no partial
    /// list is ever returned.
    #[instrument(skip_all, fields(count = ids.len()))]
    pub async fn hydrate(&self, ids: &[u64]) -> Result<Vec<MovieDetail>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let movies = try_join_all(ids.iter().map(|&id| self.api.get_movie(id))).await?;

        tracing::debug!(count = movies.len(), "Hydrated movies");
        Ok(movies)
    }

    /// Like [`hydrate`](Self::hydrate), with the outcome as a [`FetchResult`].
    pub async fn hydrate_result(&self, ids: &[u64]) -> FetchResult<Vec<MovieDetail>> {
        match self.hydrate(ids).await {
            Ok(movies) => FetchResult::Success {
                data: movies,
                meta: None,
            },
            Err(e) => FetchResult::from_error(&e),
        }
    }

    /// Hydrates every id of `favorites` in insertion order.
    ///
    /// # Errors
    ///
    /// Same as [`hydrate`](Self::hydrate).
    pub async fn hydrate_favorites(
        &self,
        favorites: &FavoriteSet,
    ) -> Result<Vec<MovieDetail>, ApiError> {
        self.hydrate(favorites.ids()).await
    }
}
