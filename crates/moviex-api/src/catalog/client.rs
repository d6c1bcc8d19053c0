//! `CatalogClient` - movie catalog REST API client implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::api::LocalCatalogApi;
use super::envelope::{extract_error_message, normalize_item, normalize_page};
use super::error::ApiError;
use super::params::{PageRequest, QueryParams};
use super::types::{Actor, Director, Genre, MovieDetail, MovieSummary, Page};

/// Default base URL (local development server, API v1).
const DEFAULT_BASE_URL: &str = "http://localhost:5000/api/v1/";

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Movie catalog API client.
///
/// Issues exactly one HTTP request per call; failed requests are never
/// retried here.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests (must end with `/`).
    base_url: Url,
}

/// Builder for `CatalogClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogClientBuilder {
    base_url: Option<Url>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl CatalogClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            user_agent: None,
            timeout: None,
        }
    }

    /// Overrides the base URL (config, or wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the per-request timeout (default: 30s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// A base URL without a trailing `/` gets one appended so relative
    /// endpoint paths join under it.
    ///
    /// # Errors
    ///
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<CatalogClient> {
        let user_agent = self.user_agent.context("user_agent is required")?;

        let mut base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL).context("invalid default base URL")?,
        };
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .context("failed to build HTTP client")?;

        Ok(CatalogClient {
            http_client,
            base_url,
        })
    }
}

impl CatalogClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> CatalogClientBuilder {
        CatalogClientBuilder::new()
    }

    /// Returns the base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends a GET request and returns the body of a successful response.
    ///
    /// HTTP 404 maps to [`ApiError::NotFound`]; any other non-success status
    /// maps to [`ApiError::Rejected`] carrying the server's message.
    #[instrument(skip_all)]
    async fn get_body(&self, path: &str, query: &QueryParams) -> Result<String, ApiError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| ApiError::Network(format!("failed to join URL path: {path}: {e}")))?;

        let request = self
            .http_client
            .get(url)
            .query(query.as_pairs())
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build request: {path}: {e}")))?;

        tracing::debug!(url = %request.url(), "Catalog API request");

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| ApiError::Network(format!("request failed: {path}: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read response body: {path}: {e}")))?;

        if status == StatusCode::NOT_FOUND {
            let message = extract_error_message(&body).unwrap_or_else(|| format!("{path} not found"));
            return Err(ApiError::NotFound(message));
        }

        if !status.is_success() {
            tracing::debug!(%status, path, "Catalog API error response");
            let message = extract_error_message(&body).unwrap_or(body);
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }

    /// GET + single-entity normalization.
    async fn get_item<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &QueryParams,
    ) -> Result<T, ApiError> {
        let body = self.get_body(path, query).await?;
        normalize_item(&body).map_err(|e| with_path(e, path))
    }

    /// GET + list normalization.
    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &QueryParams,
    ) -> Result<Page<T>, ApiError> {
        let body = self.get_body(path, query).await?;
        normalize_page(&body).map_err(|e| with_path(e, path))
    }
}

/// Prefixes decode errors with the endpoint path.
fn with_path(error: ApiError, path: &str) -> ApiError {
    match error {
        ApiError::Decode(message) => ApiError::Decode(format!("{path}: {message}")),
        other => other,
    }
}

/// Query carrying only the `include_movies` flag (omitted when `false`).
fn include_movies_query(include_movies: bool) -> QueryParams {
    let mut query = QueryParams::new();
    if include_movies {
        query.push("include_movies", "true");
    }
    query
}

impl LocalCatalogApi for CatalogClient {
    #[instrument(skip_all)]
    async fn list_movies(&self, query: &QueryParams) -> Result<Page<MovieSummary>, ApiError> {
        self.get_page("movies", query).await
    }

    #[instrument(skip_all)]
    async fn get_movie(&self, id: u64) -> Result<MovieDetail, ApiError> {
        let path = format!("movies/{id}");
        self.get_item(&path, &QueryParams::new()).await
    }

    #[instrument(skip_all)]
    async fn list_actors(&self, request: &PageRequest) -> Result<Page<Actor>, ApiError> {
        self.get_page("actors", &request.to_query()).await
    }

    #[instrument(skip_all)]
    async fn get_actor(&self, id: u64, include_movies: bool) -> Result<Actor, ApiError> {
        let path = format!("actors/{id}");
        self.get_item(&path, &include_movies_query(include_movies))
            .await
    }

    #[instrument(skip_all)]
    async fn list_directors(&self, request: &PageRequest) -> Result<Page<Director>, ApiError> {
        self.get_page("directors", &request.to_query()).await
    }

    #[instrument(skip_all)]
    async fn get_director(&self, id: u64, include_movies: bool) -> Result<Director, ApiError> {
        let path = format!("directors/{id}");
        self.get_item(&path, &include_movies_query(include_movies))
            .await
    }

    #[instrument(skip_all)]
    async fn list_genres(&self, include_movies: bool) -> Result<Vec<Genre>, ApiError> {
        let page: Page<Genre> = self
            .get_page("genres", &include_movies_query(include_movies))
            .await?;
        Ok(page.items)
    }

    #[instrument(skip_all)]
    async fn get_genre(&self, id: u64, include_movies: bool) -> Result<Genre, ApiError> {
        let path = format!("genres/{id}");
        self.get_item(&path, &include_movies_query(include_movies))
            .await
    }
}
