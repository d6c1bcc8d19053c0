//! Canonical snapshot of the active movie search criteria.

use chrono::{Datelike, Utc};
use moviex_api::catalog::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest search text kept, in characters.
pub const MAX_SEARCH_CHARS: usize = 200;

/// Earliest release year the catalog accepts.
pub const MIN_YEAR: i32 = 1888;

/// How many years past the current one a release year may lie.
const YEAR_LOOKAHEAD: i32 = 5;

/// Lowest accepted rating.
pub const MIN_RATING: f64 = 0.0;

/// Highest accepted rating.
pub const MAX_RATING: f64 = 10.0;

/// Reasons a [`FilterState`] cannot be turned into a query.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FilterError {
    /// Page numbers start at 1.
    #[error("page must be at least 1, got {0}")]
    InvalidPage(u32),

    /// Page size outside `1..=MAX_PAGE_SIZE`.
    #[error("page_size must be between 1 and {max}, got {0}", max = MAX_PAGE_SIZE)]
    InvalidPageSize(u32),

    /// Release year outside the accepted range.
    #[error("year {year} is outside {min}..={max}")]
    YearOutOfRange {
        /// Requested year.
        year: i32,
        /// Lower bound.
        min: i32,
        /// Upper bound.
        max: i32,
    },

    /// Rating that is not a number in `[0, 10]`.
    #[error("{field} must be between 0 and 10, got {value}")]
    RatingOutOfRange {
        /// `min_rating` or `max_rating`.
        field: &'static str,
        /// Offending value.
        value: f64,
    },

    /// `min_rating` greater than `max_rating`.
    #[error("min_rating ({min}) must not exceed max_rating ({max})")]
    RatingRangeInverted {
        /// Lower bound as given.
        min: f64,
        /// Upper bound as given.
        max: f64,
    },

    /// Search text longer than [`MAX_SEARCH_CHARS`].
    #[error("search must be at most {max} characters, got {0}", max = MAX_SEARCH_CHARS)]
    SearchTooLong(usize),
}

/// What the user currently wants to see.
///
/// Values are replaced wholesale: every `with_*` method consumes `self` and
/// returns the edited copy, so two states compare equal exactly when they
/// describe the same query. Changing any criterion other than the page
/// moves back to page 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    page: u32,
    page_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    director: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    actor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_rating: Option<f64>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            genre: None,
            director: None,
            actor: None,
            year: None,
            search: None,
            min_rating: None,
            max_rating: None,
        }
    }
}

impl FilterState {
    /// Creates the default state (page 1, default page size, no criteria).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current page (1-based).
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Items per page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Genre name filter.
    #[must_use]
    pub fn genre(&self) -> Option<&str> {
        self.genre.as_deref()
    }

    /// Director name filter.
    #[must_use]
    pub fn director(&self) -> Option<&str> {
        self.director.as_deref()
    }

    /// Actor name filter.
    #[must_use]
    pub fn actor(&self) -> Option<&str> {
        self.actor.as_deref()
    }

    /// Release year filter.
    #[must_use]
    pub const fn year(&self) -> Option<i32> {
        self.year
    }

    /// Title search text.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Lower rating bound.
    #[must_use]
    pub const fn min_rating(&self) -> Option<f64> {
        self.min_rating
    }

    /// Upper rating bound.
    #[must_use]
    pub const fn max_rating(&self) -> Option<f64> {
        self.max_rating
    }

    /// Moves to `page`, clamped to at least 1. Criteria are kept.
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Moves one page forward.
    #[must_use]
    pub const fn next_page(mut self) -> Self {
        self.page = self.page.saturating_add(1);
        self
    }

    /// Moves one page back, never below page 1.
    #[must_use]
    pub fn prev_page(mut self) -> Self {
        self.page = self.page.saturating_sub(1).max(1);
        self
    }

    /// Sets the page size.
    ///
    /// The value is kept as given; [`validate`](Self::validate) rejects sizes
    /// outside `1..=MAX_PAGE_SIZE` just as the server would.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: u32) -> Self {
        if self.page_size != page_size {
            self.page_size = page_size;
            self.page = 1;
        }
        self
    }

    /// Sets or clears the genre filter. Blank text clears it.
    #[must_use]
    pub fn with_genre(mut self, genre: Option<&str>) -> Self {
        let genre = normalize_text(genre);
        replace_criterion(&mut self.genre, genre, &mut self.page);
        self
    }

    /// Sets or clears the director filter. Blank text clears it.
    #[must_use]
    pub fn with_director(mut self, director: Option<&str>) -> Self {
        let director = normalize_text(director);
        replace_criterion(&mut self.director, director, &mut self.page);
        self
    }

    /// Sets or clears the actor filter. Blank text clears it.
    #[must_use]
    pub fn with_actor(mut self, actor: Option<&str>) -> Self {
        let actor = normalize_text(actor);
        replace_criterion(&mut self.actor, actor, &mut self.page);
        self
    }

    /// Sets or clears the release year filter.
    #[must_use]
    pub fn with_year(mut self, year: Option<i32>) -> Self {
        replace_criterion(&mut self.year, year, &mut self.page);
        self
    }

    /// Sets or clears the search text.
    ///
    /// The text is trimmed and cut to [`MAX_SEARCH_CHARS`] characters;
    /// whitespace-only text clears the filter.
    #[must_use]
    pub fn with_search(mut self, search: Option<&str>) -> Self {
        let search = normalize_text(search).map(|text| {
            if text.chars().count() > MAX_SEARCH_CHARS {
                text.chars().take(MAX_SEARCH_CHARS).collect()
            } else {
                text
            }
        });
        replace_criterion(&mut self.search, search, &mut self.page);
        self
    }

    /// Sets or clears the lower rating bound.
    #[must_use]
    pub fn with_min_rating(mut self, rating: Option<f64>) -> Self {
        replace_criterion(&mut self.min_rating, rating, &mut self.page);
        self
    }

    /// Sets or clears the upper rating bound.
    #[must_use]
    pub fn with_max_rating(mut self, rating: Option<f64>) -> Self {
        replace_criterion(&mut self.max_rating, rating, &mut self.page);
        self
    }

    /// Checks every invariant a query must satisfy.
    ///
    /// # Errors
    ///
    /// Returns the first [`FilterError`] found.
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.page < 1 {
            return Err(FilterError::InvalidPage(self.page));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(FilterError::InvalidPageSize(self.page_size));
        }
        if let Some(year) = self.year {
            let max = max_year();
            if !(MIN_YEAR..=max).contains(&year) {
                return Err(FilterError::YearOutOfRange {
                    year,
                    min: MIN_YEAR,
                    max,
                });
            }
        }
        if let Some(search) = &self.search {
            let len = search.chars().count();
            if len > MAX_SEARCH_CHARS {
                return Err(FilterError::SearchTooLong(len));
            }
        }
        check_rating("min_rating", self.min_rating)?;
        check_rating("max_rating", self.max_rating)?;
        match (self.min_rating, self.max_rating) {
            (Some(min), Some(max)) if min > max => {
                Err(FilterError::RatingRangeInverted { min, max })
            }
            _ => Ok(()),
        }
    }
}

/// Replaces one criterion; an actual change resets the page.
fn replace_criterion<T: PartialEq>(slot: &mut T, value: T, page: &mut u32) {
    if *slot != value {
        *slot = value;
        *page = 1;
    }
}

/// Trims text; blank text becomes absent.
fn normalize_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(String::from)
}

/// Latest accepted release year.
fn max_year() -> i32 {
    Utc::now().year().saturating_add(YEAR_LOOKAHEAD)
}

fn check_rating(field: &'static str, rating: Option<f64>) -> Result<(), FilterError> {
    match rating {
        Some(value) if !value.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&value) => {
            Err(FilterError::RatingOutOfRange { field, value })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_default_state() {
        // Arrange & Act
        let filters = FilterState::new();

        // Assert
        assert_eq!(filters.page(), 1);
        assert_eq!(filters.page_size(), DEFAULT_PAGE_SIZE);
        assert!(filters.genre().is_none());
        assert!(filters.year().is_none());
        assert!(filters.validate().is_ok());
    }

    #[test]
    fn test_criterion_change_resets_page() {
        // Arrange
        let filters = FilterState::new().with_page(4);

        // Act
        let filters = filters.with_genre(Some("Drama"));

        // Assert
        assert_eq!(filters.page(), 1);
        assert_eq!(filters.genre(), Some("Drama"));
    }

    #[test]
    fn test_unchanged_criterion_keeps_page() {
        // Arrange
        let filters = FilterState::new().with_genre(Some("Drama")).with_page(3);

        // Act
        let filters = filters.with_genre(Some("Drama"));

        // Assert
        assert_eq!(filters.page(), 3);
    }

    #[test]
    fn test_page_navigation() {
        // Arrange
        let filters = FilterState::new();

        // Act
        let forward = filters.clone().next_page().next_page();
        let back = forward.clone().prev_page();
        let floor = FilterState::new().prev_page();

        // Assert
        assert_eq!(forward.page(), 3);
        assert_eq!(back.page(), 2);
        assert_eq!(floor.page(), 1);
        assert_eq!(FilterState::new().with_page(0).page(), 1);
    }

    #[test]
    fn test_out_of_range_page_size_is_rejected_not_clamped() {
        // Arrange & Act
        let big = FilterState::new().with_page_size(500);
        let zero = FilterState::new().with_page_size(0);
        let max = FilterState::new().with_page_size(MAX_PAGE_SIZE);

        // Assert
        assert_eq!(big.page_size(), 500);
        assert_eq!(big.validate(), Err(FilterError::InvalidPageSize(500)));
        assert_eq!(zero.validate(), Err(FilterError::InvalidPageSize(0)));
        assert_eq!(max.validate(), Ok(()));
    }

    #[test]
    fn test_blank_text_is_absent() {
        // Arrange & Act
        let filters = FilterState::new()
            .with_genre(Some(""))
            .with_director(Some("   "))
            .with_actor(Some("  Tom Hardy "))
            .with_search(Some("\t\n"));

        // Assert
        assert!(filters.genre().is_none());
        assert!(filters.director().is_none());
        assert_eq!(filters.actor(), Some("Tom Hardy"));
        assert!(filters.search().is_none());
    }

    #[test]
    fn test_search_is_capped() {
        // Arrange
        let long = "あ".repeat(MAX_SEARCH_CHARS + 10);

        // Act
        let filters = FilterState::new().with_search(Some(&long));

        // Assert
        assert_eq!(filters.search().unwrap().chars().count(), MAX_SEARCH_CHARS);
        assert!(filters.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_rating_range() {
        // Arrange
        let filters = FilterState::new()
            .with_min_rating(Some(8.0))
            .with_max_rating(Some(6.5));

        // Act
        let result = filters.validate();

        // Assert
        assert_eq!(
            result.unwrap_err(),
            FilterError::RatingRangeInverted { min: 8.0, max: 6.5 }
        );
    }

    #[test]
    fn test_validate_accepts_equal_rating_bounds() {
        // Arrange
        let filters = FilterState::new()
            .with_min_rating(Some(7.0))
            .with_max_rating(Some(7.0));

        // Act & Assert
        assert!(filters.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_ratings() {
        // Arrange
        let too_high = FilterState::new().with_max_rating(Some(10.5));
        let negative = FilterState::new().with_min_rating(Some(-1.0));
        let nan = FilterState::new().with_min_rating(Some(f64::NAN));

        // Act & Assert
        assert!(matches!(
            too_high.validate(),
            Err(FilterError::RatingOutOfRange {
                field: "max_rating",
                ..
            })
        ));
        assert!(matches!(
            negative.validate(),
            Err(FilterError::RatingOutOfRange {
                field: "min_rating",
                ..
            })
        ));
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_validate_year_bounds() {
        // Arrange
        let next_year = Utc::now().year() + 1;

        // Act & Assert
        assert!(FilterState::new().with_year(Some(1888)).validate().is_ok());
        assert!(
            FilterState::new()
                .with_year(Some(next_year))
                .validate()
                .is_ok()
        );
        assert!(matches!(
            FilterState::new().with_year(Some(1887)).validate(),
            Err(FilterError::YearOutOfRange { year: 1887, .. })
        ));
        assert!(
            FilterState::new()
                .with_year(Some(next_year + 10))
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_validate_catches_deserialized_zero_page() {
        // Arrange
        let filters: FilterState = serde_json::from_str(r#"{"page":0,"page_size":20}"#).unwrap();

        // Act
        let result = filters.validate();

        // Assert
        assert_eq!(result.unwrap_err(), FilterError::InvalidPage(0));
    }

    #[test]
    fn test_serde_skips_absent_fields() {
        // Arrange
        let filters = FilterState::new().with_genre(Some("Drama"));

        // Act
        let json = serde_json::to_string(&filters).unwrap();

        // Assert
        assert_eq!(json, r#"{"page":1,"page_size":20,"genre":"Drama"}"#);
    }

    #[test]
    fn test_structural_equality() {
        // Arrange
        let a = FilterState::new().with_genre(Some("Drama")).with_year(Some(1994));
        let b = FilterState::new().with_year(Some(1994)).with_genre(Some(" Drama "));

        // Act & Assert
        assert_eq!(a, b);
        assert_ne!(a, b.with_page(2));
    }
}
