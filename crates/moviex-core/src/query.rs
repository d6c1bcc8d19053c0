//! `FilterState` to catalog query parameters.

use moviex_api::catalog::QueryParams;

use crate::filter::FilterState;

/// Serializes `filters` into the canonical `GET movies` query.
///
/// Keys appear in a fixed order (`page`, `page_size`, `genre`, `director`,
/// `actor`, `year`, `search`, `min_rating`, `max_rating`). Absent criteria
/// produce no key. Numbers use their plain `Display` form, so `7.0` is
/// sent as `7`.
#[must_use]
pub fn serialize(filters: &FilterState) -> QueryParams {
    let mut query = QueryParams::new();
    query.push("page", filters.page().to_string());
    query.push("page_size", filters.page_size().to_string());

    push_text(&mut query, "genre", filters.genre());
    push_text(&mut query, "director", filters.director());
    push_text(&mut query, "actor", filters.actor());
    if let Some(year) = filters.year() {
        query.push("year", year.to_string());
    }
    push_text(&mut query, "search", filters.search());
    if let Some(rating) = filters.min_rating() {
        query.push("min_rating", rating.to_string());
    }
    if let Some(rating) = filters.max_rating() {
        query.push("max_rating", rating.to_string());
    }

    query
}

fn push_text(query: &mut QueryParams, key: &'static str, value: Option<&str>) {
    if let Some(text) = value.filter(|t| !t.is_empty()) {
        query.push(key, text);
    }
}
