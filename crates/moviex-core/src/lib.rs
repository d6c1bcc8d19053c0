//! Catalog query and favorites engine for moviex.
//!
//! Turns filter criteria into canonical catalog queries, runs list fetches
//! with last-request-wins ordering, keeps a durable favorites set and
//! resolves favorites into full movie records.

pub mod favorites;
pub mod fetch;
pub mod filter;
pub mod hydrate;
pub mod query;
pub mod store;

#[cfg(test)]
mod testing;

pub use favorites::{FAVORITES_KEY, FavoriteSet, FavoritesStore};
pub use fetch::{FetchPhase, FetchResult, PaginatedFetchController, PendingFetch};
pub use filter::{FilterError, FilterState};
pub use hydrate::EntityHydrator;
pub use query::serialize;
pub use store::{KeyValueStore, MemoryStore, PersistenceError};
