//! Durable favorites set.
//!
//! The set lives under a single key of a [`KeyValueStore`] as a JSON array
//! of movie ids. Every operation reads the stored set, computes the new one
//! and writes it back whole before returning, so concurrent logical
//! operations cannot lose each other's updates and a restart always sees
//! what the last call returned.

use serde::{Deserialize, Serialize};

use crate::store::{KeyValueStore, PersistenceError};

/// Store key holding the favorites array.
pub const FAVORITES_KEY: &str = "favorites";

/// Set of favorite movie ids.
///
/// Keeps insertion order for display; equality ignores order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<u64>", into = "Vec<u64>")]
pub struct FavoriteSet {
    ids: Vec<u64>,
}

impl FavoriteSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self { ids: Vec::new() }
    }

    /// Returns whether `id` is a favorite.
    #[must_use]
    pub fn contains(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    /// Number of favorites.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns whether there are no favorites.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids in insertion order.
    #[must_use]
    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    /// Iterates over ids in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.ids.iter().copied()
    }

    fn with(mut self, id: u64) -> Self {
        if !self.contains(id) {
            self.ids.push(id);
        }
        self
    }

    fn without(mut self, id: u64) -> Self {
        self.ids.retain(|&existing| existing != id);
        self
    }
}

impl PartialEq for FavoriteSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|id| other.contains(id))
    }
}

impl Eq for FavoriteSet {}

impl From<Vec<u64>> for FavoriteSet {
    fn from(ids: Vec<u64>) -> Self {
        ids.into_iter().collect()
    }
}

impl From<FavoriteSet> for Vec<u64> {
    fn from(set: FavoriteSet) -> Self {
        set.ids
    }
}

impl FromIterator<u64> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::with)
    }
}

/// Owner of the durable favorites set.
///
/// All operations are synchronous and idempotent. Persistence problems are
/// never surfaced: unreadable or corrupt data reads as an empty set, and a
/// failed write is logged and answered with the set the store still holds.
#[derive(Debug)]
pub struct FavoritesStore<S> {
    store: S,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    /// Wraps a key-value backend.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Reads the persisted set.
    ///
    /// A missing key is an empty set. Corrupt or unreadable data is logged
    /// at WARN and also yields an empty set.
    pub fn load(&self) -> FavoriteSet {
        let raw = match self.store.get(FAVORITES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return FavoriteSet::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read favorites, treating as empty");
                return FavoriteSet::new();
            }
        };

        match serde_json::from_str::<FavoriteSet>(&raw) {
            Ok(set) => set,
            Err(e) => {
                tracing::warn!(error = %e, "Corrupt favorites data, treating as empty");
                FavoriteSet::new()
            }
        }
    }

    /// Returns whether `id` is a favorite.
    pub fn is_member(&self, id: u64) -> bool {
        self.load().contains(id)
    }

    /// Adds `id`; no-op if already present. Returns the resulting set.
    pub fn add(&self, id: u64) -> FavoriteSet {
        let current = self.load();
        if current.contains(id) {
            return current;
        }
        self.persist(current.with(id))
    }

    /// Removes `id`; no-op if absent. Returns the resulting set.
    pub fn remove(&self, id: u64) -> FavoriteSet {
        let current = self.load();
        if !current.contains(id) {
            return current;
        }
        self.persist(current.without(id))
    }

    /// Removes `id` if present, adds it otherwise. Returns the resulting set.
    pub fn toggle(&self, id: u64) -> FavoriteSet {
        let current = self.load();
        let next = if current.contains(id) {
            current.without(id)
        } else {
            current.with(id)
        };
        self.persist(next)
    }

    /// Removes every favorite by deleting the key.
    pub fn clear(&self) -> FavoriteSet {
        if matches!(self.store.get(FAVORITES_KEY), Ok(None)) {
            return FavoriteSet::new();
        }
        match self.store.remove(FAVORITES_KEY) {
            Ok(()) => FavoriteSet::new(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to clear favorites");
                self.load()
            }
        }
    }

    /// Writes `next`; on failure returns what the store still holds.
    fn persist(&self, next: FavoriteSet) -> FavoriteSet {
        match self.write(&next) {
            Ok(()) => next,
            Err(e) => {
                tracing::error!(error = %e, "Failed to persist favorites");
                self.load()
            }
        }
    }

    fn write(&self, set: &FavoriteSet) -> Result<(), PersistenceError> {
        let encoded = serde_json::to_string(set).map_err(|e| PersistenceError::Write {
            key: String::from(FAVORITES_KEY),
            message: e.to_string(),
        })?;
        self.store.set(FAVORITES_KEY, &encoded)
    }
}
