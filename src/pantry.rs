//! Pantry staples
//!
//! Staples are ingredients the household always has, like salt or oil. They
//! are not tracked in the inventory, so the matcher adds them to it on every
//! run. They never expire.
//!
//! The list is persisted by someone else. The [`PantryRegistry`] reads and
//! writes through a [`StapleStore`] and falls back to the configured defaults
//! when nothing has been stored yet.
//!
//! ```
//! # use cookable::pantry::PantryRegistry;
//! let pantry = PantryRegistry::default();
//! assert!(pantry.staples().iter().any(|s| s == "salt"));
//!
//! pantry.set_staples(vec!["Salz".to_string(), "Öl".to_string()])?;
//! assert_eq!(pantry.staples(), vec!["Salz", "Öl"]);
//! # Ok::<(), cookable::pantry::StoreError>(())
//! ```

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::text::{contains_either, normalize};

/// Staples used when the store is empty
pub const DEFAULT_STAPLES: &[&str] = &[
    "salt",
    "pepper",
    "oil",
    "flour",
    "sugar",
    "butter",
    "vinegar",
    "water",
    "baking soda",
    "milk",
];

/// Durable storage for the staple list
///
/// Implemented by the application on top of whatever key-value storage it
/// has. `load` returns [`None`] when no list was ever saved.
pub trait StapleStore: Send + Sync {
    /// The stored list, [`None`] if nothing was ever saved
    ///
    /// An empty list is a valid saved list and is returned as `Some`.
    fn load(&self) -> Result<Option<Vec<String>>, StoreError>;

    /// Replace the stored list with `staples`
    fn save(&self, staples: &[String]) -> Result<(), StoreError>;
}

/// Error from a [`StapleStore`]
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("staple store is unavailable: {0}")]
    Unavailable(String),
    #[error("stored staple list is corrupt: {0}")]
    Corrupt(String),
}

/// In memory [`StapleStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    value: RwLock<Option<Vec<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with an already saved list
    pub fn with_staples(staples: Vec<String>) -> Self {
        Self {
            value: RwLock::new(Some(staples)),
        }
    }
}

impl StapleStore for MemoryStore {
    fn load(&self) -> Result<Option<Vec<String>>, StoreError> {
        let value = self
            .value
            .read()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(value.clone())
    }

    fn save(&self, staples: &[String]) -> Result<(), StoreError> {
        let mut value = self
            .value
            .write()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        *value = Some(staples.to_vec());
        Ok(())
    }
}

/// An entry of the inventory synthesized from a staple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PantryItem {
    pub name: String,
    pub is_pantry_staple: bool,
}

impl PantryItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_pantry_staple: true,
        }
    }
}

/// Read/write-through access to the staple list
pub struct PantryRegistry {
    store: Arc<dyn StapleStore>,
    defaults: Vec<String>,
}

impl std::fmt::Debug for PantryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PantryRegistry")
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl Default for PantryRegistry {
    fn default() -> Self {
        Self::new(
            Arc::new(MemoryStore::new()),
            DEFAULT_STAPLES.iter().map(|s| s.to_string()).collect(),
        )
    }
}

impl PantryRegistry {
    /// Creates a new registry
    ///
    /// `defaults` is returned by [`Self::staples`] until a list is stored.
    pub fn new(store: Arc<dyn StapleStore>, defaults: Vec<String>) -> Self {
        Self { store, defaults }
    }

    /// Current staple list
    ///
    /// If the store fails, the error is logged and the defaults are
    /// returned. Matching must not break because of the storage.
    pub fn staples(&self) -> Vec<String> {
        match self.store.load() {
            Ok(Some(stored)) => stored,
            Ok(None) => self.defaults.clone(),
            Err(err) => {
                tracing::warn!("Could not load pantry staples, using defaults: {err}");
                self.defaults.clone()
            }
        }
    }

    /// Replace the staple list
    ///
    /// Names are trimmed, blank names removed and duplicates (by
    /// [`normalize`]d name) removed keeping the first one.
    pub fn set_staples(&self, names: Vec<String>) -> Result<(), StoreError> {
        let mut seen = Vec::with_capacity(names.len());
        let mut clean = Vec::with_capacity(names.len());
        for name in names {
            let name = name.trim();
            let key = normalize(name);
            if key.is_empty() || seen.contains(&key) {
                continue;
            }
            seen.push(key);
            clean.push(name.to_string());
        }
        self.store.save(&clean)
    }

    /// The defaults of this registry
    pub fn defaults(&self) -> &[String] {
        &self.defaults
    }

    /// Current staples as inventory entries
    pub fn pantry_items(&self) -> Vec<PantryItem> {
        self.staples().into_iter().map(PantryItem::new).collect()
    }

    /// Check if an ingredient is covered by a staple
    ///
    /// Same rule as the matcher: the normalized names must contain one
    /// another.
    pub fn is_staple(&self, ingredient_name: &str) -> bool {
        let name = normalize(ingredient_name);
        self.staples()
            .iter()
            .any(|s| contains_either(&normalize(s), &name))
    }
}
