//! Recipe suggestions from what is at home.
//!
//! Matches recipes against a household inventory and the pantry staples,
//! scores them, sorts them in readiness buckets and checks them against the
//! dietary restrictions of the user.
//!
//! Also includes:
//! - Lenient reading of recipe records in the current and the legacy schema.
//! - Free text quantity parsing.
//! - Recipe scaling to a number of servings.
//! - A shopping list seed from the missing ingredients.
//!
//! # Basic usage
//! Everything is wired together in a [`Kitchen`]. Build one with
//! [`Kitchen::new`] to choose the [`EngineConfig`] and where the staples are
//! stored, or use [`Kitchen::default`].
//!
//! ```rust
//! # use cookable::{Kitchen, DietaryProfile, InventoryItem, RawRecipe};
//! let kitchen = Kitchen::default();
//!
//! let recipes: Vec<RawRecipe> = serde_json::from_str(r#"[
//!     {"title": "Omelette", "ingredients": [{"name": "Eggs"}, {"name": "Butter"}, {"name": "Chives", "optional": true}]},
//!     {"name": "Rührei", "zutaten": [{"name": "Eier", "menge": "3"}, {"name": "Speck", "menge": "50 g"}]}
//! ]"#)?;
//! let inventory = vec![InventoryItem::new("eggs")];
//! let today = chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
//!
//! let suggestions = kitchen
//!     .suggest(&recipes, &inventory, &DietaryProfile::default(), today)
//!     .into_output();
//! // butter is a default staple
//! assert_eq!(suggestions.ready_now[0].result.recipe.title, "Omelette");
//! assert!(suggestions.ready_now[0].safety.is_safe());
//! # Ok::<(), serde_json::Error>(())
//! ```
//!
//! Every step can also be used by itself: [`adapter::adapt`],
//! [`InventoryMatcher::match_recipes`], [`categorize::categorize`] and
//! [`DietarySafetyEngine::check_safety`]. None of them panic or fail on bad
//! records, they are skipped and logged with [tracing].

#![warn(rustdoc::broken_intra_doc_links, clippy::doc_markdown)]

#[cfg(doc)]
pub mod _features {
    //! This lib has 1 feature, enabled by default:
    //! - `config_file`. Enables [`EngineConfig::from_toml`](crate::config::EngineConfig::from_toml)
    //!   and [`Kitchen::from_toml`](crate::Kitchen::from_toml).
}

pub mod adapter;
pub mod categorize;
pub mod config;
pub mod dietary;
pub mod error;
pub mod matcher;
pub mod model;
pub mod pantry;
pub mod quantity;
pub mod scale;
pub mod shopping;
pub mod text;

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use error::PassResult;

pub use categorize::{Categorized, Readiness};
pub use config::EngineConfig;
pub use dietary::{DietarySafetyEngine, SafetyStatus, SafetyVerdict};
pub use matcher::{InventoryMatcher, MatchResult};
pub use model::*;
pub use pantry::{MemoryStore, PantryRegistry, StapleStore};
pub use quantity::Quantity;
pub use shopping::ShoppingSeed;

/// A match result with its safety verdict
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub result: MatchResult,
    pub safety: SafetyVerdict,
}

/// Output of [`Kitchen::suggest`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestions {
    pub ready_now: Vec<Suggestion>,
    pub almost_ready: Vec<Suggestion>,
    pub ideas: Vec<Suggestion>,
    /// Missing ingredients of the almost ready recipes
    pub shopping: ShoppingSeed,
}

pub type SuggestResult = PassResult<Suggestions>;

/// The whole engine
///
/// Holds the configuration, the pantry, the matcher and the dietary engine.
/// Building the dietary engine normalizes all its tables, so you may want to
/// create only one and reuse it. It is cheap to clone and can be shared
/// between threads.
#[derive(Debug, Clone)]
pub struct Kitchen {
    config: Arc<EngineConfig>,
    matcher: InventoryMatcher,
    dietary: Arc<DietarySafetyEngine>,
}

impl Default for Kitchen {
    /// Default configuration with the staples in memory
    fn default() -> Self {
        Self::build(EngineConfig::default(), Arc::new(MemoryStore::new()))
    }
}

impl Kitchen {
    /// Creates a new kitchen
    ///
    /// Fails if the configuration is not [valid](EngineConfig::validate).
    pub fn new(
        config: EngineConfig,
        store: Arc<dyn StapleStore>,
    ) -> Result<Self, error::ConfigError> {
        config.validate()?;
        Ok(Self::build(config, store))
    }

    /// Creates a new kitchen from a TOML configuration
    #[cfg(feature = "config_file")]
    pub fn from_toml(input: &str, store: Arc<dyn StapleStore>) -> Result<Self, error::ConfigError> {
        let config = EngineConfig::from_toml(input)?;
        Ok(Self::build(config, store))
    }

    fn build(config: EngineConfig, store: Arc<dyn StapleStore>) -> Self {
        let pantry = PantryRegistry::new(store, config.pantry.staples.clone());
        let matcher = InventoryMatcher::new(Arc::new(pantry), config.matching.clone());
        let dietary = DietarySafetyEngine::new(&config.dietary);
        Self {
            config: Arc::new(config),
            matcher,
            dietary: Arc::new(dietary),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the pantry
    pub fn pantry(&self) -> &PantryRegistry {
        self.matcher.pantry()
    }

    /// Get the inner matcher
    pub fn matcher(&self) -> &InventoryMatcher {
        &self.matcher
    }

    /// Get the inner dietary engine
    pub fn dietary(&self) -> &DietarySafetyEngine {
        &self.dietary
    }

    /// Match, categorize and check recipes
    ///
    /// Records that could not be adapted are in the warnings.
    #[tracing::instrument(level = "debug", name = "suggest", skip_all, fields(recipes = recipes.len(), inventory = inventory.len()))]
    pub fn suggest(
        &self,
        recipes: &[RawRecipe],
        inventory: &[InventoryItem],
        profile: &DietaryProfile,
        today: NaiveDate,
    ) -> SuggestResult {
        adapter::adapt_all(recipes)
            .map(|adapted| self.suggest_adapted(&adapted, inventory, profile, today))
    }

    /// Same as [`Self::suggest`] using the local date as today
    pub fn suggest_now(
        &self,
        recipes: &[RawRecipe],
        inventory: &[InventoryItem],
        profile: &DietaryProfile,
    ) -> SuggestResult {
        self.suggest(recipes, inventory, profile, chrono::Local::now().date_naive())
    }

    /// Same as [`Self::suggest`] with already adapted recipes
    pub fn suggest_adapted(
        &self,
        recipes: &[CanonicalRecipe],
        inventory: &[InventoryItem],
        profile: &DietaryProfile,
        today: NaiveDate,
    ) -> Suggestions {
        let results = self.matcher.match_adapted(recipes, inventory, today);
        let Categorized {
            ready_now,
            almost_ready,
            ideas,
        } = categorize::categorize(results, &self.config.categories);

        let shopping = ShoppingSeed::from_results(&almost_ready);
        let check = |bucket: Vec<MatchResult>| -> Vec<Suggestion> {
            bucket
                .into_iter()
                .map(|result| {
                    let safety = self.dietary.check_safety(&result.recipe, profile);
                    Suggestion { result, safety }
                })
                .collect()
        };

        Suggestions {
            ready_now: check(ready_now),
            almost_ready: check(almost_ready),
            ideas: check(ideas),
            shopping,
        }
    }
}
