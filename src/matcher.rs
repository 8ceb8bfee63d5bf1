//! Matching of recipes against the inventory
//!
//! An ingredient is available when its [`normalize`]d name and the normalized
//! name of any inventory item or pantry staple contain one another. So
//! "Olive oil" is covered by an "oil" staple and "Tomatoes" by a "tomato" in
//! the fridge.
//!
//! More than one ingredient may be covered by the same inventory item. There
//! is no one-to-one assignment.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    adapter,
    config::MatchConfig,
    model::{CanonicalRecipe, InventoryItem, RawRecipe},
    pantry::PantryRegistry,
    text::{contains_either, normalize},
};

/// How well a recipe is covered by the inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub recipe: CanonicalRecipe,
    /// `100 * available_count / total_required`
    pub score: f64,
    pub available_count: usize,
    pub total_required: usize,
    /// Required ingredients not found, as written in the recipe
    pub missing_ingredient_names: Vec<String>,
    pub uses_expiring_ingredient: bool,
    /// Ingredients, required or optional, that would use an expiring item
    pub expiring_ingredient_names: Vec<String>,
}

impl MatchResult {
    /// All the required ingredients are available
    pub fn is_complete(&self) -> bool {
        self.missing_ingredient_names.is_empty()
    }
}

/// Inventory and staples prepared for matching
///
/// Names are normalized once here and reused for every recipe.
#[derive(Debug, Clone, Default)]
pub struct EffectiveInventory {
    names: Vec<String>,
    expiring: Vec<String>,
}

impl EffectiveInventory {
    /// Build the effective inventory
    ///
    /// Only the real inventory can be expiring. An item is expiring if it
    /// expires between `today` and `today + window_days`, both included,
    /// counting calendar days.
    pub fn new(
        inventory: &[InventoryItem],
        staples: &[String],
        today: NaiveDate,
        window_days: u32,
    ) -> Self {
        let window = i64::from(window_days);
        let mut names = Vec::with_capacity(inventory.len() + staples.len());
        let mut expiring = Vec::new();

        for item in inventory {
            let name = normalize(&item.name);
            if name.is_empty() {
                continue;
            }
            let expires_soon = item
                .expires_at
                .map(|date| (0..=window).contains(&date.signed_duration_since(today).num_days()))
                .unwrap_or(false);
            if expires_soon {
                expiring.push(name.clone());
            }
            names.push(name);
        }
        names.extend(
            staples
                .iter()
                .map(|s| normalize(s))
                .filter(|s| !s.is_empty()),
        );

        Self { names, expiring }
    }

    /// Normalized names of the inventory, staples last
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Normalized names of the items expiring soon
    pub fn expiring(&self) -> &[String] {
        &self.expiring
    }

    /// Check if an ingredient is available. `ingredient` must be normalized.
    pub fn has(&self, ingredient: &str) -> bool {
        self.names.iter().any(|n| contains_either(n, ingredient))
    }

    /// Check if an ingredient would use an expiring item. `ingredient` must
    /// be normalized.
    pub fn is_expiring(&self, ingredient: &str) -> bool {
        self.expiring.iter().any(|n| contains_either(n, ingredient))
    }

    /// Match a single recipe
    ///
    /// [`None`] if the recipe has no required ingredients, it can't be scored.
    pub fn match_one(&self, recipe: &CanonicalRecipe) -> Option<MatchResult> {
        let total_required = recipe.required_names.len();
        if total_required == 0 {
            return None;
        }

        let mut available_count = 0;
        let mut missing = Vec::new();
        let mut expiring = Vec::new();

        for name in &recipe.required_names {
            let key = normalize(name);
            if self.has(&key) {
                available_count += 1;
                if self.is_expiring(&key) {
                    expiring.push(name.clone());
                }
            } else {
                missing.push(name.clone());
            }
        }

        for name in &recipe.optional_names {
            if self.is_expiring(&normalize(name)) {
                expiring.push(name.clone());
            }
        }

        let score = 100.0 * available_count as f64 / total_required as f64;
        Some(MatchResult {
            recipe: recipe.clone(),
            score,
            available_count,
            total_required,
            missing_ingredient_names: missing,
            uses_expiring_ingredient: !expiring.is_empty(),
            expiring_ingredient_names: expiring,
        })
    }
}

/// Matches recipes against the inventory and the pantry staples
#[derive(Debug, Clone)]
pub struct InventoryMatcher {
    pantry: Arc<PantryRegistry>,
    config: MatchConfig,
}

impl InventoryMatcher {
    pub fn new(pantry: Arc<PantryRegistry>, config: MatchConfig) -> Self {
        Self { pantry, config }
    }

    pub fn pantry(&self) -> &PantryRegistry {
        &self.pantry
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Prepare the inventory for a batch
    ///
    /// The staples are read from the pantry here, once.
    pub fn prepare(&self, inventory: &[InventoryItem], today: NaiveDate) -> EffectiveInventory {
        let staples = self.pantry.staples();
        EffectiveInventory::new(inventory, &staples, today, self.config.expiry_window_days)
    }

    /// Match raw recipes in any schema
    ///
    /// Records that can't be adapted and recipes without required
    /// ingredients are left out. The order of the input is kept.
    #[tracing::instrument(level = "debug", name = "match", skip_all, fields(recipes = recipes.len(), inventory = inventory.len()))]
    pub fn match_recipes(
        &self,
        recipes: &[RawRecipe],
        inventory: &[InventoryItem],
        today: NaiveDate,
    ) -> Vec<MatchResult> {
        let adapted: Vec<CanonicalRecipe> = recipes.iter().filter_map(adapter::adapt).collect();
        self.match_adapted(&adapted, inventory, today)
    }

    /// Same as [`Self::match_recipes`] using the local date as today
    pub fn match_recipes_now(
        &self,
        recipes: &[RawRecipe],
        inventory: &[InventoryItem],
    ) -> Vec<MatchResult> {
        self.match_recipes(recipes, inventory, chrono::Local::now().date_naive())
    }

    /// Match already adapted recipes
    pub fn match_adapted(
        &self,
        recipes: &[CanonicalRecipe],
        inventory: &[InventoryItem],
        today: NaiveDate,
    ) -> Vec<MatchResult> {
        let effective = self.prepare(inventory, today);
        let results: Vec<MatchResult> = recipes
            .iter()
            .filter_map(|r| effective.match_one(r))
            .collect();
        tracing::debug!(
            matched = results.len(),
            dropped = recipes.len() - results.len(),
            expiring = effective.expiring().len(),
            "matching done"
        );
        results
    }
}
