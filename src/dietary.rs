//! Checks recipes against the dietary restrictions of a user
//!
//! Every ingredient name is [`normalize`]d and split in tokens. A token that
//! contains a restriction, or is contained in one, flags the ingredient. Then
//! the alternatives for the restriction are looked up in the substitution
//! table.
//!
//! ```
//! # use cookable::{config::DietaryConfig, dietary::*, model::*, quantity::Quantity};
//! let engine = DietarySafetyEngine::new(&DietaryConfig::default());
//! let recipe = CanonicalRecipe::new(
//!     "Pancakes",
//!     vec![Ingredient::new("Milk", Quantity::new(Some(250.0), "ml"))],
//!     Schema::Canonical,
//! );
//!
//! let verdict = engine.check_safety(&recipe, &DietaryProfile::new(["milk"]));
//! assert_eq!(verdict.status, SafetyStatus::Adapted);
//! assert_eq!(verdict.substitutions[0].alternatives[0], "oat milk");
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    adapter,
    config::DietaryConfig,
    model::{CanonicalRecipe, DietaryProfile, RawRecipe},
    quantity::Quantity,
    text::{contains_either, normalize, tokenize},
};

/// Outcome of a safety check
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SafetyStatus {
    /// Nothing restricted in the recipe
    Safe,
    /// Restricted ingredients, all with alternatives
    Adapted,
    /// At least one restricted ingredient without alternatives
    Warning,
}

/// A flagged ingredient and what could be used instead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Substitution {
    /// Name as written in the recipe
    pub ingredient_name: String,
    /// Quantity of the original ingredient
    pub quantity: Quantity,
    /// May be empty
    pub alternatives: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyVerdict {
    pub status: SafetyStatus,
    /// Short human readable summary
    pub message: String,
    /// One per flagged ingredient, in recipe order
    pub substitutions: Vec<Substitution>,
}

impl SafetyVerdict {
    /// A verdict with nothing flagged
    pub fn safe() -> Self {
        Self {
            status: SafetyStatus::Safe,
            message: "no restricted ingredients".to_string(),
            substitutions: Vec::new(),
        }
    }

    pub fn is_safe(&self) -> bool {
        self.status == SafetyStatus::Safe
    }
}

/// Dietary checks with a fixed set of tables
///
/// All the names in the tables are normalized when the engine is created. The
/// engine is immutable after that and can be shared between threads.
#[derive(Debug, Clone)]
pub struct DietarySafetyEngine {
    substitutions: IndexMap<String, Vec<String>>,
    always_allowed: Vec<String>,
    excluded_alternatives: Vec<String>,
    connectors: Vec<String>,
}

impl Default for DietarySafetyEngine {
    fn default() -> Self {
        Self::new(&DietaryConfig::default())
    }
}

impl DietarySafetyEngine {
    pub fn new(config: &DietaryConfig) -> Self {
        let normalized = |list: &[String]| -> Vec<String> {
            list.iter()
                .map(|s| normalize(s))
                .filter(|s| !s.is_empty())
                .collect()
        };

        let mut substitutions = IndexMap::with_capacity(config.substitutions.len());
        for (restriction, alternatives) in &config.substitutions {
            let key = normalize(restriction);
            if key.is_empty() {
                tracing::warn!("Ignoring substitution entry with empty name");
                continue;
            }
            // the first entry wins when two keys normalize to the same name
            substitutions.entry(key).or_insert_with(|| {
                alternatives
                    .iter()
                    .map(|a| a.trim().to_string())
                    .filter(|a| !a.is_empty())
                    .collect()
            });
        }

        Self {
            substitutions,
            always_allowed: normalized(&config.always_allowed),
            excluded_alternatives: normalized(&config.excluded_alternatives),
            connectors: normalized(&config.connectors),
        }
    }

    /// Check if an ingredient is never flagged
    ///
    /// True when the normalized name contains an entry of the always allowed
    /// list, so "Aged Parmesan" is allowed by "parmesan".
    pub fn is_always_allowed(&self, ingredient: &str) -> bool {
        let name = normalize(ingredient);
        !name.is_empty() && self.always_allowed.iter().any(|a| name.contains(a.as_str()))
    }

    /// Known alternatives for a restriction, without the excluded ones
    ///
    /// [`None`] if the restriction is not in the substitution table.
    pub fn alternatives(&self, restriction: &str) -> Option<Vec<String>> {
        let alternatives = self.substitutions.get(&normalize(restriction))?;
        Some(
            alternatives
                .iter()
                .filter(|alt| !self.is_excluded(alt))
                .cloned()
                .collect(),
        )
    }

    fn is_excluded(&self, alternative: &str) -> bool {
        let name = normalize(alternative);
        self.excluded_alternatives
            .iter()
            .any(|e| name.contains(e.as_str()))
    }

    /// First restriction, in profile order, that flags the ingredient
    fn restriction_for<'r>(&self, ingredient: &str, restrictions: &'r [String]) -> Option<&'r str> {
        let name = normalize(ingredient);
        let tokens = tokenize(&name, self.connectors.as_slice());
        restrictions
            .iter()
            .find(|r| tokens.iter().any(|t| contains_either(t, r)))
            .map(String::as_str)
    }

    /// Check a recipe against a profile
    pub fn check_safety(&self, recipe: &CanonicalRecipe, profile: &DietaryProfile) -> SafetyVerdict {
        let restrictions: Vec<String> = profile
            .restricted_ingredient_names
            .iter()
            .map(|r| normalize(r))
            .filter(|r| !r.is_empty())
            .collect();
        if restrictions.is_empty() {
            return SafetyVerdict::safe();
        }

        let mut substitutions = Vec::new();
        let mut unresolved = Vec::new();

        for ingredient in &recipe.ingredients {
            if self.is_always_allowed(&ingredient.name) {
                continue;
            }
            let Some(restriction) = self.restriction_for(&ingredient.name, &restrictions) else {
                continue;
            };

            let alternatives = self.alternatives(restriction).unwrap_or_default();
            if alternatives.is_empty() {
                unresolved.push(ingredient.name.as_str());
            }
            substitutions.push(Substitution {
                ingredient_name: ingredient.name.clone(),
                quantity: ingredient.quantity.clone(),
                alternatives,
            });
        }

        if substitutions.is_empty() {
            return SafetyVerdict::safe();
        }

        let (status, message) = if unresolved.is_empty() {
            let n = substitutions.len();
            let s = if n == 1 { "" } else { "s" };
            (
                SafetyStatus::Adapted,
                format!("{n} restricted ingredient{s}, alternatives available"),
            )
        } else {
            (
                SafetyStatus::Warning,
                format!("no known alternative for {}", unresolved.join(", ")),
            )
        };
        tracing::debug!(recipe = %recipe.title, %status, flagged = substitutions.len());

        SafetyVerdict {
            status,
            message,
            substitutions,
        }
    }

    /// Check a raw record in any schema
    ///
    /// A record without an ingredient list can't contain anything restricted,
    /// it is [`SafetyStatus::Safe`].
    pub fn check_raw(&self, recipe: &RawRecipe, profile: &DietaryProfile) -> SafetyVerdict {
        match adapter::try_adapt(recipe) {
            Ok(recipe) => self.check_safety(&recipe, profile),
            Err(_) => SafetyVerdict::safe(),
        }
    }
}
