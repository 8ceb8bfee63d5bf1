//! Engine configuration
//!
//! Every constant the engine uses can be overridden: pantry staples, the
//! expiry lookahead, readiness thresholds, the ideas cap and the dietary
//! tables. [`EngineConfig::default`] has the documented values.
//!
//! The structs implement [`Deserialize`], any serde format works. With the
//! `config_file` feature (enabled by default) there is also
//! [`EngineConfig::from_toml`]:
//!
//! ```toml
//! [pantry]
//! staples = ["salt", "pepper", "olive oil"]
//!
//! [matching]
//! expiry_window_days = 2
//!
//! [categories]
//! almost_ready_threshold = 60
//! ideas_cap = 3
//!
//! [dietary]
//! always_allowed = ["hard cheese"]
//! excluded_alternatives = ["soy"]
//!
//! [dietary.substitutions]
//! milk = ["oat milk", "soy milk"]
//! ```
//!
//! A table given in the file replaces the default one, it is not merged.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pantry::DEFAULT_STAPLES;

/// Complete configuration of the engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub pantry: PantryConfig,
    pub matching: MatchConfig,
    pub categories: CategoryConfig,
    pub dietary: DietaryConfig,
}

/// Pantry staples used when none have been stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PantryConfig {
    pub staples: Vec<String>,
}

impl Default for PantryConfig {
    fn default() -> Self {
        Self {
            staples: DEFAULT_STAPLES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Configuration of [`InventoryMatcher`](crate::matcher::InventoryMatcher)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchConfig {
    /// Items expiring within this many calendar days, today included, are
    /// "expiring soon".
    pub expiry_window_days: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            expiry_window_days: 3,
        }
    }
}

/// Configuration of [`categorize`](crate::categorize::categorize)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CategoryConfig {
    /// Minimum score to be ready now
    pub ready_threshold: f64,
    /// Minimum score to be almost ready
    pub almost_ready_threshold: f64,
    /// Maximum number of ideas
    pub ideas_cap: usize,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            ready_threshold: 100.0,
            almost_ready_threshold: 70.0,
            ideas_cap: 5,
        }
    }
}

/// Tables used by [`DietarySafetyEngine`](crate::dietary::DietarySafetyEngine)
///
/// All the names are free text, they are normalized when the engine is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DietaryConfig {
    /// Restricted ingredient to its alternatives
    pub substitutions: IndexMap<String, Vec<String>>,
    /// Ingredients never flagged, even if their name overlaps a restriction
    pub always_allowed: Vec<String>,
    /// Alternatives never proposed
    pub excluded_alternatives: Vec<String>,
    /// Words that separate ingredient names, like "and" or "or"
    pub connectors: Vec<String>,
}

impl Default for DietaryConfig {
    fn default() -> Self {
        fn list(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        let substitutions = [
            ("milk", &["oat milk", "almond milk", "coconut milk"][..]),
            ("butter", &["margarine", "coconut oil"][..]),
            ("cream", &["coconut cream", "oat cream"][..]),
            ("yogurt", &["coconut yogurt", "soy yogurt"][..]),
            ("cheese", &["nutritional yeast", "vegan cheese"][..]),
            ("egg", &["flax egg", "applesauce"][..]),
            ("eggs", &["flax egg", "applesauce"][..]),
            ("wheat flour", &["rice flour", "buckwheat flour"][..]),
            ("flour", &["gluten-free flour"][..]),
            ("pasta", &["rice noodles", "gluten-free pasta"][..]),
            ("soy sauce", &["coconut aminos"][..]),
            ("peanuts", &["sunflower seeds"][..]),
            ("sugar", &["honey", "maple syrup"][..]),
            ("milch", &["hafermilch", "mandelmilch"][..]),
            ("sahne", &["kokosmilch", "hafersahne"][..]),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), list(v)))
        .collect();

        Self {
            substitutions,
            always_allowed: list(&["hard cheese", "parmesan", "lactose-free milk", "hartkase"]),
            excluded_alternatives: Vec::new(),
            connectors: list(&["and", "or", "with", "und", "oder", "mit"]),
        }
    }
}

/// Error in an [`EngineConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[cfg(feature = "config_file")]
    #[error("error parsing configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

impl EngineConfig {
    /// Parse and [`validate`](Self::validate) a TOML configuration
    ///
    /// Missing sections and keys take their default value.
    #[cfg(feature = "config_file")]
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the thresholds make sense
    pub fn validate(&self) -> Result<(), ConfigError> {
        let CategoryConfig {
            ready_threshold,
            almost_ready_threshold,
            ..
        } = self.categories;
        let invalid = |message: String| Err(ConfigError::Invalid { message });

        if !(0.0..=100.0).contains(&ready_threshold) {
            return invalid(format!(
                "ready_threshold must be between 0 and 100, got {ready_threshold}"
            ));
        }
        if !(almost_ready_threshold > 0.0 && almost_ready_threshold <= ready_threshold) {
            return invalid(format!(
                "almost_ready_threshold must be above 0 and not above ready_threshold ({ready_threshold}), got {almost_ready_threshold}"
            ));
        }
        Ok(())
    }
}
