//! Conversion of raw records into [`CanonicalRecipe`]s
//!
//! Two schemas live side by side in the recipe store. The current one has an
//! `ingredients` list of objects with an `optional` flag. The legacy one has a
//! `zutaten` list of `{name, menge}` where every ingredient is required. Both
//! can appear in the same batch.
//!
//! ```
//! # use cookable::{adapter::adapt, RawRecipe};
//! let raw: RawRecipe = serde_json::from_str(r#"{
//!     "name": "Pfannkuchen",
//!     "portionen": 2,
//!     "zutaten": [{"name": "Mehl", "menge": "200 g"}, {"name": "Eier", "menge": "2"}]
//! }"#).unwrap();
//!
//! let recipe = adapt(&raw).unwrap();
//! assert_eq!(recipe.title, "Pfannkuchen");
//! assert_eq!(recipe.required_names, vec!["Mehl", "Eier"]);
//! assert_eq!(recipe.ingredients[0].quantity.amount, Some(200.0));
//! ```

use thiserror::Error;

use crate::{
    error::{PassResult, Warning},
    model::{
        CanonicalRecipe, Ingredient, LegacyIngredient, Lenient, RawIngredient, RawRecipe, Schema,
    },
    quantity::Quantity,
};

/// Why a record could not be adapted
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdaptError {
    #[error("record has neither an 'ingredients' nor a 'zutaten' list")]
    MissingIngredients,
}

/// Adapt a raw record, [`None`] if it has no ingredient list
///
/// Never panics. Callers must filter the [`None`]s before matching, or use
/// [`adapt_all`].
pub fn adapt(raw: &RawRecipe) -> Option<CanonicalRecipe> {
    match try_adapt(raw) {
        Ok(recipe) => Some(recipe),
        Err(err) => {
            tracing::warn!(id = ?raw.id.as_ref().and_then(Lenient::as_valid), "{err}");
            None
        }
    }
}

/// Same as [`adapt`] but with the reason of the failure
pub fn try_adapt(raw: &RawRecipe) -> Result<CanonicalRecipe, AdaptError> {
    let (ingredients, schema) = if let Some(list) = valid(&raw.ingredients) {
        (canonical_ingredients(list), Schema::Canonical)
    } else if let Some(list) = valid(&raw.zutaten) {
        (legacy_ingredients(list), Schema::Legacy)
    } else {
        return Err(AdaptError::MissingIngredients);
    };

    let text = |current: &Option<Lenient<String>>, legacy: &Option<Lenient<String>>| {
        valid(current)
            .or_else(|| valid(legacy))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    let mut recipe = CanonicalRecipe::new(
        text(&raw.title, &raw.name).unwrap_or_default(),
        ingredients,
        schema,
    );
    recipe.id = valid(&raw.id).map(|id| id.to_string());
    recipe.meal_time = text(&raw.meal_time, &raw.mahlzeit);
    recipe.category = text(&raw.category, &raw.kategorie);
    recipe.cuisine = text(&raw.cuisine, &None);
    recipe.time_minutes = valid(&raw.time_minutes)
        .and_then(|t| t.minutes())
        .or_else(|| valid(&raw.zeit).and_then(|t| t.minutes()));
    recipe.base_servings = valid(&raw.base_servings)
        .or_else(|| valid(&raw.portionen))
        .copied();
    Ok(recipe)
}

/// Adapt a batch, skipping the records that can't be adapted
///
/// The skipped records are reported as warnings with their index.
pub fn adapt_all(raws: &[RawRecipe]) -> PassResult<Vec<CanonicalRecipe>> {
    let mut recipes = Vec::with_capacity(raws.len());
    let mut warnings = Vec::new();
    for (index, raw) in raws.iter().enumerate() {
        match try_adapt(raw) {
            Ok(recipe) => recipes.push(recipe),
            Err(source) => {
                tracing::warn!(index, "{source}");
                warnings.push(Warning { index, source });
            }
        }
    }
    PassResult::new(recipes, warnings)
}

fn valid<T>(field: &Option<Lenient<T>>) -> Option<&T> {
    field.as_ref().and_then(Lenient::as_valid)
}

fn clean_name(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        tracing::warn!("Skipping ingredient with empty name");
        None
    } else {
        Some(name.to_string())
    }
}

fn canonical_ingredients(list: &[Lenient<RawIngredient>]) -> Vec<Ingredient> {
    list.iter()
        .filter_map(|entry| {
            let Some(entry) = entry.as_valid() else {
                tracing::warn!("Skipping malformed ingredient entry");
                return None;
            };
            match entry {
                RawIngredient::Name(name) => {
                    clean_name(name).map(|n| Ingredient::new(n, Quantity::default()))
                }
                RawIngredient::Full {
                    name,
                    quantity,
                    optional,
                } => {
                    let name = clean_name(name)?;
                    let quantity = valid(quantity)
                        .map(|q| q.to_quantity())
                        .unwrap_or_default();
                    let mut ingredient = Ingredient::new(name, quantity);
                    ingredient.optional = valid(optional).copied().unwrap_or(false);
                    Some(ingredient)
                }
            }
        })
        .collect()
}

fn legacy_ingredients(list: &[Lenient<LegacyIngredient>]) -> Vec<Ingredient> {
    list.iter()
        .filter_map(|entry| {
            let Some(LegacyIngredient { name, menge }) = entry.as_valid() else {
                tracing::warn!("Skipping malformed legacy ingredient entry");
                return None;
            };
            let name = clean_name(name)?;
            let quantity = valid(menge)
                .map(|q| q.to_quantity())
                .unwrap_or_default();
            Some(Ingredient::new(name, quantity))
        })
        .collect()
}
