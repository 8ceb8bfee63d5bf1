//! Support for recipe scaling

use thiserror::Error;

use crate::model::CanonicalRecipe;

/// Possible errors during scaling process
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScaleError {
    #[error("recipe has no base servings to scale from")]
    UnknownBaseServings,

    #[error("invalid target servings: {target}")]
    InvalidTarget { target: u32 },
}

impl CanonicalRecipe {
    /// Scale a recipe by a factor
    ///
    /// Every numeric amount is multiplied. Quantities without amount, like
    /// `"to taste"`, are kept as they are. The base servings are not changed.
    pub fn scale(&self, factor: f64) -> CanonicalRecipe {
        let mut scaled = self.clone();
        for ingredient in &mut scaled.ingredients {
            ingredient.quantity = ingredient.quantity.scaled(factor);
        }
        scaled
    }

    /// Scale the recipe to a number of servings
    ///
    /// - `target` is the wanted number of servings.
    ///
    /// The result has `target` as its base servings.
    pub fn scale_to_servings(&self, target: u32) -> Result<CanonicalRecipe, ScaleError> {
        if target == 0 {
            return Err(ScaleError::InvalidTarget { target });
        }
        let base = match self.base_servings {
            Some(base) if base > 0 => base,
            _ => return Err(ScaleError::UnknownBaseServings),
        };

        let mut scaled = self.scale(f64::from(target) / f64::from(base));
        scaled.base_servings = Some(target);
        Ok(scaled)
    }
}
