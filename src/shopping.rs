//! Shopping list seed from the missing ingredients of match results

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{matcher::MatchResult, quantity::Quantity, text::normalize};

/// A missing ingredient and the recipes that need it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingEntry {
    /// Display name, the first one found
    pub name: String,
    /// Titles of the recipes that need it, in result order
    pub recipes: Vec<String>,
    /// Quantities written in those recipes, empty ones left out
    pub quantities: Vec<Quantity>,
}

/// Missing ingredients grouped by name.
///
/// Names that [`normalize`] to the same text are the same entry, so
/// "Crème fraîche" and "creme fraiche" are only bought once. Because this is a
/// [`BTreeMap`], the entries are sorted by normalized name.
///
/// Writing the list somewhere is up to the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShoppingSeed(BTreeMap<String, ShoppingEntry>);

impl ShoppingSeed {
    /// Empty seed
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from the missing ingredients of some results
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a MatchResult>) -> Self {
        let mut seed = Self::new();
        for result in results {
            seed.add_result(result);
        }
        seed
    }

    /// Add the missing ingredients of a result
    pub fn add_result(&mut self, result: &MatchResult) {
        let title = &result.recipe.title;
        for name in &result.missing_ingredient_names {
            let quantity = result
                .recipe
                .required()
                .find(|i| &i.name == name)
                .map(|i| &i.quantity);
            self.add_ingredient(name, title, quantity);
        }
    }

    /// Add an ingredient to the seed.
    ///
    /// It is merged with the entries with the same normalized name.
    pub fn add_ingredient(&mut self, name: &str, recipe: &str, quantity: Option<&Quantity>) {
        let key = normalize(name);
        if key.is_empty() {
            return;
        }
        let entry = self.0.entry(key).or_insert_with(|| ShoppingEntry {
            name: name.trim().to_string(),
            recipes: Vec::new(),
            quantities: Vec::new(),
        });
        if !entry.recipes.iter().any(|r| r == recipe) {
            entry.recipes.push(recipe.to_string());
        }
        if let Some(q) = quantity.filter(|q| !q.is_empty()) {
            entry.quantities.push(q.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Display names sorted by normalized name
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(|e| e.name.as_str())
    }

    /// Iterate over all entries sorted by normalized name
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ShoppingEntry)> {
        self.0.iter()
    }
}

impl IntoIterator for ShoppingSeed {
    type Item = (String, ShoppingEntry);

    type IntoIter = std::collections::btree_map::IntoIter<String, ShoppingEntry>;

    /// Iterate over all entries sorted by normalized name
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{CanonicalRecipe, Ingredient, Schema},
        quantity::parse,
    };

    fn result(title: &str, missing: &[(&str, &str)]) -> MatchResult {
        let ingredients = missing
            .iter()
            .map(|(n, q)| Ingredient::new(*n, parse(q)))
            .collect();
        MatchResult {
            recipe: CanonicalRecipe::new(title, ingredients, Schema::Canonical),
            score: 50.0,
            available_count: 1,
            total_required: 2,
            missing_ingredient_names: missing.iter().map(|(n, _)| n.to_string()).collect(),
            uses_expiring_ingredient: false,
            expiring_ingredient_names: vec![],
        }
    }

    #[test]
    fn groups_by_normalized_name() {
        let results = [
            result("Tart", &[("Crème fraîche", "200 g"), ("Leeks", "2")]),
            result("Dip", &[("creme fraiche", ""), ("Chives", "1 bunch")]),
        ];
        let seed = ShoppingSeed::from_results(&results);
        assert_eq!(seed.len(), 3);
        assert_eq!(
            seed.names().collect::<Vec<_>>(),
            vec!["Chives", "Crème fraîche", "Leeks"]
        );

        let (_, creme) = seed.iter().nth(1).unwrap();
        assert_eq!(creme.recipes, vec!["Tart", "Dip"]);
        assert_eq!(creme.quantities, vec![Quantity::new(Some(200.0), "g")]);
    }

    #[test]
    fn same_recipe_once() {
        let mut seed = ShoppingSeed::new();
        seed.add_ingredient("Eggs", "Cake", None);
        seed.add_ingredient("eggs", "Cake", Some(&parse("2")));
        seed.add_ingredient("  ", "Cake", None);
        let entries: Vec<_> = seed.into_iter().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "eggs");
        assert_eq!(entries[0].1.recipes, vec!["Cake"]);
        assert_eq!(entries[0].1.quantities.len(), 1);
    }

    #[test]
    fn complete_results_add_nothing() {
        let seed = ShoppingSeed::from_results(&[result("Toast", &[])]);
        assert!(seed.is_empty());
    }
}
