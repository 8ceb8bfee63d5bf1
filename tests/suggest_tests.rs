use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use cookable::{
    categorize::categorize,
    config::{CategoryConfig, DietaryConfig, EngineConfig},
    dietary::Substitution,
    CanonicalRecipe, DietaryProfile, DietarySafetyEngine, Ingredient, InventoryItem, Kitchen,
    MatchResult, MemoryStore, Quantity, RawRecipe, SafetyStatus, Schema,
};
use indoc::indoc;
use serde_json::json;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn recipe(names: &[&str]) -> CanonicalRecipe {
    CanonicalRecipe::new(
        "Test",
        names
            .iter()
            .map(|n| Ingredient::new(*n, Quantity::default()))
            .collect(),
        Schema::Canonical,
    )
}

fn result(title: &str, score: f64) -> MatchResult {
    MatchResult {
        recipe: CanonicalRecipe::new(title, vec![], Schema::Canonical),
        score,
        available_count: 0,
        total_required: 0,
        missing_ingredient_names: vec![],
        uses_expiring_ingredient: false,
        expiring_ingredient_names: vec![],
    }
}

#[test]
fn safety_empty_profile() {
    let engine = DietarySafetyEngine::default();
    let verdict = engine.check_safety(&recipe(&["Milk", "Peanuts"]), &DietaryProfile::new(Vec::<String>::new()));
    assert_eq!(verdict.status, SafetyStatus::Safe);
    assert!(verdict.substitutions.is_empty());
}

#[test]
fn safety_milk_is_adapted() {
    let mut config = DietaryConfig::default();
    config.substitutions.clear();
    config
        .substitutions
        .insert("Milk".into(), vec!["Sour Cream".into(), "Coconut Milk".into()]);
    let engine = DietarySafetyEngine::new(&config);

    let verdict = engine.check_safety(&recipe(&["Milk"]), &DietaryProfile::new(["Milk"]));
    assert_eq!(verdict.status, SafetyStatus::Adapted);
    assert_eq!(
        verdict.substitutions,
        vec![Substitution {
            ingredient_name: "Milk".into(),
            quantity: Quantity::default(),
            alternatives: vec!["Sour Cream".into(), "Coconut Milk".into()],
        }]
    );
}

#[test]
fn safety_ricotta_is_a_warning() {
    let engine = DietarySafetyEngine::default();
    let verdict = engine.check_safety(&recipe(&["Ricotta"]), &DietaryProfile::new(["Ricotta"]));
    assert_eq!(verdict.status, SafetyStatus::Warning);
    assert_eq!(verdict.substitutions.len(), 1);
    assert_eq!(verdict.substitutions[0].ingredient_name, "Ricotta");
    assert!(verdict.substitutions[0].alternatives.is_empty());
}

#[test]
fn safety_hard_cheese_is_allowed() {
    let engine = DietarySafetyEngine::default();
    let verdict = engine.check_safety(&recipe(&["Hard Cheese"]), &DietaryProfile::new(["Cheese"]));
    assert_eq!(verdict.status, SafetyStatus::Safe);
    assert!(verdict.substitutions.is_empty());
}

#[test]
fn ideas_cap_keeps_order() {
    let results: Vec<_> = (0..10).map(|i| result(&format!("idea {i}"), 40.0)).collect();
    let c = categorize(results, &CategoryConfig::default());
    assert!(c.ready_now.is_empty());
    assert!(c.almost_ready.is_empty());
    let titles: Vec<_> = c.ideas.iter().map(|r| r.recipe.title.as_str()).collect();
    assert_eq!(titles, vec!["idea 0", "idea 1", "idea 2", "idea 3", "idea 4"]);
}

#[test]
fn partition_is_complete() {
    let scores = [100.0, 99.0, 70.0, 69.9, 50.0, 10.0, 0.0, 100.0, 75.0];
    let results: Vec<_> = scores
        .iter()
        .enumerate()
        .map(|(i, s)| result(&i.to_string(), *s))
        .collect();
    let c = categorize(results, &CategoryConfig::default());

    let mut seen: Vec<usize> = c
        .iter()
        .map(|(_, r)| r.recipe.title.parse().unwrap())
        .collect();
    seen.sort();
    let expected: Vec<usize> = (0..scores.len()).filter(|i| scores[*i] > 0.0).collect();
    assert_eq!(seen, expected);
    assert!(c.ready_now.iter().all(|r| r.score == 100.0));
    assert!(c.almost_ready.iter().all(|r| (70.0..100.0).contains(&r.score)));
}

fn fixtures() -> (Vec<RawRecipe>, Vec<InventoryItem>) {
    let recipes = serde_json::from_value(json!([
        {
            "id": "1",
            "title": "Scrambled eggs",
            "ingredients": [
                {"name": "Eggs", "quantity": "3"},
                {"name": "Butter", "quantity": "1 tbsp"},
                {"name": "Chives", "optional": true}
            ]
        },
        {
            "id": 2,
            "name": "Milchreis",
            "zutaten": [
                {"name": "Milch", "menge": "1 l"},
                {"name": "Reis", "menge": "125 g"},
                {"name": "Zimt", "menge": "1 TL"},
                {"name": "Zucker", "menge": "2 EL"}
            ]
        },
        {
            "title": "Spinach frittata",
            "ingredients": [
                {"name": "Eggs", "quantity": "6"},
                {"name": "Spinach", "quantity": "200 g"},
                {"name": "Feta", "quantity": "100 g"},
                {"name": "Onion", "quantity": "1"},
                {"name": "Salt"}
            ]
        },
        {
            "title": "Broken record",
            "ingredients": "eggs, milk"
        }
    ]))
    .unwrap();
    let inventory = vec![
        InventoryItem::new("eggs"),
        InventoryItem::expiring("baby spinach", today() + Duration::days(2)),
        InventoryItem::new("Milch"),
        InventoryItem::new("Reis"),
        InventoryItem::new("Zimt"),
    ];
    (recipes, inventory)
}

#[test]
fn suggest_end_to_end() {
    let kitchen = Kitchen::default();
    let (recipes, inventory) = fixtures();
    let (suggestions, warnings) = kitchen
        .suggest(&recipes, &inventory, &DietaryProfile::new(["milch"]), today())
        .into_tuple();

    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].index, 3);

    let titles = |b: &[cookable::Suggestion]| -> Vec<String> {
        b.iter().map(|s| s.result.recipe.title.clone()).collect()
    };
    assert_eq!(titles(&suggestions.ready_now), vec!["Scrambled eggs"]);
    // 3 out of 4, Zucker is missing ("sugar" staple is a different word)
    assert_eq!(titles(&suggestions.almost_ready), vec!["Milchreis"]);
    // 3 out of 5, with an expiring ingredient
    assert_eq!(titles(&suggestions.ideas), vec!["Spinach frittata"]);
    assert!(suggestions.ideas[0].result.uses_expiring_ingredient);

    assert!(suggestions.ready_now[0].safety.is_safe());
    let milchreis = &suggestions.almost_ready[0].safety;
    assert_eq!(milchreis.status, SafetyStatus::Adapted);
    assert_eq!(
        milchreis.substitutions[0].alternatives,
        vec!["hafermilch", "mandelmilch"]
    );

    let shopping: Vec<_> = suggestions.shopping.names().collect();
    assert_eq!(shopping, vec!["Zucker"]);
}

#[test]
fn malformed_records_are_reported() {
    let recipes: Vec<RawRecipe> = serde_json::from_value(json!([
        42,
        {
            "title": "Boiled eggs",
            "timeMinutes": "18446744073709551615s",
            "ingredients": ["Eggs"]
        },
        "not a recipe",
        {"name": "Brot", "zeit": "100000000h", "zutaten": [{"name": "Mehl"}]}
    ]))
    .unwrap();
    let inventory = [InventoryItem::new("eggs")];
    let (suggestions, warnings) = Kitchen::default()
        .suggest(&recipes, &inventory, &DietaryProfile::default(), today())
        .into_tuple();

    let skipped: Vec<_> = warnings.iter().map(|w| w.index).collect();
    assert_eq!(skipped, vec![0, 2]);
    assert_eq!(suggestions.ready_now.len(), 1);
    let eggs = &suggestions.ready_now[0].result.recipe;
    assert_eq!(eggs.title, "Boiled eggs");
    assert_eq!(eggs.time_minutes, None);
}

#[test]
fn stored_staples_are_used() {
    let store = Arc::new(MemoryStore::new());
    let kitchen = Kitchen::new(EngineConfig::default(), store).unwrap();
    kitchen
        .pantry()
        .set_staples(vec!["Zucker".into(), "zucker ".into(), "".into()])
        .unwrap();
    assert_eq!(kitchen.pantry().staples(), vec!["Zucker"]);

    let (recipes, inventory) = fixtures();
    let suggestions = kitchen
        .suggest(&recipes, &inventory, &DietaryProfile::default(), today())
        .into_output();
    let ready: Vec<_> = suggestions
        .ready_now
        .iter()
        .map(|s| s.result.recipe.title.as_str())
        .collect();
    // butter is no longer a staple, sugar now is
    assert_eq!(ready, vec!["Milchreis"]);
    assert!(suggestions.shopping.is_empty());
}

#[cfg(feature = "config_file")]
#[test]
fn kitchen_from_toml() {
    let config = indoc! {r#"
        [pantry]
        staples = ["salt", "butter", "onion"]

        [matching]
        expiry_window_days = 1

        [categories]
        almost_ready_threshold = 60

        [dietary]
        excluded_alternatives = ["mandel"]
    "#};
    let kitchen = Kitchen::from_toml(config, Arc::new(MemoryStore::new())).unwrap();
    assert_eq!(kitchen.config().matching.expiry_window_days, 1);

    let (recipes, inventory) = fixtures();
    let suggestions = kitchen
        .suggest(&recipes, &inventory, &DietaryProfile::new(["Milch"]), today())
        .into_output();

    // onion is a staple now, 4 out of 5
    let frittata = &suggestions.almost_ready[0].result;
    assert_eq!(frittata.recipe.title, "Spinach frittata");
    assert_eq!(frittata.missing_ingredient_names, vec!["Feta"]);
    // the spinach expires in 2 days, outside of the window
    assert!(!frittata.uses_expiring_ingredient);

    let milchreis = suggestions
        .almost_ready
        .iter()
        .find(|s| s.result.recipe.title == "Milchreis")
        .unwrap();
    assert_eq!(
        milchreis.safety.substitutions[0].alternatives,
        vec!["hafermilch"]
    );
}

#[test]
fn suggestions_serialize() {
    let kitchen = Kitchen::default();
    let (recipes, inventory) = fixtures();
    let suggestions = kitchen
        .suggest(&recipes, &inventory, &DietaryProfile::default(), today())
        .into_output();
    let value = serde_json::to_value(&suggestions).unwrap();
    assert_eq!(value["readyNow"][0]["safety"]["status"], json!("safe"));
    assert_eq!(value["almostReady"][0]["result"]["score"], json!(75.0));
    assert_eq!(value["shopping"]["zucker"]["recipes"], json!(["Milchreis"]));
}
