//! Recipe, inventory and profile representation

/*

   Raw records come from storage written by different versions of the app.
   Every raw field is wrapped in `Lenient` so a value of the wrong type is
   kept as `Invalid` instead of failing the deserialization of the whole batch.

*/

use chrono::NaiveDate;
use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};

use crate::quantity::{self, Quantity};

/// A field that may hold a value of the wrong type
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Lenient<T> {
    Valid(T),
    Invalid(IgnoredAny),
}

impl<T> Lenient<T> {
    /// The value, if it had the right type
    pub fn valid(self) -> Option<T> {
        match self {
            Lenient::Valid(v) => Some(v),
            Lenient::Invalid(_) => None,
        }
    }

    pub fn as_valid(&self) -> Option<&T> {
        match self {
            Lenient::Valid(v) => Some(v),
            Lenient::Invalid(_) => None,
        }
    }
}

impl<T> From<T> for Lenient<T> {
    fn from(value: T) -> Self {
        Lenient::Valid(value)
    }
}

/// Recipe id, stored as text or as a number
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Text(String),
    Number(i64),
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Text(s) => write!(f, "{s}"),
            RecordId::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Preparation time, stored as minutes or as text like `"1h 30min"`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawMinutes {
    Number(u32),
    Text(String),
}

impl RawMinutes {
    /// Time in minutes, [`None`] if the text is not a time
    pub fn minutes(&self) -> Option<u32> {
        match self {
            RawMinutes::Number(n) => Some(*n),
            RawMinutes::Text(t) => parse_minutes(t),
        }
    }
}

fn parse_minutes(text: &str) -> Option<u32> {
    let text = text.trim();
    // out of range times are treated as unknown
    if let Ok(d) = humantime::parse_duration(text) {
        return u32::try_from(d.as_secs().saturating_add(30) / 60).ok();
    }
    // "30 Minuten", "2 Std", "45"
    let q = quantity::parse(text);
    let amount = q.amount?;
    let unit = crate::text::normalize(&q.unit);
    let factor = if unit.is_empty() || unit.starts_with("min") {
        1.0
    } else if unit.starts_with('h') || unit.starts_with("std") || unit.starts_with("stunde") {
        60.0
    } else {
        return None;
    };
    let minutes = (amount * factor).round();
    (0.0..=f64::from(u32::MAX))
        .contains(&minutes)
        .then_some(minutes as u32)
}

/// Quantity as stored in a raw record
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawQuantity {
    /// Free text, parsed with [`quantity::parse`]
    Text(String),
    /// Just a number, no unit
    Number(f64),
    /// Already split
    Split {
        amount: Option<f64>,
        #[serde(default)]
        unit: Option<String>,
    },
}

impl RawQuantity {
    pub fn to_quantity(&self) -> Quantity {
        match self {
            RawQuantity::Text(t) => quantity::parse(t),
            RawQuantity::Number(n) => Quantity::new(Some(*n), ""),
            RawQuantity::Split { amount, unit } => {
                Quantity::new(*amount, unit.as_deref().unwrap_or_default().trim())
            }
        }
    }
}

/// Ingredient entry of the current schema
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawIngredient {
    /// Only the name
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        quantity: Option<Lenient<RawQuantity>>,
        #[serde(default)]
        optional: Option<Lenient<bool>>,
    },
}

/// Ingredient entry of the legacy schema (`zutaten`)
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyIngredient {
    pub name: String,
    #[serde(default)]
    pub menge: Option<Lenient<RawQuantity>>,
}

/// A recipe record as stored, in either schema
///
/// The current schema uses `title`, `mealTime`, `category`, `cuisine`,
/// `timeMinutes`, `baseServings` and `ingredients`. The legacy one uses
/// `name`, `mahlzeit`, `kategorie`, `zeit`, `portionen` and `zutaten`.
/// See [`adapt`](crate::adapter::adapt).
///
/// A record that is not an object, like `42` or `"text"`, deserializes to an
/// empty record, which [`adapt`](crate::adapter::adapt) rejects. So a batch
/// of records always deserializes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct RawRecipe {
    pub id: Option<Lenient<RecordId>>,
    pub title: Option<Lenient<String>>,
    pub meal_time: Option<Lenient<String>>,
    pub category: Option<Lenient<String>>,
    pub cuisine: Option<Lenient<String>>,
    pub time_minutes: Option<Lenient<RawMinutes>>,
    pub base_servings: Option<Lenient<u32>>,
    pub ingredients: Option<Lenient<Vec<Lenient<RawIngredient>>>>,

    // legacy schema
    pub name: Option<Lenient<String>>,
    pub mahlzeit: Option<Lenient<String>>,
    pub kategorie: Option<Lenient<String>>,
    pub zeit: Option<Lenient<RawMinutes>>,
    pub portionen: Option<Lenient<u32>>,
    pub zutaten: Option<Lenient<Vec<Lenient<LegacyIngredient>>>>,
}

impl<'de> Deserialize<'de> for RawRecipe {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Record {
            #[serde(deserialize_with = "RawRecipe::deserialize")]
            Object(RawRecipe),
            Other(IgnoredAny),
        }

        match Record::deserialize(deserializer)? {
            Record::Object(recipe) => Ok(recipe),
            Record::Other(_) => Ok(RawRecipe::default()),
        }
    }
}

/// Which schema a recipe was adapted from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Schema {
    Canonical,
    Legacy,
}

/// A recipe ingredient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    /// Name, as written in the recipe
    pub name: String,
    pub quantity: Quantity,
    /// Optional ingredients are not needed to cook the recipe
    pub optional: bool,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, quantity: Quantity) -> Self {
        Self {
            name: name.into(),
            quantity,
            optional: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// A recipe in the current schema
///
/// Created with [`adapt`](crate::adapter::adapt).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRecipe {
    pub id: Option<String>,
    pub title: String,
    /// Breakfast, lunch, dinner, snack, salad... it is an open set.
    pub meal_time: Option<String>,
    pub category: Option<String>,
    pub cuisine: Option<String>,
    pub time_minutes: Option<u32>,
    pub base_servings: Option<u32>,
    /// All the ingredients, in recipe order
    pub ingredients: Vec<Ingredient>,
    /// Names of the non optional ingredients, in recipe order
    pub required_names: Vec<String>,
    /// Names of the optional ingredients, in recipe order
    pub optional_names: Vec<String>,
    pub schema: Schema,
}

impl CanonicalRecipe {
    /// Creates a recipe from its ingredients, splitting required and optional
    pub fn new(title: impl Into<String>, ingredients: Vec<Ingredient>, schema: Schema) -> Self {
        let (optional, required): (Vec<_>, Vec<_>) = ingredients.iter().partition(|i| i.optional);
        let required_names = required.into_iter().map(|i| i.name.clone()).collect();
        let optional_names = optional.into_iter().map(|i| i.name.clone()).collect();
        Self {
            id: None,
            title: title.into(),
            meal_time: None,
            category: None,
            cuisine: None,
            time_minutes: None,
            base_servings: None,
            ingredients,
            required_names,
            optional_names,
            schema,
        }
    }

    /// Required ingredients
    pub fn required(&self) -> impl Iterator<Item = &Ingredient> {
        self.ingredients.iter().filter(|i| !i.optional)
    }

    /// Optional ingredients
    pub fn optionals(&self) -> impl Iterator<Item = &Ingredient> {
        self.ingredients.iter().filter(|i| i.optional)
    }
}

/// An item of the household inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub name: String,
    /// Expiry date, if known
    ///
    /// Deserializes from an ISO date or a RFC 3339 timestamp, anything else is
    /// [`None`].
    #[serde(default, deserialize_with = "lenient_date")]
    pub expires_at: Option<NaiveDate>,
}

impl InventoryItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expires_at: None,
        }
    }

    pub fn expiring(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            expires_at: Some(date),
        }
    }
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Lenient<String>>::deserialize(deserializer)?;
    let Some(text) = raw.and_then(Lenient::valid) else {
        return Ok(None);
    };
    Ok(parse_date(&text))
}

/// Parse an ISO date or the date part of a RFC 3339 timestamp
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    None
}

/// Ingredients a user must not eat
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietaryProfile {
    #[serde(default)]
    pub restricted_ingredient_names: Vec<String>,
}

impl DietaryProfile {
    pub fn new<S: Into<String>>(restricted: impl IntoIterator<Item = S>) -> Self {
        Self {
            restricted_ingredient_names: restricted.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.restricted_ingredient_names
            .iter()
            .all(|r| r.trim().is_empty())
    }
}
