//! Quantity model and free text quantity parsing

use std::fmt::Display;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A quantity split into amount and unit
///
/// `amount` is [`None`] when the text had no leading number, like
/// `"to taste"` or `"a pinch"`. In that case the whole text is in `unit`.
///
/// The [`Display`] implementation rounds the numbers to 3 decimal places.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quantity {
    /// Numeric amount, the lower bound if the text was a range
    pub amount: Option<f64>,
    /// Unit or remaining text, trimmed
    #[serde(default)]
    pub unit: String,
    /// Upper bound for ranges like `2-3`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
}

impl Quantity {
    /// Creates a new quantity
    pub fn new(amount: Option<f64>, unit: impl Into<String>) -> Self {
        Self {
            amount,
            unit: unit.into(),
            upper: None,
        }
    }

    /// Quantity with only text, no amount
    pub fn text(text: &str) -> Self {
        Self::new(None, text.trim())
    }

    /// Check if the quantity has no amount and no unit
    pub fn is_empty(&self) -> bool {
        self.amount.is_none() && self.unit.is_empty()
    }

    /// Multiply the amounts by `factor`. Text only quantities are unchanged.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            amount: self.amount.map(|a| a * factor),
            unit: self.unit.clone(),
            upper: self.upper.map(|u| u * factor),
        }
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn float(n: f64) -> f64 {
            (n * 1000.0).round() / 1000.0
        }

        let Some(amount) = self.amount else {
            return write!(f, "{}", self.unit);
        };
        write!(f, "{}", float(amount))?;
        if let Some(upper) = self.upper {
            write!(f, "-{}", float(upper))?;
        }
        if !self.unit.is_empty() {
            write!(f, " {}", self.unit)?;
        }
        Ok(())
    }
}

static QUANTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?xs)
        ^\s*
        (?:
            (?P<mixed_int>\d+)\s+(?P<mixed_num>\d+)\s*/\s*(?P<mixed_den>\d+)
          | (?P<num>\d+)\s*/\s*(?P<den>\d+)
          | (?P<dec>\d+(?:[.,]\d+)?)\s*(?P<vulgar>[½⅓⅔¼¾⅕⅖⅗⅘⅙⅚⅛⅜⅝⅞])?
          | (?P<lone_vulgar>[½⅓⅔¼¾⅕⅖⅗⅘⅙⅚⅛⅜⅝⅞])
        )
        (?:\s*[-–]\s*(?P<upper>\d+(?:[.,]\d+)?))?
        \s*(?P<unit>.*?)\s*$",
    )
    .expect("quantity regex")
});

/// Parse a free text quantity
///
/// Understands a leading integer, decimal (with `.` or `,`), fraction
/// (`1/2`), mixed number (`1 1/2`), unicode fraction (`½`, `1½`) and range
/// (`2-3`). Whatever follows the number is the unit.
///
/// This never fails. Without a leading number, or with a zero denominator,
/// the amount is [`None`] and the trimmed text is the unit.
///
/// ```
/// # use cookable::quantity::{parse, Quantity};
/// assert_eq!(parse("1/2 cup"), Quantity::new(Some(0.5), "cup"));
/// assert_eq!(parse("1,5 kg"), Quantity::new(Some(1.5), "kg"));
/// assert_eq!(parse("to taste"), Quantity::new(None, "to taste"));
/// ```
pub fn parse(text: &str) -> Quantity {
    let Some(caps) = QUANTITY_RE.captures(text) else {
        return Quantity::text(text);
    };

    let num = |name: &str| caps.name(name).and_then(|m| decimal(m.as_str()));

    let amount = if let (Some(i), Some(a), Some(b)) =
        (num("mixed_int"), num("mixed_num"), num("mixed_den"))
    {
        frac(a, b).map(|f| i + f)
    } else if let (Some(a), Some(b)) = (num("num"), num("den")) {
        frac(a, b)
    } else if let Some(d) = num("dec") {
        let extra = caps
            .name("vulgar")
            .and_then(|m| vulgar(m.as_str()))
            .unwrap_or(0.0);
        Some(d + extra)
    } else {
        caps.name("lone_vulgar").and_then(|m| vulgar(m.as_str()))
    };

    let Some(amount) = amount else {
        return Quantity::text(text);
    };

    let unit = caps.name("unit").map(|m| m.as_str()).unwrap_or_default();
    Quantity {
        amount: Some(amount),
        unit: unit.to_string(),
        upper: num("upper"),
    }
}

fn decimal(s: &str) -> Option<f64> {
    s.replace(',', ".").parse::<f64>().ok()
}

fn frac(a: f64, b: f64) -> Option<f64> {
    if b == 0.0 {
        None
    } else {
        Some(a / b)
    }
}

fn vulgar(s: &str) -> Option<f64> {
    let v = match s.chars().next()? {
        '½' => 1.0 / 2.0,
        '⅓' => 1.0 / 3.0,
        '⅔' => 2.0 / 3.0,
        '¼' => 1.0 / 4.0,
        '¾' => 3.0 / 4.0,
        '⅕' => 1.0 / 5.0,
        '⅖' => 2.0 / 5.0,
        '⅗' => 3.0 / 5.0,
        '⅘' => 4.0 / 5.0,
        '⅙' => 1.0 / 6.0,
        '⅚' => 5.0 / 6.0,
        '⅛' => 1.0 / 8.0,
        '⅜' => 3.0 / 8.0,
        '⅝' => 5.0 / 8.0,
        '⅞' => 7.0 / 8.0,
        _ => return None,
    };
    Some(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("200 g" => (Some(200.0), "g".to_string()) ; "integer")]
    #[test_case("200g" => (Some(200.0), "g".to_string()) ; "no space")]
    #[test_case("1.5 l" => (Some(1.5), "l".to_string()) ; "decimal point")]
    #[test_case("1,5 l" => (Some(1.5), "l".to_string()) ; "decimal comma")]
    #[test_case("1/2 cup" => (Some(0.5), "cup".to_string()) ; "fraction")]
    #[test_case("3 / 4 tsp" => (Some(0.75), "tsp".to_string()) ; "spaced fraction")]
    #[test_case("1 1/2 cups" => (Some(1.5), "cups".to_string()) ; "mixed number")]
    #[test_case("½ cup" => (Some(0.5), "cup".to_string()) ; "unicode fraction")]
    #[test_case("1½ cup" => (Some(1.5), "cup".to_string()) ; "integer and unicode fraction")]
    #[test_case("3" => (Some(3.0), "".to_string()) ; "only number")]
    #[test_case("  2   Stück " => (Some(2.0), "Stück".to_string()) ; "trimmed unit")]
    #[test_case("to taste" => (None, "to taste".to_string()) ; "no number")]
    #[test_case(" eine Prise " => (None, "eine Prise".to_string()) ; "no number trimmed")]
    #[test_case("1/0 cup" => (None, "1/0 cup".to_string()) ; "zero denominator")]
    #[test_case("" => (None, "".to_string()) ; "empty")]
    fn parse_quantity(input: &str) -> (Option<f64>, String) {
        let q = parse(input);
        (q.amount, q.unit)
    }

    #[test]
    fn range() {
        let q = parse("2-3 eggs");
        assert_eq!(q.amount, Some(2.0));
        assert_eq!(q.upper, Some(3.0));
        assert_eq!(q.unit, "eggs");
        assert_eq!(q.to_string(), "2-3 eggs");
    }

    #[test]
    fn display() {
        assert_eq!(Quantity::new(Some(0.5), "cup").to_string(), "0.5 cup");
        assert_eq!(Quantity::new(Some(2.0), "").to_string(), "2");
        assert_eq!(Quantity::new(Some(1.0 / 3.0), "tsp").to_string(), "0.333 tsp");
        assert_eq!(Quantity::text("to taste").to_string(), "to taste");
    }

    #[test]
    fn scaled() {
        let q = parse("2-3 eggs").scaled(2.0);
        assert_eq!(q.amount, Some(4.0));
        assert_eq!(q.upper, Some(6.0));
        let q = Quantity::text("to taste").scaled(2.0);
        assert_eq!(q, Quantity::text("to taste"));
    }
}
