//! Text folding used for every name comparison in the crate
//!
//! Names typed by users rarely agree on case or accents, "Crème fraîche",
//! "creme fraiche" and "CREME FRAICHE " must be the same ingredient. All the
//! matching code compares the output of [`normalize`] and nothing else.

use finl_unicode::categories::CharacterCategories;
use smallvec::SmallVec;
use unicode_normalization::UnicodeNormalization;

/// Fold a name for comparisons
///
/// Lowercases, decomposes the text and removes the combining marks, then trims
/// the surrounding whitespace.
///
/// ```
/// # use cookable::text::normalize;
/// assert_eq!(normalize("  Crème Fraîche "), "creme fraiche");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !c.is_mark())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Bidirectional substring test between two normalized names
///
/// `true` if either contains the other. An empty side never matches, an empty
/// string is a substring of everything and would make every name match.
pub fn contains_either(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(b) || b.contains(a)
}

/// Split an already normalized name into words
///
/// Separators are commas, semicolons, slashes, parentheses and whitespace.
/// Words in `connectors` ("and", "or"...) are separators too and never
/// returned. Connectors are compared against the normalized word, so they
/// should be given normalized.
pub fn tokenize<'a, S: AsRef<str>>(name: &'a str, connectors: &[S]) -> SmallVec<[&'a str; 4]> {
    name.split(is_separator)
        .filter(|t| !t.is_empty())
        .filter(|t| !connectors.iter().any(|c| c.as_ref() == *t))
        .collect()
}

fn is_separator(c: char) -> bool {
    matches!(c, ',' | ';' | '/' | '(' | ')' | '&' | '+') || c.is_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Salt" => "salt" ; "lowercase")]
    #[test_case("  Olive Oil\t" => "olive oil" ; "trim")]
    #[test_case("Jalapeño" => "jalapeno" ; "tilde")]
    #[test_case("Crème fraîche" => "creme fraiche" ; "grave and circumflex")]
    #[test_case("Äpfel" => "apfel" ; "umlaut")]
    #[test_case("Zwiebeln, rot" => "zwiebeln, rot" ; "keeps punctuation")]
    #[test_case("" => "" ; "empty")]
    #[test_case("   " => "" ; "only whitespace")]
    fn normalize_cases(input: &str) -> String {
        normalize(input)
    }

    #[test]
    fn normalize_is_idempotent() {
        for s in [
            "Crème Brûlée",
            "  ÅNGSTRÖM  ",
            "Ǆemal",
            "naïve café",
            "İstanbul",
            "ﬁsh",
            "Straße",
            "",
        ] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn contains_either_both_directions() {
        assert!(contains_either("olive oil", "oil"));
        assert!(contains_either("oil", "olive oil"));
        assert!(contains_either("salt", "salt"));
        assert!(!contains_either("salt", "sugar"));
        assert!(!contains_either("", "salt"));
        assert!(!contains_either("salt", ""));
    }

    #[test]
    fn tokenize_separators() {
        let connectors = ["and", "or", "und", "oder"];
        let tokens = tokenize("salt and pepper", &connectors);
        assert_eq!(tokens.as_slice(), &["salt", "pepper"]);

        let tokens = tokenize("milch oder sahne, frisch", &connectors);
        assert_eq!(tokens.as_slice(), &["milch", "sahne", "frisch"]);

        let tokens = tokenize("  ,, ", &connectors);
        assert!(tokens.is_empty());

        // connectors only split as whole words
        let tokens = tokenize("oregano", &connectors);
        assert_eq!(tokens.as_slice(), &["oregano"]);
    }
}
