// src/process/magnitude.rs

use once_cell::sync::Lazy;
use regex::Regex;

/// Scale words the source site prints next to large values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Magnitude {
    Million,
    Billion,
    Trillion,
}

impl Magnitude {
    pub fn factor(self) -> f64 {
        match self {
            Magnitude::Million => 1e6,
            Magnitude::Billion => 1e9,
            Magnitude::Trillion => 1e12,
        }
    }
}

/// Keyword lookup applied to the *year* column of a value/year pair.
///
/// The site renders the scale word inside the year line ("2022 billion"),
/// so the year text, not the value, decides the multiplier. Checked in
/// this order; the first keyword contained in the text wins.
pub const YEAR_FIELD_MAGNITUDES: [(&str, Magnitude); 3] = [
    ("billion", Magnitude::Billion),
    ("trillion", Magnitude::Trillion),
    ("million", Magnitude::Million),
];

static MAGNITUDE_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*\(?\s*(billion|trillion|million)\s*\)?\s*").expect("magnitude regex")
});

/// Magnitude named in a year field, if any.
pub fn magnitude_in_year(year_field: &str) -> Option<Magnitude> {
    YEAR_FIELD_MAGNITUDES
        .iter()
        .find(|(word, _)| year_field.contains(word))
        .map(|&(_, m)| m)
}

/// Parse `value_field` (thousands separators allowed) and scale it by the
/// magnitude found in `year_field`. Unparseable values become 0.0.
pub fn normalize_magnitude(value_field: &str, year_field: &str) -> f64 {
    let value = value_field
        .replace(',', "")
        .trim()
        .parse::<f64>()
        .unwrap_or(0.0);
    match magnitude_in_year(year_field) {
        Some(m) => value * m.factor(),
        None => value,
    }
}

/// Remove magnitude words (and any parentheses around them) from a year field.
pub fn strip_magnitude(year_field: &str) -> String {
    MAGNITUDE_WORDS.replace_all(year_field, "").into_owned()
}
