use once_cell::sync::Lazy;
use regex::Regex;

/// Address tags, including the `add:` misspelling and `Addr_` column style
pub static RE_LEGACY_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^addr?[:_](housenumber|street)$").expect("Invalid regex pattern"));

/// Localised name tags written as `name:en` or `Name_en`
pub static RE_LEGACY_NAME_LANGUAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^name[:_]([a-z]{2,3})$").expect("Invalid regex pattern"));

/// Numeric text for coordinates stored as strings, e.g. " 52.5200 "
pub static RE_NUMERIC_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?\s*$").expect("Invalid regex pattern")
});
