// ── Unit normalization ──
//
// The add-on lets users type units freely (mostly Hungarian labels).
// Physical units map onto canonical names; count-like units ("db", "darab",
// "csomag") and anything unrecognized pass through as typed.

/// Map a free-text unit label to its canonical form.
///
/// Matching is case-insensitive and ignores surrounding whitespace.
/// `None`, empty and blank input yield `None`.
pub fn normalize_unit(unit: Option<&str>) -> Option<String> {
    let raw = unit?;
    let key = raw.trim().to_lowercase();
    if key.is_empty() {
        return None;
    }

    let canonical = match key.as_str() {
        "kg" | "kilogramm" => "kilograms",
        "g" | "gramm" => "grams",
        "l" | "liter" => "liters",
        "ml" | "milliliter" => "milliliters",
        _ => return Some(raw.to_owned()),
    };
    Some(canonical.to_owned())
}
