//! Name and dosage validation heuristics

use regex::Regex;
use std::sync::LazyLock;

/// Share of non-allow-listed characters above which a dosage is treated as corrupted
pub const MAX_GIBBERISH_RATIO: f64 = 0.3;

/// Patterns that mark a candidate name as extraction garbage
static NAME_GIBBERISH: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Backslash commands
        r"\\[a-zA-Z]+",
        // Runs of non-ASCII
        r"[^\x00-\x7F]{3,}",
        // Long digit runs
        r"\d{5,}",
        // Runs of symbols
        r"[^a-zA-Z0-9\s+(),.-]{3,}",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("name gibberish pattern"))
    .collect()
});

/// Check if a name looks like a valid drug name
pub fn is_valid_name(name: &str) -> bool {
    if !name.chars().any(char::is_alphabetic) {
        return false;
    }

    let len = name.chars().count();
    if !(2..=100).contains(&len) {
        return false;
    }

    if name.matches('.').count() > 3 || name.contains('\\') {
        return false;
    }

    !NAME_GIBBERISH.iter().any(|re| re.is_match(name))
}

fn is_dosage_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_whitespace() || "-+(),.:/".contains(c)
}

/// Fraction of characters in `text` outside the dosage allow-list
pub fn gibberish_ratio(text: &str) -> f64 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }
    let gibberish = text.chars().filter(|&c| !is_dosage_char(c)).count();
    gibberish as f64 / total as f64
}

/// Check if dosage text looks valid.
///
/// Empty text is valid: cross-reference entries ("See ...") legitimately carry no dosage.
pub fn is_valid_dosage(dosage: &str) -> bool {
    if dosage.is_empty() {
        return true;
    }

    if dosage.chars().count() < 3 {
        return false;
    }

    gibberish_ratio(dosage) <= MAX_GIBBERISH_RATIO
}
