//! New-record boundary detection
//!
//! A line opens a new drug entry when its leading token looks like a drug
//! name and one of the ordered boundary rules matches. The first rule that
//! matches wins; a line no rule claims is continuation text.

use super::validate::is_valid_name;
use super::vocabulary::NonDrugVocabulary;
use regex::Regex;
use std::sync::LazyLock;

/// "Name. dosage" or "Name: dosage"
static TITLED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][a-zA-Z0-9+\s()-]{2,60}?[.:]\s").expect("titled-line pattern")
});

/// ". Name. " inside a line: a second entry merged in by the layout extractor
static EMBEDDED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.\s+([A-Z][a-z]{3,30})\.\s").expect("embedded-boundary pattern")
});

const COMBINATION_PREFIX_LIMIT: usize = 50;
const SHORT_LINE_LIMIT: usize = 60;
const SHORT_LINE_EXCEPTIONS: &[&str] = &["Adult", "NOT/kg"];

/// Which rule recognised a boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    /// `Name. rest` / `Name: rest`
    Titled,
    /// `Drug A + drug B`
    Combination,
    /// Short line ending in a period
    ShortDeclarative,
}

/// A boundary rule: the kind it reports and the predicate that detects it
pub struct BoundaryRule {
    pub kind: BoundaryKind,
    pub matches: fn(&str) -> bool,
}

/// Boundary rules in priority order
pub const BOUNDARY_RULES: &[BoundaryRule] = &[
    BoundaryRule {
        kind: BoundaryKind::Titled,
        matches: is_titled_line,
    },
    BoundaryRule {
        kind: BoundaryKind::Combination,
        matches: is_combination_line,
    },
    BoundaryRule {
        kind: BoundaryKind::ShortDeclarative,
        matches: is_short_declarative,
    },
];

pub fn is_titled_line(line: &str) -> bool {
    TITLED.is_match(line)
}

pub fn is_combination_line(line: &str) -> bool {
    match line.split_once('+') {
        Some((before, _)) => {
            before.chars().count() < COMBINATION_PREFIX_LIMIT && !line.starts_with("Adult")
        }
        None => false,
    }
}

pub fn is_short_declarative(line: &str) -> bool {
    line.chars().count() < SHORT_LINE_LIMIT
        && line.ends_with('.')
        && !SHORT_LINE_EXCEPTIONS.iter().any(|e| line.contains(e))
}

/// First space-delimited token with surrounding punctuation stripped
pub fn leading_token(line: &str) -> &str {
    line.split(' ')
        .next()
        .unwrap_or("")
        .trim_matches(|c: char| ".,:;()".contains(c))
}

/// Whether the leading token may begin a drug name at all
pub fn passes_guard(line: &str, vocabulary: &NonDrugVocabulary) -> bool {
    let token = leading_token(line);
    token.chars().count() > 1
        && token.chars().next().is_some_and(char::is_uppercase)
        && !vocabulary.contains(token)
}

/// Split at the first period into `(name, remainder)`, both trimmed
pub fn split_name(text: &str) -> (&str, &str) {
    match text.split_once('.') {
        Some((name, rest)) => (name.trim(), rest.trim()),
        None => (text.trim(), ""),
    }
}

/// A line recognised as the start of a new entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary<'a> {
    pub kind: BoundaryKind,
    pub name: &'a str,
    pub dosage: &'a str,
}

/// Classify a filtered line. `None` means the line is continuation text,
/// including when a rule matched but the name split off at the first period
/// failed validation.
pub fn classify<'a>(
    line: &'a str,
    vocabulary: &NonDrugVocabulary,
    max_name_length: usize,
) -> Option<Boundary<'a>> {
    if !passes_guard(line, vocabulary) {
        return None;
    }

    let kind = BOUNDARY_RULES
        .iter()
        .find(|rule| (rule.matches)(line))?
        .kind;

    // A line without a period is a name-only entry, checked after cleaning
    let Some((name, dosage)) = line.split_once('.') else {
        return Some(Boundary {
            kind,
            name: line.trim(),
            dosage: "",
        });
    };

    let (name, dosage) = (name.trim(), dosage.trim());
    if name.chars().count() > max_name_length || !is_valid_name(name) {
        return None;
    }

    Some(Boundary { kind, name, dosage })
}

/// A line that closes the open entry and opens another mid-line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedSplit<'a> {
    /// Text up to and including the period before the new name
    pub tail: &'a str,
    pub name: &'a str,
    pub dosage: &'a str,
}

/// Look for a drug name merged into a continuation line (`. Name. `).
/// Only the first candidate in the line is considered.
pub fn find_embedded<'a>(
    line: &'a str,
    vocabulary: &NonDrugVocabulary,
) -> Option<EmbeddedSplit<'a>> {
    let caps = EMBEDDED.captures(line)?;
    let candidate = caps.get(1)?.as_str();
    if vocabulary.contains(candidate) || !is_valid_name(candidate) {
        return None;
    }

    // The match starts at the period that ends the open entry's text
    let cut = caps.get(0)?.start() + 1;
    let (tail, seed) = line.split_at(cut);
    let (name, dosage) = split_name(seed.trim());
    Some(EmbeddedSplit { tail, name, dosage })
}
