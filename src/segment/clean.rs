//! OCR artifact cleaner
//!
//! Cleaning is an ordered table of `(pattern, replacement)` rules applied one
//! after another to a finished field. Order matters: later rules assume the
//! earlier ones already ran (units are repaired before number spacing, `!`
//! repairs depend on the temporary marker, whitespace collapse runs last).
//!
//! Unicode is folded to ASCII before any rule runs, so every pattern below
//! only ever sees ASCII input.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Stands in for `!i` while the blanket `!` -> `t` rule runs. Cannot occur in
/// folded input because it is outside ASCII.
const BANG_I_MARKER: &str = "\u{E000}";

/// Rule groups, in application order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleGroup {
    /// Page headers, footers and price tags
    PageArtifacts,
    /// mg, mcg, kg, ml, min, hr
    Units,
    /// `0 . 5` -> `0.5`
    NumberSpacing,
    /// Whole-word OCR corrections
    Words,
    /// `!` misread for `t` or `5`
    Exclamation,
    /// Digit/letter confusions inside dose figures
    DoseFigures,
    /// Dosing intervals and durations
    Intervals,
    /// "See X" cross references
    References,
    /// Leftover extraction garbage
    Garbage,
    /// Whitespace and repeated punctuation
    Collapse,
}

/// One substitution rule. `replacement` uses `regex` expansion syntax (`${1}`).
#[derive(Debug, Clone, Copy)]
pub struct RuleSpec {
    pub group: RuleGroup,
    pub pattern: &'static str,
    pub replacement: &'static str,
}

const fn rule(group: RuleGroup, pattern: &'static str, replacement: &'static str) -> RuleSpec {
    RuleSpec {
        group,
        pattern,
        replacement,
    }
}

use RuleGroup::*;

pub const RULES: &[RuleSpec] = &[
    rule(PageArtifacts, r"=== PAGE \d+ ===", " "),
    rule(
        PageArtifacts,
        r"\$\d+\.\d+ \+ postage from orders@drugdoses\.com Page \d+",
        " ",
    ),
    rule(PageArtifacts, r"drugdoses\.com", " "),
    rule(PageArtifacts, r"Page \d+", " "),
    // mg
    rule(Units, r"(\d)\s*rng\b", "${1}mg"),
    rule(Units, r"(\d)\s*rn\s*g\b", "${1}mg"),
    rule(Units, r"(\d)\s*rnq\b", "${1}mg"),
    rule(Units, r"\brng\b", "mg"),
    rule(Units, r"\bmg\s+(\d)", "mg/${1}"),
    // mcg
    rule(Units, r"(\d)\s*rncg\b", "${1}mcg"),
    rule(Units, r"(\d)\s*mc\s*g\b", "${1}mcg"),
    rule(Units, r"\brncg\b", "mcg"),
    // kg
    rule(Units, r"(\d)\s*(?:l<g|1<g|I<g|k\(J|1\(g|k\[J|kq)\b", "${1}kg"),
    rule(Units, r"\b(?:l<g|I<g|k\(J|k\[J|kq)\b", "kg"),
    // ml
    rule(Units, r"(\d)\s*(?:rnl|rn I)\b", "${1}ml"),
    rule(Units, r"\brnl\b", "ml"),
    rule(Units, r"\bm\s+l\b", "ml"),
    rule(Units, r"\bmll\b", "ml"),
    // min, hr, H
    rule(Units, r"(\d)\s*rnin\b", "${1}min"),
    rule(Units, r"\brnin\b", "min"),
    rule(Units, r"\b(?:llr|lhr)\b", "hr"),
    rule(Units, r"\bti-1\s*/H\b", "6-12H"),
    rule(Units, r"(\d)\s*/H\b", "${1}H"),
    rule(Units, r"\b8-l2H\b", "8-12H"),
    rule(NumberSpacing, r"(\d+)\s+(\.\s*\d+)", "${1}${2}"),
    rule(NumberSpacing, r"(\d+)\s*\.\s*(\d+)", "${1}.${2}"),
    rule(NumberSpacing, r"0_\s*1", "0.1"),
    rule(NumberSpacing, r"(\d+)\s*_\s*(\d+)", "${1}.${2}"),
    rule(Words, r"(?i)\b(?:ornl|oml|orul)\b", "oral"),
    rule(Words, r"\b(?:Ornin|Omin)\b", "0min"),
    rule(Words, r"\bbeforo\b", "before"),
    rule(Words, r"\btl1(?:on|en)\b", "then"),
    rule(Words, r"(?i)\bparacetar(?:no1|nol)\b", "paracetamol"),
    rule(Words, r"\bangioplasly\b", "angioplasty"),
    rule(Words, r"\bsoltn\b", "solution"),
    rule(Words, r"\bintratrac:l1eal\b", "intratracheal"),
    rule(Words, r"\bumolll\b", "umol/L"),
    rule(Words, r"\b(?:umoi|urnoi)\b", "umol"),
    rule(Words, r"\b(?:rnux|rnax)\b", "max"),
    rule(Words, r"\btub\b", "tab"),
    rule(Words, r"\brepoat\b", "repeat"),
    rule(Words, r"\bdni!y\b", "daily"),
    rule(Words, r"\bdnily\b", "daily"),
    rule(Words, r"turnourlysis:", "tumour lysis:"),
    // Route codes
    rule(Words, r"\bUlV\b", "IV"),
    rule(Words, r"\b(?:IVl|lVl)\b", "IM"),
    // "1!i0" -> "150", a word-initial "!i" is a 5
    rule(Exclamation, r"\b1\s*!\s*i\s*0", "150"),
    rule(Exclamation, r"\b!\s*i", "5"),
    // Every other "!" is a "t"; "!i" is parked first so it comes back as "ti"
    rule(Exclamation, r"!i", BANG_I_MARKER),
    rule(Exclamation, r"!", "t"),
    rule(Exclamation, BANG_I_MARKER, "ti"),
    rule(Exclamation, r"ti-1", "6-1"),
    rule(DoseFigures, r"\b1\s*0\s*-\s*/\s*0", "10-20"),
    rule(DoseFigures, r"\b([12]?\d)-/0", "${1}-20"),
    rule(DoseFigures, r"/0mg", "20mg"),
    rule(DoseFigures, r"\b1 OO\s*(mg|mcg|ml|kg)", "100${1}"),
    rule(DoseFigures, r"\b1 O\s*(mg|mcg|ml|kg)", "10${1}"),
    rule(DoseFigures, r"\b0\s*\.\s*([125])\b", "0.${1}"),
    rule(DoseFigures, r"\b1\s*\.\s*0\b", "1.0"),
    rule(DoseFigures, r"\b2\.\s*5", "2.5"),
    rule(Intervals, r"\b8-24ft\b", "8-24H"),
    rule(Intervals, r"\b6-12JI\b", "6-12H"),
    rule(Intervals, r"\b(\d*)wl<", "${1}wk"),
    rule(Intervals, r"\b21lr\b", "2hr"),
    rule(Intervals, r"\b241lr\b", "24hr"),
    rule(Intervals, r"\b(\d+)hr\b", "${1}H"),
    rule(References, r"\bSee\s+([a-z])", "See ${1}"),
    rule(References, r"\bS(?:ec|oo|eu)\s+", "See "),
    rule(Garbage, r"\b[A-Z]\\\\\w+\b", ""),
    rule(Garbage, r"\\u00b7", "-"),
    rule(Garbage, r"~", "-"),
    rule(Garbage, r"--+", "-"),
    rule(
        Garbage,
        r"(?i)\$\d+\.\d+\s+\+\s+po;;lnqc.*?drugd?u?sos\.com",
        "",
    ),
    rule(Garbage, r"(?i)from\s+oniom.*?drugdosos\.com", ""),
    rule(Garbage, r"ordors@.*?\.com", ""),
    rule(Garbage, r"Pane\s+\d+", ""),
    rule(Collapse, r"\s+", " "),
    rule(Collapse, r"\s+\.", "."),
    rule(Collapse, r"\.\.+", "."),
];

/// A compiled rule
#[derive(Debug)]
pub struct CleanRule {
    pub spec: RuleSpec,
    regex: Regex,
}

impl CleanRule {
    pub fn apply(&self, text: &str) -> String {
        self.regex
            .replace_all(text, self.spec.replacement)
            .into_owned()
    }
}

static COMPILED: LazyLock<Vec<CleanRule>> = LazyLock::new(|| {
    RULES
        .iter()
        .filter_map(|spec| match Regex::new(spec.pattern) {
            Ok(regex) => Some(CleanRule { spec: *spec, regex }),
            Err(e) => {
                tracing::error!(pattern = spec.pattern, error = %e, "invalid clean rule");
                None
            }
        })
        .collect()
});

/// Compiled rules in application order
pub fn rules() -> &'static [CleanRule] {
    &COMPILED
}

/// Decompose and drop whatever has no ASCII form
pub fn fold_to_ascii(text: &str) -> String {
    text.nfkd().filter(char::is_ascii).collect()
}

/// Clean one finished field
pub fn clean(text: &str) -> String {
    let folded = fold_to_ascii(text);
    let cleaned = rules()
        .iter()
        .fold(folded, |acc, rule| rule.apply(&acc));
    cleaned.trim().to_string()
}
