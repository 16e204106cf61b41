//! Noise-line filtering

use crate::config::SegmentConfig;
use std::borrow::Cow;

/// Why a line was discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discard {
    Blank,
    StartMarker,
    FrontMatter,
    PageBreak,
    PageNumber,
    TooLong,
    Boilerplate,
}

/// Outcome of filtering one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filtered<'a> {
    Keep(Cow<'a, str>),
    Discard(Discard),
}

/// Decide whether a raw line reaches the classifier.
///
/// `started` flips to true on the first line containing the start marker and
/// never flips back; that line and everything before it are discarded.
pub fn filter_line<'a>(line: &'a str, started: &mut bool, config: &SegmentConfig) -> Filtered<'a> {
    let line = line.trim();
    if line.is_empty() {
        return Filtered::Discard(Discard::Blank);
    }

    if line.contains(config.start_marker.as_str()) {
        *started = true;
        return Filtered::Discard(Discard::StartMarker);
    }

    if !*started {
        return Filtered::Discard(Discard::FrontMatter);
    }

    if line.contains(config.page_marker.as_str()) {
        return Filtered::Discard(Discard::PageBreak);
    }

    if config.boilerplate.iter().any(|b| line.contains(b.as_str())) {
        return Filtered::Discard(Discard::Boilerplate);
    }

    if line.chars().all(|c| c.is_ascii_digit()) {
        return Filtered::Discard(Discard::PageNumber);
    }

    if line.chars().count() > config.max_line_length {
        return Filtered::Discard(Discard::TooLong);
    }

    Filtered::Keep(repair_leading_glyph(line))
}

/// OCR reads a leading capital "A" as `1\` or `|`
pub fn repair_leading_glyph(line: &str) -> Cow<'_, str> {
    if let Some(rest) = line.strip_prefix("1\\") {
        Cow::Owned(format!("A{}", rest))
    } else if let Some(rest) = line.strip_prefix('|') {
        Cow::Owned(format!("A{}", rest))
    } else {
        Cow::Borrowed(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(lines: &[&str]) -> (Vec<String>, Vec<Discard>) {
        let config = SegmentConfig::default();
        let mut started = false;
        let mut kept = Vec::new();
        let mut dropped = Vec::new();
        for line in lines {
            match filter_line(line, &mut started, &config) {
                Filtered::Keep(l) => kept.push(l.into_owned()),
                Filtered::Discard(reason) => dropped.push(reason),
            }
        }
        (kept, dropped)
    }

    #[test]
    fn test_front_matter_dropped_until_marker() {
        let (kept, dropped) = run(&[
            "Contents",
            "Amoxicillin. 25mg/kg",
            "DRUGS ARE LISTED BY GENERIC NAME",
            "Amoxicillin. 25mg/kg",
        ]);
        assert_eq!(kept, vec!["Amoxicillin. 25mg/kg"]);
        assert_eq!(
            dropped,
            vec![Discard::FrontMatter, Discard::FrontMatter, Discard::StartMarker]
        );
    }

    #[test]
    fn test_started_flag_is_permanent() {
        let config = SegmentConfig::default();
        let mut started = false;
        filter_line("x DRUGS ARE LISTED BY GENERIC NAME x", &mut started, &config);
        assert!(started);
        filter_line("", &mut started, &config);
        filter_line("anything", &mut started, &config);
        assert!(started);
    }

    #[test]
    fn test_noise_lines_dropped_after_start() {
        let long = "x".repeat(501);
        let (kept, dropped) = run(&[
            "DRUGS ARE LISTED BY GENERIC NAME",
            "   ",
            "=== PAGE 7 ===",
            "42",
            long.as_str(),
            "$9.95 + postage from orders@drugdoses.com Page 12",
            "Kept line",
        ]);
        assert_eq!(kept, vec!["Kept line"]);
        assert_eq!(
            dropped,
            vec![
                Discard::StartMarker,
                Discard::Blank,
                Discard::PageBreak,
                Discard::PageNumber,
                Discard::TooLong,
                Discard::Boilerplate,
            ]
        );
    }

    #[test]
    fn test_max_length_is_inclusive() {
        let exact = "x".repeat(500);
        let (kept, _) = run(&["DRUGS ARE LISTED BY GENERIC NAME", exact.as_str()]);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_lines_are_trimmed() {
        let (kept, _) = run(&["DRUGS ARE LISTED BY GENERIC NAME", "  Amikacin.  "]);
        assert_eq!(kept, vec!["Amikacin."]);
    }

    #[test]
    fn test_repair_leading_glyph() {
        assert_eq!(repair_leading_glyph("1\\bacavir. 8mg/kg"), "Abacavir. 8mg/kg");
        assert_eq!(repair_leading_glyph("|denosine. 0.1mg/kg"), "Adenosine. 0.1mg/kg");
        assert_eq!(repair_leading_glyph("Amikacin"), "Amikacin");
        assert!(matches!(repair_leading_glyph("Amikacin"), Cow::Borrowed(_)));
    }
}
