//! Record segmentation and cleaning engine
//!
//! Turns the flat line stream of an extracted drug-dose reference into drug
//! entries. Each line passes through three steps:
//!
//! 1. noise filtering (`noise`)
//! 2. boundary detection (`boundary`): does this line open a new entry?
//! 3. accumulation into the open entry's dosage text, with recovery of a
//!    second entry merged into the same physical line
//!
//! The scan is a fold over the lines with an explicit [`ScanState`]. At most
//! one entry is open at a time; opening a new one finishes the previous.
//! Finished drafts are then cleaned (`clean`), validated (`validate`) and
//! numbered.

pub mod boundary;
pub mod clean;
pub mod noise;
pub mod validate;
pub mod vocabulary;

use crate::config::SegmentConfig;
use boundary::{classify, find_embedded};
use noise::{filter_line, Filtered};
use serde::{Deserialize, Serialize};
use validate::{is_valid_dosage, is_valid_name};
use vocabulary::{NameFixTable, NonDrugVocabulary};

pub use boundary::BoundaryKind;
pub use clean::clean;

/// One line of extracted text and its position in the input
#[derive(Debug, Clone, Copy)]
pub struct RawLine<'a> {
    pub index: usize,
    pub text: &'a str,
}

/// A finished, validated drug entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugEntry {
    pub id: String,
    pub name: String,
    pub dosage: String,
}

/// An entry still being assembled during the scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftEntry {
    pub name: String,
    pub dosage: String,
    /// Index of the line that opened the entry
    pub line: usize,
}

impl DraftEntry {
    fn new(name: &str, dosage: &str, line: usize) -> Self {
        Self {
            name: name.to_string(),
            dosage: dosage.to_string(),
            line,
        }
    }

    fn append(&mut self, text: &str) {
        if !self.dosage.is_empty() {
            self.dosage.push(' ');
        }
        self.dosage.push_str(text);
    }
}

/// State threaded through the scan
#[derive(Debug, Default)]
pub struct ScanState {
    started: bool,
    current: Option<DraftEntry>,
    finished: Vec<DraftEntry>,
    boundaries: usize,
    embedded: usize,
    orphaned: usize,
    discarded: usize,
}

impl ScanState {
    /// Process one line and return the advanced state
    pub fn step(mut self, line: RawLine<'_>, segmenter: &Segmenter) -> Self {
        let text = match filter_line(line.text, &mut self.started, &segmenter.config) {
            Filtered::Keep(text) => text,
            Filtered::Discard(reason) => {
                tracing::trace!(line = line.index, ?reason, "line discarded");
                self.discarded += 1;
                return self;
            }
        };

        if let Some(found) = classify(&text, &segmenter.vocabulary, segmenter.config.max_name_length)
        {
            tracing::debug!(line = line.index, kind = ?found.kind, name = found.name, "boundary");
            self.open(DraftEntry::new(found.name, found.dosage, line.index));
            return self;
        }

        if self.current.is_none() {
            tracing::trace!(line = line.index, "continuation before first entry dropped");
            self.orphaned += 1;
            return self;
        }

        if let Some(split) = find_embedded(&text, &segmenter.vocabulary) {
            tracing::debug!(line = line.index, name = split.name, "embedded boundary");
            if let Some(current) = self.current.as_mut() {
                current.append(split.tail);
            }
            self.embedded += 1;
            self.open(DraftEntry::new(split.name, split.dosage, line.index));
            return self;
        }

        if let Some(current) = self.current.as_mut() {
            current.append(&text);
        }
        self
    }

    fn open(&mut self, entry: DraftEntry) {
        if let Some(previous) = self.current.replace(entry) {
            self.finished.push(previous);
        }
        self.boundaries += 1;
    }

    /// Whether the start marker has been seen
    pub fn started(&self) -> bool {
        self.started
    }

    /// The entry currently accepting continuation text
    pub fn current(&self) -> Option<&DraftEntry> {
        self.current.as_ref()
    }

    /// Close the open entry and hand back everything scanned
    pub fn finish(mut self) -> ScanOutcome {
        if let Some(last) = self.current.take() {
            self.finished.push(last);
        }
        ScanOutcome {
            drafts: self.finished,
            boundaries: self.boundaries,
            embedded: self.embedded,
            orphaned: self.orphaned,
            discarded: self.discarded,
        }
    }
}

/// Raw result of the scan, before cleaning and validation
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    /// Drafts in encounter order
    pub drafts: Vec<DraftEntry>,
    /// Boundary events, including embedded ones
    pub boundaries: usize,
    /// Boundary events recovered from inside a continuation line
    pub embedded: usize,
    /// Continuation lines seen before any entry was open
    pub orphaned: usize,
    /// Lines removed by the noise filter
    pub discarded: usize,
}

/// Final result of a segmentation run
#[derive(Debug, Clone, Default)]
pub struct Segmentation {
    pub entries: Vec<DrugEntry>,
    pub rejected: usize,
    pub boundaries: usize,
    pub orphaned_lines: usize,
}

/// The segmentation engine: configuration plus static reference data
#[derive(Debug, Clone)]
pub struct Segmenter {
    config: SegmentConfig,
    vocabulary: NonDrugVocabulary,
    name_fixes: NameFixTable,
}

impl Segmenter {
    pub fn new(config: SegmentConfig) -> Self {
        Self {
            config,
            vocabulary: NonDrugVocabulary::standard(),
            name_fixes: NameFixTable::standard(),
        }
    }

    pub fn config(&self) -> &SegmentConfig {
        &self.config
    }

    /// Fold the line stream into drafts
    pub fn scan<I, S>(&self, lines: I) -> ScanOutcome
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lines
            .into_iter()
            .enumerate()
            .fold(ScanState::default(), |state, (index, text)| {
                state.step(
                    RawLine {
                        index,
                        text: text.as_ref(),
                    },
                    self,
                )
            })
            .finish()
    }

    /// Clean, validate and number drafts. Returns accepted entries and the
    /// number rejected.
    pub fn finalize(&self, drafts: Vec<DraftEntry>) -> (Vec<DrugEntry>, usize) {
        let mut entries: Vec<DrugEntry> = Vec::with_capacity(drafts.len());
        let mut rejected = 0;

        for draft in drafts {
            let name = clean(&draft.name);
            let dosage = clean(&draft.dosage);

            if !is_valid_name(&name) || !is_valid_dosage(&dosage) || self.vocabulary.contains(&name)
            {
                tracing::debug!(line = draft.line, name = %name, "entry rejected");
                rejected += 1;
                continue;
            }

            let id = format!("{}-{:04}", self.config.id_prefix, entries.len() + 1);
            entries.push(DrugEntry {
                id,
                name: self.name_fixes.apply(&name),
                dosage,
            });
        }

        (entries, rejected)
    }

    /// Run the whole engine over a line stream
    pub fn segment<I, S>(&self, lines: I) -> Segmentation
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let outcome = self.scan(lines);
        let (entries, rejected) = self.finalize(outcome.drafts);

        tracing::info!(
            accepted = entries.len(),
            rejected,
            boundaries = outcome.boundaries,
            embedded = outcome.embedded,
            orphaned = outcome.orphaned,
            discarded = outcome.discarded,
            "segmentation complete"
        );

        Segmentation {
            entries,
            rejected,
            boundaries: outcome.boundaries,
            orphaned_lines: outcome.orphaned,
        }
    }

    /// Run the engine over a whole extracted text
    pub fn segment_text(&self, text: &str) -> Segmentation {
        self.segment(text.lines())
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(SegmentConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKER: &str = "DRUGS ARE LISTED BY GENERIC NAME";

    fn entry(id: &str, name: &str, dosage: &str) -> DrugEntry {
        DrugEntry {
            id: id.to_string(),
            name: name.to_string(),
            dosage: dosage.to_string(),
        }
    }

    #[test]
    fn test_end_to_end_scenario() {
        let result = Segmenter::default().segment([
            MARKER,
            "Acyclovir. 10mg/kg IV q8h",
            "Max 500mg/dose",
            "Albuterol. 2.5mg nebulized",
        ]);

        assert_eq!(
            result.entries,
            vec![
                entry("fs-0001", "Acyclovir", "10mg/kg IV q8h Max 500mg/dose"),
                entry("fs-0002", "Albuterol", "2.5mg nebulized"),
            ]
        );
        assert_eq!(result.rejected, 0);
        assert_eq!(result.boundaries, 2);
    }

    #[test]
    fn test_name_fix_applied() {
        let result = Segmenter::default().segment([MARKER, "AlbuteroL. 2.5mg nebulized"]);
        assert_eq!(result.entries[0].name, "Albuterol");
    }

    #[test]
    fn test_embedded_boundary_scenario() {
        let result = Segmenter::default().segment([
            MARKER,
            "Amikacin. 15mg/kg daily",
            "some tail text. Azithro. 500mg OD",
        ]);

        assert_eq!(
            result.entries,
            vec![
                entry("fs-0001", "Amikacin", "15mg/kg daily some tail text."),
                entry("fs-0002", "Azithro", "500mg OD"),
            ]
        );
        assert_eq!(result.boundaries, 2);
    }

    #[test]
    fn test_noise_never_reaches_classifier() {
        let outcome = Segmenter::default().scan([
            "Amoxicillin. 25mg/kg before the marker",
            MARKER,
            "=== PAGE 7 ===",
            "Gentamicin. 7mg/kg daily",
        ]);
        assert_eq!(outcome.drafts.len(), 1);
        assert_eq!(outcome.drafts[0].name, "Gentamicin");
        assert_eq!(outcome.discarded, 3);
    }

    #[test]
    fn test_orphan_lines_dropped() {
        let outcome = Segmenter::default().scan([
            MARKER,
            "continuation before any entry",
            "Gentamicin. 7mg/kg daily",
        ]);
        assert_eq!(outcome.orphaned, 1);
        assert_eq!(outcome.drafts.len(), 1);
        assert_eq!(outcome.drafts[0].dosage, "7mg/kg daily");
    }

    #[test]
    fn test_drafts_match_boundary_events() {
        let outcome = Segmenter::default().scan([
            MARKER,
            "Amikacin. 15mg/kg daily",
            "then levels. Azithro. 10mg/kg",
            "Benzylpenicillin.",
            "60mg/kg 6H",
            "Amoxicillin + clavulanic acid",
        ]);
        assert_eq!(outcome.boundaries, 4);
        assert_eq!(outcome.embedded, 1);
        assert_eq!(outcome.drafts.len(), outcome.boundaries);
        let lines: Vec<usize> = outcome.drafts.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![1, 2, 3, 5]);
    }

    #[test]
    fn test_long_combination_heading_without_period() {
        let heading = "Trimethoprim + sulfamethoxazole 4mg/kg of the trimethoprim component given oral 12H max 160mg";
        assert!(heading.chars().count() > 80);

        let result = Segmenter::default().segment([
            MARKER,
            "Amikacin. 15mg/kg daily",
            heading,
            "Severe infection 5mg/kg 6H",
        ]);

        assert_eq!(
            result.entries,
            vec![
                entry("fs-0001", "Amikacin", "15mg/kg daily"),
                entry("fs-0002", heading, "Severe infection 5mg/kg 6H"),
            ]
        );
        assert_eq!(result.boundaries, 2);
    }

    #[test]
    fn test_ids_dense_after_rejection() {
        let result = Segmenter::default().segment([
            MARKER,
            "Amikacin. 15mg/kg daily",
            "Zinc. #$%^&*@!~",
            "Gentamicin. 7mg/kg daily",
        ]);
        assert_eq!(result.boundaries, 3);
        assert_eq!(result.rejected, 1);
        let ids: Vec<&str> = result.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["fs-0001", "fs-0002"]);
        assert_eq!(result.entries[1].name, "Gentamicin");
    }

    #[test]
    fn test_single_open_entry() {
        let segmenter = Segmenter::default();
        let state = [MARKER, "Amikacin. 15mg/kg", "daily", "Gentamicin. 7mg/kg"]
            .iter()
            .enumerate()
            .fold(ScanState::default(), |state, (index, text)| {
                state.step(RawLine { index, text }, &segmenter)
            });
        assert!(state.started());
        assert_eq!(state.current().map(|d| d.name.as_str()), Some("Gentamicin"));

        let outcome = state.finish();
        assert_eq!(outcome.drafts[0].dosage, "15mg/kg daily");
    }

    #[test]
    fn test_custom_id_prefix() {
        let config = SegmentConfig {
            id_prefix: "ped".to_string(),
            ..SegmentConfig::default()
        };
        let result = Segmenter::new(config).segment([MARKER, "Amikacin. 15mg/kg"]);
        assert_eq!(result.entries[0].id, "ped-0001");
    }

    #[test]
    fn test_empty_input() {
        let result = Segmenter::default().segment(Vec::<String>::new());
        assert!(result.entries.is_empty());
        assert_eq!(result.boundaries, 0);
    }
}
