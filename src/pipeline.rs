//! Batch operations
//!
//! Each run reads its input whole, processes it, and writes the output only
//! after processing succeeds.

use crate::config::{ExtractConfig, SegmentConfig};
use crate::counseling::{generate_counseling_js, CounselingMedication};
use crate::dilution::{parse_dilution, DilutionDocument};
use crate::error::Result;
use crate::output::{to_json_pretty, write_output};
use crate::pdf::{extract_text, render_marked_pages};
use crate::segment::Segmenter;
use crate::source::{resolve_json, resolve_text};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::info;

/// Result of a PDF text extraction run
#[derive(Debug, Clone)]
pub struct ExtractReport {
    pub pages: usize,
    pub characters: usize,
    pub output: PathBuf,
}

/// Result of a segmentation run
#[derive(Debug, Clone)]
pub struct SegmentReport {
    pub accepted: usize,
    pub rejected: usize,
    pub boundaries: usize,
    pub orphaned_lines: usize,
    pub output: PathBuf,
}

/// Result of a dilution-guideline run
#[derive(Debug, Clone)]
pub struct DilutionReport {
    pub entries: usize,
    pub output: PathBuf,
}

/// Result of a counseling module run
#[derive(Debug, Clone)]
pub struct CounselingReport {
    pub medications: usize,
    pub output: PathBuf,
}

/// PDF -> page-marked text
pub fn run_extract(input: &Path, output: &Path, config: &ExtractConfig) -> Result<ExtractReport> {
    let pages = extract_text(input, config)?;
    let text = render_marked_pages(&pages);
    write_output(output, text.as_bytes())?;

    info!(pages = pages.len(), output = %output.display(), "Extracted text");
    Ok(ExtractReport {
        pages: pages.len(),
        characters: text.chars().count(),
        output: output.to_path_buf(),
    })
}

/// Page-marked text -> formulary entry array
pub fn run_segment(input: &Path, output: &Path, config: SegmentConfig) -> Result<SegmentReport> {
    let resolved = resolve_text(input)?;
    info!(source = %resolved.source_name, "Segmenting formulary text");

    let segmentation = Segmenter::new(config).segment_text(&resolved.text);
    let data = to_json_pretty(&segmentation.entries)?;
    write_output(output, &data)?;

    Ok(SegmentReport {
        accepted: segmentation.entries.len(),
        rejected: segmentation.rejected,
        boundaries: segmentation.boundaries,
        orphaned_lines: segmentation.orphaned_lines,
        output: output.to_path_buf(),
    })
}

/// Page-marked dilution guideline text -> profile document
pub fn run_dilution(input: &Path, output: &Path, page_marker: &str) -> Result<DilutionReport> {
    let resolved = resolve_text(input)?;

    let drugs = parse_dilution(&resolved.text, page_marker);
    let entries = drugs.len();
    let data = to_json_pretty(&DilutionDocument::new(drugs))?;
    write_output(output, &data)?;

    info!(entries, source = %resolved.source_name, "Parsed dilution guideline");
    Ok(DilutionReport {
        entries,
        output: output.to_path_buf(),
    })
}

/// Counseling JSON -> ES module
pub fn run_counseling(input: &Path, output: &Path, last_updated: NaiveDate) -> Result<CounselingReport> {
    let medications: Vec<CounselingMedication> = resolve_json(input)?;

    let js = generate_counseling_js(&medications, last_updated)?;
    write_output(output, js.as_bytes())?;

    info!(medications = medications.len(), "Generated counseling module");
    Ok(CounselingReport {
        medications: medications.len(),
        output: output.to_path_buf(),
    })
}
