//! Formulary extraction library
//!
//! Turns the text of scanned drug-reference books into structured records:
//! - `pdf`: page-marked text extraction with PDFium
//! - `segment`: splits the paediatric formulary text into `{id, name, dosage}` entries
//! - `dilution`: pulls injectable dilution profiles out of the guideline text
//! - `counseling`: renders counseling medications as an ES module

pub mod config;
pub mod counseling;
pub mod dilution;
pub mod error;
pub mod output;
pub mod pdf;
pub mod pipeline;
pub mod segment;
pub mod source;

pub use config::{ExtractConfig, SegmentConfig};
pub use error::{Error, Result};
pub use pipeline::{
    run_counseling, run_dilution, run_extract, run_segment, CounselingReport, DilutionReport,
    ExtractReport, SegmentReport,
};
pub use segment::{DrugEntry, Segmentation, Segmenter};
