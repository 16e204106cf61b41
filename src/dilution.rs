//! Dilution guideline parser
//!
//! Reads the page-marked text of the injectable-drug dilution guideline and
//! pulls one profile per page out of its labelled sections.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

/// Injectable antimicrobials profiled in the guideline, in table-of-contents order
pub const DILUTION_DRUGS: &[&str] = &[
    "Acyclovir",
    "Amikacin",
    "Amoxicillin & Clavulanate",
    "Amphotericin B",
    "Ampicillin",
    "Ampicillin & Sulbactam",
    "Anidulafungin",
    "Artesunate",
    "Azithromycin",
    "Benzathine Penicillin",
    "Benzylpenicillin",
    "Caspofungin Acetate",
    "Cefazolin",
    "Cefepime",
    "Cefoperazone",
    "Cefoperazone & Sulbactam",
    "Cefotaxime",
    "Ceftazidime",
    "Ceftriaxone",
    "Cefuroxime",
    "Clindamycin",
    "Cloxacillin",
    "Ertapenem",
    "Erythromycin Lactobionate",
    "Ganciclovir",
    "Gentamicin",
    "Imipenem & Cilastatin",
    "Meropenem",
    "Micafungin",
    "Netilmicin",
    "Pentamidine Isethionate",
    "Piperacillin & Tazobactam",
    "Sulphamethoxazole-Trimethoprim",
    "Vancomycin",
    "Voriconazole",
    "Zidovudine",
];

pub const CATEGORY: &str = "Injectable Antimicrobial";

const TITLE: &str = "MOH Dilution Guideline for Injectable Drugs";
const VERSION: &str = "December 2020";
const SOURCE: &str = "Ministry of Health Malaysia - Pharmaceutical Services Programme";

fn label(pattern: &str) -> Regex {
    Regex::new(pattern).expect("dilution label pattern")
}

static BRAND_NAME: LazyLock<Regex> = LazyLock::new(|| label(r"Brand Name\s+([^\n]+)"));
static DILUENTS: LazyLock<Regex> = LazyLock::new(|| label(r"Diluents?\s+([^\n]+)"));
static RECONSTITUTION: LazyLock<Regex> = LazyLock::new(|| label(r"Reconstitution\s+"));
static FURTHER_DILUTION: LazyLock<Regex> = LazyLock::new(|| label(r"Further Dilution\s+"));
static ADMINISTRATION: LazyLock<Regex> = LazyLock::new(|| label(r"Administration\s+"));
static STORAGE: LazyLock<Regex> = LazyLock::new(|| label(r"Storage[^\n]*?Stability\s+"));
static REMARKS: LazyLock<Regex> = LazyLock::new(|| label(r"Remarks\s+"));

/// Anything that ends a section block
static SECTION_END: LazyLock<Regex> = LazyLock::new(|| {
    label(r"Brand Name|Reconstitution|Further Dilution|Diluents?\b|Administration|Storage|Remarks|References|■")
});

/// One drug profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DilutionEntry {
    pub id: String,
    pub generic_name: String,
    pub brand_name: String,
    pub reconstitution: String,
    pub further_dilution: String,
    pub diluents: String,
    pub administration: String,
    pub storage: String,
    pub remarks: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DilutionMetadata {
    pub title: String,
    pub version: String,
    pub source: String,
    pub total_entries: usize,
}

/// Written document: metadata followed by the profiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DilutionDocument {
    pub metadata: DilutionMetadata,
    pub drugs: Vec<DilutionEntry>,
}

impl DilutionDocument {
    pub fn new(drugs: Vec<DilutionEntry>) -> Self {
        Self {
            metadata: DilutionMetadata {
                title: TITLE.to_string(),
                version: VERSION.to_string(),
                source: SOURCE.to_string(),
                total_entries: drugs.len(),
            },
            drugs,
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Rest of the line after a label
fn line_after(page: &str, label: &Regex) -> String {
    label
        .captures(page)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Text after a label up to the next section label, bullet or page end
fn block_after(page: &str, label: &Regex) -> String {
    let Some(found) = label.find(page) else {
        return String::new();
    };
    let rest = &page[found.end()..];
    let end = SECTION_END.find(rest).map_or(rest.len(), |m| m.start());
    collapse_whitespace(&rest[..end])
}

/// First vocabulary drug with an "<name> Injection" heading on the page
pub fn profile_drug(page: &str) -> Option<&'static str> {
    DILUTION_DRUGS
        .iter()
        .copied()
        .find(|name| page.contains(&format!("{name} Injection")))
}

fn parse_page(page: &str, generic_name: &str, id: String) -> DilutionEntry {
    DilutionEntry {
        id,
        generic_name: generic_name.to_string(),
        brand_name: line_after(page, &BRAND_NAME),
        reconstitution: block_after(page, &RECONSTITUTION),
        further_dilution: block_after(page, &FURTHER_DILUTION),
        diluents: line_after(page, &DILUENTS),
        administration: block_after(page, &ADMINISTRATION),
        storage: block_after(page, &STORAGE),
        remarks: block_after(page, &REMARKS),
        category: CATEGORY.to_string(),
    }
}

/// Parse every profile page. At most one record per page; ids are dense from 1.
pub fn parse_dilution(text: &str, page_marker: &str) -> Vec<DilutionEntry> {
    let mut entries = Vec::new();

    for page in text.split(page_marker) {
        if page.trim().is_empty() {
            continue;
        }
        let Some(name) = profile_drug(page) else {
            continue;
        };

        let id = format!("dilution-{}", entries.len() + 1);
        debug!(id = %id, drug = name, "Parsed dilution profile");
        entries.push(parse_page(page, name, id));
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "\
Amikacin Injection
Brand Name   Amikin 500mg/2ml
Reconstitution   Not required.
Further Dilution   Dilute in 100ml
  NS or D5W.
Diluent   Normal Saline, Dextrose 5%
Administration   IV infusion over
30-60 minutes.
Storage and Stability   Store below 25C.
■ Protect from light.
Remarks   Monitor trough levels.
References   Product leaflet";

    #[test]
    fn test_vocabulary_size() {
        assert_eq!(DILUTION_DRUGS.len(), 36);
    }

    #[test]
    fn test_parse_profile_page() {
        let entries = parse_dilution(&format!("=== PAGE 1 ===\n\n{PAGE}"), "=== PAGE");
        assert_eq!(entries.len(), 1);

        let entry = &entries[0];
        assert_eq!(entry.id, "dilution-1");
        assert_eq!(entry.generic_name, "Amikacin");
        assert_eq!(entry.brand_name, "Amikin 500mg/2ml");
        assert_eq!(entry.reconstitution, "Not required.");
        assert_eq!(entry.further_dilution, "Dilute in 100ml NS or D5W.");
        assert_eq!(entry.diluents, "Normal Saline, Dextrose 5%");
        assert_eq!(entry.administration, "IV infusion over 30-60 minutes.");
        assert_eq!(entry.storage, "Store below 25C.");
        assert_eq!(entry.remarks, "Monitor trough levels.");
        assert_eq!(entry.category, CATEGORY);
    }

    #[test]
    fn test_missing_sections_are_empty() {
        let entries = parse_dilution("=== PAGE 1 ===\nVancomycin Injection\nBrand Name Vanco", "=== PAGE");
        assert_eq!(entries[0].brand_name, "Vanco");
        assert_eq!(entries[0].reconstitution, "");
        assert_eq!(entries[0].remarks, "");
    }

    #[test]
    fn test_one_record_per_page_first_drug_wins() {
        let text = "=== PAGE 1 ===\nAmpicillin & Sulbactam Injection\nAmikacin Injection\n\
                    === PAGE 2 ===\nContents only\n\
                    === PAGE 3 ===\nZidovudine Injection";
        let entries = parse_dilution(text, "=== PAGE");
        let names: Vec<_> = entries.iter().map(|e| e.generic_name.as_str()).collect();
        assert_eq!(names, vec!["Amikacin", "Zidovudine"]);
        assert_eq!(entries[1].id, "dilution-2");
    }

    #[test]
    fn test_combination_names_are_not_shadowed() {
        assert_eq!(
            profile_drug("Ampicillin & Sulbactam Injection"),
            Some("Ampicillin & Sulbactam")
        );
        assert_eq!(profile_drug("Ampicillin Injection"), Some("Ampicillin"));
        assert_eq!(profile_drug("Ampicillin tablets"), None);
    }

    #[test]
    fn test_document_metadata() {
        let doc = DilutionDocument::new(parse_dilution(PAGE, "=== PAGE"));
        assert_eq!(doc.metadata.total_entries, 1);
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["metadata"]["totalEntries"], 1);
        assert_eq!(value["drugs"][0]["genericName"], "Amikacin");
        assert_eq!(value["drugs"][0]["furtherDilution"], "Dilute in 100ml NS or D5W.");
    }
}
