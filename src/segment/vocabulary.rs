//! Static reference data: words that never start a drug entry, and OCR name fixes

use std::collections::HashSet;

/// Headers, connectives, route codes and section titles of the reference text
const NON_DRUG_TERMS: &[&str] = &[
    // Clinical instructions
    "Monitor", "Note", "Caution", "Warning", "See", "Adult", "Child", "Infant", "Neonatal",
    "Preterm", "Term", "Give", "Stop", "Repeat", "Max", "Min", "Total", "Daily", "Weekly",
    "Monthly", "If", "Then", "For", "Use", "Avoid", "Adjust", "Check", "Measure", "Keep",
    "Protect", "Dilute", "Dissolve", "Infuse", "Inject", "Take", "Administer", "Apply",
    // Connectives and pronouns
    "In", "On", "At", "To", "By", "With", "Without", "Or", "And", "But", "However",
    "Although", "Because", "Since", "When", "Where", "Why", "How", "What", "Who", "Which",
    "That", "This", "These", "Those", "It", "They", "We", "You", "He", "She", "The", "A",
    "An", "My", "Your", "His", "Her", "Its", "Our", "Their", "NB",
    // Routes
    "IV", "IM", "SC", "PO", "PR", "PV", "SL", "TOP", "INH", "NEB",
    // Section headings
    "Contents", "Drug", "Doses", "Infusion", "Rates", "Table", "Haemofiltration",
    "Cytochrome", "Alveolar", "Muscle", "Pacemaker", "Intravenous", "Haematology", "Fluid",
    "Dialysis", "Ventilation", "Immunisation", "Antibiotic", "Normal", "Values",
    "Resuscitation", "Pharmacokinetic", "Prophylaxis", "Treatment", "Loading",
    "Maintenance", "Severe", "Slow", "Extended", "Newborn", "NOT",
];

/// Known OCR-mangled names and their corrections, applied as substring replacements
const NAME_FIXES: &[(&str, &str)] = &[
    ("Abaca vir", "Abacavir"),
    ("Abalacept", "Abatacept"),
    ("Acetylcysteinu", "Acetylcysteine"),
    ("AlbuteroL", "Albuterol"),
];

/// Fixed set of words that must never be classified as a drug name
#[derive(Debug, Clone)]
pub struct NonDrugVocabulary {
    terms: HashSet<&'static str>,
}

impl NonDrugVocabulary {
    /// The vocabulary of the paediatric drug-dose reference
    pub fn standard() -> Self {
        Self {
            terms: NON_DRUG_TERMS.iter().copied().collect(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.terms.contains(word)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl Default for NonDrugVocabulary {
    fn default() -> Self {
        Self::standard()
    }
}

/// Mapping from OCR-mangled name fragments to corrected names
#[derive(Debug, Clone)]
pub struct NameFixTable {
    fixes: Vec<(&'static str, &'static str)>,
}

impl NameFixTable {
    pub fn standard() -> Self {
        Self {
            fixes: NAME_FIXES.to_vec(),
        }
    }

    /// Apply every fix whose wrong spelling occurs in `name`
    pub fn apply(&self, name: &str) -> String {
        let mut fixed = name.to_string();
        for (wrong, correct) in &self.fixes {
            if fixed.contains(wrong) {
                fixed = fixed.replace(wrong, correct);
            }
        }
        fixed
    }
}

impl Default for NameFixTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_membership() {
        let vocab = NonDrugVocabulary::standard();
        assert!(vocab.contains("Max"));
        assert!(vocab.contains("IV"));
        assert!(vocab.contains("Newborn"));
        assert!(!vocab.contains("Amoxicillin"));
        // Case sensitive
        assert!(!vocab.contains("max"));
    }

    #[test]
    fn test_vocabulary_has_no_duplicates() {
        let vocab = NonDrugVocabulary::standard();
        assert_eq!(vocab.len(), NON_DRUG_TERMS.len());
    }

    #[test]
    fn test_name_fixes() {
        let fixes = NameFixTable::standard();
        assert_eq!(fixes.apply("AlbuteroL"), "Albuterol");
        assert_eq!(fixes.apply("Abaca vir"), "Abacavir");
        assert_eq!(fixes.apply("Abalacept (CTLA4-Ig)"), "Abatacept (CTLA4-Ig)");
        assert_eq!(fixes.apply("Acyclovir"), "Acyclovir");
    }
}
