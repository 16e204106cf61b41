//! Run configuration

/// Configuration for the record segmentation engine
#[derive(Debug, Clone)]
pub struct SegmentConfig {
    /// Substring that ends the front matter; nothing before it is parsed
    pub start_marker: String,
    /// Prefix of page-break lines written by the text extractor
    pub page_marker: String,
    /// Footer/attribution substrings; lines containing any of them are dropped
    pub boilerplate: Vec<String>,
    /// Lines longer than this (in characters) are treated as corrupted extraction
    pub max_line_length: usize,
    /// Longest name a boundary line may yield before it is demoted to continuation
    pub max_name_length: usize,
    /// Prefix for generated entry ids (`<prefix>-0001`)
    pub id_prefix: String,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            start_marker: "DRUGS ARE LISTED BY GENERIC NAME".to_string(),
            page_marker: "=== PAGE".to_string(),
            boilerplate: vec!["$9.95".to_string(), "drugdoses.com".to_string()],
            max_line_length: 500,
            max_name_length: 80,
            id_prefix: "fs".to_string(),
        }
    }
}

/// Configuration for PDF text extraction
#[derive(Debug, Clone, Default)]
pub struct ExtractConfig {
    /// Page selection (e.g., "1-10,21-30"); all pages when unset
    pub pages: Option<String>,
    /// Keep column alignment as runs of spaces
    pub layout: bool,
    /// Password for encrypted PDFs
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = SegmentConfig::default();
        assert_eq!(config.start_marker, "DRUGS ARE LISTED BY GENERIC NAME");
        assert_eq!(config.max_line_length, 500);
        assert_eq!(config.max_name_length, 80);
        assert_eq!(config.id_prefix, "fs");
        assert!(config.boilerplate.iter().any(|b| b == "drugdoses.com"));

        let extract = ExtractConfig::default();
        assert!(extract.pages.is_none());
        assert!(!extract.layout);
    }
}
