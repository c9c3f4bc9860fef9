// src/report.rs
// =============================================================================
// The analysis report handed back to callers.
//
// A report is built fresh for every analysis: the structural extractor fills
// in the document facts, the link checker adds the link counters, and the
// analyzer finally stamps the elapsed time and URL on it.
//
// The serde attributes give the JSON output stable camelCase field names.
// =============================================================================

use serde::Serialize;

/// Which flavour of HTML the document declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DocumentVersion {
    #[serde(rename = "HTML5")]
    Html5,
    #[serde(rename = "Older HTML or XHTML")]
    LegacyOrXhtml,
}

impl DocumentVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentVersion::Html5 => "HTML5",
            DocumentVersion::LegacyOrXhtml => "Older HTML or XHTML",
        }
    }
}

/// Number of <h1> .. <h6> elements on the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Headings {
    pub h1: usize,
    pub h2: usize,
    pub h3: usize,
    pub h4: usize,
    pub h5: usize,
    pub h6: usize,
}

impl Headings {
    // Bumps the counter for heading level 1..=6; other levels are ignored.
    pub fn increment(&mut self, level: u8) {
        match level {
            1 => self.h1 += 1,
            2 => self.h2 += 1,
            3 => self.h3 += 1,
            4 => self.h4 += 1,
            5 => self.h5 += 1,
            6 => self.h6 += 1,
            _ => {}
        }
    }

    pub fn total(&self) -> usize {
        self.h1 + self.h2 + self.h3 + self.h4 + self.h5 + self.h6
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    #[serde(rename = "htmlVersion")]
    pub document_version: Option<DocumentVersion>,
    pub page_title: String,
    pub headings: Headings,
    pub internal_links: usize,
    pub external_links: usize,
    pub inaccessible_internal_links: usize,
    pub inaccessible_external_links: usize,
    pub login_form_detected: bool,
    #[serde(rename = "timeTakenToAnalyze")]
    pub elapsed_seconds: f64,
    pub url: String,
}

impl AnalysisReport {
    pub fn total_links(&self) -> usize {
        self.internal_links + self.external_links
    }

    pub fn inaccessible_links(&self) -> usize {
        self.inaccessible_internal_links + self.inaccessible_external_links
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_increment() {
        let mut headings = Headings::default();
        headings.increment(1);
        headings.increment(3);
        headings.increment(3);
        headings.increment(7);
        assert_eq!(headings.h1, 1);
        assert_eq!(headings.h3, 2);
        assert_eq!(headings.total(), 3);
    }

    #[test]
    fn test_json_field_names() {
        let report = AnalysisReport {
            document_version: Some(DocumentVersion::LegacyOrXhtml),
            page_title: "Docs".to_string(),
            internal_links: 2,
            inaccessible_internal_links: 1,
            url: "https://example.com".to_string(),
            ..Default::default()
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["htmlVersion"], "Older HTML or XHTML");
        assert_eq!(json["pageTitle"], "Docs");
        assert_eq!(json["headings"]["h2"], 0);
        assert_eq!(json["internalLinks"], 2);
        assert_eq!(json["inaccessibleInternalLinks"], 1);
        assert_eq!(json["loginFormDetected"], false);
        assert_eq!(json["timeTakenToAnalyze"], 0.0);
        assert_eq!(json["url"], "https://example.com");
    }

    #[test]
    fn test_unset_version_serializes_as_null() {
        let json = serde_json::to_value(AnalysisReport::default()).unwrap();
        assert!(json["htmlVersion"].is_null());
    }
}
