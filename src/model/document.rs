//! Document-level types.

use serde::{Deserialize, Serialize};

use super::{Figure, FlatSection, Reference};

/// A parsed academic paper.
///
/// Produced once per parse attempt and immutable by convention afterwards:
/// the heuristic passes that build it never revisit earlier fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Paper title, when one could be located.
    pub title: Option<String>,

    /// Authors in document order.
    pub authors: Vec<String>,

    /// Abstract text.
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,

    /// Keywords, deduplicated, in order of first appearance.
    pub keywords: Vec<String>,

    /// Flat section records in document order (pre tree assembly).
    pub sections: Vec<FlatSection>,

    /// References in reference-list order.
    pub references: Vec<Reference>,

    /// Figures and tables, globally ordered (figures first, then tables).
    pub figures: Vec<Figure>,
}

impl ParsedDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of flat sections.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Whether any structural content was extracted at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.sections.is_empty()
            && self.references.is_empty()
            && self.figures.is_empty()
    }

    /// Add a keyword unless an equal one (case-insensitive) is present.
    pub fn add_keyword(&mut self, keyword: impl Into<String>) {
        let keyword = keyword.into();
        let lower = keyword.to_lowercase();
        if !self.keywords.iter().any(|k| k.to_lowercase() == lower) {
            self.keywords.push(keyword);
        }
    }
}

/// Processing lifecycle of a document moving through the pipeline.
///
/// User-visible failure is only ever this status plus a stored error string;
/// errors never propagate past the pipeline boundary as panics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Completed,
    Failed {
        /// Stored error message for the caller-facing boundary.
        error: String,
    },
}

impl ProcessingStatus {
    /// Whether this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProcessingStatus::Completed | ProcessingStatus::Failed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = ParsedDocument::new();
        assert!(doc.is_empty());
        assert_eq!(doc.section_count(), 0);
    }

    #[test]
    fn test_keyword_dedup() {
        let mut doc = ParsedDocument::new();
        doc.add_keyword("transformers");
        doc.add_keyword("Transformers");
        doc.add_keyword("attention");
        assert_eq!(doc.keywords, vec!["transformers", "attention"]);
    }

    #[test]
    fn test_status_terminal() {
        assert!(!ProcessingStatus::Processing.is_terminal());
        assert!(ProcessingStatus::Completed.is_terminal());
        assert!(ProcessingStatus::Failed {
            error: "boom".into()
        }
        .is_terminal());
    }
}
