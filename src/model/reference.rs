//! Reference (citation) records.

use serde::{Deserialize, Serialize};

/// A citation from the paper's reference list.
///
/// `raw_citation` is always present; the remaining fields are best-effort
/// pattern-matching results and stay `None` when nothing plausible is found.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reference {
    /// Original citation text from the document.
    pub raw_citation: String,

    /// Zero-based position in the reference list; unique per document.
    pub order: usize,

    /// Cited work's title, if one could be isolated.
    pub title: Option<String>,

    /// Author list, if one could be isolated.
    pub authors: Option<Vec<String>>,

    /// Publication year.
    pub year: Option<u16>,

    /// Journal or conference name.
    pub venue: Option<String>,

    /// DOI, without resolver prefix.
    pub doi: Option<String>,

    /// A URL appearing in the citation.
    pub url: Option<String>,
}

impl Reference {
    /// Create a reference with only the raw citation text populated.
    pub fn raw(raw_citation: impl Into<String>, order: usize) -> Self {
        Self {
            raw_citation: raw_citation.into(),
            order,
            title: None,
            authors: None,
            year: None,
            venue: None,
            doi: None,
            url: None,
        }
    }

    /// Append continuation text to the raw citation, space-joined.
    pub fn append_continuation(&mut self, text: &str) {
        let text = text.trim();
        if !text.is_empty() {
            self.raw_citation.push(' ');
            self.raw_citation.push_str(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continuation_joins_with_space() {
        let mut r = Reference::raw("Smith et al. Title.", 0);
        r.append_continuation("continued text.");
        assert_eq!(r.raw_citation, "Smith et al. Title. continued text.");
    }

    #[test]
    fn test_empty_continuation_is_noop() {
        let mut r = Reference::raw("Doe 2021.", 4);
        r.append_continuation("   ");
        assert_eq!(r.raw_citation, "Doe 2021.");
        assert_eq!(r.order, 4);
    }
}
