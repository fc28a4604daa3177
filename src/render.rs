//! Canonical markdown serialization of a [`ParsedDocument`].
//!
//! The output round-trips through the structured extractor: re-extracting
//! from rendered markdown reproduces the same section structure.

use crate::model::ParsedDocument;

/// Render a document back to markdown.
pub fn to_markdown(document: &ParsedDocument) -> String {
    let mut out = String::new();

    let title_is_first_section = match (&document.title, document.sections.first()) {
        (Some(title), Some(first)) => first.title == *title,
        _ => false,
    };
    if let Some(title) = &document.title {
        if !title_is_first_section {
            out.push_str(&format!("# {}\n\n", title));
        }
    }

    if !document.authors.is_empty() {
        out.push_str(&format!("**Authors**: {}\n\n", document.authors.join(", ")));
    }

    if !document.keywords.is_empty() {
        out.push_str(&format!("**Keywords**: {}\n\n", document.keywords.join(", ")));
    }

    let has_abstract_section = document
        .sections
        .iter()
        .any(|s| s.title.eq_ignore_ascii_case("abstract"));
    if let Some(abstract_text) = &document.abstract_text {
        if !has_abstract_section {
            out.push_str("## Abstract\n\n");
            out.push_str(&format!("{}\n\n", abstract_text));
        }
    }

    for section in &document.sections {
        out.push_str(&format!(
            "{} {}\n\n",
            "#".repeat(section.level.clamp(1, 6) as usize),
            section.title
        ));
        if !section.content.trim().is_empty() {
            out.push_str(section.content.trim_end());
            out.push_str("\n\n");
        }
    }

    let has_references_section = document
        .sections
        .iter()
        .any(|s| s.title.eq_ignore_ascii_case("references"));
    if !document.references.is_empty() && !has_references_section {
        out.push_str("## References\n\n");
        for reference in &document.references {
            out.push_str(&format!("{}\n", reference.raw_citation));
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FlatSection, Reference};

    #[test]
    fn test_render_title_and_sections() {
        let mut doc = ParsedDocument::new();
        doc.title = Some("Paper".to_string());
        doc.sections = vec![
            FlatSection::new("Introduction", 1, 0, "Intro body.".to_string()),
            FlatSection::new("Details", 2, 1, "More.".to_string()),
        ];

        let md = to_markdown(&doc);
        assert!(md.starts_with("# Paper\n\n"));
        assert!(md.contains("# Introduction\n\nIntro body.\n\n"));
        assert!(md.contains("## Details\n\nMore.\n\n"));
    }

    #[test]
    fn test_render_skips_duplicate_title_heading() {
        let mut doc = ParsedDocument::new();
        doc.title = Some("Paper".to_string());
        doc.sections = vec![FlatSection::new("Paper", 1, 0, String::new())];

        let md = to_markdown(&doc);
        assert_eq!(md.matches("# Paper").count(), 1);
    }

    #[test]
    fn test_render_references_once() {
        let mut doc = ParsedDocument::new();
        doc.references = vec![Reference::raw("1. Smith. A Title. 2020.", 0)];

        let md = to_markdown(&doc);
        assert!(md.contains("## References\n\n1. Smith. A Title. 2020.\n"));
    }

    #[test]
    fn test_render_metadata_lines() {
        let mut doc = ParsedDocument::new();
        doc.title = Some("T".to_string());
        doc.authors = vec!["Ada".to_string(), "Alan".to_string()];
        doc.add_keyword("parsing");

        let md = to_markdown(&doc);
        assert!(md.contains("**Authors**: Ada, Alan\n\n"));
        assert!(md.contains("**Keywords**: parsing\n\n"));
    }
}
