//! Layout-heuristic parsing of academic papers.
//!
//! Turns the positioned text blocks produced by [`crate::parser::layout`]
//! into a Markdown document: title and author detection on the first page,
//! heading classification by font size and styling, reference splitting,
//! and a serializer emitting the canonical section layout.
//!
//! Every failure path degrades instead of propagating: a structural parse
//! error falls back to raw byte-level extraction, and the caller always
//! receives a Markdown string.

use std::path::Path;

use regex::Regex;

use crate::error::Result;
use crate::parser::backend::{LopdfBackend, StructureBackend};
use crate::parser::layout::{LayoutAnalyzer, TextBlock};
use crate::parser::options::ParseOptions;
use crate::parser::raw_text;

/// Section names that always classify as headings, regardless of styling.
const CANONICAL_SECTIONS: &[&str] = &[
    "abstract",
    "introduction",
    "methods",
    "results",
    "discussion",
    "conclusion",
    "references",
    "acknowledgments",
];

/// Trailing note appended to every successfully serialized document.
pub const PROVENANCE_NOTE: &str =
    "\n\n> Note: This document was processed with the layout-heuristic academic parser.\n";

/// A section accumulated during heading detection.
#[derive(Debug, Clone)]
struct OutlineSection {
    heading: String,
    level: u8,
    content: Vec<String>,
}

impl OutlineSection {
    fn new(heading: impl Into<String>, level: u8) -> Self {
        Self {
            heading: heading.into(),
            level,
            content: Vec::new(),
        }
    }
}

/// Intermediate document state shared by the structured and fallback paths.
#[derive(Debug, Default)]
struct Outline {
    title: Option<String>,
    authors: Vec<String>,
    abstract_text: Option<String>,
    sections: Vec<OutlineSection>,
    references: Vec<String>,
    /// Index into `sections` of the references section, when detected.
    references_idx: Option<usize>,
}

struct Patterns {
    numbered_heading: Regex,
    reference_entry: Regex,
    refs_heading: Regex,
    abstract_capture: Regex,
    tj_title: Regex,
    tj_any: Regex,
    tj_caps: Regex,
    tj_content: Regex,
    trailing_tj: Regex,
    numbered_line: Regex,
    title_case_line: Regex,
    alpha_word: Regex,
    outer_parens: Regex,
}

impl Patterns {
    fn new() -> Self {
        Self {
            numbered_heading: Regex::new(r"^\d+\.?\s+[A-Z][a-z]+").unwrap(),
            reference_entry: Regex::new(r"^(?:\[\d+\]|\d+\.)\s+(.+)").unwrap(),
            refs_heading: Regex::new(r"(?i)^(references|bibliography)").unwrap(),
            abstract_capture: Regex::new(
                r"(?s)(?i:abstract)[:.\s]*(.+?)(?:\n\s*\n|\n[A-Z]|\n\d\.|\n[I1]\.|\z)",
            )
            .unwrap(),
            tj_title: Regex::new(r"\(([A-Z][^)]+)\)\s+Tj").unwrap(),
            tj_any: Regex::new(r"\([^)]+\)\s+Tj").unwrap(),
            tj_caps: Regex::new(r"\(([A-Z][A-Z\s]+)\)\s+Tj").unwrap(),
            tj_content: Regex::new(r"\(([^)]+)\)\s+Tj").unwrap(),
            trailing_tj: Regex::new(r"\s+Tj").unwrap(),
            numbered_line: Regex::new(r"^\d+\.?\s+[A-Z]").unwrap(),
            title_case_line: Regex::new(r"^[A-Z][a-z]+(\s+[A-Z][a-z]+)*\s*$").unwrap(),
            alpha_word: Regex::new(r"[A-Za-z]{3,}").unwrap(),
            outer_parens: Regex::new(r"^\((.*)\)$").unwrap(),
        }
    }
}

/// Academic paper parser producing Markdown from a PDF.
pub struct AcademicParser {
    options: ParseOptions,
    patterns: Patterns,
}

impl AcademicParser {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            patterns: Patterns::new(),
        }
    }

    /// Parse a PDF file into Markdown. Never fails: structural parse errors
    /// fall back to raw byte-level extraction, and an unextractable document
    /// yields a minimal placeholder.
    pub fn parse_path<P: AsRef<Path>>(&self, path: P) -> String {
        let path = path.as_ref();
        let fallback_title = self
            .options
            .fallback_title
            .clone()
            .or_else(|| title_from_stem(path));

        match LopdfBackend::open(path) {
            Ok(backend) => match self.parse_backend(&backend, fallback_title.clone()) {
                Ok(markdown) => markdown,
                Err(e) => {
                    log::warn!("structural parse failed ({e}), falling back to raw extraction");
                    let text = raw_text::extract_text_from_pdf(path);
                    self.parse_fallback_text(&text)
                }
            },
            Err(e) => {
                log::warn!("could not open PDF structure ({e}), falling back to raw extraction");
                let text = raw_text::extract_text_from_pdf(path);
                self.parse_fallback_text(&text)
            }
        }
    }

    /// Parse in-memory PDF bytes into Markdown.
    pub fn parse_bytes(&self, data: &[u8]) -> String {
        self.parse_bytes_with_title(data, self.options.fallback_title.clone())
    }

    /// Like [`parse_bytes`](Self::parse_bytes), deriving the fallback title
    /// from the source's file name when the options do not set one.
    pub fn parse_bytes_named(&self, data: &[u8], name: &str) -> String {
        let fallback_title = self
            .options
            .fallback_title
            .clone()
            .or_else(|| title_from_stem(Path::new(name)));
        self.parse_bytes_with_title(data, fallback_title)
    }

    fn parse_bytes_with_title(&self, data: &[u8], fallback_title: Option<String>) -> String {
        match LopdfBackend::from_bytes(data) {
            Ok(backend) => match self.parse_backend(&backend, fallback_title) {
                Ok(markdown) => markdown,
                Err(e) => {
                    log::warn!("structural parse failed ({e}), falling back to raw extraction");
                    self.parse_fallback_text(&raw_text::extract_text_from_bytes(data))
                }
            },
            Err(e) => {
                log::warn!("could not open PDF structure ({e}), falling back to raw extraction");
                self.parse_fallback_text(&raw_text::extract_text_from_bytes(data))
            }
        }
    }

    /// Structured parse over an open backend. The backend handle is released
    /// by the caller's scope on every exit path.
    fn parse_backend<B: StructureBackend>(
        &self,
        backend: &B,
        fallback_title: Option<String>,
    ) -> Result<String> {
        let analyzer = LayoutAnalyzer::new(backend);
        let pages = backend.pages();
        log::info!("opened PDF with {} pages", pages.len());

        let mut outline = Outline::default();

        // Blocks in reading order, page by page.
        let mut all_blocks: Vec<TextBlock> = Vec::new();
        let mut first_page_blocks: Vec<TextBlock> = Vec::new();
        for (i, (_, page_id)) in pages.iter().enumerate() {
            let blocks = analyzer.page_blocks(*page_id)?;
            if i == 0 {
                first_page_blocks = blocks.clone();
            }
            all_blocks.extend(blocks);
        }

        self.extract_metadata(&mut outline, &first_page_blocks, fallback_title);
        self.detect_sections(&mut outline, &all_blocks);
        self.process_references(&mut outline);

        Ok(self.to_markdown(&outline))
    }

    /// Title, authors, and abstract from the first page.
    fn extract_metadata(
        &self,
        outline: &mut Outline,
        first_page: &[TextBlock],
        fallback_title: Option<String>,
    ) {
        // Title is the first span above the heading size threshold within
        // the top three blocks; the next such span is an author line.
        for block in first_page.iter().take(3) {
            for span in block.spans() {
                if span.font_size > self.options.heading_min_size {
                    let text = span.text.trim();
                    if text.is_empty() {
                        continue;
                    }
                    if outline.title.is_none() {
                        outline.title = Some(text.to_string());
                    } else if outline.authors.is_empty() {
                        outline.authors.push(text.to_string());
                    }
                }
            }
        }

        if outline.title.is_none() {
            outline.title = fallback_title;
        }

        let page_text = first_page
            .iter()
            .map(|b| {
                b.lines
                    .iter()
                    .map(|l| l.text())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        if let Some(caps) = self.patterns.abstract_capture.captures(&page_text) {
            let text = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
            if !text.is_empty() {
                outline.abstract_text = Some(text.to_string());
            }
        }
    }

    /// Walk every line of every block and split the document at headings.
    fn detect_sections(&self, outline: &mut Outline, blocks: &[TextBlock]) {
        let mut sections = vec![OutlineSection::new("Introduction", 1)];

        for block in blocks {
            for line in &block.lines {
                let text = line.text().trim().to_string();
                if text.is_empty() {
                    continue;
                }

                let span = match line.spans.first() {
                    Some(s) => s,
                    None => continue,
                };

                if self.is_heading(&text, span.font_size, span.is_bold) {
                    let level = if span.font_size > self.options.level1_min_size
                        || is_all_uppercase(&text)
                    {
                        1
                    } else {
                        2
                    };
                    sections.push(OutlineSection::new(text, level));
                } else {
                    sections
                        .last_mut()
                        .expect("sections starts non-empty")
                        .content
                        .push(text);
                }
            }
        }

        outline.references_idx = sections
            .iter()
            .position(|s| self.patterns.refs_heading.is_match(&s.heading));
        outline.sections = sections;
    }

    fn is_heading(&self, text: &str, font_size: f32, is_bold: bool) -> bool {
        let short = text.len() < self.options.max_heading_len;
        (font_size > self.options.heading_min_size && short)
            || (is_bold && short && is_all_uppercase(text))
            || self.patterns.numbered_heading.is_match(text)
            || CANONICAL_SECTIONS.contains(&text.to_lowercase().as_str())
    }

    /// Split the references section into individual citations, merging
    /// continuation lines into the preceding entry.
    fn process_references(&self, outline: &mut Outline) {
        let idx = match outline.references_idx {
            Some(i) => i,
            None => return,
        };

        let mut references: Vec<String> = Vec::new();
        for line in &outline.sections[idx].content {
            if let Some(caps) = self.patterns.reference_entry.captures(line) {
                references.push(caps[1].trim().to_string());
            } else if let Some(last) = references.last_mut() {
                if !line.is_empty() {
                    last.push(' ');
                    last.push_str(line);
                }
            }
        }
        outline.references = references;
    }

    fn to_markdown(&self, outline: &Outline) -> String {
        let mut out = String::new();

        if let Some(title) = &outline.title {
            out.push_str(&format!("# {}\n", title));
        }

        if !outline.authors.is_empty() {
            out.push_str(&format!("**Authors**: {}\n", outline.authors.join(", ")));
        }

        if let Some(abstract_text) = &outline.abstract_text {
            out.push_str("## Abstract\n");
            out.push_str(&format!("{}\n", abstract_text));
        }

        for (i, section) in outline.sections.iter().enumerate() {
            if outline.references_idx == Some(i) && !outline.references.is_empty() {
                continue;
            }

            out.push_str(&format!(
                "{} {}\n",
                "#".repeat(section.level as usize),
                section.heading
            ));

            // Group content lines into paragraphs at blank separators.
            let mut paragraph: Vec<&str> = Vec::new();
            for text in &section.content {
                if text.trim().is_empty() {
                    if !paragraph.is_empty() {
                        out.push_str(&format!("{}\n\n", paragraph.join(" ")));
                        paragraph.clear();
                    }
                } else {
                    paragraph.push(text);
                }
            }
            if !paragraph.is_empty() {
                out.push_str(&format!("{}\n\n", paragraph.join(" ")));
            }
        }

        if !outline.references.is_empty() {
            out.push_str("## References\n");
            for (i, reference) in outline.references.iter().enumerate() {
                out.push_str(&format!("{}. {}\n", i + 1, reference));
            }
        }

        if self.options.provenance_note {
            out.push_str(PROVENANCE_NOTE);
        }

        out
    }

    /// Second-pass heuristics over raw extracted text, used when no PDF
    /// structure is recoverable. Never fails.
    pub fn parse_fallback_text(&self, text: &str) -> String {
        if text.trim().is_empty() || text.starts_with("Failed to extract text") {
            // Nothing recoverable at all.
            return "# ACADEMIC PAPER TITLE\n# Introduction".to_string();
        }

        let mut outline = Outline::default();
        outline.title = Some(self.fallback_title(text));

        if self.patterns.tj_any.is_match(text) {
            self.fallback_sections_from_tj(&mut outline, text);
        } else {
            self.fallback_sections_from_lines(&mut outline, text);
        }

        // When no section collected real content, degrade to pseudo
        // paragraphs built from alphabetic runs.
        if outline.sections.iter().all(|s| s.content.is_empty()) {
            let words: Vec<&str> = self
                .patterns
                .alpha_word
                .find_iter(text)
                .map(|m| m.as_str())
                .collect();
            let first = outline
                .sections
                .first_mut()
                .expect("fallback sections start non-empty");
            if words.len() > 20 {
                first.content = words
                    .chunks(20)
                    .map(|chunk| chunk.join(" "))
                    .collect();
            } else {
                first.content = vec!["Document content could not be fully extracted.".to_string()];
            }
        }

        self.scrub_fallback_artifacts(&mut outline);

        self.to_markdown(&outline)
    }

    /// Title candidate from raw text: a parenthesized text-show run starting
    /// with a capital, else the first plausible short line.
    fn fallback_title(&self, text: &str) -> String {
        if let Some(caps) = self.patterns.tj_title.captures(text) {
            let candidate = caps[1].trim().to_string();
            if !candidate.is_empty()
                && !candidate.to_lowercase().starts_with("/f")
                && candidate.len() < 100
            {
                return candidate;
            }
        }

        for line in text.lines().take(10) {
            let line = line.trim();
            if !line.is_empty()
                && line.len() < 100
                && !is_all_lowercase(line)
                && !line.starts_with(['%', '[', '{', '<'])
            {
                return line.to_string();
            }
        }

        "ACADEMIC PAPER TITLE".to_string()
    }

    /// Section recovery from text that still carries `(...) Tj` show
    /// operators: all-caps parenthesized runs become headings, everything
    /// else between them becomes content.
    fn fallback_sections_from_tj(&self, outline: &mut Outline, text: &str) {
        let title = outline.title.clone().unwrap_or_default();
        let mut sections = vec![OutlineSection::new("Introduction", 1)];
        let mut prev_pos = 0;

        let heading_spans: Vec<(usize, usize, String)> = self
            .patterns
            .tj_caps
            .captures_iter(text)
            .filter_map(|caps| {
                let m = caps.get(0)?;
                let heading = caps[1].trim().to_string();
                if heading.len() < 30 && heading == heading.to_uppercase() && heading != title {
                    Some((m.start(), m.end(), heading))
                } else {
                    None
                }
            })
            .collect();

        for (start, end, heading) in heading_spans {
            let current = sections.last_mut().expect("sections non-empty");
            self.collect_tj_content(current, &text[prev_pos..start], &title);

            if heading.contains("ABSTRACT") {
                outline.abstract_text = Some(String::new());
            }

            sections.push(OutlineSection::new(to_title_case(&heading), 1));
            prev_pos = end;
        }

        if prev_pos < text.len() {
            let current = sections.last_mut().expect("sections non-empty");
            self.collect_tj_content(current, &text[prev_pos..], &title);
            if current.heading.eq_ignore_ascii_case("abstract") {
                if let Some(last) = current.content.last() {
                    outline.abstract_text = Some(last.clone());
                }
            }
        }

        // No real structure found: flatten everything into the first section.
        if sections.len() <= 1 && sections[0].content.is_empty() {
            let mut all_text = Vec::new();
            for caps in self.patterns.tj_content.captures_iter(text) {
                let content = caps[1].trim().to_string();
                if !content.is_empty() && content != title && content.len() > 10 {
                    all_text.push(content);
                }
            }
            sections[0].content = all_text;
        }

        outline.sections = sections;
    }

    fn collect_tj_content(&self, section: &mut OutlineSection, chunk: &str, title: &str) {
        for caps in self.patterns.tj_content.captures_iter(chunk) {
            let content = caps[1].trim().to_string();
            if !content.is_empty()
                && content != section.heading
                && content != title
                && content.len() > 10
            {
                section.content.push(content);
            }
        }
    }

    /// Section recovery from plain extracted text: split on all-caps lines,
    /// Title-Case lines, and numbered headings; capture the abstract as the
    /// run of long lines after an "abstract" heading.
    fn fallback_sections_from_lines(&self, outline: &mut Outline, text: &str) {
        let mut sections = vec![OutlineSection::new("Introduction", 1)];
        let mut in_abstract = false;
        let mut abstract_lines: Vec<String> = Vec::new();

        // First line is the title candidate, already consumed.
        for line in text.lines().skip(1) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let caps_or_title_case = line.to_uppercase() == line
                || self.patterns.title_case_line.is_match(line);

            if line.len() < 50 && caps_or_title_case {
                sections.push(OutlineSection::new(line, 1));
                if line.to_lowercase().contains("abstract") {
                    in_abstract = true;
                }
                continue;
            }

            if in_abstract {
                if line.len() > 10 {
                    abstract_lines.push(line.to_string());
                } else {
                    // A short line terminates the abstract and may itself
                    // be a heading.
                    in_abstract = false;
                    outline.abstract_text = Some(abstract_lines.join(" "));
                    if line.len() > 3 {
                        sections.push(OutlineSection::new(line, 1));
                    }
                }
            } else if self.patterns.numbered_line.is_match(line) && line.len() < 80 {
                sections.push(OutlineSection::new(line, 1));
            } else if line.split_whitespace().count() >= 5 {
                sections
                    .last_mut()
                    .expect("sections non-empty")
                    .content
                    .push(line.to_string());
            }
        }

        if in_abstract && !abstract_lines.is_empty() {
            outline.abstract_text = Some(abstract_lines.join(" "));
        }

        outline.sections = sections;
    }

    /// Strip residual text-show markers, and outer parentheses inside a
    /// references section.
    fn scrub_fallback_artifacts(&self, outline: &mut Outline) {
        for section in &mut outline.sections {
            let in_references = section.heading.to_uppercase() == "REFERENCES";
            for item in &mut section.content {
                let mut cleaned = self.patterns.trailing_tj.replace_all(item, "").to_string();
                if in_references {
                    if let Some(caps) = self.patterns.outer_parens.captures(&cleaned) {
                        cleaned = caps[1].to_string();
                    }
                }
                *item = cleaned;
            }
        }
    }
}

impl Default for AcademicParser {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

/// Markdown document reporting a fatal processing failure. Returned instead
/// of propagating an error at the outermost parsing boundary.
pub fn processing_error_markdown(error: &crate::error::Error) -> String {
    format!("# Processing Error\n\nThere was an error processing the PDF: {error}")
}

/// File-stem fallback title for documents without a detectable title span.
fn title_from_stem(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().to_string())
}

fn is_all_uppercase(text: &str) -> bool {
    let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
    !letters.is_empty() && letters.iter().all(|c| c.is_uppercase())
}

fn is_all_lowercase(text: &str) -> bool {
    let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
    !letters.is_empty() && letters.iter().all(|c| c.is_lowercase())
}

/// "RELATED WORK" -> "Related Work".
fn to_title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> AcademicParser {
        AcademicParser::default()
    }

    #[test]
    fn test_heading_classification() {
        let p = parser();
        assert!(p.is_heading("Introduction", 10.0, false));
        assert!(p.is_heading("RELATED WORK", 10.0, true));
        assert!(p.is_heading("1. Background", 10.0, false));
        assert!(p.is_heading("Some Large Line", 13.0, false));
        assert!(!p.is_heading("a regular sentence of body text", 10.0, false));
        // Bold alone is not enough without uppercase.
        assert!(!p.is_heading("Bold body text", 10.0, true));
    }

    #[test]
    fn test_title_from_stem() {
        assert_eq!(
            title_from_stem(Path::new("papers/attention-is-all.pdf")).as_deref(),
            Some("attention-is-all")
        );
        assert_eq!(title_from_stem(Path::new("")), None);
    }

    #[test]
    fn test_metadata_uses_fallback_title_when_no_title_span() {
        let p = parser();
        let mut outline = Outline::default();
        p.extract_metadata(&mut outline, &[], Some("upload.pdf title".to_string()));
        assert_eq!(outline.title.as_deref(), Some("upload.pdf title"));
    }

    #[test]
    fn test_heading_rejects_long_lines() {
        let p = parser();
        let long = "A".repeat(120);
        assert!(!p.is_heading(&long, 16.0, true));
        // Numbered pattern still matches regardless of length.
        assert!(p.is_heading("1. Background", 10.0, false));
    }

    #[test]
    fn test_reference_continuation_merges() {
        let p = parser();
        let mut outline = Outline::default();
        let mut refs = OutlineSection::new("References", 1);
        refs.content = vec![
            "1. Smith et al. Title.".to_string(),
            "continued text.".to_string(),
        ];
        outline.sections = vec![refs];
        outline.references_idx = Some(0);

        p.process_references(&mut outline);
        assert_eq!(outline.references.len(), 1);
        assert_eq!(outline.references[0], "Smith et al. Title. continued text.");
    }

    #[test]
    fn test_bracketed_references() {
        let p = parser();
        let mut outline = Outline::default();
        let mut refs = OutlineSection::new("References", 1);
        refs.content = vec![
            "[1] First citation.".to_string(),
            "[2] Second citation.".to_string(),
        ];
        outline.sections = vec![refs];
        outline.references_idx = Some(0);

        p.process_references(&mut outline);
        assert_eq!(outline.references.len(), 2);
        assert_eq!(outline.references[1], "Second citation.");
    }

    #[test]
    fn test_markdown_serialization() {
        let p = parser();
        let mut outline = Outline::default();
        outline.title = Some("Deep Learning Study".to_string());
        outline.authors = vec!["Jane Doe, John Roe".to_string()];
        outline.abstract_text = Some("We study things.".to_string());
        let mut intro = OutlineSection::new("Introduction", 1);
        intro.content = vec!["First line.".to_string(), "Second line.".to_string()];
        outline.sections = vec![intro];
        outline.references = vec!["Smith 2020.".to_string()];

        let md = p.to_markdown(&outline);
        assert!(md.starts_with("# Deep Learning Study\n"));
        assert!(md.contains("**Authors**: Jane Doe, John Roe\n"));
        assert!(md.contains("## Abstract\nWe study things.\n"));
        assert!(md.contains("# Introduction\nFirst line. Second line.\n\n"));
        assert!(md.contains("## References\n1. Smith 2020.\n"));
        assert!(md.trim_end().ends_with("layout-heuristic academic parser."));
    }

    #[test]
    fn test_references_section_skipped_in_body() {
        let p = parser();
        let mut outline = Outline::default();
        outline.title = Some("T".to_string());
        let mut refs = OutlineSection::new("References", 1);
        refs.content = vec!["1. A citation.".to_string()];
        outline.sections = vec![OutlineSection::new("Introduction", 1), refs];
        outline.references_idx = Some(1);
        p.process_references(&mut outline);

        let md = p.to_markdown(&outline);
        // The references section renders once, as the numbered list.
        assert_eq!(md.matches("References").count(), 1);
        assert!(md.contains("## References\n1. A citation.\n"));
    }

    #[test]
    fn test_fallback_on_unextractable_input() {
        let p = parser();
        let md = p.parse_fallback_text("Failed to extract text: nothing there");
        assert_eq!(md, "# ACADEMIC PAPER TITLE\n# Introduction");
    }

    #[test]
    fn test_fallback_plain_text_sections() {
        let p = parser();
        let text = "A Study of Parsing\n\
                    ABSTRACT\n\
                    This paper describes a novel parsing approach in detail.\n\
                    1. Intro\n\
                    The introduction has at least five words here.\n\
                    METHODS\n\
                    The methods section also has five words minimum.\n";
        let md = p.parse_fallback_text(text);
        assert!(md.starts_with("# A Study of Parsing\n"));
        assert!(md.contains(
            "## Abstract\nThis paper describes a novel parsing approach in detail.\n"
        ));
        assert!(md.contains("# ABSTRACT\n"));
        assert!(md.contains("# 1. Intro\n"));
        assert!(md.contains("# METHODS\n"));
        assert!(md.contains("The methods section also has five words minimum."));
    }

    #[test]
    fn test_fallback_abstract_capture() {
        let p = parser();
        let text = "Paper Title\n\
                    Abstract\n\
                    This is a long abstract line with plenty of content.\n\
                    Intro\n";
        let md = p.parse_fallback_text(text);
        assert!(md.contains("## Abstract\nThis is a long abstract line with plenty of content.\n"));
    }

    #[test]
    fn test_fallback_tj_sections() {
        let p = parser();
        let text = "(A Neural Approach) Tj\n\
                    (INTRODUCTION) Tj\n\
                    (This is the introduction content text) Tj\n\
                    (METHODS) Tj\n\
                    (This is the methods content text here) Tj\n";
        let md = p.parse_fallback_text(text);
        assert!(md.starts_with("# A Neural Approach\n"));
        assert!(md.contains("# Introduction\n"));
        assert!(md.contains("# Methods\n"));
        assert!(md.contains("This is the methods content text here"));
        assert!(!md.contains(" Tj"));
    }

    #[test]
    fn test_fallback_title_skips_markup_lines() {
        let p = parser();
        let text = "%PDF-1.4 junk\nReal Title Here\nbody content line with five words\n";
        assert_eq!(p.fallback_title(text), "Real Title Here");
    }

    #[test]
    fn test_processing_error_markdown() {
        let err = crate::error::Error::PdfParse("bad xref".to_string());
        let md = processing_error_markdown(&err);
        assert!(md.starts_with("# Processing Error\n"));
        assert!(md.contains("bad xref"));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(to_title_case("RELATED WORK"), "Related Work");
        assert_eq!(to_title_case("METHODS"), "Methods");
    }
}
