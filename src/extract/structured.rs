//! Line-oriented extraction of structured data from markdown.
//!
//! Each pass (title, authors, abstract, sections, references, figures,
//! tables, keywords) is independent: a field that cannot be located is an
//! empty value, never an error, so a partially garbled upstream document
//! still yields whatever structure is recoverable.

use regex::Regex;

use crate::extract::reference::parse_reference;
use crate::model::{Figure, FlatSection, ParsedDocument};

/// A section split out of the markdown, before tree assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionRecord {
    pub title: String,
    /// Count of leading `#` markers.
    pub level: u8,
    pub content: String,
}

/// A figure reference captured from image syntax or a caption line.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureCapture {
    pub caption: Option<String>,
    pub url: Option<String>,
}

/// A table captured from a caption line and its `|` rows.
#[derive(Debug, Clone, PartialEq)]
pub struct TableCapture {
    pub caption: Option<String>,
    pub content: String,
}

/// Everything the extractor recovers from one markdown document.
#[derive(Debug, Clone, Default)]
pub struct StructuredData {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub abstract_text: Option<String>,
    pub keywords: Vec<String>,
    pub sections: Vec<SectionRecord>,
    pub references: Vec<String>,
    pub figures: Vec<FigureCapture>,
    pub tables: Vec<TableCapture>,
}

impl StructuredData {
    /// Convert into the document model: sections gain their document order,
    /// references are field-parsed, and figures precede tables in the
    /// global figure ordering.
    pub fn into_document(self) -> ParsedDocument {
        let mut doc = ParsedDocument::new();
        doc.title = self.title;
        doc.authors = self.authors;
        doc.abstract_text = self.abstract_text;
        for keyword in self.keywords {
            doc.add_keyword(keyword);
        }

        doc.sections = self
            .sections
            .into_iter()
            .enumerate()
            .map(|(order, s)| FlatSection::new(s.title, s.level as u32, order, s.content))
            .collect();

        doc.references = self
            .references
            .iter()
            .enumerate()
            .map(|(order, raw)| parse_reference(raw, order))
            .collect();

        let figure_count = self.figures.len();
        doc.figures = self
            .figures
            .into_iter()
            .enumerate()
            .map(|(order, f)| Figure::figure(order, f.caption, f.url))
            .chain(
                self.tables
                    .into_iter()
                    .enumerate()
                    .map(|(i, t)| Figure::table(figure_count + i, i, t.caption, t.content)),
            )
            .collect();

        doc
    }
}

struct Patterns {
    abstract_heading: Regex,
    references_heading: Regex,
    numbered_reference: Regex,
    bracketed_reference: Regex,
    image: Regex,
    author_split: Regex,
    title_case_pair: Regex,
    keyword_split: Regex,
}

impl Patterns {
    fn new() -> Self {
        Self {
            abstract_heading: Regex::new(r"(?i)^(#+\s+)?Abstract\b").unwrap(),
            references_heading: Regex::new(r"(?i)^(#+\s+)?(References|Bibliography)\b").unwrap(),
            numbered_reference: Regex::new(r"^\d+\.?\s+").unwrap(),
            bracketed_reference: Regex::new(r"^\[\d+\]\s+").unwrap(),
            image: Regex::new(r"!\[(.*?)\]\((.*?)\)").unwrap(),
            author_split: Regex::new(r",|\band\b").unwrap(),
            title_case_pair: Regex::new(r"\b[A-Z][a-z]+\s+[A-Z][a-z]+\b").unwrap(),
            keyword_split: Regex::new(r"[,;]").unwrap(),
        }
    }
}

/// Markdown-to-structured-data extractor.
pub struct StructuredExtractor<'a> {
    markdown: &'a str,
    lines: Vec<&'a str>,
    patterns: Patterns,
}

impl<'a> StructuredExtractor<'a> {
    pub fn new(markdown: &'a str) -> Self {
        Self {
            markdown,
            lines: markdown.lines().collect(),
            patterns: Patterns::new(),
        }
    }

    /// Run every pass and collect the results.
    pub fn extract(&self) -> StructuredData {
        let (figures, tables) = self.extract_figures_and_tables();
        StructuredData {
            title: self.extract_title(),
            authors: self.extract_authors(),
            abstract_text: self.extract_abstract(),
            keywords: self.extract_keywords(),
            sections: self.extract_sections(),
            references: self.extract_references(),
            figures,
            tables,
        }
    }

    /// First `# ` heading, else the first non-heading non-separator line.
    fn extract_title(&self) -> Option<String> {
        for line in &self.lines {
            if let Some(rest) = line.strip_prefix("# ") {
                return Some(rest.trim().to_string());
            }
        }
        self.lines
            .iter()
            .find(|l| !l.trim().is_empty() && !l.starts_with('#') && !l.starts_with("---"))
            .map(|l| l.trim().to_string())
    }

    fn extract_authors(&self) -> Vec<String> {
        let mut authors = Vec::new();
        let mut in_author_list = false;

        for (i, line) in self.lines.iter().enumerate() {
            if line.to_lowercase().contains("author") && line.contains(':') {
                // "**Authors**: A, B and C"
                if let Some((_, rest)) = line.split_once(':') {
                    authors.extend(
                        self.patterns
                            .author_split
                            .split(rest)
                            .map(|a| a.trim().trim_matches('*'))
                            .filter(|a| !a.is_empty())
                            .map(String::from),
                    );
                }
                break;
            } else if let Some(item) = line.strip_prefix("- ") {
                let after_cue = i > 0 && self.lines[i - 1].to_lowercase().contains("author");
                if after_cue || in_author_list {
                    in_author_list = true;
                    authors.push(item.trim().to_string());
                }
            } else if in_author_list && !line.trim().is_empty() {
                break;
            }
        }

        if authors.is_empty() {
            // Email addresses in the first 20 lines, or two consecutive
            // Title-Case words in the first 10.
            for (i, line) in self.lines.iter().take(20).enumerate() {
                if line.contains('@') && !line.starts_with('#') {
                    authors.push(line.trim().to_string());
                } else if i < 10 && self.patterns.title_case_pair.is_match(line) {
                    authors.push(line.trim().to_string());
                }
            }
        }

        authors
    }

    fn extract_abstract(&self) -> Option<String> {
        let mut collected: Vec<&str> = Vec::new();
        let mut in_abstract = false;

        for line in &self.lines {
            if !in_abstract && self.patterns.abstract_heading.is_match(line) {
                in_abstract = true;
                // An inline "Abstract: ..." label carries content on the
                // same line as the match.
                if let Some((_, rest)) = line.split_once(':') {
                    let rest = rest.trim();
                    if !rest.is_empty() {
                        collected.push(rest);
                    }
                }
            } else if in_abstract && line.starts_with('#') {
                break;
            } else if in_abstract && !line.trim().is_empty() {
                collected.push(line.trim());
            }
        }

        // Fall back to an inline "Abstract: ..." label.
        if collected.is_empty() {
            for (i, line) in self.lines.iter().enumerate() {
                let lower = line.to_lowercase();
                if lower.starts_with("abstract:") || lower.starts_with("**abstract:**") {
                    if let Some((_, rest)) = line.split_once(':') {
                        let rest = rest.trim();
                        if !rest.is_empty() {
                            collected.push(rest);
                        }
                    }
                    for next in &self.lines[i + 1..] {
                        if next.starts_with('#') || next.trim().is_empty() {
                            break;
                        }
                        collected.push(next.trim());
                    }
                    break;
                }
            }
        }

        if collected.is_empty() {
            None
        } else {
            Some(collected.join(" "))
        }
    }

    /// Split at heading markers; level is the count of leading `#`.
    fn extract_sections(&self) -> Vec<SectionRecord> {
        let mut sections = Vec::new();
        let mut current: Option<(String, u8)> = None;
        let mut content: Vec<&str> = Vec::new();

        for line in &self.lines {
            if line.starts_with('#') {
                if let Some((title, level)) = current.take() {
                    sections.push(SectionRecord {
                        title,
                        level,
                        content: content.join("\n"),
                    });
                    content.clear();
                }
                let level = line.chars().take_while(|c| *c == '#').count();
                current = Some((line[level..].trim().to_string(), level.min(6) as u8));
            } else if current.is_some() && !line.trim().is_empty() {
                content.push(line);
            }
        }

        if let Some((title, level)) = current {
            sections.push(SectionRecord {
                title,
                level,
                content: content.join("\n"),
            });
        }

        sections
    }

    fn extract_references(&self) -> Vec<String> {
        let mut references: Vec<String> = Vec::new();
        let mut in_references = false;

        for line in &self.lines {
            if self.patterns.references_heading.is_match(line) {
                in_references = true;
            } else if in_references && line.starts_with('#') {
                break;
            } else if in_references && !line.trim().is_empty() {
                if self.patterns.numbered_reference.is_match(line)
                    || self.patterns.bracketed_reference.is_match(line)
                {
                    references.push(line.trim().to_string());
                } else if let Some(last) = references.last_mut() {
                    last.push(' ');
                    last.push_str(line.trim());
                }
            }
        }

        references
    }

    fn extract_figures_and_tables(&self) -> (Vec<FigureCapture>, Vec<TableCapture>) {
        let mut figures = Vec::new();

        for caps in self.patterns.image.captures_iter(self.markdown) {
            let caption = caps[1].trim();
            let url = caps[2].trim();
            figures.push(FigureCapture {
                caption: (!caption.is_empty()).then(|| caption.to_string()),
                url: (!url.is_empty()).then(|| url.to_string()),
            });
        }

        // Caption-only figures: any line naming a figure with a colon.
        for line in &self.lines {
            if line.to_lowercase().contains("figure") && line.contains(':') {
                if let Some((_, caption)) = line.split_once(':') {
                    let caption = caption.trim();
                    if !caption.is_empty() {
                        figures.push(FigureCapture {
                            caption: Some(caption.to_string()),
                            url: None,
                        });
                    }
                }
            }
        }

        let mut tables = Vec::new();
        let mut in_table = false;
        let mut rows: Vec<&str> = Vec::new();
        let mut caption: Option<String> = None;

        for line in &self.lines {
            if line.to_lowercase().contains("table") && line.contains(':') {
                caption = line
                    .split_once(':')
                    .map(|(_, c)| c.trim().to_string())
                    .filter(|c| !c.is_empty());
                in_table = true;
                rows.clear();
            } else if in_table {
                if line.contains('|') {
                    rows.push(line.trim());
                } else if line.trim().is_empty() && !rows.is_empty() {
                    tables.push(TableCapture {
                        caption: caption.take(),
                        content: rows.join("\n"),
                    });
                    in_table = false;
                    rows.clear();
                }
            }
        }
        if in_table && !rows.is_empty() {
            tables.push(TableCapture {
                caption,
                content: rows.join("\n"),
            });
        }

        (figures, tables)
    }

    /// First "keywords:" line, split on comma or semicolon.
    fn extract_keywords(&self) -> Vec<String> {
        for line in &self.lines {
            if line.to_lowercase().contains("keywords") && line.contains(':') {
                if let Some((_, rest)) = line.split_once(':') {
                    return self
                        .patterns
                        .keyword_split
                        .split(rest)
                        .map(|k| k.trim().trim_matches('*'))
                        .filter(|k| !k.is_empty())
                        .map(String::from)
                        .collect();
                }
            }
        }
        Vec::new()
    }
}

/// Extract structured data from a markdown document.
pub fn extract_structured_data(markdown: &str) -> StructuredData {
    StructuredExtractor::new(markdown).extract()
}
