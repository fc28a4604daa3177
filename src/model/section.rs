//! Section records: flat (as extracted) and hierarchical (as assembled).

use serde::{Deserialize, Serialize};

/// A flat section record as produced by the extractors, before tree assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatSection {
    /// Heading text, without markdown markers.
    pub title: String,

    /// Heading level, 1 = top.
    pub level: u32,

    /// Zero-based position in document order.
    pub order: usize,

    /// Markdown body text of the section.
    pub content: String,

    /// Word count of the content.
    pub word_count: usize,

    /// Content contains image syntax or figure captions.
    pub has_figures: bool,

    /// Content contains pipe-table rows or table captions.
    pub has_tables: bool,

    /// Content contains LaTeX-delimited math.
    pub has_equations: bool,

    /// Section-local keywords (populated by callers, empty by default).
    pub keywords: Vec<String>,
}

impl FlatSection {
    /// Create a section record, deriving word count and content flags.
    pub fn new(
        title: impl Into<String>,
        level: u32,
        order: usize,
        content: impl Into<String>,
    ) -> Self {
        let title = title.into();
        let content = content.into();
        let word_count = content.split_whitespace().count();
        let has_figures = content_has_figures(&content);
        let has_tables = content_has_tables(&content);
        let has_equations = content_has_equations(&content);
        Self {
            title,
            level: level.max(1),
            order,
            content,
            word_count,
            has_figures,
            has_tables,
            has_equations,
            keywords: Vec::new(),
        }
    }

    /// Surrogate key for this section.
    pub fn key(&self) -> SectionKey {
        SectionKey {
            order: self.order,
            title: self.title.clone(),
        }
    }
}

fn content_has_figures(content: &str) -> bool {
    if content.contains("![") {
        return true;
    }
    content.lines().any(|line| {
        let lower = line.trim().to_lowercase();
        lower.starts_with("figure") && lower.contains(':')
    })
}

fn content_has_tables(content: &str) -> bool {
    content.lines().any(|line| {
        let trimmed = line.trim();
        if trimmed.matches('|').count() >= 2 {
            return true;
        }
        let lower = trimmed.to_lowercase();
        lower.starts_with("table") && lower.contains(':')
    })
}

fn content_has_equations(content: &str) -> bool {
    content.contains("\\begin{equation}") || content.matches('$').count() >= 2
}

/// Identity of a section within one parse.
///
/// Titles repeat in real papers ("Discussion" under multiple experiments),
/// so assembly and move operations key on (order, title), never title alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SectionKey {
    pub order: usize,
    pub title: String,
}

impl SectionKey {
    pub fn new(order: usize, title: impl Into<String>) -> Self {
        Self {
            order,
            title: title.into(),
        }
    }
}

impl std::fmt::Display for SectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.title, self.order)
    }
}

/// A node in the assembled section forest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionNode {
    /// Surrogate key carried over from the flat record.
    pub key: SectionKey,

    /// Heading text.
    pub title: String,

    /// Heading level, 1 = top.
    pub level: u32,

    /// Zero-based position among siblings, contiguous after assembly.
    pub order: usize,

    /// Markdown body text.
    pub content: String,

    /// Child sections in sibling order.
    pub children: Vec<SectionNode>,
}

impl SectionNode {
    /// Build a childless node from a flat record.
    pub fn from_flat(section: &FlatSection) -> Self {
        Self {
            key: section.key(),
            title: section.title.clone(),
            level: section.level,
            order: 0,
            content: section.content.clone(),
            children: Vec::new(),
        }
    }

    /// Total node count including this node and all descendants.
    pub fn total_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(SectionNode::total_count)
            .sum::<usize>()
    }

    /// Depth-first search for a node by key.
    pub fn find(&self, key: &SectionKey) -> Option<&SectionNode> {
        if &self.key == key {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_section_flags() {
        let s = FlatSection::new(
            "Results",
            2,
            3,
            "See ![plot](fig1.png) and the energy $E = mc^2$ relation.\n|a|b|\n|1|2|",
        );
        assert!(s.has_figures);
        assert!(s.has_tables);
        assert!(s.has_equations);
        assert_eq!(s.word_count, 11);
    }

    #[test]
    fn test_flat_section_plain_text() {
        let s = FlatSection::new("Introduction", 1, 0, "Plain prose with no markup.");
        assert!(!s.has_figures);
        assert!(!s.has_tables);
        assert!(!s.has_equations);
    }

    #[test]
    fn test_caption_lines_set_flags() {
        let s = FlatSection::new("Evaluation", 2, 1, "Figure 3: accuracy curve\n\nTable 1: results");
        assert!(s.has_figures);
        assert!(s.has_tables);
    }

    #[test]
    fn test_level_clamped_to_one() {
        let s = FlatSection::new("Broken", 0, 0, "");
        assert_eq!(s.level, 1);
    }

    #[test]
    fn test_node_find_and_count() {
        let mut root = SectionNode::from_flat(&FlatSection::new("A", 1, 0, ""));
        let mut child = SectionNode::from_flat(&FlatSection::new("B", 2, 1, ""));
        let grandchild_key = SectionKey::new(2, "C");
        child
            .children
            .push(SectionNode::from_flat(&FlatSection::new("C", 3, 2, "")));
        root.children.push(child);

        assert_eq!(root.total_count(), 3);
        assert!(root.find(&grandchild_key).is_some());
        assert!(root.find(&SectionKey::new(9, "Z")).is_none());
    }
}
