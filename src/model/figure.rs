//! Figure and table records.

use serde::{Deserialize, Serialize};

/// Kind of visual element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FigureKind {
    Figure,
    Table,
    Equation,
    Chart,
    Diagram,
    Other,
}

impl Default for FigureKind {
    fn default() -> Self {
        FigureKind::Figure
    }
}

/// A figure, table, or other visual element referenced by the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Figure {
    /// What kind of element this is.
    pub kind: FigureKind,

    /// Caption text, when present.
    pub caption: Option<String>,

    /// Raw markup body; for tables this is the pipe-row block.
    pub content: Option<String>,

    /// Path or URL of an extracted/linked image.
    pub image_reference: Option<String>,

    /// Global zero-based order across figures and tables.
    pub order: usize,

    /// Display label such as "Figure 1" or "Table 3".
    pub label: Option<String>,
}

impl Figure {
    /// Create a figure with a caption and optional image reference.
    pub fn figure(order: usize, caption: Option<String>, image_reference: Option<String>) -> Self {
        Self {
            kind: FigureKind::Figure,
            caption,
            content: None,
            image_reference,
            order,
            label: Some(format!("Figure {}", order + 1)),
        }
    }

    /// Create a table with a caption and its raw pipe-row content.
    pub fn table(order: usize, table_index: usize, caption: Option<String>, content: String) -> Self {
        Self {
            kind: FigureKind::Table,
            caption,
            content: Some(content),
            image_reference: None,
            order,
            label: Some(format!("Table {}", table_index + 1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_figure_label() {
        let f = Figure::figure(0, Some("Fig1".into()), Some("img.png".into()));
        assert_eq!(f.kind, FigureKind::Figure);
        assert_eq!(f.label.as_deref(), Some("Figure 1"));
    }

    #[test]
    fn test_table_ordering_is_global() {
        // second table in a document that already has three figures
        let t = Figure::table(4, 1, Some("results".into()), "|a|b|".into());
        assert_eq!(t.kind, FigureKind::Table);
        assert_eq!(t.order, 4);
        assert_eq!(t.label.as_deref(), Some("Table 2"));
    }

    #[test]
    fn test_kind_serde_names() {
        let json = serde_json::to_string(&FigureKind::Diagram).unwrap();
        assert_eq!(json, "\"diagram\"");
    }
}
