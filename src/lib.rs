//! # paperlode
//!
//! Structure inference for academic PDFs.
//!
//! paperlode turns research papers into structured markdown and typed
//! document data. It layers three parse strategies into a fallback chain
//! (remote parsing service, local layout heuristics, raw byte-level text
//! extraction), then runs pass-based structured extraction and section-tree
//! assembly over the resulting markdown.
//!
//! ## Quick Start
//!
//! ```no_run
//! use paperlode::pdf_to_markdown;
//!
//! let markdown = pdf_to_markdown("paper.pdf");
//! println!("{}", markdown);
//! ```
//!
//! Running the full pipeline:
//!
//! ```no_run
//! use paperlode::{DocumentPipeline, DocumentSource};
//!
//! # async fn run() {
//! let pipeline = DocumentPipeline::new();
//! let processed = pipeline.process(DocumentSource::path("paper.pdf")).await;
//! println!("{} sections", processed.document.section_count());
//! # }
//! ```
//!
//! ## Design notes
//!
//! - Parsing never panics on malformed input; every stage degrades to a
//!   simpler one, ending at a minimal markdown skeleton.
//! - User-visible failure is a status field plus a stored error string,
//!   not a propagated error.
//! - The section tree is assembled from flat heading records by a
//!   pluggable [`tree::AssemblyStrategy`].

pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod remote;
pub mod render;
pub mod tree;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf, PdfFormat};
pub use error::{Error, Result};
pub use extract::{extract_structured_data, StructuredData, StructuredExtractor};
pub use model::{
    Figure, FlatSection, ParsedDocument, ProcessingStatus, Reference, SectionKey, SectionNode,
};
pub use parser::{AcademicParser, ParseOptions};
pub use pipeline::{
    DocumentPipeline, DocumentSource, ParseStrategy, ProcessedDocument,
};
pub use remote::{OutputFormat, RemoteConfig, RemoteParseClient};
pub use tree::{assemble, AssemblyStrategy, LastSeenByLevel, SectionForest, StackBased};

use std::path::Path;

/// Convert a PDF file to markdown with the local layout heuristics.
///
/// Never fails: unreadable or malformed input degrades through raw text
/// extraction down to a minimal markdown skeleton.
///
/// ```no_run
/// use paperlode::pdf_to_markdown;
///
/// let markdown = pdf_to_markdown("paper.pdf");
/// std::fs::write("paper.md", markdown).unwrap();
/// ```
pub fn pdf_to_markdown<P: AsRef<Path>>(path: P) -> String {
    AcademicParser::default().parse_path(path.as_ref())
}

/// Convert in-memory PDF bytes to markdown with the local layout heuristics.
pub fn bytes_to_markdown(data: &[u8]) -> String {
    AcademicParser::default().parse_bytes(data)
}

/// Parse a PDF file into a structured document.
///
/// Runs the layout heuristics, then structured extraction over the
/// resulting markdown. Like [`pdf_to_markdown`], this never fails.
///
/// ```no_run
/// use paperlode::pdf_to_document;
///
/// let doc = pdf_to_document("paper.pdf");
/// println!("title: {:?}", doc.title);
/// ```
pub fn pdf_to_document<P: AsRef<Path>>(path: P) -> ParsedDocument {
    let markdown = pdf_to_markdown(path);
    extract_structured_data(&markdown).into_document()
}
