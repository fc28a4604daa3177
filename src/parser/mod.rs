//! PDF parsing: structure backend, layout extraction, academic heuristics.

pub mod academic;
pub mod backend;
pub mod layout;
mod options;
pub mod raw_text;

pub use academic::{processing_error_markdown, AcademicParser};
pub use backend::{LopdfBackend, StructureBackend};
pub use layout::{LayoutAnalyzer, TextBlock, TextLine, TextSpan};
pub use options::ParseOptions;
pub use raw_text::{extract_text_from_bytes, extract_text_from_pdf};
