//! Structured data extraction from markdown.

mod reference;
mod structured;

pub use reference::parse_reference;
pub use structured::{
    extract_structured_data, FigureCapture, SectionRecord, StructuredData, StructuredExtractor,
    TableCapture,
};
