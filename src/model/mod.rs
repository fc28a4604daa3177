//! Data model for parsed academic papers.
//!
//! All types here are created fresh per parse invocation and carry no
//! persistent identity; assigning database identifiers is the caller's job.

mod document;
mod figure;
mod reference;
mod section;

pub use document::{ParsedDocument, ProcessingStatus};
pub use figure::{Figure, FigureKind};
pub use reference::Reference;
pub use section::{FlatSection, SectionKey, SectionNode};
