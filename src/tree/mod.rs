//! Section tree assembly and manipulation.

mod assemble;
mod ops;

pub use assemble::{assemble, AssemblyStrategy, LastSeenByLevel, StackBased};
pub use ops::SectionForest;
