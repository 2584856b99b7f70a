//! JSON-LD 1.1 processing state and the structural helpers that expansion and
//! compaction algorithms build on.

pub mod classify;
pub mod context;
pub mod inverse;
pub mod keywords;
pub mod term;
pub mod values;

pub use context::ActiveContext;
pub use inverse::{InverseContext, TypeLanguageMap};
pub use term::{Container, Direction, TermDefinition};
