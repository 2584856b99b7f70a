pub mod escape;
pub mod parser;
pub mod serializer;

pub use escape::{escape, unescape};
pub use parser::parse_nquads;
pub use serializer::{to_nquad, to_nquads};
