pub mod error;
pub mod jsonld;
pub mod model;
pub mod nquads;
pub mod options;
pub mod uri;

pub use error::{JsonLdError, Result};
pub use jsonld::{ActiveContext, Container, Direction, TermDefinition};
pub use model::{DEFAULT_GRAPH, Dataset, Literal, Node, Quad, rdf, xsd};
pub use nquads::{parse_nquads, to_nquad, to_nquads};
pub use options::{
    ContextResolver, JsonLdOptions, JsonLdOptionsBuilder, ProcessingMode, StaticContextResolver,
};
