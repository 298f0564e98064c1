//! CRD (CustomResourceDefinition) parsing and per-version schema extraction

pub mod parser;
pub mod schema;

pub use parser::CrdParser;
pub use schema::CrdSchema;
