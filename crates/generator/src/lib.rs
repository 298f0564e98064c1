//! JSON Schema generation from extracted CRD schemas

pub mod config;
pub mod emitter;
pub mod filename;
pub mod result;
pub mod transform;

pub use config::{OutputConfig, TransformOptions};
pub use emitter::SchemaEmitter;
pub use filename::FilenameTemplate;
pub use result::EmitResult;
