//! crd2jsonschema library
//!
//! Converts Kubernetes CustomResourceDefinitions into standalone JSON Schema
//! files for offline manifest validation: one file per CRD version, a
//! consolidated `_definitions.json` and an `all.json` matching any of them.

pub mod cli;
pub mod config;
pub mod loader;

pub use config::Config;
pub use crd2jsonschema_crd::{CrdParser, CrdSchema};
pub use crd2jsonschema_generator::{
    EmitResult, FilenameTemplate, OutputConfig, SchemaEmitter, TransformOptions,
};
pub use loader::{DocumentLoader, LoadedInput};

use anyhow::Result;
use std::time::Instant;
use tracing::info;

/// Main application context that coordinates all components
pub struct Crd2JsonSchema {
    loader: DocumentLoader,
    crd_parser: CrdParser,
    emitter: SchemaEmitter,
}

impl Crd2JsonSchema {
    /// Create a new instance with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let crd_parser = CrdParser::with_filters(&config.filters)?;
        let emitter = SchemaEmitter::new(config.output);

        Ok(Self {
            loader: DocumentLoader::new(),
            crd_parser,
            emitter,
        })
    }

    /// Convert every CRD found in `inputs`.
    ///
    /// Every input is loaded and extracted before anything is written, so a
    /// failing input leaves the output directory untouched. The aggregate
    /// files are written even when no CRD was found.
    pub async fn run(&self, inputs: &[String]) -> Result<EmitResult> {
        let start_time = Instant::now();

        let mut schemas = Vec::new();
        for input in inputs {
            for loaded in self.loader.load(input).await? {
                schemas.extend(
                    self.crd_parser
                        .extract_from_documents(&loaded.documents, &loaded.source),
                );
            }
        }

        let mut result = self.emitter.emit(&mut schemas)?;
        result.processing_time_ms = start_time.elapsed().as_millis() as u64;

        info!(
            "Converted {} schemas from {} inputs in {}ms",
            schemas.len(),
            inputs.len(),
            result.processing_time_ms
        );

        Ok(result)
    }
}

/// Application error types
#[derive(thiserror::Error, Debug)]
pub enum Crd2JsonSchemaError {
    #[error("Missing FILE parameter.\nUsage: crd2jsonschema [OPTIONS] <FILE>...")]
    MissingInput,

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to walk directory {path}: {source}")]
    Walk {
        path: String,
        source: walkdir::Error,
    },

    #[error("Failed to parse YAML from {source_name}: {source}")]
    Parse {
        source_name: String,
        source: serde_yaml::Error,
    },

    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Cannot fetch {0}: built without the `http` feature")]
    HttpDisabled(String),
}

/// Result type for loading and CLI operations
pub type Crd2JsonSchemaResult<T> = Result<T, Crd2JsonSchemaError>;
