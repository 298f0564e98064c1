//! Main configuration structure and implementation

use anyhow::{Context, Result};
use crd2jsonschema_crd::CrdParser;
use crd2jsonschema_generator::{FilenameTemplate, OutputConfig};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Output configuration
    pub output: OutputConfig,

    /// API version glob patterns; empty keeps every schema
    pub filters: Vec<String>,
}

impl Config {
    /// Set the output file name template
    pub fn with_filename_format(mut self, format: &str) -> Result<Self> {
        self.output.filename_template = FilenameTemplate::parse(format)
            .context("Invalid FILENAME_FORMAT")?;
        Ok(self)
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output.base_path = path.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.output.validate()?;

        // Surface bad glob patterns before any input is read
        CrdParser::with_filters(&self.filters)?;

        Ok(())
    }
}
