//! Configuration types for the emitter

use crate::filename::FilenameTemplate;
use anyhow::{anyhow, Result};
use std::path::PathBuf;

/// Output configuration
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Directory the schema files are written to
    pub base_path: PathBuf,

    /// Template for per-version schema file names
    pub filename_template: FilenameTemplate,

    /// Optional transforms
    pub transform: TransformOptions,
}

impl OutputConfig {
    pub fn validate(&self) -> Result<()> {
        if self.base_path.to_string_lossy().is_empty() {
            return Err(anyhow!("Base path cannot be empty"));
        }
        Ok(())
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("."),
            filename_template: FilenameTemplate::default(),
            transform: TransformOptions::default(),
        }
    }
}

/// Switches for the transforms that are off by default
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformOptions {
    /// Widen the `type` of fields not listed in `required` to also admit null
    pub allow_null_optional_fields: bool,
}
