//! Result types for emission

use std::path::PathBuf;

/// Files written by a run
#[derive(Debug, Clone, Default)]
pub struct EmitResult {
    /// Per-version schema files, in write order
    pub schema_files: Vec<PathBuf>,

    /// Consolidated `_definitions.json`
    pub definitions_file: PathBuf,

    /// Aggregate `all.json`
    pub all_file: PathBuf,

    /// Total processing time in milliseconds
    pub processing_time_ms: u64,
}

impl EmitResult {
    pub fn files_generated(&self) -> usize {
        self.schema_files.len() + 2
    }
}
