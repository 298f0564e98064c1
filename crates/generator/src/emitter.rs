//! JSON Schema file emission

use crate::config::OutputConfig;
use crate::result::EmitResult;
use crate::transform;
use anyhow::{anyhow, Context, Result};
use crd2jsonschema_crd::CrdSchema;
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

pub const DEFINITIONS_FILE: &str = "_definitions.json";
pub const ALL_FILE: &str = "all.json";

pub struct SchemaEmitter {
    output_config: OutputConfig,
}

impl SchemaEmitter {
    pub fn new(output_config: OutputConfig) -> Self {
        Self { output_config }
    }

    /// Transform a schema record in place and write it under its templated
    /// file name
    pub fn write_schema(&self, schema: &mut CrdSchema) -> Result<PathBuf> {
        let filename = self.output_config.filename_template.render(schema);
        self.write_schema_file(&mut schema.definition, &filename)
            .with_context(|| format!("Failed to write schema for {}", schema.definition_key()))
    }

    /// Transform a definition in place and write it as indented JSON.
    ///
    /// Only the final component of `filename` is used, so the file always
    /// lands directly inside the output directory.
    pub fn write_schema_file(&self, definition: &mut Value, filename: &str) -> Result<PathBuf> {
        transform::apply(definition, &self.output_config.transform);

        let name = Path::new(filename)
            .file_name()
            .ok_or_else(|| anyhow!("Invalid schema file name: {filename:?}"))?;
        let path = self.output_config.base_path.join(name);

        self.write_json(&path, definition)?;
        debug!("JSON schema written to {}", path.display());
        Ok(path)
    }

    /// Write `_definitions.json` and `all.json` for the given schemas
    pub fn write_aggregates(&self, schemas: &[CrdSchema]) -> Result<(PathBuf, PathBuf)> {
        let definitions = build_definitions(schemas);
        let all = build_all(&definitions);

        let definitions_path = self.output_config.base_path.join(DEFINITIONS_FILE);
        self.write_json(&definitions_path, &json!({ "definitions": definitions }))?;
        info!(
            "Wrote {} definitions to {}",
            definitions.len(),
            definitions_path.display()
        );

        let all_path = self.output_config.base_path.join(ALL_FILE);
        self.write_json(&all_path, &all)?;
        info!("Wrote {}", all_path.display());

        Ok((definitions_path, all_path))
    }

    /// Write every schema file followed by the aggregate files
    pub fn emit(&self, schemas: &mut [CrdSchema]) -> Result<EmitResult> {
        let start_time = Instant::now();
        let mut schema_files = Vec::with_capacity(schemas.len());

        for schema in schemas.iter_mut() {
            schema_files.push(self.write_schema(schema)?);
        }

        let (definitions_file, all_file) = self.write_aggregates(schemas)?;

        Ok(EmitResult {
            schema_files,
            definitions_file,
            all_file,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    fn write_json(&self, path: &Path, value: &Value) -> Result<()> {
        std::fs::create_dir_all(&self.output_config.base_path).with_context(|| {
            format!(
                "Failed to create output directory {}",
                self.output_config.base_path.display()
            )
        })?;

        let mut content = serde_json::to_string_pretty(value)?;
        content.push('\n');
        std::fs::write(path, &content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!("Wrote {} bytes to {}", content.len(), path.display());
        Ok(())
    }
}

/// Key every definition by `group.version.kind`, pinning its `apiVersion`
/// and `kind` properties to the values that identify it.
///
/// A later schema with the same key replaces an earlier one.
pub fn build_definitions(schemas: &[CrdSchema]) -> Map<String, Value> {
    let mut definitions = Map::new();

    for schema in schemas {
        let mut definition = schema.definition.clone();

        for (property, value) in [("apiVersion", &schema.api_version), ("kind", &schema.kind)] {
            if !pin_property(&mut definition, property, value) {
                warn!(
                    "Schema {} cannot pin {}: no properties object or a non-object entry",
                    schema.definition_key(),
                    property
                );
            }
        }

        definitions.insert(schema.definition_key(), definition);
    }

    definitions
}

/// `oneOf` over a `$ref` to every definition
pub fn build_all(definitions: &Map<String, Value>) -> Value {
    let refs: Vec<Value> = definitions
        .keys()
        .map(|key| json!({ "$ref": format!("{DEFINITIONS_FILE}#/definitions/{key}") }))
        .collect();

    json!({ "oneOf": refs })
}

fn pin_property(definition: &mut Value, property: &str, value: &str) -> bool {
    let Some(properties) = definition
        .get_mut("properties")
        .and_then(Value::as_object_mut)
    else {
        return false;
    };

    match properties
        .entry(property)
        .or_insert_with(|| Value::Object(Map::new()))
    {
        Value::Object(entry) => append_no_duplicates(entry, "enum", Value::String(value.to_string())),
        _ => false,
    }
}

/// Append `value` to the list at `object[key]` unless it is already there,
/// creating the list if missing. Returns `false` when `object[key]` exists
/// but is not a list.
pub fn append_no_duplicates(object: &mut Map<String, Value>, key: &str, value: Value) -> bool {
    match object
        .entry(key)
        .or_insert_with(|| Value::Array(Vec::new()))
    {
        Value::Array(values) => {
            if !values.contains(&value) {
                values.push(value);
            }
            true
        }
        _ => false,
    }
}
