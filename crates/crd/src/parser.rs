//! CRD parser implementation

use crate::schema::CrdSchema;
use anyhow::{anyhow, Result};
use glob::Pattern;
use serde_json::Value;
use tracing::{debug, info};

const CRD_KIND: &str = "CustomResourceDefinition";

#[derive(Debug, Default)]
pub struct CrdParser {
    filters: Vec<Pattern>,
}

impl CrdParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser that only keeps schemas whose API version matches one
    /// of the given glob patterns
    pub fn with_filters(filters: &[String]) -> Result<Self> {
        let filters = filters
            .iter()
            .map(|filter| {
                Pattern::new(filter).map_err(|e| anyhow!("Invalid filter pattern '{filter}': {e}"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { filters })
    }

    /// Extract schemas from every CRD among the given documents, in order
    pub fn extract_from_documents(&self, documents: &[Value], source: &str) -> Vec<CrdSchema> {
        let mut schemas = Vec::new();

        for doc in documents {
            let mut crd_schemas = self.extract_from_document(doc, source);
            crd_schemas.retain(|schema| self.matches_filters(schema));
            schemas.extend(crd_schemas);
        }

        info!("Found {} CRD schemas in {}", schemas.len(), source);
        schemas
    }

    /// Extract one schema per declared version from a single document.
    ///
    /// Documents that are not CRDs, or CRDs missing the keys needed for
    /// either the legacy `spec.validation` shape or the `spec.versions`
    /// shape, produce no schemas.
    pub fn extract_from_document(&self, doc: &Value, source: &str) -> Vec<CrdSchema> {
        match doc.get("kind").and_then(Value::as_str) {
            Some(CRD_KIND) => {}
            _ => return Vec::new(),
        }

        let Some(spec) = doc.get("spec") else {
            debug!("Skipping CRD without spec in {}", source);
            return Vec::new();
        };

        if let Some(schema) = spec
            .get("validation")
            .and_then(|v| v.get("openAPIV3Schema"))
        {
            return self
                .extract_legacy(spec, schema, source)
                .into_iter()
                .collect();
        }

        if let Some(versions) = spec.get("versions").and_then(Value::as_array) {
            return self.extract_versions(spec, versions, source);
        }

        debug!(
            "Skipping CRD {} in {}: no openAPIV3Schema found",
            crd_name(doc),
            source
        );
        Vec::new()
    }

    /// `spec.validation.openAPIV3Schema` with a single `spec.version`
    fn extract_legacy(&self, spec: &Value, schema: &Value, source: &str) -> Option<CrdSchema> {
        let kind = spec_kind(spec);
        let group = spec.get("group").and_then(Value::as_str);
        let version = spec.get("version").and_then(Value::as_str);

        match (kind, group, version) {
            (Some(kind), Some(group), Some(version)) => Some(CrdSchema::new(
                kind,
                group,
                version,
                schema.clone(),
                source,
            )),
            _ => {
                debug!("Skipping legacy CRD in {}: missing kind, group or version", source);
                None
            }
        }
    }

    /// `spec.versions[].schema.openAPIV3Schema`
    fn extract_versions(&self, spec: &Value, versions: &[Value], source: &str) -> Vec<CrdSchema> {
        let (Some(kind), Some(group)) = (spec_kind(spec), spec.get("group").and_then(Value::as_str))
        else {
            debug!("Skipping CRD in {}: missing kind or group", source);
            return Vec::new();
        };

        let mut crd_schemas = Vec::new();

        for version_doc in versions {
            let Some(schema) = version_doc
                .get("schema")
                .and_then(|s| s.get("openAPIV3Schema"))
            else {
                continue;
            };

            let Some(version_name) = version_doc.get("name").and_then(Value::as_str) else {
                debug!("Skipping {} version without name in {}", kind, source);
                continue;
            };

            crd_schemas.push(CrdSchema::new(
                kind,
                group,
                version_name,
                schema.clone(),
                source,
            ));
        }

        crd_schemas
    }

    /// Check if a CRD schema matches the configured filters
    fn matches_filters(&self, schema: &CrdSchema) -> bool {
        if self.filters.is_empty() {
            return true;
        }

        self.filters
            .iter()
            .any(|pattern| pattern.matches(&schema.api_version))
    }
}

fn spec_kind(spec: &Value) -> Option<&str> {
    spec.get("names")
        .and_then(|n| n.get("kind"))
        .and_then(Value::as_str)
}

fn crd_name(doc: &Value) -> &str {
    doc.get("metadata")
        .and_then(|m| m.get("name"))
        .and_then(Value::as_str)
        .unwrap_or("<unnamed>")
}
