//! Extracted CRD version record

use serde_json::Value;

/// One schema per CRD and declared version
#[derive(Debug, Clone, PartialEq)]
pub struct CrdSchema {
    /// Resource kind (from spec.names.kind)
    pub kind: String,

    /// API group
    pub group: String,

    /// API version
    pub version: String,

    /// Full API version (group/version)
    pub api_version: String,

    /// OpenAPI v3 schema body
    pub definition: Value,

    /// Input the record was extracted from
    pub source: String,
}

impl CrdSchema {
    pub fn new(
        kind: impl Into<String>,
        group: impl Into<String>,
        version: impl Into<String>,
        definition: Value,
        source: impl Into<String>,
    ) -> Self {
        let group = group.into();
        let version = version.into();
        Self {
            kind: kind.into(),
            api_version: format!("{group}/{version}"),
            group,
            version,
            definition,
            source: source.into(),
        }
    }

    /// Get the kind name (from spec.names.kind)
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// First dot-delimited segment of the group, e.g. `cert-manager` for
    /// `cert-manager.io`
    pub fn short_group(&self) -> &str {
        self.group.split('.').next().unwrap_or_default()
    }

    /// Key of this schema inside the consolidated definitions file
    pub fn definition_key(&self) -> String {
        format!("{}.{}.{}", self.group, self.version, self.kind)
    }
}
