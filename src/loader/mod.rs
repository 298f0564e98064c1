//! Input loading: local files, directories of YAML files and HTTP URLs

use crate::{Crd2JsonSchemaError, Crd2JsonSchemaResult};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Parsed documents of one input file or URL
#[derive(Debug, Clone)]
pub struct LoadedInput {
    /// Path or URL the documents were read from
    pub source: String,

    /// Every YAML document in the input, in order
    pub documents: Vec<Value>,
}

#[derive(Debug, Default)]
pub struct DocumentLoader;

impl DocumentLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load an input argument. Directories expand to every `*.yaml`/`*.yml`
    /// file below them, sorted by path.
    pub async fn load(&self, input: &str) -> Crd2JsonSchemaResult<Vec<LoadedInput>> {
        if is_url(input) {
            let content = self.fetch(input).await?;
            let documents = parse_documents(&content, input)?;
            return Ok(vec![LoadedInput {
                source: input.to_string(),
                documents,
            }]);
        }

        let path = Path::new(input);
        if path.is_dir() {
            return self.load_directory(path);
        }

        Ok(vec![load_file(path)?])
    }

    fn load_directory(&self, dir_path: &Path) -> Crd2JsonSchemaResult<Vec<LoadedInput>> {
        info!("Loading YAML files from directory: {}", dir_path.display());

        let mut inputs = Vec::new();

        for entry in WalkDir::new(dir_path).sort_by_file_name() {
            let entry = entry.map_err(|e| Crd2JsonSchemaError::Walk {
                path: dir_path.display().to_string(),
                source: e,
            })?;

            if !entry.file_type().is_file() || !is_yaml_file(entry.path()) {
                continue;
            }

            inputs.push(load_file(entry.path())?);
        }

        info!("Loaded {} YAML files from {}", inputs.len(), dir_path.display());
        Ok(inputs)
    }

    #[cfg(feature = "http")]
    async fn fetch(&self, url: &str) -> Crd2JsonSchemaResult<String> {
        info!("Fetching {}", url);

        let response = reqwest::get(url)
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| Crd2JsonSchemaError::Fetch {
                url: url.to_string(),
                source: Box::new(e),
            })?;

        response.text().await.map_err(|e| Crd2JsonSchemaError::Fetch {
            url: url.to_string(),
            source: Box::new(e),
        })
    }

    #[cfg(not(feature = "http"))]
    async fn fetch(&self, url: &str) -> Crd2JsonSchemaResult<String> {
        Err(Crd2JsonSchemaError::HttpDisabled(url.to_string()))
    }
}

/// Inputs starting with `http` are fetched rather than read from disk
pub fn is_url(input: &str) -> bool {
    input.starts_with("http")
}

fn is_yaml_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    )
}

fn load_file(path: &Path) -> Crd2JsonSchemaResult<LoadedInput> {
    let source = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| Crd2JsonSchemaError::Read {
        path: source.clone(),
        source: e,
    })?;

    let documents = parse_documents(&content, &source)?;
    Ok(LoadedInput { source, documents })
}

/// Parse a stream of `---` separated YAML documents
pub fn parse_documents(content: &str, source: &str) -> Crd2JsonSchemaResult<Vec<Value>> {
    let documents = serde_yaml::Deserializer::from_str(content)
        .map(|document| {
            Value::deserialize(document).map_err(|e| Crd2JsonSchemaError::Parse {
                source_name: source.to_string(),
                source: e,
            })
        })
        .collect::<Crd2JsonSchemaResult<Vec<_>>>()?;

    debug!("Parsed {} documents from {}", documents.len(), source);
    Ok(documents)
}
