//! Template library
//!
//! Templates are JSON documents in a directory, one per file, keyed by file
//! stem. A document declares processors by local name and the edges between
//! them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FlowError, Result};
use crate::plan::EdgeDeclaration;

/// A processor declared by a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateProcessor {
    pub name: String,
    #[serde(rename = "type")]
    pub processor_type: String,
    #[serde(default)]
    pub config: Value,
}

/// Parsed template document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub processors: Vec<TemplateProcessor>,
    #[serde(default)]
    pub connections: Vec<EdgeDeclaration>,
}

impl TemplateDocument {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

/// One line of the template listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSummary {
    pub name: String,
    pub description: String,
    pub processor_count: usize,
}

/// Templates loaded from a directory
#[derive(Debug, Clone, Default)]
pub struct TemplateLibrary {
    templates: BTreeMap<String, TemplateDocument>,
}

impl TemplateLibrary {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load every `*.json` file in `dir`.
    ///
    /// A missing directory yields an empty library. Files that fail to read
    /// or parse are skipped with a warning.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut library = Self::empty();
        if !dir.is_dir() {
            log::warn!("Template directory {} does not exist", dir.display());
            return Ok(library);
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
            .collect();
        paths.sort();

        for path in paths {
            match Self::load_file(&path) {
                Ok((name, document)) => {
                    log::debug!("Loaded template '{}' from {}", name, path.display());
                    library.templates.insert(name, document);
                }
                Err(e) => log::warn!("Skipping template: {}", e),
            }
        }
        log::info!("Loaded {} template(s) from {}", library.len(), dir.display());
        Ok(library)
    }

    fn load_file(path: &Path) -> Result<(String, TemplateDocument)> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(String::from)
            .ok_or_else(|| FlowError::InvalidTemplate {
                path: path.to_path_buf(),
                reason: "file name is not valid UTF-8".to_string(),
            })?;
        let text = std::fs::read_to_string(path)?;
        let document = TemplateDocument::from_json(&text).map_err(|e| FlowError::InvalidTemplate {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok((name, document))
    }

    /// Add or replace a template
    pub fn insert(&mut self, name: impl Into<String>, document: TemplateDocument) {
        self.templates.insert(name.into(), document);
    }

    pub fn get(&self, name: &str) -> Result<&TemplateDocument> {
        self.templates
            .get(name)
            .ok_or_else(|| FlowError::TemplateNotFound(name.to_string()))
    }

    /// Summaries sorted by name
    pub fn list(&self) -> Vec<TemplateSummary> {
        self.templates
            .iter()
            .map(|(name, doc)| TemplateSummary {
                name: name.clone(),
                description: doc
                    .description
                    .clone()
                    .unwrap_or_else(|| "No description".to_string()),
                processor_count: doc.processors.len(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
