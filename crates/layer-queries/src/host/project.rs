//! File-backed layer host.
//!
//! A project file lists layers with their fields, feature attributes and the
//! currently applied subset string:
//!
//! ```json
//! {
//!     "layers": [
//!         {
//!             "name": "cities",
//!             "fields": ["city", "pop"],
//!             "features": [{"city": "Austin", "pop": 961855}],
//!             "subset_string": ""
//!         }
//!     ]
//! }
//! ```
//!
//! Applying a filter records the expression on the layer and rewrites the
//! project file atomically. Expressions are stored, not evaluated. Keys the
//! host does not interpret are carried through the rewrite.

use super::LayerHost;
use crate::error::{HostError, PersistenceError};
use crate::storage::{read_json_document, write_json_atomic};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// One vector layer of a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Layer name, used as its identifier
    pub name: String,

    /// Declared field names. When empty, fields are taken from the features.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,

    /// Attribute rows
    #[serde(default)]
    pub features: Vec<Map<String, Value>>,

    /// Active row filter; empty means unfiltered
    #[serde(default)]
    pub subset_string: String,

    /// Keys this host does not interpret, kept on rewrite
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Layer {
    /// Create a layer with declared fields and no features.
    pub fn new(name: impl Into<String>, fields: &[&str]) -> Self {
        Self {
            name: name.into(),
            fields: fields.iter().map(|f| (*f).to_string()).collect(),
            ..Self::default()
        }
    }

    /// Append a feature, builder style.
    #[must_use]
    pub fn with_feature(mut self, feature: Value) -> Self {
        if let Value::Object(map) = feature {
            self.features.push(map);
        }
        self
    }

    /// Field names: the declared list, or every attribute key in first-seen order.
    pub fn field_names(&self) -> Vec<String> {
        if !self.fields.is_empty() {
            return self.fields.clone();
        }
        let keys: IndexSet<&String> = self.features.iter().flat_map(|f| f.keys()).collect();
        keys.into_iter().cloned().collect()
    }

    /// Distinct non-null values of `field`, stringified, in first-seen order.
    pub fn unique_values(&self, field: &str) -> Vec<String> {
        let values: IndexSet<String> = self
            .features
            .iter()
            .filter_map(|feature| feature.get(field))
            .filter_map(display_value)
            .collect();
        values.into_iter().collect()
    }
}

/// Stringify an attribute value the way a value picker shows it.
fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Serialized form of a project file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    /// Layers in project order
    #[serde(default)]
    pub layers: Vec<Layer>,

    /// Project keys this host does not interpret, kept on rewrite
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// [`LayerHost`] over a [`ProjectDocument`], optionally persisted to a file.
#[derive(Debug, Clone, Default)]
pub struct ProjectHost {
    path: Option<PathBuf>,
    document: ProjectDocument,
}

impl ProjectHost {
    /// Host over an in-memory document. Filters are not persisted.
    pub fn new(layers: Vec<Layer>) -> Self {
        Self {
            path: None,
            document: ProjectDocument {
                layers,
                extra: Map::new(),
            },
        }
    }

    /// Open the project file at `path`. A missing file is a project with no layers.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Persistence`] if the file exists but cannot be
    /// read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, HostError> {
        let path = path.into();
        let document = read_json_document::<ProjectDocument>(&path)
            .map_err(HostError::Persistence)?
            .unwrap_or_else(|| {
                tracing::debug!(path = %path.display(), "No project file, no layers available");
                ProjectDocument::default()
            });
        tracing::debug!(
            path = %path.display(),
            layers = document.layers.len(),
            "Opened project"
        );
        Ok(Self {
            path: Some(path),
            document,
        })
    }

    /// Backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The project document
    pub fn document(&self) -> &ProjectDocument {
        &self.document
    }

    /// Current subset string of `layer`.
    pub fn subset_string(&self, layer: &str) -> Option<&str> {
        self.layer(layer).map(|l| l.subset_string.as_str())
    }

    /// Write the project back to its file. A no-op for in-memory hosts.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`PersistenceError`].
    pub fn save(&self) -> Result<(), PersistenceError> {
        match &self.path {
            Some(path) => write_json_atomic(path, &self.document),
            None => Ok(()),
        }
    }

    /// First layer with this name, matching how a project lookup by name behaves.
    fn layer(&self, name: &str) -> Option<&Layer> {
        self.document.layers.iter().find(|l| l.name == name)
    }

    fn layer_mut(&mut self, name: &str) -> Option<&mut Layer> {
        self.document.layers.iter_mut().find(|l| l.name == name)
    }

    fn require_layer(&self, name: &str) -> Result<&Layer, HostError> {
        self.layer(name)
            .ok_or_else(|| HostError::LayerNotFound(name.to_string()))
    }
}

impl LayerHost for ProjectHost {
    fn list_layers(&self) -> Vec<String> {
        self.document.layers.iter().map(|l| l.name.clone()).collect()
    }

    fn list_fields(&self, layer: &str) -> Result<Vec<String>, HostError> {
        Ok(self.require_layer(layer)?.field_names())
    }

    fn list_unique_values(&self, layer: &str, field: &str) -> Result<Vec<String>, HostError> {
        let found = self.require_layer(layer)?;
        if !found.field_names().iter().any(|f| f == field) {
            return Err(HostError::FieldNotFound {
                layer: layer.to_string(),
                field: field.to_string(),
            });
        }
        Ok(found.unique_values(field))
    }

    fn apply_filter(&mut self, layer: &str, expression: &str) -> Result<(), HostError> {
        let found = self
            .layer_mut(layer)
            .ok_or_else(|| HostError::LayerNotFound(layer.to_string()))?;
        found.subset_string = expression.to_string();

        if expression.is_empty() {
            tracing::info!(layer, "Cleared layer filter");
        } else {
            tracing::info!(layer, expression, "Applied layer filter");
        }

        self.save().map_err(HostError::Persistence)
    }

    fn has_layer(&self, layer: &str) -> bool {
        self.layer(layer).is_some()
    }
}
