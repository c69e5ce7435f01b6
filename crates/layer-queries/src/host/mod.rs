//! Layer host abstraction.
//!
//! The host owns the map layers. Query logic only needs four things from it:
//! the layer names, a layer's field names, the distinct values of a field,
//! and a way to set or clear a layer's active filter. [`LayerHost`] captures
//! exactly that, so the same logic can sit behind a desktop GIS binding or
//! the file-backed [`ProjectHost`] used by the CLI and tests.

pub mod project;

pub use project::{Layer, ProjectDocument, ProjectHost};

use crate::error::HostError;

/// Operations the query tool needs from the application holding the layers.
pub trait LayerHost {
    /// Names of all layers in the project, in project order.
    fn list_layers(&self) -> Vec<String>;

    /// Field names of `layer`.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::LayerNotFound`] if the layer does not exist.
    fn list_fields(&self, layer: &str) -> Result<Vec<String>, HostError>;

    /// Distinct values of `field` on `layer`, stringified for display.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::LayerNotFound`] or [`HostError::FieldNotFound`].
    fn list_unique_values(&self, layer: &str, field: &str) -> Result<Vec<String>, HostError>;

    /// Set the active row filter of `layer`. An empty expression clears it.
    ///
    /// # Errors
    ///
    /// Host specific; [`HostError::LayerNotFound`] at minimum.
    fn apply_filter(&mut self, layer: &str, expression: &str) -> Result<(), HostError>;

    /// Whether a layer with this name exists.
    fn has_layer(&self, layer: &str) -> bool {
        self.list_layers().iter().any(|name| name == layer)
    }
}
