//! Schema registry for loading, managing, and accessing SCIM schemas.
//!
//! The registry loads schema documents from JSON strings, files, or a
//! directory, checks their structural invariants, and hands out shared
//! schemas to the resources built from them.

use super::types::Schema;
use crate::error::{ScimError, ScimResult};
use crate::resource::Resource;

use log::{debug, warn};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Registry of SCIM schemas keyed by schema id.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Arc<Schema>>,
}

impl SchemaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a schema registry by loading every `*.json` file in a directory.
    ///
    /// Files that fail to load are skipped with a warning; an unreadable
    /// directory is an error.
    pub fn from_schema_dir<P: AsRef<Path>>(schema_dir: P) -> ScimResult<Self> {
        let mut registry = Self::new();
        for entry in fs::read_dir(schema_dir.as_ref())? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match Self::load_schema_from_file(&path) {
                Ok(schema) => {
                    registry.register(schema);
                }
                Err(e) => warn!("Skipping schema file {}: {}", path.display(), e),
            }
        }
        Ok(registry)
    }

    /// Load a schema from a JSON file.
    pub fn load_schema_from_file<P: AsRef<Path>>(path: P) -> ScimResult<Schema> {
        let content = fs::read_to_string(&path)?;
        Self::load_schema_from_str(&content)
    }

    /// Parse a schema document and check its structural invariants.
    pub fn load_schema_from_str(content: &str) -> ScimResult<Schema> {
        let schema: Schema = serde_json::from_str(content)?;
        schema.check_structure()?;
        Ok(schema)
    }

    /// Add a schema, replacing any previous schema with the same id.
    pub fn register(&mut self, schema: Schema) -> Arc<Schema> {
        debug!(
            "Registering schema {} ({} attributes)",
            schema.id,
            schema.attributes().len()
        );
        let schema = Arc::new(schema);
        self.schemas.insert(schema.id.clone(), Arc::clone(&schema));
        schema
    }

    /// Get a schema by its id.
    pub fn get_schema(&self, schema_id: &str) -> Option<&Arc<Schema>> {
        self.schemas.get(schema_id)
    }

    /// Get all registered schemas.
    pub fn schemas(&self) -> Vec<&Arc<Schema>> {
        self.schemas.values().collect()
    }

    /// Build a resource bound to the named schemas, in the given order.
    ///
    /// The first schema determines the resource type.
    pub fn resource_for(
        &self,
        schema_ids: &[&str],
        location: impl Into<String>,
    ) -> ScimResult<Resource> {
        let schemas = schema_ids
            .iter()
            .map(|id| {
                self.get_schema(id)
                    .cloned()
                    .ok_or_else(|| ScimError::schema_not_found(*id))
            })
            .collect::<ScimResult<Vec<_>>>()?;
        Resource::new(schemas, location)
    }
}
