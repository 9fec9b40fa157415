//! Lookup from entity kind to schema.

use crate::catalog;
use crate::error::{ModelError, ModelResult};
use crate::schema::ObjectSchema;
use graphmail_types::EntityKind;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

static GLOBAL: LazyLock<SchemaRegistry> = LazyLock::new(SchemaRegistry::builtin);

/// Maps each [`EntityKind`] to its shared [`ObjectSchema`].
///
/// Registries are populated once and only read afterwards; the
/// process-wide instance returned by [`SchemaRegistry::global`] is never
/// mutable.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<EntityKind, Arc<ObjectSchema>>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the builtin catalog of entity types.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for schema in catalog::builtin_schemas() {
            registry.schemas.insert(schema.entity_kind(), Arc::new(schema));
        }
        registry
    }

    /// The process-wide registry, built from the catalog on first use.
    pub fn global() -> &'static SchemaRegistry {
        &GLOBAL
    }

    /// Adds a schema. Each kind can be registered once.
    pub fn register(&mut self, schema: ObjectSchema) -> ModelResult<()> {
        let kind = schema.entity_kind();
        if self.schemas.contains_key(&kind) {
            return Err(ModelError::InvalidArgument(format!(
                "schema for {kind} already registered"
            )));
        }
        self.schemas.insert(kind, Arc::new(schema));
        Ok(())
    }

    /// Returns the schema for `kind`.
    pub fn schema(&self, kind: EntityKind) -> ModelResult<Arc<ObjectSchema>> {
        self.schemas
            .get(&kind)
            .cloned()
            .ok_or(ModelError::SchemaNotFound(kind))
    }

    #[must_use]
    pub fn contains(&self, kind: EntityKind) -> bool {
        self.schemas.contains_key(&kind)
    }

    /// Registered kinds, sorted.
    #[must_use]
    pub fn kinds(&self) -> Vec<EntityKind> {
        let mut kinds: Vec<_> = self.schemas.keys().copied().collect();
        kinds.sort();
        kinds
    }
}
