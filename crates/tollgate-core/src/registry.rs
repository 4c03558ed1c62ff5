//! Schema lookup capability.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::schema::ToolSchema;

/// Resolves a tool identifier to its argument schema.
///
/// The decision engine treats a missing schema as a configuration error;
/// it never guesses a default.
#[async_trait]
pub trait SchemaRegistry: Send + Sync {
    /// Look up the schema for `tool`.
    async fn schema_for(&self, tool: &str) -> Option<ToolSchema>;
}

/// A fixed, in-memory schema registry.
#[derive(Debug, Clone, Default)]
pub struct StaticSchemaRegistry {
    schemas: HashMap<String, ToolSchema>,
}

impl StaticSchemaRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema under its own name, replacing any previous one.
    pub fn register(&mut self, schema: ToolSchema) {
        self.schemas.insert(schema.name().to_string(), schema);
    }

    /// Builder form of [`register`](Self::register).
    #[must_use]
    pub fn with_schema(mut self, schema: ToolSchema) -> Self {
        self.register(schema);
        self
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Check whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Registered tool names, sorted.
    #[must_use]
    pub fn tools(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl FromIterator<ToolSchema> for StaticSchemaRegistry {
    fn from_iter<I: IntoIterator<Item = ToolSchema>>(iter: I) -> Self {
        let mut registry = Self::new();
        for schema in iter {
            registry.register(schema);
        }
        registry
    }
}

#[async_trait]
impl SchemaRegistry for StaticSchemaRegistry {
    async fn schema_for(&self, tool: &str) -> Option<ToolSchema> {
        self.schemas.get(tool).cloned()
    }
}
