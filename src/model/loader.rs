//! Load model config from JSON and resolve it into a runtime registry.

use crate::error::ModelError;
use crate::model::resolved::{EntityDescriptor, EntityRegistry, FieldDescriptor, Reference};
use crate::model::types::ModelConfig;
use crate::model::validator::validate;

/// Parse a JSON model document.
pub fn load_from_json(json: &str) -> Result<ModelConfig, ModelError> {
    Ok(serde_json::from_str(json)?)
}

/// Build a resolved registry from a model config (validates first).
pub fn resolve(config: &ModelConfig) -> Result<EntityRegistry, ModelError> {
    validate(config)?;

    let entities = config
        .entities
        .iter()
        .map(|e| EntityDescriptor {
            table: e.table.clone(),
            primary_key: e.primary_key.clone(),
            fields: e
                .fields
                .iter()
                .map(|f| FieldDescriptor {
                    name: f.name.clone(),
                    kind: f.kind,
                    nullable: f.nullable,
                    unique: f.unique,
                    has_default: f.has_default,
                    reference: f.reference.as_ref().map(|r| Reference {
                        table: r.table.clone(),
                        column: r.column.clone(),
                    }),
                })
                .collect(),
        })
        .collect();

    Ok(EntityRegistry::new(entities))
}
