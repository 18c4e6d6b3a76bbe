//! Body validation against entity field descriptors.

use crate::error::QueryError;
use crate::model::EntityDescriptor;
use serde_json::Value;
use std::collections::HashMap;

pub struct BodyValidator;

impl BodyValidator {
    /// Validate a create body: no unknown columns, every non-nullable column
    /// without a default present, every present value acceptable for its kind.
    pub fn validate(entity: &EntityDescriptor, body: &HashMap<String, Value>) -> Result<(), QueryError> {
        Self::reject_unknown(entity, body)?;
        for f in &entity.fields {
            match body.get(&f.name) {
                Some(v) => {
                    if !f.validate(v) {
                        return Err(QueryError::Validation(format!(
                            "{} is not a valid {:?} value",
                            f.name, f.kind
                        )));
                    }
                }
                None => {
                    if !f.nullable && !f.has_default {
                        return Err(QueryError::Validation(format!("{} is required", f.name)));
                    }
                }
            }
        }
        Ok(())
    }

    /// Validate only the fields present in body (for partial updates).
    pub fn validate_partial(
        entity: &EntityDescriptor,
        body: &HashMap<String, Value>,
    ) -> Result<(), QueryError> {
        Self::reject_unknown(entity, body)?;
        for (name, v) in body {
            if let Some(f) = entity.field(name) {
                if !f.validate(v) {
                    return Err(QueryError::Validation(format!(
                        "{} is not a valid {:?} value",
                        name, f.kind
                    )));
                }
            }
        }
        Ok(())
    }

    fn reject_unknown(entity: &EntityDescriptor, body: &HashMap<String, Value>) -> Result<(), QueryError> {
        for name in body.keys() {
            if entity.field(name).is_none() {
                return Err(QueryError::Validation(format!(
                    "unknown column {} for table {}",
                    name, entity.table
                )));
            }
        }
        Ok(())
    }
}
