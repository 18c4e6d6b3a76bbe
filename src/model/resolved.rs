//! Resolved entity model: config validated and flattened for runtime use.

use crate::model::types::FieldKind;
use serde_json::Value;
use std::collections::HashMap;

/// Foreign-key target resolved from config.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    pub table: String,
    pub column: String,
}

/// Describes one column: semantic type, nullability, uniqueness, optional
/// foreign-key target. Pure data, shared by the explorer and validation.
#[derive(Clone, Debug)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    pub nullable: bool,
    pub unique: bool,
    /// Whether the column has a DB default (absent values may be omitted on insert).
    pub has_default: bool,
    pub reference: Option<Reference>,
}

impl FieldDescriptor {
    /// Whether a candidate value is acceptable for this column's kind.
    /// Numeric kinds accept anything numeric-looking; Boolean additionally
    /// accepts the literal strings "1"/"0"/"true"/"false" (case-insensitive);
    /// String accepts everything. Null is acceptable only when nullable.
    pub fn validate(&self, value: &Value) -> bool {
        if value.is_null() {
            return self.nullable;
        }
        match self.kind {
            FieldKind::Integer | FieldKind::Float | FieldKind::Decimal => is_numeric(value),
            FieldKind::Boolean => match value {
                Value::Bool(_) | Value::Number(_) => true,
                Value::String(s) => {
                    let s = s.to_ascii_lowercase();
                    matches!(s.as_str(), "1" | "0" | "true" | "false")
                }
                _ => false,
            },
            FieldKind::String => true,
        }
    }

    /// Decode a raw fetched cell into a typed value per this column's kind.
    /// Unparseable numerics pass through as strings rather than degrading to 0.
    pub fn decode(&self, raw: Option<&str>) -> Value {
        decode_cell(Some(self.kind), raw)
    }
}

/// Decode one raw cell. `None` kind means no descriptor was attached to the
/// projected field, so the value passes through untouched.
pub fn decode_cell(kind: Option<FieldKind>, raw: Option<&str>) -> Value {
    let Some(s) = raw else { return Value::Null };
    match kind {
        Some(FieldKind::Integer) => s
            .parse::<i64>()
            .map(|n| Value::Number(n.into()))
            .unwrap_or_else(|_| Value::String(s.to_string())),
        Some(FieldKind::Float) => s
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(s.to_string())),
        Some(FieldKind::Boolean) => Value::Bool(s == "1" || s.eq_ignore_ascii_case("true")),
        Some(FieldKind::Decimal) | Some(FieldKind::String) | None => Value::String(s.to_string()),
    }
}

fn is_numeric(v: &Value) -> bool {
    match v {
        Value::Number(_) => true,
        Value::String(s) => !s.trim().is_empty() && s.trim().parse::<f64>().is_ok(),
        _ => false,
    }
}

/// One described table: field list in declaration order plus optional PK.
/// Constructed once per entity type, immutable, read many times during traversal.
#[derive(Clone, Debug)]
pub struct EntityDescriptor {
    pub table: String,
    pub primary_key: Option<String>,
    pub fields: Vec<FieldDescriptor>,
}

impl EntityDescriptor {
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Resolves a foreign key's target table during relation exploration.
pub trait EntityLookup {
    fn entity(&self, table: &str) -> Option<&EntityDescriptor>;
}

/// All resolved entities, keyed by table name. Declaration order preserved.
#[derive(Clone, Debug, Default)]
pub struct EntityRegistry {
    entities: Vec<EntityDescriptor>,
    by_table: HashMap<String, usize>,
}

impl EntityRegistry {
    pub fn new(entities: Vec<EntityDescriptor>) -> Self {
        let by_table = entities
            .iter()
            .enumerate()
            .map(|(i, e)| (e.table.clone(), i))
            .collect();
        EntityRegistry { entities, by_table }
    }

    pub fn entities(&self) -> &[EntityDescriptor] {
        &self.entities
    }
}

impl EntityLookup for EntityRegistry {
    fn entity(&self, table: &str) -> Option<&EntityDescriptor> {
        self.by_table.get(table).map(|&i| &self.entities[i])
    }
}
