//! Raw model types matching the declarative entity JSON schema.

use serde::{Deserialize, Serialize};

/// Semantic column type. Drives value validation and decoding of fetched
/// cells back to typed values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Integer,
    Float,
    Boolean,
    Decimal,
}

/// Foreign-key target: another table's column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceConfig {
    pub table: String,
    pub column: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default = "default_true")]
    pub nullable: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default = "default_true")]
    pub has_default: bool,
    #[serde(default)]
    pub reference: Option<ReferenceConfig>,
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntityConfig {
    pub table: String,
    #[serde(default)]
    pub primary_key: Option<String>,
    pub fields: Vec<FieldConfig>,
}

/// All entity descriptions in one struct for in-memory loading.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    pub entities: Vec<EntityConfig>,
}
