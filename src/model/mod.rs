pub mod loader;
pub mod resolved;
pub mod types;
pub mod validator;

pub use loader::{load_from_json, resolve};
pub use resolved::{
    decode_cell, EntityDescriptor, EntityLookup, EntityRegistry, FieldDescriptor, Reference,
};
pub use types::{EntityConfig, FieldConfig, FieldKind, ModelConfig, ReferenceConfig};
pub use validator::validate;
