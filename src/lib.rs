//! relquery: relational query core — declarative entity models, foreign-key
//! graph exploration, and flat-row-to-nested-tree result materialization.

pub mod error;
pub mod executor;
pub mod fetch;
pub mod model;
pub mod service;
pub mod sql;

pub use error::{ModelError, QueryError};
pub use executor::{ExecError, Executor, Row};
pub use fetch::{fetch, materialize};
pub use model::{
    load_from_json, resolve, EntityDescriptor, EntityLookup, EntityRegistry, FieldDescriptor,
    FieldKind, ModelConfig,
};
pub use service::{BodyValidator, EntityService};
pub use sql::{
    explore, render, DatabaseQuery, Exploration, JoinMode, QueryField, QueryJoin, QueryMode,
    SortDirection, JOIN_LIMIT,
};
