//! Typed errors for model loading and query building/fetching.

use thiserror::Error;

/// Errors raised while loading or validating the declarative entity model.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("duplicate table: {0}")]
    DuplicateTable(String),
    #[error("duplicate field: {table}.{field}")]
    DuplicateField { table: String, field: String },
    #[error("missing reference: {table}.{field} -> {target_table}.{target_column}")]
    MissingReference {
        table: String,
        field: String,
        target_table: String,
        target_column: String,
    },
    #[error("invalid primary key: table {table} column {column}")]
    InvalidPrimaryKey { table: String, column: String },
    #[error("model parse: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised while building or executing a query.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("invalid query mode: {0}")]
    InvalidMode(String),
    #[error("insert fields must be declared before values")]
    InsertFieldsMissing,
    #[error("insert value count mismatch: expected {expected}, got {got}")]
    InsertArity { expected: usize, got: usize },
    #[error("join limit exceeded ({limit})")]
    JoinLimitExceeded { limit: usize },
    #[error("unknown entity: {0}")]
    UnknownEntity(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("executor: {0}")]
    Executor(#[from] crate::executor::ExecError),
    #[error("row shape mismatch: {0}")]
    ShapeMismatch(String),
}
