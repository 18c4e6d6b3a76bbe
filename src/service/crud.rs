//! Generic CRUD over the query builder: explore, filter, execute, materialize.

use crate::error::QueryError;
use crate::executor::Executor;
use crate::fetch::fetch;
use crate::model::{EntityDescriptor, EntityRegistry};
use crate::model::EntityLookup;
use crate::service::validation::BodyValidator;
use crate::sql::{DatabaseQuery, QueryMode, SortDirection};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

pub struct EntityService;

impl EntityService {
    /// List materialized trees for an entity and everything it references,
    /// with optional exact-match filters, limit (default 100, max 1000) and
    /// offset (default 0).
    pub fn list(
        executor: &dyn Executor,
        registry: &EntityRegistry,
        table: &str,
        filters: &[(String, Value)],
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Vec<Value>, QueryError> {
        const DEFAULT_LIMIT: u64 = 100;
        let entity = Self::entity(registry, table)?;
        let limit = limit.unwrap_or(DEFAULT_LIMIT).min(1000);
        let mut q = DatabaseQuery::new(&entity.table, QueryMode::Select).explore_entity(
            entity,
            registry,
            true,
            &HashSet::new(),
        );
        for (column, value) in filters {
            q = q.filter_table(&entity.table, column, "=", value.clone());
        }
        if let Some(pk) = &entity.primary_key {
            q = q.order(&entity.table, pk, SortDirection::Asc);
        }
        q = q.limit_offset(limit, offset.unwrap_or(0));
        fetch(&q, executor)
    }

    /// Fetch one tree by primary key. Returns None when no row matches.
    pub fn read(
        executor: &dyn Executor,
        registry: &EntityRegistry,
        table: &str,
        id: Value,
    ) -> Result<Option<Value>, QueryError> {
        let entity = Self::entity(registry, table)?;
        let pk = Self::primary_key(entity)?;
        let q = DatabaseQuery::new(&entity.table, QueryMode::Select)
            .explore_entity(entity, registry, true, &HashSet::new())
            .filter_table(&entity.table, pk, "=", id)
            .limit(1);
        let mut trees = fetch(&q, executor)?;
        Ok(if trees.is_empty() { None } else { Some(trees.remove(0)) })
    }

    /// Insert one row. Columns absent from the body are omitted when they
    /// carry a default, so the backend fills them in.
    pub fn create(
        executor: &dyn Executor,
        registry: &EntityRegistry,
        table: &str,
        body: &HashMap<String, Value>,
    ) -> Result<(), QueryError> {
        let entity = Self::entity(registry, table)?;
        BodyValidator::validate(entity, body)?;
        let mut columns = Vec::new();
        let mut values = Vec::new();
        for f in &entity.fields {
            match body.get(&f.name) {
                Some(v) => {
                    columns.push(f.name.clone());
                    values.push(v.clone());
                }
                None => {
                    if !f.has_default {
                        columns.push(f.name.clone());
                        values.push(Value::Null);
                    }
                }
            }
        }
        let q = DatabaseQuery::new(&entity.table, QueryMode::Insert)
            .insert_fields(columns)
            .insert_values(values)?;
        Self::execute(executor, &q)
    }

    /// Update body-present columns of one row by primary key.
    pub fn update(
        executor: &dyn Executor,
        registry: &EntityRegistry,
        table: &str,
        id: Value,
        body: &HashMap<String, Value>,
    ) -> Result<(), QueryError> {
        let entity = Self::entity(registry, table)?;
        let pk = Self::primary_key(entity)?;
        BodyValidator::validate_partial(entity, body)?;
        let mut q = DatabaseQuery::new(&entity.table, QueryMode::Update);
        // declaration order keeps the statement deterministic
        for f in &entity.fields {
            if f.name == *pk {
                continue;
            }
            if let Some(v) = body.get(&f.name) {
                q = q.set(&f.name, v.clone());
            }
        }
        q = q.filter_table(&entity.table, pk, "=", id);
        Self::execute(executor, &q)
    }

    /// Delete one row by primary key.
    pub fn delete(
        executor: &dyn Executor,
        registry: &EntityRegistry,
        table: &str,
        id: Value,
    ) -> Result<(), QueryError> {
        let entity = Self::entity(registry, table)?;
        let pk = Self::primary_key(entity)?;
        let q = DatabaseQuery::new(&entity.table, QueryMode::Delete).filter_table(
            &entity.table,
            pk,
            "=",
            id,
        );
        Self::execute(executor, &q)
    }

    fn entity<'a>(registry: &'a EntityRegistry, table: &str) -> Result<&'a EntityDescriptor, QueryError> {
        registry
            .entity(table)
            .ok_or_else(|| QueryError::UnknownEntity(table.to_string()))
    }

    fn primary_key(entity: &EntityDescriptor) -> Result<&str, QueryError> {
        entity
            .primary_key
            .as_deref()
            .ok_or_else(|| QueryError::Validation(format!("table {} has no primary key", entity.table)))
    }

    fn execute(executor: &dyn Executor, q: &DatabaseQuery) -> Result<(), QueryError> {
        let sql = q.build();
        tracing::debug!(sql = %sql, "query");
        executor.execute(&sql)?;
        Ok(())
    }
}
