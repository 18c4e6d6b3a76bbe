//! Builds INSERT, SELECT, UPDATE, DELETE statements from accumulated query
//! state. All accumulator lists are append-only; `build()` is a pure function
//! of the builder's state.

use crate::error::QueryError;
use crate::model::{EntityDescriptor, EntityLookup};
use crate::sql::explore::{explore, JOIN_LIMIT};
use crate::sql::fragment::{
    quoted, Condition, JoinMode, QueryCondition, QueryConditionRaw, QueryField, QueryJoin,
    QueryOrder, QuerySet, SortDirection,
};
use crate::sql::template::render;
use serde_json::Value;
use std::collections::HashSet;
use std::str::FromStr;

/// Statement mode, fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryMode {
    Insert,
    Select,
    Update,
    Delete,
}

impl FromStr for QueryMode {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "insert" => Ok(QueryMode::Insert),
            "select" => Ok(QueryMode::Select),
            "update" => Ok(QueryMode::Update),
            "delete" => Ok(QueryMode::Delete),
            other => Err(QueryError::InvalidMode(other.to_string())),
        }
    }
}

/// In-progress query. Owns every field/join/condition it accumulates; not
/// shared across threads, callers needing concurrent construction use
/// separate instances.
#[derive(Clone, Debug)]
pub struct DatabaseQuery {
    mode: QueryMode,
    table: String,
    fields: Vec<QueryField>,
    joins: Vec<QueryJoin>,
    conditions: Vec<Condition>,
    sets: Vec<QuerySet>,
    orders: Vec<QueryOrder>,
    insert_fields: Vec<String>,
    insert_value_groups: Vec<Vec<Value>>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl DatabaseQuery {
    pub fn new(table: impl Into<String>, mode: QueryMode) -> Self {
        DatabaseQuery {
            mode,
            table: table.into(),
            fields: Vec::new(),
            joins: Vec::new(),
            conditions: Vec::new(),
            sets: Vec::new(),
            orders: Vec::new(),
            insert_fields: Vec::new(),
            insert_value_groups: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    pub fn mode(&self) -> QueryMode {
        self.mode
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// The ordered field manifest the materializer aligns row values against.
    pub fn fields(&self) -> &[QueryField] {
        &self.fields
    }

    pub fn joins(&self) -> &[QueryJoin] {
        &self.joins
    }

    /// Append one projected column.
    pub fn add_field(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.fields.push(QueryField::new(table, column));
        self
    }

    /// Run relation exploration from `entity` and append all resulting
    /// fields and joins.
    pub fn explore_entity(
        mut self,
        entity: &EntityDescriptor,
        lookup: &dyn EntityLookup,
        recursive: bool,
        ignore: &HashSet<String>,
    ) -> Self {
        let explored = explore(entity, lookup, recursive, ignore);
        self.fields.extend(explored.fields);
        self.joins.extend(explored.joins);
        self
    }

    /// Append an equality condition. The owning table is inferred from the
    /// first projected field with a matching column name; this is a heuristic,
    /// so pass the table via [`filter_table`](Self::filter_table) when the
    /// column name appears on more than one projected path.
    pub fn filter(self, field: impl Into<String>, value: Value) -> Self {
        self.filter_op(field, "=", value)
    }

    /// Append a condition with an explicit operator, table still inferred.
    pub fn filter_op(mut self, field: impl Into<String>, operator: impl Into<String>, value: Value) -> Self {
        let field = field.into();
        let table = self
            .fields
            .iter()
            .find(|f| f.column == field)
            .map(|f| f.table_path.clone());
        self.conditions.push(Condition::Bound(QueryCondition {
            table,
            field,
            operator: operator.into(),
            value,
        }));
        self
    }

    /// Append a condition against an explicit table or alias.
    pub fn filter_table(
        mut self,
        table: impl Into<String>,
        field: impl Into<String>,
        operator: impl Into<String>,
        value: Value,
    ) -> Self {
        self.conditions.push(Condition::Bound(QueryCondition {
            table: Some(table.into()),
            field: field.into(),
            operator: operator.into(),
            value,
        }));
        self
    }

    /// Append a pre-written boolean expression with its own positional
    /// values; it is wrapped in parentheses when rendered.
    pub fn filter_raw(mut self, expression: impl Into<String>, values: Vec<Value>) -> Self {
        self.conditions.push(Condition::Raw(QueryConditionRaw {
            expression: expression.into(),
            values,
        }));
        self
    }

    /// Append a manual join. Fails once the join budget would be met.
    pub fn join(
        mut self,
        mode: JoinMode,
        table: impl Into<String>,
        alias: impl Into<String>,
        source: QueryField,
        target_column: impl Into<String>,
        operator: impl Into<String>,
    ) -> Result<Self, QueryError> {
        if self.joins.len() + 1 >= JOIN_LIMIT {
            return Err(QueryError::JoinLimitExceeded { limit: JOIN_LIMIT });
        }
        self.joins.push(QueryJoin {
            mode,
            target_table: table.into(),
            target_alias: alias.into(),
            source,
            target_column: target_column.into(),
            operator: operator.into(),
        });
        Ok(self)
    }

    /// Append an UPDATE assignment on the target table.
    pub fn set(mut self, field: impl Into<String>, value: Value) -> Self {
        self.sets.push(QuerySet {
            table: None,
            field: field.into(),
            value,
        });
        self
    }

    /// Append an UPDATE assignment against an explicit table.
    pub fn set_table(mut self, table: impl Into<String>, field: impl Into<String>, value: Value) -> Self {
        self.sets.push(QuerySet {
            table: Some(table.into()),
            field: field.into(),
            value,
        });
        self
    }

    /// Declare the INSERT column list. Must precede [`insert_values`](Self::insert_values).
    pub fn insert_fields<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.insert_fields.extend(names.into_iter().map(Into::into));
        self
    }

    /// Append one INSERT value tuple; its arity must match the declared
    /// column list.
    pub fn insert_values(mut self, values: Vec<Value>) -> Result<Self, QueryError> {
        if self.insert_fields.is_empty() {
            return Err(QueryError::InsertFieldsMissing);
        }
        if values.len() != self.insert_fields.len() {
            return Err(QueryError::InsertArity {
                expected: self.insert_fields.len(),
                got: values.len(),
            });
        }
        self.insert_value_groups.push(values);
        Ok(self)
    }

    pub fn order(
        mut self,
        table: impl Into<String>,
        field: impl Into<String>,
        direction: SortDirection,
    ) -> Self {
        self.orders.push(QueryOrder {
            field: QueryField::new(table, field),
            direction,
        });
        self
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn limit_offset(mut self, n: u64, offset: u64) -> Self {
        self.limit = Some(n);
        self.offset = Some(offset);
        self
    }

    pub fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Produce the SQL string for the accumulated state. Idempotent: two
    /// calls on the same builder yield identical output.
    pub fn build(&self) -> String {
        match self.mode {
            QueryMode::Insert => self.build_insert(),
            QueryMode::Select => self.build_select(),
            QueryMode::Update => self.build_update(),
            QueryMode::Delete => self.build_delete(),
        }
    }

    fn build_insert(&self) -> String {
        let columns = self
            .insert_fields
            .iter()
            .map(|f| quoted(f))
            .collect::<Vec<_>>()
            .join(", ");
        let tuples = if self.insert_value_groups.is_empty() {
            "()".to_string()
        } else {
            self.insert_value_groups
                .iter()
                .map(|group| {
                    let placeholders = vec!["{}"; group.len()].join(", ");
                    render(&format!("({})", placeholders), group)
                })
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!("INSERT INTO {} ({}) VALUES {}", quoted(&self.table), columns, tuples)
    }

    fn build_select(&self) -> String {
        let fields = if self.fields.is_empty() {
            "*".to_string()
        } else {
            self.fields
                .iter()
                .map(QueryField::render)
                .collect::<Vec<_>>()
                .join(", ")
        };
        let mut sql = format!("SELECT {} FROM {}", fields, quoted(&self.table));
        for j in &self.joins {
            sql.push(' ');
            sql.push_str(&j.render());
        }
        sql.push_str(&self.where_clause());
        sql.push_str(&self.order_clause());
        sql.push_str(&self.limit_clause());
        sql
    }

    fn build_update(&self) -> String {
        let mut sql = format!("UPDATE {}", quoted(&self.table));
        if !self.sets.is_empty() {
            let sets = self
                .sets
                .iter()
                .map(QuerySet::render)
                .collect::<Vec<_>>()
                .join(", ");
            sql.push_str(" SET ");
            sql.push_str(&sets);
        }
        sql.push_str(&self.where_clause());
        sql.push_str(&self.order_clause());
        sql.push_str(&self.limit_clause());
        sql
    }

    fn build_delete(&self) -> String {
        let mut sql = format!("DELETE FROM {}", quoted(&self.table));
        sql.push_str(&self.where_clause());
        sql.push_str(&self.order_clause());
        sql.push_str(&self.limit_clause());
        sql
    }

    fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            return String::new();
        }
        let parts = self
            .conditions
            .iter()
            .map(Condition::render)
            .collect::<Vec<_>>()
            .join(" AND ");
        format!(" WHERE {}", parts)
    }

    fn order_clause(&self) -> String {
        if self.orders.is_empty() {
            return String::new();
        }
        let parts = self
            .orders
            .iter()
            .map(QueryOrder::render)
            .collect::<Vec<_>>()
            .join(", ");
        format!(" ORDER BY {}", parts)
    }

    fn limit_clause(&self) -> String {
        let mut out = String::new();
        if let Some(n) = self.limit {
            out.push_str(&format!(" LIMIT {}", n));
        }
        if let Some(n) = self.offset {
            out.push_str(&format!(" OFFSET {}", n));
        }
        out
    }
}
