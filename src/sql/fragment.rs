//! Query part types: projected fields, joins, conditions, assignments,
//! ordering. Each renders its own SQL fragment through the template engine.

use crate::model::FieldKind;
use crate::sql::template::render;
use serde_json::Value;
use std::fmt;

/// Quote identifier MySQL-style (backticks in identifiers doubled).
pub(crate) fn quoted(s: &str) -> String {
    format!("`{}`", s.replace('`', "``"))
}

/// `path`.`column` qualified name.
pub(crate) fn qualified(table: &str, column: &str) -> String {
    format!("{}.{}", quoted(table), quoted(column))
}

/// A projected column in an in-progress query. `table_path` may be a
/// `&`-joined join chain (see the explorer); `kind` drives decoding of the
/// fetched cell back to a typed value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryField {
    pub table_path: String,
    pub column: String,
    pub alias: Option<String>,
    pub kind: Option<FieldKind>,
}

impl QueryField {
    pub fn new(table_path: impl Into<String>, column: impl Into<String>) -> Self {
        QueryField {
            table_path: table_path.into(),
            column: column.into(),
            alias: None,
            kind: None,
        }
    }

    /// Name the fetched cell carries: alias when set, column name otherwise.
    pub fn output_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.column)
    }

    pub fn render(&self) -> String {
        let base = qualified(&self.table_path, &self.column);
        match &self.alias {
            Some(a) => format!("{} AS {}", base, quoted(a)),
            None => base,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinMode {
    Left,
    Right,
    Inner,
}

impl fmt::Display for JoinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JoinMode::Left => "LEFT JOIN",
            JoinMode::Right => "RIGHT JOIN",
            JoinMode::Inner => "INNER JOIN",
        })
    }
}

#[derive(Clone, Debug)]
pub struct QueryJoin {
    pub mode: JoinMode,
    pub target_table: String,
    pub target_alias: String,
    pub source: QueryField,
    pub target_column: String,
    pub operator: String,
}

impl QueryJoin {
    pub fn render(&self) -> String {
        let target = if self.target_alias == self.target_table {
            quoted(&self.target_table)
        } else {
            format!("{} AS {}", quoted(&self.target_table), quoted(&self.target_alias))
        };
        format!(
            "{} {} ON {} {} {}",
            self.mode,
            target,
            qualified(&self.source.table_path, &self.source.column),
            self.operator,
            qualified(&self.target_alias, &self.target_column),
        )
    }
}

/// One bound comparison: `table`.`field` operator value.
#[derive(Clone, Debug)]
pub struct QueryCondition {
    pub table: Option<String>,
    pub field: String,
    pub operator: String,
    pub value: Value,
}

impl QueryCondition {
    pub fn render(&self) -> String {
        let lhs = match &self.table {
            Some(t) => qualified(t, &self.field),
            None => quoted(&self.field),
        };
        render(&format!("{} {} {{}}", lhs, self.operator), std::slice::from_ref(&self.value))
    }
}

/// A pre-written boolean expression with its own positional values.
#[derive(Clone, Debug)]
pub struct QueryConditionRaw {
    pub expression: String,
    pub values: Vec<Value>,
}

impl QueryConditionRaw {
    pub fn render(&self) -> String {
        format!("({})", render(&self.expression, &self.values))
    }
}

#[derive(Clone, Debug)]
pub enum Condition {
    Bound(QueryCondition),
    Raw(QueryConditionRaw),
}

impl Condition {
    pub fn render(&self) -> String {
        match self {
            Condition::Bound(c) => c.render(),
            Condition::Raw(c) => c.render(),
        }
    }
}

/// One UPDATE assignment.
#[derive(Clone, Debug)]
pub struct QuerySet {
    pub table: Option<String>,
    pub field: String,
    pub value: Value,
}

impl QuerySet {
    pub fn render(&self) -> String {
        let lhs = match &self.table {
            Some(t) => qualified(t, &self.field),
            None => quoted(&self.field),
        };
        render(&format!("{} = {{}}", lhs), std::slice::from_ref(&self.value))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        })
    }
}

#[derive(Clone, Debug)]
pub struct QueryOrder {
    pub field: QueryField,
    pub direction: SortDirection,
}

impl QueryOrder {
    pub fn render(&self) -> String {
        format!(
            "{} {}",
            qualified(&self.field.table_path, &self.field.column),
            self.direction
        )
    }
}
