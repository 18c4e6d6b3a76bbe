//! Shared test fixtures: an in-memory executor and a sample entity model.

use relquery::{ExecError, Executor, Row};
use std::cell::RefCell;

/// Executor returning canned rows. Records every SQL string it is handed so
/// tests can assert on the built statements.
pub struct StaticExecutor {
    rows: Vec<Row>,
    pub seen: RefCell<Vec<String>>,
}

impl StaticExecutor {
    pub fn new(rows: Vec<Row>) -> Self {
        StaticExecutor {
            rows,
            seen: RefCell::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn last_sql(&self) -> String {
        self.seen.borrow().last().cloned().unwrap_or_default()
    }
}

impl Executor for StaticExecutor {
    fn execute(&self, sql: &str) -> Result<Vec<Row>, ExecError> {
        self.seen.borrow_mut().push(sql.to_string());
        Ok(self.rows.clone())
    }
}

/// Executor that always fails, for error pass-through tests.
pub struct FailingExecutor;

impl Executor for FailingExecutor {
    fn execute(&self, _sql: &str) -> Result<Vec<Row>, ExecError> {
        Err(ExecError::message("connection refused"))
    }
}

pub fn row(cells: &[(&str, Option<&str>)]) -> Row {
    cells
        .iter()
        .map(|(name, value)| (name.to_string(), value.map(str::to_string)))
        .collect()
}

/// The user / user_data model used across integration tests.
pub fn user_model() -> relquery::EntityRegistry {
    let config = relquery::load_from_json(
        r#"{"entities":[
            {"table":"user","primary_key":"id","fields":[
                {"name":"id","kind":"integer","nullable":false},
                {"name":"login","kind":"string","nullable":false,"has_default":false},
                {"name":"password","kind":"string","nullable":false,"has_default":false}]},
            {"table":"user_data","primary_key":"id","fields":[
                {"name":"id","kind":"integer","nullable":false},
                {"name":"fk_user","kind":"integer","reference":{"table":"user","column":"id"}},
                {"name":"data","kind":"string"}]}
        ]}"#,
    )
    .expect("fixture model parses");
    relquery::resolve(&config).expect("fixture model resolves")
}
