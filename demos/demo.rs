//! Demo: declare a two-table model, explore it into a joined SELECT, feed the
//! query canned rows through an in-memory executor, and print the nested
//! trees the materializer rebuilds.

use relquery::{fetch, DatabaseQuery, EntityLookup, ExecError, Executor, QueryMode, Row};
use std::collections::HashSet;
use tracing_subscriber::EnvFilter;

struct CannedExecutor(Vec<Row>);

impl Executor for CannedExecutor {
    fn execute(&self, sql: &str) -> Result<Vec<Row>, ExecError> {
        println!("executing: {sql}");
        Ok(self.0.clone())
    }
}

fn row(cells: &[(&str, Option<&str>)]) -> Row {
    cells
        .iter()
        .map(|(name, value)| (name.to_string(), value.map(str::to_string)))
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("relquery=debug".parse()?))
        .init();

    let config = relquery::load_from_json(
        r#"{"entities":[
            {"table":"user","primary_key":"id","fields":[
                {"name":"id","kind":"integer","nullable":false},
                {"name":"login","kind":"string"},
                {"name":"password","kind":"string"}]},
            {"table":"user_data","primary_key":"id","fields":[
                {"name":"id","kind":"integer","nullable":false},
                {"name":"fk_user","kind":"integer","reference":{"table":"user","column":"id"}},
                {"name":"data","kind":"string"}]}
        ]}"#,
    )?;
    let registry = relquery::resolve(&config)?;

    let root = registry
        .entity("user_data")
        .ok_or("user_data not registered")?;
    let query = DatabaseQuery::new("user_data", QueryMode::Select).explore_entity(
        root,
        &registry,
        true,
        &HashSet::new(),
    );

    let executor = CannedExecutor(vec![
        row(&[
            ("id", Some("1")),
            ("fk_user", Some("1")),
            ("data", Some("X")),
            ("id", Some("1")),
            ("login", Some("admin")),
            ("password", Some("hash")),
        ]),
        row(&[
            ("id", Some("2")),
            ("fk_user", None),
            ("data", None),
            ("id", None),
            ("login", None),
            ("password", None),
        ]),
    ]);

    for tree in fetch(&query, &executor)? {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    }
    Ok(())
}
