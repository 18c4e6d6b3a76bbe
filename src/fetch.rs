//! Result materialization: fold flat executor rows back into nested trees
//! mirroring the join paths of the field manifest.

use crate::error::QueryError;
use crate::executor::{Executor, Row};
use crate::model::decode_cell;
use crate::sql::explore::PATH_SEPARATOR;
use crate::sql::{DatabaseQuery, QueryField};
use serde_json::{Map, Value};

/// Build the query's SQL, run it through the executor, and materialize each
/// returned row against the field manifest. Row order is preserved.
pub fn fetch(query: &DatabaseQuery, executor: &dyn Executor) -> Result<Vec<Value>, QueryError> {
    let sql = query.build();
    tracing::debug!(sql = %sql, "query");
    let rows = executor.execute(&sql)?;
    materialize(query.fields(), query.table(), rows)
}

/// Fold each flat row into a tree shaped by the manifest's table paths.
///
/// Per row: manifest fields are walked in order, grouped by contiguous runs
/// of identical `table_path`; each run descends once from the row root, so
/// manifest order must never interleave two paths' fields. The root table's
/// own subtree is unwrapped at the top level.
pub fn materialize(
    manifest: &[QueryField],
    root_table: &str,
    rows: Vec<Row>,
) -> Result<Vec<Value>, QueryError> {
    rows.into_iter()
        .map(|row| materialize_row(manifest, root_table, &row))
        .collect()
}

fn materialize_row(manifest: &[QueryField], root_table: &str, row: &Row) -> Result<Value, QueryError> {
    if row.len() < manifest.len() {
        return Err(QueryError::ShapeMismatch(format!(
            "row has {} values, field manifest expects {}",
            row.len(),
            manifest.len()
        )));
    }

    let mut tree = Map::new();
    let mut i = 0;
    while i < manifest.len() {
        let path = &manifest[i].table_path;
        let mut run_end = i;
        while run_end < manifest.len() && manifest[run_end].table_path == *path {
            run_end += 1;
        }

        let data = descend(&mut tree, path);
        for k in i..run_end {
            let field = &manifest[k];
            let (name, raw) = &row[k];
            if name != field.output_name() {
                return Err(QueryError::ShapeMismatch(format!(
                    "column {} at position {} does not match manifest field {}",
                    name,
                    k,
                    field.output_name()
                )));
            }
            data.insert(
                field.output_name().to_string(),
                decode_cell(field.kind, raw.as_deref()),
            );
        }
        i = run_end;
    }

    Ok(tree
        .remove(root_table)
        .unwrap_or_else(|| Value::Object(Map::new())))
}

/// Descend/create nested map levels for each `&`-separated path segment and
/// return the final level's `data` map.
fn descend<'a>(tree: &'a mut Map<String, Value>, path: &str) -> &'a mut Map<String, Value> {
    let mut node = tree;
    for segment in path.split(PATH_SEPARATOR) {
        let slot = node
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        node = ensure_object(slot);
    }
    let slot = node
        .entry("data".to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    ensure_object(slot)
}

fn ensure_object(slot: &mut Value) -> &mut Map<String, Value> {
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(m) => m,
        _ => unreachable!("slot was just set to an object"),
    }
}
