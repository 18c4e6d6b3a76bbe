//! Model validation: referential integrity of the declarative entity graph.

use crate::error::ModelError;
use crate::model::types::ModelConfig;
use std::collections::{HashMap, HashSet};

/// Validate a model config before resolving it: table names unique, field
/// names unique per table, primary keys declared, every reference pointing
/// at a registered table and an existing column on it.
pub fn validate(config: &ModelConfig) -> Result<(), ModelError> {
    let mut tables = HashSet::new();
    for e in &config.entities {
        if !tables.insert(e.table.as_str()) {
            return Err(ModelError::DuplicateTable(e.table.clone()));
        }
    }

    let columns_by_table: HashMap<&str, HashSet<&str>> = config
        .entities
        .iter()
        .map(|e| (e.table.as_str(), e.fields.iter().map(|f| f.name.as_str()).collect()))
        .collect();

    for e in &config.entities {
        let mut seen = HashSet::new();
        for f in &e.fields {
            if !seen.insert(f.name.as_str()) {
                return Err(ModelError::DuplicateField {
                    table: e.table.clone(),
                    field: f.name.clone(),
                });
            }
        }

        if let Some(pk) = &e.primary_key {
            if !seen.contains(pk.as_str()) {
                return Err(ModelError::InvalidPrimaryKey {
                    table: e.table.clone(),
                    column: pk.clone(),
                });
            }
        }

        for f in &e.fields {
            if let Some(r) = &f.reference {
                let target_ok = columns_by_table
                    .get(r.table.as_str())
                    .is_some_and(|cols| cols.contains(r.column.as_str()));
                if !target_ok {
                    return Err(ModelError::MissingReference {
                        table: e.table.clone(),
                        field: f.name.clone(),
                        target_table: r.table.clone(),
                        target_column: r.column.clone(),
                    });
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::loader::load_from_json;

    #[test]
    fn accepts_well_formed_model() {
        let config = load_from_json(
            r#"{"entities":[
                {"table":"user","primary_key":"id","fields":[
                    {"name":"id","kind":"integer"},
                    {"name":"login","kind":"string"}]},
                {"table":"user_data","primary_key":"id","fields":[
                    {"name":"id","kind":"integer"},
                    {"name":"fk_user","kind":"integer","reference":{"table":"user","column":"id"}}]}
            ]}"#,
        )
        .unwrap();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn rejects_dangling_reference() {
        let config = load_from_json(
            r#"{"entities":[
                {"table":"user_data","fields":[
                    {"name":"fk_user","kind":"integer","reference":{"table":"user","column":"id"}}]}
            ]}"#,
        )
        .unwrap();
        assert!(matches!(
            validate(&config),
            Err(ModelError::MissingReference { .. })
        ));
    }

    #[test]
    fn rejects_reference_to_missing_column() {
        let config = load_from_json(
            r#"{"entities":[
                {"table":"user","fields":[{"name":"id","kind":"integer"}]},
                {"table":"user_data","fields":[
                    {"name":"fk_user","kind":"integer","reference":{"table":"user","column":"uuid"}}]}
            ]}"#,
        )
        .unwrap();
        assert!(matches!(
            validate(&config),
            Err(ModelError::MissingReference { .. })
        ));
    }

    #[test]
    fn rejects_undeclared_primary_key() {
        let config = load_from_json(
            r#"{"entities":[
                {"table":"user","primary_key":"uuid","fields":[{"name":"id","kind":"integer"}]}
            ]}"#,
        )
        .unwrap();
        assert!(matches!(
            validate(&config),
            Err(ModelError::InvalidPrimaryKey { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_table() {
        let config = load_from_json(
            r#"{"entities":[
                {"table":"user","fields":[{"name":"id","kind":"integer"}]},
                {"table":"user","fields":[{"name":"id","kind":"integer"}]}
            ]}"#,
        )
        .unwrap();
        assert!(matches!(validate(&config), Err(ModelError::DuplicateTable(_))));
    }
}
