//! Relation graph exploration: walk an entity's foreign keys breadth-first
//! and emit the projected fields and LEFT JOINs needed to fetch the whole
//! related tree in one query.

use crate::model::{EntityDescriptor, EntityLookup};
use crate::sql::fragment::{JoinMode, QueryField, QueryJoin};
use std::collections::{HashSet, VecDeque};

/// Ceiling on joins emitted per exploration. Once hit, traversal stops
/// entirely rather than truncating an entity mid-way.
pub const JOIN_LIMIT: usize = 50;

/// Separator encoding the join chain in a single alias string. The
/// materializer splits aliases on it to rebuild the nesting path.
pub const PATH_SEPARATOR: char = '&';

/// Output of an exploration: the field manifest and the joins, both in the
/// deterministic order the materializer depends on.
#[derive(Clone, Debug, Default)]
pub struct Exploration {
    pub fields: Vec<QueryField>,
    pub joins: Vec<QueryJoin>,
}

/// One pending hop: a foreign key discovered on `origin_path` that still
/// needs its target joined in. `visited` holds every table on the path up to
/// the origin, so one chain never revisits a table while sibling branches may
/// still reach the same one.
struct Frontier {
    origin_path: String,
    origin_field: String,
    target_table: String,
    target_column: String,
    visited: HashSet<String>,
}

/// Discover every entity transitively referenced from `root` and emit one
/// QueryField per projected column plus one LEFT JOIN per hop.
///
/// `recursive = false` projects only the root's own fields. Paths listed in
/// `ignore` still get their fields and join, but their own references are not
/// expanded further.
pub fn explore(
    root: &EntityDescriptor,
    lookup: &dyn EntityLookup,
    recursive: bool,
    ignore: &HashSet<String>,
) -> Exploration {
    let mut out = Exploration::default();

    for f in &root.fields {
        out.fields.push(QueryField {
            table_path: root.table.clone(),
            column: f.name.clone(),
            alias: None,
            kind: Some(f.kind),
        });
    }
    if !recursive {
        return out;
    }

    let mut frontier = VecDeque::new();
    let root_visited: HashSet<String> = std::iter::once(root.table.clone()).collect();
    for f in &root.fields {
        if let Some(r) = &f.reference {
            frontier.push_back(Frontier {
                origin_path: root.table.clone(),
                origin_field: f.name.clone(),
                target_table: r.table.clone(),
                target_column: r.column.clone(),
                visited: root_visited.clone(),
            });
        }
    }

    while let Some(entry) = frontier.pop_front() {
        // budget is checked before each join; hitting it ends traversal
        if out.joins.len() >= JOIN_LIMIT {
            return out;
        }
        let Some(target) = lookup.entity(&entry.target_table) else {
            tracing::warn!(table = %entry.target_table, "skipping unresolvable reference target");
            continue;
        };

        let target_path = format!("{}{}{}", entry.origin_path, PATH_SEPARATOR, entry.origin_field);
        out.joins.push(QueryJoin {
            mode: JoinMode::Left,
            target_table: target.table.clone(),
            target_alias: target_path.clone(),
            source: QueryField::new(entry.origin_path.clone(), entry.origin_field.clone()),
            target_column: entry.target_column.clone(),
            operator: "=".into(),
        });
        for f in &target.fields {
            out.fields.push(QueryField {
                table_path: target_path.clone(),
                column: f.name.clone(),
                alias: None,
                kind: Some(f.kind),
            });
        }

        if ignore.contains(&target_path) {
            continue;
        }
        let mut path_visited = entry.visited;
        path_visited.insert(target.table.clone());
        for f in &target.fields {
            if let Some(r) = &f.reference {
                if !path_visited.contains(&r.table) {
                    let mut visited = path_visited.clone();
                    visited.insert(r.table.clone());
                    frontier.push_back(Frontier {
                        origin_path: target_path.clone(),
                        origin_field: f.name.clone(),
                        target_table: r.table.clone(),
                        target_column: r.column.clone(),
                        visited,
                    });
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{load_from_json, resolve, EntityLookup, EntityRegistry};

    fn registry(json: &str) -> EntityRegistry {
        resolve(&load_from_json(json).unwrap()).unwrap()
    }

    fn paths(e: &Exploration) -> Vec<String> {
        e.fields
            .iter()
            .map(|f| format!("{}.{}", f.table_path, f.column))
            .collect()
    }

    #[test]
    fn emits_ordered_manifest_and_join_for_user_data() {
        let reg = registry(
            r#"{"entities":[
                {"table":"user","primary_key":"id","fields":[
                    {"name":"id","kind":"integer"},
                    {"name":"login","kind":"string"},
                    {"name":"password","kind":"string"}]},
                {"table":"user_data","primary_key":"id","fields":[
                    {"name":"id","kind":"integer"},
                    {"name":"fk_user","kind":"integer","reference":{"table":"user","column":"id"}},
                    {"name":"data","kind":"string"}]}
            ]}"#,
        );
        let root = reg.entity("user_data").unwrap();
        let e = explore(root, &reg, true, &HashSet::new());
        assert_eq!(
            paths(&e),
            vec![
                "user_data.id",
                "user_data.fk_user",
                "user_data.data",
                "user_data&fk_user.id",
                "user_data&fk_user.login",
                "user_data&fk_user.password",
            ]
        );
        assert_eq!(e.joins.len(), 1);
        assert_eq!(
            e.joins[0].render(),
            "LEFT JOIN `user` AS `user_data&fk_user` ON `user_data`.`fk_user` = `user_data&fk_user`.`id`"
        );
    }

    #[test]
    fn non_recursive_projects_root_only() {
        let reg = registry(
            r#"{"entities":[
                {"table":"user","fields":[{"name":"id","kind":"integer"}]},
                {"table":"user_data","fields":[
                    {"name":"fk_user","kind":"integer","reference":{"table":"user","column":"id"}}]}
            ]}"#,
        );
        let root = reg.entity("user_data").unwrap();
        let e = explore(root, &reg, false, &HashSet::new());
        assert_eq!(paths(&e), vec!["user_data.fk_user"]);
        assert!(e.joins.is_empty());
    }

    #[test]
    fn self_reference_joins_once_and_terminates() {
        let reg = registry(
            r#"{"entities":[
                {"table":"node","fields":[
                    {"name":"id","kind":"integer"},
                    {"name":"fk_parent","kind":"integer","reference":{"table":"node","column":"id"}}]}
            ]}"#,
        );
        let root = reg.entity("node").unwrap();
        let e = explore(root, &reg, true, &HashSet::new());
        // depth 1 on the same path, never deeper
        assert_eq!(e.joins.len(), 1);
        assert_eq!(e.joins[0].target_alias, "node&fk_parent");
    }

    #[test]
    fn mutual_reference_terminates() {
        let reg = registry(
            r#"{"entities":[
                {"table":"a","fields":[
                    {"name":"id","kind":"integer"},
                    {"name":"fk_b","kind":"integer","reference":{"table":"b","column":"id"}}]},
                {"table":"b","fields":[
                    {"name":"id","kind":"integer"},
                    {"name":"fk_a","kind":"integer","reference":{"table":"a","column":"id"}}]}
            ]}"#,
        );
        let root = reg.entity("a").unwrap();
        let e = explore(root, &reg, true, &HashSet::new());
        assert_eq!(e.joins.len(), 1);
        assert_eq!(e.joins[0].target_alias, "a&fk_b");
    }

    #[test]
    fn diamond_reaches_shared_table_on_both_branches() {
        let reg = registry(
            r#"{"entities":[
                {"table":"d","fields":[{"name":"id","kind":"integer"}]},
                {"table":"b","fields":[
                    {"name":"id","kind":"integer"},
                    {"name":"fk_d","kind":"integer","reference":{"table":"d","column":"id"}}]},
                {"table":"c","fields":[
                    {"name":"id","kind":"integer"},
                    {"name":"fk_d","kind":"integer","reference":{"table":"d","column":"id"}}]},
                {"table":"a","fields":[
                    {"name":"id","kind":"integer"},
                    {"name":"fk_b","kind":"integer","reference":{"table":"b","column":"id"}},
                    {"name":"fk_c","kind":"integer","reference":{"table":"c","column":"id"}}]}
            ]}"#,
        );
        let root = reg.entity("a").unwrap();
        let e = explore(root, &reg, true, &HashSet::new());
        let aliases: Vec<&str> = e.joins.iter().map(|j| j.target_alias.as_str()).collect();
        assert_eq!(aliases, vec!["a&fk_b", "a&fk_c", "a&fk_b&fk_d", "a&fk_c&fk_d"]);
    }

    #[test]
    fn join_budget_stops_traversal() {
        // wide root: 60 references to the same leaf table
        let mut fields = vec![r#"{"name":"id","kind":"integer"}"#.to_string()];
        for i in 0..60 {
            fields.push(format!(
                r#"{{"name":"fk_{i}","kind":"integer","reference":{{"table":"leaf","column":"id"}}}}"#
            ));
        }
        let json = format!(
            r#"{{"entities":[
                {{"table":"leaf","fields":[{{"name":"id","kind":"integer"}}]}},
                {{"table":"wide","fields":[{}]}}
            ]}}"#,
            fields.join(",")
        );
        let reg = registry(&json);
        let root = reg.entity("wide").unwrap();
        let e = explore(root, &reg, true, &HashSet::new());
        assert_eq!(e.joins.len(), JOIN_LIMIT);
    }

    #[test]
    fn ignored_paths_are_not_expanded_further() {
        let reg = registry(
            r#"{"entities":[
                {"table":"c","fields":[{"name":"id","kind":"integer"}]},
                {"table":"b","fields":[
                    {"name":"id","kind":"integer"},
                    {"name":"fk_c","kind":"integer","reference":{"table":"c","column":"id"}}]},
                {"table":"a","fields":[
                    {"name":"id","kind":"integer"},
                    {"name":"fk_b","kind":"integer","reference":{"table":"b","column":"id"}}]}
            ]}"#,
        );
        let root = reg.entity("a").unwrap();
        let ignore: HashSet<String> = std::iter::once("a&fk_b".to_string()).collect();
        let e = explore(root, &reg, true, &ignore);
        // b is joined and projected, but its reference to c is not followed
        assert_eq!(e.joins.len(), 1);
        assert!(e.fields.iter().all(|f| !f.table_path.contains("fk_c")));
    }

    #[test]
    fn unresolvable_target_is_skipped() {
        // bypass the validator: build a descriptor with a dangling reference
        use crate::model::{FieldDescriptor, FieldKind, Reference};
        let root = EntityDescriptor {
            table: "a".into(),
            primary_key: None,
            fields: vec![FieldDescriptor {
                name: "fk_ghost".into(),
                kind: FieldKind::Integer,
                nullable: true,
                unique: false,
                has_default: true,
                reference: Some(Reference {
                    table: "ghost".into(),
                    column: "id".into(),
                }),
            }],
        };
        let reg = EntityRegistry::new(vec![root.clone()]);
        let e = explore(&root, &reg, true, &HashSet::new());
        assert!(e.joins.is_empty());
        assert_eq!(e.fields.len(), 1);
    }
}
