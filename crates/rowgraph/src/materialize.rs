//! Rebuilds nested objects from flat, aliased result rows.

use crate::compile::{column_label, join_alias};

use rowgraph_core::{
    criteria::{Criteria, Loads},
    graph::Graph,
    schema::{Column, Relationship, Schema, Table},
    stmt::{Record, Value},
    Error, ObjectId, Result,
};

use indexmap::IndexMap;

/// Shape of materialized objects.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Values keyed by column name.
    #[default]
    Rows,

    /// Values keyed by property, produced by the table's mapper.
    Instances,
}

impl Mode {
    /// The key an object in this mode stores `column`'s value under.
    pub(crate) fn key<'a>(self, column: &'a Column) -> &'a str {
        match self {
            Mode::Rows => &column.name,
            Mode::Instances => &column.property,
        }
    }
}

/// Materializes `rows`, produced by compiling `criteria` against `table` with
/// root alias `alias`.
///
/// Returns the graph holding every materialized object, and the root objects
/// in the order their key first appears in `rows`. Join-loaded relationships
/// are attached to their parents by key equality: a many-to-one relationship
/// becomes a single object or none, a one-to-many relationship a (possibly
/// empty) list.
pub fn unjoin(
    schema: &Schema,
    table: &Table,
    rows: &[Record],
    criteria: &Criteria,
    alias: &str,
    mode: Mode,
) -> Result<(Graph, Vec<ObjectId>)> {
    let mut unjoin = Unjoin {
        schema,
        rows,
        mode,
        graph: Graph::new(),
    };

    let loads = criteria.loads();
    let level = unjoin.level(table, alias, &loads, true)?;
    let roots = level.entities.iter().map(|entity| entity.id).collect();
    Ok((unjoin.graph, roots))
}

struct Unjoin<'a> {
    schema: &'a Schema,
    rows: &'a [Record],
    mode: Mode,
    graph: Graph,
}

/// Entities of one table occurrence (one alias).
#[derive(Debug)]
struct Level {
    entities: Vec<Entity>,
}

#[derive(Debug)]
struct Entity {
    id: ObjectId,

    /// Column-keyed values, used to match relationship keys independently of
    /// the output mode.
    row: Record,
}

impl Unjoin<'_> {
    fn level(&mut self, table: &Table, alias: &str, loads: &Loads<'_>, root: bool) -> Result<Level> {
        // Children first, so parents can link to them.
        let mut nested = vec![];
        for (name, nested_loads) in &loads.joined {
            let rel = table.relationship(name)?;
            let other = self.schema.other_table(rel);
            let level = self.level(other, &join_alias(alias, name), nested_loads, false)?;
            nested.push((rel, other, level));
        }

        let mut entities = vec![];
        let mut seen = IndexMap::<Vec<Value>, usize>::new();

        for flat in self.rows {
            let row = extract(table, alias, flat)?;

            let key: Vec<Value> = table
                .primary_key_columns()
                .map(|column| row[&column.name].clone())
                .collect();

            let absent = if root {
                key.iter().all(Value::is_null)
            } else {
                row.values().all(Value::is_null)
            };

            if absent || seen.contains_key(&key) {
                continue;
            }

            let values = match self.mode {
                Mode::Rows => row.clone(),
                Mode::Instances => table.row_to_instance(&row),
            };

            seen.insert(key, entities.len());
            entities.push(Entity {
                id: self.graph.add(values),
                row,
            });
        }

        for entity in &entities {
            for (rel, other, level) in &nested {
                self.attach(table, entity, rel, other, level);
            }
        }

        Ok(Level { entities })
    }

    fn attach(&mut self, table: &Table, entity: &Entity, rel: &Relationship, other: &Table, level: &Level) {
        let this_id = &entity.row[&table.column_by_id(rel.this_id).name];
        let other_id = &other.column_by_id(rel.other_id).name;

        let mut matches = level
            .entities
            .iter()
            .filter(|child| !this_id.is_null() && child.row[other_id] == *this_id)
            .map(|child| child.id);

        if rel.is_many_to_one() {
            let target = matches.next();
            self.graph.set_one(entity.id, &rel.name, target);
        } else {
            let targets: Vec<_> = matches.collect();
            self.graph.init_many(entity.id, &rel.name);
            for target in targets {
                self.graph.push_many(entity.id, &rel.name, target);
            }
        }
    }
}

/// Extracts the columns of `table` labelled with `alias` from a flat row.
fn extract(table: &Table, alias: &str, flat: &Record) -> Result<Record> {
    table
        .columns
        .iter()
        .map(|column| {
            let label = column_label(alias, &column.name);
            match flat.get(&label) {
                Some(value) => Ok((column.name.clone(), value.clone())),
                None => Err(Error::invalid_result(format!(
                    "result row has no column `{label}`"
                ))),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture;
    use pretty_assertions::assert_eq;
    use rowgraph_core::graph::Related;
    use serde_json::json;

    fn flat(values: &[(&str, Value)]) -> Record {
        values
            .iter()
            .map(|(label, value)| (label.to_string(), value.clone()))
            .collect()
    }

    fn table1_row(prefix: &str, id: impl Into<Value>, column1: impl Into<Value>, fk: impl Into<Value>) -> Vec<(String, Value)> {
        vec![
            (format!("{prefix}__id"), id.into()),
            (format!("{prefix}__column1"), column1.into()),
            (format!("{prefix}__many_to_one_object1_id"), fk.into()),
        ]
    }

    fn joined(parts: Vec<Vec<(String, Value)>>) -> Record {
        parts.into_iter().flatten().collect()
    }

    fn run(criteria: serde_json::Value, rows: &[Record], mode: Mode) -> (Graph, Vec<ObjectId>) {
        let schema = fixture::schema();
        let table = schema.table("table1").unwrap();
        let criteria = Criteria::parse(&schema, table, &criteria);
        unjoin(&schema, table, rows, &criteria, "table1", mode).unwrap()
    }

    #[test]
    fn one_to_many_fan_out_is_deduplicated() {
        let children = "table1__oneToManyObject1";
        let rows = vec![
            joined(vec![
                table1_row("table1", 1, "a", Value::Null),
                table1_row(children, 2, "b", 1),
            ]),
            joined(vec![
                table1_row("table1", 1, "a", Value::Null),
                table1_row(children, 3, "c", 1),
            ]),
            joined(vec![
                table1_row("table1", 4, "d", Value::Null),
                table1_row(children, Value::Null, Value::Null, Value::Null),
            ]),
        ];

        let (graph, roots) = run(json!({ "oneToManyObject1": { "@load": true } }), &rows, Mode::Rows);

        assert_eq!(
            graph.to_json_list(&roots),
            json!([
                {
                    "id": 1,
                    "column1": "a",
                    "many_to_one_object1_id": null,
                    "oneToManyObject1": [
                        { "id": 2, "column1": "b", "many_to_one_object1_id": 1 },
                        { "id": 3, "column1": "c", "many_to_one_object1_id": 1 },
                    ],
                },
                {
                    "id": 4,
                    "column1": "d",
                    "many_to_one_object1_id": null,
                    "oneToManyObject1": [],
                },
            ])
        );
    }

    #[test]
    fn many_to_one_is_single_or_none() {
        let parent = "table1__manyToOneObject1";
        let rows = vec![
            joined(vec![
                table1_row("table1", 2, "a", 1),
                table1_row(parent, 1, "b", Value::Null),
            ]),
            joined(vec![
                table1_row("table1", 3, "c", Value::Null),
                table1_row(parent, Value::Null, Value::Null, Value::Null),
            ]),
        ];

        let (graph, roots) = run(json!({ "manyToOneObject1": { "@load": true } }), &rows, Mode::Rows);

        assert_eq!(roots.len(), 2);
        let parent = graph[roots[0]].one("manyToOneObject1").unwrap();
        assert_eq!(graph[parent].value("id"), &Value::I64(1));
        assert_eq!(
            graph[roots[1]].relations.get("manyToOneObject1"),
            Some(&Related::One(None))
        );
    }

    #[test]
    fn root_with_null_key_is_skipped() {
        let rows = vec![flat(&[
            ("table1__id", Value::Null),
            ("table1__column1", Value::from("x")),
            ("table1__many_to_one_object1_id", Value::Null),
        ])];

        let (graph, roots) = run(json!({}), &rows, Mode::Rows);
        assert!(roots.is_empty());
        assert!(graph.is_empty());
    }

    #[test]
    fn instances_use_properties() {
        let rows = vec![joined(vec![table1_row("table1", 1, "a", Value::Null)])];

        let (graph, roots) = run(json!({}), &rows, Mode::Instances);
        assert_eq!(
            graph.to_json(roots[0]),
            json!({ "id": 1, "column1": "a", "manyToOneObject1Id": null })
        );
    }

    #[test]
    fn missing_label_is_invalid_result() {
        let schema = fixture::schema();
        let table = schema.table("table1").unwrap();
        let rows = vec![flat(&[("table1__id", Value::I64(1))])];

        let err = unjoin(&schema, table, &rows, &Criteria::default(), "table1", Mode::Rows)
            .unwrap_err();
        assert!(err.is_invalid_result());
    }
}
