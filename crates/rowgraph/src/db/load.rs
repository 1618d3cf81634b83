use super::Db;
use crate::{
    compile::{compile_into, LoadSeparately},
    exec::Exec,
    materialize::unjoin,
};

use rowgraph_core::{
    criteria::Criteria,
    graph::{Graph, ObjectId},
    schema::{Relationship, Table},
    stmt::Value,
    Error, Result,
};
use rowgraph_sql::stmt::{Expr, Select};

use async_recursion::async_recursion;

/// Runs a load and the follow-up queries for its separately-loaded
/// relationships, collecting every object in one graph.
pub(super) struct Load<'a> {
    db: &'a Db,
    exec: Exec<'a>,
    graph: Graph,
}

impl<'a> Load<'a> {
    pub(super) fn new(db: &'a Db, exec: Exec<'a>) -> Load<'a> {
        Load {
            db,
            exec,
            graph: Graph::new(),
        }
    }

    pub(super) fn into_graph(self) -> Graph {
        self.graph
    }

    pub(super) async fn root(&mut self, table: &Table, criteria: &Criteria) -> Result<Vec<ObjectId>> {
        let select = Select::from(&table.name, &table.name);
        self.query(table, criteria, select).await
    }

    #[async_recursion]
    async fn query(
        &mut self,
        table: &Table,
        criteria: &Criteria,
        mut select: Select,
    ) -> Result<Vec<ObjectId>> {
        let db = self.db;
        let load_separately = compile_into(&mut select, &db.schema, table, criteria)?;

        let rows = self.exec.query(select).await?;
        let (graph, roots) = unjoin(&db.schema, table, &rows, criteria, &table.name, db.mode)?;

        db.observer
            .materialized(&table.name, rows.len(), graph.len());

        let ids = self.graph.append(graph);
        let roots: Vec<_> = roots.iter().map(|id| ids[id.index()]).collect();

        for (path, load) in &load_separately {
            db.observer.load_separately(&table.name, path);
            self.separately(table, &roots, load).await?;
        }

        Ok(roots)
    }

    /// Loads the relationship at the end of `load.path` for every object
    /// reached from `roots`, and links the results to their parents.
    async fn separately(&mut self, table: &Table, roots: &[ObjectId], load: &LoadSeparately) -> Result<()> {
        let db = self.db;
        let schema = &*db.schema;
        let mode = db.mode;

        let Some((last, through)) = load.path.split_last() else {
            return Err(Error::invariant_violation(
                "separately-loaded relationship has an empty path",
            ));
        };

        // Follow the join-loaded part of the path.
        let mut table = table;
        let mut parents = roots.to_vec();

        for name in through {
            let rel = table.relationship(name)?;
            let mut next = vec![];

            for parent in &parents {
                for target in related(&self.graph, *parent, rel) {
                    if !next.contains(&target) {
                        next.push(target);
                    }
                }
            }

            table = schema.other_table(rel);
            parents = next;
        }

        let rel = table.relationship(last)?;
        let other = schema.other_table(rel);
        let this_id = mode.key(table.column_by_id(rel.this_id));
        let other_id = other.column_by_id(rel.other_id);

        let mut keys: Vec<Value> = vec![];
        for parent in &parents {
            let key = self.graph[*parent].value(this_id);
            if !key.is_null() && !keys.contains(key) {
                keys.push(key.clone());
            }
        }

        let children = if keys.is_empty() {
            vec![]
        } else {
            let mut select = Select::from(&other.name, &other.name);
            select.and_filter(Expr::in_list(
                Expr::column(&other.name, &other_id.name),
                keys,
                false,
            ));

            let criteria = Criteria::Object(load.criteria.clone());
            self.query(other, &criteria, select).await?
        };

        let other_key = mode.key(other_id);

        for parent in &parents {
            let key = self.graph[*parent].value(this_id).clone();
            let matches: Vec<_> = children
                .iter()
                .copied()
                .filter(|child| !key.is_null() && *self.graph[*child].value(other_key) == key)
                .collect();

            if rel.is_many_to_one() {
                self.graph
                    .set_one(*parent, &rel.name, matches.first().copied());
            } else {
                self.graph.init_many(*parent, &rel.name);
                for child in matches {
                    self.graph.push_many(*parent, &rel.name, child);
                }
            }
        }

        Ok(())
    }
}

fn related(graph: &Graph, id: ObjectId, rel: &Relationship) -> Vec<ObjectId> {
    if rel.is_many_to_one() {
        graph[id].one(&rel.name).into_iter().collect()
    } else {
        graph[id].many(&rel.name).to_vec()
    }
}
