//! Writes object graphs to the database.
//!
//! Objects are tracked by identity in a ledger while they are written. A
//! many-to-one target is written before the object referencing it, and
//! one-to-many children after their parent. When a foreign key points at an
//! object that is still being written further up the recursion, the key is
//! patched once that object's own write completes.

mod delete;

mod info;
pub use info::{StoreInfo, StoredRelation};

mod write;

use crate::exec::Exec;

use rowgraph_core::{
    driver::Connection,
    graph::{Graph, ObjectId, Related},
    observe::{NoopObserver, Observer},
    schema::{Relationship, RelationshipId, Schema, Table},
    stmt::Value,
    bail, Error, Result,
};

use async_recursion::async_recursion;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Stores `id` and everything reachable from it, returning the keys written.
///
/// Generated keys and resolved foreign keys are written back into `graph`.
/// Statements are issued one at a time; wrap `conn` in a transaction when
/// the whole graph must apply atomically.
pub async fn store(
    conn: &mut dyn Connection,
    schema: &Schema,
    table: &Table,
    graph: &mut Graph,
    id: ObjectId,
) -> Result<StoreInfo> {
    Persist::new(conn, schema, &NoopObserver)
        .store(table, graph, id)
        .await
}

/// Deletes `id` after its one-to-many children, returning the number of
/// rows deleted.
pub async fn delete(
    conn: &mut dyn Connection,
    schema: &Schema,
    table: &Table,
    graph: &Graph,
    id: ObjectId,
) -> Result<u64> {
    Persist::new(conn, schema, &NoopObserver)
        .delete(table, graph, id)
        .await
}

/// A single store or delete operation.
pub struct Persist<'a> {
    exec: Exec<'a>,
    schema: &'a Schema,

    /// Write state of every object reached so far.
    ledger: HashMap<ObjectId, State>,

    /// Foreign keys waiting for the keyed object to be written.
    deferred: HashMap<ObjectId, Vec<Deferred>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// On the recursion stack, not yet written.
    InFlight,
    Written,
}

/// `object`'s foreign key for `relationship` is set once the target is
/// written.
#[derive(Debug)]
struct Deferred {
    object: ObjectId,
    relationship: RelationshipId,
}

impl<'a> Persist<'a> {
    pub fn new(
        conn: &'a mut dyn Connection,
        schema: &'a Schema,
        observer: &'a dyn Observer,
    ) -> Persist<'a> {
        Persist {
            exec: Exec::new(conn, observer),
            schema,
            ledger: HashMap::new(),
            deferred: HashMap::new(),
        }
    }

    pub async fn store(mut self, table: &Table, graph: &mut Graph, id: ObjectId) -> Result<StoreInfo> {
        let info = self.store_object(table, graph, id).await?;

        // Every deferral targets an in-flight object, and those are all
        // written by the time the root returns.
        debug_assert!(self.deferred.is_empty(), "{:?}", self.deferred);
        Ok(info)
    }

    pub async fn delete(mut self, table: &Table, graph: &Graph, id: ObjectId) -> Result<u64> {
        self.delete_object(table, graph, id).await
    }

    #[async_recursion]
    async fn store_object(
        &mut self,
        table: &Table,
        graph: &mut Graph,
        id: ObjectId,
    ) -> Result<StoreInfo> {
        self.ledger.insert(id, State::InFlight);

        let relations: Vec<(String, Related)> = graph[id]
            .relations
            .iter()
            .map(|(name, related)| (name.clone(), related.clone()))
            .collect();

        let mut stored = IndexMap::new();

        for (name, related) in &relations {
            let rel = table.relationship(name)?;

            if !rel.is_many_to_one() {
                continue;
            }

            match related {
                Related::One(Some(target)) => {
                    if let Some(info) = self.resolve_parent(table, rel, graph, id, *target).await? {
                        stored.insert(name.as_str(), StoredRelation::One(Box::new(info)));
                    }
                }
                Related::One(None) => {}
                Related::Many(_) => bail!(
                    "relation `{}.{name}` holds a list, expected a single object",
                    table.name
                ),
            }
        }

        let update = self.is_update(table, &graph[id].values).await?;
        self.exec
            .observer()
            .write_decision(&table.name, &graph[id].values, update);

        if update {
            self.update(table, graph, id).await?;
        } else {
            self.insert(table, graph, id).await?;
        }

        self.ledger.insert(id, State::Written);
        self.run_deferred(graph, id).await?;

        for (name, related) in &relations {
            let rel = table.relationship(name)?;

            match related {
                Related::Many(children) if rel.is_one_to_many() => {
                    let mut infos = vec![];
                    for child in children {
                        if let Some(info) = self.store_child(table, rel, graph, id, *child).await? {
                            infos.push(info);
                        }
                    }
                    stored.insert(name.as_str(), StoredRelation::Many(infos));
                }
                Related::One(Some(partner)) if rel.is_one_to_one() => {
                    self.link_partner(table, rel, graph, id, *partner).await?;
                }
                Related::One(Some(_)) if rel.is_one_to_many() => bail!(
                    "relation `{}.{name}` holds a single object, expected a list",
                    table.name
                ),
                _ => {}
            }
        }

        // Report relations in the order the object lists them.
        let relations = relations
            .iter()
            .filter_map(|(name, _)| stored.shift_remove_entry(name.as_str()))
            .map(|(name, info)| (name.to_string(), info))
            .collect();

        Ok(StoreInfo {
            key: write::key(table, &graph[id].values),
            update,
            relations,
        })
    }

    /// Makes the many-to-one target's key available on `id` before `id` is
    /// written, storing the target first if it has not been reached yet.
    async fn resolve_parent(
        &mut self,
        table: &Table,
        rel: &Relationship,
        graph: &mut Graph,
        id: ObjectId,
        target: ObjectId,
    ) -> Result<Option<StoreInfo>> {
        let schema = self.schema;
        let other = schema.other_table(rel);
        let this_id = &table.column_by_id(rel.this_id).name;
        let other_id = &other.column_by_id(rel.other_id).name;

        let info = match self.ledger.get(&target).copied() {
            None => Some(self.store_object(other, graph, target).await?),
            Some(State::Written) => None,
            Some(State::InFlight) => {
                // The target row does not exist yet, even when its key is
                // already known. Write `id` without the reference and patch it
                // once the target is written.
                self.exec.observer().deferred_patch(&table.name, &rel.name);
                self.deferred.entry(target).or_default().push(Deferred {
                    object: id,
                    relationship: rel.id,
                });

                if graph[id].values.contains_key(this_id.as_str()) {
                    graph[id].set(this_id.as_str(), Value::Null);
                }
                return Ok(None);
            }
        };

        let value = graph[target].value(other_id).clone();
        graph[id].set(this_id.as_str(), value);
        Ok(info)
    }

    /// Sets foreign keys that were waiting on `id`.
    async fn run_deferred(&mut self, graph: &mut Graph, id: ObjectId) -> Result<()> {
        let Some(deferred) = self.deferred.remove(&id) else {
            return Ok(());
        };

        let schema = self.schema;

        for Deferred {
            object,
            relationship,
        } in deferred
        {
            let rel = schema.relationship(relationship);
            let table = schema.table_by_id(relationship.table);
            let column = &table.column_by_id(rel.this_id).name;
            let value = graph[id]
                .value(&schema.other_table(rel).column_by_id(rel.other_id).name)
                .clone();

            // Deferring objects sit above `id` on the recursion stack, so
            // they are written before it.
            if self.ledger.get(&object) != Some(&State::Written) {
                return Err(Error::invariant_violation(format!(
                    "deferred foreign key `{}.{}` belongs to an object that is not written",
                    table.name, rel.name
                )));
            }

            self.patch(table, graph, object, column, value).await?;
        }

        Ok(())
    }

    /// Points a one-to-many child at its now-written parent.
    async fn store_child(
        &mut self,
        table: &Table,
        rel: &Relationship,
        graph: &mut Graph,
        parent: ObjectId,
        child: ObjectId,
    ) -> Result<Option<StoreInfo>> {
        let schema = self.schema;
        let other = schema.other_table(rel);
        let value = graph[parent]
            .value(&table.column_by_id(rel.this_id).name)
            .clone();
        let other_id = &other.column_by_id(rel.other_id).name;

        match self.ledger.get(&child).copied() {
            None => {
                graph[child].set(other_id.as_str(), value);
                Ok(Some(self.store_object(other, graph, child).await?))
            }
            Some(State::InFlight) => {
                graph[child].set(other_id.as_str(), value);
                Ok(None)
            }
            Some(State::Written) => {
                self.patch(other, graph, child, other_id, value).await?;
                Ok(None)
            }
        }
    }

    /// Sets the inverse foreign key of a one-to-one pair on `partner`.
    async fn link_partner(
        &mut self,
        table: &Table,
        rel: &Relationship,
        graph: &mut Graph,
        id: ObjectId,
        partner: ObjectId,
    ) -> Result<()> {
        let schema = self.schema;
        let Some(inverse) = rel.other_relationship(schema) else {
            return Ok(());
        };

        let partner_table = schema.other_table(rel);
        let column = &partner_table.column_by_id(inverse.this_id).name;
        let value = graph[id]
            .value(&table.column_by_id(inverse.other_id).name)
            .clone();

        match self.ledger.get(&partner).copied() {
            Some(State::InFlight) => graph[partner].set(column.as_str(), value),
            Some(State::Written) => {
                self.patch(partner_table, graph, partner, column, value)
                    .await?
            }
            None => {
                return Err(Error::invariant_violation(format!(
                    "one-to-one partner of `{}.{}` was not stored before its inverse",
                    table.name, rel.name
                )))
            }
        }

        Ok(())
    }
}
