mod builder;
pub use builder::Builder;

mod connect;

mod load;
use load::Load;

use crate::{compile, exec::Exec, materialize::Mode, persist::Persist, StoreInfo};

use rowgraph_core::{
    criteria::{Criteria, Issue},
    driver::{Connection, Response},
    graph::{Graph, ObjectId},
    observe::Observer,
    stmt::Value,
    Error, Result, Schema,
};

use serde_json::Value as Json;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A schema bound to a database connection.
///
/// Operations take the connection in turn; each one runs its statements
/// sequentially on it.
#[derive(Debug)]
pub struct Db {
    schema: Arc<Schema>,
    conn: Mutex<Box<dyn Connection>>,
    observer: Arc<dyn Observer>,
    mode: Mode,
}

/// Objects returned by [`Db::load`].
#[derive(Debug)]
pub struct Loaded {
    pub graph: Graph,

    /// Root objects, in result order.
    pub roots: Vec<ObjectId>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Reports every problem in `criteria` for `table`.
    pub fn validate(&self, table: &str, criteria: &Json) -> Result<Vec<Issue>> {
        let table = self.schema.table(table)?;
        Ok(rowgraph_core::criteria::validate_criteria(
            &self.schema,
            table,
            criteria,
        ))
    }

    /// Loads the rows of `table` matching `criteria`, with every relationship
    /// it asks to load.
    pub async fn load(&self, table: &str, criteria: &Json) -> Result<Loaded> {
        let table = self.schema.table(table)?;
        let criteria = Criteria::parse(&self.schema, table, criteria);

        let mut conn = self.conn.lock().await;
        let mut load = Load::new(self, Exec::new(&mut **conn, &*self.observer));
        let roots = load.root(table, &criteria).await?;

        Ok(Loaded {
            graph: load.into_graph(),
            roots,
        })
    }

    /// Counts the rows of `table` matching `criteria`.
    pub async fn count(&self, table: &str, criteria: &Json) -> Result<u64> {
        let table = self.schema.table(table)?;
        let criteria = Criteria::parse(&self.schema, table, criteria);
        let select = compile::count(&self.schema, table, &criteria)?;

        let mut conn = self.conn.lock().await;
        let rows = Exec::new(&mut **conn, &*self.observer).query(select).await?;

        rows.first()
            .and_then(|row| row.get("count"))
            .and_then(Value::as_i64)
            .and_then(|count| u64::try_from(count).ok())
            .ok_or_else(|| Error::invalid_result("count query returned no count"))
    }

    /// Stores a graph of rows. See [`store`](crate::store).
    pub async fn store(&self, table: &str, graph: &mut Graph, id: ObjectId) -> Result<StoreInfo> {
        let table = self.schema.table(table)?;

        let mut conn = self.conn.lock().await;
        Persist::new(&mut **conn, &self.schema, &*self.observer)
            .store(table, graph, id)
            .await
    }

    /// Builds a graph of rows from JSON and stores it.
    pub async fn store_json(&self, table: &str, json: &Json) -> Result<StoreInfo> {
        let (mut graph, root) = Graph::from_json(json)?;
        self.store(table, &mut graph, root).await
    }

    /// Stores a graph of instances.
    ///
    /// The instances are converted to rows through each table's mapper, and
    /// the stored values, generated keys and foreign keys included, are
    /// copied back onto them.
    pub async fn store_instance(
        &self,
        table: &str,
        graph: &mut Graph,
        id: ObjectId,
    ) -> Result<StoreInfo> {
        let table = self.schema.table(table)?;
        let rows = self.schema.instances_to_rows(table, graph, &[id])?;
        let mut row_graph = rows.graph;

        let info = {
            let mut conn = self.conn.lock().await;
            Persist::new(&mut **conn, &self.schema, &*self.observer)
                .store(table, &mut row_graph, rows.roots[0])
                .await?
        };

        let stored = self
            .schema
            .rows_to_instances(table, &row_graph, &rows.roots)?;

        for (instance, row) in &rows.ids {
            let Some(updated) = stored.ids.get(row) else {
                continue;
            };

            for (key, value) in &stored.graph[*updated].values {
                graph[*instance].set(key.as_str(), value.clone());
            }
        }

        Ok(info)
    }

    /// Deletes a graph of rows, children first.
    pub async fn delete(&self, table: &str, graph: &Graph, id: ObjectId) -> Result<u64> {
        let table = self.schema.table(table)?;

        let mut conn = self.conn.lock().await;
        Persist::new(&mut **conn, &self.schema, &*self.observer)
            .delete(table, graph, id)
            .await
    }

    /// Runs raw SQL on the connection.
    pub async fn exec(&self, sql: &str, params: &[Value]) -> Result<Response> {
        self.observer.statement(sql, params);
        self.conn.lock().await.exec(sql, params).await
    }
}
