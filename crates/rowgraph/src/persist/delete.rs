use super::{write::key_filter, Persist, State};

use rowgraph_core::{
    graph::{Graph, ObjectId, Related},
    schema::Table,
    Error, Result,
};
use rowgraph_sql::stmt::Delete;

use async_recursion::async_recursion;

impl Persist<'_> {
    /// Deletes one-to-many children first, then the object itself. Each
    /// object is deleted at most once.
    #[async_recursion]
    pub(super) async fn delete_object(
        &mut self,
        table: &Table,
        graph: &Graph,
        id: ObjectId,
    ) -> Result<u64> {
        if self.ledger.contains_key(&id) {
            return Ok(0);
        }

        self.ledger.insert(id, State::InFlight);

        let schema = self.schema;
        let mut deleted = 0;

        for (name, related) in &graph[id].relations {
            let Related::Many(children) = related else {
                continue;
            };

            let rel = table.relationship(name)?;
            if !rel.is_one_to_many() {
                continue;
            }

            let other = schema.other_table(rel);
            for child in children {
                deleted += self.delete_object(other, graph, *child).await?;
            }
        }

        let delete = Delete {
            table: table.name.clone(),
            filter: key_filter(table, &graph[id].values)?,
        };

        let mutation = self.exec.run(delete).await?.into_mutation(None)?;

        if mutation.affected_rows != 1 {
            return Err(Error::invalid_record_count(format!(
                "DELETE FROM `{}` affected {} rows, expected 1",
                table.name, mutation.affected_rows
            )));
        }

        self.ledger.insert(id, State::Written);
        Ok(deleted + 1)
    }
}
