use super::{Schema, Table};
use crate::{
    graph::{Graph, ObjectId, Related},
    stmt::Record,
    Result,
};

use indexmap::IndexMap;

/// The output of a graph conversion.
#[derive(Debug, Default)]
pub struct Converted {
    pub graph: Graph,

    /// Converted roots, in input order.
    pub roots: Vec<ObjectId>,

    /// Maps each source object to its converted counterpart.
    pub ids: IndexMap<ObjectId, ObjectId>,
}

#[derive(Clone, Copy)]
enum Direction {
    RowToInstance,
    InstanceToRow,
}

struct Convert<'a> {
    schema: &'a Schema,
    source: &'a Graph,
    direction: Direction,
    out: Converted,
}

impl Schema {
    /// Converts a graph of rows into a graph of instances.
    ///
    /// Each object is converted once; an object reached again (shared, or
    /// through a cycle) maps to the same converted object.
    pub fn rows_to_instances(
        &self,
        table: &Table,
        graph: &Graph,
        roots: &[ObjectId],
    ) -> Result<Converted> {
        Convert::run(self, graph, Direction::RowToInstance, table, roots)
    }

    /// Converts a graph of instances into a graph of rows.
    pub fn instances_to_rows(
        &self,
        table: &Table,
        graph: &Graph,
        roots: &[ObjectId],
    ) -> Result<Converted> {
        Convert::run(self, graph, Direction::InstanceToRow, table, roots)
    }
}

impl<'a> Convert<'a> {
    fn run(
        schema: &'a Schema,
        source: &'a Graph,
        direction: Direction,
        table: &'a Table,
        roots: &[ObjectId],
    ) -> Result<Converted> {
        let mut convert = Convert {
            schema,
            source,
            direction,
            out: Converted::default(),
        };

        for root in roots {
            let id = convert.object(table, *root)?;
            convert.out.roots.push(id);
        }

        Ok(convert.out)
    }

    fn object(&mut self, table: &'a Table, id: ObjectId) -> Result<ObjectId> {
        if let Some(converted) = self.out.ids.get(&id) {
            return Ok(*converted);
        }

        // Register before recursing so cycles resolve to this object.
        let converted = self.out.graph.add(Record::new());
        self.out.ids.insert(id, converted);

        let source_graph = self.source;
        let source = &source_graph[id];
        self.out.graph[converted].values = match self.direction {
            Direction::RowToInstance => table.row_to_instance(&source.values),
            Direction::InstanceToRow => table.instance_to_row(&source.values),
        };

        for (name, related) in &source.relations {
            let rel = table.relationship(name)?;
            let other = self.schema.other_table(rel);

            match related {
                Related::One(None) => self.out.graph.set_one(converted, name, None),
                Related::One(Some(target)) => {
                    let target = self.object(other, *target)?;
                    self.out.graph.set_one(converted, name, Some(target));
                }
                Related::Many(targets) => {
                    self.out.graph.init_many(converted, name);
                    for target in targets {
                        let target = self.object(other, *target)?;
                        self.out.graph.push_many(converted, name, target);
                    }
                }
            }
        }

        Ok(converted)
    }
}
